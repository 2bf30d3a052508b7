//! Permutation of a matrix into the leaf order of a dendrogram.
//!
//! The output header carries tree labels in canonical order and keeps the corner cell of the input.
//! Cell strings are moved around as is.

use std::collections::{HashMap, HashSet};

use crate::dendro::DendroOrder;
use crate::errors::MatError;
use crate::matrix::IdentityMatrix;


// fails if tree and matrix labels are not the same set
fn check_label_sets(matrix : &IdentityMatrix, order : &DendroOrder) -> Result<(), MatError> {
    let in_matrix : HashSet<&str> = matrix.get_labels().iter().map(|l| l.as_str()).collect();
    let in_tree : HashSet<&str> = order.get_labels().iter().map(|l| l.as_str()).collect();
    //
    let mut not_in_matrix : Vec<&str> = order.get_labels().iter().map(|l| l.as_str()).filter(|l| !in_matrix.contains(l)).collect();
    let mut not_in_tree : Vec<&str> = matrix.get_labels().iter().map(|l| l.as_str()).filter(|l| !in_tree.contains(l)).collect();
    if not_in_matrix.is_empty() && not_in_tree.is_empty() && order.get_nb_labels() == matrix.get_nb_labels() {
        return Ok(());
    }
    not_in_matrix.truncate(10);
    not_in_tree.truncate(10);
    let msg = format!("tree has {} labels, matrix has {}. tree labels absent from matrix : {:?}, matrix labels absent from tree : {:?}",
            order.get_nb_labels(), matrix.get_nb_labels(), not_in_matrix, not_in_tree);
    log::error!("{}", msg);
    Err(MatError::Consistency(msg))
} // end of check_label_sets



/// Returns matrix with rows and columns in the canonical order of the tree :
/// new\[i\]\[j\] = old\[orig(i)\]\[orig(j)\] where orig(i) is the matrix rank of the i-th tree label.
pub fn reorder(matrix : &IdentityMatrix, order : &DendroOrder) -> Result<IdentityMatrix, MatError> {
    check_label_sets(matrix, order)?;
    // canonical rank -> original rank
    let matrix_ranks : HashMap<&str, usize> = matrix.get_labels().iter().enumerate().map(|(i, l)| (l.as_str(), i)).collect();
    let mut orig = Vec::<usize>::with_capacity(order.get_nb_labels());
    for label in order.get_labels() {
        match matrix_ranks.get(label.as_str()) {
            Some(&rank) => orig.push(rank),
            None => return Err(MatError::Consistency(format!("tree label {} not in matrix", label))),
        }
    }
    log::debug!("canonical to original ranks : {:?}", orig);
    //
    let n = orig.len();
    let mut cells = Vec::<String>::with_capacity(n * n);
    for &oi in &orig {
        for &oj in &orig {
            cells.push(matrix.get(oi, oj).to_string());
        }
    }
    IdentityMatrix::new(matrix.get_corner().to_string(), order.get_labels().to_vec(), cells)
} // end of reorder


//=========================================================================================


#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn xyz_matrix() -> IdentityMatrix {
        let text = "h\tx\ty\tz\n\
                    x\t00\t01\t02\n\
                    y\t10\t11\t12\n\
                    z\t20\t21\t22\n";
        IdentityMatrix::read_from(text.as_bytes(), "mem").unwrap()
    }

    #[test]
    fn test_reorder_correctness() {
        log_init_test();
        let orig = xyz_matrix();
        let order = DendroOrder::from_newick("(z:1,(x:0.5,y:0.5):0.5);", "mem").unwrap();
        let m = reorder(&orig, &order).unwrap();
        assert_eq!(m.get_labels(), &["z".to_string(), "x".to_string(), "y".to_string()]);
        assert_eq!(m.get_row(0), &["22".to_string(), "20".to_string(), "21".to_string()]);
        assert_eq!(m.get_row(1), &["02".to_string(), "00".to_string(), "01".to_string()]);
        assert_eq!(m.get_row(2), &["12".to_string(), "10".to_string(), "11".to_string()]);
        assert_eq!(m.get_corner(), "h");
    }

    #[test]
    fn test_same_order_round_trip() {
        let text = "\tx\ty\tz\nx\t0.00\t85.00\t70.00\ny\t85.00\t0.00\t0.00\nz\t70.00\t0.00\t100.00\n";
        let orig = IdentityMatrix::read_from(text.as_bytes(), "mem").unwrap();
        let order = DendroOrder::from_newick("(('x':0,'y':0):190.2,'z':164.5);", "mem").unwrap();
        let m = reorder(&orig, &order).unwrap();
        let mut out = Vec::<u8>::new();
        m.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), text);
    }

    #[test]
    fn test_label_mismatch() {
        log_init_test();
        let orig = xyz_matrix();
        // missing label in tree
        let order = DendroOrder::from_newick("(x,y);", "mem").unwrap();
        assert!(matches!(reorder(&orig, &order), Err(MatError::Consistency(_))));
        // extra label in tree
        let order = DendroOrder::from_newick("(x,(y,(z,w)));", "mem").unwrap();
        assert!(matches!(reorder(&orig, &order), Err(MatError::Consistency(_))));
        // same size, different sets
        let order = DendroOrder::from_newick("(x,(y,w));", "mem").unwrap();
        match reorder(&orig, &order) {
            Err(MatError::Consistency(msg)) => {
                assert!(msg.contains("\"w\""));
                assert!(msg.contains("\"z\""));
            }
            _ => panic!("mismatch not detected"),
        }
    }
} // end of mod tests
