//! The dense identity matrix, its construction from a score map and its tab separated dump/reload.
//!
//! File format :
//! ```text
//! <corner>\t<label_1>\t...\t<label_n>
//! <label_1>\t<v_11>\t...\t<v_1n>
//! ...
//! <label_n>\t<v_n1>\t...\t<v_nn>
//! ```
//! Cells are kept as strings. They are formatted once at construction and copied as is afterwards.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use rayon::prelude::*;

use crate::errors::MatError;
use crate::hits::ScoreMap;
use crate::labels::check_unique;
use crate::utils::files::{dump_to_file, open_input};


/// value of a pair without any qualifying record, including the self pair
pub const NO_IDENTITY : &str = "0.00";


/// formats an identity as stored in matrix cells
pub fn format_identity(identity : Option<f64>) -> String {
    match identity {
        Some(v) => format!("{:.2}", v),
        None => NO_IDENTITY.to_string(),
    }
} // end of format_identity



/// A square matrix of identity values, with row and column in the same label order.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityMatrix {
    /// content of the upper left cell of the file
    corner : String,
    /// row and column labels
    labels : Vec<String>,
    /// row major cells, labels.len() * labels.len()
    cells : Vec<String>,
} // end of IdentityMatrix



impl IdentityMatrix {

    /// assembles a matrix, checking that cells are consistent with labels.
    pub fn new(corner : String, labels : Vec<String>, cells : Vec<String>) -> Result<Self, MatError> {
        let n = labels.len();
        if cells.len() != n * n {
            return Err(MatError::Consistency(format!("{} labels need {} cells, got {}", n, n * n, cells.len())));
        }
        Ok(IdentityMatrix{corner, labels, cells})
    } // end of new


    /// Builds the symmetric matrix of labels from the score map.
    /// For each pair (i, j) with j >= i the cell value is the mean of both directions when both
    /// are present, the value of the direction present otherwise, and "0.00" if none.
    /// The self pair follows the same rule, so it is "0.00" without a self hit.
    /// The resolved value is written in (i,j) and (j,i).
    pub fn from_scores(labels : Vec<String>, scores : &ScoreMap) -> Self {
        let n = labels.len();
        log::info!("building symmetric matrix for {} labels from {} pairs", n, scores.get_nb_pairs());
        if log::log_enabled!(log::Level::Debug) {
            let known : HashSet<&str> = labels.iter().map(|l| l.as_str()).collect();
            let unknown : HashSet<&str> = scores.labels().filter(|l| !known.contains(l)).collect();
            if !unknown.is_empty() {
                log::debug!("{} labels in alignments are not in label list, their records are ignored", unknown.len());
            }
        }
        // upper triangle rows are independent
        let upper : Vec<Vec<String>> = (0..n).into_par_iter()
            .map(|i| (i..n).map(|j| format_identity(scores.symmetric_identity(&labels[i], &labels[j]))).collect::<Vec<String>>())
            .collect();
        //
        let mut cells = vec![String::new(); n * n];
        for (i, row) in upper.into_iter().enumerate() {
            for (k, value) in row.into_iter().enumerate() {
                let j = i + k;
                if j != i {
                    cells[j * n + i] = value.clone();
                }
                cells[i * n + j] = value;
            }
        }
        IdentityMatrix{corner : String::new(), labels, cells}
    } // end of from_scores


    pub fn get_nb_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn get_labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get_corner(&self) -> &str {
        &self.corner
    }

    /// cell at row i, column j
    pub fn get(&self, i : usize, j : usize) -> &str {
        &self.cells[i * self.labels.len() + j]
    }

    pub fn get_row(&self, i : usize) -> &[String] {
        let n = self.labels.len();
        &self.cells[i * n..(i + 1) * n]
    }

    /// rank of label in row/column order
    pub fn get_label_rank(&self, label : &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.labels.len();
        (0..n).all(|i| (i + 1..n).all(|j| self.get(i, j) == self.get(j, i)))
    }


    /// writes matrix in tab separated format
    pub fn write_to<W : Write>(&self, out : &mut W) -> std::io::Result<()> {
        write!(out, "{}", self.corner)?;
        for label in &self.labels {
            write!(out, "\t{}", label)?;
        }
        writeln!(out)?;
        for (i, label) in self.labels.iter().enumerate() {
            write!(out, "{}", label)?;
            for value in self.get_row(i) {
                write!(out, "\t{}", value)?;
            }
            writeln!(out)?;
        }
        Ok(())
    } // end of write_to


    /// dumps in file path, the file appears only if the whole matrix was written
    pub fn dump(&self, path : &Path) -> Result<(), MatError> {
        log::info!("dumping matrix of {} labels in {}", self.labels.len(), path.display());
        dump_to_file(path, |w| self.write_to(w))
    } // end of dump


    /// Parses a matrix in tab separated format. The header gives corner and column labels,
    /// each row must begin with the label of the column of same rank and have one cell per column.
    pub fn read_from<R : Read>(reader : R, input : &str) -> Result<Self, MatError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);
        let mut records = rdr.records();
        //
        let header = match records.next() {
            Some(res) => res.map_err(|e| MatError::from_csv(input, e))?,
            None => return Err(MatError::format(input, 1, "empty matrix file, no header")),
        };
        let mut fields = header.iter();
        let corner = fields.next().unwrap_or("").to_string();
        let labels : Vec<String> = fields.map(String::from).collect();
        if labels.is_empty() {
            return Err(MatError::format(input, 1, "header has no label"));
        }
        check_unique(&labels, input)?;
        let n = labels.len();
        //
        let mut cells = Vec::<String>::with_capacity(n * n);
        let mut nb_rows = 0;
        for res in records {
            let record = res.map_err(|e| MatError::from_csv(input, e))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            if nb_rows >= n {
                return Err(MatError::format(input, line, format!("more rows than the {} header labels", n)));
            }
            if record.len() != n + 1 {
                return Err(MatError::format(input, line, format!("row has {} cells, header has {} labels", record.len().saturating_sub(1), n)));
            }
            if &record[0] != labels[nb_rows].as_str() {
                return Err(MatError::format(input, line, format!("row label {} does not match column label {}", &record[0], labels[nb_rows])));
            }
            cells.extend(record.iter().skip(1).map(String::from));
            nb_rows += 1;
        }
        if nb_rows != n {
            return Err(MatError::format(input, 0, format!("got {} rows for {} header labels", nb_rows, n)));
        }
        log::info!("read matrix of {} labels from {}", n, input);
        //
        IdentityMatrix::new(corner, labels, cells)
    } // end of read_from


    pub fn reload(path : &Path) -> Result<Self, MatError> {
        let reader = open_input(path)?;
        IdentityMatrix::read_from(reader, &path.display().to_string())
    }

} // end of impl IdentityMatrix


//=========================================================================================


#[cfg(test)]
mod tests {

    use super::*;
    use crate::hits::AlnRecord;
    use crate::utils::parameters::AlnFilterParams;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn labels(names : &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn cell<'a>(m : &'a IdentityMatrix, a : &str, b : &str) -> &'a str {
        m.get(m.get_label_rank(a).unwrap(), m.get_label_rank(b).unwrap())
    }

    #[test]
    fn test_averaging_fallback_and_zero() {
        log_init_test();
        let mut scores = ScoreMap::new();
        scores.insert("A", "B", 90.0);
        scores.insert("B", "A", 80.0);
        scores.insert("A", "C", 70.0);
        scores.insert("D", "D", 100.0);
        let m = IdentityMatrix::from_scores(labels(&["A", "B", "C", "D"]), &scores);
        assert_eq!(cell(&m, "A", "B"), "85.00");
        assert_eq!(cell(&m, "B", "A"), "85.00");
        assert_eq!(cell(&m, "A", "C"), "70.00");
        assert_eq!(cell(&m, "C", "A"), "70.00");
        assert_eq!(cell(&m, "B", "C"), "0.00");
        // no self hit gives 0.00, not 100.00
        assert_eq!(cell(&m, "A", "A"), "0.00");
        assert_eq!(cell(&m, "D", "D"), "100.00");
        assert!(m.is_symmetric());
        assert_eq!(m.get_corner(), "");
    }

    #[test]
    fn test_symmetry_on_asymmetric_scores() {
        let names = ["s0", "s1", "s2", "s3", "s4", "s5"];
        let mut scores = ScoreMap::new();
        for (i, a) in names.iter().enumerate() {
            for (j, b) in names.iter().enumerate() {
                if (i * 7 + j * 3) % 4 != 0 {
                    scores.insert(a, b, 50. + ((i * 11 + j * 5) % 50) as f64 + 0.37);
                }
            }
        }
        let m = IdentityMatrix::from_scores(labels(&names), &scores);
        assert!(m.is_symmetric());
        for i in 0..names.len() {
            for j in 0..names.len() {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_sub_threshold_record_has_no_effect() {
        let params = AlnFilterParams::new(100);
        let base = vec![AlnRecord::new("A", "B", 90., 200), AlnRecord::new("B", "C", 75.5, 150)];
        let mut with_short = base.clone();
        with_short.push(AlnRecord::new("A", "C", 99., 99));
        with_short.push(AlnRecord::new("B", "A", 10., 3));
        let names = labels(&["A", "B", "C"]);
        let m1 = IdentityMatrix::from_scores(names.clone(), &ScoreMap::from_records(base, &params));
        let m2 = IdentityMatrix::from_scores(names, &ScoreMap::from_records(with_short, &params));
        assert_eq!(m1, m2);
        assert_eq!(cell(&m2, "A", "C"), "0.00");
        assert_eq!(cell(&m2, "B", "A"), "90.00");
    }

    #[test]
    fn test_dump_format() {
        let mut scores = ScoreMap::new();
        scores.insert("x", "y", 97.125);
        let m = IdentityMatrix::from_scores(labels(&["x", "y"]), &scores);
        let mut out = Vec::<u8>::new();
        m.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected_cell = format!("{:.2}", 97.125f64);
        let expected = format!("\tx\ty\nx\t0.00\t{c}\ny\t{c}\t0.00\n", c = expected_cell);
        assert_eq!(text, expected);
    }

    #[test]
    fn test_reload_is_identity() {
        log_init_test();
        let text = "corner\tb\ta\nb\t0.00\t12.50\na\t12.50\t100.00\n";
        let m = IdentityMatrix::read_from(text.as_bytes(), "mem").unwrap();
        assert_eq!(m.get_corner(), "corner");
        assert_eq!(m.get_labels(), &["b".to_string(), "a".to_string()]);
        assert_eq!(m.get(1, 1), "100.00");
        let mut out = Vec::<u8>::new();
        m.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), text);
    }

    #[test]
    fn test_reload_errors() {
        assert!(matches!(IdentityMatrix::read_from("".as_bytes(), "mem"), Err(MatError::Format{..})));
        // short row
        let short = "\ta\tb\na\t1.00\t2.00\nb\t2.00\n";
        assert!(matches!(IdentityMatrix::read_from(short.as_bytes(), "mem"), Err(MatError::Format{..})));
        // missing row
        let missing = "\ta\tb\na\t1.00\t2.00\n";
        assert!(matches!(IdentityMatrix::read_from(missing.as_bytes(), "mem"), Err(MatError::Format{..})));
        // row label not matching header order
        let swapped = "\ta\tb\nb\t1.00\t2.00\na\t2.00\t1.00\n";
        assert!(matches!(IdentityMatrix::read_from(swapped.as_bytes(), "mem"), Err(MatError::Format{..})));
        // duplicate header label
        let dup = "\ta\ta\na\t1.00\t2.00\na\t2.00\t1.00\n";
        assert!(matches!(IdentityMatrix::read_from(dup.as_bytes(), "mem"), Err(MatError::DuplicateLabel{..})));
    }

    #[test]
    fn test_dump_reload_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mat.tsv");
        let mut scores = ScoreMap::new();
        scores.insert("g1", "g2", 88.8);
        let m = IdentityMatrix::from_scores(labels(&["g1", "g2", "g3"]), &scores);
        m.dump(&path).unwrap();
        let reloaded = IdentityMatrix::reload(&path).unwrap();
        assert_eq!(m, reloaded);
    }
} // end of mod tests
