//! Leaf order of a dendrogram given in nested parenthesis notation.
//!
//! Example : `(('a':0,'b':0):190.2486,('c':164.5815,'d':130.3324):25.66714);`
//!
//! The line is cut on runs of `(`, `)`, `,`, `;` and whitespace. In each piece the part before
//! the first `:` is a candidate label, surrounding single quotes are removed. Pieces with an empty
//! label (pure branch lengths as `:190.2486`) are skipped. Labels receive ranks 0, 1, ... in first
//! seen order, a label seen again keeps its first rank.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::errors::MatError;
use crate::utils::files::open_input;


fn is_separator(c : char) -> bool {
    matches!(c, '(' | ')' | ',' | ';') || c.is_whitespace()
}


// removes one pair of enclosing quotes, '' inside a quoted label stands for a single quote
fn unquote(s : &str) -> String {
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        s[1..s.len() - 1].replace("''", "'")
    }
    else {
        s.to_string()
    }
} // end of unquote


/// returns the label carried by a token if any
pub fn token_label(token : &str) -> Option<String> {
    let before_colon = token.split(':').next().unwrap_or("");
    let label = unquote(before_colon);
    if label.is_empty() {
        None
    }
    else {
        Some(label)
    }
} // end of token_label



/// The canonical order : leaf labels of the tree in first seen order.
#[derive(Clone, Debug, Default)]
pub struct DendroOrder {
    labels : Vec<String>,
    ranks : HashMap<String, usize>,
} // end of DendroOrder


impl DendroOrder {

    /// parses one line of tree notation. Fails if no label is found.
    pub fn from_newick(line : &str, input : &str) -> Result<Self, MatError> {
        let mut order = DendroOrder::default();
        for token in line.split(is_separator).filter(|t| !t.is_empty()) {
            match token_label(token) {
                Some(label) => {
                    if order.ranks.contains_key(&label) {
                        log::debug!("label {} already seen, keeping rank {}", label, order.ranks[&label]);
                        continue;
                    }
                    order.ranks.insert(label.clone(), order.labels.len());
                    order.labels.push(label);
                }
                None => {
                    log::trace!("skipping token {}", token);
                }
            }
        }
        if order.labels.is_empty() {
            return Err(MatError::format(input, 1, "no leaf label found in tree"));
        }
        log::info!("got {} leaf labels from tree {}", order.labels.len(), input);
        Ok(order)
    } // end of from_newick


    /// parses first line of reader
    pub fn read_from<R : BufRead>(mut reader : R, input : &str) -> Result<Self, MatError> {
        let mut line = String::new();
        reader.read_line(&mut line).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                MatError::format(input, 1, "tree line is not valid utf-8")
            }
            else {
                MatError::Io{ path : input.to_string(), source : e}
            }
        })?;
        DendroOrder::from_newick(&line, input)
    }


    pub fn from_file(path : &Path) -> Result<Self, MatError> {
        let reader = open_input(path)?;
        DendroOrder::read_from(reader, &path.display().to_string())
    }


    /// labels in canonical order
    pub fn get_labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get_nb_labels(&self) -> usize {
        self.labels.len()
    }

    /// canonical rank of label
    pub fn get_rank(&self, label : &str) -> Option<usize> {
        self.ranks.get(label).copied()
    }

} // end of impl DendroOrder


//=========================================================================================


// end of mod tests
