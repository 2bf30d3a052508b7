//! idtmat builds a symmetric identity matrix from blast tabular output and reorders it along
//! the leaf order of a dendrogram.
//!
//! - blast2mat : labels of a fasta file + blast output -> symmetric identity matrix (tab separated)
//! - matreorder : matrix + dendrogram in parenthesis notation -> matrix in leaf order of the dendrogram
//!
//! Both binaries only communicate through the matrix file.

pub mod errors;
pub mod utils;

pub mod labels;
pub mod hits;
pub mod matrix;

pub mod dendro;
pub mod reorder;

pub use errors::MatError;
