//! Extraction of entity labels from a fasta file.
//!
//! A label is the first whitespace delimited token of a record header, so a record
//! beginning with `>seqA desc text` gives label `seqA`.
//! The order of records in the file defines the row/column order of the built matrix.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::errors::MatError;
use crate::utils::files::open_input;


fn fasta_error(input : &str, e : impl std::fmt::Display) -> MatError {
    MatError::Fasta{ input : input.to_string(), msg : e.to_string() }
}


/// returns the label of a header, i.e its part up to first whitespace.
pub fn label_from_header(header : &[u8]) -> Option<String> {
    String::from_utf8_lossy(header).split_whitespace().next().map(String::from)
} // end of label_from_header



/// fails with MatError::DuplicateLabel on the first label occurring twice
pub fn check_unique(labels : &[String], input : &str) -> Result<(), MatError> {
    let mut seen = HashSet::<&str>::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            log::error!("label {} occurs more than once in {}", label, input);
            return Err(MatError::DuplicateLabel{ input : input.to_string(), label : label.clone() });
        }
    }
    Ok(())
} // end of check_unique



// a record starts with '>' at beginning of file or just after a newline
fn first_record_offset(data : &[u8]) -> Option<usize> {
    if data.first() == Some(&b'>') {
        return Some(0);
    }
    data.windows(2).position(|w| w == b"\n>").map(|p| p + 1)
}


fn is_gzipped(data : &[u8]) -> bool {
    data.starts_with(&[0x1f, 0x8b])
}


/// parses fasta records with needletail (possibly compressed input) and collects labels in file order.
/// In uncompressed input anything before the first line beginning with '>' is skipped.
/// Fastq records are rejected. input is the name used in error messages.
pub fn read_labels<R : Read>(mut reader : R, input : &str) -> Result<Vec<String>, MatError> {
    let mut data = Vec::<u8>::new();
    reader.read_to_end(&mut data).map_err(|e| MatError::Io{ path : input.to_string(), source : e})?;
    if !is_gzipped(&data) {
        match first_record_offset(&data) {
            Some(offset) => {
                if offset > 0 {
                    log::debug!("skipping {} bytes before first record of {}", offset, input);
                    data = data.split_off(offset);
                }
            }
            None => return Err(fasta_error(input, "no record beginning with '>' found")),
        }
    }
    //
    let mut parser = needletail::parse_fastx_reader(std::io::Cursor::new(data)).map_err(|e| fasta_error(input, e))?;
    let mut labels = Vec::<String>::new();
    while let Some(record) = parser.next() {
        let record = record.map_err(|e| fasta_error(input, e))?;
        if record.qual().is_some() {
            return Err(fasta_error(input, format!("record {} is a fastq record, expecting fasta", labels.len() + 1)));
        }
        match label_from_header(record.id()) {
            Some(label) => {
                log::trace!("got label {} at rank {}", label, labels.len());
                labels.push(label);
            }
            None => {
                return Err(fasta_error(input, format!("record {} has an empty header", labels.len() + 1)));
            }
        }
    }
    if labels.is_empty() {
        return Err(fasta_error(input, "no record found"));
    }
    check_unique(&labels, input)?;
    log::info!("read {} labels from {}", labels.len(), input);
    //
    Ok(labels)
} // end of read_labels


/// opens file and extracts labels
pub fn read_labels_file(path : &Path) -> Result<Vec<String>, MatError> {
    let reader = open_input(path)?;
    read_labels(reader, &path.display().to_string())
} // end of read_labels_file


//=========================================================================================


#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_label_truncated_at_whitespace() {
        log_init_test();
        let fasta = b">seqA desc text\nACGT\n>seqB\tother\nTTGA\nCC\n>seqC\nGGGG\n".to_vec();
        let labels = read_labels(std::io::Cursor::new(fasta), "mem").unwrap();
        assert_eq!(labels, vec!["seqA", "seqB", "seqC"]);
    }

    #[test]
    fn test_header_parsing() {
        assert_eq!(label_from_header(b"seqA desc text"), Some("seqA".to_string()));
        assert_eq!(label_from_header(b"GCF_000091165.1"), Some("GCF_000091165.1".to_string()));
        assert_eq!(label_from_header(b"   "), None);
    }

    #[test]
    fn test_duplicate_label_rejected() {
        log_init_test();
        let fasta = b">x first\nACGT\n>y\nACGT\n>x second\nACGT\n".to_vec();
        let res = read_labels(std::io::Cursor::new(fasta), "dup.fa");
        match res {
            Err(MatError::DuplicateLabel{ label, .. }) => assert_eq!(label, "x"),
            _ => panic!("duplicate label not detected"),
        }
    }

    #[test]
    fn test_label_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genomes.fa");
        std::fs::write(&path, ">g1 genome one\nACGTACGT\n>g2 genome two\nACGTTT\n").unwrap();
        let labels = read_labels_file(&path).unwrap();
        assert_eq!(labels, vec!["g1", "g2"]);
        //
        let missing = read_labels_file(&dir.path().join("none.fa"));
        assert!(matches!(missing, Err(MatError::Io{..})));
    }

    #[test]
    fn test_text_before_first_record_skipped() {
        log_init_test();
        let labels = read_labels("\n>a x\nAC\n".as_bytes(), "mem").unwrap();
        assert_eq!(labels, vec!["a"]);
        let labels = read_labels("junk line\nmore > junk\n>a x\nAC\n>b\nGT\n".as_bytes(), "mem").unwrap();
        assert_eq!(labels, vec!["a", "b"]);
        let res = read_labels("no marker here\n".as_bytes(), "mem");
        assert!(matches!(res, Err(MatError::Fasta{..})));
    }

    #[test]
    fn test_fastq_rejected() {
        let res = read_labels("@a\nAC\n+\nII\n".as_bytes(), "mem");
        assert!(matches!(res, Err(MatError::Fasta{..})));
        let res = read_labels("\n@a\nAC\n+\nII\n".as_bytes(), "mem");
        assert!(matches!(res, Err(MatError::Fasta{..})));
    }
} // end of mod tests
