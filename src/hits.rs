//! Reading of blast tabular output and folding of alignment records into a pairwise score map.
//!
//! Fields used are 0 (query), 1 (subject), 2 (percent identity), 3 (alignment length).
//! Other fields are ignored, so `-outfmt 6` and `-outfmt 7` (comment lines beginning by '#') are both accepted.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::errors::MatError;
use crate::utils::files::open_input;
use crate::utils::parameters::AlnFilterParams;


/// One line of blast output, restricted to what we need.
#[derive(Clone, Debug, PartialEq)]
pub struct AlnRecord {
    pub query : String,
    pub subject : String,
    /// percent identity, in [0, 100]
    pub identity : f64,
    /// number of aligned positions
    pub aln_len : usize,
}


impl AlnRecord {
    pub fn new(query : &str, subject : &str, identity : f64, aln_len : usize) -> Self {
        AlnRecord{ query : query.to_string(), subject : subject.to_string(), identity, aln_len}
    }

    /// decodes a tab separated record, line is used for error messages
    pub fn from_fields(record : &csv::StringRecord, input : &str, line : u64) -> Result<Self, MatError> {
        if record.len() < 4 {
            return Err(MatError::format(input, line, format!("expected at least 4 tab separated fields, got {}", record.len())));
        }
        let identity_str = record[2].trim();
        let identity = match identity_str.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                return Err(MatError::format(input, line, format!("identity field is not a number : {:?}", identity_str)));
            }
        };
        let len_str = record[3].trim();
        let aln_len = len_str.parse::<usize>().map_err(|_| {
            MatError::format(input, line, format!("alignment length is not a non negative integer : {:?}", len_str))
        })?;
        //
        Ok(AlnRecord::new(&record[0], &record[1], identity, aln_len))
    } // end of from_fields

} // end of impl AlnRecord


//======================================================================================


/// Maps query -> subject -> identity.
///
/// Lookups never create entries; absence of a pair is reported as None.
/// Inserting a pair already present replaces the previous value (the last record read wins).
#[derive(Clone, Debug, Default)]
pub struct ScoreMap {
    scores : HashMap<String, HashMap<String, f64>>,
    nb_pairs : usize,
}


impl ScoreMap {
    pub fn new() -> Self {
        ScoreMap::default()
    }

    /// stores identity for (query, subject), returns previous value if any
    pub fn insert(&mut self, query : &str, subject : &str, identity : f64) -> Option<f64> {
        let previous = self.scores.entry(query.to_string()).or_default().insert(subject.to_string(), identity);
        if previous.is_none() {
            self.nb_pairs += 1;
        }
        previous
    } // end of insert

    pub fn get(&self, query : &str, subject : &str) -> Option<f64> {
        self.scores.get(query).and_then(|subjects| subjects.get(subject)).copied()
    }

    /// mean of both directions if both are present, else the one present, None if none is.
    pub fn symmetric_identity(&self, a : &str, b : &str) -> Option<f64> {
        match (self.get(a, b), self.get(b, a)) {
            (Some(ab), Some(ba)) => Some((ab + ba) / 2.),
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        }
    } // end of symmetric_identity

    /// number of distinct (query, subject) pairs stored
    pub fn get_nb_pairs(&self) -> usize {
        self.nb_pairs
    }

    /// iterates on all labels appearing as query or subject (possibly twice)
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.scores.iter().flat_map(|(q, subjects)| std::iter::once(q.as_str()).chain(subjects.keys().map(|s| s.as_str())))
    }

    /// folds records in order, dropping those filtered by params.
    pub fn from_records<I>(records : I, params : &AlnFilterParams) -> Self
        where I : IntoIterator<Item = AlnRecord> {
        let mut map = ScoreMap::new();
        for record in records {
            if !params.filter(record.aln_len) {
                map.insert(&record.query, &record.subject, record.identity);
            }
        }
        map
    } // end of from_records


    /// parses blast tabular output. All records are decoded (a malformed record below length threshold is still an error),
    /// then those with alignment length below params.min_aln_len are dropped.
    pub fn read_from<R : Read>(reader : R, input : &str, params : &AlnFilterParams) -> Result<Self, MatError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .from_reader(reader);
        //
        let mut map = ScoreMap::new();
        let mut record = csv::StringRecord::new();
        let mut nb_read : usize = 0;
        let mut nb_filtered : usize = 0;
        let mut nb_replaced : usize = 0;
        loop {
            match rdr.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => return Err(MatError::from_csv(input, e)),
            }
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let aln = AlnRecord::from_fields(&record, input, line)?;
            nb_read += 1;
            if params.filter(aln.aln_len) {
                nb_filtered += 1;
                if log::log_enabled!(log::Level::Trace) {
                    log::trace!("line {} filtered out, aln len {} < {}", line, aln.aln_len, params.get_min_aln_len());
                }
                continue;
            }
            if map.insert(&aln.query, &aln.subject, aln.identity).is_some() {
                nb_replaced += 1;
            }
        }
        log::info!("{} : nb records read {}, filtered (aln len < {}) {}, replacing a previous record {}, nb pairs {}",
                input, nb_read, params.get_min_aln_len(), nb_filtered, nb_replaced, map.get_nb_pairs());
        //
        Ok(map)
    } // end of read_from


    pub fn from_file(path : &Path, params : &AlnFilterParams) -> Result<Self, MatError> {
        let reader = open_input(path)?;
        ScoreMap::read_from(reader, &path.display().to_string(), params)
    }

} // end of impl ScoreMap


//=========================================================================================


// end of mod tests
