//! structures related to processing parameters


/// a structure to filter alignment records we treat
#[derive(Copy, Clone, Debug)]
pub struct AlnFilterParams {
    /// minimum alignment length, records strictly below are discarded
    pub min_aln_len : usize,
} // end of struct AlnFilterParams


impl AlnFilterParams {
    pub fn new(min_aln_len : usize) -> Self {
        AlnFilterParams{min_aln_len}
    } // end of new

    /// a negative threshold keeps every record, as 0 does
    pub fn from_signed(min_aln_len : i64) -> Self {
        if min_aln_len < 0 {
            log::info!("negative minimum alignment length {}, keeping all records", min_aln_len);
        }
        AlnFilterParams::new(min_aln_len.max(0) as usize)
    }

    /// returns true if we filter (garbage the record)
    pub fn filter(&self, aln_len : usize) -> bool {
        aln_len < self.min_aln_len
    }

    pub fn get_min_aln_len(&self) -> usize {
        self.min_aln_len
    }
}  // end of AlnFilterParams


impl Default for AlnFilterParams {
    /// keeps everything
    fn default() -> Self {
        AlnFilterParams{min_aln_len : 0}
    }
} // end of default for AlnFilterParams


//=========================================================================================


// end of mod tests
