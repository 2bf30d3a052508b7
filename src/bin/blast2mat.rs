//! blast2mat label_file blast_file output_matrix min_aln_len
//!
//! - label_file : fasta file (possibly gzipped), labels are first word of headers. They give row/column order.
//! - blast_file : blast tabular output (-outfmt 6 or 7), fields query, subject, identity, alignment length ...
//! - output_matrix : tab separated symmetric matrix of identities
//! - min_aln_len : records with alignment length strictly below are ignored
//!
//! Log level is set with RUST_LOG.

use anyhow::Context;
use clap::{Arg, Command};
use cpu_time::ProcessTime;
use std::path::Path;

// for logging (debug mostly, switched at compile time in cargo.toml)
use env_logger::Builder;

use idtmat::hits::ScoreMap;
use idtmat::labels::read_labels_file;
use idtmat::matrix::IdentityMatrix;
use idtmat::utils::AlnFilterParams;


// install a logger facility
pub fn init_log() -> u64 {
    Builder::from_default_env().init();
    println!("\n ************** initializing logger *****************\n");
    1
}


fn main() -> anyhow::Result<()> {
    let _ = init_log();
    let start_t = chrono::Local::now();
    log::info!("blast2mat begins at time:{:#?}", start_t);
    let cpu_start = ProcessTime::now();
    //
    let matches = Command::new("blast2mat")
        .version("0.1.0")
        .about("Symmetric identity matrix from blast tabular output")
        .arg(Arg::new("label_file")
            .help("fasta file giving labels, in matrix order")
            .required(true)
            .value_parser(clap::value_parser!(String)))
        .arg(Arg::new("blast_file")
            .help("blast tabular output")
            .required(true)
            .value_parser(clap::value_parser!(String)))
        .arg(Arg::new("output_file")
            .help("file where the matrix is written")
            .required(true)
            .value_parser(clap::value_parser!(String)))
        .arg(Arg::new("min_aln_len")
            .help("minimum alignment length of a record to be kept, negative keeps all")
            .required(true)
            .allow_negative_numbers(true)
            .value_parser(clap::value_parser!(i64)))
        .get_matches();

    // required args, clap has checked presence
    let label_file = matches.get_one::<String>("label_file").unwrap();
    let blast_file = matches.get_one::<String>("blast_file").unwrap();
    let output_file = matches.get_one::<String>("output_file").unwrap();
    let min_aln_len = *matches.get_one::<i64>("min_aln_len").unwrap();
    log::info!("labels : {}, blast : {}, output : {}, min_aln_len : {}", label_file, blast_file, output_file, min_aln_len);
    //
    let labels = read_labels_file(Path::new(label_file))
        .with_context(|| format!("reading labels from {}", label_file))?;
    let filter_params = AlnFilterParams::from_signed(min_aln_len);
    let scores = ScoreMap::from_file(Path::new(blast_file), &filter_params)
        .with_context(|| format!("reading alignments from {}", blast_file))?;
    let matrix = IdentityMatrix::from_scores(labels, &scores);
    matrix.dump(Path::new(output_file))
        .with_context(|| format!("writing matrix to {}", output_file))?;
    //
    log::info!("blast2mat done, nb labels : {}, cpu time(s) : {}", matrix.get_nb_labels(), cpu_start.elapsed().as_secs());
    println!("matrix of {} labels written in {}", matrix.get_nb_labels(), output_file);
    Ok(())
} // end of main
