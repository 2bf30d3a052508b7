//! matreorder input_matrix tree_file output_matrix
//!
//! Reorders rows and columns of a matrix produced by blast2mat in the leaf order of a dendrogram.
//! The tree file first line is the dendrogram in parenthesis notation, for example
//! `(('a':0,'b':0):190.2486,'c':164.5815);`.
//! Tree labels and matrix labels must be the same set.

use anyhow::Context;
use clap::{Arg, Command};
use cpu_time::ProcessTime;
use std::path::Path;

use env_logger::Builder;

use idtmat::dendro::DendroOrder;
use idtmat::matrix::IdentityMatrix;
use idtmat::reorder::reorder;


// install a logger facility
pub fn init_log() -> u64 {
    Builder::from_default_env().init();
    println!("\n ************** initializing logger *****************\n");
    1
}


fn main() -> anyhow::Result<()> {
    let _ = init_log();
    let start_t = chrono::Local::now();
    log::info!("matreorder begins at time:{:#?}", start_t);
    let cpu_start = ProcessTime::now();
    //
    let matches = Command::new("matreorder")
        .version("0.1.0")
        .about("Reorders an identity matrix along the leaves of a dendrogram")
        .arg(Arg::new("input_matrix")
            .help("matrix as written by blast2mat")
            .required(true)
            .value_parser(clap::value_parser!(String)))
        .arg(Arg::new("tree_file")
            .help("file containing the dendrogram on its first line")
            .required(true)
            .value_parser(clap::value_parser!(String)))
        .arg(Arg::new("output_matrix")
            .help("file where the reordered matrix is written")
            .required(true)
            .value_parser(clap::value_parser!(String)))
        .get_matches();

    let input_matrix = matches.get_one::<String>("input_matrix").unwrap();
    let tree_file = matches.get_one::<String>("tree_file").unwrap();
    let output_matrix = matches.get_one::<String>("output_matrix").unwrap();
    //
    let matrix = IdentityMatrix::reload(Path::new(input_matrix))
        .with_context(|| format!("reading matrix {}", input_matrix))?;
    let order = DendroOrder::from_file(Path::new(tree_file))
        .with_context(|| format!("reading tree {}", tree_file))?;
    let reordered = reorder(&matrix, &order)
        .with_context(|| format!("matching labels of tree {} and matrix {}", tree_file, input_matrix))?;
    reordered.dump(Path::new(output_matrix))
        .with_context(|| format!("writing matrix to {}", output_matrix))?;
    //
    log::info!("matreorder done, cpu time(s) : {}", cpu_start.elapsed().as_secs());
    println!("reordered matrix written in {}", output_matrix);
    Ok(())
} // end of main
