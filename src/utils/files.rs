//! This file contains opening of inputs and safe creation of output files.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::MatError;


/// opens a file for buffered reading, errors carry the path
pub fn open_input(path : &Path) -> Result<BufReader<File>, MatError> {
    log::trace!("opening input file {}", path.display());
    let file = File::open(path).map_err(|e| MatError::io(path, e))?;
    Ok(BufReader::new(file))
} // end of open_input


// the sibling file in which output is written before being renamed to its final name
fn partial_path(path : &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}


/// writes a file through function writer_task.
/// The content goes to a sibling file `<name>.part`, which is renamed to path only when
/// writer_task succeeded and data is flushed. On error the partial file is removed so no
/// output that looks complete is left behind.
pub fn dump_to_file<F>(path : &Path, writer_task : F) -> Result<(), MatError>
    where F : FnOnce(&mut BufWriter<File>) -> std::io::Result<()> {
    //
    let part = partial_path(path);
    log::debug!("dump_to_file writing in {}", part.display());
    let fileres = OpenOptions::new().write(true).create(true).truncate(true).open(&part);
    let file = match fileres {
        Ok(file) => file,
        Err(e) => {
            log::error!("dump_to_file could not open file {}", part.display());
            return Err(MatError::io(&part, e));
        }
    };
    let mut writer = BufWriter::new(file);
    let res = writer_task(&mut writer).and_then(|_| writer.flush());
    drop(writer);
    if let Err(e) = res {
        let _ = fs::remove_file(&part);
        return Err(MatError::io(path, e));
    }
    fs::rename(&part, path).map_err(|e| MatError::io(path, e))?;
    log::info!("dumped file {}", path.display());
    //
    Ok(())
} // end of dump_to_file


//=========================================================================================


// end of mod tests
