use super::{Result, STDIO_PATH};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufReader, Read as ioRead};
use std::path::Path;

/// Opens a report, listing or FASTA input; `-` reads standard input and
/// `.gz` files are decompressed on the fly.
pub fn open_input_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    fn is_gzipped(path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
    if path.as_os_str() == STDIO_PATH {
        return Ok(BufReader::new(Box::new(io::stdin())));
    }
    let file = File::open(path).map_err(|e| format!("File {}: {}", path.display(), e))?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(format!("Invalid gzip header: {}", path.to_string_lossy()))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

pub fn read_input_to_string(path: &Path) -> Result<String> {
    let mut reader = open_input_reader(path)?;
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
    Ok(text)
}
