use crate::utils::Result;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

/// Path standing for standard input or standard output.
pub const STDIO_PATH: &str = "-";

pub fn create_writer(output_path: Option<&Path>) -> Result<Box<dyn Write>> {
    match output_path {
        Some(path) if path.as_os_str() != STDIO_PATH => {
            let file = File::create(path)
                .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}
