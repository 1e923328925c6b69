mod io_utils;
mod readers;
mod util;

pub use io_utils::{create_writer, STDIO_PATH};
pub use readers::{open_input_reader, read_input_to_string};
pub use util::{available_threads, handle_error_and_exit, Result};
