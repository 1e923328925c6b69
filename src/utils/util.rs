pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}

/// Number of CPUs the process may use, used as the default for external tool threads.
pub fn available_threads() -> usize {
    num_cpus::get()
}
