pub mod correct;
pub mod score;

use crate::utils::Result;
use rayon::ThreadPoolBuilder;
use std::io::Write;

/// Pool evaluating primer sets concurrently; each task still runs its
/// external tools with their own thread count.
fn initialize_thread_pool(num_jobs: usize) -> Result<rayon::ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_jobs)
        .thread_name(|i| format!("prim-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}

fn write_reports(writer: &mut dyn Write, reports: &[String]) -> Result<()> {
    for report in reports {
        writer
            .write_all(report.as_bytes())
            .map_err(|e| format!("Failed to write report: {}", e))?;
    }
    writer
        .flush()
        .map_err(|e| format!("Failed to write report: {}", e))
}
