//! Multi-threaded logging example
//!
//! Two worker threads and the main thread share one logger. Each thread's
//! records appear in its own submission order; the interleaving between
//! threads is unspecified.
//!
//! Run with: cargo run --example multi_threaded

use rotalog::prelude::*;
use rotalog::{error, info, warning};
use std::thread;

fn main() -> Result<()> {
    println!("=== rotalog - Multi-threaded Example ===\n");

    let logger = Logger::init("my_app_logs.txt", Severity::Info)?;

    logger.info("Main thread: Application started");
    logger.warning("Disk space low");
    logger.error("Fatal error occurred");

    thread::scope(|s| {
        s.spawn(|| {
            info!(logger, "Thread {}: Startup", 1);
            error!(logger, "Thread {}: Something went wrong", 1);
        });
        s.spawn(|| {
            warning!(logger, "Thread {}: Caution message", 2);
            info!(logger, "Thread {}: Done", 2);
        });
    });

    logger.info("Main thread: Done");
    logger.shutdown();

    let metrics = logger.metrics();
    println!(
        "\nWrote {} records to {} ({} rotations)",
        metrics.written(),
        logger.path().display(),
        metrics.rotations()
    );

    Ok(())
}
