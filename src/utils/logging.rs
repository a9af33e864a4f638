//! Logging setup and run-report helpers.

use std::fs;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Write the plain-text run log header.
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\nTest publish run - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

pub fn log_startup(api_base_url: &str, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 Experts15 test publisher");
    info!("🌐 API: {}", api_base_url);
    info!("📊 max concurrent drafts: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

pub fn log_drafts_loaded(total: usize, max_concurrent: usize) {
    info!("✓ found {} draft(s) to publish", total);
    info!("📋 processing in batches of {}\n", max_concurrent);
}

pub fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 batch {}/{}", batch_num, total_batches);
    info!("📄 drafts {}-{} of {}", start, end, total);
    info!("{}", "=".repeat(60));
}

pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ batch {} done: {}/{} published", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

pub fn print_final_stats(success: usize, failed: usize, total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 run complete at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("✅ published: {}/{}", success, total);
    info!("❌ failed: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\nrun log: {}", log_file_path);
}

/// Append one outcome line to the run log file.
pub fn append_run_log(log_file_path: &str, line: &str) -> Result<()> {
    use std::io::Write;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

/// Truncate long text for one-line log output.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
