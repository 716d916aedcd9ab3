//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tasklist_core` linkage.
//! - Report the configured store location and its counts.

use std::process::ExitCode;
use tasklist_core::{open_store, StoreConfig};

fn main() -> ExitCode {
    println!("tasklist_core ping={}", tasklist_core::ping());
    println!("tasklist_core version={}", tasklist_core::core_version());
    println!(
        "tasklist_core default_log_level={}",
        tasklist_core::default_log_level()
    );

    let config = StoreConfig::from_env();
    println!("store db_path={}", config.db_path.display());
    println!("store key={}", config.storage_key);

    match open_store(&config) {
        Ok(store) => {
            let stats = store.stats();
            println!(
                "store total={} active={} completed={}",
                stats.total, stats.active, stats.completed
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("store open failed: {err}");
            ExitCode::FAILURE
        }
    }
}
