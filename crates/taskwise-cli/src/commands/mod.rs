pub mod category;
pub mod config;
pub mod context;
pub mod lexicon;
pub mod stats;
pub mod task;

use serde::Serialize;
use std::future::Future;
use taskwise_core::{Config, SqliteStore, Workspace};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Opens the default store with the configured analysis latency.
pub fn open_workspace(config: &Config) -> Result<Workspace<SqliteStore>, Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    Ok(Workspace::new(store).with_latency(config.simulated_latency()))
}

/// Drives an async workflow step to completion on a single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    Ok(runtime.block_on(future))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
