use serde::Serialize;
use taskwise_core::{Config, ContextStats, Dashboard};

use super::{open_workspace, print_json, CmdResult};

#[derive(Serialize)]
struct Report {
    tasks: Dashboard,
    context: ContextStats,
}

pub fn run(config: &Config) -> CmdResult {
    let ws = open_workspace(config)?;
    print_json(&Report {
        tasks: ws.dashboard()?,
        context: ws.context_stats()?,
    })
}
