//! Context note commands for CLI.

use clap::Subcommand;
use taskwise_core::{Config, SourceType};

use super::{block_on, open_workspace, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ContextAction {
    /// Analyze and store a note
    Add {
        /// Note text
        content: String,
        /// whatsapp, email or notes
        #[arg(long, default_value = "notes")]
        source: SourceType,
    },
    /// List stored notes, newest first
    List,
    /// Analyze a note without storing it
    Analyze {
        /// Note text
        content: String,
    },
    /// Suggested tasks from the stored notes
    Recommend,
}

pub fn run(action: ContextAction, config: &Config) -> CmdResult {
    let ws = open_workspace(config)?;

    match action {
        ContextAction::Add { content, source } => {
            let outcome = block_on(ws.add_context(&content, source))??;
            print_json(&outcome)?;
        }
        ContextAction::List => {
            print_json(&ws.list_context()?)?;
        }
        ContextAction::Analyze { content } => {
            let analysis = block_on(ws.preview_context(&content))?;
            print_json(&analysis)?;
        }
        ContextAction::Recommend => {
            let recommendations = block_on(ws.recommendations())??;
            print_json(&recommendations)?;
        }
    }
    Ok(())
}
