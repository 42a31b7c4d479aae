//! Category commands for CLI.

use clap::Subcommand;
use taskwise_core::storage::SqliteStore;
use taskwise_core::{NewCategory, Workspace};

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories, most used first
    List,
    /// Create a category
    Add {
        /// Category name
        name: String,
        /// Display color (default: #3b82f6)
        #[arg(long)]
        color: Option<String>,
    },
}

pub fn run(action: CategoryAction) -> CmdResult {
    let ws = Workspace::new(SqliteStore::open()?);

    match action {
        CategoryAction::List => {
            print_json(&ws.list_categories()?)?;
        }
        CategoryAction::Add { name, color } => {
            let mut draft = NewCategory::new(name);
            if let Some(color) = color {
                draft = draft.color(color);
            }
            print_json(&ws.add_category(&draft)?)?;
        }
    }
    Ok(())
}
