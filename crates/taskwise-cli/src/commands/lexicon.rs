use taskwise_core::Lexicon;

use super::{print_json, CmdResult};

pub fn run() -> CmdResult {
    print_json(Lexicon::builtin())
}
