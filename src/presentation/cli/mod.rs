//! CLI module

mod commands;
mod output;

pub use commands::{Cli, Commands};
pub use output::{print_outcome, print_stats};
