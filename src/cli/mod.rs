pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ExportFormat, FilterArgs};
pub use commands::{init_logging, run};
