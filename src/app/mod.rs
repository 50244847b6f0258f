pub mod cli;
pub mod menu;

pub use cli::{Cli, Commands, ReportKind};
pub use menu::{render_menu, run_interactive, MenuChoice, MenuHandler, MenuOutcome};
