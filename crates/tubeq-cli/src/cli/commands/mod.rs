//! CLI command handlers, one file per subcommand.

mod completions;
mod init;
mod list;
mod man;
mod run;

pub use completions::run_completions;
pub use init::run_init;
pub use list::run_list;
pub use man::run_man;
pub use run::run_queue;
