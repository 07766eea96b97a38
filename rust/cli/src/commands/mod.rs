//! Command handlers, one module per subcommand.
//!
//! Each handler takes its resolved arguments plus the output streams
//! (`&mut dyn Write`) and returns `Result<(), CliError>`; [`crate::run`]
//! turns the result into an exit code.

pub mod cfg;
pub mod deal;
pub mod play;
pub mod sim;
pub mod stats;
pub mod table;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use play::{PlayOptions, handle_play_command};
pub use sim::{SimOptions, handle_sim_command};
pub use stats::handle_stats_command;
pub use table::{TableOptions, handle_table_command};

use crate::error::CliError;

/// Single-threaded runtime driving the async session layer.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?)
}
