//! `cfg`: prints the resolved configuration as JSON, each value with the
//! layer it came from (`default`, `file` or `env`).

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "match_target": {
            "value": config.match_target,
            "source": sources.match_target,
        },
        "difficulty": {
            "value": config.difficulty,
            "source": sources.difficulty,
        },
        "turn_timeout_secs": {
            "value": config.turn_timeout_secs,
            "source": sources.turn_timeout_secs,
        },
        "pace": {
            "value": config.pace,
            "source": sources.pace,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
