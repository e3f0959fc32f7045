//! `gantry config`: inspect the assembled configuration.

use crate::{
    cli::{ConfigCommands, DumpFormat},
    config::Bootstrap,
    error::{CliError, CliResult},
    output::OutputManager,
};
use gantry_core::domain::AppConfig;

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, bootstrap: &Bootstrap, output: &OutputManager) -> CliResult<u8> {
    match cmd {
        ConfigCommands::Show { console, format } => {
            let config = if console {
                bootstrap.console_config()?
            } else {
                bootstrap.web_config()?
            };
            let text = render(&config, format)?;
            output.raw(&text)?;
            if !text.ends_with('\n') {
                output.raw("\n")?;
            }
        }

        ConfigCommands::Path => {
            let path = bootstrap
                .origin()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            output.raw(&format!("{path}\n"))?;
        }
    }

    Ok(0)
}

/// Serialise `config`; secrets are redacted by its `Serialize` impl.
fn render(config: &AppConfig, format: DumpFormat) -> CliResult<String> {
    match format {
        DumpFormat::Toml => toml::to_string_pretty(config).map_err(|e| CliError::Render {
            message: format!("Failed to serialise config as TOML: {e}"),
        }),
        DumpFormat::Json => serde_json::to_string_pretty(config).map_err(|e| CliError::Render {
            message: format!("Failed to serialise config as JSON: {e}"),
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
