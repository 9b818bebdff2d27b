//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            set_value(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
            Output::info(&format!(
                "Saved to {}",
                Settings::default_config_path().display()
            ));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor).arg(&config_path).status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a dotted-key assignment to the settings.
fn set_value(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.log_level" => settings.general.log_level = value.to_string(),
        "retrieval.sql_endpoint" => settings.retrieval.sql_endpoint = value.to_string(),
        "retrieval.vector_endpoint" => settings.retrieval.vector_endpoint = value.to_string(),
        "retrieval.access_token" => settings.retrieval.access_token = Some(value.to_string()),
        "retrieval.sql_timeout_secs" => settings.retrieval.sql_timeout_secs = parse(key, value)?,
        "retrieval.vector_timeout_secs" => settings.retrieval.vector_timeout_secs = parse(key, value)?,
        "agent.model" => settings.agent.model = value.to_string(),
        "agent.max_iterations" => settings.agent.max_iterations = parse(key, value)?,
        "agent.require_both_tools" => settings.agent.require_both_tools = parse(key, value)?,
        _ => anyhow::bail!(
            "Unknown config key '{}'. Use 'artha config show' to list available keys.",
            key
        ),
    }
    Ok(())
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))
}
