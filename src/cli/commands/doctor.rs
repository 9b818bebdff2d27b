//! Doctor command - verify credentials and endpoint configuration.

use crate::cli::Output;
use crate::config::{Settings, ACCESS_TOKEN_ENV};
use console::style;
use url::Url;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Artha Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let key_check = check_openai_api_key();
    key_check.print();
    checks.push(key_check);

    let token_check = check_access_token(settings);
    token_check.print();
    checks.push(token_check);

    println!();

    println!("{}", style("Retrieval Endpoints").bold());
    let endpoint_checks = check_endpoints(settings);
    for check in &endpoint_checks {
        check.print();
    }
    checks.extend(endpoint_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Artha.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Artha is ready to use.");
    }

    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check if the retrieval access token is configured.
fn check_access_token(settings: &Settings) -> CheckResult {
    match settings.retrieval.resolve_access_token() {
        Ok(token) => {
            let masked = mask_token(&token);
            CheckResult::ok("Access token", &format!("configured ({})", masked))
        }
        Err(_) => CheckResult::error(
            "Access token",
            "not configured",
            &format!(
                "Set {} or retrieval.access_token in the config file",
                ACCESS_TOKEN_ENV
            ),
        ),
    }
}

/// Check both retrieval endpoints for URL validity.
fn check_endpoints(settings: &Settings) -> Vec<CheckResult> {
    vec![
        check_endpoint("SQL endpoint", &settings.retrieval.sql_endpoint),
        check_endpoint("Vector endpoint", &settings.retrieval.vector_endpoint),
    ]
}

fn check_endpoint(name: &str, endpoint: &str) -> CheckResult {
    match Url::parse(endpoint) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            CheckResult::ok(name, endpoint)
        }
        Ok(url) => CheckResult::error(
            name,
            &format!("unsupported scheme '{}'", url.scheme()),
            "Endpoints must use http or https",
        ),
        Err(e) => CheckResult::error(
            name,
            &format!("invalid URL: {}", e),
            "Fix the endpoint in the [retrieval] section of the config file",
        ),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: artha init (or artha config edit)",
        )
    }
}

/// Mask a secret for display, keeping only the edges.
fn mask_token(token: &str) -> String {
    if token.len() <= 6 {
        "*".repeat(token.len())
    } else {
        format!("{}...{}", &token[..3], &token[token.len() - 2..])
    }
}
