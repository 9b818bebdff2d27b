//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::{Settings, ACCESS_TOKEN_ENV};
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Artha Setup");
    println!();
    println!("Welcome to Artha! Let's make sure everything is configured correctly.\n");

    // Step 1: OpenAI key
    println!("{}", style("Step 1: Checking OpenAI API key").bold().cyan());
    println!();

    if std::env::var("OPENAI_API_KEY").is_err() {
        Output::warning("OPENAI_API_KEY environment variable is not set.");
        println!();
        println!("  Artha uses an OpenAI model to decide which retrieval tool to call.");
        println!(
            "  Get your API key from: {}",
            style("https://platform.openai.com/api-keys").underlined()
        );
        println!();
        println!("  Set it in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        println!("  {}", style("export OPENAI_API_KEY='sk-...'").green());
        println!();

        if !prompt_continue("Continue without API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'artha init' again.");
            return Ok(());
        }
    } else {
        Output::success("OpenAI API key is configured!");
    }

    println!();

    // Step 2: Retrieval access token
    println!("{}", style("Step 2: Checking retrieval access token").bold().cyan());
    println!();

    if settings.retrieval.resolve_access_token().is_err() {
        Output::warning("No retrieval access token configured.");
        println!();
        println!("  The SQL and document-search services share one static secret.");
        println!("  Either export it:");
        println!("  {}", style(format!("export {}='...'", ACCESS_TOKEN_ENV)).green());
        println!("  or set retrieval.access_token in the config file.");
        println!();

        if !prompt_continue("Continue without access token?")? {
            println!();
            Output::info("Setup cancelled. Configure the token and run 'artha init' again.");
            return Ok(());
        }
    } else {
        Output::success("Retrieval access token is configured!");
    }

    println!();

    // Step 3: Config file
    println!("{}", style("Step 3: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("artha config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check configuration status", style("artha doctor").cyan());
    println!(
        "  {} Ask a one-shot question",
        style("artha ask \"What is India's GDP in 2023?\"").cyan()
    );
    println!("  {} Start an interactive session", style("artha chat").cyan());
    println!();
    println!("For more help: {}", style("artha --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}
