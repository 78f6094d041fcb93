//! cc - endpoint switcher for the claude CLI
//!
//! Without a subcommand the wrapped program is launched and its exit status
//! becomes ours. Every other command manages the candidate URL list or the
//! program's settings file.

use cc_config::{
    app::App,
    cli::Cli,
    config::{display_config_summary, load_config},
    error::{ErrorReporter, Result},
    BUILD_TIME, GIT_COMMIT, PKG_NAME, VERSION,
};
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue with the command you ran.");
        process::exit(99);
    }));

    let cli = Cli::parse();
    let use_color = cli.use_colors();
    let verbose = cli.verbose || cli.debug;
    colored::control::set_override(use_color);

    if let Err(e) = run_application(cli).await {
        ErrorReporter::new(use_color, verbose).report_error(&e);
        process::exit(e.exit_code());
    }
}

async fn run_application(cli: Cli) -> Result<()> {
    // Diagnostics go to stderr so stdout stays parseable
    if cli.debug {
        eprintln!("{} v{} ({}, built {})", PKG_NAME, VERSION, GIT_COMMIT, BUILD_TIME);
    }

    let command = cli.command.clone();
    let command_name = cli.command_name();
    let config = load_config(cli)?;

    if config.debug {
        eprintln!("Configuration loaded successfully ({}):", command_name);
        for line in display_config_summary(&config).lines() {
            eprintln!("  {}", line);
        }
        eprintln!();
    }

    App::new(config, command).run().await
}
