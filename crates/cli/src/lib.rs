pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "smartedu",
    about = "SmartEdu assistant operator CLI",
    long_about = "Inspect configuration, check backend readiness, and run single assistant actions.",
    after_help = "Examples:\n  smartedu doctor --json\n  smartedu config\n  smartedu invoke action_get_hods --role principal --token <jwt>"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and check that the backend answers")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run one action against the configured backend and print the reply")]
    Invoke(commands::invoke::InvokeArgs),
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Invoke(args) => commands::invoke::run(args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
