use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

use pipmate::commands::{self, Action};
use pipmate::config::Config;
use pipmate::environment::{self, ResolvedEnvironment};
use pipmate::error::PipmateError;
use pipmate::runner::PipRunner;
use pipmate::youtube::TutorialFinder;

#[derive(Parser)]
#[command(name = "pipmate")]
#[command(about = "Python library & environment manager")]
#[command(version)]
struct Cli {
    /// Directory of the isolated virtual environment
    #[arg(short = 'e', long = "env", default_value = "venv")]
    env_dir: String,

    /// Path of the requirements manifest
    #[arg(short = 'm', long = "manifest", default_value = "requirements.txt")]
    manifest: String,

    /// YouTube API key for tutorial lookup (falls back to $YOUTUBE_API_KEY)
    #[arg(long = "api-key")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install packages (comma- or space-separated)
    Install {
        /// Packages to install, version specifiers allowed
        packages: Vec<String>,
    },
    /// Install everything from the manifest
    Sync,
    /// Snapshot installed packages into the manifest
    Freeze,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(PipmateError::PipNotFound(_)) = e.downcast_ref::<PipmateError>() {
            eprintln!("  The virtual environment may be corrupt or was not created properly.");
            eprintln!("  Delete the environment directory and run again to recreate it.");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.env_dir, cli.manifest, cli.api_key);

    // Fatal startup errors (missing interpreter or pip, failed environment
    // creation) surface here, before any command runs.
    let env = environment::resolve(&config)?;
    let runner = PipRunner::new(env.invocation.clone());
    let finder = TutorialFinder::new(config.api_key.clone());

    match cli.command {
        Some(Commands::Install { packages }) => {
            let targets = commands::parse_target_list(&packages.join(","));
            commands::dispatch(Action::Install(targets), &env, &config, &runner, &finder)
        }
        Some(Commands::Sync) => {
            commands::dispatch(Action::SyncManifest, &env, &config, &runner, &finder)
        }
        Some(Commands::Freeze) => {
            commands::dispatch(Action::FreezeManifest, &env, &config, &runner, &finder)
        }
        None => interactive_menu(&env, &config, &runner, &finder),
    }
}

fn interactive_menu(
    env: &ResolvedEnvironment,
    config: &Config,
    runner: &PipRunner,
    finder: &TutorialFinder,
) -> Result<()> {
    println!("{}", "=".repeat(50).cyan());
    println!("{}", "  Python Library & Environment Manager".cyan().bold());
    println!("{}", "=".repeat(50).cyan());

    loop {
        println!();
        println!("{}", "--- Menu ---".bold());
        println!("Environment: {}", env.describe(config).yellow());
        println!("1. Install new packages");
        println!(
            "2. Install all packages from {}",
            config.manifest_path.display()
        );
        println!(
            "3. Generate {} from current environment",
            config.manifest_path.display()
        );
        println!("4. Exit");

        let choice = match prompt("Enter your choice (1-4): ")? {
            Some(line) => line,
            None => break, // EOF behaves like exit
        };

        let action = match choice.as_str() {
            "1" => {
                let raw = match prompt("Packages to install (comma-separated): ")? {
                    Some(line) => line,
                    None => break,
                };
                Action::Install(commands::parse_target_list(&raw))
            }
            "2" => Action::SyncManifest,
            "3" => Action::FreezeManifest,
            "4" => break,
            _ => {
                println!("{} Invalid choice, pick a number from 1 to 4", "✗".red());
                continue;
            }
        };

        // Operation errors are reported and the session continues; only
        // startup errors are fatal.
        if let Err(e) = commands::dispatch(action, env, config, runner, finder) {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Print a prompt and read one trimmed line; `None` on EOF.
fn prompt(text: &str) -> io::Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
