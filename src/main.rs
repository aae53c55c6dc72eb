mod commands;
mod config;
mod context;
mod diagnostics;
mod error;
mod indexer;
mod resolver;
mod scanner;
mod types;
mod watch;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "yiinav", about = "Convention-based code navigation for legacy Yii 1.x projects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the action methods defined in a controller file
    Actions {
        /// The PHP controller file to inspect
        file: String,
    },
    /// List behavior classes declared under a directory
    Behaviors {
        /// Directory to index (defaults to the protected directory)
        dir: Option<String>,
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Diagnose every reference in a file or the whole project
    Check {
        /// File or directory to check (defaults to the protected directory)
        path: Option<String>,
    },
    /// List classes declared under a directory
    Classes {
        /// Directory to index (defaults to the protected directory)
        dir: Option<String>,
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve one reference literal from the position of a file
    Resolve {
        /// The PHP file the reference appears in
        file: String,
        /// The quoted literal, as written in the source
        literal: String,
        /// Reference kind: view, partial, layout, import, route, behavior
        #[arg(long, default_value = "view")]
        kind: String,
    },
    /// List every symbolic reference found in a PHP file
    Scan {
        /// The PHP file to scan
        file: String,
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-run check whenever a PHP source file changes
    Watch,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    return match cli.command {
        Commands::Actions { file } => run_unit(commands::actions(&file)),
        Commands::Behaviors { dir, json } => run_unit(commands::classes(dir.as_deref(), true, json)),
        Commands::Check { path } => run_coded(commands::check(path.as_deref())),
        Commands::Classes { dir, json } => run_unit(commands::classes(dir.as_deref(), false, json)),
        Commands::Resolve { file, literal, kind } => {
            run_unit(commands::resolve(&file, &literal, &kind))
        },
        Commands::Scan { file, json } => run_unit(commands::scan(&file, json)),
        Commands::Watch => run_coded(watch::run()),
    };
}

/// Map a unit command result onto success/failure exit codes.
fn run_unit(result: Result<(), error::Error>) -> ExitCode {
    return match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    };
}

/// Pass a command's own exit code through, mapping errors to failure.
fn run_coded(result: Result<ExitCode, error::Error>) -> ExitCode {
    return match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    };
}
