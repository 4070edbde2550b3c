// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use qk_semantics::{analyze_source_file, AnalysisOptions};

#[derive(Parser)]
#[command(name = "semdemo")]
#[command(about = "Demo of the Qiskit script analyzer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Analyze without the Qiskit builtins in the global scope
    #[arg(long, global = true)]
    no_builtins: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the script and print the diagnostics
    Check {
        #[arg(value_name = "FILENAME")]
        file_name: PathBuf,
    },

    /// Print the folded statements of the script
    Ast {
        #[arg(value_name = "FILENAME")]
        file_name: PathBuf,
    },

    /// Print every version of every symbol, scope by scope
    Symbols {
        #[arg(value_name = "FILENAME")]
        file_name: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = AnalysisOptions {
        builtins: !cli.no_builtins,
        ..AnalysisOptions::default()
    };

    let file_name = match &cli.command {
        Some(Commands::Check { file_name })
        | Some(Commands::Ast { file_name })
        | Some(Commands::Symbols { file_name }) => file_name,
        None => {
            println!("Commands are check, ast, and symbols");
            return ExitCode::SUCCESS;
        }
    };

    let result = match analyze_source_file(file_name, &options) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Unable to read file {:?}: {}", file_name, err);
            return ExitCode::FAILURE;
        }
    };

    match &cli.command {
        Some(Commands::Ast { .. }) => {
            for statement in result.ast() {
                println!("{}", statement);
            }
        }
        Some(Commands::Symbols { .. }) => {
            let table = result.symbol_table();
            for scope in table.scopes() {
                println!(
                    "scope {} (depth {}, lines {}..{:?})",
                    scope.name(),
                    scope.depth(),
                    scope.opened_at(),
                    scope.closed_at()
                );
                let mut names: Vec<&str> = scope.names().collect();
                names.sort_unstable();
                for name in names {
                    for version in scope.versions(name) {
                        println!(
                            "  {:>4}  {}: {}",
                            version.defined_at(),
                            name,
                            version.symbol_type().name()
                        );
                    }
                }
            }
        }
        _ => {
            println!("Found {} diagnostics", result.diagnostics().len());
        }
    }

    if let Err(err) = result.print_errors() {
        eprintln!("Unable to print diagnostics: {}", err);
        return ExitCode::FAILURE;
    }
    if result.any_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
