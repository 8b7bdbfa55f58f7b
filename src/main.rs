use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use wrench::scanner::Scanner;
use wrench::session::Session;
use wrench::token::Token;

#[derive(ClapParser, Debug)]
#[command(version, about = "Wrench language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Emit the token stream as JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },

    /// Runs input from a file as a Wrench program
    Run { filename: Option<PathBuf> },

    /// Starts an interactive session reading input from stdin
    Repl,
}

/// Reads the contents of a file into a String.
fn read_file(filename: PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = String::new();

    let bytes = reader
        .read_to_string(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Write to file with module path and source line; RUST_LOG overrides the level.
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("wrench::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// 65 for static (scan/parse/resolve) failures, 70 once execution began.
fn exit_code(diagnostics: &wrench::diagnostics::Diagnostics) -> i32 {
    if diagnostics.had_runtime_error() {
        70
    } else {
        65
    }
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        // Minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename, json } => match filename {
            Some(filename) => {
                info!("Running Tokenize subcommand");
                let buf = read_file(filename)?;
                let mut tokens: Vec<Token> = Vec::new();
                let mut tokenized = true;

                for item in Scanner::new(buf.as_bytes()) {
                    match item {
                        Ok(token) => {
                            debug!("Scanned token: {}", token);
                            tokens.push(token);
                        }

                        Err(e) => {
                            tokenized = false;

                            debug!("Tokenization debug: {}", e);

                            eprintln!("{}", e);
                        }
                    }
                }

                if json {
                    println!("{}", serde_json::to_string_pretty(&tokens)?);
                } else {
                    for token in &tokens {
                        println!("{}", token);
                    }
                }

                if !tokenized {
                    debug!("Tokenization failed, exiting with code 65");

                    std::process::exit(65);
                }

                info!("Tokenization completed successfully");
            }
            None => {
                info!("No filepath provided for Tokenize");

                println!("No input filepath was provided. Exiting...");

                std::process::exit(0);
            }
        },

        Commands::Run { filename } => match filename {
            Some(filename) => {
                info!("Running Run subcommand");
                let buf = read_file(filename)?;

                info!("Provided input:\n {}", buf);

                let mut session = Session::new();

                match session.run(&buf) {
                    Ok(()) => {
                        info!("Program executed successfully");
                    }

                    Err(diagnostics) => {
                        debug!("Run debug: {}", diagnostics);
                        eprintln!("{}", diagnostics);
                        std::process::exit(exit_code(&diagnostics));
                    }
                }
            }

            None => {
                info!("No filepath provided for Run");
                println!("No input filepath was provided. Exiting...");
                std::process::exit(0);
            }
        },

        Commands::Repl => {
            info!("Starting REPL");

            let mut session = Session::new();
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();

            print!("> ");
            stdout.flush()?;

            for line in stdin.lock().lines() {
                let line = line?;

                match session.evaluate(&line) {
                    Ok(Some(value)) => println!("{}", value),
                    Ok(None) => {}
                    Err(diagnostics) => {
                        debug!("REPL debug: {}", diagnostics);
                        eprintln!("{}", diagnostics);
                    }
                }

                print!("> ");
                stdout.flush()?;
            }

            info!("REPL finished");
        }
    }

    Ok(())
}
