use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use monkey_interpreter as monkey;

use monkey::ast::Program;
use monkey::environment::Environment;
use monkey::evaluator::{Evaluator, DEFAULT_MAX_CALL_DEPTH};
use monkey::parser::Parser;
use monkey::repl::Repl;
use monkey::scanner::Scanner;
use monkey::token::{Token, TokenKind};

/// Exit status for input that fails to tokenize or parse.
const EXIT_PARSE_ERROR: i32 = 65;

/// Exit status for a program that fails at runtime.
const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Monkey language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,

    /// Maximum depth of nested function calls before evaluation fails
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Starts an interactive session (the default)
    Repl,

    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints its canonical form
    Parse {
        filename: PathBuf,

        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Runs input from a file as a Monkey program and prints its value
    Run { filename: PathBuf },
}

/// Reads the contents of a file into a String
fn read_file(filename: PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'monkey_interpreter::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("monkey_interpreter::")
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
        .filter_level(log::LevelFilter::Debug)
        .parse_default_env() // RUST_LOG overrides the Debug default
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn parse_or_exit(source: &str) -> Program {
    match Parser::new(Scanner::new(source)).parse_program() {
        Ok(program) => program,
        Err(e) => {
            debug!("Parse debug: {:?}", e);
            eprintln!("parse error: {}", e);
            std::process::exit(EXIT_PARSE_ERROR);
        }
    }
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            info!("Running Repl subcommand");

            let mut repl = Repl::new(Evaluator::with_max_depth(args.max_depth));
            let stdin = io::stdin();

            repl.run(stdin.lock(), io::stdout().lock())
                .context("REPL I/O failed")?;
        }

        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");
            let source = read_file(filename)?;
            let tokens: Vec<Token<'_>> = Scanner::new(&source).collect();

            if json {
                let rendered =
                    serde_json::to_string_pretty(&tokens).context("Failed to serialize tokens")?;
                println!("{}", rendered);
            } else {
                for token in &tokens {
                    println!("{}", token);
                }
            }

            let illegal = tokens.iter().filter(|t| t.kind == TokenKind::ILLEGAL).count();

            if illegal > 0 {
                debug!("{} illegal token(s), exiting with code 65", illegal);
                std::process::exit(EXIT_PARSE_ERROR);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse { filename, json } => {
            info!("Running Parse subcommand");
            let source = read_file(filename)?;
            let program = parse_or_exit(&source);

            if json {
                let rendered =
                    serde_json::to_string_pretty(&program).context("Failed to serialize AST")?;
                println!("{}", rendered);
            } else {
                println!("{}", program);
            }

            info!("Parse subcommand completed");
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");
            let source = read_file(filename)?;
            let program = parse_or_exit(&source);

            info!("Parsed {} statements", program.statements.len());

            let env = Environment::new_shared();
            let mut evaluator = Evaluator::with_max_depth(args.max_depth);

            match evaluator.evaluate(&program, &env) {
                Ok(value) => {
                    debug!("Evaluated to: {}", value);
                    println!("{}", value.inspect());
                }

                Err(e) => {
                    debug!("Runtime debug: {:?}", e);
                    eprintln!("runtime error: {}", e);
                    std::process::exit(EXIT_RUNTIME_ERROR);
                }
            }
        }
    }

    Ok(())
}
