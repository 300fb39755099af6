//! `r8` — the Rotor script shell.
//!
//! Reads a script file, parses it, and executes it, printing the
//! interpreter's trace output to stdout.  With `--tokens` the shell dumps
//! the token stream instead of executing.
//!
//! Exit codes: 0 on success, 1 on an argument error or an uncaught
//! parse/execution error.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rotor_core::parser::parse::parse;
use rotor_core::parser::scanner::{Scanner, TokenKind};
use rotor_core::runtime::interp::Interp;

/// r8 runs Rotor scripts: a C-family, dynamically typed scripting language
/// interpreted by walking its syntax tree.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Dump the token stream instead of executing the script.
    #[arg(long)]
    tokens: bool,

    /// Path to the script file.
    script: PathBuf,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            use clap::error::ErrorKind;
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    let source = match fs::read_to_string(&args.script) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", args.script.display());
            return ExitCode::from(1);
        }
    };

    if args.tokens {
        return dump_tokens(&source);
    }

    let parsed = match parse(&source) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    let mut interp = Interp::new(parsed.scopes);
    if let Err(e) = interp.run(&parsed.root) {
        eprintln!("{e}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn dump_tokens(source: &str) -> ExitCode {
    match Scanner::tokenize_all(source) {
        Ok(tokens) => {
            for tok in tokens {
                if tok.kind == TokenKind::Eof {
                    break;
                }
                println!("{tok}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}
