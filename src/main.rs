// ABOUTME: Driver reading a source file and printing each top-level result

use clap::Parser as ClapParser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use wuns::env::Environment;
use wuns::error::Error;
use wuns::eval::Interpreter;
use wuns::parser::Parser;

/// Interpreter for wuns, a minimal homoiconic Lisp of words and lists
#[derive(ClapParser, Debug)]
#[command(name = "wuns")]
#[command(version)]
#[command(about = "Interpreter for the wuns language")]
struct CliArgs {
    /// Source file to interpret
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // the usage line goes to stdout, not clap's stderr
    let Some(path) = args.script else {
        println!("usage: wuns <file>");
        return ExitCode::FAILURE;
    };

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            println!("wuns: cannot open {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // results printed before the failing form stay on stdout
            let _ = std::io::stdout().flush();
            eprintln!("wuns: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Read-eval-print over every top-level form in the input
fn run(file: File) -> Result<(), Error> {
    let mut parser = Parser::from_reader(file);
    let mut interp = Interpreter::new();
    let env = Environment::new();

    while let Some(form) = parser.next_form()? {
        let value = interp.eval(&form, &env)?;
        println!("{}", value);
    }

    std::io::stdout()
        .flush()
        .map_err(|e| Error::Read(e.to_string()))?;
    Ok(())
}
