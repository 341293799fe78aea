//! `blu` runs a BluLang source file, or drops into an interactive REPL
//! when invoked with no arguments.

use std::io::{self, Write};
use std::path::PathBuf;

use snafu::{ensure, ResultExt};
use structopt::StructOpt;

use blulang::error::{CliError, Io, NotFound, WrongExtension};
use blulang::lang::builtins::global_scope;
use blulang::lang::interpreter::eval_program;
use blulang::lang::parser::parse;

#[derive(Debug, StructOpt)]
#[structopt(name = "blu", about = "Run or explore BluLang programs")]
struct Opt {
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,

    /// A `.blu` source file. Omit to start the REPL.
    #[structopt(parse(from_os_str))]
    source: Option<PathBuf>,
}

fn main() {
    let opt = Opt::from_args();

    let level = if opt.verbose {
        log::Level::Trace
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level).unwrap();

    match opt.source {
        Some(path) => {
            if let Err(err) = run_file(&path) {
                log::error!("{}", err);
            }
        }
        None => run_repl(),
    }
}

fn run_file(path: &PathBuf) -> Result<(), CliError> {
    ensure!(
        path.extension().map(|ext| ext == "blu").unwrap_or(false),
        WrongExtension { path: path.clone() }
    );
    ensure!(path.is_file(), NotFound { path: path.clone() });

    let source = std::fs::read_to_string(path).context(Io { path: path.clone() })?;
    log::info!("loaded {}", path.display());

    let scope = global_scope();
    eval_program(&parse(&source), &scope);
    Ok(())
}

fn run_repl() {
    log::info!("BluLang REPL, type exit() to quit");
    let scope = global_scope();
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim();
        if line == "exit()" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let program = parse(line);
        let value = eval_program(&program, &scope);
        log::debug!("evaluated: {:?}", value);
        println!("{} :: {}", value.kind(), value);
    }
}
