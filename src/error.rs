//! Errors surfaced by the CLI/REPL front end. The interpreter core
//! stays best-effort (it panics on malformed programs); this type only
//! covers the outer layer that loads a `.blu` file.

use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CliError {
    #[snafu(display("source file not found: {}", path.display()))]
    NotFound { path: PathBuf },

    #[snafu(display("source file must end in .blu: {}", path.display()))]
    WrongExtension { path: PathBuf },

    #[snafu(display("could not read {}: {}", path.display(), source))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
