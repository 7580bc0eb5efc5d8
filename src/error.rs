// SPDX-License-Identifier: MIT
//
// Process-level errors and their exit codes.

use std::io;

use t_term::terminal::TermError;
use thiserror::Error;

/// Everything that can end the process early.
#[derive(Debug, Error)]
pub enum AppError {
    /// `-h`: print usage and exit successfully.
    #[error("usage requested")]
    Help,

    /// The command line could not be parsed.
    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error(transparent)]
    Terminal(#[from] TermError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Help => 0,
            Self::Usage(_) | Self::Terminal(_) | Self::Io(_) => 1,
        }
    }
}
