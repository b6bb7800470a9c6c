//! # netsphere
//!
//! The Netsphere application binary: CLI, oracle client and diagram
//! file persistence on top of the pure netsphere-core engine.

pub mod cli;
pub mod config;
pub mod oracle;

use netsphere_core::DiagramError;
use thiserror::Error;

/// Application-layer errors: engine failures plus everything the binary
/// adds around it (files, network, configuration).
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Diagram(#[from] DiagramError),

    #[error(transparent)]
    Oracle(#[from] oracle::OracleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
