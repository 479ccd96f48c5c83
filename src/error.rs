//! Error types for the anagram pipeline
//!
//! Every failure is fatal for the run. Each variant names the resource that
//! failed so the binary can report it before exiting.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnagramError {
    /// An input source could not be opened
    #[error("cannot open word source {path:?}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An input source failed while it was being read
    #[error("error reading word source {path:?}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory input could not be walked
    #[error("cannot scan directory {path:?}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Input expansion produced nothing to read
    #[error("no word sources found in the given paths")]
    NoSources,

    /// A pipeline worker went away without handing over its result
    #[error("pipeline worker {index} terminated without a result")]
    WorkerLost { index: usize },

    /// Every collector hung up before all partial results were merged
    #[error("merge stopped after {merged} of {expected} partial results")]
    MergeInterrupted { merged: usize, expected: usize },

    /// A pipeline thread could not be started
    #[error("cannot start worker thread {name}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The report could not be written
    #[error("cannot write report to {path}")]
    Output {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AnagramError>;
