//! # Anagram Groups
//!
//! Concurrent anagram grouping for wordlists.
//!
//! ## Features
//!
//! - **Per-file ingestion**: every wordlist is read on its own thread
//! - **Byte-exact keys**: words are grouped by their bytes sorted ascending, so
//!   case, spaces and punctuation all count
//! - **Order-preserving merge**: groups keep first-seen order within a file and
//!   arrival order across files
//! - **Directory inputs**: wordlists can be collected from directories by extension
//!
//! ## Usage
//!
//! ```bash
//! # Anagrams in one wordlist
//! anagram-groups words.txt
//!
//! # Merge several wordlists
//! anagram-groups a.txt b.txt c.txt
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use anagram_groups::pipeline::{Pipeline, PipelineConfig};
//! use anagram_groups::report::render;
//! use std::path::PathBuf;
//!
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let result = pipeline.group(&[PathBuf::from("words.txt")]).unwrap();
//! let report = render(&result.grouping, 2).unwrap();
//! print!("{}", String::from_utf8_lossy(&report));
//! ```

pub mod cli;
pub mod error;
pub mod grouping;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod source;

pub use cli::Args;
pub use error::{AnagramError, Result};
pub use grouping::{AnagramKey, OrderedGrouping, Word};
pub use pipeline::{FinalResult, PartialResult, Pipeline, PipelineConfig};
