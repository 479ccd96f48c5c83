//! Command-line interface definition for anagram-groups
//!
//! Provides argument parsing and validation for the anagram grouping tool.

use clap::Parser;
use std::path::PathBuf;

/// Concurrent anagram grouping for wordlists
///
/// Reads every word list on its own thread, groups words by their sorted
/// bytes and prints each group of two or more anagrams on one line.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "anagram-groups",
    author = "m0h1nd4",
    version,
    about = "Group words from one or more wordlists into anagram sets",
    long_about = r#"
Group words from one or more wordlists into sets of anagrams.

Each line of each input is one word. Words are compared byte for byte: case,
spaces and punctuation all count. Every group with at least two words is
printed on one line, words separated by a single space, in the order the
groups were first seen. With several inputs the files are read concurrently
and their groups are merged as each file finishes, so the line order between
files may vary from run to run; the groups themselves do not.

EXAMPLES:
    # Anagrams in one wordlist
    anagram-groups words.txt

    # Merge several wordlists
    anagram-groups english.txt names.txt places.txt

    # Every .txt and .lst file below a directory
    anagram-groups -r --extensions txt,lst /wordlists/

    # Only groups of three or more, written to a file
    anagram-groups --min-group-size 3 -o groups.txt words.txt
"#
)]
pub struct Args {
    /// Word list files or directories
    #[arg(required = true, value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Process directories recursively
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// File extensions to read from directories (default: txt)
    #[arg(long, value_name = "EXT", default_value = "txt")]
    pub extensions: String,

    /// Smallest group size to report (at least 2)
    #[arg(long, value_name = "NUM", default_value_t = 2)]
    pub min_group_size: usize,

    /// Ignore empty lines instead of treating them as the empty word
    #[arg(long, default_value_t = false)]
    pub skip_blank: bool,

    /// Words buffered between each reader and its grouper
    #[arg(long, value_name = "NUM", default_value_t = crate::pipeline::DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Buffer size for report output (default: 64KB)
    #[arg(long, value_name = "SIZE", default_value = "64KB")]
    pub buffer_size: String,

    /// Show processing statistics on stderr
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Quiet mode - errors only
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Parse buffer size string to bytes
    pub fn parse_buffer_size(&self) -> anyhow::Result<usize> {
        parse_size(&self.buffer_size)
    }

    /// Parse file extensions to read from directories
    pub fn get_extensions(&self) -> Vec<String> {
        self.extensions
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Check option values clap cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_group_size < crate::report::MIN_GROUP_SIZE {
            anyhow::bail!(
                "--min-group-size must be at least {} (got {})",
                crate::report::MIN_GROUP_SIZE,
                self.min_group_size
            );
        }

        if self.channel_capacity == 0 {
            anyhow::bail!("--channel-capacity must be at least 1");
        }

        if self.parse_buffer_size()? == 0 {
            anyhow::bail!("--buffer-size must not be zero");
        }

        Ok(())
    }
}

/// Parse human-readable size string to bytes
fn parse_size(size_str: &str) -> anyhow::Result<usize> {
    let size_str = size_str.trim().to_uppercase();

    let (num_str, multiplier) = if let Some(n) = size_str.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = size_str.strip_suffix('B') {
        (n, 1)
    } else {
        (size_str.as_str(), 1)
    };

    let num: usize = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size format: '{}'", size_str))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("Size too large: '{}'", size_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("anagram-groups").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["words.txt"]);

        assert_eq!(args.inputs, vec![PathBuf::from("words.txt")]);
        assert_eq!(args.min_group_size, 2);
        assert_eq!(args.channel_capacity, 1024);
        assert_eq!(args.get_extensions(), vec!["txt"]);
        assert_eq!(args.parse_buffer_size().unwrap(), 64 * 1024);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_multiple_inputs() {
        let args = parse(&["a.txt", "b.txt", "-r", "c"]);
        assert_eq!(args.inputs.len(), 3);
        assert!(args.recursive);
    }

    #[test]
    fn test_no_inputs_is_usage_error() {
        let err = Args::try_parse_from(["anagram-groups"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_extensions() {
        let args = parse(&["--extensions", "TXT, .lst,,dic", "dir"]);
        assert_eq!(args.get_extensions(), vec!["txt", "lst", "dic"]);
    }

    #[test]
    fn test_validate_rejects_small_groups() {
        let args = parse(&["--min-group-size", "1", "words.txt"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let args = parse(&["--channel-capacity", "0", "words.txt"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64MB").unwrap(), 64 * 1024 * 1024);
        assert_eq!(parse_size("8kb").unwrap(), 8 * 1024);
        assert_eq!(parse_size("512B").unwrap(), 512);
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert!(parse_size("lots").is_err());
    }
}
