//! Report output
//!
//! Renders a grouping as one line per qualifying anagram group, words joined
//! by single spaces, raw bytes written unchanged.

use crate::error::{AnagramError, Result};
use crate::grouping::{OrderedGrouping, Word};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Default buffer size for report writing (64KB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Smallest group size that is ever reported
pub const MIN_GROUP_SIZE: usize = 2;

/// Buffered report writer
pub struct ReportWriter<W: Write> {
    writer: BufWriter<W>,
    target: String,
    groups_written: u64,
    bytes_written: u64,
}

impl ReportWriter<File> {
    /// Create (or truncate) a report file
    pub fn create(path: &Path, buffer_size: usize) -> Result<Self> {
        let target = path.display().to_string();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| AnagramError::Output {
                path: target.clone(),
                source,
            })?;

        Ok(Self::new(file, target, buffer_size))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(inner: W, target: impl Into<String>, buffer_size: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(buffer_size, inner),
            target: target.into(),
            groups_written: 0,
            bytes_written: 0,
        }
    }

    /// Write one group as a space-joined line
    pub fn write_group(&mut self, words: &[Word]) -> Result<()> {
        self.write_group_bytes(words).map_err(|source| AnagramError::Output {
            path: self.target.clone(),
            source,
        })
    }

    fn write_group_bytes(&mut self, words: &[Word]) -> io::Result<()> {
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                self.writer.write_all(b" ")?;
                self.bytes_written += 1;
            }
            self.writer.write_all(word)?;
            self.bytes_written += word.len() as u64;
        }
        self.writer.write_all(b"\n")?;
        self.bytes_written += 1;
        self.groups_written += 1;
        Ok(())
    }

    /// Write every group of at least `min_group_size` words, in grouping order
    pub fn write_report(
        &mut self,
        grouping: &OrderedGrouping,
        min_group_size: usize,
    ) -> Result<u64> {
        let min_group_size = min_group_size.max(MIN_GROUP_SIZE);
        let before = self.groups_written;

        for (_, words) in grouping.iter() {
            if words.len() >= min_group_size {
                self.write_group(words)?;
            }
        }

        Ok(self.groups_written - before)
    }

    /// Flush the buffer to the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|source| AnagramError::Output {
            path: self.target.clone(),
            source,
        })
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        let target = self.target;
        self.writer.into_inner().map_err(|e| AnagramError::Output {
            path: target,
            source: e.into_error(),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn groups_written(&self) -> u64 {
        self.groups_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

/// Render a grouping into memory
pub fn render(grouping: &OrderedGrouping, min_group_size: usize) -> Result<Vec<u8>> {
    let mut writer = ReportWriter::new(Vec::new(), "<memory>", DEFAULT_BUFFER_SIZE);
    writer.write_report(grouping, min_group_size)?;
    writer.into_inner()
}
