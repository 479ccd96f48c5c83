//! Word sources
//!
//! Reads newline-delimited words from files and expands directory inputs
//! into the list of files to read.

use crate::error::{AnagramError, Result};
use crate::grouping::Word;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read buffer for word files (256KB)
const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Line iterator over one word source.
///
/// Each line with its `\n` or `\r\n` terminator removed is one word. A final
/// line without `\n` is still a word, minus one trailing `\r`. Empty lines yield the empty
/// word unless blank skipping is enabled. The iterator ends after the first
/// read error.
pub struct WordSource<R> {
    reader: R,
    path: PathBuf,
    line_buffer: Vec<u8>,
    bytes_read: u64,
    skip_blank: bool,
    finished: bool,
}

impl WordSource<BufReader<File>> {
    /// Open a word file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| AnagramError::SourceOpen {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(
            BufReader::with_capacity(READ_BUFFER_SIZE, file),
            path.to_path_buf(),
        ))
    }
}

impl<R: BufRead> WordSource<R> {
    pub fn new(reader: R, path: PathBuf) -> Self {
        Self {
            reader,
            path,
            line_buffer: Vec::with_capacity(256),
            bytes_read: 0,
            skip_blank: false,
            finished: false,
        }
    }

    /// Skip empty lines instead of yielding the empty word
    pub fn skip_blank(mut self, skip: bool) -> Self {
        self.skip_blank = skip;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes consumed so far, terminators included
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn read_line(&mut self) -> Option<Result<Word>> {
        self.line_buffer.clear();

        match self.reader.read_until(b'\n', &mut self.line_buffer) {
            Ok(0) => None,
            Ok(n) => {
                self.bytes_read += n as u64;

                if self.line_buffer.last() == Some(&b'\n') {
                    self.line_buffer.pop();
                }
                // one `\r` belongs to the terminator, with or without `\n`
                if self.line_buffer.last() == Some(&b'\r') {
                    self.line_buffer.pop();
                }

                Some(Ok(Word::from(self.line_buffer.as_slice())))
            }
            Err(source) => Some(Err(AnagramError::SourceRead {
                path: self.path.clone(),
                source,
            })),
        }
    }
}

impl<R: BufRead> Iterator for WordSource<R> {
    type Item = Result<Word>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.read_line() {
                Some(Ok(word)) if self.skip_blank && word.is_empty() => continue,
                Some(Ok(word)) => return Some(Ok(word)),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            }
        }
    }
}

/// Expand the input paths into the ordered list of word files.
///
/// Files are taken as given, whether or not they exist, so a missing file is
/// reported by the reader that tries to open it. Directories are walked in
/// file-name order, keeping files whose extension is in `extensions` (any
/// extension when the list is empty). `recursive` descends into
/// subdirectories.
pub fn collect_sources(
    inputs: &[PathBuf],
    recursive: bool,
    extensions: &[String],
) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            sources.push(input.clone());
            continue;
        }

        let walker = if recursive {
            WalkDir::new(input)
        } else {
            WalkDir::new(input).max_depth(1)
        };

        for entry in walker.sort_by_file_name() {
            let entry = entry.map_err(|source| AnagramError::Walk {
                path: input.clone(),
                source,
            })?;

            if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                sources.push(entry.into_path());
            }
        }
    }

    if sources.is_empty() {
        return Err(AnagramError::NoSources);
    }

    log::debug!("Collected {} word sources", sources.len());
    Ok(sources)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }

    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{Cursor, Read, Write};
    use tempfile::{NamedTempFile, TempDir};

    fn words_of(input: &[u8]) -> Vec<String> {
        WordSource::new(Cursor::new(input.to_vec()), PathBuf::from("mem"))
            .map(|w| w.unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_lines_in_order() {
        assert_eq!(words_of(b"act\ncat\ntree\n"), vec!["act", "cat", "tree"]);
    }

    #[test]
    fn test_trailing_line_without_newline() {
        assert_eq!(words_of(b"act\ncat"), vec!["act", "cat"]);
    }

    #[test]
    fn test_crlf_stripped() {
        assert_eq!(words_of(b"act\r\ncat\r\n"), vec!["act", "cat"]);
    }

    #[test]
    fn test_trailing_cr_without_newline() {
        assert_eq!(words_of(b"evil\r\nvile\r\nlive\r"), vec!["evil", "vile", "live"]);
        assert_eq!(words_of(b"a\r\r\n"), vec!["a\r"]);
    }

    #[test]
    fn test_inner_whitespace_kept() {
        assert_eq!(
            words_of(b" act \ntom marvolo riddle\n"),
            vec![" act ", "tom marvolo riddle"]
        );
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(words_of(b"a\n\nb\n"), vec!["a", "", "b"]);

        let skipped: Vec<String> =
            WordSource::new(Cursor::new(b"a\n\nb\n".to_vec()), PathBuf::from("mem"))
                .skip_blank(true)
                .map(|w| w.unwrap().to_string())
                .collect();
        assert_eq!(skipped, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(words_of(b"").is_empty());
    }

    #[test]
    fn test_bytes_read() {
        let mut source = WordSource::new(Cursor::new(b"ab\r\ncd".to_vec()), PathBuf::from("mem"));
        while source.next().is_some() {}
        assert_eq!(source.bytes_read(), 6);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_read_error_ends_iteration() {
        let mut source =
            WordSource::new(BufReader::new(FailingReader), PathBuf::from("broken.txt"));

        match source.next() {
            Some(Err(AnagramError::SourceRead { path, .. })) => {
                assert_eq!(path, PathBuf::from("broken.txt"));
            }
            other => panic!(
                "expected read error, got {:?}",
                other.map(|r| r.map(|w| w.to_string()))
            ),
        }
        assert!(source.next().is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");

        match WordSource::open(&missing) {
            Err(AnagramError::SourceOpen { path, .. }) => assert_eq!(path, missing),
            _ => panic!("expected open error"),
        }
    }

    #[test]
    fn test_open_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "race").unwrap();
        writeln!(file, "care").unwrap();

        let words: Vec<String> = WordSource::open(file.path())
            .unwrap()
            .map(|w| w.unwrap().to_string())
            .collect();
        assert_eq!(words, vec!["race", "care"]);
    }

    #[test]
    fn test_collect_sources_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.txt"), "b\n").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a\n").unwrap();
        fs::write(temp_dir.path().join("notes.md"), "x\n").unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub").join("c.txt"), "c\n").unwrap();

        let exts = vec!["txt".to_string()];
        let flat = collect_sources(&[temp_dir.path().to_path_buf()], false, &exts).unwrap();
        assert_eq!(
            flat,
            vec![temp_dir.path().join("a.txt"), temp_dir.path().join("b.txt")]
        );

        let deep = collect_sources(&[temp_dir.path().to_path_buf()], true, &exts).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&temp_dir.path().join("sub").join("c.txt")));

        let any = collect_sources(&[temp_dir.path().to_path_buf()], false, &[]).unwrap();
        assert_eq!(any.len(), 3);
    }

    #[test]
    fn test_collect_sources_keeps_explicit_files() {
        let inputs = vec![PathBuf::from("does-not-exist.lst")];
        let sources = collect_sources(&inputs, false, &["txt".to_string()]).unwrap();
        assert_eq!(sources, inputs);
    }

    #[test]
    fn test_collect_sources_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = collect_sources(&[temp_dir.path().to_path_buf()], false, &[]);
        assert!(matches!(result, Err(AnagramError::NoSources)));
    }
}
