//! Concurrent grouping pipeline
//!
//! Every word source gets a reader thread chained to a grouper thread over a
//! bounded channel. Each grouper hands its finished grouping to the merger on
//! a one-shot channel. The merger runs one collector per grouper; collectors
//! forward results onto a shared completion channel, and the coordinator
//! folds them in whatever order they arrive.
//!
//! ```text
//! reader-0 ──words──▶ grouper-0 ──partial──▶ collector-0 ─┐
//! reader-1 ──words──▶ grouper-1 ──partial──▶ collector-1 ─┼──▶ coordinator ──▶ FinalResult
//! reader-N ──words──▶ grouper-N ──partial──▶ collector-N ─┘
//! ```
//!
//! Only whole groupings cross thread boundaries after ingestion, so nothing
//! in the pipeline is locked. The merge order across sources is a race; with
//! a single source the output order is fully determined by the file.

use crate::cli::Args;
use crate::error::{AnagramError, Result};
use crate::grouping::{AnagramKey, OrderedGrouping, Word};
use crate::progress::{create_merge_progress_bar, print_info, print_success, PipelineStats};
use crate::report::{ReportWriter, MIN_GROUP_SIZE};
use crate::source::{collect_sources, WordSource};

use crossbeam_channel::{bounded, Receiver, Sender};
use indicatif::ProgressBar;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

/// Default capacity of the reader → grouper hand-off
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output: Option<PathBuf>,
    pub recursive: bool,
    pub extensions: Vec<String>,
    pub buffer_size: usize,
    pub channel_capacity: usize,
    pub min_group_size: usize,
    pub skip_blank: bool,
    pub stats: bool,
    pub quiet: bool,
    pub verbose: bool,
}

impl PipelineConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        Ok(Self {
            output: args.output.clone(),
            recursive: args.recursive,
            extensions: args.get_extensions(),
            buffer_size: args.parse_buffer_size()?,
            channel_capacity: args.channel_capacity,
            min_group_size: args.min_group_size,
            skip_blank: args.skip_blank,
            stats: args.stats,
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output: None,
            recursive: false,
            extensions: vec!["txt".to_string()],
            buffer_size: crate::report::DEFAULT_BUFFER_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            min_group_size: MIN_GROUP_SIZE,
            skip_blank: false,
            stats: false,
            quiet: true,
            verbose: false,
        }
    }
}

/// Grouping of one source, immutable once the grouper hands it over
#[derive(Debug)]
pub struct PartialResult {
    pub index: usize,
    pub source: PathBuf,
    pub grouping: OrderedGrouping,
    pub words: u64,
    pub bytes: u64,
}

/// Fold of every partial result, keys in order of first arrival
#[derive(Debug)]
pub struct FinalResult {
    pub grouping: OrderedGrouping,
    pub stats: PipelineStats,
}

impl FinalResult {
    fn new(started: Instant) -> Self {
        Self {
            grouping: OrderedGrouping::new(),
            stats: PipelineStats::started_at(started),
        }
    }

    fn absorb(&mut self, partial: PartialResult) {
        log::debug!(
            "Merging {:?}: {} words, {} keys",
            partial.source,
            partial.words,
            partial.grouping.len()
        );

        self.stats.record_source(partial.source, partial.words, partial.bytes);
        for (key, words) in partial.grouping {
            self.grouping.append_values(key, words);
        }
        self.stats.distinct_keys = self.grouping.len() as u64;
    }
}

/// Messages from a reader to its grouper
enum SourceEvent {
    Word(Word),
    End { bytes_read: u64 },
    Failed(AnagramError),
}

/// Main pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Expand inputs, group them and write the report
    pub fn process(&self, inputs: &[PathBuf]) -> Result<FinalResult> {
        let sources = collect_sources(inputs, self.config.recursive, &self.config.extensions)?;

        if self.config.verbose {
            print_info(&format!("Grouping {} word sources", sources.len()));
        }

        let mut result = self.group(&sources)?;

        let written = match self.config.output {
            Some(ref path) => {
                let writer = ReportWriter::create(path, self.config.buffer_size)?;
                self.emit(&result.grouping, writer)?
            }
            None => {
                let stdout = io::stdout().lock();
                let writer = ReportWriter::new(stdout, "<stdout>", self.config.buffer_size);
                self.emit(&result.grouping, writer)?
            }
        };
        result.stats.reported_groups = written;

        if !self.config.quiet {
            if let Some(ref path) = self.config.output {
                print_success(&format!("Report written to: {:?}", path));
            }
        }
        if self.config.stats {
            result.stats.print_summary();
        }

        Ok(result)
    }

    fn emit<W: Write>(
        &self,
        grouping: &OrderedGrouping,
        mut writer: ReportWriter<W>,
    ) -> Result<u64> {
        let written = writer.write_report(grouping, self.config.min_group_size)?;
        writer.flush()?;
        log::debug!(
            "Wrote {} groups ({} bytes) to {}",
            written,
            writer.bytes_written(),
            writer.target()
        );
        Ok(written)
    }

    /// Run the reader, grouper and merger stages over `sources`
    pub fn group(&self, sources: &[PathBuf]) -> Result<FinalResult> {
        if sources.is_empty() {
            return Err(AnagramError::NoSources);
        }

        let started = Instant::now();
        let mut partials = Vec::with_capacity(sources.len());
        for (index, path) in sources.iter().enumerate() {
            let words = spawn_reader(
                index,
                path.clone(),
                self.config.channel_capacity,
                self.config.skip_blank,
            )?;
            partials.push(spawn_grouper(index, path.clone(), words)?);
        }

        let pb = if self.config.quiet {
            ProgressBar::hidden()
        } else {
            create_merge_progress_bar(sources.len() as u64)
        };

        let result = merge(partials, started, &pb);
        pb.finish_and_clear();
        result
    }
}

fn spawn_worker<F>(name: String, f: F) -> Result<()>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(f)
        .map(|_| ())
        .map_err(|source| AnagramError::Spawn { name, source })
}

/// Start the reader for one source.
///
/// The file is opened inside the worker and closed when it returns. Open and
/// read failures are forwarded to the grouper as the last event.
fn spawn_reader(
    index: usize,
    path: PathBuf,
    capacity: usize,
    skip_blank: bool,
) -> Result<Receiver<SourceEvent>> {
    let (tx, rx) = bounded(capacity.max(1));

    spawn_worker(format!("reader-{index}"), move || {
        let source = match WordSource::open(&path) {
            Ok(source) => source.skip_blank(skip_blank),
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                let _ = tx.send(SourceEvent::Failed(e));
                return;
            }
        };
        read_words(source, &tx);
    })?;

    Ok(rx)
}

fn read_words<R: io::BufRead>(mut source: WordSource<R>, tx: &Sender<SourceEvent>) {
    let path = source.path().to_path_buf();
    log::debug!("Reading {}", path.display());

    for item in source.by_ref() {
        let event = match item {
            Ok(word) => SourceEvent::Word(word),
            Err(e) => {
                log::error!("Error reading {}: {}", path.display(), e);
                let _ = tx.send(SourceEvent::Failed(e));
                return;
            }
        };
        if tx.send(event).is_err() {
            return; // grouper gone
        }
    }

    let _ = tx.send(SourceEvent::End {
        bytes_read: source.bytes_read(),
    });
}

/// Start the grouper for one source. The returned receiver yields exactly one value.
fn spawn_grouper(
    index: usize,
    path: PathBuf,
    events: Receiver<SourceEvent>,
) -> Result<Receiver<Result<PartialResult>>> {
    let (tx, rx) = bounded(1);

    spawn_worker(format!("grouper-{index}"), move || {
        let _ = tx.send(group_source(index, path, &events));
    })?;

    Ok(rx)
}

fn group_source(
    index: usize,
    source: PathBuf,
    events: &Receiver<SourceEvent>,
) -> Result<PartialResult> {
    let mut grouping = OrderedGrouping::new();
    let mut words = 0u64;

    for event in events.iter() {
        match event {
            SourceEvent::Word(word) => {
                words += 1;
                grouping.append_values(AnagramKey::of(&word), [word]);
            }
            SourceEvent::End { bytes_read } => {
                log::debug!(
                    "Grouped {:?}: {} words into {} keys",
                    source,
                    words,
                    grouping.len()
                );
                return Ok(PartialResult {
                    index,
                    source,
                    grouping,
                    words,
                    bytes: bytes_read,
                });
            }
            SourceEvent::Failed(e) => return Err(e),
        }
    }

    // reader exited without End
    Err(AnagramError::WorkerLost { index })
}

/// Fold partial results in arrival order.
///
/// One collector per receiver waits for its single value and forwards it to
/// the shared completion channel. The coordinator takes exactly one value per
/// receiver and returns the first error it sees without waiting for the rest.
/// `started` becomes the run's start time in the returned stats.
pub fn merge(
    partials: Vec<Receiver<Result<PartialResult>>>,
    started: Instant,
    pb: &ProgressBar,
) -> Result<FinalResult> {
    let expected = partials.len();
    let (done_tx, done_rx) = bounded(expected.max(1));

    for (index, partial_rx) in partials.into_iter().enumerate() {
        let done_tx = done_tx.clone();
        spawn_worker(format!("collector-{index}"), move || {
            let partial = partial_rx
                .recv()
                .unwrap_or_else(|_| Err(AnagramError::WorkerLost { index }));
            let _ = done_tx.send(partial);
        })?;
    }
    drop(done_tx);

    fold_arrivals(&done_rx, expected, started, pb)
}

/// Coordinator side of the merge: take `expected` results off the completion channel
fn fold_arrivals(
    done_rx: &Receiver<Result<PartialResult>>,
    expected: usize,
    started: Instant,
    pb: &ProgressBar,
) -> Result<FinalResult> {
    let mut result = FinalResult::new(started);
    for merged in 0..expected {
        let partial = done_rx
            .recv()
            .map_err(|_| AnagramError::MergeInterrupted { merged, expected })??;

        pb.set_message(format!("{}", partial.source.display()));
        result.absorb(partial);
        pb.inc(1);
    }

    log::debug!(
        "Merged {} sources into {} keys",
        result.stats.sources,
        result.grouping.len()
    );
    Ok(result)
}

/// Group a single word file with the default configuration
pub fn group_single<P: AsRef<Path>>(path: P) -> Result<FinalResult> {
    Pipeline::new(PipelineConfig::default()).group(&[path.as_ref().to_path_buf()])
}
