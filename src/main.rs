//! anagram-groups - concurrent anagram grouping for wordlists
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use anagram_groups::cli::Args;
use anagram_groups::pipeline::{Pipeline, PipelineConfig};
use anagram_groups::progress::{print_error, print_header, print_info};

fn main() {
    // Usage errors exit here, before any worker starts
    let args = Args::parse();

    // Set up logging unless the caller already chose a level
    if std::env::var_os("RUST_LOG").is_none() {
        if args.verbose {
            std::env::set_var("RUST_LOG", "debug");
        } else if !args.quiet {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        for cause in e.chain().skip(1) {
            print_error(&format!("  Caused by: {}", cause));
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    args.validate()?;

    let config = PipelineConfig::from_args(&args)?;

    if !args.quiet && args.verbose {
        print_config(&args, &config);
    }

    let pipeline = Pipeline::new(config);
    let result = pipeline.process(&args.inputs)?;

    log::info!(
        "Grouped {} words from {} sources into {} anagram groups",
        result.stats.words,
        result.stats.sources,
        result.stats.reported_groups
    );

    Ok(())
}

/// Print configuration summary
fn print_config(args: &Args, config: &PipelineConfig) {
    print_header("Configuration");

    print_info(&format!("Inputs:           {:?}", args.inputs));
    match config.output {
        Some(ref path) => print_info(&format!("Output:           {:?}", path)),
        None => print_info("Output:           <stdout>"),
    }
    print_info(&format!("Recursive:        {}", config.recursive));
    print_info(&format!("Extensions:       {:?}", config.extensions));
    print_info(&format!("Min group size:   {}", config.min_group_size));
    print_info(&format!("Skip blank lines: {}", config.skip_blank));
    print_info(&format!("Channel capacity: {}", config.channel_capacity));
    print_info(&format!("Buffer size:      {} KB", config.buffer_size / 1024));
}
