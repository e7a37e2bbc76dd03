//! CLI entry point for ytdl.

use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use ytdl_core::app::terminal;
use ytdl_core::{
    Args, CancelToken, Config, ProcessExit, RunContext, Transfer, YtDlpExtractor, app,
    format_elapsed, spawn_interrupt_handler,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(exit) => exit.code(),
        Err(err) => {
            eprintln!("ytdl: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ProcessExit> {
    // Parse CLI arguments first (before tracing, so --help works without logs).
    // Help, version, and argument errors all exit 1 by contract.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // clap renders help and argument errors itself (with usage and a
            // --help pointer); only the exit code is remapped here.
            let _ = err.print();
            return Ok(ProcessExit::Failure);
        }
    };

    // RUST_LOG env var takes priority over quiet/verbose flags.
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    terminal::init_tracing(default_level);
    debug!(?args, "CLI arguments parsed");

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            println!("ytdl: {err}");
            println!("Try --help to see all switches/usages.");
            return Ok(ProcessExit::Failure);
        }
    };

    if args.outpath.is_some() {
        println!("Saving videos to {}", config.output_dir.display());
    }
    if config.audio_only {
        println!("Downloading videos as audio only.");
    }

    let token = CancelToken::new();
    spawn_interrupt_handler(token.clone());

    let show_progress = terminal::should_render_progress(
        io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    );

    let ctx = RunContext {
        config,
        extractor: Box::new(YtDlpExtractor::discover()),
        transfer: Transfer::new(),
        token,
        show_progress,
    };

    let started = Instant::now();
    match app::orchestrator::run(&ctx).await {
        Ok(stats) => {
            info!(
                completed = stats.completed,
                failed = stats.failed,
                skipped_urls = stats.skipped_urls,
                "download run complete"
            );
            if stats.cancelled {
                return Ok(ProcessExit::Failure);
            }
            println!("Done in {}.", format_elapsed(started.elapsed()));
            Ok(ProcessExit::Success)
        }
        Err(err) => {
            println!("ytdl: {err}");
            if let Some(hint) = err.hint() {
                println!("{hint}");
            }
            Ok(ProcessExit::Failure)
        }
    }
}
