use std::{io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use externdump::{
    invocation::{run, Invocation},
    provider::cil::CilProvider,
};

/// externdump - describe one .NET type for the extern-binding generator
#[derive(Debug, Parser)]
#[command(
    name = "externdump",
    version,
    about,
    long_about = None,
    after_help = "Types are looked up only in the BINARY arguments. There is no host default set, so system types are found only when their binary is passed."
)]
struct Cli {
    /// Dotted path of the type to describe, e.g. `system.collections.generic.List_1`.
    #[arg(value_name = "TYPE")]
    type_path: Option<String>,

    /// Binaries to load before the lookup, in order. Only these are searched; no framework
    /// or host assemblies are loaded by default.
    #[arg(value_name = "BINARY")]
    binaries: Vec<PathBuf>,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Log to stderr only, stdout carries the protocol; --verbose enables debug; RUST_LOG overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("externdump", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let invocation = Invocation {
        type_path: cli.type_path,
        binaries: cli.binaries,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = run(CilProvider::new(), &invocation, &mut out).with_context(|| {
        match &invocation.type_path {
            Some(path) => format!("failed to describe '{path}'"),
            None => "failed to write usage line".to_string(),
        }
    })?;

    log::debug!("finished: {outcome:?}");
    Ok(())
}
