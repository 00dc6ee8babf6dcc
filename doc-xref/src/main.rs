//! Standalone builder for trait-implementor cross-reference indexes.

use anyhow::Result;
use clap::Parser;
use doc_xref::cli::Command;
use doc_xref_tracing::{init_tracing_subscriber, TracingSubscriberOptions};
use tracing::error;

fn main() {
    let build_instructions = Command::parse();
    init_tracing_subscriber(TracingSubscriberOptions {
        silent: Some(build_instructions.silent),
        ..Default::default()
    });
    if let Err(err) = run(&build_instructions) {
        error!("Error: {:?}", err);
        std::process::exit(1);
    }
}

fn run(build_instructions: &Command) -> Result<()> {
    doc_xref::build_index(build_instructions)?;
    Ok(())
}
