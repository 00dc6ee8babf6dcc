pub mod cli;
pub(crate) mod doc;
pub(crate) mod index;
pub(crate) mod render;

use anyhow::Result;
use cli::Command;
use doc::{Corpus, Implementors};
use doc_xref_tracing::println_action_green;
use index::{write_implementors_index, ImplementorIndex};
use std::path::PathBuf;

pub const IMPLEMENTORS_DIR_NAME: &str = "implementors";

/// Totals reported after an index build.
#[derive(Debug)]
pub struct IndexSummary {
    pub traits: usize,
    pub implementors: usize,
}

/// Builds the implementor index for every rustdoc JSON dump found in the
/// input directory and writes one data file per trait into the documentation
/// root. Returns the path of the written `implementors/` tree.
pub fn build_index(build_instructions: &Command) -> Result<(PathBuf, IndexSummary)> {
    // get input and output directories
    let dir = if let Some(ref path) = build_instructions.path {
        PathBuf::from(path)
    } else {
        std::env::current_dir()?
    };
    let doc_path = build_instructions
        .out
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| dir.clone());

    println_action_green("Loading", &format!("declarations from {}", dir.display()));
    let corpus = Corpus::from_json_dir(&dir)?;
    let traits = corpus.trait_entries(build_instructions.document_private_items);
    let implementors = Implementors::from_corpus(&corpus, &traits)?;

    println_action_green(
        "Indexing",
        &format!("{} traits across {} crates", traits.len(), corpus.0.len()),
    );
    let index = ImplementorIndex::from_implementors(&corpus, &traits, implementors)?;
    let summary = IndexSummary {
        traits: index.0.len(),
        implementors: index
            .0
            .values()
            .map(|trait_file| trait_file.implementors.values().map(Vec::len).sum::<usize>())
            .sum(),
    };
    write_implementors_index(&doc_path, &index, build_instructions.json)?;

    println_action_green(
        "Finished",
        &format!(
            "{} implementors registered for {} traits",
            summary.implementors, summary.traits
        ),
    );
    Ok((doc_path.join(IMPLEMENTORS_DIR_NAME), summary))
}
