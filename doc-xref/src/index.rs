//! Building and writing the per-trait implementor data files.

use crate::{
    doc::{Corpus, Implementors, TraitEntry},
    render::{RenderPlan, Renderable},
    IMPLEMENTORS_DIR_NAME,
};
use anyhow::{Context, Result};
use doc_xref_tracing::println_yellow_err;
use horrorshow::Template;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Write, fs, path::Path};

/// A single entry in a trait's implementor mapping, serialized verbatim into
/// the generated data files.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct ImplementorRecord {
    pub(crate) text: String,
    pub(crate) synthetic: bool,
    pub(crate) types: Vec<String>,
}

/// The implementor mapping emitted for one trait, keyed by implementing
/// crate name.
pub(crate) struct TraitFile {
    pub(crate) entry: TraitEntry,
    pub(crate) implementors: BTreeMap<String, Vec<ImplementorRecord>>,
}

/// Rendered records for every trait in the documentation root, keyed by the
/// trait's fully qualified path.
pub(crate) struct ImplementorIndex(pub(crate) BTreeMap<String, TraitFile>);

impl ImplementorIndex {
    /// Renders every gathered implementor and groups the records per trait.
    /// Entries the signature dialect cannot express are dropped with a
    /// warning. Every known trait gets a file, implementors or not.
    pub(crate) fn from_implementors(
        corpus: &Corpus,
        traits: &BTreeMap<String, TraitEntry>,
        implementors: Implementors,
    ) -> Result<ImplementorIndex> {
        let mut index: BTreeMap<String, TraitFile> = traits
            .iter()
            .map(|(trait_path, entry)| {
                (
                    trait_path.clone(),
                    TraitFile {
                        entry: entry.clone(),
                        implementors: BTreeMap::new(),
                    },
                )
            })
            .collect();

        for impl_doc in &implementors.0 {
            let Some(crate_doc) = corpus.get(&impl_doc.crate_name) else {
                continue;
            };
            let render_plan = RenderPlan { corpus, crate_doc };
            let text = match impl_doc.render(render_plan) {
                Ok(markup) => markup.into_string().unwrap(),
                Err(err) => {
                    println_yellow_err(&format!(
                        "skipping an implementation of `{}` in `{}`: {err}",
                        impl_doc.trait_path, impl_doc.crate_name
                    ));
                    continue;
                }
            };
            let Some(trait_file) = index.get_mut(&impl_doc.trait_path) else {
                continue;
            };
            trait_file
                .implementors
                .entry(impl_doc.crate_name.clone())
                .or_default()
                .push(ImplementorRecord {
                    text,
                    synthetic: impl_doc.is_synthetic,
                    types: impl_doc.types.clone(),
                });
        }

        // The input item tables have no defined order; sort the records so
        // rebuilds are byte-identical.
        for trait_file in index.values_mut() {
            for records in trait_file.implementors.values_mut() {
                records.sort_by(|a, b| (&a.types, &a.text).cmp(&(&b.types, &b.text)));
            }
        }
        Ok(ImplementorIndex(index))
    }
}

/// Writes one data file per trait beneath `doc_path`.
pub(crate) fn write_implementors_index(
    doc_path: &Path,
    index: &ImplementorIndex,
    json: bool,
) -> Result<()> {
    for (trait_path, trait_file) in &index.0 {
        let mut out_path = doc_path.join(IMPLEMENTORS_DIR_NAME);
        out_path.push(trait_file.entry.module_info.dir());
        fs::create_dir_all(&out_path)
            .with_context(|| format!("failed to create '{}'", out_path.display()))?;
        let (file_name, contents) = if json {
            (
                format!("trait.{}.json", trait_file.entry.name),
                to_data_json(trait_path, trait_file)?,
            )
        } else {
            (
                format!("trait.{}.js", trait_file.entry.name),
                to_registry_script(trait_file)?,
            )
        };
        let out_file = out_path.join(&file_name);
        fs::write(&out_file, contents)
            .with_context(|| format!("failed to write '{}'", out_file.display()))?;
    }
    Ok(())
}

/// The registry merge-hook script trait pages load: registers the mapping
/// immediately when the page hook is present, stashes it for later pickup
/// otherwise.
fn to_registry_script(trait_file: &TraitFile) -> Result<String> {
    let mut script = String::from("(function() {var implementors = {};\n");
    for (crate_name, records) in &trait_file.implementors {
        writeln!(
            script,
            "implementors[{}] = {};",
            serde_json::to_string(crate_name)?,
            serde_json::to_string(records)?
        )?;
    }
    script.push_str("if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()");
    Ok(script)
}

/// Self-contained data file payload for `--json` builds; no globals, no hook.
#[derive(Serialize)]
struct TraitData<'a> {
    #[serde(rename = "trait")]
    trait_path: &'a str,
    implementors: &'a BTreeMap<String, Vec<ImplementorRecord>>,
}

fn to_data_json(trait_path: &str, trait_file: &TraitFile) -> Result<String> {
    Ok(serde_json::to_string_pretty(&TraitData {
        trait_path,
        implementors: &trait_file.implementors,
    })?)
}
