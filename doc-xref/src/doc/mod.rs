//! Loading parsed crate declarations and gathering the implementors to index.

use crate::doc::{descriptor::Descriptor, module::ModuleInfo};
use anyhow::{bail, Context, Result};
use doc_xref_tracing::println_yellow_err;
use rustdoc_types::{Crate, Impl, ItemEnum, Visibility, FORMAT_VERSION};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};
use tracing::debug;

pub(crate) mod descriptor;
pub(crate) mod module;

/// A single crate's declarations, deserialized from its rustdoc JSON dump.
pub(crate) struct CrateDoc {
    pub(crate) name: String,
    pub(crate) krate: Crate,
}

/// Every crate loaded from the documentation root, sorted by crate name.
pub(crate) struct Corpus(pub(crate) Vec<CrateDoc>);

/// Minimal dump header, checked before paying for full deserialization.
#[derive(Deserialize)]
struct FormatProbe {
    format_version: u32,
}

impl Corpus {
    /// Loads every `*.json` dump found in `dir`. Dumps that cannot be read,
    /// fail to deserialize, or were produced for another format version are
    /// skipped with a warning; an empty corpus is the only fatal outcome.
    pub(crate) fn from_json_dir(dir: &Path) -> Result<Corpus> {
        let mut dump_paths: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("failed to read input directory '{}'", dir.display()))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        dump_paths.sort();

        let mut crates = Vec::new();
        for path in dump_paths {
            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(err) => {
                    println_yellow_err(&format!("skipping '{}': {err}", path.display()));
                    continue;
                }
            };
            let probe: FormatProbe = match serde_json::from_str(&raw) {
                Ok(probe) => probe,
                Err(err) => {
                    println_yellow_err(&format!(
                        "skipping '{}': not a rustdoc JSON dump ({err})",
                        path.display()
                    ));
                    continue;
                }
            };
            if probe.format_version != FORMAT_VERSION {
                println_yellow_err(&format!(
                    "skipping '{}': produced for format version {}, expected {FORMAT_VERSION}",
                    path.display(),
                    probe.format_version
                ));
                continue;
            }
            let krate: Crate = match serde_json::from_str(&raw) {
                Ok(krate) => krate,
                Err(err) => {
                    println_yellow_err(&format!("skipping '{}': {err}", path.display()));
                    continue;
                }
            };
            let Some(name) = krate
                .index
                .get(&krate.root)
                .and_then(|root| root.name.clone())
            else {
                println_yellow_err(&format!(
                    "skipping '{}': dump has no root crate name",
                    path.display()
                ));
                continue;
            };
            crates.push(CrateDoc { name, krate });
        }

        if crates.is_empty() {
            bail!(
                "no readable rustdoc JSON dumps found in '{}'",
                dir.display()
            );
        }
        crates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Corpus(crates))
    }

    pub(crate) fn get(&self, crate_name: &str) -> Option<&CrateDoc> {
        self.0.iter().find(|crate_doc| crate_doc.name == crate_name)
    }

    /// The traits the index will emit a file for: every trait defined by a
    /// loaded crate, keyed by fully qualified path. Non-public traits are
    /// kept only when `document_private_items` is set. When two crates claim
    /// the same path the lexicographically first crate wins, so keys stay
    /// unique per generated file.
    pub(crate) fn trait_entries(&self, document_private_items: bool) -> BTreeMap<String, TraitEntry> {
        let mut entries: BTreeMap<String, TraitEntry> = BTreeMap::new();
        for crate_doc in &self.0 {
            for (id, item) in &crate_doc.krate.index {
                if item.crate_id != 0 || !matches!(item.inner, ItemEnum::Trait(_)) {
                    continue;
                }
                if !document_private_items && !matches!(item.visibility, Visibility::Public) {
                    continue;
                }
                let Some(summary) = crate_doc.krate.paths.get(id) else {
                    debug!("no path summary for trait {id:?} in `{}`", crate_doc.name);
                    continue;
                };
                let [module_prefixes @ .., name] = summary.path.as_slice() else {
                    continue;
                };
                if module_prefixes.is_empty() {
                    debug!("trait `{name}` has no crate prefix in `{}`", crate_doc.name);
                    continue;
                }
                let trait_path = summary.path.join("::");
                if entries.contains_key(&trait_path) {
                    println_yellow_err(&format!(
                        "`{trait_path}` is defined by more than one loaded crate, keeping the first"
                    ));
                    continue;
                }
                entries.insert(
                    trait_path,
                    TraitEntry {
                        module_info: ModuleInfo::from_path(module_prefixes),
                        name: name.clone(),
                    },
                );
            }
        }
        entries
    }
}

/// A trait definition the index will emit a file for.
#[derive(Clone, Debug)]
pub(crate) struct TraitEntry {
    pub(crate) module_info: ModuleInfo,
    pub(crate) name: String,
}

/// A finalized implementor entry, ready to be rendered into the index.
#[derive(Clone, Debug)]
pub(crate) struct ImplDoc {
    /// The implementing crate, used as the mapping key.
    pub(crate) crate_name: String,
    /// Fully qualified path of the implemented trait.
    pub(crate) trait_path: String,
    /// Fully qualified paths of the named types the impl is for.
    pub(crate) types: Vec<String>,
    pub(crate) is_synthetic: bool,
    pub(crate) impl_: Impl,
}

/// All indexable implementations gathered from the corpus.
pub(crate) struct Implementors(pub(crate) Vec<ImplDoc>);

impl Implementors {
    /// Walks every crate's item index and keeps the implementations that
    /// belong in the per-trait data files.
    pub(crate) fn from_corpus(
        corpus: &Corpus,
        traits: &BTreeMap<String, TraitEntry>,
    ) -> Result<Implementors> {
        let mut impls = Vec::new();
        for crate_doc in &corpus.0 {
            for (id, item) in &crate_doc.krate.index {
                let ItemEnum::Impl(imp) = &item.inner else {
                    continue;
                };
                match Descriptor::from_impl(crate_doc, id, item, imp, traits)? {
                    Descriptor::Indexable(impl_doc) => impls.push(*impl_doc),
                    Descriptor::NonIndexable => {}
                }
            }
        }
        Ok(Implementors(impls))
    }
}
