//! Determine whether an impl item belongs in the implementor index.

use crate::doc::{CrateDoc, ImplDoc, TraitEntry};
use anyhow::Result;
use doc_xref_tracing::println_yellow_err;
use rustdoc_types::{GenericArg, GenericArgs, Id, Impl, Item, Type};
use std::collections::BTreeMap;
use tracing::debug;

/// Used in deciding whether or not an impl is registered in the index.
pub(crate) enum Descriptor {
    Indexable(Box<ImplDoc>),
    NonIndexable,
}

impl Descriptor {
    /// Decides whether an impl item is [`Descriptor::Indexable`].
    ///
    /// Inherent impls, blanket impls, impls inlined from other crates, and
    /// impls of traits that are not defined by any loaded crate are all left
    /// out. An impl whose self type names no indexable type is skipped with
    /// a warning, so every surviving entry carries a non-empty type list.
    pub(crate) fn from_impl(
        crate_doc: &CrateDoc,
        id: &Id,
        item: &Item,
        imp: &Impl,
        traits: &BTreeMap<String, TraitEntry>,
    ) -> Result<Self> {
        if item.crate_id != 0 {
            return Ok(Descriptor::NonIndexable);
        }
        let Some(trait_ref) = &imp.trait_ else {
            // inherent impl
            return Ok(Descriptor::NonIndexable);
        };
        if imp.blanket_impl.is_some() {
            debug!(
                "blanket impl of `{}` in `{}` is not registered per crate",
                trait_ref.path, crate_doc.name
            );
            return Ok(Descriptor::NonIndexable);
        }
        let Some(summary) = crate_doc.krate.paths.get(&trait_ref.id) else {
            debug!(
                "impl {id:?} in `{}` references unresolvable trait `{}`",
                crate_doc.name, trait_ref.path
            );
            return Ok(Descriptor::NonIndexable);
        };
        let trait_path = summary.path.join("::");
        if !traits.contains_key(&trait_path) {
            debug!("`{trait_path}` is not defined by this documentation root");
            return Ok(Descriptor::NonIndexable);
        }
        let types = type_paths(crate_doc, &imp.for_);
        if types.is_empty() {
            println_yellow_err(&format!(
                "skipping an implementation of `{trait_path}` in `{}`: its self type names no indexable type",
                crate_doc.name
            ));
            return Ok(Descriptor::NonIndexable);
        }
        Ok(Descriptor::Indexable(Box::new(ImplDoc {
            crate_name: crate_doc.name.clone(),
            trait_path,
            types,
            is_synthetic: imp.is_synthetic,
            impl_: imp.clone(),
        })))
    }
}

/// Collects the fully qualified paths of every named type mentioned in an
/// impl's self type, outermost first.
fn type_paths(crate_doc: &CrateDoc, ty: &Type) -> Vec<String> {
    let mut paths = Vec::new();
    collect_type_paths(crate_doc, ty, &mut paths);
    paths
}

fn collect_type_paths(crate_doc: &CrateDoc, ty: &Type, paths: &mut Vec<String>) {
    match ty {
        Type::ResolvedPath(path) => {
            if let Some(summary) = crate_doc.krate.paths.get(&path.id) {
                let fq_path = summary.path.join("::");
                if !paths.contains(&fq_path) {
                    paths.push(fq_path);
                }
            }
            if let Some(args) = &path.args {
                collect_args_paths(crate_doc, args, paths);
            }
        }
        Type::DynTrait(dyn_trait) => {
            for poly_trait in &dyn_trait.traits {
                if let Some(summary) = crate_doc.krate.paths.get(&poly_trait.trait_.id) {
                    let fq_path = summary.path.join("::");
                    if !paths.contains(&fq_path) {
                        paths.push(fq_path);
                    }
                }
            }
        }
        Type::Tuple(types) => {
            for ty in types {
                collect_type_paths(crate_doc, ty, paths);
            }
        }
        Type::Slice(inner) => collect_type_paths(crate_doc, inner, paths),
        Type::Array { type_, .. } => collect_type_paths(crate_doc, type_, paths),
        Type::RawPointer { type_, .. } => collect_type_paths(crate_doc, type_, paths),
        Type::BorrowedRef { type_, .. } => collect_type_paths(crate_doc, type_, paths),
        // Generics, primitives, projections and the rest name no indexable type.
        _ => {}
    }
}

fn collect_args_paths(crate_doc: &CrateDoc, args: &GenericArgs, paths: &mut Vec<String>) {
    match args {
        GenericArgs::AngleBracketed { args, .. } => {
            for arg in args {
                if let GenericArg::Type(ty) = arg {
                    collect_type_paths(crate_doc, ty, paths);
                }
            }
        }
        GenericArgs::Parenthesized { inputs, output } => {
            for ty in inputs {
                collect_type_paths(crate_doc, ty, paths);
            }
            if let Some(ty) = output {
                collect_type_paths(crate_doc, ty, paths);
            }
        }
        _ => {}
    }
}
