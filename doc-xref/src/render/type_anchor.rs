//! Creation of HTML anchors for types that can be linked.

use crate::{doc::module::ModuleInfo, render::RenderPlan};
use anyhow::{anyhow, Result};
use horrorshow::{box_html, RenderBox};
use rustdoc_types::{
    GenericArg, GenericArgs, GenericBound, GenericParamDef, ItemKind, ItemSummary, Path, PolyTrait,
    Term, TraitBoundModifier, Type,
};

/// Upstream standard library documentation, used for primitive links the same
/// way generated pages link `u8` or `[T; N]`.
const STD_DOC_ROOT: &str = "https://doc.rust-lang.org/nightly/";

/// Handles types & nested types that should have links,
/// e.g. `[Endpoint]<(u32, [Endpoint])>` (`[]` represent types with links).
///
/// Types the signature dialect cannot express make the whole entry
/// unrenderable; the caller drops it with a warning.
pub(crate) fn render_type_anchor(
    ty: &Type,
    render_plan: &RenderPlan<'_>,
) -> Result<Box<dyn RenderBox>> {
    match ty {
        Type::ResolvedPath(path) => render_path_anchor(path, render_plan),
        Type::Generic(name) => Ok(plain(name.clone())),
        Type::Primitive(name) => Ok(primitive_anchor(name, name.clone())),
        Type::Tuple(types) => {
            let mut rendered = Vec::new();
            for ty in types {
                rendered.push(render_type_anchor(ty, render_plan)?);
            }
            Ok(box_html! {
                : "(";
                @ for (i, ty) in rendered.into_iter().enumerate() {
                    @ if i > 0 { : ", "; }
                    : ty;
                }
                : ")";
            })
        }
        Type::Slice(inner) => {
            let inner = render_type_anchor(inner, render_plan)?;
            Ok(box_html! {
                : primitive_anchor("slice", "[".into());
                : inner;
                : primitive_anchor("slice", "]".into());
            })
        }
        Type::Array { type_, len } => {
            let inner = render_type_anchor(type_, render_plan)?;
            let closing = format!("; {len}]");
            Ok(box_html! {
                : primitive_anchor("array", "[".into());
                : inner;
                : primitive_anchor("array", closing);
            })
        }
        Type::BorrowedRef {
            lifetime,
            is_mutable,
            type_,
        } => {
            let mut prefix = String::from("&");
            if let Some(lifetime) = lifetime {
                prefix.push_str(lifetime);
                prefix.push(' ');
            }
            if *is_mutable {
                prefix.push_str("mut ");
            }
            let inner = render_type_anchor(type_, render_plan)?;
            Ok(box_html! {
                : prefix;
                : inner;
            })
        }
        Type::RawPointer { is_mutable, type_ } => {
            let prefix = if *is_mutable { "*mut " } else { "*const " };
            let inner = render_type_anchor(type_, render_plan)?;
            Ok(box_html! {
                : prefix;
                : inner;
            })
        }
        Type::DynTrait(dyn_trait) => {
            let mut rendered = Vec::new();
            for poly_trait in &dyn_trait.traits {
                rendered.push(render_poly_trait(poly_trait, render_plan)?);
            }
            let lifetime_suffix = dyn_trait
                .lifetime
                .as_ref()
                .map(|lifetime| format!(" + {lifetime}"))
                .unwrap_or_default();
            Ok(box_html! {
                : "dyn ";
                @ for (i, poly_trait) in rendered.into_iter().enumerate() {
                    @ if i > 0 { : " + "; }
                    : poly_trait;
                }
                : lifetime_suffix;
            })
        }
        Type::ImplTrait(bounds) => {
            let bounds = render_bounds(bounds, render_plan)?;
            Ok(box_html! {
                : "impl ";
                : bounds;
            })
        }
        Type::QualifiedPath {
            name,
            self_type,
            trait_,
            ..
        } => {
            // Projections render as escaped plain text, the way generated
            // pages embed `<T as Config>::AccountId`.
            let self_type = render_type_anchor(self_type, render_plan)?;
            let as_clause = trait_
                .as_ref()
                .map(|trait_ref| {
                    let trait_name = trait_ref
                        .path
                        .rsplit("::")
                        .next()
                        .unwrap_or(&trait_ref.path);
                    format!(" as {trait_name}")
                })
                .unwrap_or_default();
            let suffix = format!(">::{name}");
            Ok(box_html! {
                : "<";
                : self_type;
                : as_clause;
                : suffix;
            })
        }
        Type::Infer => Ok(plain("_".into())),
        _ => Err(anyhow!("undetermined or unusable type in impl signature")),
    }
}

/// A resolved path: the anchor for the named item followed by its rendered
/// generic arguments.
pub(crate) fn render_path_anchor(
    path: &Path,
    render_plan: &RenderPlan<'_>,
) -> Result<Box<dyn RenderBox>> {
    let anchor = named_item_anchor(path, render_plan);
    let args: Box<dyn RenderBox> = match path.args.as_deref() {
        Some(args) => render_generic_args(args, render_plan)?,
        None => box_html! {},
    };
    Ok(box_html! {
        : anchor;
        : args;
    })
}

/// Items whose page cannot be located render as plain text instead of a
/// dead link.
fn named_item_anchor(path: &Path, render_plan: &RenderPlan<'_>) -> Box<dyn RenderBox> {
    let fallback = path
        .path
        .rsplit("::")
        .next()
        .unwrap_or(&path.path)
        .to_string();
    let Some(summary) = render_plan.crate_doc.krate.paths.get(&path.id) else {
        return plain(fallback);
    };
    let Some(kind) = item_kind_str(&summary.kind) else {
        return plain(fallback);
    };
    let [module_prefixes @ .., name] = summary.path.as_slice() else {
        return plain(fallback);
    };
    if module_prefixes.is_empty() {
        return plain(fallback);
    }
    let name = name.clone();
    let title = format!("{kind} {}", summary.path.join("::"));
    let file_name = format!("{kind}.{name}.html");
    let Some(href) = item_href(summary, &file_name, render_plan) else {
        return plain(name);
    };
    box_html! {
        a(class=kind, href=href, title=title) {
            : name;
        }
    }
}

/// Root-relative href for items documented in this root, absolute href for
/// external crates that publish their documentation location, `None` when
/// there is nothing to link to.
fn item_href(
    summary: &ItemSummary,
    file_name: &str,
    render_plan: &RenderPlan<'_>,
) -> Option<String> {
    let module_info = ModuleInfo::from_path(&summary.path[..summary.path.len() - 1]);
    if summary.crate_id == 0 {
        return Some(module_info.item_href(file_name));
    }
    let external = render_plan
        .crate_doc
        .krate
        .external_crates
        .get(&summary.crate_id)?;
    if render_plan.corpus.get(&external.name).is_some() {
        return Some(module_info.item_href(file_name));
    }
    let root_url = external.html_root_url.as_ref()?;
    Some(format!(
        "{}/{}",
        root_url.trim_end_matches('/'),
        module_info.item_href(file_name)
    ))
}

fn item_kind_str(kind: &ItemKind) -> Option<&'static str> {
    match kind {
        ItemKind::Trait => Some("trait"),
        ItemKind::Struct => Some("struct"),
        ItemKind::Enum => Some("enum"),
        ItemKind::Union => Some("union"),
        ItemKind::TypeAlias => Some("type"),
        ItemKind::Primitive => Some("primitive"),
        _ => None,
    }
}

pub(crate) fn render_generic_args(
    args: &GenericArgs,
    render_plan: &RenderPlan<'_>,
) -> Result<Box<dyn RenderBox>> {
    match args {
        GenericArgs::AngleBracketed { args, constraints } => {
            if args.is_empty() && constraints.is_empty() {
                return Ok(box_html! {});
            }
            let mut rendered: Vec<Box<dyn RenderBox>> = Vec::new();
            for arg in args {
                rendered.push(render_generic_arg(arg, render_plan)?);
            }
            for constraint in constraints {
                let name = constraint.name.clone();
                let rhs: Box<dyn RenderBox> = match &constraint.binding {
                    rustdoc_types::AssocItemConstraintKind::Equality(term) => {
                        let term = render_term(term, render_plan)?;
                        box_html! { : " = "; : term; }
                    }
                    rustdoc_types::AssocItemConstraintKind::Constraint(bounds) => {
                        let bounds = render_bounds(bounds, render_plan)?;
                        box_html! { : ": "; : bounds; }
                    }
                };
                rendered.push(box_html! { : name; : rhs; });
            }
            Ok(box_html! {
                : "<";
                @ for (i, arg) in rendered.into_iter().enumerate() {
                    @ if i > 0 { : ", "; }
                    : arg;
                }
                : ">";
            })
        }
        GenericArgs::Parenthesized { inputs, output } => {
            let mut rendered = Vec::new();
            for ty in inputs {
                rendered.push(render_type_anchor(ty, render_plan)?);
            }
            let ret: Box<dyn RenderBox> = match output {
                Some(ty) => {
                    let ty = render_type_anchor(ty, render_plan)?;
                    box_html! { : " -> "; : ty; }
                }
                None => box_html! {},
            };
            Ok(box_html! {
                : "(";
                @ for (i, ty) in rendered.into_iter().enumerate() {
                    @ if i > 0 { : ", "; }
                    : ty;
                }
                : ")";
                : ret;
            })
        }
        _ => Err(anyhow!("unusable generic arguments in impl signature")),
    }
}

fn render_generic_arg(
    arg: &GenericArg,
    render_plan: &RenderPlan<'_>,
) -> Result<Box<dyn RenderBox>> {
    match arg {
        GenericArg::Lifetime(lifetime) => Ok(plain(lifetime.clone())),
        GenericArg::Type(ty) => render_type_anchor(ty, render_plan),
        GenericArg::Const(constant) => Ok(plain(constant.expr.clone())),
        GenericArg::Infer => Ok(plain("_".into())),
    }
}

pub(crate) fn render_term(term: &Term, render_plan: &RenderPlan<'_>) -> Result<Box<dyn RenderBox>> {
    match term {
        Term::Type(ty) => render_type_anchor(ty, render_plan),
        Term::Constant(constant) => Ok(plain(constant.expr.clone())),
    }
}

pub(crate) fn render_bound(
    bound: &GenericBound,
    render_plan: &RenderPlan<'_>,
) -> Result<Box<dyn RenderBox>> {
    match bound {
        GenericBound::TraitBound {
            trait_,
            generic_params,
            modifier,
        } => {
            let prefix = match modifier {
                TraitBoundModifier::None => "",
                TraitBoundModifier::Maybe => "?",
                TraitBoundModifier::MaybeConst => "~const ",
            };
            let hrtb = hrtb_prefix(generic_params);
            let path = render_path_anchor(trait_, render_plan)?;
            Ok(box_html! {
                : prefix;
                : hrtb;
                : path;
            })
        }
        GenericBound::Outlives(lifetime) => Ok(plain(lifetime.clone())),
        _ => Err(anyhow!("unusable generic bound in impl signature")),
    }
}

pub(crate) fn render_bounds(
    bounds: &[GenericBound],
    render_plan: &RenderPlan<'_>,
) -> Result<Box<dyn RenderBox>> {
    let mut rendered = Vec::new();
    for bound in bounds {
        rendered.push(render_bound(bound, render_plan)?);
    }
    Ok(box_html! {
        @ for (i, bound) in rendered.into_iter().enumerate() {
            @ if i > 0 { : " + "; }
            : bound;
        }
    })
}

fn render_poly_trait(
    poly_trait: &PolyTrait,
    render_plan: &RenderPlan<'_>,
) -> Result<Box<dyn RenderBox>> {
    let hrtb = hrtb_prefix(&poly_trait.generic_params);
    let path = render_path_anchor(&poly_trait.trait_, render_plan)?;
    Ok(box_html! {
        : hrtb;
        : path;
    })
}

/// `for<'a> ` prefix on higher-ranked bounds; empty when there is nothing
/// to bind.
pub(crate) fn hrtb_prefix(generic_params: &[GenericParamDef]) -> String {
    if generic_params.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = generic_params
        .iter()
        .map(|param| param.name.as_str())
        .collect();
    format!("for<{}> ", names.join(", "))
}

fn primitive_anchor(primitive: &str, text: String) -> Box<dyn RenderBox> {
    let href = format!("{STD_DOC_ROOT}std/primitive.{primitive}.html");
    box_html! {
        a(class="primitive", href=href) {
            : text;
        }
    }
}

fn plain(text: String) -> Box<dyn RenderBox> {
    box_html! {
        : text;
    }
}
