//! Rendering implementor entries to embeddable HTML.

pub(crate) mod type_anchor;

use crate::doc::{Corpus, CrateDoc, ImplDoc};
use anyhow::Result;
use horrorshow::{box_html, Raw, RenderBox};
use rustdoc_types::{GenericParamDef, GenericParamDefKind, WherePredicate};
use type_anchor::{hrtb_prefix, render_bounds, render_generic_args, render_term, render_type_anchor};

/// Information passed to the render phase to resolve ids into anchors.
#[derive(Clone, Copy)]
pub(crate) struct RenderPlan<'e> {
    pub(crate) corpus: &'e Corpus,
    /// The crate the rendered entry was declared in; ids resolve against its
    /// path table.
    pub(crate) crate_doc: &'e CrateDoc,
}

pub(crate) trait Renderable {
    fn render(self, render_plan: RenderPlan<'_>) -> Result<Box<dyn RenderBox>>;
}

impl Renderable for &ImplDoc {
    /// The impl signature exactly as trait pages embed it.
    fn render(self, render_plan: RenderPlan<'_>) -> Result<Box<dyn RenderBox>> {
        let generics = render_generics_prefix(&self.impl_.generics.params, &render_plan)?;
        let trait_name = self
            .trait_path
            .rsplit("::")
            .next()
            .unwrap_or(&self.trait_path)
            .to_string();
        let trait_args: Box<dyn RenderBox> =
            match self.impl_.trait_.as_ref().and_then(|path| path.args.as_deref()) {
                Some(args) => render_generic_args(args, &render_plan)?,
                None => box_html! {},
            };
        let for_type = render_type_anchor(&self.impl_.for_, &render_plan)?;
        let where_clause =
            render_where_clause(&self.impl_.generics.where_predicates, &render_plan)?;
        let is_negative = self.impl_.is_negative;
        Ok(box_html! {
            : "impl";
            : generics;
            : " ";
            @ if is_negative { : "!"; }
            : trait_name;
            : trait_args;
            : " for ";
            : for_type;
            : where_clause;
        })
    }
}

fn render_generics_prefix(
    params: &[GenericParamDef],
    render_plan: &RenderPlan<'_>,
) -> Result<Box<dyn RenderBox>> {
    let mut rendered: Vec<Box<dyn RenderBox>> = Vec::new();
    for param in params {
        let name = param.name.clone();
        match &param.kind {
            GenericParamDefKind::Lifetime { .. } => rendered.push(box_html! { : name; }),
            GenericParamDefKind::Type {
                bounds,
                is_synthetic,
                ..
            } => {
                // `impl Trait` in argument position desugars to a synthetic
                // parameter; signatures never spell those out.
                if *is_synthetic {
                    continue;
                }
                if bounds.is_empty() {
                    rendered.push(box_html! { : name; });
                } else {
                    let bounds = render_bounds(bounds, render_plan)?;
                    rendered.push(box_html! {
                        : name;
                        : ":";
                        : Raw("&nbsp;");
                        : bounds;
                    });
                }
            }
            GenericParamDefKind::Const { type_, .. } => {
                let ty = render_type_anchor(type_, render_plan)?;
                rendered.push(box_html! {
                    : "const ";
                    : name;
                    : ": ";
                    : ty;
                });
            }
        }
    }
    if rendered.is_empty() {
        return Ok(box_html! {});
    }
    Ok(box_html! {
        : "<";
        @ for (i, param) in rendered.into_iter().enumerate() {
            @ if i > 0 { : ", "; }
            : param;
        }
        : ">";
    })
}

fn render_where_clause(
    where_predicates: &[WherePredicate],
    render_plan: &RenderPlan<'_>,
) -> Result<Box<dyn RenderBox>> {
    if where_predicates.is_empty() {
        return Ok(box_html! {});
    }
    let mut rendered: Vec<Box<dyn RenderBox>> = Vec::new();
    for predicate in where_predicates {
        match predicate {
            WherePredicate::BoundPredicate {
                type_,
                bounds,
                generic_params,
            } => {
                let hrtb = hrtb_prefix(generic_params);
                let ty = render_type_anchor(type_, render_plan)?;
                let bounds = render_bounds(bounds, render_plan)?;
                rendered.push(box_html! {
                    : hrtb;
                    : ty;
                    : ": ";
                    : bounds;
                });
            }
            WherePredicate::LifetimePredicate { lifetime, outlives } => {
                let lifetime = lifetime.clone();
                let outlives = outlives.join(" + ");
                rendered.push(box_html! {
                    : lifetime;
                    : ": ";
                    : outlives;
                });
            }
            WherePredicate::EqPredicate { lhs, rhs } => {
                let lhs = render_type_anchor(lhs, render_plan)?;
                let rhs = render_term(rhs, render_plan)?;
                rendered.push(box_html! {
                    : lhs;
                    : " = ";
                    : rhs;
                });
            }
        }
    }
    Ok(box_html! {
        : " ";
        span(class="where fmt-newline") {
            : "where";
            @ for predicate in rendered {
                : Raw("<br>&nbsp;&nbsp;&nbsp;&nbsp;");
                : predicate;
                : ",";
                : Raw("&nbsp;");
            }
        }
    })
}
