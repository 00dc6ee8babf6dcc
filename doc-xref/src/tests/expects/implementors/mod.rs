use crate::{
    build_index,
    cli::Command,
    tests::{
        bound_predicate, dump, generic, generics, impl_decl, item, path, resolved, summary,
        trait_bound, trait_decl, type_arg, type_param, write_dump,
    },
    IndexSummary, IMPLEMENTORS_DIR_NAME,
};

use super::check_file;
use expect_test::expect;
use serde_json::{json, Value};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// The trait-defining crate: `conduit::channel::Sink`.
fn conduit_dump() -> Value {
    dump(
        "conduit",
        vec![item(1, json!("Sink"), json!("public"), trait_decl())],
        vec![(1, summary(0, "trait", &["conduit", "channel", "Sink"]))],
        vec![],
    )
}

/// `impl<T: Flush> Sink<T> for Endpoint<T> where [u8; 32]: From<T>`, plus a
/// helper trait of its own so the build has an implementor-less trait too.
fn relay_dump() -> Value {
    let array_of_u8 = json!({"array": {"type": {"primitive": "u8"}, "len": "32"}});
    dump(
        "relay",
        vec![
            item(2, json!("Flush"), json!("public"), trait_decl()),
            item(
                9,
                Value::Null,
                json!("default"),
                impl_decl(
                    path("Sink", 5, vec![type_arg(generic("T"))]),
                    resolved(path("Endpoint", 1, vec![type_arg(generic("T"))])),
                    generics(
                        vec![type_param("T", vec![trait_bound(path("Flush", 2, vec![]))])],
                        vec![bound_predicate(
                            array_of_u8,
                            vec![trait_bound(path("From", 7, vec![type_arg(generic("T"))]))],
                        )],
                    ),
                    false,
                ),
            ),
        ],
        vec![
            (1, summary(0, "struct", &["relay", "endpoint", "Endpoint"])),
            (2, summary(0, "trait", &["relay", "endpoint", "Flush"])),
            (5, summary(1, "trait", &["conduit", "channel", "Sink"])),
            (7, summary(2, "trait", &["core", "convert", "From"])),
        ],
        vec![
            (1, "conduit", None),
            (2, "core", Some("https://doc.rust-lang.org/nightly/")),
        ],
    )
}

/// `impl<T> Sink<T> for Endpoint<T>` with no bounds at all.
fn mirror_dump() -> Value {
    dump(
        "mirror",
        vec![item(
            9,
            Value::Null,
            json!("default"),
            impl_decl(
                path("Sink", 5, vec![type_arg(generic("T"))]),
                resolved(path("Endpoint", 1, vec![type_arg(generic("T"))])),
                generics(vec![type_param("T", vec![])], vec![]),
                false,
            ),
        )],
        vec![
            (1, summary(0, "struct", &["mirror", "endpoint", "Endpoint"])),
            (5, summary(1, "trait", &["conduit", "channel", "Sink"])),
        ],
        vec![(1, "conduit", None)],
    )
}

/// Single-crate root: `signal::Reset` implemented by `signal::Breaker`.
fn signal_dump(synthetic: bool) -> Value {
    dump(
        "signal",
        vec![
            item(1, json!("Reset"), json!("public"), trait_decl()),
            item(
                9,
                Value::Null,
                json!("default"),
                impl_decl(
                    path("Reset", 1, vec![]),
                    resolved(path("Breaker", 2, vec![])),
                    generics(vec![], vec![]),
                    synthetic,
                ),
            ),
        ],
        vec![
            (1, summary(0, "trait", &["signal", "Reset"])),
            (2, summary(0, "struct", &["signal", "Breaker"])),
        ],
        vec![],
    )
}

/// A private trait with one local implementor.
fn vault_dump() -> Value {
    dump(
        "vault",
        vec![
            item(1, json!("Seal"), json!("default"), trait_decl()),
            item(
                9,
                Value::Null,
                json!("default"),
                impl_decl(
                    path("Seal", 1, vec![]),
                    resolved(path("Door", 2, vec![])),
                    generics(vec![], vec![]),
                    false,
                ),
            ),
        ],
        vec![
            (1, summary(0, "trait", &["vault", "Seal"])),
            (2, summary(0, "struct", &["vault", "Door"])),
        ],
        vec![],
    )
}

/// An impl of a trait that lives outside this documentation root.
fn probe_dump() -> Value {
    dump(
        "probe",
        vec![item(
            9,
            Value::Null,
            json!("default"),
            impl_decl(
                path("Serialize", 5, vec![]),
                resolved(path("Reading", 1, vec![])),
                generics(vec![], vec![]),
                false,
            ),
        )],
        vec![
            (1, summary(0, "struct", &["probe", "Reading"])),
            (5, summary(1, "trait", &["serde", "Serialize"])),
        ],
        vec![(1, "serde", None)],
    )
}

fn run_build(input: &TempDir, json: bool, document_private_items: bool) -> (TempDir, IndexSummary) {
    let out = tempfile::tempdir().unwrap();
    let command = Command {
        path: Some(input.path().display().to_string()),
        out: Some(out.path().display().to_string()),
        json,
        document_private_items,
        ..Default::default()
    };
    let (_, summary) = build_index(&command).unwrap();
    (out, summary)
}

fn assert_file_tree(doc_path: &Path, expected_files: Vec<&str>) {
    let expected = expected_files
        .iter()
        .map(PathBuf::from)
        .collect::<HashSet<PathBuf>>();
    let files = walkdir::WalkDir::new(doc_path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().strip_prefix(doc_path).unwrap().to_path_buf())
        .collect::<HashSet<PathBuf>>();
    if files != expected {
        let diffs: Vec<_> = files.symmetric_difference(&expected).collect();
        assert_eq!(
            files, expected,
            "Symmetric Difference: {diffs:?} at {doc_path:?}"
        );
    }
}

#[test]
fn test_registry_scripts_default() {
    let input = tempfile::tempdir().unwrap();
    write_dump(input.path(), "conduit", &conduit_dump());
    write_dump(input.path(), "relay", &relay_dump());
    write_dump(input.path(), "mirror", &mirror_dump());
    let (out, summary) = run_build(&input, false, false);
    assert_eq!(summary.traits, 2);
    assert_eq!(summary.implementors, 2);
    check_file(
        out.path(),
        &PathBuf::from("implementors/conduit/channel/trait.Sink.js"),
        &expect![[r#"
            (function() {var implementors = {};
            implementors["mirror"] = [{"text":"impl&lt;T&gt; Sink&lt;T&gt; for <a class=\"struct\" href=\"mirror/endpoint/struct.Endpoint.html\" title=\"struct mirror::endpoint::Endpoint\">Endpoint</a>&lt;T&gt;","synthetic":false,"types":["mirror::endpoint::Endpoint"]}];
            implementors["relay"] = [{"text":"impl&lt;T:&nbsp;<a class=\"trait\" href=\"relay/endpoint/trait.Flush.html\" title=\"trait relay::endpoint::Flush\">Flush</a>&gt; Sink&lt;T&gt; for <a class=\"struct\" href=\"relay/endpoint/struct.Endpoint.html\" title=\"struct relay::endpoint::Endpoint\">Endpoint</a>&lt;T&gt; <span class=\"where fmt-newline\">where<br>&nbsp;&nbsp;&nbsp;&nbsp;<a class=\"primitive\" href=\"https://doc.rust-lang.org/nightly/std/primitive.array.html\">[</a><a class=\"primitive\" href=\"https://doc.rust-lang.org/nightly/std/primitive.u8.html\">u8</a><a class=\"primitive\" href=\"https://doc.rust-lang.org/nightly/std/primitive.array.html\">; 32]</a>: <a class=\"trait\" href=\"https://doc.rust-lang.org/nightly/core/convert/trait.From.html\" title=\"trait core::convert::From\">From</a>&lt;T&gt;,&nbsp;</span>","synthetic":false,"types":["relay::endpoint::Endpoint"]}];
            if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()"#]],
    );
    // implementor-less traits still get a file, with an empty mapping
    check_file(
        out.path(),
        &PathBuf::from("implementors/relay/endpoint/trait.Flush.js"),
        &expect![[r#"
            (function() {var implementors = {};
            if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()"#]],
    );
    assert_file_tree(
        out.path(),
        vec![
            "implementors/conduit/channel/trait.Sink.js",
            "implementors/relay/endpoint/trait.Flush.js",
        ],
    );
}

#[test]
fn test_json_data_files() {
    let input = tempfile::tempdir().unwrap();
    write_dump(input.path(), "signal", &signal_dump(false));
    let (out, summary) = run_build(&input, true, false);
    assert_eq!(summary.traits, 1);
    assert_eq!(summary.implementors, 1);
    check_file(
        out.path(),
        &PathBuf::from("implementors/signal/trait.Reset.json"),
        &expect![[r#"
            {
              "trait": "signal::Reset",
              "implementors": {
                "signal": [
                  {
                    "text": "impl Reset for <a class=\"struct\" href=\"signal/struct.Breaker.html\" title=\"struct signal::Breaker\">Breaker</a>",
                    "synthetic": false,
                    "types": [
                      "signal::Breaker"
                    ]
                  }
                ]
              }
            }"#]],
    );
    assert_file_tree(out.path(), vec!["implementors/signal/trait.Reset.json"]);
}

#[test]
fn test_synthetic_flag_is_carried() {
    let input = tempfile::tempdir().unwrap();
    write_dump(input.path(), "signal", &signal_dump(true));
    let (out, _) = run_build(&input, false, false);
    check_file(
        out.path(),
        &PathBuf::from("implementors/signal/trait.Reset.js"),
        &expect![[r#"
            (function() {var implementors = {};
            implementors["signal"] = [{"text":"impl Reset for <a class=\"struct\" href=\"signal/struct.Breaker.html\" title=\"struct signal::Breaker\">Breaker</a>","synthetic":true,"types":["signal::Breaker"]}];
            if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()"#]],
    );
}

#[test]
fn test_rebuilds_are_byte_identical() {
    let input = tempfile::tempdir().unwrap();
    write_dump(input.path(), "conduit", &conduit_dump());
    write_dump(input.path(), "relay", &relay_dump());
    write_dump(input.path(), "mirror", &mirror_dump());
    let (first, _) = run_build(&input, false, false);
    let (second, _) = run_build(&input, false, false);
    let file = PathBuf::from("implementors/conduit/channel/trait.Sink.js");
    assert_eq!(
        fs::read_to_string(first.path().join(&file)).unwrap(),
        fs::read_to_string(second.path().join(&file)).unwrap(),
    );
}

#[test]
fn test_private_traits_need_opting_in() {
    let input = tempfile::tempdir().unwrap();
    write_dump(input.path(), "vault", &vault_dump());

    let (out, summary) = run_build(&input, false, false);
    assert_eq!(summary.traits, 0);
    assert_eq!(summary.implementors, 0);
    assert!(!out.path().join(IMPLEMENTORS_DIR_NAME).exists());

    let (out, summary) = run_build(&input, false, true);
    assert_eq!(summary.traits, 1);
    assert_eq!(summary.implementors, 1);
    assert!(out
        .path()
        .join("implementors/vault/trait.Seal.js")
        .exists());
}

#[test]
fn test_foreign_trait_impls_are_ignored() {
    let input = tempfile::tempdir().unwrap();
    write_dump(input.path(), "probe", &probe_dump());
    let (out, summary) = run_build(&input, false, false);
    assert_eq!(summary.traits, 0);
    assert_eq!(summary.implementors, 0);
    assert!(!out.path().join(IMPLEMENTORS_DIR_NAME).exists());
}

#[test]
fn test_unnamed_self_types_are_skipped() {
    let input = tempfile::tempdir().unwrap();
    let mut dump_value = signal_dump(false);
    dump_value["index"]["9"]["inner"]["impl"]["for"] = json!({"primitive": "u8"});
    write_dump(input.path(), "signal", &dump_value);
    let (out, summary) = run_build(&input, false, false);
    assert_eq!(summary.traits, 1);
    assert_eq!(summary.implementors, 0);
    check_file(
        out.path(),
        &PathBuf::from("implementors/signal/trait.Reset.js"),
        &expect![[r#"
            (function() {var implementors = {};
            if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()"#]],
    );
}

#[test]
fn test_blanket_impls_are_not_registered() {
    let input = tempfile::tempdir().unwrap();
    let mut dump_value = signal_dump(false);
    dump_value["index"]["9"]["inner"]["impl"]["blanket_impl"] = generic("T");
    write_dump(input.path(), "signal", &dump_value);
    let (_, summary) = run_build(&input, false, false);
    assert_eq!(summary.traits, 1);
    assert_eq!(summary.implementors, 0);
}
