//! The command line interface for `doc-xref`.
use clap::Parser;

#[derive(Debug, Parser, Default)]
#[clap(
    name = "doc-xref",
    about = "Builds trait-implementor cross-reference indexes for generated documentation",
    version
)]
pub struct Command {
    /// Path to the directory holding the rustdoc JSON dumps, one per
    /// documented crate. By default, doc-xref looks in the current directory.
    #[clap(long)]
    pub path: Option<String>,
    /// Documentation root the `implementors/` tree is written into. Defaults
    /// to the input directory.
    #[clap(long)]
    pub out: Option<String>,
    /// Index implementations of non-public traits as well.
    #[clap(long)]
    pub document_private_items: bool,
    /// Emit self-contained JSON data files instead of registry scripts.
    #[clap(long)]
    pub json: bool,
    /// Silent mode. Don't output any warnings or errors to the command line.
    #[clap(long = "silent", short = 's')]
    pub silent: bool,
}
