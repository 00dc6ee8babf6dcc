//! Module path information for indexed items.

use std::path::PathBuf;

/// The module location of an item as a list of path prefixes, the first
/// prefix always being the crate name.
#[derive(Clone, Debug)]
pub(crate) struct ModuleInfo {
    pub(crate) module_prefixes: Vec<String>,
}

impl ModuleInfo {
    pub(crate) fn from_path(module_prefixes: &[String]) -> Self {
        Self {
            module_prefixes: module_prefixes.to_vec(),
        }
    }

    /// The directory this module's data files live in, relative to the index root.
    pub(crate) fn dir(&self) -> PathBuf {
        self.module_prefixes.iter().collect()
    }

    /// A root-relative href for a file in this module, usable from any page
    /// served out of the same documentation root.
    pub(crate) fn item_href(&self, file_name: &str) -> String {
        let mut href = self.module_prefixes.join("/");
        href.push('/');
        href.push_str(file_name);
        href
    }
}
