//! Sort and section Python import statements.
//!
//! The crate takes Python source as a string, extracts its imports with a
//! line-based scanner (strings and directive-guarded regions are left
//! alone), places each module into a configured section, orders everything
//! naturally, and writes the file back with the import block regenerated.
//!
//! ```
//! use pysort::{sort_code_string, Config};
//!
//! let sorted = sort_code_string("import sys\nimport os\n", &Config::default()).unwrap();
//! assert_eq!(sorted.output, "import os\nimport sys\n");
//! assert!(sorted.changed);
//! ```

use thiserror::Error;

mod comments;
mod format;
mod output;
mod parse;
pub mod place;
pub mod settings;
mod sorting;
mod wrap;
pub mod wrap_modes;

pub use place::Reason;
pub use settings::{
    Config, ImportType, KnownModules, RelativeImportsOrder, Section, SettingsError,
};
pub use wrap_modes::WrapMode;

/// Region markers: everything between a split is sorted independently.
const SPLIT_MARKER: &str = "# isort: split";

#[derive(Debug, Error)]
pub enum Error {
    /// The file opted out entirely with an `isort:skip_file` directive.
    #[error("file contains an isort:skip_file directive")]
    SkippedFile,
}

/// The result of sorting one source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorted {
    pub output: String,
    /// Whether the output differs from the input.
    pub changed: bool,
}

/// Sort the imports of a Python source string.
pub fn sort_code_string(code: &str, config: &Config) -> Result<Sorted, Error> {
    if code.contains("isort:skip_file") || code.contains("isort: skip_file") {
        return Err(Error::SkippedFile);
    }
    let line_separator = config
        .line_ending
        .clone()
        .unwrap_or_else(|| parse::infer_line_separator(code).to_string());
    let output = sort_with_splits(code, &line_separator, config);
    Ok(Sorted {
        changed: output != code,
        output,
    })
}

/// Report whether the source string is already sorted.
pub fn check_code_string(code: &str, config: &Config) -> Result<bool, Error> {
    Ok(!sort_code_string(code, config)?.changed)
}

/// Resolve the section a module name would be placed in.
pub fn place_module(name: &str, config: &Config) -> Section {
    place::module(name, config)
}

/// Like [`place_module`], but also reports why.
pub fn place_module_with_reason(name: &str, config: &Config) -> (Section, Reason) {
    place::module_with_reason(name, config)
}

fn sort_with_splits(code: &str, line_separator: &str, config: &Config) -> String {
    if !code.contains(SPLIT_MARKER) {
        return sort_segment(code, config);
    }
    let mut result = String::new();
    let mut current: Vec<&str> = Vec::new();
    for line in code.split(line_separator) {
        if line.trim() == SPLIT_MARKER {
            result.push_str(&sort_segment(&current.join(line_separator), config));
            result.push_str(line);
            result.push_str(line_separator);
            current.clear();
        } else {
            current.push(line);
        }
    }
    result.push_str(&sort_segment(&current.join(line_separator), config));
    result
}

fn sort_segment(code: &str, config: &Config) -> String {
    let mut parsed = parse::file_contents(code, config);
    output::sorted_imports(&mut parsed, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_reports_change() {
        let sorted = sort_code_string("import sys\nimport os\n", &Config::default()).unwrap();
        assert_eq!(sorted.output, "import os\nimport sys\n");
        assert!(sorted.changed);
    }

    #[test]
    fn unchanged_input_reports_no_change() {
        let sorted = sort_code_string("import os\nimport sys\n", &Config::default()).unwrap();
        assert!(!sorted.changed);
    }

    #[test]
    fn check_matches_sort() {
        let config = Config::default();
        assert!(check_code_string("import os\nimport sys\n", &config).unwrap());
        assert!(!check_code_string("import sys\nimport os\n", &config).unwrap());
    }

    #[test]
    fn skip_file_directive_is_an_error() {
        let result = sort_code_string("# isort:skip_file\nimport sys\nimport os\n", &Config::default());
        assert!(matches!(result, Err(Error::SkippedFile)));
    }

    #[test]
    fn split_marker_sorts_regions_independently() {
        let sorted = sort_code_string(
            "import sys\nimport os\n# isort: split\nimport collections\nimport abc\n",
            &Config::default(),
        )
        .unwrap();
        assert_eq!(
            sorted.output,
            "import os\nimport sys\n# isort: split\nimport abc\nimport collections\n"
        );
    }

    #[test]
    fn placement_is_exposed() {
        let config = Config::default();
        assert_eq!(
            place_module("os.path", &config),
            Section::Known(ImportType::StandardLibrary)
        );
        let (section, reason) = place_module_with_reason("requests", &config);
        assert_eq!(section, Section::Known(ImportType::ThirdParty));
        assert_eq!(reason, Reason::Default);
    }
}
