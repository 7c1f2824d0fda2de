//! Settings for the import sorter.

use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter;
use std::path::PathBuf;

use glob::Pattern;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::wrap_modes::WrapMode;

/// The built-in sections imports can be sorted into.
#[derive(
    Debug, PartialOrd, Ord, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum ImportType {
    Future,
    StandardLibrary,
    ThirdParty,
    FirstParty,
    LocalFolder,
}

/// A named bucket that imports are sorted into: one of the built-in
/// sections, a user-declared custom section, or a forced-separate
/// pseudo-section kept apart from the normal ordering.
#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Clone, Hash)]
pub enum Section {
    Known(ImportType),
    UserDefined(String),
    ForcedSeparate(String),
}

impl Section {
    /// The section's configuration label (e.g. `STDLIB`), used for section
    /// headings and the `isort:imports-` placement directive.
    pub fn label(&self) -> &str {
        match self {
            Section::Known(ImportType::Future) => "FUTURE",
            Section::Known(ImportType::StandardLibrary) => "STDLIB",
            Section::Known(ImportType::ThirdParty) => "THIRDPARTY",
            Section::Known(ImportType::FirstParty) => "FIRSTPARTY",
            Section::Known(ImportType::LocalFolder) => "LOCALFOLDER",
            Section::UserDefined(name) | Section::ForcedSeparate(name) => name,
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelativeImportsOrder {
    /// Place "closer" imports (fewer `.` characters, most local) before
    /// "further" imports (more `.` characters, least local).
    ClosestToFurthest,
    /// Place "further" imports (more `.` characters, least local) before
    /// "closer" imports (fewer `.` characters, most local).
    FurthestToClosest,
}

impl Default for RelativeImportsOrder {
    fn default() -> Self {
        Self::FurthestToClosest
    }
}

/// Error returned when a [`Config`] violates its construction contract.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid known first-party pattern: {0}")]
    InvalidKnownFirstParty(glob::PatternError),
    #[error("invalid known third-party pattern: {0}")]
    InvalidKnownThirdParty(glob::PatternError),
    #[error("invalid known local folder pattern: {0}")]
    InvalidKnownLocalFolder(glob::PatternError),
    #[error("invalid extra standard library pattern: {0}")]
    InvalidExtraStandardLibrary(glob::PatternError),
    #[error("invalid known future library pattern: {0}")]
    InvalidKnownFutureLibrary(glob::PatternError),
    #[error("invalid pattern for user-defined section `{0}`: {1}")]
    InvalidUserDefinedSection(String, glob::PatternError),
    #[error("invalid forced separate pattern: {0}")]
    InvalidForcedSeparate(glob::PatternError),
    #[error("wrap_length {wrap_length} exceeds line_length {line_length}")]
    WrapLengthExceedsLineLength {
        wrap_length: usize,
        line_length: usize,
    },
    #[error("default section {0} is not part of the configured section order")]
    DefaultSectionNotInSections(String),
}

/// The set of modules the user has pinned to specific sections, compiled to
/// glob patterns and ordered from the most-specific section to the least.
/// The `standard_library` patterns extend the built-in standard-library
/// table rather than replace it.
#[derive(Debug)]
pub struct KnownModules {
    patterns: Vec<(Pattern, Section)>,
}

impl KnownModules {
    pub fn new(
        first_party: Vec<String>,
        third_party: Vec<String>,
        local_folder: Vec<String>,
        standard_library: Vec<String>,
        future_library: Vec<String>,
        user_defined: Vec<(String, Vec<String>)>,
    ) -> Result<Self, SettingsError> {
        let mut patterns = Vec::new();
        // Patterns are consulted in order, so sections are compiled from the
        // most specific (user-defined, then the rightmost-declared built-in
        // section) backward.
        for (section, modules) in user_defined {
            for module in modules {
                let pattern = Pattern::new(&module).map_err(|err| {
                    SettingsError::InvalidUserDefinedSection(section.clone(), err)
                })?;
                patterns.push((pattern, Section::UserDefined(section.clone())));
            }
        }
        for (modules, import_type, onerr) in [
            (
                local_folder,
                ImportType::LocalFolder,
                SettingsError::InvalidKnownLocalFolder as fn(glob::PatternError) -> SettingsError,
            ),
            (
                first_party,
                ImportType::FirstParty,
                SettingsError::InvalidKnownFirstParty,
            ),
            (
                third_party,
                ImportType::ThirdParty,
                SettingsError::InvalidKnownThirdParty,
            ),
            (
                standard_library,
                ImportType::StandardLibrary,
                SettingsError::InvalidExtraStandardLibrary,
            ),
            (
                future_library,
                ImportType::Future,
                SettingsError::InvalidKnownFutureLibrary,
            ),
        ] {
            for module in modules {
                let pattern = Pattern::new(&module).map_err(onerr)?;
                patterns.push((pattern, Section::Known(import_type)));
            }
        }
        Ok(Self { patterns })
    }

    /// Return the section a module name is pinned to, if any, checking
    /// progressively shorter dotted prefixes of the name (the most specific
    /// prefix wins). Declared patterns take precedence; the built-in
    /// standard-library table is the baseline behind them.
    pub(crate) fn categorize(&self, module_name: &str) -> Option<&Section> {
        static STANDARD_LIBRARY: Section = Section::Known(ImportType::StandardLibrary);
        for i in module_name
            .match_indices('.')
            .map(|(i, _)| i)
            .chain(iter::once(module_name.len()))
            .rev()
        {
            let submodule = &module_name[..i];
            for (pattern, section) in &self.patterns {
                if pattern.matches(submodule) {
                    return Some(section);
                }
            }
            if pysort_python_stdlib::sys::is_known_standard_library(submodule) {
                return Some(&STANDARD_LIBRARY);
            }
        }
        None
    }
}

impl Default for KnownModules {
    fn default() -> Self {
        Self::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec!["__future__".to_string()],
            Vec::new(),
        )
        .expect("default known-module patterns are valid")
    }
}

/// The immutable configuration consumed by every pipeline stage.
#[derive(Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// The declared section order; forced-separate pseudo-sections are
    /// appended after these at emission time.
    pub sections: Vec<Section>,
    /// Where modules land when nothing else claims them.
    pub default_section: Section,
    pub known_modules: KnownModules,
    /// Glob patterns whose matches are kept in their own pseudo-sections.
    pub forced_separate: Vec<String>,
    /// Roots probed when deciding whether a module is first-party.
    pub src_paths: Vec<PathBuf>,

    pub line_length: usize,
    /// Width used when re-wrapping; `0` means "use `line_length`".
    pub wrap_length: usize,
    pub multi_line_output: WrapMode,
    pub balanced_wrapping: bool,
    pub use_parentheses: bool,
    pub include_trailing_comma: bool,
    pub indent: String,
    pub comment_prefix: String,
    /// Strip comments from emitted statements instead of preserving them.
    pub ignore_comments: bool,
    /// Overrides the inferred line terminator when set.
    pub line_ending: Option<String>,

    pub force_to_top: FxHashSet<String>,
    pub force_sort_within_sections: bool,
    pub force_single_line: bool,
    pub single_line_exclusions: FxHashSet<String>,
    /// Wrap any from-import with at least this many members (0 disables).
    pub force_grid_wrap: usize,
    pub from_first: bool,
    pub no_sections: bool,
    pub no_inline_sort: bool,
    pub case_sensitive: bool,
    pub force_alphabetical_sort_within_sections: bool,
    pub order_by_type: bool,
    pub reverse_relative: bool,
    pub relative_imports_order: RelativeImportsOrder,
    pub length_sort: bool,
    /// Section labels (lowercased) for which length sort applies even when
    /// `length_sort` is off.
    pub length_sort_sections: FxHashSet<String>,

    pub combine_as_imports: bool,
    pub combine_star: bool,
    pub keep_direct_and_as_imports: bool,

    pub lines_between_sections: usize,
    pub lines_between_types: usize,
    /// Blank lines between the import region and what follows; `-1` selects
    /// the language convention (two before a definition, one otherwise).
    pub lines_after_imports: isize,
    pub no_lines_before: FxHashSet<Section>,
    pub ensure_newline_before_comments: bool,
    /// Section heading comments, keyed by lowercased section label.
    pub import_headings: FxHashMap<String, String>,

    /// Imports (natural or simplified form) appended to every file.
    pub add_imports: Vec<String>,
    /// Imports (natural or simplified form) dropped from every file.
    pub remove_imports: Vec<String>,
    /// Apply `add_imports` even to effectively empty files.
    pub force_adds: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sections: ImportType::iter().map(Section::Known).collect(),
            default_section: Section::Known(ImportType::ThirdParty),
            known_modules: KnownModules::default(),
            forced_separate: Vec::new(),
            src_paths: Vec::new(),
            line_length: 79,
            wrap_length: 0,
            multi_line_output: WrapMode::default(),
            balanced_wrapping: false,
            use_parentheses: false,
            include_trailing_comma: false,
            indent: "    ".to_string(),
            comment_prefix: "  #".to_string(),
            ignore_comments: false,
            line_ending: None,
            force_to_top: FxHashSet::default(),
            force_sort_within_sections: false,
            force_single_line: false,
            single_line_exclusions: FxHashSet::default(),
            force_grid_wrap: 0,
            from_first: false,
            no_sections: false,
            no_inline_sort: false,
            case_sensitive: false,
            force_alphabetical_sort_within_sections: false,
            order_by_type: true,
            reverse_relative: false,
            relative_imports_order: RelativeImportsOrder::default(),
            length_sort: false,
            length_sort_sections: FxHashSet::default(),
            combine_as_imports: false,
            combine_star: false,
            keep_direct_and_as_imports: false,
            lines_between_sections: 1,
            lines_between_types: 0,
            lines_after_imports: -1,
            no_lines_before: FxHashSet::default(),
            ensure_newline_before_comments: false,
            import_headings: FxHashMap::default(),
            add_imports: Vec::new(),
            remove_imports: Vec::new(),
            force_adds: false,
        }
    }
}

impl Config {
    /// Check the configuration contract, returning the config unchanged when
    /// it holds. This is the only place construction fails loudly.
    pub fn validated(self) -> Result<Self, SettingsError> {
        if self.wrap_length > self.line_length {
            return Err(SettingsError::WrapLengthExceedsLineLength {
                wrap_length: self.wrap_length,
                line_length: self.line_length,
            });
        }
        if !self.sections.contains(&self.default_section) {
            return Err(SettingsError::DefaultSectionNotInSections(
                self.default_section.label().to_string(),
            ));
        }
        for pattern in &self.forced_separate {
            // Forced-separate globs are matched at placement time; surface
            // compile errors now rather than there.
            Pattern::new(pattern).map_err(SettingsError::InvalidForcedSeparate)?;
        }
        Ok(self)
    }

    /// The full emission order: declared sections followed by the
    /// forced-separate pseudo-sections.
    pub(crate) fn section_order(&self) -> Vec<Section> {
        self.sections
            .iter()
            .cloned()
            .chain(
                self.forced_separate
                    .iter()
                    .map(|name| Section::ForcedSeparate(name.clone())),
            )
            .collect()
    }

    pub(crate) fn effective_wrap_length(&self) -> usize {
        if self.wrap_length == 0 {
            self.line_length
        } else {
            self.wrap_length
        }
    }

    pub(crate) fn length_sort_for(&self, section: Option<&Section>) -> bool {
        match section {
            Some(section) => {
                self.length_sort
                    || self
                        .length_sort_sections
                        .contains(&section.label().to_lowercase())
            }
            None => self.length_sort,
        }
    }

    /// Section heading comment lines, as they appear in source.
    pub(crate) fn section_comments(&self) -> Vec<String> {
        self.import_headings
            .values()
            .map(|heading| format!("# {heading}"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validated().is_ok());
    }

    #[test]
    fn wrap_length_must_fit_line_length() {
        let config = Config {
            line_length: 80,
            wrap_length: 100,
            ..Config::default()
        };
        assert!(matches!(
            config.validated(),
            Err(SettingsError::WrapLengthExceedsLineLength { .. })
        ));
    }

    #[test]
    fn default_section_must_be_declared() {
        let config = Config {
            default_section: Section::UserDefined("PANDAS".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.validated(),
            Err(SettingsError::DefaultSectionNotInSections(_))
        ));
    }

    #[test]
    fn known_modules_prefer_longest_prefix() {
        let known = KnownModules::new(
            vec!["myproject".to_string()],
            vec!["myproject.vendored".to_string()],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(
            known.categorize("myproject.app.models"),
            Some(&Section::Known(ImportType::FirstParty))
        );
        assert_eq!(
            known.categorize("myproject.vendored.six"),
            Some(&Section::Known(ImportType::ThirdParty))
        );
    }

    #[test]
    fn known_modules_support_globs() {
        let known = KnownModules::new(
            Vec::new(),
            vec!["django_*".to_string()],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(
            known.categorize("django_extensions"),
            Some(&Section::Known(ImportType::ThirdParty))
        );
        assert_eq!(known.categorize("django"), None);
    }

    #[test]
    fn builtin_standard_library_is_the_baseline() {
        let known = KnownModules::new(
            vec!["os".to_string()],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        // A declared pattern overrides the table; everything else in the
        // table still lands in the standard library.
        assert_eq!(
            known.categorize("os.path"),
            Some(&Section::Known(ImportType::FirstParty))
        );
        assert_eq!(
            known.categorize("collections"),
            Some(&Section::Known(ImportType::StandardLibrary))
        );
    }
}
