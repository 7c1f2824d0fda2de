//! Resolution of a module name to the section it belongs in.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use glob::Pattern;
use log::debug;
use rustc_hash::FxHashMap;

use crate::settings::{Config, ImportType, Section};

/// Extension-module suffixes probed alongside `.py` files.
const EXTENSION_SUFFIXES: &[&str] = &[".so", ".pyd"];

/// Why a module was placed in its section. Returned for diagnostics and
/// logged at `debug!`; never affects the placement itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    ForcedSeparate(String),
    LeadingDot,
    KnownPattern(String),
    SourceMatch(PathBuf),
    Default,
}

/// Return the section placement for the given module name.
pub fn module(name: &str, config: &Config) -> Section {
    module_with_reason(name, config).0
}

/// Return the section placement for the given module name alongside the
/// reasoning. Pure: identical inputs always give identical output.
pub fn module_with_reason(name: &str, config: &Config) -> (Section, Reason) {
    let (section, reason) = forced_separate(name, config)
        .or_else(|| local(name))
        .or_else(|| known_pattern(name, config))
        .or_else(|| src_path(name, config))
        .unwrap_or_else(|| (config.default_section.clone(), Reason::Default));
    debug!("Placed '{name}' in {section} ({reason:?})");
    (section, reason)
}

fn forced_separate(name: &str, config: &Config) -> Option<(Section, Reason)> {
    for forced in &config.forced_separate {
        // Ensure the pattern matches to the end of the name.
        let path_glob = if forced.ends_with('*') {
            forced.clone()
        } else {
            format!("{forced}*")
        };
        let Ok(pattern) = Pattern::new(&path_glob) else {
            continue;
        };
        if pattern.matches(name) || pattern.matches(&format!(".{name}")) {
            return Some((
                Section::ForcedSeparate(forced.clone()),
                Reason::ForcedSeparate(forced.clone()),
            ));
        }
    }
    None
}

fn local(name: &str) -> Option<(Section, Reason)> {
    name.starts_with('.')
        .then(|| (Section::Known(ImportType::LocalFolder), Reason::LeadingDot))
}

fn known_pattern(name: &str, config: &Config) -> Option<(Section, Reason)> {
    config
        .known_modules
        .categorize(name)
        .map(|section| (section.clone(), Reason::KnownPattern(name.to_string())))
}

fn src_path(name: &str, config: &Config) -> Option<(Section, Reason)> {
    let root_module = name.split('.').next().unwrap_or(name);
    for src in &config.src_paths {
        let module_path = src.join(root_module);
        if is_module(&module_path) || is_package(&module_path) || src_path_is_module(src, root_module)
        {
            return Some((
                Section::Known(ImportType::FirstParty),
                Reason::SourceMatch(src.clone()),
            ));
        }
    }
    None
}

fn is_module(path: &Path) -> bool {
    file_exists(&path.with_extension("py"))
        || EXTENSION_SUFFIXES.iter().any(|suffix| {
            let mut file = path.as_os_str().to_os_string();
            file.push(suffix);
            file_exists(Path::new(&file))
        })
        || file_exists(&path.join("__init__.py"))
}

fn is_package(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|metadata| metadata.is_dir())
}

fn src_path_is_module(src: &Path, module_name: &str) -> bool {
    src.file_name()
        .is_some_and(|name| name == module_name)
        && is_package(src)
}

fn file_exists(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|metadata| metadata.is_file())
}

/// A per-config placement resolver with a memoization cache.
///
/// The cache is keyed by module name alone; the config identity is fixed at
/// construction. It is safe to share one placer read-only across worker
/// threads sorting different files.
pub struct Placer<'a> {
    config: &'a Config,
    cache: Mutex<FxHashMap<String, Section>>,
}

impl<'a> Placer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn place(&self, name: &str) -> Section {
        if let Ok(cache) = self.cache.lock() {
            if let Some(section) = cache.get(name) {
                return section.clone();
            }
        }
        let section = module(name, self.config);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(name.to_string(), section.clone());
        }
        section
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Config, ImportType, KnownModules, Section};

    #[test]
    fn stdlib_modules_place_in_stdlib() {
        let config = Config::default();
        assert_eq!(
            module("os.path", &config),
            Section::Known(ImportType::StandardLibrary)
        );
        assert_eq!(
            module("collections", &config),
            Section::Known(ImportType::StandardLibrary)
        );
    }

    #[test]
    fn future_places_first() {
        let config = Config::default();
        assert_eq!(
            module("__future__", &config),
            Section::Known(ImportType::Future)
        );
    }

    #[test]
    fn unknown_modules_fall_back_to_default() {
        let config = Config::default();
        let (section, reason) = module_with_reason("requests", &config);
        assert_eq!(section, Section::Known(ImportType::ThirdParty));
        assert_eq!(reason, Reason::Default);
    }

    #[test]
    fn leading_dot_is_local() {
        let config = Config::default();
        let (section, reason) = module_with_reason(".siblings", &config);
        assert_eq!(section, Section::Known(ImportType::LocalFolder));
        assert_eq!(reason, Reason::LeadingDot);
    }

    #[test]
    fn forced_separate_wins_over_known() {
        let config = Config {
            forced_separate: vec!["myproject.tests".to_string()],
            known_modules: KnownModules::new(
                vec!["myproject".to_string()],
                Vec::new(),
                Vec::new(),
                Vec::new(),
                Vec::new(),
                Vec::new(),
            )
            .unwrap(),
            ..Config::default()
        };
        assert_eq!(
            module("myproject.tests.test_app", &config),
            Section::ForcedSeparate("myproject.tests".to_string())
        );
        assert_eq!(
            module("myproject.app", &config),
            Section::Known(ImportType::FirstParty)
        );
    }

    #[test]
    fn placer_memoizes() {
        let config = Config::default();
        let placer = Placer::new(&config);
        assert_eq!(
            placer.place("os"),
            Section::Known(ImportType::StandardLibrary)
        );
        // Second lookup is served from the cache; same result.
        assert_eq!(
            placer.place("os"),
            Section::Known(ImportType::StandardLibrary)
        );
    }
}
