//! Composite sort keys and natural (digit-aware) ordering.

use crate::settings::{Config, RelativeImportsOrder, Section};

/// Build the composite sort key for a module or member name.
///
/// The key is a plain string compared naturally, so numeric runs compare
/// numerically (`lib9` before `lib10`). Its shape, front to back: a
/// force-to-top marker, an optional casing-bucket prefix (ALL_CAPS before
/// Capitalized before lowercase, for members under `order_by_type`), then
/// either the name or `length:name` when length sort applies.
pub(crate) fn module_key(
    module_name: &str,
    config: &Config,
    sub_imports: bool,
    ignore_case: bool,
    section: Option<&Section>,
) -> String {
    let mut module_name = module_name.to_string();

    // Normalize a leading run of dots (relative imports) into a comparable
    // token: a single dot keeps relative names ahead of absolute ones, and
    // the dot count becomes a fixed-width rank whose direction follows
    // `relative_imports_order`, flipped by `reverse_relative`.
    let dots = module_name.chars().take_while(|c| *c == '.').count();
    if dots > 0 {
        let closest_first = (config.relative_imports_order
            == RelativeImportsOrder::ClosestToFurthest)
            != config.reverse_relative;
        let rank = if closest_first {
            dots
        } else {
            999_usize.saturating_sub(dots)
        };
        let rest = module_name[dots..].trim_start();
        module_name = format!(".{rank:03}.{rest}");
    }

    if ignore_case {
        module_name = module_name.to_lowercase();
    }

    let mut prefix = "";
    if sub_imports && config.order_by_type {
        prefix = if module_name.len() > 1
            && module_name == module_name.to_uppercase()
            && module_name.chars().any(|c| c.is_ascii_alphabetic())
        {
            "A"
        } else if module_name.chars().next().is_some_and(char::is_uppercase) {
            "B"
        } else {
            "C"
        };
    }

    if !config.case_sensitive {
        module_name = module_name.to_lowercase();
    }

    let top = if config.force_to_top.contains(&module_name) {
        "A"
    } else {
        "B"
    };
    if config.length_sort_for(section) {
        format!("{top}{prefix}{}:{module_name}", module_name.len())
    } else {
        format!("{top}{prefix}{module_name}")
    }
}

/// Sort strings naturally by the given key function.
pub(crate) fn naturally<F>(items: Vec<String>, key: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    let mut items = items;
    items.sort_by(|a, b| natord::compare(&key(a), &key(b)));
    items
}

/// Key used when re-sorting whole emitted statements across the
/// straight/from divide (`force_sort_within_sections`).
pub(crate) fn section_key(statement: &str, config: &Config) -> String {
    let stripped = statement
        .strip_prefix("from ")
        .or_else(|| statement.strip_prefix("import "))
        .unwrap_or(statement);
    let module: String = stripped
        .chars()
        .take_while(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '*'))
        .collect();
    module_key(
        &module,
        config,
        false,
        config.force_alphabetical_sort_within_sections,
        None,
    )
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;

    use super::*;
    use crate::settings::Config;

    fn sorted(names: &[&str], config: &Config) -> Vec<String> {
        naturally(
            names.iter().map(|name| (*name).to_string()).collect(),
            |name| module_key(name, config, false, false, None),
        )
    }

    #[test]
    fn natural_numeric_suffixes() {
        let config = Config::default();
        assert_eq!(sorted(&["lib10", "lib9", "lib1"], &config), [
            "lib1", "lib9", "lib10"
        ]);
    }

    #[test]
    fn case_insensitive_by_default() {
        let config = Config::default();
        assert_eq!(sorted(&["Xyz", "abc"], &config), ["abc", "Xyz"]);
    }

    #[test]
    fn force_to_top_wins() {
        let config = Config {
            force_to_top: FxHashSet::from_iter(["zlib".to_string()]),
            ..Config::default()
        };
        assert_eq!(sorted(&["abc", "zlib"], &config), ["zlib", "abc"]);
    }

    #[test]
    fn length_sort_orders_by_length_first() {
        let config = Config {
            length_sort: true,
            ..Config::default()
        };
        assert_eq!(sorted(&["fitness", "abc", "x"], &config), [
            "x", "abc", "fitness"
        ]);
    }

    #[test]
    fn order_by_type_buckets_members() {
        let config = Config::default();
        let members = naturally(
            ["helper", "CONSTANT", "MyClass"]
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            |name| module_key(name, &config, true, false, None),
        );
        assert_eq!(members, ["CONSTANT", "MyClass", "helper"]);
    }

    #[test]
    fn relative_dots_order_furthest_first_by_default() {
        let config = Config::default();
        let key_one = module_key(".base", &config, false, false, None);
        let key_two = module_key("..base", &config, false, false, None);
        assert!(natord::compare(&key_one, &key_two) == std::cmp::Ordering::Greater);
    }

    #[test]
    fn relative_dots_order_flips_under_reverse_relative() {
        let config = Config {
            reverse_relative: true,
            ..Config::default()
        };
        let key_one = module_key(".base", &config, false, false, None);
        let key_two = module_key("..base", &config, false, false, None);
        assert!(natord::compare(&key_one, &key_two) == std::cmp::Ordering::Less);
    }

    #[test]
    fn relative_dots_order_ignores_name_presence() {
        let config = Config::default();
        let bare = natord::compare(
            &module_key(".", &config, false, false, None),
            &module_key("..", &config, false, false, None),
        );
        let named = natord::compare(
            &module_key(".pkg", &config, false, false, None),
            &module_key("..pkg", &config, false, false, None),
        );
        assert_eq!(bare, named);
        assert_eq!(named, std::cmp::Ordering::Greater);
    }

    #[test]
    fn relative_imports_sort_before_absolute() {
        let config = Config::default();
        assert_eq!(sorted(&["base", "..base", ".base"], &config), [
            "..base", ".base", "base"
        ]);
    }

    #[test]
    fn section_key_strips_statement_prefix() {
        let config = Config::default();
        let mut lines = vec![
            "import sys".to_string(),
            "from os import path".to_string(),
            "import collections".to_string(),
        ];
        lines = naturally(lines, |line| section_key(line, &config));
        assert_eq!(lines, [
            "import collections",
            "from os import path",
            "import sys"
        ]);
    }
}
