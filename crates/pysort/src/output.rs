//! Reassembly of a file from its passthrough lines and sorted imports.
//!
//! Sections are emitted in declared order, straight imports before
//! from-imports (or the reverse under `from_first`), with headings, blank
//! line policy, and comment re-attachment applied along the way.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::comments;
use crate::format;
use crate::parse::{self, CategorizedComments, ParsedContent, SectionImports, SkipState};
use crate::settings::{Config, ImportType, Section};
use crate::sorting;
use crate::wrap;
use crate::wrap_modes::WrapMode;

/// Constructs that want two blank lines between themselves and the imports.
const STATEMENT_DECLARATIONS: &[&str] = &["def ", "class ", "@", "async def"];

/// Put the sorted imports back into the file at the recorded index.
#[allow(clippy::too_many_lines)]
pub(crate) fn sorted_imports(parsed: &mut ParsedContent, config: &Config) -> String {
    if parsed.import_index == -1 {
        return output_as_string(parsed.lines_without_imports.clone(), &parsed.line_separator);
    }

    let mut sections = config.section_order();
    if config.no_sections {
        // Merge every non-future section into one combined bucket.
        let mut merged = SectionImports::default();
        let mut base_sections: Vec<Section> = Vec::new();
        for section in &sections {
            if *section == Section::Known(ImportType::Future) {
                base_sections.push(section.clone());
                continue;
            }
            if let Some(bucket) = parsed.imports.get(section) {
                merged.straight.extend(bucket.straight.clone());
                merged.from.extend(bucket.from.clone());
            }
        }
        let combined = Section::UserDefined("no_sections".to_string());
        parsed.imports.insert(combined.clone(), merged);
        base_sections.push(combined);
        sections = base_sections;
    }

    let ParsedContent {
        lines_without_imports,
        import_index,
        place_imports,
        import_placements,
        as_map,
        imports,
        categorized_comments,
        original_line_count,
        line_separator,
        section_comments,
        ..
    } = parsed;

    let mut formatted_output = lines_without_imports.clone();
    let remove_imports: Vec<String> = config
        .remove_imports
        .iter()
        .map(|removal| format::simplified(removal))
        .collect();
    let sort_ignore_case = config.force_alphabetical_sort_within_sections;

    let mut output: Vec<String> = Vec::new();
    let mut pending_lines_before = false;
    for section in &sections {
        let Some(bucket) = imports.get(section) else {
            continue;
        };
        let straight_modules = sorting::naturally(bucket.straight.keys().cloned().collect(), |key| {
            sorting::module_key(key, config, false, false, Some(section))
        });
        let from_modules = sorting::naturally(bucket.from.keys().cloned().collect(), |key| {
            sorting::module_key(key, config, false, false, Some(section))
        });

        // Emission pops above-comments; keep a copy for re-insertion when
        // the whole section is re-sorted afterwards.
        let preserved_above = config.force_sort_within_sections.then(|| {
            let mut all = categorized_comments.above_from.clone();
            all.extend(categorized_comments.above_straight.clone());
            all
        });

        let mut section_output: Vec<String> = Vec::new();
        if config.from_first {
            section_output = with_from_imports(
                imports,
                as_map,
                categorized_comments,
                line_separator,
                config,
                &from_modules,
                section,
                section_output,
                sort_ignore_case,
                &remove_imports,
            );
            if config.lines_between_types > 0
                && !from_modules.is_empty()
                && !straight_modules.is_empty()
            {
                section_output.extend(vec![String::new(); config.lines_between_types]);
            }
            section_output = with_straight_imports(
                imports,
                as_map,
                categorized_comments,
                config,
                &straight_modules,
                section,
                section_output,
                &remove_imports,
            );
        } else {
            section_output = with_straight_imports(
                imports,
                as_map,
                categorized_comments,
                config,
                &straight_modules,
                section,
                section_output,
                &remove_imports,
            );
            if config.lines_between_types > 0
                && !from_modules.is_empty()
                && !straight_modules.is_empty()
            {
                section_output.extend(vec![String::new(); config.lines_between_types]);
            }
            section_output = with_from_imports(
                imports,
                as_map,
                categorized_comments,
                line_separator,
                config,
                &from_modules,
                section,
                section_output,
                sort_ignore_case,
                &remove_imports,
            );
        }

        if let Some(all_comments) = preserved_above {
            // Strip comment lines, re-sort the whole section as statements,
            // then put each above-comment back over its import.
            section_output.retain(|line| !line.starts_with('#'));
            section_output =
                sorting::naturally(section_output, |line| sorting::section_key(line, config));

            let mut comment_indexes: BTreeMap<usize, Vec<String>> = BTreeMap::new();
            for (module, comment_list) in &all_comments {
                for (idx, line) in section_output.iter().enumerate() {
                    if line.contains(module.as_str()) {
                        comment_indexes.insert(idx, comment_list.clone());
                    }
                }
            }
            let mut added = 0;
            for (idx, comment_list) in comment_indexes {
                for comment in comment_list {
                    section_output.insert(idx + added, comment);
                    added += 1;
                }
            }
        }

        let section_name = section.label().to_string();
        let no_lines_before = config.no_lines_before.contains(section);

        if section_output.is_empty() {
            pending_lines_before = pending_lines_before || !no_lines_before;
            continue;
        }
        if place_imports.contains_key(&section_name) {
            place_imports.insert(section_name, section_output);
            continue;
        }

        if let Some(section_title) = config.import_headings.get(&section_name.to_lowercase()) {
            let section_comment = format!("# {section_title}");
            if lines_without_imports.first() != Some(&section_comment) {
                section_output.insert(0, section_comment);
            }
        }

        if pending_lines_before || !no_lines_before {
            output.extend(vec![String::new(); config.lines_between_sections]);
        }
        output.append(&mut section_output);
        pending_lines_before = false;
    }

    while output.last().is_some_and(|line| line.trim().is_empty()) {
        output.pop();
    }
    while output.first().is_some_and(|line| line.trim().is_empty()) {
        output.remove(0);
    }

    let mut output_at = 0;
    if *import_index >= 0 && (*import_index as usize) < *original_line_count {
        output_at = *import_index as usize;
    }
    let output_at = output_at.min(formatted_output.len());
    formatted_output.splice(output_at..output_at, output.iter().cloned());

    let imports_tail = output_at + output.len();
    while formatted_output
        .get(imports_tail)
        .is_some_and(|line| line.trim().is_empty())
    {
        formatted_output.remove(imports_tail);
    }

    if formatted_output.len() > imports_tail {
        let mut next_construct = String::new();
        let mut state = SkipState::new();
        let tail = formatted_output[imports_tail..].to_vec();

        for (index, line) in tail.iter().enumerate() {
            let was_in_quote = !state.in_quote.is_empty();
            let should_skip = parse::skip_line(
                line,
                &mut state,
                formatted_output.len() as isize,
                section_comments,
            );
            if !should_skip && !line.trim().is_empty() {
                if line.trim().starts_with('#')
                    && tail.len() > index + 1
                    && !tail[index + 1].trim().is_empty()
                {
                    continue;
                }
                next_construct = line.clone();
                break;
            } else if !was_in_quote {
                // A module-level assignment also counts as the next
                // construct.
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 3
                    && parts[1] == "="
                    && !parts[0].contains('\'')
                    && !parts[0].contains('"')
                {
                    next_construct = line.clone();
                    break;
                }
            }
        }

        let blank_lines = if config.lines_after_imports == -1 {
            if STATEMENT_DECLARATIONS
                .iter()
                .any(|declaration| next_construct.starts_with(declaration))
            {
                2
            } else {
                1
            }
        } else {
            usize::try_from(config.lines_after_imports).unwrap_or(0)
        };
        formatted_output.splice(imports_tail..imports_tail, vec![String::new(); blank_lines]);
    }

    if !place_imports.is_empty() {
        let mut new_out_lines = Vec::with_capacity(formatted_output.len());
        for (index, line) in formatted_output.iter().enumerate() {
            new_out_lines.push(line.clone());
            if let Some(section_label) = import_placements.get(line) {
                if let Some(section_lines) = place_imports.get(section_label) {
                    new_out_lines.extend(section_lines.iter().cloned());
                    if index + 1 >= formatted_output.len()
                        || !formatted_output[index + 1].trim().is_empty()
                    {
                        new_out_lines.push(String::new());
                    }
                }
            }
        }
        formatted_output = new_out_lines;
    }

    output_as_string(formatted_output, line_separator)
}

#[allow(clippy::too_many_arguments, clippy::too_many_lines)]
fn with_from_imports(
    imports: &IndexMap<Section, SectionImports>,
    as_map: &FxHashMap<String, Vec<String>>,
    categorized: &mut CategorizedComments,
    line_separator: &str,
    config: &Config,
    from_modules: &[String],
    section: &Section,
    section_output: Vec<String>,
    ignore_case: bool,
    remove_imports: &[String],
) -> Vec<String> {
    let mut out = section_output;
    for module in from_modules {
        if remove_imports.contains(module) {
            continue;
        }

        let import_start = format!("from {module} import ");
        let mut direct: IndexMap<String, bool> = imports[section].from[module].clone();
        let mut from_imports: Vec<String> = direct.keys().cloned().collect();
        if !config.no_inline_sort
            || (config.force_single_line && !config.single_line_exclusions.contains(module))
        {
            from_imports = sorting::naturally(from_imports, |key| {
                sorting::module_key(key, config, true, ignore_case, Some(section))
            });
        }
        if !remove_imports.is_empty() {
            from_imports
                .retain(|member| !remove_imports.contains(&format!("{module}.{member}")));
        }

        let mut as_imports: IndexMap<String, Vec<String>> = IndexMap::new();
        for from_import in &from_imports {
            let Some(as_modules) = as_map.get(&format!("{module}.{from_import}")) else {
                continue;
            };
            let mut expanded = Vec::new();
            for as_module in as_modules {
                if from_import == as_module {
                    if config.keep_direct_and_as_imports {
                        direct.insert(as_module.clone(), true);
                    } else {
                        expanded.push(as_module.clone());
                    }
                } else {
                    expanded.push(format!("{from_import} as {as_module}"));
                }
            }
            as_imports.insert(from_import.clone(), expanded);
        }

        let has_star = from_imports.iter().any(|member| member == "*");
        if config.combine_as_imports && !(has_star && config.combine_star) {
            if !config.no_inline_sort {
                for expanded in as_imports.values_mut() {
                    *expanded =
                        sorting::naturally(std::mem::take(expanded), |key| key.to_string());
                }
            }
            for from_import in from_imports.clone() {
                if let Some(expanded) = as_imports.shift_remove(&from_import) {
                    if let Some(idx) = from_imports.iter().position(|member| *member == from_import)
                    {
                        if config.keep_direct_and_as_imports
                            && direct.get(&from_import).copied().unwrap_or(false)
                        {
                            from_imports.splice(idx + 1..idx + 1, expanded);
                        } else {
                            from_imports.splice(idx..=idx, expanded);
                        }
                    }
                }
            }
        }

        while !from_imports.is_empty() {
            let mut comments: Vec<String> =
                categorized.from.remove(module).unwrap_or_default();
            let mut import_statement = String::new();
            if from_imports.iter().any(|member| member == "*") && config.combine_star {
                import_statement = wrap::line(
                    &comments::add_to_line(
                        &comments,
                        &format!("{import_start}*"),
                        config.ignore_comments,
                        &config.comment_prefix,
                    ),
                    line_separator,
                    config,
                );
                from_imports.clear();
            } else if config.force_single_line
                && !config.single_line_exclusions.contains(module)
            {
                while !from_imports.is_empty() {
                    let from_import = from_imports.remove(0);
                    let mut single_import_line = comments::add_to_line(
                        &comments,
                        &format!("{import_start}{from_import}"),
                        config.ignore_comments,
                        &config.comment_prefix,
                    );
                    if let Some(comment) = categorized
                        .nested
                        .get_mut(module)
                        .and_then(|nested| nested.remove(&from_import))
                    {
                        let joiner = if comments.is_empty() {
                            config.comment_prefix.as_str()
                        } else {
                            ";"
                        };
                        single_import_line.push_str(&format!("{joiner} {comment}"));
                    }
                    if let Some(expanded) = as_imports.get(&from_import) {
                        if config.keep_direct_and_as_imports
                            && direct.get(&from_import).copied().unwrap_or(false)
                        {
                            out.push(wrap::line(&single_import_line, line_separator, config));
                        }
                        let from_comments = categorized
                            .straight
                            .get(&format!("{module}.{from_import}"))
                            .cloned()
                            .unwrap_or_default();
                        for as_import in
                            sorting::naturally(expanded.clone(), |key| key.to_string())
                        {
                            out.push(comments::add_to_line(
                                &from_comments,
                                &wrap::line(
                                    &format!("{import_start}{as_import}"),
                                    line_separator,
                                    config,
                                ),
                                config.ignore_comments,
                                &config.comment_prefix,
                            ));
                        }
                    } else {
                        out.push(wrap::line(&single_import_line, line_separator, config));
                    }
                    comments.clear();
                }
            } else {
                if let Some(above_comments) = categorized.above_from.remove(module) {
                    if !out.is_empty() && config.ensure_newline_before_comments {
                        out.push(String::new());
                    }
                    out.extend(above_comments);
                }

                // Aliased members that stay on their own lines come first.
                while from_imports
                    .first()
                    .is_some_and(|member| as_imports.contains_key(member))
                {
                    let from_import = from_imports.remove(0);
                    let expanded = sorting::naturally(
                        as_imports[&from_import].clone(),
                        |key| key.to_string(),
                    );
                    as_imports.insert(from_import.clone(), expanded.clone());
                    let from_comments = categorized
                        .straight
                        .get(&format!("{module}.{from_import}"))
                        .cloned()
                        .unwrap_or_default();
                    if config.keep_direct_and_as_imports
                        && direct.get(&from_import).copied().unwrap_or(false)
                    {
                        out.push(comments::add_to_line(
                            &from_comments,
                            &wrap::line(
                                &format!("{import_start}{from_import}"),
                                line_separator,
                                config,
                            ),
                            config.ignore_comments,
                            &config.comment_prefix,
                        ));
                    }
                    for as_import in expanded {
                        out.push(comments::add_to_line(
                            &from_comments,
                            &wrap::line(
                                &format!("{import_start}{as_import}"),
                                line_separator,
                                config,
                            ),
                            config.ignore_comments,
                            &config.comment_prefix,
                        ));
                    }
                }

                let mut star_import = false;
                if from_imports.iter().any(|member| member == "*") {
                    out.push(comments::add_to_line(
                        &comments,
                        &format!("{import_start}*"),
                        config.ignore_comments,
                        &config.comment_prefix,
                    ));
                    from_imports.retain(|member| member != "*");
                    star_import = true;
                    comments.clear();
                }

                for from_import in from_imports.clone() {
                    if as_imports.contains_key(&from_import) && !config.keep_direct_and_as_imports
                    {
                        continue;
                    }
                    let Some(comment) = categorized
                        .nested
                        .get_mut(module)
                        .and_then(|nested| nested.remove(&from_import))
                    else {
                        continue;
                    };
                    let mut single_import_line = comments::add_to_line(
                        &comments,
                        &format!("{import_start}{from_import}"),
                        config.ignore_comments,
                        &config.comment_prefix,
                    );
                    let joiner = if comments.is_empty() {
                        config.comment_prefix.as_str()
                    } else {
                        ";"
                    };
                    single_import_line.push_str(&format!("{joiner} {comment}"));
                    out.push(wrap::line(&single_import_line, line_separator, config));
                    if let Some(position) =
                        from_imports.iter().position(|member| *member == from_import)
                    {
                        from_imports.remove(position);
                    }
                    comments.clear();
                }

                let mut from_import_section: Vec<String> = Vec::new();
                while from_imports.first().is_some_and(|member| {
                    !as_imports.contains_key(member)
                        || (config.keep_direct_and_as_imports
                            && config.combine_as_imports
                            && direct.get(member).copied().unwrap_or(false))
                }) {
                    from_import_section.push(from_imports.remove(0));
                }

                import_statement = if star_import {
                    format!("{import_start}{}", from_import_section.join(", "))
                } else {
                    comments::add_to_line(
                        &comments,
                        &format!("{import_start}{}", from_import_section.join(", ")),
                        config.ignore_comments,
                        &config.comment_prefix,
                    )
                };
                if from_import_section.is_empty() {
                    import_statement = String::new();
                }

                let mut do_multiline_reformat = false;
                if config.force_grid_wrap > 0
                    && from_import_section.len() >= config.force_grid_wrap
                {
                    do_multiline_reformat = true;
                }
                if import_statement.len() > config.line_length && from_import_section.len() > 1 {
                    do_multiline_reformat = true;
                }
                // Grid and vertical handle their own overflow; everything
                // else reflows even a single over-width member.
                if import_statement.len() > config.line_length
                    && !from_import_section.is_empty()
                    && !matches!(
                        config.multi_line_output,
                        WrapMode::Grid | WrapMode::Vertical
                    )
                {
                    do_multiline_reformat = true;
                }

                if do_multiline_reformat {
                    import_statement = wrap::import_statement(
                        &import_start,
                        &from_import_section,
                        &comments,
                        line_separator,
                        config,
                        None,
                        false,
                    );
                    if config.multi_line_output == WrapMode::Grid {
                        // Grid can still overflow; retry with vertical-grid.
                        let widest = import_statement
                            .split(line_separator)
                            .map(str::len)
                            .max()
                            .unwrap_or(0);
                        if widest > config.line_length {
                            import_statement = wrap::import_statement(
                                &import_start,
                                &from_import_section,
                                &comments,
                                line_separator,
                                config,
                                Some(WrapMode::VerticalGrid),
                                false,
                            );
                        }
                    }
                } else if import_statement.len() > config.line_length {
                    import_statement = wrap::line(&import_statement, line_separator, config);
                }
            }

            if !import_statement.is_empty() {
                if let Some(above_comments) = categorized.above_from.remove(module) {
                    if !out.is_empty() && config.ensure_newline_before_comments {
                        out.push(String::new());
                    }
                    out.extend(above_comments);
                }
                out.push(import_statement);
            }
        }
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn with_straight_imports(
    imports: &IndexMap<Section, SectionImports>,
    as_map: &FxHashMap<String, Vec<String>>,
    categorized: &mut CategorizedComments,
    config: &Config,
    straight_modules: &[String],
    section: &Section,
    section_output: Vec<String>,
    remove_imports: &[String],
) -> Vec<String> {
    let mut out = section_output;
    for module in straight_modules {
        if remove_imports.contains(module) {
            continue;
        }

        let mut import_definition: Vec<String> = Vec::new();
        if let Some(aliases) = as_map.get(module) {
            let directly_imported = imports[section]
                .straight
                .get(module)
                .copied()
                .unwrap_or(false);
            if config.keep_direct_and_as_imports && directly_imported {
                import_definition.push(format!("import {module}"));
            }
            for as_import in aliases {
                if module == as_import {
                    let alias_is_direct = imports[section]
                        .straight
                        .get(as_import)
                        .copied()
                        .unwrap_or(false);
                    if !config.keep_direct_and_as_imports || !alias_is_direct {
                        import_definition.push(format!("import {module}"));
                    }
                } else {
                    import_definition.push(format!("import {module} as {as_import}"));
                }
            }
        } else {
            import_definition.push(format!("import {module}"));
        }

        if let Some(comments_above) = categorized.above_straight.remove(module) {
            if !out.is_empty() && config.ensure_newline_before_comments {
                out.push(String::new());
            }
            out.extend(comments_above);
        }
        let straight_comments = categorized
            .straight
            .get(module)
            .cloned()
            .unwrap_or_default();
        for import_line in import_definition {
            out.push(comments::add_to_line(
                &straight_comments,
                &import_line,
                config.ignore_comments,
                &config.comment_prefix,
            ));
        }
    }

    out
}

fn output_as_string(lines: Vec<String>, line_separator: &str) -> String {
    normalize_empty_lines(lines).join(line_separator)
}

/// Strip trailing blank lines and end with exactly one terminator.
fn normalize_empty_lines(mut lines: Vec<String>) -> Vec<String> {
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines.push(String::new());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::settings::Config;

    fn sort(contents: &str, config: &Config) -> String {
        let mut parsed = parse::file_contents(contents, config);
        sorted_imports(&mut parsed, config)
    }

    #[test]
    fn straight_imports_sorted() {
        let config = Config::default();
        assert_eq!(sort("import sys\nimport os\n", &config), "import os\nimport sys\n");
    }

    #[test]
    fn from_members_sorted() {
        let config = Config::default();
        assert_eq!(
            sort("from os import sep, path\n", &config),
            "from os import path, sep\n"
        );
    }

    #[test]
    fn sections_separated_by_blank_line() {
        let config = Config::default();
        assert_eq!(
            sort("import requests\nimport os\n", &config),
            "import os\n\nimport requests\n"
        );
    }

    #[test]
    fn no_sections_merges_all_but_future() {
        let config = Config {
            no_sections: true,
            ..Config::default()
        };
        assert_eq!(
            sort("import requests\nimport os\n", &config),
            "import os\nimport requests\n"
        );
    }

    #[test]
    fn two_blank_lines_before_function() {
        let config = Config::default();
        assert_eq!(
            sort("import os\ndef main():\n    pass\n", &config),
            "import os\n\n\ndef main():\n    pass\n"
        );
    }

    #[test]
    fn one_blank_line_before_plain_code() {
        let config = Config::default();
        assert_eq!(
            sort("import os\nprint(1)\n", &config),
            "import os\n\nprint(1)\n"
        );
    }

    #[test]
    fn remove_imports_drops_modules() {
        let config = Config {
            remove_imports: vec!["os".to_string()],
            ..Config::default()
        };
        assert_eq!(sort("import os\nimport sys\n", &config), "import sys\n");
    }

    #[test]
    fn remove_imports_drops_members() {
        let config = Config {
            remove_imports: vec!["from os import path".to_string()],
            ..Config::default()
        };
        assert_eq!(
            sort("from os import path, sep\n", &config),
            "from os import sep\n"
        );
    }

    #[test]
    fn heading_inserted_for_section() {
        let config = Config {
            import_headings: rustc_hash::FxHashMap::from_iter([(
                "stdlib".to_string(),
                "Standard Library".to_string(),
            )]),
            ..Config::default()
        };
        assert_eq!(
            sort("import os\n", &config),
            "# Standard Library\nimport os\n"
        );
    }

    #[test]
    fn force_sort_within_sections_mixes_styles() {
        let config = Config {
            force_sort_within_sections: true,
            ..Config::default()
        };
        assert_eq!(
            sort("import sys\nfrom os import path\n", &config),
            "from os import path\nimport sys\n"
        );
    }

    #[test]
    fn star_import_emitted_first() {
        let config = Config::default();
        assert_eq!(
            sort("from os import path, *\n", &config),
            "from os import *\nfrom os import path\n"
        );
    }

    #[test]
    fn combine_star_collapses_members() {
        let config = Config {
            combine_star: true,
            ..Config::default()
        };
        assert_eq!(
            sort("from os import path, *\n", &config),
            "from os import *\n"
        );
    }

    #[test]
    fn force_single_line_splits_members() {
        let config = Config {
            force_single_line: true,
            ..Config::default()
        };
        assert_eq!(
            sort("from os import sep, path\n", &config),
            "from os import path\nfrom os import sep\n"
        );
    }

    #[test]
    fn aliases_kept_on_own_lines() {
        let config = Config::default();
        assert_eq!(
            sort("from os import path as p, sep\n", &config),
            "from os import path as p\nfrom os import sep\n"
        );
    }

    #[test]
    fn combine_as_imports_inlines_aliases() {
        let config = Config {
            combine_as_imports: true,
            ..Config::default()
        };
        assert_eq!(
            sort("from os import path as p, sep\n", &config),
            "from os import path as p, sep\n"
        );
    }

    #[test]
    fn straight_alias_regenerated() {
        let config = Config::default();
        assert_eq!(
            sort("import numpy as np\n", &config),
            "import numpy as np\n"
        );
    }

    #[test]
    fn comments_preserved_on_sorted_lines() {
        let config = Config::default();
        assert_eq!(
            sort("import sys  # system\nimport os  # files\n", &config),
            "import os  # files\nimport sys  # system\n"
        );
    }

    #[test]
    fn above_comment_follows_import() {
        let config = Config::default();
        assert_eq!(
            sort("import sys\n# files\nimport os\n", &config),
            "# files\nimport os\nimport sys\n"
        );
    }

    #[test]
    fn over_width_from_import_reflows() {
        let config = Config {
            line_length: 40,
            multi_line_output: WrapMode::VerticalHangingIndent,
            ..Config::default()
        };
        assert_eq!(
            sort(
                "from package.module import member_one, member_two, member_three\n",
                &config
            ),
            "from package.module import (\n    member_one,\n    member_three,\n    member_two\n)\n"
        );
    }

    #[test]
    fn marker_receives_section_output() {
        let config = Config {
            known_modules: crate::settings::KnownModules::new(
                vec!["myapp".to_string()],
                Vec::new(),
                Vec::new(),
                Vec::new(),
                Vec::new(),
                Vec::new(),
            )
            .unwrap(),
            ..Config::default()
        };
        let output = sort(
            "# isort:imports-firstparty\nimport myapp\nimport os\n",
            &config,
        );
        assert_eq!(
            output,
            "# isort:imports-firstparty\nimport myapp\n\nimport os\n"
        );
    }

    #[test]
    fn lines_between_types_separates_styles() {
        let config = Config {
            lines_between_types: 1,
            ..Config::default()
        };
        assert_eq!(
            sort("from os import path\nimport sys\n", &config),
            "import sys\n\nfrom os import path\n"
        );
    }

    #[test]
    fn untouched_file_round_trips() {
        let config = Config::default();
        let contents = "import os\nimport sys\n\nprint(os.path, sys.argv)\n";
        assert_eq!(sort(contents, &config), contents);
    }
}
