//! Line-based extraction of import statements from Python source.
//!
//! The scanner walks the file once, tracking quote state so imports inside
//! strings are never touched, consuming parenthesized and backslash
//! continuations, and bucketing every import (with its attached comments)
//! by the section it belongs in. Everything that is not an import passes
//! through untouched.

use indexmap::IndexMap;
use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::comments;
use crate::format;
use crate::place::Placer;
use crate::settings::{Config, Section};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ImportKind {
    Straight,
    From,
}

/// Imports collected for one section.
#[derive(Debug, Default)]
pub(crate) struct SectionImports {
    /// `import x` modules, mapped to whether a direct (non-aliased) form
    /// was seen.
    pub(crate) straight: IndexMap<String, bool>,
    /// `from x import a, b` modules, mapped to members and the same flag.
    pub(crate) from: IndexMap<String, IndexMap<String, bool>>,
}

/// Comments captured during scanning, bucketed by where they re-attach.
#[derive(Debug, Default)]
pub(crate) struct CategorizedComments {
    /// Trailing comments on from-imports, keyed by module.
    pub(crate) from: FxHashMap<String, Vec<String>>,
    /// Trailing comments on straight imports, keyed by module.
    pub(crate) straight: FxHashMap<String, Vec<String>>,
    /// Comments tied to a single member of a from-import.
    pub(crate) nested: FxHashMap<String, FxHashMap<String, String>>,
    /// Whole comment lines found directly above an import.
    pub(crate) above_from: FxHashMap<String, Vec<String>>,
    pub(crate) above_straight: FxHashMap<String, Vec<String>>,
}

/// Everything the scanner learned about one source file.
#[derive(Debug)]
pub(crate) struct ParsedContent {
    pub(crate) lines_without_imports: Vec<String>,
    /// Index where the sorted block is emitted, `-1` when no imports.
    pub(crate) import_index: isize,
    /// Sections redirected to an `isort:imports-SECTION` marker, by label.
    pub(crate) place_imports: FxHashMap<String, Vec<String>>,
    /// Marker line to section label.
    pub(crate) import_placements: FxHashMap<String, String>,
    /// Module (or `module.member`) to the aliases bound to it.
    pub(crate) as_map: FxHashMap<String, Vec<String>>,
    pub(crate) imports: IndexMap<Section, SectionImports>,
    pub(crate) categorized_comments: CategorizedComments,
    pub(crate) original_line_count: usize,
    pub(crate) line_separator: String,
    pub(crate) section_comments: Vec<String>,
}

/// CRLF wins over CR wins over LF.
pub(crate) fn infer_line_separator(contents: &str) -> &'static str {
    if contents.contains("\r\n") {
        "\r\n"
    } else if contents.contains('\r') {
        "\r"
    } else {
        "\n"
    }
}

fn import_type(line: &str) -> Option<ImportKind> {
    if line.contains("isort:skip") || line.contains("NOQA") {
        None
    } else if line.starts_with("import ") {
        Some(ImportKind::Straight)
    } else if line.starts_with("from ") {
        Some(ImportKind::From)
    } else {
        None
    }
}

/// Reduce an import statement to space-separated module and member tokens.
///
/// Parentheses, commas, and backslashes become whitespace; the `from` and
/// `import` keywords are dropped. `_import` inside identifiers is shielded
/// from the keyword removal, and brace groups are glued (`{ x }` becomes
/// `{|x|}`) so they survive the later whitespace split as single tokens.
fn strip_syntax(import_string: &str) -> String {
    let mut import_string = import_string.replace("_import", "[[i]]");
    for remove_syntax in ['\\', '(', ')', ','] {
        import_string = import_string.replace(remove_syntax, " ");
    }
    let mut import_list: Vec<&str> = import_string.split_whitespace().collect();
    for key in ["from", "import"] {
        if let Some(position) = import_list.iter().position(|token| *token == key) {
            import_list.remove(position);
        }
    }
    import_list
        .join(" ")
        .replace("[[i]]", "_import")
        .replace("{ ", "{|")
        .replace(" }", "|}")
}

#[derive(Debug, Default)]
pub(crate) struct SkipState {
    pub(crate) in_quote: String,
    in_top_comment: bool,
    first_comment_index_start: isize,
    first_comment_index_end: isize,
}

impl SkipState {
    pub(crate) fn new() -> Self {
        Self {
            first_comment_index_start: -1,
            first_comment_index_end: -1,
            ..Self::default()
        }
    }
}

/// Advance the quote/top-comment state across one line and report whether
/// the line must be passed through untouched.
pub(crate) fn skip_line(
    line: &str,
    state: &mut SkipState,
    index: isize,
    section_comments: &[String],
) -> bool {
    let skip = !state.in_quote.is_empty();
    if index == 1 && line.starts_with('#') {
        state.in_top_comment = true;
        return true;
    } else if state.in_top_comment
        && (!line.starts_with('#') || section_comments.iter().any(|comment| comment == line))
    {
        state.in_top_comment = false;
        state.first_comment_index_end = index - 1;
    }

    if line.contains('"') || line.contains('\'') {
        if state.first_comment_index_start == -1
            && (line.starts_with('"') || line.starts_with('\''))
        {
            state.first_comment_index_start = index;
        }
        let bytes = line.as_bytes();
        let mut char_index = 0;
        while char_index < bytes.len() {
            if bytes[char_index] == b'\\' {
                char_index += 1;
            } else if !state.in_quote.is_empty() {
                if bytes[char_index..].starts_with(state.in_quote.as_bytes()) {
                    state.in_quote.clear();
                    if state.first_comment_index_end < state.first_comment_index_start {
                        state.first_comment_index_end = index;
                    }
                }
            } else if bytes[char_index] == b'\'' || bytes[char_index] == b'"' {
                let long_quote = &bytes[char_index..bytes.len().min(char_index + 3)];
                if long_quote == b"\"\"\"" || long_quote == b"'''" {
                    state.in_quote = String::from_utf8_lossy(long_quote).into_owned();
                    char_index += 2;
                } else {
                    state.in_quote = char::from(bytes[char_index]).to_string();
                }
            } else if bytes[char_index] == b'#' {
                break;
            }
            char_index += 1;
        }
    }

    skip || !state.in_quote.is_empty() || state.in_top_comment
}

fn section_bucket<'m>(
    imports: &'m mut IndexMap<Section, SectionImports>,
    section: Section,
    config: &Config,
) -> &'m mut SectionImports {
    let key = if imports.contains_key(&section) {
        section
    } else {
        warn!(
            "no declared section for {section}; placing in {}",
            config.default_section
        );
        config.default_section.clone()
    };
    imports.entry(key).or_default()
}

fn is_above_comment(line: &str) -> bool {
    line.starts_with('#')
        && !line.ends_with("\"\"\"")
        && !line.ends_with("'''")
        && !line.contains("isort:imports-")
        && !line.contains("isort: on")
        && !line.contains("isort: off")
}

/// Scan a whole file, extracting and categorizing its imports.
#[allow(clippy::too_many_lines)]
pub(crate) fn file_contents(contents: &str, config: &Config) -> ParsedContent {
    let line_separator = config
        .line_ending
        .clone()
        .unwrap_or_else(|| infer_line_separator(contents).to_string());
    let mut in_lines: Vec<String> = contents
        .split(line_separator.as_str())
        .map(str::to_string)
        .collect();
    let original_line_count = in_lines.len();
    let section_comments = config.section_comments();
    let placer = Placer::new(config);

    let effectively_empty =
        original_line_count <= 1 && in_lines.first().map_or(true, String::is_empty);
    if !effectively_empty || config.force_adds {
        in_lines.extend(config.add_imports.iter().map(|added| format::natural(added)));
    }
    let line_count = in_lines.len();

    let mut out_lines: Vec<String> = Vec::new();
    let mut place_imports: FxHashMap<String, Vec<String>> = FxHashMap::default();
    let mut import_placements: FxHashMap<String, String> = FxHashMap::default();
    let mut as_map: FxHashMap<String, Vec<String>> = FxHashMap::default();
    let mut imports: IndexMap<Section, SectionImports> = config
        .section_order()
        .into_iter()
        .map(|section| (section, SectionImports::default()))
        .collect();
    let mut categorized_comments = CategorizedComments::default();

    let mut index: usize = 0;
    let mut import_index: isize = -1;
    let mut in_disabled_region = false;
    let mut state = SkipState::new();
    while index < line_count {
        let raw_line = in_lines[index].clone();
        let line = raw_line
            .replace("from.import ", "from . import ")
            .replace('\t', " ")
            .replace("import*", "import *")
            .replace(" .import ", " . import ");
        index += 1;
        let statement_index = index;

        let mut skipping_line = skip_line(
            &line,
            &mut state,
            index as isize,
            &section_comments,
        );

        // isort: off / isort: on pass a whole region through untouched.
        if in_disabled_region {
            if line.starts_with('#') && line.contains("isort: on") {
                in_disabled_region = false;
            }
            out_lines.push(raw_line);
            continue;
        } else if line.starts_with('#') && line.contains("isort: off") {
            in_disabled_region = true;
            out_lines.push(raw_line);
            continue;
        }

        if section_comments.iter().any(|comment| *comment == line) && !skipping_line {
            // An existing heading; regenerated with its section's output.
            if import_index == -1 {
                import_index = index as isize - 1;
            }
            continue;
        }

        if line.starts_with('#') && line.contains("isort:imports-") {
            if let Some(section) = line
                .rsplit("isort:imports-")
                .next()
                .and_then(|rest| rest.split_whitespace().next())
            {
                let section = section.to_uppercase();
                place_imports.entry(section.clone()).or_default();
                import_placements.insert(line.clone(), section);
            }
        }

        if line.contains(';') {
            for part in line.split(';').map(str::trim) {
                if !part.is_empty() && !part.starts_with("from ") && !part.starts_with("import ") {
                    skipping_line = true;
                }
            }
        }

        if import_type(&line).is_none() || skipping_line {
            out_lines.push(raw_line);
            continue;
        }

        let statement_parts: Vec<String> =
            line.split(';').map(|part| part.trim().to_string()).collect();
        for mut line in statement_parts {
            let Some(type_of_import) = import_type(&line) else {
                out_lines.push(line);
                continue;
            };

            if import_index == -1 {
                import_index = index as isize - 1;
            }
            let mut nested_comments: FxHashMap<String, String> = FxHashMap::default();
            let (import_string, comment) = comments::parse(&line);
            let mut import_string = import_string.to_string();
            let mut comments: Vec<String> = comment.map(str::to_string).into_iter().collect();
            let stripped_statement = strip_syntax(&import_string);
            let line_parts: Vec<&str> = stripped_statement.split_whitespace().collect();
            if type_of_import == ImportKind::From
                && line_parts.len() == 2
                && line_parts[1] != "*"
                && !comments.is_empty()
            {
                nested_comments.insert(line_parts[1].to_string(), comments[0].clone());
            }

            let before_comment = line.split('#').next().unwrap_or_default();
            if before_comment.contains('(') && index < line_count {
                // Parenthesized continuation: consume until the closing
                // bracket, keeping member comments associated.
                while !line.trim().ends_with(')') && index < line_count {
                    let (next, new_comment) = comments::parse(&in_lines[index]);
                    line = next.to_string();
                    let new_comment = new_comment.map(str::to_string);
                    index += 1;
                    if let Some(new_comment) = new_comment {
                        comments.push(new_comment.clone());
                        let stripped_line = strip_syntax(&line).trim().to_string();
                        if type_of_import == ImportKind::From
                            && !stripped_line.is_empty()
                            && !stripped_line.contains(' ')
                        {
                            nested_comments.insert(stripped_line, new_comment);
                        }
                    }
                    import_string.push_str(&line_separator);
                    import_string.push_str(&line);
                }
            } else {
                while line.trim().ends_with('\\') && index < line_count {
                    let (next, new_comment) = comments::parse(&in_lines[index]);
                    line = next.to_string();
                    let new_comment = new_comment.map(str::to_string);
                    index += 1;
                    if let Some(new_comment) = &new_comment {
                        comments.push(new_comment.clone());
                    }

                    // A backslash continuation may itself open a bracket.
                    let before_comment = line.split('#').next().unwrap_or_default().to_string();
                    if before_comment.contains('(')
                        && !before_comment.contains(')')
                        && index < line_count
                    {
                        let stripped_line = strip_syntax(&line).trim().to_string();
                        if type_of_import == ImportKind::From
                            && !stripped_line.is_empty()
                            && !stripped_line.contains(' ')
                            && new_comment.is_some()
                        {
                            nested_comments.insert(stripped_line, comments[comments.len() - 1].clone());
                        }
                        import_string.push_str(&line_separator);
                        import_string.push_str(&line);

                        while !line.trim().ends_with(')') && index < line_count {
                            let (next, new_comment) = comments::parse(&in_lines[index]);
                            line = next.to_string();
                            let new_comment = new_comment.map(str::to_string);
                            index += 1;
                            if let Some(new_comment) = new_comment {
                                comments.push(new_comment.clone());
                                let stripped_line = strip_syntax(&line).trim().to_string();
                                if type_of_import == ImportKind::From
                                    && !stripped_line.is_empty()
                                    && !stripped_line.contains(' ')
                                {
                                    nested_comments.insert(stripped_line, new_comment);
                                }
                            }
                            import_string.push_str(&line_separator);
                            import_string.push_str(&line);
                        }
                    }

                    let stripped_line = strip_syntax(&line).trim().to_string();
                    if type_of_import == ImportKind::From
                        && !stripped_line.is_empty()
                        && !stripped_line.contains(' ')
                        && new_comment.is_some()
                    {
                        nested_comments.insert(stripped_line, comments[comments.len() - 1].clone());
                    }
                    if import_string.trim().ends_with(" import")
                        || line.trim().starts_with("import ")
                    {
                        import_string.push_str(&line_separator);
                        import_string.push_str(&line);
                    } else {
                        import_string = format!(
                            "{} {}",
                            import_string.trim_end().trim_end_matches('\\'),
                            line.trim_start()
                        );
                    }
                }
            }

            if type_of_import == ImportKind::From {
                // Fold a dotted module spread across continuations back
                // into a single token before the member list.
                import_string = import_string.replace("import(", "import (");
                let parts: Vec<&str> = import_string.split(" import ").collect();
                let mut from_parts = parts.first().unwrap_or(&"").split(' ');
                let head = from_parts.next().unwrap_or_default();
                let tail: String = from_parts.collect();
                let mut rebuilt = vec![format!("{head} {tail}")];
                rebuilt.extend(parts.iter().skip(1).map(|part| (*part).to_string()));
                import_string = rebuilt.join(" import ");
            }

            let mut just_imports: Vec<String> = strip_syntax(&import_string)
                .split_whitespace()
                .map(|item| item.replace("{|", "{ ").replace("|}", " }"))
                .collect();

            let mut straight_import = true;
            if just_imports
                .iter()
                .position(|token| token == "as")
                .is_some_and(|as_index| as_index + 1 < just_imports.len())
            {
                straight_import = false;
                while let Some(as_index) = just_imports.iter().position(|token| token == "as") {
                    if as_index == 0 || as_index + 1 >= just_imports.len() {
                        break;
                    }
                    let module = if type_of_import == ImportKind::From {
                        format!("{}.{}", just_imports[0], just_imports[as_index - 1])
                    } else {
                        just_imports[as_index - 1].clone()
                    };
                    as_map
                        .entry(module.clone())
                        .or_default()
                        .push(just_imports[as_index + 1].clone());
                    if !config.combine_as_imports {
                        categorized_comments
                            .straight
                            .insert(module, std::mem::take(&mut comments));
                    }
                    just_imports.drain(as_index..as_index + 2);
                }
            }

            if type_of_import == ImportKind::From {
                if just_imports.is_empty() {
                    continue;
                }
                let import_from = just_imports.remove(0);
                let placed_module = placer.place(&import_from);
                debug!("from-type placement for {import_from} returned {placed_module}");

                for import_name in &just_imports {
                    if let Some(associated_comment) = nested_comments.get(import_name) {
                        categorized_comments
                            .nested
                            .entry(import_from.clone())
                            .or_default()
                            .insert(import_name.clone(), associated_comment.clone());
                        if let Some(position) =
                            comments.iter().position(|comment| comment == associated_comment)
                        {
                            comments.remove(position);
                        }
                    }
                }
                if !comments.is_empty() {
                    categorized_comments
                        .from
                        .entry(import_from.clone())
                        .or_default()
                        .append(&mut comments);
                }

                if out_lines.len() as isize
                    > import_index
                        .max(state.first_comment_index_end + 1)
                        .max(1)
                        - 1
                {
                    let mut last = out_lines
                        .last()
                        .map(|line| line.trim_end().to_string())
                        .unwrap_or_default();
                    while is_above_comment(&last) {
                        if let Some(popped) = out_lines.pop() {
                            categorized_comments
                                .above_from
                                .entry(import_from.clone())
                                .or_default()
                                .insert(0, popped);
                        }
                        if out_lines.len() as isize
                            > (import_index - 1)
                                .max(state.first_comment_index_end + 1)
                                .max(1)
                                - 1
                        {
                            last = out_lines
                                .last()
                                .map(|line| line.trim_end().to_string())
                                .unwrap_or_default();
                        } else {
                            last = String::new();
                        }
                    }
                    if statement_index as isize - 1 == import_index {
                        import_index -= categorized_comments
                            .above_from
                            .get(&import_from)
                            .map_or(0, Vec::len)
                            as isize;
                    }
                }

                let root = &mut section_bucket(&mut imports, placed_module, config).from;
                let members = root.entry(import_from).or_default();
                for module in just_imports.drain(..) {
                    let existing = members.get(&module).copied().unwrap_or(false);
                    members.insert(module, straight_import || existing);
                }
            } else {
                for module in just_imports.drain(..) {
                    if !comments.is_empty() {
                        categorized_comments
                            .straight
                            .insert(module.clone(), std::mem::take(&mut comments));
                    }

                    if out_lines.len() as isize
                        > import_index
                            .max(state.first_comment_index_end + 1)
                            .max(1)
                            - 1
                    {
                        let mut last = out_lines
                            .last()
                            .map(|line| line.trim_end().to_string())
                            .unwrap_or_default();
                        while is_above_comment(&last) {
                            if let Some(popped) = out_lines.pop() {
                                categorized_comments
                                    .above_straight
                                    .entry(module.clone())
                                    .or_default()
                                    .insert(0, popped);
                            }
                            if !out_lines.is_empty()
                                && out_lines.len() as isize != state.first_comment_index_end
                            {
                                last = out_lines
                                    .last()
                                    .map(|line| line.trim_end().to_string())
                                    .unwrap_or_default();
                            } else {
                                last = String::new();
                            }
                        }
                        if index as isize - 1 == import_index {
                            import_index -= categorized_comments
                                .above_straight
                                .get(&module)
                                .map_or(0, Vec::len)
                                as isize;
                        }
                    }
                    let placed_module = placer.place(&module);
                    debug!("straight-type placement for {module} returned {placed_module}");
                    let root = &mut section_bucket(&mut imports, placed_module, config).straight;
                    let existing = root.get(&module).copied().unwrap_or(false);
                    root.insert(module, straight_import || existing);
                }
            }
        }
    }

    ParsedContent {
        lines_without_imports: out_lines,
        import_index,
        place_imports,
        import_placements,
        as_map,
        imports,
        categorized_comments,
        original_line_count,
        line_separator,
        section_comments,
    }
}
