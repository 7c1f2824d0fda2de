//! The closed set of line-reflow strategies for over-width import
//! statements. Each strategy defines its own break points, indentation, and
//! trailing-comma policy; all of them preserve attached comments unless
//! comment removal is configured.

use serde::{Deserialize, Serialize};

use crate::comments;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapMode {
    #[default]
    Grid,
    Vertical,
    HangingIndent,
    VerticalHangingIndent,
    VerticalGrid,
    VerticalGridGrouped,
    VerticalGridGroupedNoComma,
    Noqa,
    VerticalHangingIndentBracket,
    VerticalPrefixFromModuleImport,
    HangingIndentWithParentheses,
    BackslashGrid,
}

/// The common interface shared by all wrap strategies.
#[derive(Debug, Clone)]
pub(crate) struct WrapInput<'a> {
    /// The statement prefix, e.g. `from os.path import `.
    pub(crate) statement: String,
    /// The member names still to be placed.
    pub(crate) imports: Vec<String>,
    /// Continuation indent aligned under the opening of the statement.
    pub(crate) white_space: String,
    pub(crate) indent: &'a str,
    pub(crate) line_length: usize,
    pub(crate) comments: Vec<String>,
    pub(crate) line_separator: &'a str,
    pub(crate) comment_prefix: &'a str,
    pub(crate) include_trailing_comma: bool,
    pub(crate) remove_comments: bool,
}

/// Rewrite `input` across multiple lines using the selected strategy.
pub(crate) fn format(mode: WrapMode, input: WrapInput) -> String {
    match mode {
        WrapMode::Grid => grid(input),
        WrapMode::Vertical => vertical(input),
        WrapMode::HangingIndent => hanging_indent_common(input, false),
        WrapMode::VerticalHangingIndent => vertical_hanging_indent(input),
        WrapMode::VerticalGrid => vertical_grid(input),
        WrapMode::VerticalGridGrouped => vertical_grid_grouped(input),
        WrapMode::VerticalGridGroupedNoComma => vertical_grid_grouped_no_comma(input),
        WrapMode::Noqa => noqa(input),
        WrapMode::VerticalHangingIndentBracket => vertical_hanging_indent_bracket(input),
        WrapMode::VerticalPrefixFromModuleImport => vertical_prefix_from_module_import(input),
        WrapMode::HangingIndentWithParentheses => hanging_indent_common(input, true),
        WrapMode::BackslashGrid => backslash_grid(input),
    }
}

fn last_line<'a>(statement: &'a str, line_separator: &str) -> &'a str {
    statement.rsplit(line_separator).next().unwrap_or(statement)
}

fn grid(mut input: WrapInput) -> String {
    if input.imports.is_empty() {
        return String::new();
    }

    let mut statement = input.statement;
    statement.push('(');
    statement.push_str(&input.imports.remove(0));
    while !input.imports.is_empty() {
        let next_import = input.imports.remove(0);
        let next_statement = comments::add_to_line(
            &input.comments,
            &format!("{statement}, {next_import}"),
            input.remove_comments,
            input.comment_prefix,
        );
        if last_line(&next_statement, input.line_separator).len() + 1 > input.line_length {
            // The member itself is too wide: flow its space-separated parts
            // onto aligned continuation lines.
            let mut parts = next_import.split(' ');
            let mut current = format!(
                "{}{}",
                input.white_space,
                parts.next().unwrap_or_default()
            );
            let mut lines: Vec<String> = Vec::new();
            for part in parts {
                let candidate = format!("{current} {part}");
                if candidate.len() + 1 > input.line_length {
                    lines.push(current);
                    current = format!("{}{part}", input.white_space);
                } else {
                    current = candidate;
                }
            }
            lines.push(current);
            statement = format!(
                "{}{}{}",
                comments::add_to_line(
                    &input.comments,
                    &format!("{statement},"),
                    input.remove_comments,
                    input.comment_prefix,
                ),
                input.line_separator,
                lines.join(input.line_separator)
            );
            input.comments.clear();
        } else {
            statement = format!("{statement}, {next_import}");
        }
    }
    let comma_maybe = if input.include_trailing_comma { "," } else { "" };
    format!("{statement}{comma_maybe})")
}

fn vertical(mut input: WrapInput) -> String {
    if input.imports.is_empty() {
        return String::new();
    }

    let first = input.imports.remove(0);
    let first_import = format!(
        "{}{}{}",
        comments::add_to_line(
            &input.comments,
            &format!("{first},"),
            input.remove_comments,
            input.comment_prefix,
        ),
        input.line_separator,
        input.white_space
    );
    let joined = input
        .imports
        .join(&format!(",{}{}", input.line_separator, input.white_space));
    let comma_maybe = if input.include_trailing_comma { "," } else { "" };
    format!(
        "{}({first_import}{joined}{comma_maybe})",
        input.statement
    )
}

fn hanging_indent_common(mut input: WrapInput, use_parentheses: bool) -> String {
    if input.imports.is_empty() {
        return String::new();
    }
    let line_length_limit = input
        .line_length
        .saturating_sub(if use_parentheses { 1 } else { 3 });

    let end_line = |line: String| -> String {
        if use_parentheses {
            return line;
        }
        let mut line = line;
        if !line.ends_with(' ') {
            line.push(' ');
        }
        line.push('\\');
        line
    };

    let mut statement = input.statement;
    if use_parentheses {
        statement.push('(');
    }
    let next_import = input.imports.remove(0);
    let mut next_statement = format!("{statement}{next_import}");
    // The first member may already overflow the prefix line.
    if next_statement.len() > line_length_limit {
        next_statement = format!(
            "{}{}{}{next_import}",
            comments::add_to_line(
                &input.comments,
                &end_line(statement),
                input.remove_comments,
                input.comment_prefix,
            ),
            input.line_separator,
            input.indent
        );
        input.comments.clear();
    }
    statement = next_statement;
    while !input.imports.is_empty() {
        let next_import = input.imports.remove(0);
        let next_statement = comments::add_to_line(
            &input.comments,
            &format!("{statement}, {next_import}"),
            input.remove_comments,
            input.comment_prefix,
        );
        if last_line(&next_statement, input.line_separator).len() > line_length_limit {
            statement = format!(
                "{}{}{}{next_import}",
                comments::add_to_line(
                    &input.comments,
                    &end_line(format!("{statement},")),
                    input.remove_comments,
                    input.comment_prefix,
                ),
                input.line_separator,
                input.indent
            );
            input.comments.clear();
        } else {
            statement = next_statement;
        }
    }
    let comma_maybe = if input.include_trailing_comma { "," } else { "" };
    let close_parenthesis_maybe = if use_parentheses { ")" } else { "" };
    format!("{statement}{comma_maybe}{close_parenthesis_maybe}")
}

fn vertical_hanging_indent(input: WrapInput) -> String {
    let line_with_comments = comments::add_to_line(
        &input.comments,
        "",
        input.remove_comments,
        input.comment_prefix,
    );
    let joined = input
        .imports
        .join(&format!(",{}{}", input.line_separator, input.indent));
    let comma_maybe = if input.include_trailing_comma { "," } else { "" };
    format!(
        "{}({line_with_comments}{}{}{joined}{comma_maybe}{})",
        input.statement, input.line_separator, input.indent, input.line_separator
    )
}

fn vertical_grid_common(
    mut input: WrapInput,
    need_trailing_char: bool,
    count_trailing_comma: bool,
) -> String {
    if input.imports.is_empty() {
        return String::new();
    }

    let mut statement = format!(
        "{}{}{}{}{}",
        input.statement,
        comments::add_to_line(
            &input.comments,
            "(",
            input.remove_comments,
            input.comment_prefix,
        ),
        input.line_separator,
        input.indent,
        input.imports.remove(0)
    );
    while !input.imports.is_empty() {
        let next_import = input.imports.remove(0);
        let next_statement = format!("{statement}, {next_import}");
        let mut current_line_length = last_line(&next_statement, input.line_separator).len();
        if !input.imports.is_empty() {
            // Account for the comma that will follow this member.
            current_line_length += 1;
        } else {
            // Otherwise, maybe a closing `)` and a trailing `,`.
            if need_trailing_char {
                current_line_length += 1;
            }
            if count_trailing_comma && input.include_trailing_comma {
                current_line_length += 1;
            }
        }
        if current_line_length > input.line_length {
            statement = format!(
                "{statement},{}{}{next_import}",
                input.line_separator, input.indent
            );
        } else {
            statement = next_statement;
        }
    }
    if input.include_trailing_comma {
        statement.push(',');
    }
    statement
}

fn vertical_grid(input: WrapInput) -> String {
    // Take into account the closing `)` and the trailing comma if any.
    let statement = vertical_grid_common(input, true, true);
    format!("{statement})")
}

fn vertical_grid_grouped(input: WrapInput) -> String {
    let line_separator = input.line_separator;
    let statement = vertical_grid_common(input, true, false);
    format!("{statement}{line_separator})")
}

fn vertical_grid_grouped_no_comma(input: WrapInput) -> String {
    let line_separator = input.line_separator;
    let statement = vertical_grid_common(input, false, false);
    format!("{statement}{line_separator})")
}

fn noqa(input: WrapInput) -> String {
    let joined = input.imports.join(", ");
    let retval = format!("{}{joined}", input.statement);
    let comment_str = input.comments.join(" ");
    if !input.comments.is_empty() {
        if retval.len() + input.comment_prefix.len() + 1 + comment_str.len() <= input.line_length {
            return format!("{retval}{} {comment_str}", input.comment_prefix);
        }
        if input.comments.iter().any(|comment| comment == "NOQA") {
            return format!("{retval}{} {comment_str}", input.comment_prefix);
        }
        return format!("{retval}{} NOQA {comment_str}", input.comment_prefix);
    }
    if retval.len() <= input.line_length {
        return retval;
    }
    format!("{retval}{} NOQA", input.comment_prefix)
}

fn vertical_hanging_indent_bracket(input: WrapInput) -> String {
    if input.imports.is_empty() {
        return String::new();
    }
    let indent = input.indent;
    let mut statement = vertical_hanging_indent(input);
    // Pull the closing bracket onto the member indent level.
    statement.pop();
    format!("{statement}{indent})")
}

fn vertical_prefix_from_module_import(mut input: WrapInput) -> String {
    if input.imports.is_empty() {
        return String::new();
    }

    let prefix_statement = input.statement.clone();
    let mut output_statement = format!("{prefix_statement}{}", input.imports.remove(0));
    let mut comments = input.comments.clone();

    let mut statement = output_statement.clone();
    let mut statement_with_comments = String::new();
    for next_import in &input.imports {
        statement = format!("{statement}, {next_import}");
        statement_with_comments = comments::add_to_line(
            &comments,
            &statement,
            input.remove_comments,
            input.comment_prefix,
        );
        if last_line(&statement_with_comments, input.line_separator).len() + 1 > input.line_length {
            statement = format!(
                "{}{}{prefix_statement}{next_import}",
                comments::add_to_line(
                    &comments,
                    &output_statement,
                    input.remove_comments,
                    input.comment_prefix,
                ),
                input.line_separator
            );
            comments.clear();
        }
        output_statement = statement.clone();
    }

    if !comments.is_empty() && !statement_with_comments.is_empty() {
        output_statement = statement_with_comments;
    }
    output_statement
}

fn backslash_grid(mut input: WrapInput) -> String {
    // Continuation lines align one column short of the opening, leaving
    // room for the trailing backslash.
    let indent = input.white_space[..input.white_space.len().saturating_sub(1)].to_string();
    input.indent = "";
    let input = WrapInput {
        indent: &indent,
        ..input
    };
    hanging_indent_common(input, false)
}
