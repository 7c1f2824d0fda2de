//! Wrapping of over-width import statements, both regenerated from-imports
//! (via the configured wrap strategy) and single already-formatted lines.

use std::sync::OnceLock;

use regex::Regex;

use crate::settings::Config;
use crate::wrap_modes::{self, WrapInput, WrapMode};

/// Render a from-import across multiple lines using the configured (or
/// overridden) wrap strategy, balancing line widths if requested.
pub(crate) fn import_statement(
    import_start: &str,
    from_imports: &[String],
    comments: &[String],
    line_separator: &str,
    config: &Config,
    multi_line_output: Option<WrapMode>,
    explode: bool,
) -> String {
    let (mode, mut line_length, include_trailing_comma) = if explode {
        (WrapMode::VerticalHangingIndent, 1, true)
    } else {
        (
            multi_line_output.unwrap_or(config.multi_line_output),
            config.effective_wrap_length(),
            config.include_trailing_comma,
        )
    };
    let dynamic_indent = " ".repeat(import_start.len() + 1);
    let render = |line_length: usize| {
        wrap_modes::format(
            mode,
            WrapInput {
                statement: import_start.to_string(),
                imports: from_imports.to_vec(),
                white_space: dynamic_indent.clone(),
                indent: &config.indent,
                line_length,
                comments: comments.to_vec(),
                line_separator,
                comment_prefix: &config.comment_prefix,
                include_trailing_comma,
                remove_comments: config.ignore_comments,
            },
        )
    };
    let mut statement = render(line_length);
    if config.balanced_wrapping {
        // Narrow the target width until the last line catches up with the
        // shortest earlier line, without changing the line count.
        let line_count = statement.split(line_separator).count();
        let minimum_length = if line_count > 1 {
            statement
                .split(line_separator)
                .take(line_count - 1)
                .map(str::len)
                .min()
                .unwrap_or(0)
        } else {
            0
        };
        let mut candidate = statement.clone();
        loop {
            let lines: Vec<&str> = candidate.split(line_separator).collect();
            let last_length = lines.last().map_or(0, |line| line.len());
            if last_length >= minimum_length || lines.len() != line_count || line_length <= 10 {
                break;
            }
            statement = candidate;
            line_length -= 1;
            candidate = render(line_length);
        }
    }
    if !statement.contains(line_separator) {
        return line(&statement, line_separator, config);
    }
    statement
}

fn boundary_regex(splitter: &str) -> &'static Regex {
    static IMPORT: OnceLock<Regex> = OnceLock::new();
    static DOT: OnceLock<Regex> = OnceLock::new();
    static AS: OnceLock<Regex> = OnceLock::new();
    let (cell, pattern) = match splitter {
        "import " => (&IMPORT, r"\bimport \b"),
        "." => (&DOT, r"\b\.\b"),
        _ => (&AS, r"\bas \b"),
    };
    cell.get_or_init(|| Regex::new(pattern).expect("wrap splitter patterns are valid"))
}

/// Wrap a single already-formatted line to the configured width, if possible.
pub(crate) fn line(content: &str, line_separator: &str, config: &Config) -> String {
    if content.len() <= config.line_length {
        return content.to_string();
    }

    if config.multi_line_output == WrapMode::Noqa {
        return wrap_line_in_noqa_mode(content, config);
    }

    let (line_without_comment, comment) = match content.find('#') {
        Some(comment_start) => (
            &content[..comment_start],
            format!("{}{}", config.comment_prefix, &content[comment_start + 1..]),
        ),
        None => (content, String::new()),
    };
    for splitter in ["import ", ".", "as "] {
        let exp = boundary_regex(splitter);
        if exp.is_match(line_without_comment)
            && !line_without_comment.trim().starts_with(splitter)
        {
            let mut line_parts: Vec<String> =
                exp.split(line_without_comment).map(str::to_string).collect();
            if let Some(last_part) = line_parts.last_mut() {
                *last_part = add_trailing_comma(last_part, &comment, config);
                if !comment.is_empty() && !(config.use_parentheses && comment.contains("noqa")) {
                    last_part.push_str(&comment);
                }
            }

            let wrap_length = config.effective_wrap_length();
            let mut content = content.to_string();
            let mut next_line: Vec<String> = Vec::new();
            while content.len() + 2 > wrap_length && !line_parts.is_empty() {
                if let Some(part) = line_parts.pop() {
                    next_line.push(part);
                }
                content = line_parts.join(splitter);
            }
            if content.is_empty() {
                if let Some(part) = next_line.pop() {
                    content = part;
                }
            }

            let cont_line = line(
                &format!(
                    "{}{}",
                    config.indent,
                    next_line.join(splitter).trim_start()
                ),
                line_separator,
                config,
            );

            if config.use_parentheses {
                return add_parentheses_brackets(
                    &content,
                    &cont_line,
                    &comment,
                    splitter,
                    line_separator,
                    config,
                );
            }
            return format!("{content}{splitter}\\{line_separator}{cont_line}");
        }
    }

    content.to_string()
}

fn add_parentheses_brackets(
    content: &str,
    cont_line: &str,
    comment: &str,
    splitter: &str,
    line_separator: &str,
    config: &Config,
) -> String {
    if splitter == "as " {
        return format!("{content}{splitter}{}", cont_line.trim_start());
    }

    let closing_bracket_line_break = if matches!(
        config.multi_line_output,
        WrapMode::VerticalHangingIndent | WrapMode::VerticalGridGrouped
    ) {
        line_separator
    } else {
        ""
    };

    let mut noqa_comment = "";
    let mut cont_line = cont_line;
    if !comment.is_empty() && comment.contains("noqa") {
        // noqa suppressions must stay on the first physical line.
        noqa_comment = comment;
        cont_line = cont_line.trim_end();
    }
    let output = format!(
        "{content}{splitter}({noqa_comment}{line_separator}{cont_line}{closing_bracket_line_break})"
    );
    let mut lines: Vec<String> = output.split(line_separator).map(str::to_string).collect();
    if let Some(last) = lines.last_mut() {
        // A trailing comment must not land after the closing bracket.
        if last.contains(config.comment_prefix.as_str()) && last.ends_with(')') {
            if let Some((statement, trailing)) = last.split_once(config.comment_prefix.as_str()) {
                let trailing = &trailing[..trailing.len() - 1];
                *last = format!("{statement}){}{trailing}", config.comment_prefix);
            }
        }
    }
    lines.join(line_separator)
}

fn add_trailing_comma(last_line: &str, comment: &str, config: &Config) -> String {
    let last_line = last_line.trim_end();
    if !config.include_trailing_comma || last_line.ends_with(',') {
        return last_line.to_string();
    }

    let comma = if comment.is_empty() || config.use_parentheses {
        ","
    } else {
        ""
    };
    format!("{last_line}{comma}")
}

fn wrap_line_in_noqa_mode(content: &str, config: &Config) -> String {
    if !content.contains("# NOQA") {
        return format!("{content}{} NOQA", config.comment_prefix);
    }
    content.to_string()
}
