//! Splitting trailing comments off import lines and re-attaching them to
//! regenerated statements.

/// Split a line into its statement text and the trailing comment, if any.
pub(crate) fn parse(line: &str) -> (&str, Option<&str>) {
    match line.find('#') {
        Some(comment_start) => {
            let comment = line[comment_start + 1..].trim();
            let comment = (!comment.is_empty()).then_some(comment);
            (&line[..comment_start], comment)
        }
        None => (line, None),
    }
}

/// Return `original` with `comments` re-attached (deduplicated, joined with
/// `; `), or with its own trailing comment stripped when `removed` is set.
pub(crate) fn add_to_line(
    comments: &[String],
    original: &str,
    removed: bool,
    comment_prefix: &str,
) -> String {
    if removed {
        return parse(original).0.to_string();
    }
    if comments.is_empty() {
        return original.to_string();
    }
    let mut unique: Vec<&str> = Vec::new();
    for comment in comments {
        if !unique.contains(&comment.as_str()) {
            unique.push(comment);
        }
    }
    format!("{}{comment_prefix} {}", parse(original).0, unique.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_trailing_comment() {
        assert_eq!(
            parse("import os  # the operating system"),
            ("import os  ", Some("the operating system"))
        );
        assert_eq!(parse("import os"), ("import os", None));
        assert_eq!(parse("import os  #"), ("import os  ", None));
    }

    #[test]
    fn add_to_line_preserves_and_dedupes() {
        let comments = vec!["noqa".to_string(), "noqa".to_string()];
        assert_eq!(
            add_to_line(&comments, "import os", false, "  #"),
            "import os  # noqa"
        );
    }

    #[test]
    fn add_to_line_removed_strips_comment() {
        assert_eq!(
            add_to_line(&["stale".to_string()], "import os  # stale", true, "  #"),
            "import os  "
        );
    }
}
