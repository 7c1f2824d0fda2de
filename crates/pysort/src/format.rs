//! Conversion between the natural (`from x import y`) and simplified
//! (`x.y`) spellings of an import.

/// Normalize an import given in either spelling into statement form.
pub(crate) fn natural(import_line: &str) -> String {
    let import_line = import_line.trim();
    if import_line.starts_with("from ") || import_line.starts_with("import ") {
        return import_line.to_string();
    }
    match import_line.rsplit_once('.') {
        Some((module, member)) => format!("from {module} import {member}"),
        None => format!("import {import_line}"),
    }
}

/// Normalize an import given in either spelling into dotted form.
pub(crate) fn simplified(import_line: &str) -> String {
    let import_line = import_line.trim();
    if let Some(rest) = import_line.strip_prefix("from ") {
        return rest.replace(" import ", ".").trim().to_string();
    }
    if let Some(rest) = import_line.strip_prefix("import ") {
        return rest.trim().to_string();
    }
    import_line.to_string()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("os", "import os")]
    #[test_case("os.path", "from os import path")]
    #[test_case("a.b.c", "from a.b import c")]
    #[test_case("import os", "import os")]
    #[test_case("from os import path", "from os import path")]
    fn natural_forms(input: &str, expected: &str) {
        assert_eq!(natural(input), expected);
    }

    #[test_case("from os import path", "os.path")]
    #[test_case("import os", "os")]
    #[test_case("os.path", "os.path")]
    fn simplified_forms(input: &str, expected: &str) {
        assert_eq!(simplified(input), expected);
    }
}
