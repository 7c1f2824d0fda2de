use pysort::{
    check_code_string, sort_code_string, Config, Error, ImportType, KnownModules, Section,
    WrapMode,
};
use test_case::test_case;

fn sort(code: &str, config: &Config) -> String {
    sort_code_string(code, config).expect("sorting should succeed").output
}

fn project_config() -> Config {
    Config {
        known_modules: KnownModules::new(
            vec!["myproject".to_string()],
            vec!["django".to_string()],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .expect("valid patterns"),
        ..Config::default()
    }
}

#[test_case("import sys\nimport os\n", "import os\nimport sys\n"; "plain swap")]
#[test_case("import lib10\nimport lib9\n", "import lib9\nimport lib10\n"; "natural numbering")]
#[test_case(
    "from os import sep, path\n",
    "from os import path, sep\n";
    "member ordering"
)]
#[test_case(
    "import os\nfrom __future__ import annotations\n",
    "from __future__ import annotations\n\nimport os\n";
    "future section first"
)]
#[test_case(
    "from .sibling import thing\nimport os\n",
    "import os\n\nfrom .sibling import thing\n";
    "local folder last"
)]
fn sorts_to_expected(code: &str, expected: &str) {
    assert_eq!(sort(code, &Config::default()), expected);
}

#[test]
fn sections_split_known_parties() {
    let config = project_config();
    let code = "import myproject\nimport django\nimport os\n";
    assert_eq!(
        sort(code, &config),
        "import os\n\nimport django\n\nimport myproject\n"
    );
    assert_eq!(
        pysort::place_module("myproject.app", &config),
        Section::Known(ImportType::FirstParty)
    );
    assert_eq!(
        pysort::place_module("django.db", &config),
        Section::Known(ImportType::ThirdParty)
    );
}

#[test]
fn remove_imports_strips_configured_modules() {
    let config = Config {
        remove_imports: vec!["os".to_string(), "from sys import argv".to_string()],
        ..Config::default()
    };
    assert_eq!(
        sort("import os\nimport sys\nfrom sys import argv, path\n", &config),
        "import sys\nfrom sys import path\n"
    );
}

#[test]
fn skip_directive_leaves_line_in_place() {
    let code = "import sys\nimport zlib  # isort:skip\nimport os\n";
    assert_eq!(
        sort(code, &Config::default()),
        "import os\nimport sys\n\nimport zlib  # isort:skip\n"
    );
}

#[test]
fn over_width_from_import_reflows_within_width() {
    let config = Config {
        line_length: 50,
        multi_line_output: WrapMode::VerticalHangingIndent,
        ..Config::default()
    };
    let output = sort(
        "from concurrent.futures import ThreadPoolExecutor, ProcessPoolExecutor, as_completed\n",
        &config,
    );
    assert_eq!(
        output,
        "from concurrent.futures import (\n    ProcessPoolExecutor,\n    ThreadPoolExecutor,\n    as_completed\n)\n"
    );
    for line in output.lines() {
        assert!(line.len() <= 50, "{line:?} exceeds the configured width");
    }
}

#[test]
fn trailing_backslash_at_eof_still_sorts() {
    assert_eq!(sort("import a, \\", &Config::default()), "import a\n");
}

#[test]
fn disabled_region_marker_stays_ahead_of_sorted_block() {
    let code = "# isort: off\nimport zzz\n# isort: on\nimport requests\nimport os\n";
    let output = sort(code, &Config::default());
    assert_eq!(
        output,
        "# isort: off\nimport zzz\n# isort: on\nimport os\n\nimport requests\n"
    );
    assert_eq!(sort(&output, &Config::default()), output);
}

#[test]
fn skip_file_refuses_to_sort() {
    let result = sort_code_string(
        "# isort:skip_file\nimport sys\nimport os\n",
        &Config::default(),
    );
    assert!(matches!(result, Err(Error::SkippedFile)));
}

#[test_case("import sys\nimport os\n"; "straight imports")]
#[test_case("from os import sep, path\nimport requests\nimport collections\n"; "mixed styles")]
#[test_case("import b\n# isort: split\nimport a\n"; "split regions")]
#[test_case("\"\"\"Module docstring.\"\"\"\nimport sys\nimport os\n\nprint(1)\n"; "docstring retained")]
fn sorting_is_idempotent(code: &str) {
    let config = Config::default();
    let once = sort(code, &config);
    let twice = sort(&once, &config);
    assert_eq!(once, twice);
    assert!(check_code_string(&once, &config).expect("check should succeed"));
}

#[test]
fn docstring_and_comment_header_are_preserved() {
    let code = "#!/usr/bin/env python\n\"\"\"Tool entry point.\"\"\"\nimport sys\nimport os\n";
    let output = sort(code, &Config::default());
    assert!(output.starts_with("#!/usr/bin/env python\n\"\"\"Tool entry point.\"\"\"\n"));
    assert!(output.contains("import os\nimport sys\n"));
}

#[test]
fn from_first_emits_from_imports_before_straight() {
    let config = Config {
        from_first: true,
        ..Config::default()
    };
    assert_eq!(
        sort("import sys\nfrom os import path\n", &config),
        "from os import path\nimport sys\n"
    );
}

#[test]
fn forced_separate_gets_its_own_trailing_section() {
    let config = Config {
        forced_separate: vec!["myproject.tests".to_string()],
        ..project_config()
    };
    let code = "import myproject.tests.helpers\nimport myproject\nimport os\n";
    assert_eq!(
        sort(code, &config),
        "import os\n\nimport myproject\n\nimport myproject.tests.helpers\n"
    );
}

#[test]
fn add_imports_lands_in_the_sorted_block() {
    let config = Config {
        add_imports: vec!["__future__.annotations".to_string()],
        ..Config::default()
    };
    assert_eq!(
        sort("import os\n", &config),
        "from __future__ import annotations\n\nimport os\n"
    );
}

#[test]
fn crlf_input_keeps_crlf_output() {
    let output = sort("import sys\r\nimport os\r\n", &Config::default());
    assert_eq!(output, "import os\r\nimport sys\r\n");
}
