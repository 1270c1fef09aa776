//! Test fixtures and constants.

/// Single-entry repository list.
pub const FOO_BAR_REPOS: &str = r#"{"foo-bar": "https://example.com/foo-bar.git"}"#;

/// Repository list in non-sorted order.
pub const UNSORTED_REPOS: &str = r#"{
    "dune-grid": "https://gitlab.dune-project.org/core/dune-grid.git",
    "dune-common": "https://gitlab.dune-project.org/core/dune-common.git",
    "dune-geometry": "https://gitlab.dune-project.org/core/dune-geometry.git"
}"#;

/// Not a JSON object of strings.
pub const MALFORMED_REPOS: &str = r#"{"foo": ["not", "a", "url"]}"#;

/// Names the matrix accepts but setup can't turn into secret names.
pub const LOOSE_NAME_REPOS: &str = r#"{
    "dune.foo-bar": "https://example.com/dune.foo-bar.git",
    "foo bar": "https://example.com/foo-bar.git"
}"#;
