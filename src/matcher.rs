//! Option text matching.

/// Compare an option's rendered text against a requested value.
///
/// Both operands are trimmed, then compared for full equality. Substring
/// matches are rejected so "Ireland" never selects "Northern Ireland".
pub fn texts_equal(actual: &str, expected: &str, case_sensitive: bool) -> bool {
    let actual = actual.trim();
    let expected = expected.trim();
    if case_sensitive {
        actual == expected
    } else {
        actual.eq_ignore_ascii_case(expected)
    }
}
