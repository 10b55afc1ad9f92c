//! Assertion utilities for testing.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that two matrices with missing cells are equal cell by cell.
///
/// Missing cells must line up exactly; present cells are compared with
/// [`assert_approx_eq`].
pub fn assert_matrix_approx_eq(actual: &[Vec<Option<f64>>], expected: &[Vec<Option<f64>>]) {
    assert_eq!(actual.len(), expected.len(), "row count differs");

    for (r, (a_row, e_row)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(a_row.len(), e_row.len(), "column count differs in row {}", r);
        for (c, (a, e)) in a_row.iter().zip(e_row).enumerate() {
            match (a, e) {
                (Some(a), Some(e)) => assert_approx_eq(*a, *e, None),
                (None, None) => {}
                _ => panic!("cell ({}, {}) differs: actual = {:?}, expected = {:?}", r, c, a, e),
            }
        }
    }
}

/// Assert that `haystack` contains every needle, reporting the first miss.
pub fn assert_contains_all(haystack: &str, needles: &[&str]) {
    for needle in needles {
        assert!(
            haystack.contains(needle),
            "expected to find {:?} in output",
            needle
        );
    }
}
