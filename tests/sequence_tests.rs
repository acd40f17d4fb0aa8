//! Tests for ordered-sequence equality and its localized diagnostics.

use nbcheck::{
    AnswerChecker, CheckFailure, CompareOptions, MapNamespace,
    config::{CheckerConfig, DEFAULT_SEQUENCE_THRESHOLD},
    grade::{assert_list_equality, sequence::first_divergence},
    value::Value,
};

fn ints(range: std::ops::Range<i64>) -> Vec<Value> {
    range.map(Value::Int).collect()
}

fn with_change(mut items: Vec<Value>, index: usize, value: i64) -> Vec<Value> {
    items[index] = Value::Int(value);
    items
}

#[test]
fn different_lengths_fail_before_comparing_elements() {
    let found = vec![Value::Int(9), Value::Int(9), Value::Int(9)];
    let expected = ints(0..5);

    let err = assert_list_equality(&found, &expected, "xs", DEFAULT_SEQUENCE_THRESHOLD)
        .unwrap_err();
    assert_eq!(
        err,
        CheckFailure::LengthMismatch {
            name:     "xs".to_string(),
            found:    3,
            expected: 5,
        }
    );
    assert_eq!(
        err.to_string(),
        "ISSUE FOUND: Your list variable xs has a length of 3 but should have a length of 5.\n"
    );
}

#[test]
fn short_sequences_print_both_in_full() {
    let expected = ints(0..10);
    let found = with_change(expected.clone(), 4, 99);

    let err = assert_list_equality(&found, &expected, "xs", DEFAULT_SEQUENCE_THRESHOLD)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "ISSUE FOUND: The value of your list variable xs does not match the expected \
         value.\n\nYours:\n\n     [0, 1, 2, 3, 99, 5, 6, 7, 8, 9]\n\nExpected:\n\n     [0, 1, \
         2, 3, 4, 5, 6, 7, 8, 9]\n"
    );
}

#[test]
fn long_sequences_report_only_the_first_divergence() {
    let expected = ints(0..30);
    let found = with_change(expected.clone(), 17, 99);

    let err = assert_list_equality(&found, &expected, "xs", DEFAULT_SEQUENCE_THRESHOLD)
        .unwrap_err();
    assert_eq!(
        err,
        CheckFailure::ElementMismatch {
            name:     "xs".to_string(),
            index:    17,
            found:    "99".to_string(),
            expected: "17".to_string(),
        }
    );

    let text = err.to_string();
    assert_eq!(
        text,
        "ISSUE FOUND: The value of your list variable xs is not equal to what we expect.\nThe \
         first incorrect value in your list occurred at index 17, that is, at \
         xs[17].\n\nYours:\n\n     99\n\nExpected:\n\n     17\n"
    );
    assert!(!text.contains("[0,"));
}

#[test]
fn long_equal_sequences_pass() {
    let expected = ints(0..30);
    assert!(assert_list_equality(&expected.clone(), &expected, "xs", 25).is_ok());
}

#[test]
fn scan_reports_the_lowest_differing_index() {
    let expected = ints(0..40);
    let found = with_change(with_change(expected.clone(), 33, -1), 12, -1);

    assert_eq!(first_divergence(&found, &expected), Some(12));
    let err = assert_list_equality(&found, &expected, "xs", 25).unwrap_err();
    assert!(matches!(err, CheckFailure::ElementMismatch { index: 12, .. }));
}

#[test]
fn threshold_boundary_switches_to_localized_report() {
    let below = ints(0..24);
    let err = assert_list_equality(&with_change(below.clone(), 0, 5), &below, "xs", 25)
        .unwrap_err();
    assert!(matches!(err, CheckFailure::ListMismatch { .. }));

    let at = ints(0..25);
    let err =
        assert_list_equality(&with_change(at.clone(), 0, 5), &at, "xs", 25).unwrap_err();
    assert!(matches!(err, CheckFailure::ElementMismatch { index: 0, .. }));
}

#[test]
fn localized_elements_are_printed_as_values() {
    let expected: Vec<Value> = (0..30).map(|i| Value::from(format!("w{i}"))).collect();
    let mut found = expected.clone();
    found[3] = Value::from("oops");

    let err = assert_list_equality(&found, &expected, "words", 25).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("Yours:\n\n     oops\n"));
    assert!(text.contains("Expected:\n\n     w3\n"));
}

#[test]
fn short_lists_compare_numbers_across_kinds() {
    let found = vec![Value::Float(1.0), Value::Int(2)];
    let expected = vec![Value::Int(1), Value::Float(2.0)];
    assert!(assert_list_equality(&found, &expected, "xs", 25).is_ok());
}

#[test]
fn checker_uses_the_configured_threshold() {
    let expected = ints(0..10);
    let found = with_change(expected.clone(), 6, 0);
    let student = MapNamespace::new().with("xs", Value::List(found));
    let solution = MapNamespace::new().with("xs", Value::List(expected));

    let checker = AnswerChecker::new()
        .with_config(CheckerConfig::default().with_sequence_threshold(5));
    let err = checker
        .check_answer(&student, &solution, "xs", &CompareOptions::default())
        .unwrap_err();
    assert!(matches!(err, CheckFailure::ElementMismatch { index: 6, .. }));

    let err = AnswerChecker::new()
        .check_answer(&student, &solution, "xs", &CompareOptions::default())
        .unwrap_err();
    assert!(matches!(err, CheckFailure::ListMismatch { .. }));
}
