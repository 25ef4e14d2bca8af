use super::codes::{self, ALL, E0206_OPERAND_TYPE_MISMATCH, W0200_SHADOWED_DECLARATION};
use super::*;
use std::collections::HashSet;

fn sample_error() -> Diagnostic {
    Diagnostic::error(
        &E0206_OPERAND_TYPE_MISMATCH,
        Label::new(Span::new(0, 3), "Expected `int`, but found `str`"),
    )
}

#[test]
fn test_diagnostic_builder() {
    let diag = sample_error()
        .with_dynamic_message("Operator `+` cannot be applied to `str`")
        .with_secondary_label(Label::new(Span::new(0, 7), "in this `+` expression"))
        .with_note("convert the operand first");

    assert_eq!(diag.code(), "E0206");
    assert_eq!(diag.level(), DiagnosticLevel::Error);
    assert_eq!(diag.message(), "Operator `+` cannot be applied to `str`");
    assert_eq!(diag.labels().len(), 2);
    assert_eq!(diag.primary_span(), Span::new(0, 3));
    assert_eq!(diag.notes(), &["convert the operand first".to_string()]);
}

#[test]
fn test_default_message_comes_from_code() {
    assert_eq!(sample_error().message(), E0206_OPERAND_TYPE_MISMATCH.message);
}

#[test]
#[should_panic(expected = "non-error code")]
fn test_error_constructor_rejects_warning_codes() {
    Diagnostic::error(&W0200_SHADOWED_DECLARATION, Label::new(Span::default(), ""));
}

#[test]
#[should_panic(expected = "non-warning code")]
fn test_warning_constructor_rejects_error_codes() {
    Diagnostic::warning(&E0206_OPERAND_TYPE_MISMATCH, Label::new(Span::default(), ""));
}

#[test]
fn test_bag_counts_errors_and_warnings() {
    let mut bag = DiagnosticBag::new("x + 1");
    assert!(bag.is_empty());
    assert!(!bag.has_errors());

    bag.report(Diagnostic::warning(
        &W0200_SHADOWED_DECLARATION,
        Label::new(Span::new(0, 1), "shadowed"),
    ));
    assert!(!bag.has_errors());

    bag.report(sample_error());
    assert!(bag.has_errors());
    assert_eq!(bag.len(), 2);
    assert_eq!(bag.error_count(), 1);
    assert_eq!(bag.iter().map(Diagnostic::code).collect::<Vec<_>>(), vec!["W0200", "E0206"]);
}

#[test]
fn test_print_drains_the_bag() {
    let mut bag = DiagnosticBag::new(r#""a" + 5"#);
    bag.report(sample_error());
    bag.print("test.tc").unwrap();
    assert!(bag.is_empty());
}

#[test]
fn test_codes_are_unique_and_well_formed() {
    let mut seen = HashSet::new();
    for code in ALL {
        assert!(seen.insert(code.code), "duplicate code {}", code.code);
        assert_eq!(code.code.len(), 5);
        let expected_level = if code.code.starts_with('W') {
            DiagnosticLevel::Warning
        } else {
            DiagnosticLevel::Error
        };
        assert_eq!(code.level, expected_level, "{}", code.code);
        assert!(!code.explanation.is_empty());
    }
}

#[test]
fn test_lookup_is_case_insensitive() {
    assert_eq!(codes::lookup("e0206").map(|c| c.code), Some("E0206"));
    assert_eq!(codes::lookup("W0200").map(|c| c.code), Some("W0200"));
    assert!(codes::lookup("E9999").is_none());
}
