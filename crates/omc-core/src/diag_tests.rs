use super::*;

#[test]
fn collects_errors_and_warnings_independently() {
    let mut diags = Diagnostics::new();
    diags.error(SourceLoc::new("Person.mpp", 10, 0), "unexpected token");
    diags.warning(SourceLoc::new("Person.mpp", 12, 0), "unused attribute");

    assert_eq!(diags.error_count(), 1);
    assert_eq!(diags.warning_count(), 1);
    assert!(diags.has_errors());
}

#[test]
fn empty_diagnostics_has_no_errors() {
    let diags = Diagnostics::new();
    assert!(diags.is_empty());
    assert!(!diags.has_errors());
}

#[test]
fn extend_merges_two_collections() {
    let mut a = Diagnostics::new();
    a.error(SourceLoc::unknown(), "a");
    let mut b = Diagnostics::new();
    b.error(SourceLoc::unknown(), "b");
    a.extend(b);
    assert_eq!(a.error_count(), 2);
}

#[test]
fn display_includes_location_and_severity() {
    let mut diags = Diagnostics::new();
    diags.error(SourceLoc::new("Person.mpp", 7, 3), "bad token");
    let rendered = diags.iter().next().unwrap().to_string();
    assert!(rendered.contains("Person.mpp:7:3"));
    assert!(rendered.contains("error"));
    assert!(rendered.contains("bad token"));
}

#[test]
fn diagnostic_serializes_to_json_for_machine_readers() {
    let mut diags = Diagnostics::new();
    diags.warning(SourceLoc::new("Person.mpp", 1, 2), "duplicate short name");
    let diag = diags.iter().next().unwrap();
    let json = serde_json::to_value(diag).unwrap();
    assert_eq!(json["severity"], "Warning");
    assert_eq!(json["loc"]["line"], 1);
    assert_eq!(json["message"], "duplicate short name");
}

#[test]
fn duplicate_rng_stream_error_names_both_locations() {
    let err = BuildError::DuplicateRngStream {
        stream: 3,
        first: SourceLoc::new("Person.mpp", 5, 0),
        second: SourceLoc::new("Person.mpp", 20, 0),
    };
    let rendered = err.to_string();
    assert!(rendered.contains("Person.mpp:5:0"));
    assert!(rendered.contains("Person.mpp:20:0"));
}
