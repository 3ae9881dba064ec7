use super::*;

fn file(text: &str) -> SourceFile {
    SourceFile::new("model.mpp", text.to_string())
}

#[test]
fn scans_unqualified_function_body() {
    let f = file("bool timeDeathEvent() { return alive && events > 0; }");
    let funcs = scan_function_bodies(&f);
    assert_eq!(funcs.len(), 1);
    assert_eq!(funcs[0].qualified_name, "timeDeathEvent");
    assert!(funcs[0].identifiers.contains(&"alive".to_string()));
    assert!(funcs[0].identifiers.contains(&"events".to_string()));
}

#[test]
fn scans_qualified_function_body_and_pointer_access() {
    let f = file("void Person::implementDeathEvent() { spouse->alive = false; }");
    let funcs = scan_function_bodies(&f);
    assert_eq!(funcs.len(), 1);
    assert_eq!(funcs[0].qualified_name, "Person::implementDeathEvent");
    assert_eq!(funcs[0].pointers, vec![("spouse".to_string(), "alive".to_string())]);
}

#[test]
fn finds_multiple_definitions_in_one_file() {
    let f = file(
        "Time timeA() { return age; }\nvoid implementA() { alive = false; }\n",
    );
    let funcs = scan_function_bodies(&f);
    assert_eq!(funcs.len(), 2);
    assert_eq!(funcs[0].qualified_name, "timeA");
    assert_eq!(funcs[1].qualified_name, "implementA");
}

#[test]
fn records_literal_rng_stream_call() {
    let f = file("double Draw() { return RandUniform(7); }");
    let funcs = scan_function_bodies(&f);
    assert_eq!(funcs[0].rng_calls.len(), 1);
    assert_eq!(funcs[0].rng_calls[0].literal, Some(7));
}

#[test]
fn records_non_literal_rng_stream_call_as_none() {
    let f = file("double Draw() { return RandUniform(stream_number); }");
    let funcs = scan_function_bodies(&f);
    assert_eq!(funcs[0].rng_calls.len(), 1);
    assert_eq!(funcs[0].rng_calls[0].literal, None);
}

#[test]
fn ignores_text_with_no_function_definition() {
    let f = file("entity Person { bool alive = true; };");
    let funcs = scan_function_bodies(&f);
    assert!(funcs.is_empty());
}
