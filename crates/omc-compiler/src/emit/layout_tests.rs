use super::*;

#[test]
fn indentation_applies_four_spaces_per_level() {
    let mut w = CppWriter::new();
    w.line("class Foo {");
    w.indent();
    w.line("int x;");
    w.dedent();
    w.line("};");
    assert_eq!(w.finish(), "class Foo {\n    int x;\n};\n");
}

#[test]
fn line_directive_is_not_repeated_for_the_same_location() {
    let mut w = CppWriter::new();
    let loc = SourceLoc::new("Model.mpp", 10, 0);
    w.line_directive(&loc);
    w.line("int x;");
    w.line_directive(&loc);
    w.line("int y;");
    let out = w.finish();
    assert_eq!(out.matches("#line").count(), 1);
}

#[test]
fn line_directive_is_skipped_for_unknown_locations() {
    let mut w = CppWriter::new();
    w.line_directive(&SourceLoc::unknown());
    w.line("int x;");
    assert!(!w.finish().contains("#line"));
}
