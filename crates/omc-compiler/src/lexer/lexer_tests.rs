use super::*;

fn kinds(source: &str) -> Vec<SyntaxKind> {
    lex(source).into_iter().map(|t| t.kind).collect()
}

#[test]
fn lexes_entity_declaration_skeleton() {
    let source = "entity Person { bool alive; };";
    let kinds = kinds(source);
    assert!(kinds.contains(&SyntaxKind::KwEntity));
    assert!(kinds.contains(&SyntaxKind::Ident));
    assert!(kinds.contains(&SyntaxKind::KwBool));
    assert!(kinds.contains(&SyntaxKind::Semi));
}

#[test]
fn lexes_arrow_and_double_colon_as_distinct_tokens() {
    let source = "father->alive Person::alive";
    let kinds = kinds(source);
    assert!(kinds.contains(&SyntaxKind::Arrow));
    assert!(kinds.contains(&SyntaxKind::ColonColon));
}

#[test]
fn coalesces_unrecognized_characters_into_garbage() {
    let source = "entity $$$ Person";
    let kinds = kinds(source);
    assert!(kinds.contains(&SyntaxKind::Garbage));
}

#[test]
fn distinguishes_int_and_float_literals() {
    let source = "3 3.14";
    let tokens = lex(source);
    assert_eq!(tokens[0].kind, SyntaxKind::IntLit);
    // token[1] is whitespace
    assert_eq!(tokens[2].kind, SyntaxKind::FloatLit);
}

#[test]
fn token_text_slices_source_without_copy() {
    let source = "entity Person";
    let tokens = lex(source);
    let ident = tokens.iter().find(|t| t.kind == SyntaxKind::Ident).unwrap();
    assert_eq!(token_text(source, ident), "Person");
}

#[test]
fn line_comment_and_block_comment_are_separate_kinds() {
    let source = "// a line comment\n/* a block comment */";
    let kinds = kinds(source);
    assert!(kinds.contains(&SyntaxKind::LineComment));
    assert!(kinds.contains(&SyntaxKind::BlockComment));
}
