use super::*;

#[test]
fn parses_label_directive() {
    let directives = parse_directives("LABEL(Person.alive, EN) Is the person alive", NoteTarget::Source);
    assert_eq!(
        directives,
        vec![SideChannel::Label {
            symbol: "Person::alive".to_string(),
            lang: "EN".to_string(),
            text: "Is the person alive".to_string(),
        }]
    );
}

#[test]
fn parses_name_directive() {
    let directives = parse_directives("NAME(LongParameterName) ShortName", NoteTarget::Source);
    assert_eq!(
        directives,
        vec![SideChannel::Name {
            symbol: "LongParameterName".to_string(),
            short_name: "ShortName".to_string(),
        }]
    );
}

#[test]
fn parses_note_directive_routed_by_target() {
    let directives = parse_directives("NOTE(Person.age, FR) Un texte explicatif", NoteTarget::Input);
    assert_eq!(
        directives,
        vec![SideChannel::Note {
            symbol: "Person::age".to_string(),
            lang: "FR".to_string(),
            text: "Un texte explicatif".to_string(),
            target: NoteTarget::Input,
        }]
    );
}

#[test]
fn block_comment_with_multiple_note_lines() {
    let text = "NOTE(Person.age, EN) First line\n * NOTE(Person.age, FR) Deuxieme ligne";
    let directives = parse_directives(text, NoteTarget::Source);
    assert_eq!(directives.len(), 2);
}

#[test]
fn ignores_plain_comments_without_directives() {
    let directives = parse_directives("just a regular comment", NoteTarget::Source);
    assert!(directives.is_empty());
}

#[test]
fn trailing_comment_on_line_finds_line_comment_only() {
    let mut table = CommentTable::new();
    table.push(Comment {
        loc: SourceLoc::new("Person.mpp", 5, 0),
        text: " alive flag".to_string(),
        is_block: false,
    });
    table.push(Comment {
        loc: SourceLoc::new("Person.mpp", 5, 10),
        text: " a block comment".to_string(),
        is_block: true,
    });
    let found = table.trailing_comment_on_line(5).unwrap();
    assert!(!found.is_block);
}

#[test]
fn collect_translatable_strings_extracts_lt_calls() {
    let source = r#"string s = LT("Hello world"); auto t = LT("Second message");"#;
    let strings = collect_translatable_strings(source);
    assert_eq!(strings, vec!["Hello world", "Second message"]);
}

#[test]
fn collect_translatable_strings_handles_escaped_quotes() {
    let source = r#"LT("He said \"hi\"")"#;
    let strings = collect_translatable_strings(source);
    assert_eq!(strings, vec![r#"He said "hi""#]);
}

#[test]
fn directive_index_groups_labels_by_symbol() {
    let directives = vec![
        SideChannel::Label {
            symbol: "Person::alive".to_string(),
            lang: "EN".to_string(),
            text: "Alive".to_string(),
        },
        SideChannel::Label {
            symbol: "Person::alive".to_string(),
            lang: "FR".to_string(),
            text: "Vivant".to_string(),
        },
    ];
    let index = DirectiveIndex::build(&directives);
    assert_eq!(index.labels["Person::alive"].len(), 2);
}

#[test]
fn bundled_runtime_header_is_recognized_by_path() {
    assert!(is_bundled_runtime_header(std::path::Path::new("/opt/openmpp/include/om_types0.h")));
    assert!(!is_bundled_runtime_header(std::path::Path::new("model/Person.mpp")));
}
