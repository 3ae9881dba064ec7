use super::*;

#[test]
fn line_at_finds_containing_line() {
    let f = SourceFile::new("Person.mpp", "line1\nline2\nline3".to_string());
    assert_eq!(f.line_at(0), 1);
    assert_eq!(f.line_at(6), 2);
    assert_eq!(f.line_at(12), 3);
}

#[test]
fn line_text_strips_trailing_newline() {
    let f = SourceFile::new("Person.mpp", "alive : bool;\nage : int;\n".to_string());
    assert_eq!(f.line_text(1), "alive : bool;");
    assert_eq!(f.line_text(2), "age : int;");
}

#[test]
fn column_at_is_offset_within_line() {
    let f = SourceFile::new("Person.mpp", "abc\ndefgh".to_string());
    assert_eq!(f.column_at(4), 0);
    assert_eq!(f.column_at(7), 3);
}

#[test]
fn decode_strips_utf8_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("entity Person { };".as_bytes());
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded, "entity Person { };");
}

#[test]
fn decode_passes_through_plain_utf8() {
    let decoded = decode("entity Person { };".as_bytes()).unwrap();
    assert_eq!(decoded, "entity Person { };");
}

#[test]
fn decode_falls_back_to_windows_1252() {
    // 0x93/0x94 are curly quotes in Windows-1252, invalid as UTF-8 continuation bytes alone.
    let bytes = vec![0x93, b'h', b'i', 0x94];
    let decoded = decode(&bytes).unwrap();
    assert!(decoded.contains('h'));
    assert!(decoded.contains('i'));
}
