//! Recursive-descent grammar driver. Parses one model-source file
//! into a flat list of top-level declarations. Expression bodies (attribute
//! initializers, event time/implement function text, table filters) are
//! **not** parsed as C++: the grammar captures them as raw text between
//! balanced delimiters and hands them to the C++ emitter unchanged, the
//! same way the parse context gathers whole function bodies verbatim
//! rather than re-deriving a C++ grammar the compiler doesn't need.

use omc_core::{Diagnostics, SourceLoc};

use crate::lexer::{self, CommentTable, SyntaxKind, comments::Comment};
use crate::source::SourceFile;

use super::ast::*;
use super::cursor::Cursor;

/// Derived-attribute qualifier words recognized before a type (soft
/// keywords, since they only matter inside an entity body): duration
/// counters, lagged values, self-scheduling, trigger-based counts.
const DERIVED_KINDS: &[&str] = &[
    "duration",
    "weighted_duration",
    "active_spell_duration",
    "completed_spell_duration",
    "self_scheduling_int",
    "self_scheduling_split",
    "trigger_changes",
    "trigger_entrances",
    "trigger_exits",
    "changes",
    "entrances",
    "exits",
    "value_at_first_entrance",
    "value_at_latest_entrance",
    "max_over",
    "min_over",
    "lagged",
];

/// Parses an entire model-source file. Returns the declarations recognized
/// plus any comments found (for the `//LABEL`/`NAME`/`NOTE` side channel)
/// and accumulated diagnostics. A malformed declaration is skipped (to the
/// next `;`) so the rest of the file is still parsed.
pub fn parse_source(file: &SourceFile) -> (Vec<Decl>, CommentTable, Diagnostics) {
    let raw_tokens = lexer::lex(&file.text);
    let comments = collect_comments(file, &raw_tokens);

    let mut cursor = Cursor::new(file, raw_tokens);
    let mut decls = Vec::new();
    let mut diags = Diagnostics::new();

    while !cursor.at_end() {
        if try_skip_function_definition(&mut cursor) {
            continue;
        }
        match parse_top_level_decl(&mut cursor) {
            Ok(decl) => decls.push(decl),
            Err(msg) => {
                diags.error(cursor.loc(), msg);
                cursor.recover_until(SyntaxKind::Semi);
            }
        }
    }

    (decls, comments, diags)
}

fn collect_comments(file: &SourceFile, tokens: &[lexer::Token]) -> CommentTable {
    let mut table = CommentTable::new();
    for tok in tokens {
        let is_block = match tok.kind {
            SyntaxKind::LineComment => false,
            SyntaxKind::BlockComment => true,
            _ => continue,
        };
        let start: usize = tok.span.start().into();
        let line = file.line_at(start);
        let column = if is_block { file.column_at(start) } else { 0 };
        let text = lexer::token_text(&file.text, tok);
        let text = if is_block {
            text.trim_start_matches("/*").trim_end_matches("*/").to_string()
        } else {
            text.trim_start_matches("//").to_string()
        };
        table.push(Comment {
            loc: SourceLoc::new(file.path.clone(), line, column),
            text,
            is_block,
        });
    }
    table
}

/// Recognizes and skips a top-level C++ member-function definition so the declarative grammar doesn't report it
/// as a syntax error. [`super::body_scan`] is what actually reads what's
/// inside - this only needs to skip past it cleanly. Backtracks and
/// returns `false` if the lookahead doesn't fully match a prototype plus a
/// balanced body, leaving the cursor untouched for the ordinary
/// declaration grammar to try.
fn try_skip_function_definition(c: &mut Cursor) -> bool {
    let checkpoint = c.save();
    if skip_function_definition(c) {
        true
    } else {
        c.restore(checkpoint);
        false
    }
}

fn skip_function_definition(c: &mut Cursor) -> bool {
    if c.peek() != SyntaxKind::Ident {
        return false;
    }
    c.bump();
    if c.peek() == SyntaxKind::ColonColon {
        c.bump();
        if c.peek() != SyntaxKind::Ident {
            return false;
        }
        c.bump();
    }
    if c.peek() != SyntaxKind::LParen {
        return false;
    }
    c.bump();
    let mut depth = 1i32;
    while depth > 0 {
        match c.peek() {
            SyntaxKind::LParen => {
                depth += 1;
                c.bump();
            }
            SyntaxKind::RParen => {
                depth -= 1;
                c.bump();
            }
            SyntaxKind::Error => return false,
            _ => {
                c.bump();
            }
        }
    }
    if c.peek() != SyntaxKind::LBrace {
        return false;
    }
    c.bump();
    let mut brace_depth = 1i32;
    while brace_depth > 0 {
        match c.peek() {
            SyntaxKind::LBrace => {
                brace_depth += 1;
                c.bump();
            }
            SyntaxKind::RBrace => {
                brace_depth -= 1;
                c.bump();
            }
            SyntaxKind::Error => return false,
            _ => {
                c.bump();
            }
        }
    }
    true
}

fn parse_top_level_decl(c: &mut Cursor) -> Result<Decl, String> {
    match c.peek() {
        SyntaxKind::KwModelType => parse_model_type(c).map(Decl::ModelType),
        SyntaxKind::KwLanguages => parse_languages(c).map(Decl::Languages),
        SyntaxKind::KwOptions => parse_options(c).map(Decl::Options),
        SyntaxKind::KwEntity => parse_entity(c).map(Decl::Entity),
        SyntaxKind::KwTable | SyntaxKind::KwDerivedTable => parse_table(c).map(Decl::Table),
        SyntaxKind::KwEntitySet => parse_entity_set(c).map(Decl::EntitySet),
        SyntaxKind::KwParameter | SyntaxKind::KwParameters => {
            parse_parameter(c).map(Decl::Parameter)
        }
        SyntaxKind::KwClassification => parse_classification(c).map(Decl::Classification),
        SyntaxKind::KwRange => parse_range(c).map(Decl::Range),
        SyntaxKind::KwPartition => parse_partition(c).map(Decl::Partition),
        other => Err(format!("unexpected token {other:?} at top level")),
    }
}

fn expect_ident(c: &mut Cursor) -> Result<String, String> {
    if c.peek() == SyntaxKind::Ident {
        Ok(c.bump().1.to_string())
    } else {
        Err(format!("expected identifier, found {:?}", c.peek()))
    }
}

fn expect(c: &mut Cursor, kind: SyntaxKind) -> Result<(), String> {
    if c.eat(kind) {
        Ok(())
    } else {
        Err(format!("expected {kind:?}, found {:?}", c.peek()))
    }
}

/// Type-name tokens: a built-in keyword, or an identifier naming a
/// classification/range/partition/entity/link target.
fn parse_type_name(c: &mut Cursor) -> Result<String, String> {
    match c.peek() {
        SyntaxKind::KwBool
        | SyntaxKind::KwInt
        | SyntaxKind::KwDouble
        | SyntaxKind::KwTime
        | SyntaxKind::KwCounter
        | SyntaxKind::KwReal
        | SyntaxKind::KwString
        | SyntaxKind::KwVoid => Ok(c.bump().1.to_string()),
        SyntaxKind::Ident => Ok(c.bump().1.to_string()),
        other => Err(format!("expected a type name, found {other:?}")),
    }
}

/// Captures the raw text of an expression up to (not including) the
/// terminating `;`, tracking nested `()`/`[]`/`{}` so an embedded call like
/// `AGE_RANGE(age)` is captured whole.
fn capture_expr_text<'s>(c: &mut Cursor<'s>) -> String {
    let mut depth = 0i32;
    let mut parts = Vec::new();
    loop {
        match c.peek() {
            SyntaxKind::Semi if depth == 0 => break,
            SyntaxKind::Error => break,
            SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => {
                depth += 1;
                parts.push(c.bump().1.to_string());
            }
            SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => {
                depth -= 1;
                parts.push(c.bump().1.to_string());
                if depth < 0 {
                    break;
                }
            }
            _ => parts.push(c.bump().1.to_string()),
        }
    }
    parts.join(" ")
}

fn parse_model_type(c: &mut Cursor) -> Result<ModelTypeDecl, String> {
    let loc = c.loc();
    expect(c, SyntaxKind::KwModelType)?;
    let case_based = match c.peek() {
        SyntaxKind::KwCaseBased => {
            c.bump();
            true
        }
        SyntaxKind::KwTimeBased => {
            c.bump();
            false
        }
        other => return Err(format!("expected case_based or time_based, found {other:?}")),
    };
    expect(c, SyntaxKind::Semi)?;
    Ok(ModelTypeDecl { case_based, loc })
}

fn parse_languages(c: &mut Cursor) -> Result<LanguagesDecl, String> {
    let loc = c.loc();
    expect(c, SyntaxKind::KwLanguages)?;
    let mut codes = vec![expect_ident(c)?];
    while c.eat(SyntaxKind::Comma) {
        codes.push(expect_ident(c)?);
    }
    expect(c, SyntaxKind::Semi)?;
    Ok(LanguagesDecl { codes, loc })
}

fn parse_options(c: &mut Cursor) -> Result<OptionsDecl, String> {
    let loc = c.loc();
    expect(c, SyntaxKind::KwOptions)?;
    let mut entries = Vec::new();
    loop {
        let key = expect_ident(c)?;
        expect(c, SyntaxKind::Eq)?;
        let value = match c.peek() {
            SyntaxKind::Ident | SyntaxKind::BoolLit | SyntaxKind::IntLit => c.bump().1.to_string(),
            other => return Err(format!("expected option value, found {other:?}")),
        };
        entries.push((key, value));
        if !c.eat(SyntaxKind::Comma) {
            break;
        }
    }
    expect(c, SyntaxKind::Semi)?;
    Ok(OptionsDecl { entries, loc })
}

fn parse_classification(c: &mut Cursor) -> Result<ClassificationDecl, String> {
    let loc = c.loc();
    expect(c, SyntaxKind::KwClassification)?;
    let name = expect_ident(c)?;
    expect(c, SyntaxKind::LBrace)?;
    let mut enumerators = vec![expect_ident(c)?];
    while c.eat(SyntaxKind::Comma) {
        enumerators.push(expect_ident(c)?);
    }
    expect(c, SyntaxKind::RBrace)?;
    expect(c, SyntaxKind::Semi)?;
    Ok(ClassificationDecl {
        name,
        enumerators,
        loc,
    })
}

fn parse_int_literal(c: &mut Cursor) -> Result<i64, String> {
    if c.peek() != SyntaxKind::IntLit {
        return Err(format!("expected an integer literal, found {:?}", c.peek()));
    }
    let text = c.bump().1;
    text.parse::<i64>()
        .map_err(|_| format!("'{text}' is not a valid integer"))
}

fn parse_range(c: &mut Cursor) -> Result<RangeDecl, String> {
    let loc = c.loc();
    expect(c, SyntaxKind::KwRange)?;
    let name = expect_ident(c)?;
    expect(c, SyntaxKind::Eq)?;
    let lower = parse_int_literal(c)?;
    expect(c, SyntaxKind::Comma)?;
    let upper = parse_int_literal(c)?;
    expect(c, SyntaxKind::Semi)?;
    Ok(RangeDecl {
        name,
        lower,
        upper,
        loc,
    })
}

fn parse_partition(c: &mut Cursor) -> Result<PartitionDecl, String> {
    let loc = c.loc();
    expect(c, SyntaxKind::KwPartition)?;
    let name = expect_ident(c)?;
    expect(c, SyntaxKind::LBrace)?;
    let mut split_points = vec![parse_scalar_literal(c)?];
    while c.eat(SyntaxKind::Comma) {
        split_points.push(parse_scalar_literal(c)?);
    }
    expect(c, SyntaxKind::RBrace)?;
    expect(c, SyntaxKind::Semi)?;
    Ok(PartitionDecl {
        name,
        split_points,
        loc,
    })
}

fn parse_scalar_literal(c: &mut Cursor) -> Result<String, String> {
    match c.peek() {
        SyntaxKind::IntLit | SyntaxKind::FloatLit => Ok(c.bump().1.to_string()),
        other => Err(format!("expected a numeric literal, found {other:?}")),
    }
}

fn parse_parameter(c: &mut Cursor) -> Result<ParameterDecl, String> {
    let loc = c.loc();
    c.bump(); // `parameter` or `parameters`
    let name = expect_ident(c)?;
    let type_name = parse_type_name(c)?;
    let mut dimensions = Vec::new();
    if c.eat(SyntaxKind::LBracket) {
        dimensions.push(expect_ident(c)?);
        while c.eat(SyntaxKind::Comma) {
            dimensions.push(expect_ident(c)?);
        }
        expect(c, SyntaxKind::RBracket)?;
    }
    expect(c, SyntaxKind::Semi)?;
    Ok(ParameterDecl {
        name,
        type_name,
        dimensions,
        loc,
    })
}

fn parse_entity(c: &mut Cursor) -> Result<EntityDecl, String> {
    let loc = c.loc();
    expect(c, SyntaxKind::KwEntity)?;
    let name = expect_ident(c)?;
    expect(c, SyntaxKind::LBrace)?;
    let mut members = Vec::new();
    while c.peek() != SyntaxKind::RBrace && !c.at_end() {
        match parse_entity_member(c) {
            Ok(member) => members.push(member),
            Err(_) => c.recover_until(SyntaxKind::Semi),
        }
    }
    expect(c, SyntaxKind::RBrace)?;
    expect(c, SyntaxKind::Semi)?;
    Ok(EntityDecl { name, members, loc })
}

fn parse_entity_member(c: &mut Cursor) -> Result<EntityMember, String> {
    match c.peek() {
        SyntaxKind::KwEvent => parse_event(c).map(EntityMember::Event),
        SyntaxKind::KwHook => parse_hook(c).map(EntityMember::Hook),
        SyntaxKind::KwLink => parse_link_like(c, AttributeDeclKind::Link).map(EntityMember::Attribute),
        SyntaxKind::KwMultilink => {
            parse_link_like(c, AttributeDeclKind::Multilink).map(EntityMember::Attribute)
        }
        SyntaxKind::Ident if c.text() == "identity" => {
            c.bump();
            parse_attribute_tail(c, AttributeDeclKind::Identity).map(EntityMember::Attribute)
        }
        SyntaxKind::Ident if DERIVED_KINDS.contains(&c.text()) => {
            let derived_kind = c.bump().1.to_string();
            parse_attribute_tail(c, AttributeDeclKind::Derived { derived_kind })
                .map(EntityMember::Attribute)
        }
        _ => parse_attribute_tail(c, AttributeDeclKind::Simple).map(EntityMember::Attribute),
    }
}

fn parse_link_like(c: &mut Cursor, kind: AttributeDeclKind) -> Result<AttributeDecl, String> {
    let loc = c.loc();
    c.bump(); // `link` or `multilink`
    let type_name = expect_ident(c)?;
    let name = expect_ident(c)?;
    expect(c, SyntaxKind::Semi)?;
    Ok(AttributeDecl {
        name,
        type_name,
        kind,
        expr: None,
        loc,
    })
}

fn parse_attribute_tail(c: &mut Cursor, kind: AttributeDeclKind) -> Result<AttributeDecl, String> {
    let loc = c.loc();
    let type_name = parse_type_name(c)?;
    let name = expect_ident(c)?;
    let expr = if c.eat(SyntaxKind::Eq) {
        Some(capture_expr_text(c))
    } else {
        None
    };
    expect(c, SyntaxKind::Semi)?;
    Ok(AttributeDecl {
        name,
        type_name,
        kind,
        expr,
        loc,
    })
}

fn parse_event(c: &mut Cursor) -> Result<EventDecl, String> {
    let loc = c.loc();
    expect(c, SyntaxKind::KwEvent)?;
    let name = expect_ident(c)?;
    expect(c, SyntaxKind::LParen)?;
    let time_fn = expect_ident(c)?;
    expect(c, SyntaxKind::Comma)?;
    let implement_fn = expect_ident(c)?;
    expect(c, SyntaxKind::RParen)?;

    let mut priority = 0i64;
    let mut memory = false;
    loop {
        match c.peek() {
            SyntaxKind::Ident if c.text() == "priority" => {
                c.bump();
                priority = parse_int_literal(c)?;
            }
            SyntaxKind::Ident if c.text() == "memory" => {
                c.bump();
                memory = true;
            }
            _ => break,
        }
    }
    expect(c, SyntaxKind::Semi)?;
    Ok(EventDecl {
        name,
        time_fn,
        implement_fn,
        priority,
        memory,
        loc,
    })
}

fn parse_hook(c: &mut Cursor) -> Result<HookDecl, String> {
    let loc = c.loc();
    expect(c, SyntaxKind::KwHook)?;
    let from_event = expect_ident(c)?;
    expect(c, SyntaxKind::Arrow)?;
    let to_function = expect_ident(c)?;
    expect(c, SyntaxKind::Semi)?;
    Ok(HookDecl {
        from_event,
        to_function,
        loc,
    })
}

fn parse_dimension_list(c: &mut Cursor) -> Result<Vec<DimensionDecl>, String> {
    expect(c, SyntaxKind::KwDimensions)?;
    expect(c, SyntaxKind::LParen)?;
    let mut dims = Vec::new();
    loop {
        let loc = c.loc();
        let attribute_or_enum = expect_ident(c)?;
        dims.push(DimensionDecl {
            attribute_or_enum,
            loc,
        });
        if !c.eat(SyntaxKind::Comma) {
            break;
        }
    }
    expect(c, SyntaxKind::RParen)?;
    Ok(dims)
}

fn parse_filter_clause(c: &mut Cursor) -> Result<Option<String>, String> {
    if c.peek() == SyntaxKind::KwFilter {
        c.bump();
        expect(c, SyntaxKind::LParen)?;
        let name = expect_ident(c)?;
        expect(c, SyntaxKind::RParen)?;
        Ok(Some(name))
    } else {
        Ok(None)
    }
}

fn parse_table(c: &mut Cursor) -> Result<TableDecl, String> {
    let loc = c.loc();
    let is_derived = c.peek() == SyntaxKind::KwDerivedTable;
    c.bump(); // `table` or `derived_table`
    let name = expect_ident(c)?;
    expect(c, SyntaxKind::LBrace)?;

    let dimensions = parse_dimension_list(c)?;
    expect(c, SyntaxKind::Semi)?;

    let filter = parse_filter_clause(c)?;
    if filter.is_some() {
        expect(c, SyntaxKind::Semi)?;
    }

    let mut measures = Vec::new();
    while c.peek() != SyntaxKind::RBrace && !c.at_end() {
        match parse_measure(c) {
            Ok(m) => measures.push(m),
            Err(_) => c.recover_until(SyntaxKind::Semi),
        }
    }
    expect(c, SyntaxKind::RBrace)?;
    expect(c, SyntaxKind::Semi)?;

    Ok(TableDecl {
        name,
        is_derived,
        dimensions,
        measures,
        filter,
        loc,
    })
}

fn parse_measure(c: &mut Cursor) -> Result<MeasureDecl, String> {
    let loc = c.loc();
    if !(c.peek() == SyntaxKind::Ident && c.text() == "measure") {
        return Err(format!("expected 'measure', found {:?}", c.peek()));
    }
    c.bump();
    let name = expect_ident(c)?;
    expect(c, SyntaxKind::Eq)?;
    let accumulator = expect_ident(c)?;
    expect(c, SyntaxKind::LParen)?;
    let increment_kind = expect_ident(c)?;
    expect(c, SyntaxKind::Comma)?;
    let timing = expect_ident(c)?;
    expect(c, SyntaxKind::Comma)?;
    let attribute = expect_ident(c)?;
    expect(c, SyntaxKind::RParen)?;
    expect(c, SyntaxKind::Semi)?;
    Ok(MeasureDecl {
        name,
        accumulator,
        increment_kind,
        timing,
        attribute,
        loc,
    })
}

fn parse_entity_set(c: &mut Cursor) -> Result<EntitySetDecl, String> {
    let loc = c.loc();
    expect(c, SyntaxKind::KwEntitySet)?;
    let name = expect_ident(c)?;
    expect(c, SyntaxKind::LParen)?;
    let entity = expect_ident(c)?;
    expect(c, SyntaxKind::RParen)?;

    let dimensions = if c.peek() == SyntaxKind::KwDimensions {
        parse_dimension_list(c)?
    } else {
        Vec::new()
    };
    let filter = parse_filter_clause(c)?;
    expect(c, SyntaxKind::Semi)?;

    Ok(EntitySetDecl {
        name,
        entity,
        dimensions,
        filter,
        loc,
    })
}
