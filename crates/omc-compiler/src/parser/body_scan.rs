//! Scans a whole model-source file for embedded C++ member-function
//! bodies: a `Name1 :: Name2 ( params ) {` or `Name2 ( params ) {`
//! prototype immediately followed by a balanced `{ ... }` body. Runs
//! independently of the declarative grammar in [`super::grammar`] - the
//! DSL's event/table declarations only name their callback functions
//! (`event DeathEvent(timeDeathEvent, implementDeathEvent);`); the bodies
//! themselves are ordinary C++ definitions that may appear anywhere in the
//! file, in any order relative to the declaration that names them.
//!
//! The declarative grammar's own top-level loop skips these definitions
//! (`grammar::try_skip_function_definition`) rather than erroring on them;
//! this module is what actually reads what is inside them, for the
//! dependency wiring in `passes::populate_dependencies` and the RNG
//! stream-uniqueness check.

use omc_core::SourceLoc;

use crate::lexer::{self, SyntaxKind, Token, token_text};
use crate::parse_context::is_rng_function;
use crate::source::SourceFile;

/// One RNG stream call found inside a scanned body: `literal` is
/// `None` when the call's argument was not an integer literal, which is
/// always an error once reported through `ParseContext::record_rng_call`.
#[derive(Debug, Clone)]
pub struct ScannedRngCall {
    pub literal: Option<i64>,
    pub loc: SourceLoc,
}

/// One function definition found in the file, with its body already
/// reduced to the identifier and pointer-access sets the middle-end needs.
#[derive(Debug, Clone)]
pub struct ScannedFunction {
    pub qualified_name: String,
    pub params: Vec<String>,
    pub loc: SourceLoc,
    pub identifiers: Vec<String>,
    pub pointers: Vec<(String, String)>,
    pub rng_calls: Vec<ScannedRngCall>,
}

fn text<'s>(file: &'s SourceFile, tok: &Token) -> &'s str {
    token_text(&file.text, tok)
}

fn loc_at(file: &SourceFile, tok: &Token) -> SourceLoc {
    let pos: usize = tok.span.start().into();
    SourceLoc::new(file.path.clone(), file.line_at(pos), file.column_at(pos))
}

/// Scans `file` for every member-function definition. Tokenizes
/// independently of the declarative parser (trivia filtered out, same as
/// [`super::cursor::Cursor`]).
pub fn scan_function_bodies(file: &SourceFile) -> Vec<ScannedFunction> {
    let tokens: Vec<Token> = lexer::lex(&file.text)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect();

    let mut out = Vec::new();
    let mut i = 0usize;
    while i < tokens.len() {
        match try_match_prototype(file, &tokens, i) {
            Some((func, next)) => {
                out.push(func);
                i = next;
            }
            None => i += 1,
        }
    }
    out
}

/// Tries to match a function prototype and its body starting at `start`.
/// Returns the scanned function and the index just past its closing `}`.
fn try_match_prototype(
    file: &SourceFile,
    tokens: &[Token],
    start: usize,
) -> Option<(ScannedFunction, usize)> {
    let mut i = start;
    if tokens.get(i)?.kind != SyntaxKind::Ident {
        return None;
    }
    let first = text(file, &tokens[i]).to_string();
    let loc = loc_at(file, &tokens[i]);
    i += 1;

    let qualified_name = if tokens.get(i).map(|t| t.kind) == Some(SyntaxKind::ColonColon) {
        i += 1;
        let second_tok = tokens.get(i)?;
        if second_tok.kind != SyntaxKind::Ident {
            return None;
        }
        let second = text(file, second_tok).to_string();
        i += 1;
        format!("{first}::{second}")
    } else {
        first
    };

    if tokens.get(i).map(|t| t.kind) != Some(SyntaxKind::LParen) {
        return None;
    }
    i += 1;

    let mut params = Vec::new();
    loop {
        match tokens.get(i)?.kind {
            SyntaxKind::RParen => break,
            SyntaxKind::Ident => params.push(text(file, &tokens[i]).to_string()),
            SyntaxKind::Comma | SyntaxKind::Star | SyntaxKind::Amp => {}
            _ => return None,
        }
        i += 1;
    }
    i += 1; // RParen

    if tokens.get(i).map(|t| t.kind) != Some(SyntaxKind::LBrace) {
        return None;
    }
    let body_start = i + 1;

    let mut depth = 1i32;
    let mut j = body_start;
    while j < tokens.len() && depth > 0 {
        match tokens[j].kind {
            SyntaxKind::LBrace => depth += 1,
            SyntaxKind::RBrace => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        j += 1;
    }
    if depth != 0 {
        return None;
    }
    let body_end = j;

    let (identifiers, pointers, rng_calls) = scan_body(file, &tokens[body_start..body_end]);

    Some((
        ScannedFunction {
            qualified_name,
            params,
            loc,
            identifiers,
            pointers,
            rng_calls,
        },
        body_end + 1,
    ))
}

/// Reduces a function body's token slice to the identifier set, the
/// `link->field` pointer-access pairs, and any RNG stream calls. Duplicates are kept in `identifiers` (callers that only need set
/// membership can dedup); order is first-seen.
fn scan_body(
    file: &SourceFile,
    body: &[Token],
) -> (Vec<String>, Vec<(String, String)>, Vec<ScannedRngCall>) {
    let mut identifiers = Vec::new();
    let mut pointers = Vec::new();
    let mut rng_calls = Vec::new();

    let mut i = 0usize;
    while i < body.len() {
        let tok = &body[i];
        if tok.kind == SyntaxKind::Ident {
            let name = text(file, tok).to_string();
            identifiers.push(name.clone());

            if body.get(i + 1).map(|t| t.kind) == Some(SyntaxKind::Arrow)
                && body.get(i + 2).map(|t| t.kind) == Some(SyntaxKind::Ident)
            {
                let field = text(file, &body[i + 2]).to_string();
                pointers.push((name.clone(), field));
                i += 2;
                continue;
            }

            if is_rng_function(&name) && body.get(i + 1).map(|t| t.kind) == Some(SyntaxKind::LParen)
            {
                let loc = loc_at(file, tok);
                let literal = if body.get(i + 2).map(|t| t.kind) == Some(SyntaxKind::IntLit)
                    && body.get(i + 3).map(|t| t.kind) == Some(SyntaxKind::RParen)
                {
                    text(file, &body[i + 2]).parse::<i64>().ok()
                } else {
                    None
                };
                rng_calls.push(ScannedRngCall { literal, loc });
            }
        }
        i += 1;
    }

    (identifiers, pointers, rng_calls)
}

#[cfg(test)]
#[path = "body_scan_tests.rs"]
mod body_scan_tests;
