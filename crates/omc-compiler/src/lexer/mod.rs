//! Lexer for the model DSL.
//!
//! The DSL is layered directly over C++: identifiers, literals, and
//! punctuation are shared between the declarative parts (`entity Person
//! { ... }`) and the embedded function bodies the parser gathers verbatim
//!. A single token stream covers both; the parser (not the lexer)
//! decides whether a given stretch of tokens is grammar or an opaque C++
//! chunk.
//!
//! Tokenizing is zero-copy: tokens carry spans, never owned text. The
//! lexer additionally builds a side-table of every comment, from which the
//! `LABEL`/`NAME`/`NOTE` side-channels are extracted.

use logos::Logos;
use rowan::TextRange;
use std::ops::Range;

pub mod comments;

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod lexer_tests;

pub use comments::{CommentTable, NoteTarget, SideChannel};

/// Token and (later, via the parser) node kinds share one enum, following
/// rowan's convention of a single `SyntaxKind` covering both.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // --- punctuation ---
    #[token("{")]
    LBrace = 0,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("*")]
    Star,
    #[token("&")]
    Amp,

    // --- literals ---
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    FloatLit,
    #[regex(r"[0-9]+")]
    IntLit,
    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    StringLit,
    #[token("true")]
    #[token("false")]
    BoolLit,

    // --- declarative keywords ---
    #[token("model_type")]
    KwModelType,
    #[token("case_based")]
    KwCaseBased,
    #[token("time_based")]
    KwTimeBased,
    #[token("languages")]
    KwLanguages,
    #[token("options")]
    KwOptions,
    #[token("entity")]
    KwEntity,
    #[token("event")]
    KwEvent,
    #[token("table")]
    KwTable,
    #[token("entity_set")]
    KwEntitySet,
    #[token("parameter")]
    KwParameter,
    #[token("parameters")]
    KwParameters,
    #[token("classification")]
    KwClassification,
    #[token("range")]
    KwRange,
    #[token("partition")]
    KwPartition,
    #[token("link")]
    KwLink,
    #[token("multilink")]
    KwMultilink,
    #[token("derived_table")]
    KwDerivedTable,
    #[token("dimensions")]
    KwDimensions,
    #[token("filter")]
    KwFilter,
    #[token("hook")]
    KwHook,

    // --- type keywords ---
    #[token("void")]
    KwVoid,
    #[token("bool")]
    KwBool,
    #[token("int")]
    KwInt,
    #[token("double")]
    KwDouble,
    #[token("Time")]
    KwTime,
    #[token("counter")]
    KwCounter,
    #[token("real")]
    KwReal,
    #[token("string")]
    KwString,

    // --- identifier ---
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // --- trivia ---
    #[regex(r"[ \t\r]+")]
    Whitespace,
    #[token("\n")]
    Newline,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    /// Coalesced run of unrecognized characters.
    Garbage,

    // --- node kinds produced by the parser, not the lexer ---
    Root,
    ModelTypeDecl,
    LanguagesDecl,
    OptionsDecl,
    EntityDecl,
    AttributeDecl,
    EventDecl,
    TableDecl,
    DimensionDecl,
    AccumulatorDecl,
    MeasureDecl,
    EntitySetDecl,
    ParameterDecl,
    ClassificationDecl,
    RangeDecl,
    PartitionDecl,
    CppChunk,
    Error,

    #[doc(hidden)]
    __Last,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::Newline
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::KwModelType
                | SyntaxKind::KwCaseBased
                | SyntaxKind::KwTimeBased
                | SyntaxKind::KwLanguages
                | SyntaxKind::KwOptions
                | SyntaxKind::KwEntity
                | SyntaxKind::KwEvent
                | SyntaxKind::KwTable
                | SyntaxKind::KwEntitySet
                | SyntaxKind::KwParameter
                | SyntaxKind::KwParameters
                | SyntaxKind::KwClassification
                | SyntaxKind::KwRange
                | SyntaxKind::KwPartition
                | SyntaxKind::KwLink
                | SyntaxKind::KwMultilink
                | SyntaxKind::KwDerivedTable
                | SyntaxKind::KwDimensions
                | SyntaxKind::KwFilter
                | SyntaxKind::KwHook
                | SyntaxKind::KwVoid
                | SyntaxKind::KwBool
                | SyntaxKind::KwInt
                | SyntaxKind::KwDouble
                | SyntaxKind::KwTime
                | SyntaxKind::KwCounter
                | SyntaxKind::KwReal
                | SyntaxKind::KwString
        )
    }
}

/// Zero-copy token: kind + byte span. Text is sliced from source on demand
/// via [`token_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

fn to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes `source`, coalescing consecutive lexer errors into a single
/// `Garbage` token so malformed input doesn't explode the token count.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = SyntaxKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(SyntaxKind::Garbage, to_text_range(start..end)));
                }
                tokens.push(Token::new(kind, to_text_range(lexer.span())));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        to_text_range(start..source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[std::ops::Range::<usize>::from(token.span)]
}
