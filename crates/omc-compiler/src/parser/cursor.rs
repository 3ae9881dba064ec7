//! Token cursor shared by every grammar sub-parser: skips trivia, reports
//! `(file, line)` locations for diagnostics, and exposes small recovery
//! helpers so one malformed declaration doesn't abort the whole file.

use crate::lexer::{SyntaxKind, Token, token_text};
use crate::source::SourceFile;
use omc_core::SourceLoc;

pub struct Cursor<'s> {
    pub file: &'s SourceFile,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'s> Cursor<'s> {
    pub fn new(file: &'s SourceFile, tokens: Vec<Token>) -> Self {
        let tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        Self { file, tokens, pos: 0 }
    }

    pub fn peek(&self) -> SyntaxKind {
        self.peek_at(0)
    }

    pub fn peek_at(&self, offset: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::Error)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Snapshot/restore the cursor position, for speculative lookahead
    ///.
    pub fn save(&self) -> usize {
        self.pos
    }

    pub fn restore(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn text(&self) -> &'s str {
        match self.tokens.get(self.pos) {
            Some(t) => token_text(&self.file.text, t),
            None => "",
        }
    }

    pub fn loc(&self) -> SourceLoc {
        match self.tokens.get(self.pos) {
            Some(t) => {
                let pos: usize = t.span.start().into();
                SourceLoc::new(self.file.path.clone(), self.file.line_at(pos), self.file.column_at(pos))
            }
            None => SourceLoc::new(self.file.path.clone(), 0, 0),
        }
    }

    pub fn bump(&mut self) -> (SyntaxKind, &'s str) {
        let kind = self.peek();
        let text = self.text();
        self.pos += 1;
        (kind, text)
    }

    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Skips tokens until `kind` is found (consuming it) or the file ends.
    /// Used for error recovery: resynchronize at the next `;` or `}`.
    pub fn recover_until(&mut self, kind: SyntaxKind) {
        while !self.at_end() {
            if self.peek() == kind {
                self.bump();
                return;
            }
            self.bump();
        }
    }
}
