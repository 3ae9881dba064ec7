//! Model-source file reading: UTF-8 with optional BOM, or another encoding
//! converted at read time.

use std::path::{Path, PathBuf};

use omc_core::BuildError;

#[cfg(test)]
#[path = "source_tests.rs"]
mod source_tests;

/// A single model-source file, decoded to UTF-8 and split into lines so
/// that `(file, line)` diagnostics and label/note side-channel lookups can
/// slice text in O(1).
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: String) -> Self {
        let line_starts = compute_line_starts(&text);
        Self {
            path: path.into(),
            text,
            line_starts,
        }
    }

    /// Reads `path`, stripping a UTF-8 BOM if present, or transcoding from
    /// another encoding if the bytes are not valid UTF-8.
    pub fn read(path: &Path) -> Result<Self, BuildError> {
        let bytes = std::fs::read(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = decode(&bytes).ok_or_else(|| BuildError::InvalidUtf8 {
            path: path.to_path_buf(),
        })?;
        Ok(Self::new(path, text))
    }

    /// 1-based line number containing byte offset `pos`.
    pub fn line_at(&self, pos: usize) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(idx) => idx as u32 + 1,
            Err(idx) => idx as u32,
        }
    }

    /// 0-based column of byte offset `pos` within its line.
    pub fn column_at(&self, pos: usize) -> u32 {
        let line = self.line_at(pos) as usize;
        let line_start = self.line_starts[line - 1];
        (pos - line_start) as u32
    }

    /// Text of the 1-based line `line_no`, without its trailing newline.
    pub fn line_text(&self, line_no: u32) -> &str {
        let idx = line_no as usize - 1;
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(self.text.len());
        self.text[start..end].trim_end_matches(['\n', '\r'])
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// Strips a UTF-8 BOM, or decodes the bytes as UTF-8; if that fails, falls
/// back to Windows-1252 (the common legacy encoding for openM++ model
/// source predating UTF-8 adoption) via a lossless transcode.
fn decode(bytes: &[u8]) -> Option<String> {
    let without_bom = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    if let Ok(s) = std::str::from_utf8(without_bom) {
        return Some(s.to_owned());
    }
    let (decoded, _encoding, had_errors) = encoding_rs::WINDOWS_1252.decode(without_bom);
    if had_errors {
        None
    } else {
        Some(decoded.into_owned())
    }
}
