//! Generated-C++ source layout: a small buffered writer that tracks
//! indentation and emits `#line` directives so that diagnostics against the
//! generated file point back at the model source that produced each
//! fragment, grounded in this repository's string-accumulating emitter
//! style (`bytecode::emit::typescript::TsEmitter`) but retargeted from
//! "query bytecode layout" to "generated C++ source layout".

use std::path::Path;

use omc_core::SourceLoc;

#[cfg(test)]
#[path = "layout_tests.rs"]
mod layout_tests;

/// Accumulates generated C++ source text line by line.
#[derive(Debug, Default)]
pub struct CppWriter {
    output: String,
    indent: usize,
    /// Tracks the last `#line` emitted so consecutive fragments from the
    /// same model source location don't repeat the directive.
    last_directive: Option<(String, u32)>,
    /// Line number of the *generated* file the next write will land on,
    /// 1-based; used to re-synchronize `#line` after a directive.
    generated_line: u32,
}

impl CppWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
            last_directive: None,
            generated_line: 1,
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Writes one line at the current indentation, with a trailing newline.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(text.as_ref());
        self.output.push('\n');
        self.generated_line += 1;
    }

    pub fn blank(&mut self) {
        self.output.push('\n');
        self.generated_line += 1;
    }

    /// Emits a `#line <line> "<file>"` directive mapping subsequent output
    /// back to `loc`, unless the last directive already points there
    ///.
    pub fn line_directive(&mut self, loc: &SourceLoc) {
        if loc.line == 0 {
            return;
        }
        let file = loc.file.display().to_string();
        let key = (file.clone(), loc.line);
        if self.last_directive.as_ref() == Some(&key) {
            return;
        }
        self.output
            .push_str(&format!("#line {} \"{}\"\n", loc.line, escape_path(&file)));
        self.generated_line += 1;
        self.last_directive = Some(key);
    }

    /// Re-synchronizes `#line` back to the generated file itself, used
    /// after a block of injected source whose own numbering no longer
    /// matters.
    pub fn resync_line_directive(&mut self, generated_file: &Path) {
        self.output.push_str(&format!(
            "#line {} \"{}\"\n",
            self.generated_line + 1,
            escape_path(&generated_file.display().to_string())
        ));
        self.generated_line += 1;
        self.last_directive = None;
    }

    /// An `// injection_description` comment identifying the generating
    /// symbol, emitted immediately before the code it describes.
    pub fn injection_comment(&mut self, description: impl AsRef<str>) {
        self.line(format!("// {}", description.as_ref()));
    }

    pub fn finish(self) -> String {
        self.output
    }
}

fn escape_path(path: &str) -> String {
    path.replace('\\', "\\\\")
}
