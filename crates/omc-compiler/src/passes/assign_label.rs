//! Pass 3, `eAssignLabel`: resolves each symbol's per-language label
//! and note. Priority for a label: an explicit `LABEL(...)` directive for
//! that language, else the nearest preceding `//` comment on the
//! declaration's line, else the symbol's unique name.

use omc_core::{Interner, LanguageList};

use crate::lexer::comments::{CommentTable, DirectiveIndex, NoteTarget};
use crate::symtab::SymbolTable;

pub fn run(symtab: &mut SymbolTable, interner: &mut Interner, comments: &CommentTable, languages: &LanguageList) {
    let directives = comments.side_channels(NoteTarget::Source);
    let index = DirectiveIndex::build(&directives);

    let names = symtab.names();
    for name in names {
        let Some(symbol) = symtab.get(name) else { continue };
        let unique_name = interner.resolve(symbol.meta().name).to_string();
        let loc_line = symbol.meta().loc.line;

        if let Some(short) = index.names.get(&unique_name)
            && let Some(s) = symtab.get_mut(name)
        {
            s.meta_mut().db_name = Some(short.clone());
        }

        for (lang_idx, lang) in languages.iter().enumerate() {
            let explicit = index
                .labels
                .get(&unique_name)
                .and_then(|entries| entries.iter().find(|(l, _)| l == &lang.code))
                .map(|(_, text)| text.clone());
            let label = explicit
                .or_else(|| {
                    comments
                        .trailing_comment_on_line(loc_line)
                        .map(|c| c.text.trim().to_string())
                })
                .unwrap_or_else(|| unique_name.clone());
            if let Some(s) = symtab.get_mut(name) {
                s.meta_mut().set_label(lang_idx, label);
            }
        }

        if let Some(notes) = index.notes.get(&unique_name) {
            for (lang, text, _target) in notes {
                if let Some(lang_idx) = languages.index_of(lang)
                    && let Some(s) = symtab.get_mut(name)
                {
                    s.meta_mut().set_note(lang_idx, text.clone());
                }
            }
        }
    }
}
