use super::*;
use indoc::indoc;
use omc_compiler::parse_context::ParseContext;
use omc_compiler::parser::parse_source;
use omc_compiler::passes::{self, ModelOptions};
use omc_compiler::source::SourceFile;
use omc_compiler::symtab::lower::lower;
use omc_core::{Diagnostics, LanguageList, ModelType};

fn build(text: &str) -> (Interner, SymbolTable) {
    let file = SourceFile::new("Test.mpp", text.to_string());
    let (decls, comments, parse_diags) = parse_source(&file);
    assert!(parse_diags.is_empty(), "unexpected parse errors: {parse_diags:?}");

    let mut interner = Interner::new();
    let mut symtab = SymbolTable::new();
    lower(&mut interner, &mut symtab, &[decls]);

    let languages = LanguageList::new(["EN".to_string()]);
    let options = ModelOptions::default();
    let parse_ctx = ParseContext::new();
    let mut diags = Diagnostics::new();
    passes::run(
        &mut symtab,
        &mut interner,
        ModelType::CaseBased,
        &languages,
        &options,
        &comments,
        &parse_ctx,
        &mut diags,
    );
    assert!(!diags.has_errors(), "unexpected resolution errors: {diags:?}");
    (interner, symtab)
}

#[test]
fn converts_classification_and_table() {
    let (interner, symtab) = build(indoc! {"
        classification SEX { MALE, FEMALE };

        entity Person {
            SEX sex;
        };

        table T {
            dimensions(sex);
            measure n = OM_COUNT();
        };
    "});
    let languages = LanguageList::new(["EN".to_string()]);
    let meta = build_model_meta(
        &symtab,
        &interner,
        ModelType::CaseBased,
        &languages,
        "Test",
        "1.0",
        &[Provider::Sqlite],
    );

    assert_eq!(meta.name, "Test");
    assert!(meta.types.iter().any(|t| t.name == "SEX"));
    assert_eq!(meta.tables.len(), 1);
    assert_eq!(meta.tables[0].name, "T");
    assert_eq!(meta.tables[0].dimensions.len(), 1);
    assert_eq!(meta.tables[0].dimensions[0].short_name, "sex");
    assert_eq!(meta.tables[0].measures.len(), 1);
}

#[test]
fn converts_ranked_parameter() {
    let (interner, symtab) = build(indoc! {"
        classification SEX { MALE, FEMALE };

        parameter Factor double[SEX];
    "});
    let languages = LanguageList::new(["EN".to_string()]);
    let meta = build_model_meta(
        &symtab,
        &interner,
        ModelType::CaseBased,
        &languages,
        "Test",
        "1.0",
        &[Provider::Sqlite],
    );

    let param = meta.parameters.iter().find(|p| p.name == "Factor").expect("Factor parameter");
    assert_eq!(param.dimensions.len(), 1);
    assert_eq!(param.dimensions[0].short_name, "SEX");
    assert_eq!(param.dimensions[0].size, 2);
}

#[test]
fn colliding_dimension_names_are_suffixed_and_unique() {
    // §8 S4: two dimensions that sanitize to the same short name keep the
    // first unchanged and suffix the second, case-insensitively.
    let mut dims = vec![
        DimensionMeta { short_name: "Age".to_string(), type_name: "AGE_GROUP".to_string(), size: 3 },
        DimensionMeta { short_name: "AGE".to_string(), type_name: "AGE_GROUP2".to_string(), size: 2 },
    ];
    assign_dimension_names(&mut dims, &[Provider::Sqlite], "T");
    assert_eq!(dims[0].short_name, "Age");
    assert_eq!(dims[1].short_name, "AGE1");
}

#[test]
fn reserved_word_dimension_names_are_renamed_before_uniquing() {
    let mut dims = vec![DimensionMeta {
        short_name: "select".to_string(),
        type_name: "WHATEVER".to_string(),
        size: 2,
    }];
    assign_dimension_names(&mut dims, &[Provider::Sqlite], "T");
    assert_eq!(dims[0].short_name, "select_dim");
}
