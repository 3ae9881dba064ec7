use super::*;
use crate::source::SourceFile;
use omc_core::Diagnostics;

fn parse(text: &str) -> (Vec<Decl>, Diagnostics) {
    let file = SourceFile::new("Test.mpp", text.to_string());
    let (decls, _comments, diags) = parse_source(&file);
    (decls, diags)
}

#[test]
fn parses_model_type() {
    let (decls, diags) = parse("model_type case_based;");
    assert!(diags.is_empty());
    match &decls[0] {
        Decl::ModelType(d) => assert!(d.case_based),
        other => panic!("unexpected decl: {other:?}"),
    }
}

#[test]
fn parses_languages_and_options() {
    let (decls, diags) = parse("languages EN, FR;\noptions event_trace = true;");
    assert!(diags.is_empty());
    match &decls[0] {
        Decl::Languages(d) => assert_eq!(d.codes, vec!["EN", "FR"]),
        other => panic!("unexpected decl: {other:?}"),
    }
    match &decls[1] {
        Decl::Options(d) => assert_eq!(d.entries, vec![("event_trace".to_string(), "true".to_string())]),
        other => panic!("unexpected decl: {other:?}"),
    }
}

#[test]
fn parses_classification_range_partition() {
    let (decls, diags) = parse(
        r#"
        classification SEX { MALE, FEMALE };
        range AGE_RANGE = 0, 100;
        partition AGE_GROUP { 18, 65 };
        "#,
    );
    assert!(diags.is_empty());
    assert_eq!(decls.len(), 3);
    match &decls[0] {
        Decl::Classification(d) => {
            assert_eq!(d.name, "SEX");
            assert_eq!(d.enumerators, vec!["MALE", "FEMALE"]);
        }
        other => panic!("unexpected decl: {other:?}"),
    }
    match &decls[1] {
        Decl::Range(d) => {
            assert_eq!(d.lower, 0);
            assert_eq!(d.upper, 100);
        }
        other => panic!("unexpected decl: {other:?}"),
    }
    match &decls[2] {
        Decl::Partition(d) => assert_eq!(d.split_points, vec!["18", "65"]),
        other => panic!("unexpected decl: {other:?}"),
    }
}

#[test]
fn parses_parameter_with_dimensions() {
    let (decls, diags) = parse("parameter MortalityRate double[SEX, AGE_GROUP];");
    assert!(diags.is_empty());
    match &decls[0] {
        Decl::Parameter(d) => {
            assert_eq!(d.name, "MortalityRate");
            assert_eq!(d.type_name, "double");
            assert_eq!(d.dimensions, vec!["SEX", "AGE_GROUP"]);
        }
        other => panic!("unexpected decl: {other:?}"),
    }
}

#[test]
fn parses_entity_with_attributes_event_and_hook() {
    let src = r#"
    entity Person {
        bool alive = true;
        identity int age_group = AGE_GROUP(age);
        duration int time_since_entry;
        link Person spouse;
        event DeathEvent(timeDeathEvent, implementDeathEvent) priority 1;
        hook implementDeathEvent -> FinalizeDeath;
    };
    "#;
    let (decls, diags) = parse(src);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    let entity = match &decls[0] {
        Decl::Entity(e) => e,
        other => panic!("unexpected decl: {other:?}"),
    };
    assert_eq!(entity.name, "Person");
    assert_eq!(entity.members.len(), 5);

    match &entity.members[0] {
        EntityMember::Attribute(a) => {
            assert_eq!(a.name, "alive");
            assert_eq!(a.kind, AttributeDeclKind::Simple);
            assert_eq!(a.expr.as_deref(), Some("true"));
        }
        other => panic!("unexpected member: {other:?}"),
    }
    match &entity.members[1] {
        EntityMember::Attribute(a) => {
            assert_eq!(a.name, "age_group");
            assert_eq!(a.kind, AttributeDeclKind::Identity);
        }
        other => panic!("unexpected member: {other:?}"),
    }
    match &entity.members[2] {
        EntityMember::Attribute(a) => {
            assert!(matches!(&a.kind, AttributeDeclKind::Derived { derived_kind } if derived_kind == "duration"));
        }
        other => panic!("unexpected member: {other:?}"),
    }
    match &entity.members[3] {
        EntityMember::Attribute(a) => {
            assert_eq!(a.kind, AttributeDeclKind::Link);
            assert_eq!(a.type_name, "Person");
            assert_eq!(a.name, "spouse");
        }
        other => panic!("unexpected member: {other:?}"),
    }
    match &entity.members[4] {
        EntityMember::Event(e) => {
            assert_eq!(e.name, "DeathEvent");
            assert_eq!(e.time_fn, "timeDeathEvent");
            assert_eq!(e.implement_fn, "implementDeathEvent");
            assert_eq!(e.priority, 1);
        }
        other => panic!("unexpected member: {other:?}"),
    }
}

#[test]
fn entity_member_list_also_parses_hook_separately() {
    let src = "entity X { hook a -> b; };";
    let (decls, diags) = parse(src);
    assert!(diags.is_empty());
    match &decls[0] {
        Decl::Entity(e) => match &e.members[0] {
            EntityMember::Hook(h) => {
                assert_eq!(h.from_event, "a");
                assert_eq!(h.to_function, "b");
            }
            other => panic!("unexpected member: {other:?}"),
        },
        other => panic!("unexpected decl: {other:?}"),
    }
}

#[test]
fn parses_table_with_dimensions_filter_and_measures() {
    let src = r#"
    table MortalityByAgeSex {
        dimensions(sex, age_group);
        filter(alive);
        measure avg_value = sum(value_in, interval, some_attr);
    };
    "#;
    let (decls, diags) = parse(src);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    match &decls[0] {
        Decl::Table(t) => {
            assert_eq!(t.name, "MortalityByAgeSex");
            assert!(!t.is_derived);
            assert_eq!(t.dimensions.len(), 2);
            assert_eq!(t.filter.as_deref(), Some("alive"));
            assert_eq!(t.measures.len(), 1);
            assert_eq!(t.measures[0].accumulator, "sum");
        }
        other => panic!("unexpected decl: {other:?}"),
    }
}

#[test]
fn parses_derived_table_keyword() {
    let src = "derived_table D { dimensions(sex); };";
    let (decls, diags) = parse(src);
    assert!(diags.is_empty());
    match &decls[0] {
        Decl::Table(t) => assert!(t.is_derived),
        other => panic!("unexpected decl: {other:?}"),
    }
}

#[test]
fn parses_entity_set_with_dimensions_and_filter() {
    let src = "entity_set AliveSet(Person) dimensions(sex) filter(alive);";
    let (decls, diags) = parse(src);
    assert!(diags.is_empty());
    match &decls[0] {
        Decl::EntitySet(e) => {
            assert_eq!(e.name, "AliveSet");
            assert_eq!(e.entity, "Person");
            assert_eq!(e.dimensions.len(), 1);
            assert_eq!(e.filter.as_deref(), Some("alive"));
        }
        other => panic!("unexpected decl: {other:?}"),
    }
}

#[test]
fn entity_set_without_dimensions_or_filter_is_optional() {
    let src = "entity_set All(Person);";
    let (decls, diags) = parse(src);
    assert!(diags.is_empty());
    match &decls[0] {
        Decl::EntitySet(e) => {
            assert!(e.dimensions.is_empty());
            assert!(e.filter.is_none());
        }
        other => panic!("unexpected decl: {other:?}"),
    }
}

#[test]
fn malformed_declaration_recovers_and_keeps_parsing() {
    let src = "parameter ;\nmodel_type case_based;";
    let (decls, diags) = parse(src);
    assert!(diags.has_errors());
    assert_eq!(decls.len(), 1);
    assert!(matches!(decls[0], Decl::ModelType(_)));
}

#[test]
fn collects_line_and_block_comments() {
    let src = "// LABEL(Person.alive, EN) Is alive\nentity Person { bool alive; };";
    let file = SourceFile::new("Test.mpp", src.to_string());
    let (_decls, comments, diags) = parse_source(&file);
    assert!(diags.is_empty());
    let found: Vec<_> = comments.iter().collect();
    assert_eq!(found.len(), 1);
    assert!(found[0].text.contains("LABEL"));
}
