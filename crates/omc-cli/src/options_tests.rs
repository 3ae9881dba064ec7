use super::*;
use clap::Parser;

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["omc"];
    full.extend_from_slice(args);
    Cli::parse_from(full)
}

#[test]
fn resolves_from_cli_flags_alone() {
    let opts = BuildOptions::resolve(&cli(&["--source-dir", "model", "--provider", "sqlite,mysql"])).unwrap();
    assert_eq!(opts.source_dir, PathBuf::from("model"));
    assert_eq!(opts.providers, vec![Provider::Sqlite, Provider::Mysql]);
    assert_eq!(opts.languages, vec!["EN".to_string()]);
    assert_eq!(opts.extensions, vec!["mpp".to_string(), "ompp".to_string()]);
}

#[test]
fn missing_source_dir_is_an_error() {
    let result = BuildOptions::resolve(&cli(&[]));
    assert!(result.is_err());
}

#[test]
fn ini_file_supplies_defaults_cli_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let ini_path = dir.path().join("omc.ini");
    std::fs::write(
        &ini_path,
        "[OpenM]\nInputDir = from_ini\nEventTrace = yes\nLanguages = EN,FR\n",
    )
    .unwrap();

    let opts = BuildOptions::resolve(&cli(&["--ini", ini_path.to_str().unwrap()])).unwrap();
    assert_eq!(opts.source_dir, PathBuf::from("from_ini"));
    assert!(opts.event_trace);
    assert_eq!(opts.languages, vec!["EN".to_string(), "FR".to_string()]);

    let opts = BuildOptions::resolve(&cli(&[
        "--ini",
        ini_path.to_str().unwrap(),
        "--source-dir",
        "from_cli",
    ]))
    .unwrap();
    assert_eq!(opts.source_dir, PathBuf::from("from_cli"));
}

#[test]
fn bool_rule_accepts_documented_spellings() {
    assert!(parse_bool(""));
    assert!(parse_bool("1"));
    assert!(parse_bool("true"));
    assert!(parse_bool("Yes"));
    assert!(!parse_bool("0"));
    assert!(!parse_bool("false"));
    assert!(!parse_bool("no"));
}
