//! Command-line arguments and the INI file they layer over:
//! `OpenM.*`-namespaced keys plus a handful of compiler-specific ones.
//! Booleans follow the documented rule (`1|0|true|false|yes|no`,
//! case-insensitive; a present key with no value is `true`).

use std::path::PathBuf;

use clap::Parser;
use omc_compiler::i18n::IniDocument;
use omc_sql::Provider;

/// The `omc` model compiler: reads model source, emits generated C++, SQL
/// metadata scripts, and a populated SQLite database.
#[derive(Parser, Debug)]
#[command(name = "omc", version, about)]
pub struct Cli {
    /// Directory of model source files.
    #[arg(long = "source-dir", alias = "scenario-dir", value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Directory generated C++/SQL output is written to.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory holding SQL support scripts, including `create_db.sql`.
    #[arg(long = "sql-dir", value_name = "DIR")]
    pub sql_dir: Option<PathBuf>,

    /// Optional INI file layering `OpenM.*` keys under the CLI flags.
    #[arg(long = "ini", value_name = "FILE")]
    pub ini_file: Option<PathBuf>,

    /// Comma-separated SQL provider list (at least one), e.g. `sqlite,mysql`.
    #[arg(long = "provider", value_name = "LIST")]
    pub provider: Option<String>,

    /// Overrides the model name otherwise taken from the source directory.
    #[arg(long = "model-name", value_name = "NAME")]
    pub model_name: Option<String>,

    /// Comma-separated language code list; the first is the default language.
    #[arg(long = "languages", value_name = "LIST")]
    pub languages: Option<String>,

    /// Comma-separated model-source file extensions (default: `mpp,ompp`).
    #[arg(long = "extensions", value_name = "LIST")]
    pub extensions: Option<String>,

    /// Emit structured event-trace cover functions.
    #[arg(long = "event-trace")]
    pub event_trace: bool,

    /// Synthesize `censor_time`.
    #[arg(long = "censor-event-time")]
    pub censor_event_time: bool,

    /// Synthesize `entity_weight` and weighted-tabulation accumulators.
    #[arg(long = "weighted-tabulation")]
    pub weighted_tabulation: bool,

    /// Run the post-emission array-bounds markup pass.
    #[arg(long = "index-errors")]
    pub index_errors: bool,

    /// Increase log verbosity (stacks: `-v`, `-vv`).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Resolved build options: the CLI flags above, merged with whatever an
/// INI file at `--ini` supplied, CLI taking precedence on conflict.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub sql_dir: PathBuf,
    pub providers: Vec<Provider>,
    pub model_name: Option<String>,
    pub languages: Vec<String>,
    pub extensions: Vec<String>,
    pub event_trace: bool,
    pub censor_event_time: bool,
    pub weighted_tabulation: bool,
    pub index_errors: bool,
}

/// Parses the documented boolean rule: `1|0|true|false|yes|no`
/// case-insensitively; a present key with an empty value is `true`.
fn parse_bool(raw: &str) -> bool {
    if raw.is_empty() {
        return true;
    }
    matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

impl BuildOptions {
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let ini = match &cli.ini_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("reading INI file {}: {e}", path.display()))?;
                Some(IniDocument::parse(&text))
            }
            None => None,
        };

        let ini_get = |key: &str| -> Option<String> {
            ini.as_ref()
                .and_then(|doc| doc.sections.get("OpenM"))
                .and_then(|s| s.get(key))
                .cloned()
        };
        let ini_flag = |key: &str| -> bool { ini_get(key).map(|v| parse_bool(&v)).unwrap_or(false) };

        let source_dir = cli
            .source_dir
            .clone()
            .or_else(|| ini_get("InputDir").map(PathBuf::from))
            .ok_or_else(|| anyhow::anyhow!("no source directory given (--source-dir or OpenM.InputDir)"))?;
        let output_dir = cli
            .output_dir
            .clone()
            .or_else(|| ini_get("OutputDir").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let sql_dir = cli
            .sql_dir
            .clone()
            .or_else(|| ini_get("SqlDir").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let provider_raw = cli
            .provider
            .clone()
            .or_else(|| ini_get("Provider"))
            .unwrap_or_else(|| "sqlite".to_string());
        let providers = Provider::parse_list(&provider_raw).map_err(|e| anyhow::anyhow!("{e}"))?;

        let languages_raw = cli
            .languages
            .clone()
            .or_else(|| ini_get("Languages"))
            .unwrap_or_else(|| "EN".to_string());
        let languages: Vec<String> = languages_raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let extensions_raw = cli
            .extensions
            .clone()
            .or_else(|| ini_get("Extensions"))
            .unwrap_or_else(|| "mpp,ompp".to_string());
        let extensions: Vec<String> = extensions_raw
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(BuildOptions {
            source_dir,
            output_dir,
            sql_dir,
            providers,
            model_name: cli.model_name.clone().or_else(|| ini_get("ModelName")),
            languages,
            extensions,
            event_trace: cli.event_trace || ini_flag("EventTrace"),
            censor_event_time: cli.censor_event_time || ini_flag("CensorEventTime"),
            weighted_tabulation: cli.weighted_tabulation || ini_flag("WeightedTabulation"),
            index_errors: cli.index_errors || ini_flag("IndexErrors"),
        })
    }
}

#[cfg(test)]
mod options_tests;
