//! Command-line driver: wires the lexer/parser/symbol-table/post-parse
//! pipeline in `omc-compiler` to the SQL/SQLite emitters in `omc-sql`,
//! per the documented build shape. This crate holds nothing the
//! library crates could own themselves: argument/INI parsing, file
//! discovery, and the one place a `SymbolTable` is turned into the
//! `omc-sql` metadata shape.

mod options;
mod to_meta;

use std::path::{Path, PathBuf};

use clap::Parser;
use omc_compiler::lexer::CommentTable;
use omc_compiler::lexer::comments::collect_translatable_strings;
use omc_compiler::parse_context::ParseContext;
use omc_compiler::parser::{self, ast::Decl};
use omc_compiler::passes::{self, ModelOptions};
use omc_compiler::source::SourceFile;
use omc_compiler::symtab::{SymbolTable, lower::lower};
use omc_compiler::{emit, i18n};
use omc_core::{BuildError, Diagnostics, Interner, LanguageList, ModelType};
use omc_sql::{Provider, metadata, schema, sqlite, views};
use tracing::{debug, error, info, warn};

use options::{BuildOptions, Cli};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(BuildError::EXIT_CODE);
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "omc=info",
        1 => "omc=debug,omc_compiler=debug,omc_sql=debug",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Finds every model-source file under `dir` whose extension (lowercased,
/// no leading dot) is in `extensions`, in a stable (sorted) order so a
/// build is reproducible regardless of the filesystem's own directory
/// iteration order.
fn discover_sources(dir: &Path, extensions: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    visit(dir, extensions, &mut found)?;
    found.sort();
    Ok(found)
}

fn visit(dir: &Path, extensions: &[String], out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir).map_err(|e| anyhow::anyhow!("reading {}: {e}", dir.display()))? {
        let entry = entry.map_err(|e| anyhow::anyhow!("reading {}: {e}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            visit(&path, extensions, out)?;
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if ext.is_some_and(|e| extensions.contains(&e)) {
            out.push(path);
        }
    }
    Ok(())
}

/// Everything extracted from the files' `model_type`/`languages`/`options`
/// declarations: at most one of each is expected across a whole
/// build, the last one seen wins if a model source set contains more than
/// one (mirrors how the grammar accepts the declaration anywhere).
struct ModelSettings {
    model_type: ModelType,
    languages: LanguageList,
    options: ModelOptions,
}

fn bool_entry(entries: &[(String, String)], key: &str) -> bool {
    entries
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.is_empty() || matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Extracts `model_type`/`languages`/`options` declarations from the
/// parsed files, then folds in the CLI/INI option flags. `cli_opts` is consulted for the CLI-facing
/// names the options declaration shares with `--ini`.
fn extract_model_settings(files: &[Vec<Decl>], cli_opts: &BuildOptions) -> ModelSettings {
    let mut model_type = ModelType::CaseBased;
    let mut languages = LanguageList::new(cli_opts.languages.clone());
    let mut option_entries: Vec<(String, String)> = Vec::new();

    for decls in files {
        for decl in decls {
            match decl {
                Decl::ModelType(d) => {
                    model_type = if d.case_based { ModelType::CaseBased } else { ModelType::TimeBased };
                }
                Decl::Languages(d) => {
                    languages = LanguageList::new(d.codes.clone());
                }
                Decl::Options(d) => {
                    option_entries.extend(d.entries.clone());
                }
                _ => {}
            }
        }
    }

    let options = ModelOptions {
        event_trace: cli_opts.event_trace || bool_entry(&option_entries, "event_trace"),
        censor_event_time: cli_opts.censor_event_time || bool_entry(&option_entries, "censor_event_time"),
        weighted_tabulation: cli_opts.weighted_tabulation || bool_entry(&option_entries, "weighted_tabulation"),
    };

    ModelSettings { model_type, languages, options }
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| anyhow::anyhow!("creating {}: {e}", parent.display()))?;
    }
    std::fs::write(path, contents).map_err(|e| anyhow::anyhow!("writing {}: {e}", path.display()))?;
    Ok(())
}

fn provider_suffix(provider: Provider) -> &'static str {
    match provider {
        Provider::Sqlite => "sqlite",
        Provider::Mysql => "mysql",
        Provider::Postgresql => "postgresql",
        Provider::Mssql => "mssql",
        Provider::Oracle => "oracle",
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let opts = BuildOptions::resolve(cli)?;

    let model_name = opts.model_name.clone().unwrap_or_else(|| {
        opts.source_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("model")
            .to_string()
    });

    info!("compiling model '{model_name}' from {}", opts.source_dir.display());

    let paths = discover_sources(&opts.source_dir, &opts.extensions)?;
    if paths.is_empty() {
        anyhow::bail!(
            "no source files with extension(s) {:?} found under {}",
            opts.extensions,
            opts.source_dir.display()
        );
    }

    let mut interner = Interner::new();
    let mut symtab = SymbolTable::new();
    let mut parse_ctx = ParseContext::new();
    let mut comments = CommentTable::new();
    let mut diags = Diagnostics::new();
    let mut all_decls: Vec<Vec<Decl>> = Vec::new();
    let mut translatable_keys: Vec<String> = Vec::new();

    for path in &paths {
        debug!("reading {}", path.display());
        let file = SourceFile::read(path).map_err(anyhow::Error::new)?;

        for func in parser::scan_function_bodies(&file) {
            parse_ctx.record_function_body(&func.qualified_name, func.identifiers.clone(), func.pointers.clone());
            for call in &func.rng_calls {
                if let Err(err) = parse_ctx.record_rng_call(call.literal, call.loc.clone()) {
                    diags.extend({
                        let mut d = Diagnostics::new();
                        d.error(call.loc.clone(), BuildError::from(err).to_string());
                        d
                    });
                }
            }
        }

        let (decls, file_comments, file_diags) = parser::parse_source(&file);
        for comment in file_comments.iter() {
            comments.push(comment.clone());
        }
        translatable_keys.extend(collect_translatable_strings(&file.text));
        diags.extend(file_diags);
        all_decls.push(decls);
    }

    let settings = extract_model_settings(&all_decls, &opts);

    lower(&mut interner, &mut symtab, &all_decls);

    passes::run(
        &mut symtab,
        &mut interner,
        settings.model_type,
        &settings.languages,
        &settings.options,
        &comments,
        &parse_ctx,
        &mut diags,
    );

    for warning in diags.iter().filter(|d| d.severity == omc_core::Severity::Warning) {
        warn!("{warning}");
    }
    if diags.has_errors() {
        for err in diags.iter().filter(|d| d.severity == omc_core::Severity::Error) {
            error!("{err}");
        }
        anyhow::bail!(BuildError::Failed { errors: diags.error_count() });
    }

    let unresolved = symtab.base_placeholders();
    if !unresolved.is_empty() {
        let names: Vec<&str> = unresolved.iter().map(|&n| interner.resolve(n)).collect();
        anyhow::bail!(BuildError::UnresolvedType {
            loc: omc_core::SourceLoc::unknown(),
            symbol: names.join(", "),
        });
    }

    std::fs::create_dir_all(&opts.output_dir)
        .map_err(|e| anyhow::anyhow!("creating {}: {e}", opts.output_dir.display()))?;

    let model_meta = to_meta::build_model_meta(
        &symtab,
        &interner,
        settings.model_type,
        &settings.languages,
        &model_name,
        "1.0",
        &opts.providers,
    );

    let array_infos: Vec<emit::markup::ArrayInfo> = model_meta
        .parameters
        .iter()
        .filter(|p| !p.dimensions.is_empty())
        .map(|p| emit::markup::ArrayInfo {
            name: p.short_name.clone(),
            dims: p.dimensions.iter().map(|d| d.size).collect(),
        })
        .collect();

    let emit_options = emit::EmitOptions {
        event_trace: settings.options.event_trace,
        index_errors: opts.index_errors,
    };
    let entities = emit::emit_entities(&symtab, &interner, &emit_options);
    for entity in &entities {
        let source = if opts.index_errors {
            markup_entity(&entity.source, &array_infos)?
        } else {
            entity.source.clone()
        };
        write_file(&opts.output_dir.join(format!("{}.cpp", entity.entity_name)), &source)?;
    }

    let trace_covers = emit::emit_trace_covers(&symtab, &interner);
    if !trace_covers.is_empty() {
        write_file(&opts.output_dir.join("event_trace.cpp"), &trace_covers)?;
    }

    let needs_sqlite = opts.providers.contains(&Provider::Sqlite);
    let schema_sql = if needs_sqlite {
        let path = opts.sql_dir.join("create_db.sql");
        Some(std::fs::read_to_string(&path).map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?)
    } else {
        None
    };

    for &provider in &opts.providers {
        let suffix = provider_suffix(provider);
        let create_model_sql = metadata::generate_create_model_sql(&model_meta, provider);
        let create_tables_sql = schema::generate_create_tables_sql(&model_meta, provider);
        let drop_tables_sql = schema::generate_drop_tables_sql(&model_meta, provider);
        let optional_views_sql = views::generate_optional_views_sql(&model_meta, provider);
        let drop_views_sql = views::generate_drop_optional_views_sql(&model_meta, provider);

        write_file(
            &opts.output_dir.join(format!("{model_name}_1_create_model_{suffix}.sql")),
            &create_model_sql,
        )?;
        write_file(
            &opts.output_dir.join(format!("{model_name}_2_create_tables_{suffix}.sql")),
            &create_tables_sql,
        )?;
        write_file(&opts.output_dir.join(format!("{model_name}_drop_tables.sql")), &drop_tables_sql)?;
        write_file(
            &opts.output_dir.join(format!("{model_name}_optional_views_{suffix}.sql")),
            &optional_views_sql,
        )?;
        write_file(
            &opts.output_dir.join(format!("{model_name}_drop_optional_views.sql")),
            &drop_views_sql,
        )?;

        if provider == Provider::Sqlite {
            let db_path = opts.output_dir.join(format!("{model_name}.sqlite"));
            info!("building sqlite database {}", db_path.display());
            sqlite::build_database(
                &db_path,
                schema_sql.as_deref().expect("sqlite provider implies schema_sql is loaded"),
                &create_model_sql,
                &create_tables_sql,
            )
            .map_err(anyhow::Error::new)?;
        }
    }

    let ini_path = opts.output_dir.join(format!("{model_name}.message.ini"));
    let old_ini = std::fs::read_to_string(&ini_path).ok();
    let merged_ini = i18n::merge(old_ini.as_deref(), &settings.languages, &translatable_keys);
    write_file(&ini_path, &merged_ini.render())?;

    info!("build complete: {} entit(y/ies), {} table(s), {} parameter(s)", entities.len(), model_meta.tables.len(), model_meta.parameters.len());
    Ok(())
}

/// Runs the markup pass against one generated entity source, with
/// the model's parameters as the array set subject to bounds-check
/// rewriting. Entity data members are plain scalars in this symbol model
/// (no raw fixed-size C++ array fields survive past `symtab::lower`), so
/// only parameters populate `arrays`.
fn markup_entity(source: &str, arrays: &[emit::markup::ArrayInfo]) -> anyhow::Result<String> {
    emit::markup::run(source, arrays).map_err(anyhow::Error::new)
}
