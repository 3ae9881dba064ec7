//! `ModelAggregationSql`: rewrites a table measure's `OM_...`
//! analysis expression into multi-level self-joining SQL over the table's
//! flat accumulator rows.
//!
//! A measure expression mixes accumulator names with calls to
//! `OM_AVG`/`OM_SUM`/`OM_COUNT`/`OM_MIN`/`OM_MAX`/`OM_VAR`/`OM_SD`/`OM_SE`/
//! `OM_CV`. Every top-level `OM_...` call is evaluated at level 1, reading
//! straight off the accumulator table aliased `M1`; a call's own argument
//! skeleton is evaluated at that *same* level, since it is just the
//! per-row expression fed into the aggregate. SQL forbids nesting one
//! aggregate inside another's argument in the same `GROUP BY`, though, so
//! an `OM_...` call found *inside* another call's argument is pulled out
//! into a single joined subquery at level 2 (deduplicated by function and
//! argument) and referenced back as `T2.ex<n>`, joined on `run_id` plus
//! every dimension column. `OM_VAR`/`OM_SD`/`OM_SE`/
//! `OM_CV` are first expanded into the equivalent `OM_SUM`/`OM_AVG`/
//! `OM_COUNT` form (the "push OM_AVG to next level" idiom) before the
//! rewrite runs; this is also the only case the corpus of measure
//! expressions actually nests, so a second level of pushdown is rejected
//! rather than silently mis-rendered.

use std::collections::HashSet;

use omc_core::BuildError;

/// One `OM_...(...)` call found while parsing an expression.
struct Call {
    func: String,
    arg_raw: String,
    /// `Some` when `arg_raw` itself contains further `OM_...` calls - the
    /// parsed sub-expression is rendered as a joined subquery one level
    /// deeper rather than substituted inline.
    nested: Option<Box<Parsed>>,
}

/// An expression with its `OM_...` calls pulled out: `text_template` is the
/// original text with each call replaced by a `{N}` placeholder (N being
/// the call's index into `calls`), so the skeleton's arithmetic/grouping
/// text survives verbatim.
struct Parsed {
    text_template: String,
    calls: Vec<Call>,
}

fn malformed(message: impl Into<String>) -> BuildError {
    BuildError::MalformedAggregation { message: message.into() }
}

/// Rewrites `expr` into a full `SELECT` over `acc_table`, grouping by
/// `run_id` and every name in `dims` at each nesting level. `acc_names` is
/// the set of bare accumulator/attribute names that should be qualified
/// with the current level's table alias when they appear outside an
/// `OM_...` call's own aggregate function.
pub fn rewrite(
    expr: &str,
    acc_table: &str,
    dims: &[String],
    acc_names: &HashSet<String>,
) -> Result<String, BuildError> {
    let expanded = expand_variance_family(expr)?;
    let parsed = parse(&expanded)?;
    if parsed.calls.is_empty() {
        return Err(malformed(format!(
            "measure expression '{expr}' contains no OM_... aggregate call"
        )));
    }
    render_full_select(&parsed, dims, acc_table, acc_names)
}

/// Expands `OM_VAR`/`OM_SD`/`OM_SE`/`OM_CV` into `OM_SUM`/`OM_AVG`/
/// `OM_COUNT` form. Division by `COUNT - 1` is emitted verbatim.
fn expand_variance_family(expr: &str) -> Result<String, BuildError> {
    let mut out = expr.to_string();
    loop {
        let Some((name, pos)) = find_variance_call(&out) else {
            break;
        };
        let open = out[pos..]
            .find('(')
            .map(|i| i + pos)
            .ok_or_else(|| malformed(format!("'{name}' with no argument list in '{expr}'")))?;
        let (arg, after) = extract_balanced(&out, open)?;
        let sq_diff = format!("(({arg} - OM_AVG({arg})) * ({arg} - OM_AVG({arg})))");
        let variance = format!("(OM_SUM({sq_diff})) / (OM_COUNT({arg}) - 1)");
        let replacement = match name.as_str() {
            "OM_VAR" => variance,
            "OM_SD" => format!("SQRT({variance})"),
            "OM_SE" => format!("SQRT({variance}) / SQRT(OM_COUNT({arg}))"),
            "OM_CV" => format!("SQRT({variance}) / OM_AVG({arg})"),
            _ => unreachable!(),
        };
        out = format!("{}{}{}", &out[..pos], replacement, &out[after..]);
    }
    Ok(out)
}

fn find_variance_call(s: &str) -> Option<(String, usize)> {
    ["OM_VAR", "OM_SD", "OM_SE", "OM_CV"]
        .iter()
        .filter_map(|name| s.find(name).map(|pos| (name.to_string(), pos)))
        .min_by_key(|(_, pos)| *pos)
}

/// Parses `expr`, pulling out every `OM_...(...)` call (recursing into each
/// call's argument to detect further nested calls) and leaving everything
/// else as literal skeleton text.
fn parse(expr: &str) -> Result<Parsed, BuildError> {
    let mut template = String::new();
    let mut calls = Vec::new();
    let bytes = expr.as_bytes();
    let mut i = 0;
    while i < expr.len() {
        if expr[i..].starts_with("OM_") {
            let start = i;
            let mut j = i;
            while j < expr.len()
                && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_')
            {
                j += 1;
            }
            let name = expr[start..j].to_string();
            let mut k = j;
            while k < expr.len() && bytes[k] == b' ' {
                k += 1;
            }
            if k < expr.len() && bytes[k] == b'(' {
                let (arg, after) = extract_balanced(expr, k)?;
                let nested_parsed = parse(&arg)?;
                let nested = if nested_parsed.calls.is_empty() {
                    None
                } else {
                    Some(Box::new(nested_parsed))
                };
                let idx = calls.len();
                template.push('{');
                template.push_str(&idx.to_string());
                template.push('}');
                calls.push(Call { func: name, arg_raw: arg, nested });
                i = after;
                continue;
            }
            template.push_str(&name);
            i = j;
            continue;
        }
        // ASCII-only expression language (identifiers, operators, parens);
        // safe to advance byte-by-byte.
        template.push(bytes[i] as char);
        i += 1;
    }
    Ok(Parsed { text_template: template, calls })
}

/// Given `s[open_paren_idx] == '('`, returns the text strictly between the
/// matching pair and the index just past the closing paren.
fn extract_balanced(s: &str, open_paren_idx: usize) -> Result<(String, usize), BuildError> {
    let bytes = s.as_bytes();
    debug_assert_eq!(bytes[open_paren_idx], b'(');
    let mut depth = 0i32;
    let mut i = open_paren_idx;
    loop {
        if i >= s.len() {
            return Err(malformed(format!("unbalanced parentheses in '{s}'")));
        }
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((s[open_paren_idx + 1..i].to_string(), i + 1));
                }
            }
            _ => {}
        }
        i += 1;
    }
}

fn sql_func_name(om_func: &str) -> Result<&'static str, BuildError> {
    match om_func {
        "OM_AVG" => Ok("AVG"),
        "OM_SUM" => Ok("SUM"),
        "OM_COUNT" => Ok("COUNT"),
        "OM_MIN" => Ok("MIN"),
        "OM_MAX" => Ok("MAX"),
        other => Err(malformed(format!("unsupported aggregate function '{other}'"))),
    }
}

/// Qualifies every bare `acc_names` token in `text` with `M<level>.`,
/// leaving operators, literals, and unrelated identifiers untouched.
fn qualify_accumulators(text: &str, level: usize, acc_names: &HashSet<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < text.len() {
        if bytes[i].is_ascii_alphabetic() || bytes[i] == b'_' {
            let start = i;
            while i < text.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            let word = &text[start..i];
            if acc_names.contains(word) {
                out.push_str(&format!("M{level}.{word}"));
            } else {
                out.push_str(word);
            }
        } else {
            out.push(bytes[i] as char);
            i += 1;
        }
    }
    out
}

/// A deduplicated deeper-level aggregate still to be turned into a joined
/// subquery: `(func, qualified argument)` identifies it so that two
/// identical nested calls (as `OM_VAR`'s expansion produces for `OM_AVG`)
/// share one `exN` column instead of two redundant joins.
struct PendingDeeper {
    func: String,
    arg_sql: String,
}

/// Renders a call's own argument when it contains further nested calls
/// (the `OM_VAR`-family case): the argument's skeleton stays at `level`
/// (the owning call's level), but every call found inside it is pushed to
/// `level + 1` and deduplicated into `deeper`.
fn render_argument_with_pushdown(
    inner: &Parsed,
    level: usize,
    acc_names: &HashSet<String>,
    deeper: &mut Vec<PendingDeeper>,
) -> Result<String, BuildError> {
    let mut out = qualify_accumulators(&inner.text_template, level, acc_names);
    for (i, call) in inner.calls.iter().enumerate() {
        if call.nested.is_some() {
            return Err(malformed(format!(
                "aggregation expression nests more than one level of OM_... calls inside '{}'",
                call.arg_raw
            )));
        }
        let arg_sql = qualify_accumulators(&call.arg_raw, level + 1, acc_names);
        let ex_id = match deeper
            .iter()
            .position(|p| p.func == call.func && p.arg_sql == arg_sql)
        {
            Some(pos) => pos + 1,
            None => {
                deeper.push(PendingDeeper { func: call.func.clone(), arg_sql });
                deeper.len()
            }
        };
        out = out.replacen(&format!("{{{i}}}"), &format!("T{}.ex{ex_id}", level + 1), 1);
    }
    Ok(out)
}

/// Renders `parsed` (the whole measure expression) as a complete
/// `SELECT ... FROM <acc_table> M1 [INNER JOIN (...) T2 ...] GROUP BY
/// run_id, <dims>`.
fn render_full_select(
    parsed: &Parsed,
    dims: &[String],
    acc_table: &str,
    acc_names: &HashSet<String>,
) -> Result<String, BuildError> {
    const LEVEL: usize = 1;
    let mut deeper: Vec<PendingDeeper> = Vec::new();

    let mut out = qualify_accumulators(&parsed.text_template, LEVEL, acc_names);
    for (i, call) in parsed.calls.iter().enumerate() {
        let value_expr = match &call.nested {
            Some(inner) => render_argument_with_pushdown(inner, LEVEL, acc_names, &mut deeper)?,
            None => qualify_accumulators(&call.arg_raw, LEVEL, acc_names),
        };
        let agg_sql = format!("{}({value_expr})", sql_func_name(&call.func)?);
        out = out.replacen(&format!("{{{i}}}"), &agg_sql, 1);
    }

    let dim_cols: Vec<String> = dims.iter().map(|d| format!("M{LEVEL}.{d}")).collect();
    let mut sql = format!(
        "SELECT M{LEVEL}.run_id, {dims}, {out} AS ex1 FROM {acc_table} M{LEVEL}",
        dims = dim_cols.join(", "),
    );

    if !deeper.is_empty() {
        let next_level = LEVEL + 1;
        let next_dim_cols: Vec<String> = dims.iter().map(|d| format!("M{next_level}.{d}")).collect();
        let cols: Vec<String> = deeper
            .iter()
            .enumerate()
            .map(|(idx, p)| format!("{}({}) AS ex{}", sql_func_name(&p.func).unwrap_or("SUM"), p.arg_sql, idx + 1))
            .collect();
        let sub_sql = format!(
            "SELECT M{next_level}.run_id, {dims}, {cols} FROM {acc_table} M{next_level} GROUP BY M{next_level}.run_id{group_dims}",
            dims = next_dim_cols.join(", "),
            cols = cols.join(", "),
            group_dims = next_dim_cols.iter().map(|d| format!(", {d}")).collect::<String>(),
        );
        sql.push_str(&format!(" INNER JOIN ({sub_sql}) T{next_level} ON M{LEVEL}.run_id = T{next_level}.run_id"));
        for d in dims {
            sql.push_str(&format!(" AND M{LEVEL}.{d} = T{next_level}.{d}"));
        }
    }

    sql.push_str(&format!(
        " GROUP BY M{LEVEL}.run_id{}",
        dim_cols.iter().map(|d| format!(", {d}")).collect::<String>()
    ));
    Ok(sql)
}

#[cfg(test)]
#[path = "aggregation_tests.rs"]
mod aggregation_tests;
