//! Markup pass: run after C++ emission, iff `index_errors` is set.
//! Rewrites every array-member reference to wrap each index expression in
//! a runtime bounds-check call.

use omc_core::BuildError;
use regex::{Captures, Regex};

#[cfg(test)]
#[path = "markup_tests.rs"]
mod markup_tests;

/// A parameter or entity array member subject to bounds-check rewriting.
/// `dims` lists each dimension's declared size, outermost first.
#[derive(Debug, Clone)]
pub struct ArrayInfo {
    pub name: String,
    pub dims: Vec<u32>,
}

/// Rewrites every occurrence of each array in `arrays` within `source`.
/// Fails if two `ArrayInfo` entries share a name but disagree on shape
///.
pub fn run(source: &str, arrays: &[ArrayInfo]) -> Result<String, BuildError> {
    check_shapes_agree(arrays)?;

    let mut out = source.to_string();
    for info in arrays {
        if info.dims.is_empty() {
            continue;
        }
        let pattern = build_pattern(&info.name, info.dims.len());
        let re = Regex::new(&pattern).map_err(|e| BuildError::Validation {
            loc: omc_core::SourceLoc::unknown(),
            message: format!("markup pass: invalid generated regex for '{}': {e}", info.name),
        })?;
        out = re.replace_all(&out, |caps: &Captures| rewrite_match(caps, info)).into_owned();
    }
    Ok(out)
}

fn check_shapes_agree(arrays: &[ArrayInfo]) -> Result<(), BuildError> {
    use std::collections::HashMap;
    let mut seen: HashMap<&str, &[u32]> = HashMap::new();
    for info in arrays {
        match seen.get(info.name.as_str()) {
            Some(existing) if *existing != info.dims.as_slice() => {
                return Err(BuildError::Validation {
                    loc: omc_core::SourceLoc::unknown(),
                    message: format!(
                        "markup pass: array member '{}' declared with inconsistent shapes {:?} vs {:?}",
                        info.name, existing, info.dims
                    ),
                });
            }
            _ => {
                seen.insert(&info.name, &info.dims);
            }
        }
    }
    Ok(())
}

fn build_pattern(name: &str, ndims: usize) -> String {
    let mut pattern = format!(r"\b{}\b(\s*)", regex::escape(name));
    for _ in 0..ndims {
        pattern.push_str(r"\[([^\[\]]+)\]");
    }
    pattern
}

fn rewrite_match(caps: &Captures, info: &ArrayInfo) -> String {
    let name = &info.name;
    let mut result = name.clone();
    for (ordinal, size) in info.dims.iter().enumerate() {
        let Some(expr) = caps.get(ordinal + 2) else { continue };
        result.push_str(&format!(
            "[om_check_index({expr},{size},{ordinal},\"{name}\",__FILE__,__LINE__)]",
            expr = expr.as_str().trim(),
        ));
    }
    result
}
