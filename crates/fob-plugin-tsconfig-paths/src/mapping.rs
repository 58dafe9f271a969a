//! Compilation of `compilerOptions.paths` into ordered matching rules.
//!
//! Compilation never fails. Patterns and targets that cannot be used are
//! dropped and reported as [`Rejection`]s, so one malformed alias never
//! disables the valid ones.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{PathsError, Result};
use crate::logging::LogLevel;
use crate::pattern::{
    WILDCARD, count_wildcards, has_valid_wildcard, is_pattern_match, is_type_only_target,
};

/// Pattern → ordered substitution targets, in declaration order.
pub type RawMapping = IndexMap<String, Vec<String>>;

/// A validated `paths` entry ready for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledRule {
    /// The pattern as written in the config
    pub pattern: String,
    /// Whether the pattern contains a wildcard
    pub is_wildcard: bool,
    /// Literal text before the wildcard
    pub prefix: String,
    /// Literal text after the wildcard
    pub suffix: String,
    /// Surviving targets in retry order; never empty
    pub targets: Vec<String>,
}

impl CompiledRule {
    /// The part of `request` covered by the wildcard, or `None` when this
    /// rule does not match `request`.
    ///
    /// Exact rules capture the empty string.
    pub fn capture<'a>(&self, request: &'a str) -> Option<&'a str> {
        if !self.is_wildcard {
            return (request == self.pattern).then_some("");
        }
        if !is_pattern_match(&self.prefix, &self.suffix, request) {
            return None;
        }
        request
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())
    }
}

/// Why a pattern or target was dropped during compilation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Rejection {
    #[error("Pattern '{pattern}' can have at most one '*' character.")]
    PatternWildcards { pattern: String },

    #[error("path pattern '{pattern}' is not valid.")]
    InvalidPattern { pattern: String },

    #[error("Substitution '{target}' in pattern '{pattern}' can have at most one '*' character.")]
    TargetWildcards { pattern: String, target: String },

    #[error("target pattern '{target}' is not valid")]
    InvalidTarget { pattern: String, target: String },

    #[error("type defined {target} is ignored.")]
    DeclarationTarget { pattern: String, target: String },

    #[error("pattern '{pattern}' has no usable targets and is ignored.")]
    NoTargets { pattern: String },
}

impl Rejection {
    /// The pattern the rejection belongs to
    pub fn pattern(&self) -> &str {
        match self {
            Rejection::PatternWildcards { pattern }
            | Rejection::InvalidPattern { pattern }
            | Rejection::TargetWildcards { pattern, .. }
            | Rejection::InvalidTarget { pattern, .. }
            | Rejection::DeclarationTarget { pattern, .. }
            | Rejection::NoTargets { pattern } => pattern,
        }
    }
}

/// Ordered compiled rules plus everything that was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompiledRuleSet {
    pub rules: Vec<CompiledRule>,
    pub rejections: Vec<Rejection>,
}

impl CompiledRuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRule> {
        self.rules.iter()
    }
}

/// Compile a raw `paths` table.
///
/// Rules keep the key order of `paths`; that order breaks ties during
/// matching.
pub fn compile_mappings(paths: &RawMapping, log_level: LogLevel) -> CompiledRuleSet {
    let mut set = CompiledRuleSet::default();

    for (pattern, raw_targets) in paths {
        if count_wildcards(pattern) > 1 {
            reject(&mut set, log_level, Rejection::PatternWildcards {
                pattern: pattern.clone(),
            });
            continue;
        }
        if !has_valid_wildcard(pattern) {
            reject(&mut set, log_level, Rejection::InvalidPattern {
                pattern: pattern.clone(),
            });
            continue;
        }

        let mut targets = Vec::with_capacity(raw_targets.len());
        for target in raw_targets {
            match check_target(pattern, target) {
                Some(rejection) => reject(&mut set, log_level, rejection),
                None => targets.push(target.clone()),
            }
        }

        if targets.is_empty() {
            reject(&mut set, log_level, Rejection::NoTargets {
                pattern: pattern.clone(),
            });
            continue;
        }

        set.rules.push(compile_rule(pattern, targets));
    }

    if log_level.debugs() {
        for rule in &set.rules {
            debug!(
                "[fob-tsconfig-paths] pattern: '{}' targets: '{}'",
                rule.pattern,
                rule.targets.join(",")
            );
        }
    }

    set
}

fn check_target(pattern: &str, target: &str) -> Option<Rejection> {
    if count_wildcards(target) > 1 {
        return Some(Rejection::TargetWildcards {
            pattern: pattern.to_string(),
            target: target.to_string(),
        });
    }
    if !has_valid_wildcard(target) {
        return Some(Rejection::InvalidTarget {
            pattern: pattern.to_string(),
            target: target.to_string(),
        });
    }
    if is_type_only_target(target) {
        return Some(Rejection::DeclarationTarget {
            pattern: pattern.to_string(),
            target: target.to_string(),
        });
    }
    None
}

fn compile_rule(pattern: &str, targets: Vec<String>) -> CompiledRule {
    match pattern.find(WILDCARD) {
        Some(index) => CompiledRule {
            pattern: pattern.to_string(),
            is_wildcard: true,
            prefix: pattern[..index].to_string(),
            suffix: pattern[index + 1..].to_string(),
            targets,
        },
        None => CompiledRule {
            pattern: pattern.to_string(),
            is_wildcard: false,
            prefix: String::new(),
            suffix: String::new(),
            targets,
        },
    }
}

fn reject(set: &mut CompiledRuleSet, log_level: LogLevel, rejection: Rejection) {
    if log_level.warns() {
        warn!("[fob-tsconfig-paths] {}", rejection);
    }
    set.rejections.push(rejection);
}

/// Interpret a `compilerOptions.paths` JSON value.
///
/// A missing value or an array (which old tsconfig files sometimes carry)
/// means "no aliases". An object must map every key to an array of strings;
/// anything else is a fatal configuration error because no rule set can be
/// derived from it.
pub fn raw_mapping_from_value(value: Option<&Value>, config_path: &Path) -> Result<RawMapping> {
    let object = match value {
        None | Some(Value::Null) | Some(Value::Array(_)) => return Ok(RawMapping::new()),
        Some(Value::Object(object)) => object,
        Some(other) => {
            return Err(PathsError::invalid_paths(
                config_path,
                format!("expected an object, found {}", json_kind(other)),
            ));
        }
    };

    let mut mapping = RawMapping::with_capacity(object.len());
    for (pattern, targets) in object {
        let Value::Array(items) = targets else {
            return Err(PathsError::invalid_paths(
                config_path,
                format!(
                    "'{}' must be an array of strings, found {}",
                    pattern,
                    json_kind(targets)
                ),
            ));
        };

        let mut strings = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(target) => strings.push(target.clone()),
                other => {
                    return Err(PathsError::invalid_paths(
                        config_path,
                        format!(
                            "'{}' contains a non-string target ({})",
                            pattern,
                            json_kind(other)
                        ),
                    ));
                }
            }
        }
        mapping.insert(pattern.clone(), strings);
    }

    Ok(mapping)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
