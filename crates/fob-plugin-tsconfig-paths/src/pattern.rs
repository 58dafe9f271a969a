//! Lexical helpers for `paths` patterns and substitution targets.
//!
//! Both sides of a `paths` entry share the same wildcard rules: at most one
//! `*`, and it must sit in a position that maps cleanly onto a path segment.

/// The wildcard marker used by tsconfig `paths`.
pub const WILDCARD: char = '*';

/// Suffixes of files that only carry type declarations.
pub(crate) const DECLARATION_SUFFIXES: [&str; 3] = [".d.ts", ".d.mts", ".d.cts"];

/// Number of wildcard markers in `value`.
pub fn count_wildcards(value: &str) -> usize {
    value.matches(WILDCARD).count()
}

/// Whether a single wildcard sits in an accepted position.
///
/// Accepted shapes are:
///
/// - the bare wildcard: `*`
/// - a trailing segment wildcard: `@app/*`
/// - an inner segment wildcard: `lib/*/index`
///
/// Anything else, including a leading `*/src`, is rejected. Strings without a
/// wildcard are trivially valid. Strings with more than one wildcard are
/// never valid.
pub fn has_valid_wildcard(value: &str) -> bool {
    let Some(index) = value.find(WILDCARD) else {
        return true;
    };
    if count_wildcards(value) > 1 {
        return false;
    }

    if value.len() == WILDCARD.len_utf8() {
        return true;
    }

    let before = &value[..index];
    let after = &value[index + 1..];
    before.ends_with('/') && (after.is_empty() || after.starts_with('/'))
}

/// Whether `target` points at something that can never be loaded at runtime:
/// a declaration file or anything under an `@types` scope.
pub fn is_type_only_target(target: &str) -> bool {
    target.contains("@types") || is_declaration_name(target)
}

/// Whether a file name ends in one of the declaration-only suffixes.
pub fn is_declaration_name(name: &str) -> bool {
    DECLARATION_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Prefix/suffix match used for wildcard rules.
///
/// The length check keeps overlapping prefix and suffix from matching a
/// request that is too short to contain both; an empty capture is allowed.
pub fn is_pattern_match(prefix: &str, suffix: &str, candidate: &str) -> bool {
    candidate.len() >= prefix.len() + suffix.len()
        && candidate.starts_with(prefix)
        && candidate.ends_with(suffix)
}

/// Replace the single wildcard in `target` with `capture`.
pub fn substitute(target: &str, capture: &str) -> String {
    target.replacen(WILDCARD, capture, 1)
}
