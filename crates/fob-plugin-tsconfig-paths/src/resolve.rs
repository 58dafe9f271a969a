//! Alias resolution: rule selection and ordered target substitution.
//!
//! Resolution is a pure function of the compiled snapshot, the injected
//! [`ModuleResolver`] and the injected existence check. A negative outcome is
//! never an error; the bundler falls back to its own resolution.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::trace;

use crate::host::{ModuleResolver, is_declaration_file, is_nested_dependency};
use crate::mapping::CompiledRule;
use crate::pattern::{DECLARATION_SUFFIXES, is_pattern_match, substitute};
use crate::snapshot::PathsSnapshot;

/// Runtime sources a declaration file may stand in for, in probe order
const DECLARATION_SOURCE_EXTENSIONS: [&str; 2] = ["js", "jsx"];

/// Outcome of resolving one specifier against the alias table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasResolution {
    /// A target resolved to a module file
    Module(PathBuf),
    /// A target is a plain file the module resolver does not understand
    Resource(PathBuf),
    /// A target points into `node_modules`; loading it is left to the bundler
    NestedDependency(PathBuf),
    /// No pattern applies to the specifier
    Unmatched,
    /// A pattern matched but none of its targets resolved
    Exhausted {
        pattern: String,
        /// Every absolute candidate, in the order it was tried
        tried: Vec<PathBuf>,
    },
}

impl AliasResolution {
    /// The resolved location, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            AliasResolution::Module(path)
            | AliasResolution::Resource(path)
            | AliasResolution::NestedDependency(path) => Some(path),
            AliasResolution::Unmatched | AliasResolution::Exhausted { .. } => None,
        }
    }

    /// Whether a pattern applied to the specifier at all
    pub fn is_matched(&self) -> bool {
        !matches!(self, AliasResolution::Unmatched)
    }
}

/// Select the rule that applies to `request`.
///
/// An exact pattern equal to the request wins immediately. Otherwise the
/// wildcard rule with the strictly longest prefix wins; on equal prefixes
/// the earlier rule is kept.
pub fn find_match<'a>(request: &str, rules: &'a [CompiledRule]) -> Option<&'a CompiledRule> {
    let mut matched: Option<&CompiledRule> = None;
    let mut longest_prefix: Option<usize> = None;

    for rule in rules {
        if !rule.is_wildcard {
            if rule.pattern == request {
                return Some(rule);
            }
            continue;
        }

        if is_pattern_match(&rule.prefix, &rule.suffix, request)
            && longest_prefix.is_none_or(|longest| rule.prefix.len() > longest)
        {
            longest_prefix = Some(rule.prefix.len());
            matched = Some(rule);
        }
    }

    matched
}

/// Resolve `request`, imported from `importer`, through the alias table.
///
/// Each target of the matching rule is substituted, made absolute against
/// the snapshot's base URL and then tried in order: a `node_modules`
/// candidate is returned as is, otherwise `resolver` is asked for a module
/// file, and finally `exists` is asked whether the candidate is a plain file.
pub fn resolve_alias<R, F>(
    request: &str,
    importer: &Path,
    snapshot: &PathsSnapshot,
    resolver: &R,
    exists: F,
) -> AliasResolution
where
    R: ModuleResolver + ?Sized,
    F: Fn(&Path) -> bool,
{
    let Some(rule) = find_match(request, &snapshot.rules.rules) else {
        return AliasResolution::Unmatched;
    };

    let Some(capture) = rule.capture(request) else {
        return AliasResolution::Unmatched;
    };
    let mut tried = Vec::with_capacity(rule.targets.len());

    for target in &rule.targets {
        let substituted = if rule.is_wildcard {
            substitute(target, capture)
        } else {
            target.clone()
        };
        let candidate = snapshot.base_url.join(substituted).clean();

        trace!(
            "[fob-tsconfig-paths] {} matched '{}', trying {}",
            request,
            rule.pattern,
            candidate.display()
        );

        if is_nested_dependency(&candidate) {
            return AliasResolution::NestedDependency(candidate);
        }

        if let Some(resolved) = resolver.resolve_module(&candidate, importer) {
            return AliasResolution::Module(resolved.clean());
        }

        if exists(&candidate) {
            return AliasResolution::Resource(candidate);
        }

        tried.push(candidate);
    }

    AliasResolution::Exhausted {
        pattern: rule.pattern.clone(),
        tried,
    }
}

/// Map an unaliased import that lands on a declaration file to the runtime
/// source next to it.
///
/// `resolver` must report declaration files. Returns the first existing
/// `.js`/`.jsx` sibling of a `.d.ts` resolved outside `node_modules`, and
/// `None` in every other case.
pub fn retarget_declaration<R, F>(
    request: &str,
    importer: &Path,
    resolver: &R,
    exists: F,
) -> Option<PathBuf>
where
    R: ModuleResolver + ?Sized,
    F: Fn(&Path) -> bool,
{
    let resolved = resolver.resolve_module(Path::new(request), importer)?;
    if is_nested_dependency(&resolved) || !is_declaration_file(&resolved) {
        return None;
    }

    let file_name = resolved.file_name()?.to_str()?;
    let stem = declaration_stem(file_name)?;

    DECLARATION_SOURCE_EXTENSIONS
        .iter()
        .map(|ext| resolved.with_file_name(format!("{}.{}", stem, ext)))
        .find(|guess| exists(guess))
}

fn declaration_stem(file_name: &str) -> Option<&str> {
    DECLARATION_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
}
