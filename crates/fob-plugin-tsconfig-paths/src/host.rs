//! Low-level resolution capabilities handed to the alias resolver.
//!
//! The alias resolver only decides *which* candidate paths to try. Turning a
//! candidate into a concrete module file (extension probing, directory
//! indexes, package entry points) is delegated to a [`ModuleResolver`], and
//! plain resource files (stylesheets, images, fonts) are confirmed with an
//! existence check.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use oxc_resolver::{ResolveOptions, Resolver};
use path_clean::PathClean;
use tracing::trace;

use crate::pattern::is_declaration_name;

/// Directory name that marks a third-party dependency tree.
pub const NODE_MODULES: &str = "node_modules";

const DECLARATION_EXTENSION: &str = ".d.ts";
const TYPESCRIPT_EXTENSIONS: [&str; 4] = [".ts", ".tsx", ".mts", ".cts"];

/// Turns a candidate path into a resolved module file.
///
/// Implemented for closures so callers can inject a resolver without a real
/// filesystem.
pub trait ModuleResolver {
    /// Resolve `candidate` as imported from `importer`.
    ///
    /// Returns `None` when the candidate is not a loadable module.
    fn resolve_module(&self, candidate: &Path, importer: &Path) -> Option<PathBuf>;
}

impl<F> ModuleResolver for F
where
    F: Fn(&Path, &Path) -> Option<PathBuf>,
{
    fn resolve_module(&self, candidate: &Path, importer: &Path) -> Option<PathBuf> {
        self(candidate, importer)
    }
}

/// Whether declaration files count as a successful resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationPolicy {
    /// A `.d.ts` result is treated as "not found"
    Exclude,
    /// A `.d.ts` result is returned as is
    Allow,
}

/// Extensions probed by default, TypeScript sources first
pub fn default_extensions() -> Vec<String> {
    [
        ".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs", ".json",
    ]
    .iter()
    .map(|ext| ext.to_string())
    .collect()
}

/// [`ModuleResolver`] backed by `oxc_resolver`
pub struct OxcModuleResolver {
    resolver: Resolver,
    policy: DeclarationPolicy,
}

impl OxcModuleResolver {
    /// Create a resolver probing `extensions` in order
    pub fn new(extensions: Vec<String>, policy: DeclarationPolicy) -> Self {
        let resolver = Resolver::new(ResolveOptions {
            condition_names: vec![
                "import".into(),
                "module".into(),
                "require".into(),
                "default".into(),
            ],
            main_fields: vec!["module".into(), "main".into()],
            extensions,
            ..Default::default()
        });

        Self { resolver, policy }
    }

    /// Create a resolver that finds hand-written declarations the way the
    /// TypeScript compiler does: `.d.ts` is probed right after the
    /// TypeScript source extensions.
    pub fn declaration_aware(mut extensions: Vec<String>) -> Self {
        if !extensions.iter().any(|ext| ext == DECLARATION_EXTENSION) {
            let at = extensions
                .iter()
                .rposition(|ext| TYPESCRIPT_EXTENSIONS.contains(&ext.as_str()))
                .map_or(0, |index| index + 1);
            extensions.insert(at, DECLARATION_EXTENSION.to_string());
        }
        Self::new(extensions, DeclarationPolicy::Allow)
    }

    /// The declaration policy this resolver applies
    pub fn policy(&self) -> DeclarationPolicy {
        self.policy
    }

    /// Resolve a raw specifier from a directory.
    pub fn resolve_from(&self, directory: &Path, specifier: &str) -> Option<PathBuf> {
        match self.resolver.resolve(directory, specifier) {
            Ok(resolution) => {
                let path = resolution.path().to_path_buf();
                if self.policy == DeclarationPolicy::Exclude && is_declaration_file(&path) {
                    trace!(
                        "[fob-tsconfig-paths] Ignoring declaration file {}",
                        path.display()
                    );
                    return None;
                }
                Some(path.clean())
            }
            Err(err) => {
                trace!(
                    "[fob-tsconfig-paths] {} not resolvable from {}: {}",
                    specifier,
                    directory.display(),
                    err
                );
                None
            }
        }
    }
}

impl ModuleResolver for OxcModuleResolver {
    fn resolve_module(&self, candidate: &Path, importer: &Path) -> Option<PathBuf> {
        let directory = importer_directory(importer);
        self.resolve_from(directory, &candidate.to_string_lossy())
    }
}

impl fmt::Debug for OxcModuleResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OxcModuleResolver")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Directory resolution starts from: the importer's parent, or the importer
/// itself when it is already a directory.
pub fn importer_directory(importer: &Path) -> &Path {
    if importer.is_dir() {
        importer
    } else {
        importer.parent().unwrap_or(importer)
    }
}

/// Existence check used for non-module resources
pub fn fs_exists(path: &Path) -> bool {
    path.exists()
}

/// Whether `path` names a declaration-only file (`.d.ts`, `.d.mts`, `.d.cts`)
pub fn is_declaration_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(is_declaration_name)
}

/// Whether `path` lies inside a `node_modules` directory.
///
/// Purely lexical: `node_modules` must appear as a directory segment, not as
/// the final component and not as part of a longer name.
pub fn is_nested_dependency(path: &Path) -> bool {
    let mut components = path.components().peekable();
    while let Some(component) = components.next() {
        if let Component::Normal(name) = component {
            if name == NODE_MODULES && components.peek().is_some() {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_nested_dependency() {
        assert!(is_nested_dependency(Path::new("/p/node_modules/dep/index.js")));
        assert!(is_nested_dependency(Path::new("/p/node_modules/@scope/dep")));
        assert!(!is_nested_dependency(Path::new("/p/node_modules")));
        assert!(!is_nested_dependency(Path::new("/p/node_modules_dep/foo")));
        assert!(!is_nested_dependency(Path::new("/p/src/my_node_modules/foo")));
    }

    #[test]
    fn test_is_declaration_file() {
        assert!(is_declaration_file(Path::new("/p/src/index.d.ts")));
        assert!(is_declaration_file(Path::new("/p/src/index.d.mts")));
        assert!(!is_declaration_file(Path::new("/p/src/index.ts")));
        assert!(!is_declaration_file(Path::new("/p/src/d.ts")));
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |candidate: &Path, _importer: &Path| Some(candidate.with_extension("ts"));
        assert_eq!(
            resolver.resolve_module(Path::new("/p/hello"), Path::new("/p/index.ts")),
            Some(PathBuf::from("/p/hello.ts"))
        );
    }

    #[test]
    fn test_oxc_resolver_probes_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hello.ts"), "export {}").unwrap();
        let importer = dir.path().join("index.ts");
        fs::write(&importer, "").unwrap();

        let resolver = OxcModuleResolver::new(default_extensions(), DeclarationPolicy::Exclude);
        let resolved = resolver
            .resolve_module(&dir.path().join("hello"), &importer)
            .unwrap();
        assert_eq!(resolved.file_name().unwrap(), "hello.ts");
    }

    #[test]
    fn test_oxc_resolver_excludes_declarations() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("types.d.ts"), "export {}").unwrap();
        let importer = dir.path().join("index.ts");
        fs::write(&importer, "").unwrap();

        let excluding = OxcModuleResolver::new(default_extensions(), DeclarationPolicy::Exclude);
        assert!(excluding
            .resolve_module(&dir.path().join("types.d.ts"), &importer)
            .is_none());

        let allowing = OxcModuleResolver::new(default_extensions(), DeclarationPolicy::Allow);
        assert!(allowing
            .resolve_module(&dir.path().join("types.d.ts"), &importer)
            .is_some());
    }

    #[test]
    fn test_declaration_aware_prefers_declaration_over_js() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("legacy.d.ts"), "export {}").unwrap();
        fs::write(dir.path().join("legacy.js"), "export {}").unwrap();
        let importer = dir.path().join("index.ts");

        let plain = OxcModuleResolver::new(default_extensions(), DeclarationPolicy::Allow);
        let resolved = plain.resolve_from(dir.path(), "./legacy").unwrap();
        assert_eq!(resolved.file_name().unwrap(), "legacy.js");

        let aware = OxcModuleResolver::declaration_aware(default_extensions());
        assert_eq!(aware.policy(), DeclarationPolicy::Allow);
        let resolved = aware
            .resolve_module(Path::new("./legacy"), &importer)
            .unwrap();
        assert_eq!(resolved.file_name().unwrap(), "legacy.d.ts");
    }

    #[test]
    fn test_oxc_resolver_missing_file() {
        let dir = TempDir::new().unwrap();
        let resolver = OxcModuleResolver::new(default_extensions(), DeclarationPolicy::Exclude);
        assert!(resolver
            .resolve_module(&dir.path().join("missing"), &dir.path().join("index.ts"))
            .is_none());
    }
}
