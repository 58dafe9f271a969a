//! Rolldown plugin for tsconfig `paths` aliases
//!
//! This crate rewrites aliased import specifiers (`@app/utils`, `~/config`)
//! into real file paths using the `compilerOptions.paths` table of a
//! tsconfig, the way the TypeScript compiler maps them. It uses the
//! `resolve_id` hook; specifiers that no alias applies to are left to
//! Rolldown's own resolution.
//!
//! ## Resolution
//!
//! - The longest matching wildcard prefix wins; an exact pattern always wins.
//! - Targets are tried in declared order, relative to `baseUrl`.
//! - A target inside `node_modules` is handed back without further checks.
//! - Plain resources (`.css`, images) resolve when the file exists.
//! - Unaliased imports that land on a hand-written `.d.ts` are redirected to
//!   the `.js`/`.jsx` file next to it.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fob_plugin_tsconfig_paths::{FobTsconfigPathsPlugin, TsconfigPathsOptions};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = TsconfigPathsOptions::new().with_tsconfig_path("tsconfig.json");
//! let plugin = Arc::new(FobTsconfigPathsPlugin::new(options)?);
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use rolldown_common::ResolvedExternal;
use rolldown_plugin::{
    HookBuildStartArgs, HookNoopReturn, HookResolveIdArgs, HookResolveIdOutput,
    HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

mod error;
mod host;
mod logging;
mod mapping;
mod options;
mod pattern;
mod resolve;
mod snapshot;
mod tsconfig;

pub use error::{PathsError, Result};
pub use host::{
    DeclarationPolicy, ModuleResolver, OxcModuleResolver, default_extensions, fs_exists,
    is_declaration_file, is_nested_dependency,
};
pub use logging::LogLevel;
pub use mapping::{
    CompiledRule, CompiledRuleSet, RawMapping, Rejection, compile_mappings,
    raw_mapping_from_value,
};
pub use options::{TS_NODE_PROJECT, TsconfigPathsOptions};
pub use pattern::{has_valid_wildcard, is_pattern_match, substitute};
pub use resolve::{AliasResolution, find_match, resolve_alias, retarget_declaration};
pub use snapshot::{PathsSnapshot, SharedSnapshot};
pub use tsconfig::{ProjectPaths, TSCONFIG_FILE_NAME, find_config_file, load_project_paths};

/// Rolldown plugin that resolves tsconfig `paths` aliases
///
/// # Architecture
///
/// ```text
/// tsconfig.json → compile_mappings() → PathsSnapshot
/// import "@app/x" → resolve_id() → resolve_alias(snapshot) → /abs/src/x.ts
/// ```
///
/// The snapshot is rebuilt on every `build_start`, so watch-mode rebuilds
/// pick up tsconfig edits.
#[derive(Debug, Clone)]
pub struct FobTsconfigPathsPlugin {
    options: TsconfigPathsOptions,
    config_path: PathBuf,
    snapshot: SharedSnapshot,
    /// Resolves substituted candidates; declaration files do not count
    module_resolver: Arc<OxcModuleResolver>,
    /// Node-style lookups for candidates inside `node_modules`
    dependency_resolver: Arc<OxcModuleResolver>,
    /// Finds the `.d.ts` an unaliased import lands on
    declaration_resolver: Arc<OxcModuleResolver>,
}

impl FobTsconfigPathsPlugin {
    /// Locate, load and compile the tsconfig described by `options`.
    ///
    /// Relative locations are taken from the current working directory.
    pub fn new(options: TsconfigPathsOptions) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| PathsError::read_config(".", e))?;
        let config_path = options.locate_tsconfig(&cwd);
        let snapshot = PathsSnapshot::load(&config_path, options.log_level)?;

        let module_resolver =
            OxcModuleResolver::new(options.extensions.clone(), DeclarationPolicy::Exclude);
        let dependency_resolver =
            OxcModuleResolver::new(options.extensions.clone(), DeclarationPolicy::Allow);
        let declaration_resolver = OxcModuleResolver::declaration_aware(options.extensions.clone());

        Ok(Self {
            options,
            config_path,
            snapshot: snapshot.into_shared(),
            module_resolver: Arc::new(module_resolver),
            dependency_resolver: Arc::new(dependency_resolver),
            declaration_resolver: Arc::new(declaration_resolver),
        })
    }

    /// Build the plugin from defaults and `TS_NODE_PROJECT`
    pub fn from_env() -> Result<Self> {
        Self::new(TsconfigPathsOptions::from_env()?)
    }

    pub fn options(&self) -> &TsconfigPathsOptions {
        &self.options
    }

    /// The tsconfig this plugin loads
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The rule set currently in effect
    pub fn snapshot(&self) -> Arc<PathsSnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Re-read the tsconfig and swap in the new rules.
    ///
    /// On error the previous rules stay active.
    pub fn reload(&self) -> Result<Arc<PathsSnapshot>> {
        let snapshot = Arc::new(PathsSnapshot::load(
            &self.config_path,
            self.options.log_level,
        )?);
        *self.snapshot.write() = Arc::clone(&snapshot);
        Ok(snapshot)
    }

    /// Run the alias table for one import with this plugin's resolvers,
    /// before any nested-dependency lookup or declaration retargeting.
    pub fn alias_outcome(&self, specifier: &str, importer: &Path) -> AliasResolution {
        resolve_alias(
            specifier,
            importer,
            &self.snapshot(),
            self.module_resolver.as_ref(),
            fs_exists,
        )
    }

    /// Resolve one import against the current snapshot without consulting
    /// Rolldown.
    ///
    /// Returns the absolute path the import should load from, or `None` when
    /// Rolldown should resolve it itself.
    pub fn resolve_specifier(&self, specifier: &str, importer: Option<&str>) -> Option<String> {
        // Entries and virtual modules are never aliased
        let importer = Path::new(importer?);
        if specifier.starts_with('\0') {
            return None;
        }

        let outcome = self.alias_outcome(specifier, importer);
        self.finish_resolution(specifier, importer, &outcome)
    }

    /// Turn an alias outcome into the id handed to Rolldown.
    ///
    /// Nested dependencies get a node-style lookup from the importer, and
    /// unmatched imports may be retargeted away from a `.d.ts`.
    pub fn finish_resolution(
        &self,
        specifier: &str,
        importer: &Path,
        outcome: &AliasResolution,
    ) -> Option<String> {
        let resolved = match outcome {
            AliasResolution::Module(path) | AliasResolution::Resource(path) => path.clone(),
            AliasResolution::NestedDependency(path) => self
                .dependency_resolver
                .resolve_module(path, importer)
                .unwrap_or_else(|| path.clone()),
            AliasResolution::Unmatched => {
                if !self.options.retarget_declarations {
                    return None;
                }
                retarget_declaration(
                    specifier,
                    importer,
                    self.declaration_resolver.as_ref(),
                    fs_exists,
                )?
            }
            AliasResolution::Exhausted { pattern, tried } => {
                if self.options.log_level.debugs() {
                    debug!(
                        "[fob-tsconfig-paths] {} matched '{}' but none of {} target(s) resolved",
                        specifier,
                        pattern,
                        tried.len()
                    );
                }
                return None;
            }
        };

        let resolved = resolved.to_string_lossy().into_owned();
        if self.options.log_level.debugs() {
            debug!("[fob-tsconfig-paths] {} -> {}", specifier, resolved);
        }
        Some(resolved)
    }
}

impl Plugin for FobTsconfigPathsPlugin {
    fn name(&self) -> Cow<'static, str> {
        "fob-tsconfig-paths".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::BuildStart | HookUsage::ResolveId
    }

    /// Build start hook - reloads the tsconfig so edits between rebuilds apply
    fn build_start(
        &self,
        _ctx: &PluginContext,
        _args: &HookBuildStartArgs<'_>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        let result = self
            .reload()
            .map(|_| ())
            .with_context(|| format!("Failed to load {}", self.config_path.display()));

        async move { result }
    }

    /// Resolve ID hook - rewrites aliased specifiers to absolute paths
    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let resolved = self.resolve_specifier(args.specifier, args.importer);

        async move {
            Ok(resolved.map(|id| HookResolveIdOutput {
                id: id.into(),
                external: Some(ResolvedExternal::Bool(false)),
                ..Default::default()
            }))
        }
    }
}
