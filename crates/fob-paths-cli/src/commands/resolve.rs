//! `fob-paths resolve`

use fob_plugin_tsconfig_paths::{AliasResolution, FobTsconfigPathsPlugin};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, ResolveArgs};
use crate::error::Result;

use super::load_plugin;

pub fn execute(cli: &Cli, args: &ResolveArgs) -> Result<()> {
    let plugin = load_plugin(cli)?;
    let importer = std::path::absolute(&args.importer)?;
    let report = ResolveReport::new(&plugin, &args.specifier, &importer);

    let output = if args.json {
        serde_json::to_string_pretty(&report.to_json())?
    } else {
        report.render_text()
    };
    println!("{}", output);
    Ok(())
}

/// What the plugin does with one import
#[derive(Debug, Clone)]
pub struct ResolveReport {
    pub specifier: String,
    pub importer: PathBuf,
    /// The alias table's verdict
    pub outcome: AliasResolution,
    /// The id `resolve_id` hands to Rolldown, if any
    pub resolved: Option<String>,
}

impl ResolveReport {
    pub fn new(plugin: &FobTsconfigPathsPlugin, specifier: &str, importer: &Path) -> Self {
        let outcome = plugin.alias_outcome(specifier, importer);
        let resolved = plugin.finish_resolution(specifier, importer, &outcome);

        Self {
            specifier: specifier.to_string(),
            importer: importer.to_path_buf(),
            outcome,
            resolved,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.outcome {
            AliasResolution::Module(_) => "module",
            AliasResolution::Resource(_) => "resource",
            AliasResolution::NestedDependency(_) => "nested-dependency",
            AliasResolution::Unmatched => "unmatched",
            AliasResolution::Exhausted { .. } => "exhausted",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "specifier": self.specifier,
            "importer": self.importer,
            "outcome": self.kind(),
            "resolved": self.resolved,
        });

        if let AliasResolution::Exhausted { pattern, tried } = &self.outcome {
            value["pattern"] = json!(pattern);
            value["tried"] = json!(tried);
        }
        value
    }

    pub fn render_text(&self) -> String {
        match (&self.outcome, &self.resolved) {
            (AliasResolution::Exhausted { pattern, tried }, _) => {
                let mut lines = vec![format!(
                    "{}: '{}' matched but no target resolved ({})",
                    self.specifier,
                    pattern,
                    self.kind()
                )];
                lines.extend(
                    tried
                        .iter()
                        .map(|candidate| format!("  tried {}", candidate.display())),
                );
                lines.join("\n")
            }
            (AliasResolution::Unmatched, Some(resolved)) => format!(
                "{} -> {} ({}, declaration retargeted)",
                self.specifier,
                resolved,
                self.kind()
            ),
            (AliasResolution::Unmatched, None) => {
                format!("{}: no alias applies ({})", self.specifier, self.kind())
            }
            (_, Some(resolved)) => format!("{} -> {} ({})", self.specifier, resolved, self.kind()),
            (_, None) => format!("{}: not resolved ({})", self.specifier, self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: AliasResolution, resolved: Option<&str>) -> ResolveReport {
        ResolveReport {
            specifier: "@app/x".to_string(),
            importer: PathBuf::from("/project/index.ts"),
            outcome,
            resolved: resolved.map(str::to_string),
        }
    }

    #[test]
    fn test_module_text() {
        let report = report(
            AliasResolution::Module(PathBuf::from("/project/src/x.ts")),
            Some("/project/src/x.ts"),
        );
        assert_eq!(report.render_text(), "@app/x -> /project/src/x.ts (module)");
    }

    #[test]
    fn test_exhausted_lists_candidates() {
        let report = report(
            AliasResolution::Exhausted {
                pattern: "@app/*".to_string(),
                tried: vec![PathBuf::from("/project/a/x"), PathBuf::from("/project/b/x")],
            },
            None,
        );

        let text = report.render_text();
        assert!(text.contains("(exhausted)"));
        assert!(text.contains("  tried /project/a/x\n  tried /project/b/x"));

        let value = report.to_json();
        assert_eq!(value["outcome"], "exhausted");
        assert_eq!(value["tried"][1], "/project/b/x");
        assert!(value["resolved"].is_null());
    }

    #[test]
    fn test_unmatched_text() {
        let plain = report(AliasResolution::Unmatched, None);
        assert_eq!(plain.render_text(), "@app/x: no alias applies (unmatched)");

        let retargeted = report(AliasResolution::Unmatched, Some("/project/x.js"));
        assert!(retargeted.render_text().contains("declaration retargeted"));
    }
}
