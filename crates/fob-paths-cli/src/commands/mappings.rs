//! `fob-paths mappings`

use fob_plugin_tsconfig_paths::PathsSnapshot;
use serde_json::{Value, json};

use crate::cli::{Cli, MappingsArgs};
use crate::error::Result;

use super::load_plugin;

pub fn execute(cli: &Cli, args: &MappingsArgs) -> Result<()> {
    let plugin = load_plugin(cli)?;
    let snapshot = plugin.snapshot();

    let output = if args.json {
        serde_json::to_string_pretty(&to_json(&snapshot))?
    } else {
        render_text(&snapshot)
    };
    println!("{}", output);
    Ok(())
}

pub fn to_json(snapshot: &PathsSnapshot) -> Value {
    json!({
        "configPath": snapshot.config_path,
        "baseUrl": snapshot.base_url,
        "rules": snapshot.rules.rules,
        "rejections": snapshot.rules.rejections,
    })
}

pub fn render_text(snapshot: &PathsSnapshot) -> String {
    let mut lines = vec![
        format!("tsconfig: {}", snapshot.config_path.display()),
        format!("baseUrl:  {}", snapshot.base_url.display()),
        format!("rules ({}):", snapshot.rules.len()),
    ];

    lines.extend(
        snapshot
            .rules
            .iter()
            .map(|rule| format!("  {} -> {}", rule.pattern, rule.targets.join(", "))),
    );

    if !snapshot.rules.rejections.is_empty() {
        lines.push(format!("rejected ({}):", snapshot.rules.rejections.len()));
        lines.extend(
            snapshot
                .rules
                .rejections
                .iter()
                .map(|rejection| format!("  {}", rejection)),
        );
    }

    lines.join("\n")
}
