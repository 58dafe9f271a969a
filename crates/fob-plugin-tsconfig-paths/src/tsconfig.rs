//! tsconfig loading: the parts of `compilerOptions` alias resolution needs.
//!
//! Only `baseUrl` and `paths` are read. `extends` chains are followed so an
//! alias table inherited from a shared base config behaves the way `tsc`
//! sees it.

use std::fs;
use std::path::{Path, PathBuf};

use oxc_resolver::{ResolveOptions, Resolver};
use path_clean::PathClean;
use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::error::{PathsError, Result};
use crate::mapping::{RawMapping, raw_mapping_from_value};

/// File name looked up when no explicit config is given
pub const TSCONFIG_FILE_NAME: &str = "tsconfig.json";

/// Alias configuration of one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// The tsconfig the chain started from
    pub config_path: PathBuf,
    /// Absolute directory relative targets are resolved against
    pub base_url: PathBuf,
    /// `compilerOptions.paths`, in declaration order
    pub paths: RawMapping,
}

/// Settings accumulated along an `extends` chain
#[derive(Debug, Default)]
struct ConfigLayer {
    base_url: Option<PathBuf>,
    /// The mapping and the directory of the file that declared it
    paths: Option<(RawMapping, PathBuf)>,
}

impl ConfigLayer {
    fn override_with(&mut self, other: ConfigLayer) {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.paths.is_some() {
            self.paths = other.paths;
        }
    }
}

/// Load `baseUrl` and `paths` from `config_path`, following `extends`.
///
/// `baseUrl` is relative to the file declaring it. Without any `baseUrl` in
/// the chain, targets are relative to the file declaring `paths`, or to the
/// root config's directory when nothing declares `paths` either.
pub fn load_project_paths(config_path: &Path) -> Result<ProjectPaths> {
    let config_path = std::path::absolute(config_path)
        .map_err(|e| PathsError::read_config(config_path, e))?
        .clean();

    let resolver = Resolver::new(ResolveOptions {
        extensions: vec![".json".into()],
        ..Default::default()
    });

    let mut visited = FxHashSet::default();
    let layer = load_layer(&config_path, &resolver, &mut visited)?;

    let root_dir = config_dir(&config_path).to_path_buf();
    let (paths, paths_dir) = match layer.paths {
        Some((paths, dir)) => (paths, Some(dir)),
        None => (RawMapping::new(), None),
    };
    let base_url = layer.base_url.or(paths_dir).unwrap_or(root_dir);

    Ok(ProjectPaths {
        config_path,
        base_url,
        paths,
    })
}

fn load_layer(
    path: &Path,
    resolver: &Resolver,
    visited: &mut FxHashSet<PathBuf>,
) -> Result<ConfigLayer> {
    if !visited.insert(path.to_path_buf()) {
        return Err(PathsError::CircularExtends {
            path: path.to_path_buf(),
        });
    }

    let source = fs::read_to_string(path).map_err(|e| PathsError::read_config(path, e))?;
    let value: Value = serde_json::from_str(&strip_jsonc(&source))
        .map_err(|e| PathsError::parse_config(path, e.to_string()))?;
    let dir = config_dir(path).to_path_buf();

    let mut layer = ConfigLayer::default();
    for specifier in extends_list(&value, path)? {
        let base_path = resolve_extends(&specifier, path, resolver)?;
        let base = load_layer(&base_path, resolver, visited)?;
        layer.override_with(base);
    }

    let compiler_options = value.get("compilerOptions");
    let mut own = ConfigLayer::default();
    if let Some(base_url) = compiler_options
        .and_then(|options| options.get("baseUrl"))
        .and_then(Value::as_str)
    {
        own.base_url = Some(dir.join(base_url).clean());
    }
    if let Some(paths) = compiler_options
        .and_then(|options| options.get("paths"))
        .filter(|paths| !paths.is_null())
    {
        own.paths = Some((raw_mapping_from_value(Some(paths), path)?, dir));
    }
    layer.override_with(own);

    // A base shared by two branches of an `extends` array is not a cycle
    visited.remove(path);
    Ok(layer)
}

fn extends_list(value: &Value, path: &Path) -> Result<Vec<String>> {
    match value.get("extends") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(specifier)) => Ok(vec![specifier.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    PathsError::parse_config(path, "`extends` entries must be strings")
                })
            })
            .collect(),
        Some(_) => Err(PathsError::parse_config(
            path,
            "`extends` must be a string or an array of strings",
        )),
    }
}

/// Locate the file an `extends` entry refers to.
fn resolve_extends(specifier: &str, from: &Path, resolver: &Resolver) -> Result<PathBuf> {
    let dir = config_dir(from);
    let not_found = || PathsError::ExtendsNotFound {
        specifier: specifier.to_string(),
        from: from.to_path_buf(),
    };

    let is_path = specifier.starts_with('.') || Path::new(specifier).is_absolute();
    if is_path {
        let candidate = dir.join(specifier).clean();
        if candidate.is_file() {
            return Ok(candidate);
        }
        let with_json = PathBuf::from(format!("{}.json", candidate.display()));
        if with_json.is_file() {
            return Ok(with_json);
        }
        return Err(not_found());
    }

    let attempts = if specifier.ends_with(".json") {
        vec![specifier.to_string()]
    } else {
        vec![
            format!("{}/{}", specifier, TSCONFIG_FILE_NAME),
            format!("{}.json", specifier),
        ]
    };
    attempts
        .iter()
        .find_map(|attempt| resolver.resolve(dir, attempt).ok())
        .map(|resolution| resolution.path().to_path_buf())
        .ok_or_else(not_found)
}

/// Walk up from `start` looking for `file_name`.
pub fn find_config_file(start: &Path, file_name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

fn config_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}

/// Reduce tsconfig's JSON-with-comments dialect to plain JSON.
///
/// Removes `//` and `/* */` comments outside strings (newlines are kept so
/// parse errors point at the right line) and drops trailing commas before a
/// closing `}` or `]`.
pub fn strip_jsonc(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
            }
            '}' | ']' => {
                let trimmed_len = out.trim_end().len();
                if out[..trimmed_len].ends_with(',') {
                    out.remove(trimmed_len - 1);
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_strip_jsonc_comments() {
        let source = r#"{
            // line comment
            "a": "http://example.com", /* block
            comment */ "b": 1
        }"#;
        let value: Value = serde_json::from_str(&strip_jsonc(source)).unwrap();
        assert_eq!(value["a"], "http://example.com");
        assert_eq!(value["b"], 1);
    }

    #[test]
    fn test_strip_jsonc_trailing_commas() {
        let source = r#"{ "a": [1, 2, ], "b": { "c": "x", }, }"#;
        let value: Value = serde_json::from_str(&strip_jsonc(source)).unwrap();
        assert_eq!(value["a"].as_array().unwrap().len(), 2);
        assert_eq!(value["b"]["c"], "x");
    }

    #[test]
    fn test_strip_jsonc_keeps_string_contents() {
        let source = r#"{ "glob": "src/**/*", "escaped": "a\"//b", "comma": ",}" }"#;
        let value: Value = serde_json::from_str(&strip_jsonc(source)).unwrap();
        assert_eq!(value["glob"], "src/**/*");
        assert_eq!(value["escaped"], "a\"//b");
        assert_eq!(value["comma"], ",}");
    }

    #[test]
    fn test_base_url_defaults_to_config_dir() {
        let dir = TempDir::new().unwrap();
        let config = write(
            &dir,
            "tsconfig.json",
            r#"{ "compilerOptions": { "paths": { "~/*": ["*"] } } }"#,
        );

        let project = load_project_paths(&config).unwrap();
        assert_eq!(project.base_url, dir.path().to_path_buf().clean());
        assert_eq!(project.paths["~/*"], vec!["*"]);
    }

    #[test]
    fn test_base_url_relative_to_config() {
        let dir = TempDir::new().unwrap();
        let config = write(
            &dir,
            "tsconfig.json",
            r#"{ "compilerOptions": { "baseUrl": "./src", "paths": {} } }"#,
        );

        let project = load_project_paths(&config).unwrap();
        assert_eq!(project.base_url, dir.path().join("src").clean());
        assert!(project.paths.is_empty());
    }

    #[test]
    fn test_missing_compiler_options() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "tsconfig.json", "{}");

        let project = load_project_paths(&config).unwrap();
        assert!(project.paths.is_empty());
    }

    #[test]
    fn test_extends_inherits_paths_and_base_url() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "configs/base.json",
            r#"{ "compilerOptions": { "baseUrl": "..", "paths": { "@/*": ["src/*"] } } }"#,
        );
        let config = write(
            &dir,
            "tsconfig.json",
            r#"{ "extends": "./configs/base", "compilerOptions": { "strict": true } }"#,
        );

        let project = load_project_paths(&config).unwrap();
        assert_eq!(project.base_url, dir.path().to_path_buf().clean());
        assert_eq!(project.paths["@/*"], vec!["src/*"]);
    }

    #[test]
    fn test_extends_child_overrides_paths() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "base.json",
            r#"{ "compilerOptions": { "paths": { "@base/*": ["base/*"] } } }"#,
        );
        let config = write(
            &dir,
            "tsconfig.json",
            r#"{ "extends": "./base.json", "compilerOptions": { "paths": { "@app/*": ["app/*"] } } }"#,
        );

        let project = load_project_paths(&config).unwrap();
        assert!(project.paths.contains_key("@app/*"));
        assert!(!project.paths.contains_key("@base/*"));
    }

    #[test]
    fn test_extends_array_later_wins() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.json", r#"{ "compilerOptions": { "baseUrl": "a" } }"#);
        write(&dir, "b.json", r#"{ "compilerOptions": { "baseUrl": "b" } }"#);
        let config = write(&dir, "tsconfig.json", r#"{ "extends": ["./a.json", "./b.json"] }"#);

        let project = load_project_paths(&config).unwrap();
        assert_eq!(project.base_url, dir.path().join("b").clean());
    }

    #[test]
    fn test_paths_relative_to_declaring_config_without_base_url() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "shared/tsconfig.base.json",
            r#"{ "compilerOptions": { "paths": { "@/*": ["src/*"] } } }"#,
        );
        let config = write(
            &dir,
            "app/tsconfig.json",
            r#"{ "extends": "../shared/tsconfig.base.json" }"#,
        );

        let project = load_project_paths(&config).unwrap();
        assert_eq!(project.base_url, dir.path().join("shared").clean());
    }

    #[test]
    fn test_extends_package() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "node_modules/@tsconfig/shared/package.json",
            r#"{ "name": "@tsconfig/shared", "version": "1.0.0" }"#,
        );
        write(
            &dir,
            "node_modules/@tsconfig/shared/tsconfig.json",
            r##"{ "compilerOptions": { "paths": { "#lib/*": ["lib/*"] } } }"##,
        );
        let config = write(&dir, "tsconfig.json", r#"{ "extends": "@tsconfig/shared" }"#);

        let project = load_project_paths(&config).unwrap();
        assert_eq!(project.paths["#lib/*"], vec!["lib/*"]);
    }

    #[test]
    fn test_extends_not_found() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "tsconfig.json", r#"{ "extends": "./missing.json" }"#);

        assert!(matches!(
            load_project_paths(&config),
            Err(PathsError::ExtendsNotFound { .. })
        ));
    }

    #[test]
    fn test_circular_extends() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.json", r#"{ "extends": "./tsconfig.json" }"#);
        let config = write(&dir, "tsconfig.json", r#"{ "extends": "./a.json" }"#);

        assert!(matches!(
            load_project_paths(&config),
            Err(PathsError::CircularExtends { .. })
        ));
    }

    #[test]
    fn test_diamond_extends_is_not_circular() {
        let dir = TempDir::new().unwrap();
        write(&dir, "root.json", r#"{ "compilerOptions": { "baseUrl": "." } }"#);
        write(&dir, "a.json", r#"{ "extends": "./root.json" }"#);
        write(&dir, "b.json", r#"{ "extends": "./root.json" }"#);
        let config = write(&dir, "tsconfig.json", r#"{ "extends": ["./a.json", "./b.json"] }"#);

        assert!(load_project_paths(&config).is_ok());
    }

    #[test]
    fn test_unreadable_config() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_project_paths(&dir.path().join("tsconfig.json")),
            Err(PathsError::ReadConfig { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "tsconfig.json", "{ compilerOptions: ");
        assert!(matches!(
            load_project_paths(&config),
            Err(PathsError::ParseConfig { .. })
        ));
    }

    #[test]
    fn test_invalid_paths_shape() {
        let dir = TempDir::new().unwrap();
        let config = write(
            &dir,
            "tsconfig.json",
            r#"{ "compilerOptions": { "paths": { "@/*": "src/*" } } }"#,
        );
        assert!(matches!(
            load_project_paths(&config),
            Err(PathsError::InvalidPaths { .. })
        ));
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "tsconfig.json", "{}");
        let nested = dir.path().join("src/deep/er");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file(&nested, TSCONFIG_FILE_NAME), Some(config));
    }
}
