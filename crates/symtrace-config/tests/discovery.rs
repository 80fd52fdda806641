//! Tests for alias-table discovery from tsconfig/jsconfig files.

use std::fs;

use path_clean::PathClean;
use symtrace_config::AliasTable;
use tempfile::TempDir;

#[test]
fn prefers_tsconfig_over_jsconfig() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("tsconfig.json"),
        r#"{ "compilerOptions": { "paths": { "@ts/*": ["ts/*"] } } }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("jsconfig.json"),
        r#"{ "compilerOptions": { "paths": { "@js/*": ["js/*"] } } }"#,
    )
    .unwrap();

    let table = AliasTable::discover(dir.path()).unwrap();
    assert_eq!(table.rules.len(), 1);
    assert_eq!(table.rules[0].pattern, "@ts/*");
}

#[test]
fn falls_back_to_jsconfig() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("jsconfig.json"),
        r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "~lib": ["lib/index.js"] } } }"#,
    )
    .unwrap();

    let table = AliasTable::discover(dir.path()).unwrap();
    let root = dir.path().to_path_buf().clean();
    assert_eq!(table.base_dir, Some(root.clone()));
    assert_eq!(
        table.rules[0].targets,
        vec![root.join("lib/index.js").to_string_lossy().into_owned()]
    );
}

#[test]
fn inherits_paths_through_extends() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("config")).unwrap();
    fs::write(
        dir.path().join("config/base.json"),
        r#"{ "compilerOptions": { "baseUrl": "..", "paths": { "@app/*": ["app/*"] } } }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("tsconfig.json"),
        r#"{ "extends": "./config/base", "compilerOptions": { "strict": true } }"#,
    )
    .unwrap();

    let table = AliasTable::discover(dir.path()).unwrap();
    let root = dir.path().to_path_buf().clean();
    assert_eq!(table.base_dir, Some(root.clone()));
    assert_eq!(table.rules.len(), 1);
    assert_eq!(
        table.rules[0].targets,
        vec![root.join("app/*").to_string_lossy().into_owned()]
    );
}

#[test]
fn child_paths_replace_inherited_paths() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("base.json"),
        r#"{ "compilerOptions": { "paths": { "@old/*": ["old/*"] } } }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("tsconfig.json"),
        r#"{ "extends": "./base.json", "compilerOptions": { "paths": { "@new/*": ["new/*"] } } }"#,
    )
    .unwrap();

    let table = AliasTable::discover(dir.path()).unwrap();
    let patterns: Vec<_> = table.rules.iter().map(|r| r.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["@new/*"]);
}

#[test]
fn invalid_json_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tsconfig.json"), "{ not json").unwrap();

    assert!(AliasTable::discover(dir.path()).is_err());
}
