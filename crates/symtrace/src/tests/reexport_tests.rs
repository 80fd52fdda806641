use std::time::{Duration, Instant};

use symtrace_config::EngineSettings;

use super::{analyze, deps, id, ids, sorted};
use crate::test_utils::TestProject;

/// `core.ts` exports `deep`; `b1` .. `b<length>` forward it one hop each and
/// `app.ts` imports it from the last barrel.
fn chain(length: usize) -> TestProject {
    let mut project = TestProject::new().file("src/core.ts", "export const deep = 1;");
    for hop in 1..=length {
        let source = if hop == 1 {
            "./core".to_string()
        } else {
            format!("./b{}", hop - 1)
        };
        project = project.file(
            &format!("src/b{hop}.ts"),
            &format!("export {{ deep }} from '{source}';"),
        );
    }
    project.file(
        "src/app.ts",
        &format!("import {{ deep }} from './b{length}';\nconsole.log(deep);"),
    )
}

#[test]
fn reexport_chains_reach_the_final_consumer() {
    for length in 1..=12 {
        let analysis = analyze(chain(length));
        let deep = deps(&analysis, "src/core.ts", "deep");

        assert_eq!(
            sorted(&deep.external),
            ids(&analysis, [("src/app.ts", "console.log")]),
            "chain of {length}"
        );
        assert_eq!(deep.reexports.len(), length, "chain of {length}");
        assert!(!deep.truncated);
    }
}

#[test]
fn renaming_hops_are_followed() {
    let analysis = analyze(
        TestProject::new()
            .file("Button.tsx", "export default function Button() { return null; }")
            .file("ui.ts", "export { default as PrimaryButton } from './Button';")
            .file("index.ts", "export { PrimaryButton as Button } from './ui';")
            .file("App.tsx", "import { Button } from './index';\nexport const App = () => <Button />;"),
    );

    let button = deps(&analysis, "Button.tsx", "Button");
    assert_eq!(sorted(&button.external), ids(&analysis, [("App.tsx", "export const App")]));
    assert_eq!(
        sorted(&button.reexports),
        ids(&analysis, [("ui.ts", "PrimaryButton"), ("index.ts", "Button")])
    );
}

#[test]
fn circular_reexports_terminate() {
    let analysis = analyze(
        TestProject::new()
            .file("a.ts", "export const x = 1;\nexport * from './b';")
            .file("b.ts", "export * from './c';")
            .file("c.ts", "export * from './a';")
            .file("d.ts", "import { x } from './c';\nuse(x);"),
    );

    let x = deps(&analysis, "a.ts", "x");
    assert_eq!(sorted(&x.external), ids(&analysis, [("d.ts", "use(x)")]));
    // The star export in a.ts itself belongs to the declaring file.
    assert_eq!(
        sorted(&x.reexports),
        ids(&analysis, [("b.ts", "export *"), ("c.ts", "export *")])
    );
}

#[test]
fn mutual_star_exports_without_consumers_terminate() {
    let analysis = analyze(
        TestProject::new()
            .file("a.ts", "export const ping = 1;\nexport * from './b';")
            .file("b.ts", "export const pong = 2;\nexport * from './a';"),
    );

    assert!(deps(&analysis, "a.ts", "ping").external.is_empty());
    assert!(deps(&analysis, "b.ts", "pong").external.is_empty());
    assert_eq!(analysis.result.summary.truncated, 0);
}

/// `m0` .. `m<size - 1>`, each `export *` from every other; `m0` declares
/// `x` and `app.ts` imports it through `m1`.
fn star_mesh(size: usize) -> TestProject {
    let mut project = TestProject::new();
    for barrel in 0..size {
        let mut text = String::new();
        if barrel == 0 {
            text.push_str("export const x = 1;\n");
        }
        for other in (0..size).filter(|&other| other != barrel) {
            text.push_str(&format!("export * from './m{other}';\n"));
        }
        project = project.file(&format!("m{barrel}.ts"), &text);
    }
    project.file("app.ts", "import { x } from './m1';\nuse(x);")
}

#[test]
fn dense_star_mesh_is_explored_once_per_barrel() {
    let started = Instant::now();
    let analysis = analyze(star_mesh(12));
    assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());

    let x = deps(&analysis, "m0.ts", "x");
    assert_eq!(sorted(&x.external), ids(&analysis, [("app.ts", "use(x)")]));
    // Every star of m1 .. m11; those of m0 stay in the declaring file.
    assert_eq!(x.reexports.len(), 11 * 11);
    assert!(!x.truncated);

    let limited = analyze(star_mesh(12).settings(EngineSettings {
        max_trace_depth: 4,
        ..EngineSettings::default()
    }));
    let x = deps(&limited, "m0.ts", "x");
    assert_eq!(sorted(&x.external), ids(&limited, [("app.ts", "use(x)")]));
    assert!(started.elapsed() < Duration::from_secs(10), "took {:?}", started.elapsed());
}

#[test]
fn star_as_namespace_reexport() {
    let analysis = analyze(
        TestProject::new()
            .file("core.ts", "export const value = 1;\nexport const unused = 2;")
            .file("index.ts", "export * as core from './core';")
            .file("app.ts", "import { core } from './index';\nuse(core.value);"),
    );

    let expected = ids(&analysis, [("app.ts", "use(core.value)")]);
    assert_eq!(sorted(&deps(&analysis, "core.ts", "value").external), expected);
    // Namespace bindings stand for every export of the module.
    assert_eq!(sorted(&deps(&analysis, "core.ts", "unused").external), expected);
}

#[test]
fn star_reexport_does_not_forward_default() {
    let analysis = analyze(
        TestProject::new()
            .file("core.ts", "export default function main() {}\nexport const named = 1;")
            .file("index.ts", "export * from './core';")
            .file("app.ts", "import main, { named } from './index';\nmain(named);"),
    );

    assert!(deps(&analysis, "core.ts", "main").external.is_empty());
    assert_eq!(
        sorted(&deps(&analysis, "core.ts", "named").external),
        ids(&analysis, [("app.ts", "main(named)")])
    );
}

#[test]
fn diamond_paths_are_deduplicated() {
    let analysis = analyze(
        TestProject::new()
            .file("core.ts", "export const shared = 1;")
            .file("left.ts", "export { shared } from './core';")
            .file("right.ts", "export * from './core';")
            .file(
                "app.ts",
                "import { shared } from './left';\n\
                 import { shared as again } from './right';\n\
                 use(shared, again);",
            ),
    );

    let shared = deps(&analysis, "core.ts", "shared");
    assert_eq!(sorted(&shared.external), ids(&analysis, [("app.ts", "use(")]));
    assert_eq!(
        sorted(&shared.reexports),
        ids(&analysis, [("left.ts", "export"), ("right.ts", "export")])
    );
}

#[test]
fn depth_limit_truncates_long_chains() {
    let settings = EngineSettings {
        max_trace_depth: 3,
        ..EngineSettings::default()
    };
    let analysis = analyze(chain(5).settings(settings));

    let deep = deps(&analysis, "src/core.ts", "deep");
    assert!(deep.truncated);
    assert!(!deep.external.contains(&id(&analysis, "src/app.ts", "console.log")));
    assert_eq!(analysis.result.summary.truncated, 1);

    // Short chains are unaffected by the same limit.
    let short = analyze(chain(1).settings(EngineSettings {
        max_trace_depth: 3,
        ..EngineSettings::default()
    }));
    assert!(!deps(&short, "src/core.ts", "deep").truncated);
    assert_eq!(deps(&short, "src/core.ts", "deep").external.len(), 1);
}
