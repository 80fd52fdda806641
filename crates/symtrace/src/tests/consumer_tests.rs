use super::{analyze, deps, id, ids, sorted};
use crate::test_utils::TestProject;

#[test]
fn declaration_without_importers_has_no_external_consumers() {
    let analysis = analyze(
        TestProject::new()
            .file("a.ts", "export const lonely = 1;")
            .file("b.ts", "export const other = 2;\nconsole.log(other);"),
    );

    let lonely = deps(&analysis, "a.ts", "lonely");
    assert!(lonely.external.is_empty());
    assert!(lonely.internal.is_empty());
    assert!(lonely.is_orphaned());
}

#[test]
fn aliased_named_import_is_an_external_consumer() {
    let analysis = analyze(
        TestProject::new()
            .file(
                "math.ts",
                "export function add(a: number, b: number) { return a + b; }\n\
                 export const twice = (x: number) => add(x, x);",
            )
            .file(
                "main.ts",
                "import { add as plus } from './math';\n\
                 console.log(plus(1, 2));\n\
                 const unrelated = 'add';",
            ),
    );

    let add = deps(&analysis, "math.ts", "add");
    assert_eq!(sorted(&add.internal), ids(&analysis, [("math.ts", "twice")]));
    assert_eq!(sorted(&add.external), ids(&analysis, [("main.ts", "console.log")]));
}

#[test]
fn own_id_is_never_a_consumer() {
    let analysis = analyze(
        TestProject::new()
            .file("a.ts", "export function recurse(n: number): number { return n ? recurse(n - 1) : 0; }")
            .file("b.ts", "import { recurse } from './a';\nrecurse(3);"),
    );

    let declaration = analysis.declaration("a.ts", "recurse").unwrap();
    let result = &declaration.dependencies;
    assert!(!result.internal.contains(&declaration.node.id));
    assert!(!result.external.contains(&declaration.node.id));
    assert_eq!(result.external.len(), 1);
}

#[test]
fn shadowed_locals_are_not_consumers() {
    let analysis = analyze(TestProject::new().file(
        "shadow.ts",
        "export const shadowed = \"x\";\n\
         function f(){ const shadowed = \"y\"; console.log(shadowed); }\n\
         function g(){ console.log(shadowed); }",
    ));

    let shadowed = deps(&analysis, "shadow.ts", "shadowed");
    assert_eq!(sorted(&shadowed.internal), ids(&analysis, [("shadow.ts", "function g")]));
}

#[test]
fn strings_and_comments_are_not_usages() {
    let analysis = analyze(
        TestProject::new()
            .file(
                "a.ts",
                "export const token = 1;\n\
                 // token is mentioned here\n\
                 const s = \"token\";\n\
                 const t = `token`;",
            )
            .file(
                "b.ts",
                "import { token } from './a';\n\
                 const msg = 'token';\n\
                 /* token */ const other = 1;",
            ),
    );

    let token = deps(&analysis, "a.ts", "token");
    assert!(token.internal.is_empty());
    assert!(token.external.is_empty());
}

#[test]
fn namespace_import_counts_for_every_export() {
    let analysis = analyze(
        TestProject::new()
            .file("lib.ts", "export const alpha = 1;\nexport const beta = 2;")
            .file("use.ts", "import * as lib from './lib';\nexport const sum = lib.alpha;"),
    );

    let expected = ids(&analysis, [("use.ts", "sum")]);
    assert_eq!(sorted(&deps(&analysis, "lib.ts", "alpha").external), expected);
    assert_eq!(sorted(&deps(&analysis, "lib.ts", "beta").external), expected);
}

#[test]
fn default_export_is_reached_under_any_local_name() {
    let analysis = analyze(
        TestProject::new()
            .file("Button.tsx", "export default function Button() { return null; }")
            .file("App.tsx", "import MyButton from './Button';\nexport const App = () => <MyButton />;")
            .file("Other.tsx", "import { Button } from './Button';\nexport const Other = () => <Button />;"),
    );

    let button = deps(&analysis, "Button.tsx", "Button");
    // A named import of `Button` asks for an export that does not exist.
    assert_eq!(sorted(&button.external), ids(&analysis, [("App.tsx", "App")]));
}

#[test]
fn anonymous_default_export_is_traced_but_never_scanned_internally() {
    let analysis = analyze(
        TestProject::new()
            .file("config.ts", "export default { debug: true };\nconst fallback = 'default';")
            .file("main.ts", "import config from './config';\nif (config.debug) {}"),
    );

    let config = deps(&analysis, "config.ts", "default");
    assert!(config.internal.is_empty());
    assert_eq!(sorted(&config.external), ids(&analysis, [("main.ts", "if (config.debug)")]));
}

#[test]
fn local_export_aliases_are_followed() {
    let analysis = analyze(
        TestProject::new()
            .file("a.ts", "const hidden = 1;\nexport { hidden as visible };")
            .file("b.ts", "import { visible } from './a';\nuse(visible);")
            .file("c.ts", "import { hidden } from './a';\nuse(hidden);"),
    );

    let hidden = deps(&analysis, "a.ts", "hidden");
    assert_eq!(sorted(&hidden.internal), ids(&analysis, [("a.ts", "export {")]));
    assert_eq!(sorted(&hidden.external), ids(&analysis, [("b.ts", "use(visible)")]));
}

#[test]
fn local_export_statements_are_internal_consumers() {
    let analysis = analyze(
        TestProject::new()
            .file("a.ts", "const a = 1;
export { a };
export default a;")
            .file("b.ts", "import main, { a } from './a';
use(main, a);"),
    );

    let a = deps(&analysis, "a.ts", "a");
    assert_eq!(
        sorted(&a.internal),
        ids(&analysis, [("a.ts", "export { a }"), ("a.ts", "export default a")])
    );
    assert_eq!(sorted(&a.external), ids(&analysis, [("b.ts", "use(main, a)")]));
    assert!(!a.is_orphaned());
}

#[test]
fn importer_forwarding_its_import_is_followed() {
    let analysis = analyze(
        TestProject::new()
            .file("core.ts", "export const engine = 1;")
            .file("facade.ts", "import { engine } from './core';\nexport { engine as motor };")
            .file("app.ts", "import { motor } from './facade';\nstart(motor);"),
    );

    let engine = deps(&analysis, "core.ts", "engine");
    // The facade's export list uses the imported binding, then forwards it.
    assert_eq!(
        sorted(&engine.external),
        ids(&analysis, [("facade.ts", "export {"), ("app.ts", "start(motor)")])
    );
}

#[test]
fn jsx_and_type_references_are_consumers() {
    let analysis = analyze(
        TestProject::new()
            .file(
                "Widget.tsx",
                "function Icon() { return null; }\n\
                 export function Widget() { return <Icon />; }",
            )
            .file("types.ts", "export interface Props { label: string }")
            .file(
                "view.ts",
                "import type { Props } from './types';\nexport const defaults: Props = { label: '' };",
            ),
    );

    assert_eq!(
        sorted(&deps(&analysis, "Widget.tsx", "Icon").internal),
        ids(&analysis, [("Widget.tsx", "export function Widget")])
    );
    assert_eq!(
        sorted(&deps(&analysis, "types.ts", "Props").external),
        ids(&analysis, [("view.ts", "defaults")])
    );
}

#[test]
fn destructured_declarations_trace_each_name() {
    let analysis = analyze(
        TestProject::new()
            .file(
                "a.ts",
                "export const { first, nested: { second = 2 }, ...rest } = source();\n\
                 const [head, , tail] = list();\n\
                 console.log(second, tail);",
            )
            .file("b.ts", "import { first } from './a';\nfirst;"),
    );

    let pattern = analysis.declaration("a.ts", "second").unwrap();
    assert_eq!(pattern.node.declared_names(), ["first", "second", "rest"]);
    let log = id(&analysis, "a.ts", "console.log");
    assert_eq!(sorted(&pattern.dependencies.internal), vec![log]);
    assert_eq!(
        sorted(&pattern.dependencies.external),
        ids(&analysis, [("b.ts", "first;")])
    );
    assert_eq!(sorted(&deps(&analysis, "a.ts", "tail").internal), vec![log]);
}

#[test]
fn unresolved_and_external_specifiers_are_inert() {
    let analysis = analyze(
        TestProject::new()
            .file("a.ts", "export const value = 1;")
            .file(
                "b.ts",
                "import { value } from 'some-package';\n\
                 import { other } from './missing';\n\
                 value + other;",
            ),
    );

    assert!(deps(&analysis, "a.ts", "value").external.is_empty());
    assert!(analysis.result.warnings().is_empty());
}
