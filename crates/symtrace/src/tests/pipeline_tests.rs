use std::path::Path;
use std::sync::Arc;

use symtrace_config::{AliasRule, AliasTable};

use super::{analyze, deps, ids, sorted};
use crate::frontend::{FrontEndError, OxcFrontEnd, StatementDescriptor, SyntaxFrontEnd};
use crate::node::NodeKind;
use crate::scope::ResolutionMode;
use crate::source::SourceType;
use crate::test_utils::TestProject;
use crate::{Error, ResolvedModule, RuntimeError, TraceSummary};

#[test]
fn alias_table_and_root_prefix_resolution() {
    let aliases = AliasTable::new().with_rule(AliasRule::new("#shared/*", ["/project/lib/shared/*"]));
    let analysis = analyze(
        TestProject::new()
            .aliases(aliases)
            .file("lib/shared/format.ts", "export const format = (s: string) => s.trim();")
            .file("src/utils.ts", "export const clamp = (n: number) => Math.max(0, n);")
            .file(
                "src/app.ts",
                "import { format } from '#shared/format';\n\
                 import { clamp } from '@/utils';\n\
                 format(String(clamp(1)));",
            ),
    );

    let expected = ids(&analysis, [("src/app.ts", "format(String")]);
    assert_eq!(sorted(&deps(&analysis, "lib/shared/format.ts", "format").external), expected);
    assert_eq!(sorted(&deps(&analysis, "src/utils.ts", "clamp").external), expected);

    let import = analysis.id_containing("src/app.ts", "#shared").unwrap();
    assert_eq!(
        analysis.result.indices.resolution(import),
        Some(&ResolvedModule::Local("/project/lib/shared/format.ts".into()))
    );
}

#[test]
fn summary_counts() {
    let analysis = analyze(
        TestProject::new()
            .file(
                "a.ts",
                "export const used = 1;\n\
                 export const unused = 2;\n\
                 const local = used + 1;\n\
                 console.log(local);",
            )
            .file("b.ts", "import { used } from './a';\nused;")
            .file("broken.ts", "export const = ;"),
    );

    assert_eq!(
        analysis.result.summary,
        TraceSummary {
            declarations: 3,
            with_internal: 2,
            with_external: 1,
            orphaned: 1,
            skipped_files: 1,
            approximate_fragments: 0,
            truncated: 0,
        }
    );
    let orphaned: Vec<_> = analysis
        .result
        .orphaned()
        .map(|declaration| declaration.node.declared_names()[0].clone())
        .collect();
    assert_eq!(orphaned, vec!["unused"]);

    let report = analysis.result.to_string();
    assert!(report.contains("Declarations:          3"));
    assert!(report.contains("broken.ts"));
}

/// Oxc front end whose plain statements come back with unbalanced text.
#[derive(Debug)]
struct GarblingFrontEnd;

impl SyntaxFrontEnd for GarblingFrontEnd {
    fn parse_statements(
        &self,
        source: &str,
        source_type: SourceType,
        path: &Path,
    ) -> Result<Vec<StatementDescriptor>, FrontEndError> {
        let mut statements = OxcFrontEnd.parse_statements(source, source_type, path)?;
        for statement in &mut statements {
            if statement.syntax == NodeKind::Other {
                statement.text.push_str(" )(");
            }
        }
        Ok(statements)
    }
}

#[test]
fn unparseable_fragments_fall_back_to_lexical_matching() {
    let project = TestProject::new()
        .file("a.ts", "export const value = 1;\nconsole.log('value', value);\nfunction f(value: number) { return value; }")
        .file("b.ts", "import { value } from './a';\nrun(value);");
    let result = project
        .analyzer()
        .front_end(Arc::new(GarblingFrontEnd))
        .analyze()
        .unwrap();

    assert_eq!(result.summary.approximate_fragments, 2);
    let declaration = result
        .declarations
        .values()
        .find(|d| d.node.declared_names() == ["value"])
        .unwrap();
    // Lexical matching still finds both garbled statements; the scoped
    // function declaration correctly does not count.
    assert_eq!(declaration.dependencies.internal.len(), 1);
    assert_eq!(declaration.dependencies.external.len(), 1);

    let console = result
        .indices
        .project()
        .values()
        .find(|node| node.text.starts_with("console.log"))
        .unwrap();
    let refs = crate::ScopeResolver::new().analyze(&console.text, console.source_type);
    assert_eq!(refs.mode(), ResolutionMode::Approximate);
}

#[test]
fn ids_are_deterministic_per_run() {
    let project = TestProject::new()
        .file("a.ts", "export const a1 = 1;\nexport const a2 = a1;")
        .file("b.ts", "import { a1 } from './a';\nexport const b1 = a1;");

    let first = analyze(project.clone());
    let second = analyze(project);

    let layout = |analysis: &crate::test_utils::ProjectAnalysis| {
        let base = analysis.result.indices.project().keys().next().unwrap().get();
        analysis
            .result
            .indices
            .project()
            .values()
            .map(|node| (node.id.get() - base, node.text.clone()))
            .collect::<Vec<_>>()
    };
    let first_layout = layout(&first);
    assert_eq!(first_layout, layout(&second));
    let offsets: Vec<u64> = first_layout.iter().map(|(offset, _)| *offset).collect();
    assert_eq!(offsets, vec![0, 1, 2, 3]);
}

#[test]
fn dedicated_pool_gives_identical_results() {
    let project = TestProject::new()
        .file("a.ts", "export const shared = 1;\nexport const other = shared;")
        .file("b.ts", "import { shared, other } from './a';\nuse(shared, other);")
        .file("c.ts", "export * from './a';")
        .file("d.ts", "import { other } from './c';\nuse(other);");

    let pooled = project.analyzer().threads(1).analyze().unwrap();
    let global = project.analyzer().analyze().unwrap();

    let shape = |result: &crate::AnalysisResult| {
        result
            .declarations
            .values()
            .map(|d| {
                (
                    d.node.declared_names().to_vec(),
                    d.dependencies.internal.len(),
                    d.dependencies.external.len(),
                    d.dependencies.reexports.len(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&pooled), shape(&global));
    assert_eq!(pooled.summary, global.summary);
}

#[test]
fn missing_root_is_an_error() {
    let project = TestProject::new().file("a.ts", "export const a = 1;");
    let err = project.analyzer().root("/elsewhere").analyze().unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::FileNotFound(_))));
}

#[test]
fn declaration_map_serializes() {
    let analysis = analyze(
        TestProject::new()
            .file("a.ts", "export const a = 1;")
            .file("b.ts", "import { a } from './a';\na;"),
    );

    let json: serde_json::Value = serde_json::from_str(&analysis.result.to_json().unwrap()).unwrap();
    assert_eq!(json["summary"]["declarations"], 1);
    let (_, declaration) = json["declarations"].as_object().unwrap().iter().next().unwrap();
    assert_eq!(declaration["node"]["kind"]["kind"], "exportedDeclaration");
    assert_eq!(declaration["dependencies"]["external"].as_array().unwrap().len(), 1);
}

#[test]
fn owner_file_and_grouping() {
    let analysis = analyze(
        TestProject::new()
            .file("a.ts", "export const a = 1;")
            .file("b.ts", "import { a } from './a';\nuse(a);\nagain(a);")
            .file("c.ts", "import { a } from './a';\nuse(a);"),
    );

    let declaration = analysis.declaration("a.ts", "a").unwrap();
    let trace = &analysis.result.trace;
    assert_eq!(trace.owner_file(declaration.node.id), Some(project_path("a.ts").as_path()));

    let grouped = trace.consumers_by_file(declaration.node.id);
    let counts: Vec<usize> = grouped.values().map(Vec::len).collect();
    assert_eq!(counts, vec![2, 1]);
    assert_eq!(analysis.files_of(declaration.dependencies.external.iter().copied()), ["b.ts", "c.ts"]);
}

fn project_path(relative: &str) -> std::path::PathBuf {
    Path::new(crate::test_utils::TEST_ROOT).join(relative)
}
