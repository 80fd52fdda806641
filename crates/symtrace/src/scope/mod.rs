//! Scope-aware usage resolution.
//!
//! A fragment is parsed as a module and walked once. Every identifier
//! reference (type references and plain JSX tags included) that no enclosing
//! scope of the fragment rebinds is recorded as free. Fragments that fail to
//! parse fall back to [`lexical`] matching and report
//! [`ResolutionMode::Approximate`].

mod hoist;
pub(crate) mod lexical;
mod visitor;

use memchr::memmem;
use oxc_allocator::Allocator;
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::frontend::oxc_source_type;
use crate::source::SourceType;

use visitor::ReferenceCollector;

/// How an answer was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionMode {
    /// From a full parse with shadowing applied.
    Scoped,
    /// From the lexical fallback; shadowing is ignored.
    Approximate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub referenced: bool,
    pub mode: ResolutionMode,
}

/// Free names of one fragment, computed once and queried per name.
#[derive(Debug, Clone)]
pub struct FragmentReferences<'t> {
    text: &'t str,
    mode: ResolutionMode,
    free: FxHashSet<String>,
}

impl<'t> FragmentReferences<'t> {
    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Names referenced without local shadowing. Empty in approximate mode.
    pub fn free_names(&self) -> impl Iterator<Item = &str> {
        self.free.iter().map(String::as_str)
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        let referenced = if name.is_empty() || memmem::find(self.text.as_bytes(), name.as_bytes()).is_none() {
            false
        } else {
            match self.mode {
                ResolutionMode::Scoped => self.free.contains(name),
                ResolutionMode::Approximate => lexical::mentions(self.text, name),
            }
        };
        Resolution {
            referenced,
            mode: self.mode,
        }
    }
}

/// Answers "does this fragment use `name` in its enclosing binding?".
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeResolver;

impl ScopeResolver {
    pub fn new() -> Self {
        Self
    }

    /// Walk `fragment` once and collect its free names.
    pub fn analyze<'t>(&self, fragment: &'t str, source_type: SourceType) -> FragmentReferences<'t> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, fragment, oxc_source_type(source_type, None)).parse();

        if ret.panicked || !ret.errors.is_empty() {
            tracing::trace!(
                errors = ret.errors.len(),
                "Fragment did not parse, using lexical matching"
            );
            return FragmentReferences {
                text: fragment,
                mode: ResolutionMode::Approximate,
                free: FxHashSet::default(),
            };
        }

        let mut collector = ReferenceCollector::new();
        collector.visit_program(&ret.program);
        FragmentReferences {
            text: fragment,
            mode: ResolutionMode::Scoped,
            free: collector.free,
        }
    }

    pub fn is_name_referenced(&self, fragment: &str, name: &str, source_type: SourceType) -> Resolution {
        self.analyze(fragment, source_type).resolve(name)
    }
}
