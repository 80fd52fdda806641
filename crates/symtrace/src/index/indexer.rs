//! Builds [`Indices`] from a list of source files.
//!
//! Files are read, parsed and their specifiers resolved in parallel; results
//! are merged by a single writer in input order, so node ids follow
//! (file order, statement order).

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use super::{FileEntry, IndexWarning, IndexWarningKind, Indices};
use crate::frontend::{FrontEndError, StatementDescriptor, SyntaxFrontEnd};
use crate::node::{NodeId, TopLevelNode};
use crate::resolver::{ModuleResolver, ResolvedModule};
use crate::runtime::Runtime;
use crate::source::SourceFile;

/// One file after the parallel phase.
struct ParsedFile<'f> {
    source: &'f SourceFile,
    statements: Vec<StatementDescriptor>,
    resolutions: Vec<Option<ResolvedModule>>,
}

pub struct ModuleIndexer {
    runtime: Arc<dyn Runtime>,
    front_end: Arc<dyn SyntaxFrontEnd>,
    resolver: ModuleResolver,
    max_file_size: usize,
}

impl ModuleIndexer {
    pub fn new(
        runtime: Arc<dyn Runtime>,
        front_end: Arc<dyn SyntaxFrontEnd>,
        resolver: ModuleResolver,
        max_file_size: usize,
    ) -> Self {
        Self {
            runtime,
            front_end,
            resolver,
            max_file_size,
        }
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Resolve `specifier` as written in a file of `from_dir`.
    pub fn resolve_module_path(&self, specifier: &str, from_dir: &Path) -> ResolvedModule {
        self.resolver.resolve(specifier, from_dir, self.runtime.as_ref())
    }

    /// Index every file. Unreadable, oversized or unparseable files are
    /// skipped and reported in [`Indices::warnings`].
    pub fn index_all(&self, files: &[SourceFile]) -> Indices {
        let mut seen = FxHashSet::default();
        let unique: Vec<&SourceFile> = files
            .iter()
            .filter(|file| seen.insert(file.absolute_path.clone()))
            .collect();
        if unique.len() < files.len() {
            tracing::debug!("Ignoring {} duplicate file entries", files.len() - unique.len());
        }

        let outcomes: Vec<Result<ParsedFile<'_>, IndexWarning>> =
            unique.par_iter().map(|file| self.parse_file(file)).collect();

        let total: usize = outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().ok())
            .map(|parsed| parsed.statements.len())
            .sum();
        let mut next_id = NodeId::allocate_block(total);

        let mut indices = Indices::default();
        for outcome in outcomes {
            let parsed = match outcome {
                Ok(parsed) => parsed,
                Err(warning) => {
                    tracing::warn!("Skipping {}", warning);
                    indices.warnings.push(warning);
                    continue;
                }
            };

            let source_type = parsed.source.source_type();
            let mut node_ids = Vec::with_capacity(parsed.statements.len());
            for (statement, resolution) in parsed.statements.into_iter().zip(parsed.resolutions) {
                let id = NodeId::from_raw(next_id);
                next_id += 1;
                node_ids.push(id);
                if let Some(resolution) = resolution {
                    indices.resolutions.insert(id, resolution);
                }
                indices.insert(TopLevelNode {
                    id,
                    file: parsed.source.absolute_path.clone(),
                    kind: statement.syntax,
                    span: statement.span,
                    text: statement.text,
                    source_type,
                    is_type_only: statement.is_type_only,
                });
            }

            tracing::debug!("Indexed {} ({} nodes)", parsed.source, node_ids.len());
            indices.files.insert(
                parsed.source.absolute_path.clone(),
                FileEntry {
                    source: parsed.source.clone(),
                    source_type,
                    nodes: node_ids,
                },
            );
        }

        tracing::info!(
            files = indices.files.len(),
            nodes = indices.project.len(),
            imports = indices.imports.len(),
            exports = indices.exports.len(),
            declarations = indices.declarations.len(),
            skipped = indices.warnings.len(),
            "Indexing complete"
        );
        indices
    }

    fn parse_file<'f>(&self, source: &'f SourceFile) -> Result<ParsedFile<'f>, IndexWarning> {
        let path = source.absolute_path.as_path();
        let warn = |kind| IndexWarning {
            path: path.to_path_buf(),
            kind,
        };

        let source_type = source.source_type();
        if !source_type.is_javascript_like() {
            return Err(warn(IndexWarningKind::Unsupported));
        }

        let text = self.read_source(path).map_err(warn)?;
        let statements = self
            .front_end
            .parse_statements(&text, source_type, path)
            .map_err(|e| match e {
                FrontEndError::Parse { message, .. } => warn(IndexWarningKind::Parse(message)),
                FrontEndError::Unsupported { .. } => warn(IndexWarningKind::Unsupported),
            })?;

        let from_dir = source.dir();
        let resolutions = statements
            .iter()
            .map(|statement| {
                statement
                    .syntax
                    .module_source()
                    .map(|specifier| self.resolve_module_path(specifier, from_dir))
            })
            .collect();

        Ok(ParsedFile {
            source,
            statements,
            resolutions,
        })
    }

    /// Read a file with size validation.
    fn read_source(&self, path: &Path) -> Result<String, IndexWarningKind> {
        if let Ok(metadata) = self.runtime.metadata(path) {
            if metadata.size > self.max_file_size as u64 {
                return Err(IndexWarningKind::TooLarge {
                    size: metadata.size,
                    max: self.max_file_size,
                });
            }
        }

        let bytes = self
            .runtime
            .read_file(path)
            .map_err(|e| IndexWarningKind::Read(e.to_string()))?;

        // Metadata may be unavailable; check again after reading.
        if bytes.len() > self.max_file_size {
            return Err(IndexWarningKind::TooLarge {
                size: bytes.len() as u64,
                max: self.max_file_size,
            });
        }

        String::from_utf8(bytes).map_err(|_| IndexWarningKind::InvalidUtf8)
    }
}
