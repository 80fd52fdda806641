//! Persistent visited set for re-export exploration.
//!
//! Each branch of the exploration extends its parent's set without copying
//! it; siblings never observe each other's entries.

use std::path::Path;
use std::sync::Arc;

#[derive(Debug)]
struct Link<'a> {
    file: &'a Path,
    name: &'a str,
    len: usize,
    parent: Option<Arc<Link<'a>>>,
}

/// Immutable set of `(file, exported name)` pairs, shared structurally.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet<'a> {
    head: Option<Arc<Link<'a>>>,
}

impl<'a> VisitedSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new set holding every entry of `self` plus `(file, name)`.
    pub fn with(&self, file: &'a Path, name: &'a str) -> Self {
        Self {
            head: Some(Arc::new(Link {
                file,
                name,
                len: self.len() + 1,
                parent: self.head.clone(),
            })),
        }
    }

    pub fn contains(&self, file: &Path, name: &str) -> bool {
        let mut link = self.head.as_deref();
        while let Some(current) = link {
            if current.file == file && current.name == name {
                return true;
            }
            link = current.parent.as_deref();
        }
        false
    }

    /// Number of entries, which is also the exploration depth.
    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |link| link.len)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}
