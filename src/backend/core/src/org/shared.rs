//! Copy-on-write handle to the current organization tree.
//!
//! Readers take an `Arc<OrgTree>` snapshot and keep using it for as long as
//! they like; writers swap in a whole new tree. A reader therefore never sees
//! a tree that is half old and half new.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use super::tree::OrgTree;

/// Shared, replaceable reference to an [`OrgTree`].
#[derive(Debug, Clone)]
pub struct SharedTree {
    current: Arc<RwLock<Arc<OrgTree>>>,
}

impl SharedTree {
    pub fn new(tree: OrgTree) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(tree))),
        }
    }

    /// The tree as of now. Later replacements do not affect the snapshot.
    pub fn snapshot(&self) -> Arc<OrgTree> {
        self.current.read().clone()
    }

    /// Publish a new tree, returning the one it replaced.
    pub fn replace(&self, tree: OrgTree) -> Arc<OrgTree> {
        let next = Arc::new(tree);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        info!(
            previous_units = previous.len(),
            units = self.current.read().len(),
            "Organization tree replaced"
        );
        previous
    }
}

impl From<OrgTree> for SharedTree {
    fn from(tree: OrgTree) -> Self {
        Self::new(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::models::Unit;

    fn tree(extra: &[&str]) -> OrgTree {
        let mut units = vec![Unit::new("hq", "HQ")];
        units.extend(extra.iter().map(|id| Unit::new(*id, *id).with_parent("hq")));
        OrgTree::new(units).unwrap()
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let shared = SharedTree::new(tree(&["div-1"]));
        let before = shared.snapshot();

        let previous = shared.replace(tree(&["div-1", "div-3"]));

        assert_eq!(before.len(), 2);
        assert_eq!(previous.len(), 2);
        assert_eq!(shared.snapshot().len(), 3);
        assert!(!before.contains("div-3"));
    }

    #[test]
    fn test_clones_share_state() {
        let a = SharedTree::new(tree(&[]));
        let b = a.clone();
        a.replace(tree(&["div-9"]));
        assert!(b.snapshot().contains("div-9"));
    }
}
