//! Persistent search paths.
//!
//! A path is the ordered list of states from the initial state to a frontier
//! state. Each expansion extends its parent's path by exactly one state, so
//! paths are stored as parent-linked `Arc` chains: extension is O(1) and
//! sibling paths share their common prefix.

use std::sync::Arc;

struct Link<N> {
    node: N,
    parent: Option<Arc<Link<N>>>,
    len: usize,
}

impl<N> Drop for Link<N> {
    // Unlink iteratively so dropping a long, unshared chain cannot overflow
    // the stack.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(link) = next {
            match Arc::try_unwrap(link) {
                Ok(mut owned) => next = owned.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Immutable path from the initial state to its last state.
pub struct Path<N> {
    head: Arc<Link<N>>,
}

impl<N> Path<N> {
    /// A one-state path.
    pub fn root(node: N) -> Self {
        Self {
            head: Arc::new(Link {
                node,
                parent: None,
                len: 1,
            }),
        }
    }

    /// A new path equal to this one followed by `node`.
    #[must_use]
    pub fn extend(&self, node: N) -> Self {
        Self {
            head: Arc::new(Link {
                node,
                parent: Some(Arc::clone(&self.head)),
                len: self.head.len + 1,
            }),
        }
    }

    /// The most recently added state.
    #[must_use]
    pub fn last(&self) -> &N {
        &self.head.node
    }

    /// Number of states on the path (always at least 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.len
    }

    /// Always `false`; a path holds at least its initial state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate from the last state back to the initial state.
    pub fn iter_rev(&self) -> impl Iterator<Item = &N> {
        std::iter::successors(Some(&*self.head), |link| link.parent.as_deref())
            .map(|link| &link.node)
    }

    /// Materialize the path, initial state first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<N>
    where
        N: Clone,
    {
        let mut nodes: Vec<N> = self.iter_rev().cloned().collect();
        nodes.reverse();
        nodes
    }
}

impl<N> Clone for Path<N> {
    fn clone(&self) -> Self {
        Self {
            head: Arc::clone(&self.head),
        }
    }
}

impl<N: std::fmt::Debug> std::fmt::Debug for Path<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut nodes: Vec<&N> = self.iter_rev().collect();
        nodes.reverse();
        f.debug_list().entries(nodes).finish()
    }
}
