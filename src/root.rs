use std::fmt::{Debug, Formatter};
use std::ops::Deref;

use crate::bdd::Bdd;
use crate::reference::Ref;

/// A retained predicate.
///
/// Holds one reference count on its node for as long as the guard lives, so
/// the node survives [`Bdd::collect_garbage`]. The count is released on drop,
/// on every exit path.
pub struct Root<'a> {
    bdd: &'a Bdd,
    node: Ref,
}

impl<'a> Root<'a> {
    pub(crate) fn new(bdd: &'a Bdd, node: Ref) -> Self {
        bdd.retain(node);
        Self { bdd, node }
    }

    pub fn get(&self) -> Ref {
        self.node
    }

    pub fn bdd(&self) -> &'a Bdd {
        self.bdd
    }

    /// Replace the guarded predicate, retaining the new one before the old one
    /// is released.
    pub fn replace(&mut self, node: Ref) {
        self.bdd.retain(node);
        self.bdd.release(self.node);
        self.node = node;
    }
}

impl Deref for Root<'_> {
    type Target = Ref;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

impl Clone for Root<'_> {
    fn clone(&self) -> Self {
        Root::new(self.bdd, self.node)
    }
}

impl Drop for Root<'_> {
    fn drop(&mut self) {
        self.bdd.release(self.node);
    }
}

impl Debug for Root<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Root({})", self.node)
    }
}
