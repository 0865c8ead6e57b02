//! Circular doubly-linked lists kept in an arena.
//!
//! Every node always belongs to exactly one cycle; a freshly created node is a
//! cycle of one. Lists are joined and split with [`Links::insert_left`] and
//! [`Links::insert_right`], which only swap four neighbor handles and never
//! walk the lists. Both operations are their own inverse and give the same
//! topology whichever of the two nodes is passed first.
//!
//! Showing only right neighbors, with the two cycles
//!
//! ```text
//! a -> b -> c -> d -> e -> a
//! p -> q -> r -> s -> t -> p
//! ```
//!
//! `insert_left(a, p)` (or `insert_left(p, a)`) gives
//!
//! ```text
//! p -> q -> r -> s -> t -> a -> b -> c -> d -> e -> p
//! ```
//!
//! while `insert_right(a, p)` gives
//!
//! ```text
//! a -> q -> r -> s -> t -> p -> b -> c -> d -> e -> a
//! ```
//!
//! Repeating the same call splits the long cycle back into the original two.
//! Called on two nodes of the same cycle, the operations cut it in two.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Generational handle to a node stored in a [`Links`] arena.
    pub struct LinkId;
}

#[derive(Debug)]
struct Node<T> {
    left: LinkId,
    right: LinkId,
    payload: Option<T>,
}

/// Arena owning a set of nodes and the cycles they form.
///
/// Nodes without a payload act as sentinels. Using a handle after its node
/// has been released panics, even once the slot has been handed out again.
#[derive(Debug)]
pub struct Links<T> {
    nodes: SlotMap<LinkId, Node<T>>,
}

impl<T> Default for Links<T> {
    fn default() -> Self {
        Links::new()
    }
}

impl<T> Links<T> {
    pub fn new() -> Self {
        Links { nodes: SlotMap::with_key() }
    }

    /// Creates an isolated node.
    pub fn link(&mut self, payload: Option<T>) -> LinkId {
        self.nodes.insert_with_key(|id| Node { left: id, right: id, payload })
    }

    /// Splices the cycle containing `other` immediately to the left of `at`.
    ///
    /// If both nodes are already in the same cycle, the cycle is split in two
    /// instead. Inserting a node into itself does nothing.
    pub fn insert_left(&mut self, at: LinkId, other: LinkId) {
        if at == other {
            return;
        }

        let t = self.left(at);
        self.node_mut(t).right = other;
        let other_left = self.left(other);
        self.node_mut(at).left = other_left;
        self.node_mut(other_left).right = at;
        self.node_mut(other).left = t;
    }

    /// Mirror image of [`Links::insert_left`]: splices the cycle containing
    /// `other` immediately to the right of `at`.
    pub fn insert_right(&mut self, at: LinkId, other: LinkId) {
        if at == other {
            return;
        }

        let t = self.right(at);
        self.node_mut(t).left = other;
        let other_right = self.right(other);
        self.node_mut(at).right = other_right;
        self.node_mut(other_right).left = at;
        self.node_mut(other).right = t;
    }

    /// Unlinks `id` from its neighbors, leaving it as a cycle of one.
    pub fn remove(&mut self, id: LinkId) {
        let (left, right) = (self.left(id), self.right(id));
        self.node_mut(left).right = right;
        self.node_mut(right).left = left;

        let node = self.node_mut(id);
        node.left = id;
        node.right = id;
    }

    /// Frees the slot of an isolated node and hands back its payload.
    pub fn release(&mut self, id: LinkId) -> Option<T> {
        debug_assert!(self.is_isolated(id), "released a node that is still linked");

        let node = self.nodes.remove(id).expect("released a stale link handle");
        node.payload
    }

    pub fn left(&self, id: LinkId) -> LinkId {
        self.node(id).left
    }

    pub fn right(&self, id: LinkId) -> LinkId {
        self.node(id).right
    }

    pub fn payload(&self, id: LinkId) -> Option<&T> {
        self.node(id).payload.as_ref()
    }

    pub fn is_isolated(&self, id: LinkId) -> bool {
        let node = self.node(id);
        node.left == id && node.right == id
    }

    /// Number of live nodes in the arena, sentinels included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in the cycle containing `id`, `id` included.
    pub fn cycle_len(&self, id: LinkId) -> usize {
        1 + self.iter_left(id).count()
    }

    /// Walks the cycle leftwards from `start`, excluding `start` itself.
    pub fn iter_left(&self, start: LinkId) -> Walk<'_, T> {
        Walk { links: self, start, next: self.left(start), leftwards: true }
    }

    /// Walks the cycle rightwards from `start`, excluding `start` itself.
    pub fn iter_right(&self, start: LinkId) -> Walk<'_, T> {
        Walk { links: self, start, next: self.right(start), leftwards: false }
    }

    fn node(&self, id: LinkId) -> &Node<T> {
        self.nodes.get(id).expect("stale link handle")
    }

    fn node_mut(&mut self, id: LinkId) -> &mut Node<T> {
        self.nodes.get_mut(id).expect("stale link handle")
    }
}

/// Iterator over the handles of one cycle, see [`Links::iter_left`].
pub struct Walk<'a, T> {
    links: &'a Links<T>,
    start: LinkId,
    next: LinkId,
    leftwards: bool,
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = LinkId;

    fn next(&mut self) -> Option<LinkId> {
        if self.next == self.start {
            return None;
        }

        let current = self.next;
        self.next = if self.leftwards {
            self.links.left(current)
        } else {
            self.links.right(current)
        };
        Some(current)
    }
}
