use crate::link::{LinkId, Links};
use crate::Coords;

/// The worm's body: a cycle holding one sentinel and a node per segment.
///
/// Walking left from the sentinel visits the segments from head to tail, so
/// the head is the sentinel's left neighbor and the tail its right neighbor.
#[derive(Debug)]
pub struct Worm {
    links: Links<Coords>,
    sentinel: LinkId,
    len: usize,
}

impl Default for Worm {
    fn default() -> Self {
        Worm::new()
    }
}

impl Worm {
    pub fn new() -> Self {
        let mut links = Links::new();
        let sentinel = links.link(None);
        Worm { links, sentinel, len: 0 }
    }

    pub fn push_head(&mut self, pos: Coords) {
        let segment = self.links.link(Some(pos));
        self.links.insert_left(self.sentinel, segment);
        self.len += 1;
    }

    pub fn pop_tail(&mut self) -> Option<Coords> {
        if self.is_empty() {
            return None;
        }

        let tail = self.links.right(self.sentinel);
        self.links.remove(tail);
        self.len -= 1;
        self.links.release(tail)
    }

    pub fn head(&self) -> Option<Coords> {
        self.links.payload(self.links.left(self.sentinel)).copied()
    }

    pub fn tail(&self) -> Option<Coords> {
        self.links.payload(self.links.right(self.sentinel)).copied()
    }

    /// Segment positions from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = Coords> + '_ {
        self.links
            .iter_left(self.sentinel)
            .filter_map(move |id| self.links.payload(id).copied())
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.segments().any(|segment| segment == pos)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
