//! Array-backed binary min-heap of tree nodes, keyed by frequency.

use crate::error::{Error, Result};
use crate::huffman::Node;

/// Fixed-capacity min-heap used while building a Huffman tree.
///
/// Equal frequencies are ordered however the sift operations leave them;
/// the resulting tree shape differs but stays a valid prefix code.
#[derive(Debug)]
pub struct PriorityQueue {
    nodes: Vec<Node>,
    capacity: usize,
}

impl PriorityQueue {
    /// Reserves storage for exactly `capacity` nodes up front.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailed {
                requested: capacity,
            })?;
        Ok(Self { nodes, capacity })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Adds a node and sifts it up. O(log n).
    pub fn insert(&mut self, node: Node) -> Result<()> {
        if self.nodes.len() == self.capacity {
            return Err(Error::QueueFull {
                capacity: self.capacity,
            });
        }
        self.nodes.push(node);
        self.sift_up(self.nodes.len() - 1);
        Ok(())
    }

    /// Removes the lowest-frequency node, or `None` when empty. O(log n).
    pub fn extract_min(&mut self) -> Option<Node> {
        if self.nodes.is_empty() {
            return None;
        }
        let min = self.nodes.swap_remove(0);
        self.sift_down(0);
        Some(min)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.nodes[i].freq() >= self.nodes[parent].freq() {
                break;
            }
            self.nodes.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.nodes.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;

            if left < n && self.nodes[left].freq() < self.nodes[smallest].freq() {
                smallest = left;
            }
            if right < n && self.nodes[right].freq() < self.nodes[smallest].freq() {
                smallest = right;
            }
            if smallest == i {
                return;
            }
            self.nodes.swap(i, smallest);
            i = smallest;
        }
    }

    #[cfg(test)]
    fn is_heap_ordered(&self) -> bool {
        (1..self.nodes.len()).all(|i| self.nodes[(i - 1) / 2].freq() <= self.nodes[i].freq())
    }
}
