use super::{KdTree, KD_TREE_LEAF_EPSILON};
use crate::bounding_volume::{Aabb, BoundingVolume};
use alloc::vec;
use smallvec::SmallVec;

impl KdTree {
    /// The length of the longest path from the root to a leaf.
    ///
    /// A tree made only of its root has a depth of `0`. An empty tree has a depth of `0` too.
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut max_depth = 0;
        let mut stack: SmallVec<[(u32, usize); 32]> = SmallVec::new();
        stack.push((0, 0));

        while let Some((node_id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);

            if let Some(children) = self.nodes[node_id as usize].children() {
                for child in children.into_iter().flatten() {
                    if (child as usize) < self.nodes.len() {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }

        max_depth
    }

    /// The number of leaves of this tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Panics if the tree isn’t well-formed.
    ///
    /// The tree is well-formed if:
    /// - every node is reachable exactly once from the root, and the root is nobody’s child;
    /// - the leaves’ ranges partition the primitive slots, each slot covered exactly once;
    /// - every slot holds a valid packed point, line or triangle;
    /// - every non-empty leaf box is the box of its primitives' vertices, loosened by
    ///   [`KD_TREE_LEAF_EPSILON`];
    /// - every internal box is the union of the boxes of its children.
    pub fn assert_well_formed(&self) {
        if self.nodes.is_empty() {
            assert!(self.primitive_indices.is_empty());
            return;
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut coverage = vec![0u32; self.primitive_indices.len()];
        let mut stack: SmallVec<[u32; 32]> = SmallVec::new();
        stack.push(0);

        while let Some(node_id) = stack.pop() {
            assert!(
                !visited[node_id as usize],
                "Detected loop. Node {} visited twice.",
                node_id
            );
            visited[node_id as usize] = true;

            let node = &self.nodes[node_id as usize];

            if let Some(range) = node.leaf_range() {
                assert!(range.end <= self.primitive_indices.len());

                let mut tight = Aabb::new_invalid();

                for slot in range.clone() {
                    coverage[slot] += 1;
                    let primitive = self
                        .primitive(slot)
                        .unwrap_or_else(|| panic!("Malformed primitive at slot {}.", slot));
                    primitive.for_each_vertex(|vid| tight.take_point(self.vertices[vid as usize]));
                }

                if !range.is_empty() {
                    assert_relative_eq!(node.aabb, tight.loosened(KD_TREE_LEAF_EPSILON));
                }
            } else {
                assert!(node.first >= 0 && node.second >= 0);
                assert!(node.first > 0 || node.second > 0, "Internal node without children.");
                let mut union = Aabb::new_invalid();

                for child in [node.first, node.second] {
                    if child > 0 {
                        assert!((child as usize) < self.nodes.len());
                        union.merge(&self.nodes[child as usize].aabb);
                        stack.push(child as u32);
                    }
                }

                assert_relative_eq!(node.aabb, union);
            }
        }

        assert!(visited.iter().all(|v| *v), "Some nodes are unreachable.");
        assert!(
            coverage.iter().all(|c| *c == 1),
            "Some primitive slots are not covered exactly once."
        );
    }
}
