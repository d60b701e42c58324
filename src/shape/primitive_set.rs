use alloc::vec::Vec;

/// The way the indices of a [`PrimitiveSet`] are assembled into primitives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum PrimitiveMode {
    /// Every index is a point.
    Points,
    /// Every pair of consecutive indices `(2k, 2k + 1)` is a line.
    Lines,
    /// Every index is joined by a line to the previous one.
    LineStrip,
    /// Same as [`PrimitiveMode::LineStrip`], with an additional line from the last index back
    /// to the first one.
    LineLoop,
    /// Every triplet of consecutive indices `(3k, 3k + 1, 3k + 2)` is a triangle.
    Triangles,
    /// Every index forms a triangle with the two previous ones. The winding of odd
    /// triangles is flipped so all the triangles of the strip share the same orientation.
    TriangleStrip,
    /// Every index forms a triangle with the previous one and the first one.
    TriangleFan,
}

/// A set of primitives of a [`Geometry`](crate::shape::Geometry).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum PrimitiveSet {
    /// Primitives reading `count` consecutive vertices starting at the vertex `first`.
    DrawArrays {
        /// How the vertices are assembled into primitives.
        mode: PrimitiveMode,
        /// The index of the first vertex.
        first: u32,
        /// The number of vertices read.
        count: u32,
    },
    /// Several consecutive runs of vertices, each run being assembled independently.
    ///
    /// The first run starts at the vertex `first`, and each subsequent run starts right
    /// after the end of the previous one.
    DrawArrayLengths {
        /// How the vertices of each run are assembled into primitives.
        mode: PrimitiveMode,
        /// The index of the first vertex of the first run.
        first: u32,
        /// The number of vertices of each run.
        lengths: Vec<u32>,
    },
    /// Primitives reading an explicit list of vertex indices.
    DrawElements {
        /// How the indices are assembled into primitives.
        mode: PrimitiveMode,
        /// The vertex indices.
        indices: Vec<u32>,
    },
}

/// Callbacks receiving the primitives obtained by expanding a [`PrimitiveSet`].
///
/// Strips, fans and loops are decomposed into individual lines and triangles before being
/// given to the visitor.
pub trait PrimitiveIndexVisitor {
    /// Called for each point.
    fn point(&mut self, i0: u32);
    /// Called for each line.
    fn line(&mut self, i0: u32, i1: u32);
    /// Called for each triangle.
    fn triangle(&mut self, i0: u32, i1: u32, i2: u32);
}

impl PrimitiveSet {
    /// A primitive set reading `count` consecutive vertices starting at `first`.
    pub fn draw_arrays(mode: PrimitiveMode, first: u32, count: u32) -> Self {
        PrimitiveSet::DrawArrays { mode, first, count }
    }

    /// A primitive set made of several consecutive runs of vertices.
    pub fn draw_array_lengths(mode: PrimitiveMode, first: u32, lengths: Vec<u32>) -> Self {
        PrimitiveSet::DrawArrayLengths {
            mode,
            first,
            lengths,
        }
    }

    /// A primitive set reading explicit vertex indices.
    pub fn draw_elements(mode: PrimitiveMode, indices: Vec<u32>) -> Self {
        PrimitiveSet::DrawElements { mode, indices }
    }

    /// How the indices of this set are assembled into primitives.
    pub fn mode(&self) -> PrimitiveMode {
        match self {
            PrimitiveSet::DrawArrays { mode, .. }
            | PrimitiveSet::DrawArrayLengths { mode, .. }
            | PrimitiveSet::DrawElements { mode, .. } => *mode,
        }
    }

    /// The total number of vertex indices read by this set.
    pub fn count(&self) -> usize {
        match self {
            PrimitiveSet::DrawArrays { count, .. } => *count as usize,
            PrimitiveSet::DrawArrayLengths { lengths, .. } => {
                lengths.iter().map(|len| *len as usize).sum()
            }
            PrimitiveSet::DrawElements { indices, .. } => indices.len(),
        }
    }

    /// An upper bound of the number of primitives this set expands to.
    ///
    /// Degenerate primitives are included in this count.
    pub fn num_primitives_upper_bound(&self) -> usize {
        let mode = self.mode();
        match self {
            PrimitiveSet::DrawArrayLengths { lengths, .. } => lengths
                .iter()
                .map(|len| num_primitives(mode, *len as usize))
                .sum(),
            _ => num_primitives(mode, self.count()),
        }
    }

    /// Expands this set into points, lines and triangles given to `visitor`.
    ///
    /// Consecutive vertex indices going past `u32::MAX` are clamped to `u32::MAX`.
    pub fn for_each_primitive(&self, visitor: &mut impl PrimitiveIndexVisitor) {
        match self {
            PrimitiveSet::DrawArrays { mode, first, count } => {
                let first = *first;
                expand_primitives(
                    *mode,
                    *count as usize,
                    |k| first.saturating_add(k as u32),
                    visitor,
                );
            }
            PrimitiveSet::DrawArrayLengths {
                mode,
                first,
                lengths,
            } => {
                let mut run_start = *first;
                for len in lengths {
                    let start = run_start;
                    expand_primitives(
                        *mode,
                        *len as usize,
                        |k| start.saturating_add(k as u32),
                        visitor,
                    );
                    run_start = run_start.saturating_add(*len);
                }
            }
            PrimitiveSet::DrawElements { mode, indices } => {
                expand_primitives(*mode, indices.len(), |k| indices[k], visitor);
            }
        }
    }
}

fn num_primitives(mode: PrimitiveMode, count: usize) -> usize {
    match mode {
        PrimitiveMode::Points => count,
        PrimitiveMode::Lines => count / 2,
        PrimitiveMode::LineStrip => count.saturating_sub(1),
        PrimitiveMode::LineLoop => {
            if count > 1 {
                count
            } else {
                0
            }
        }
        PrimitiveMode::Triangles => count / 3,
        PrimitiveMode::TriangleStrip | PrimitiveMode::TriangleFan => count.saturating_sub(2),
    }
}

fn expand_primitives(
    mode: PrimitiveMode,
    count: usize,
    index: impl Fn(usize) -> u32,
    visitor: &mut impl PrimitiveIndexVisitor,
) {
    match mode {
        PrimitiveMode::Points => {
            for k in 0..count {
                visitor.point(index(k));
            }
        }
        PrimitiveMode::Lines => {
            for k in (1..count).step_by(2) {
                visitor.line(index(k - 1), index(k));
            }
        }
        PrimitiveMode::LineStrip | PrimitiveMode::LineLoop => {
            for k in 1..count {
                visitor.line(index(k - 1), index(k));
            }

            if mode == PrimitiveMode::LineLoop && count > 1 {
                visitor.line(index(count - 1), index(0));
            }
        }
        PrimitiveMode::Triangles => {
            for k in (2..count).step_by(3) {
                visitor.triangle(index(k - 2), index(k - 1), index(k));
            }
        }
        PrimitiveMode::TriangleStrip => {
            for k in 2..count {
                if k % 2 == 1 {
                    visitor.triangle(index(k - 2), index(k), index(k - 1));
                } else {
                    visitor.triangle(index(k - 2), index(k - 1), index(k));
                }
            }
        }
        PrimitiveMode::TriangleFan => {
            for k in 2..count {
                visitor.triangle(index(0), index(k - 1), index(k));
            }
        }
    }
}
