//! Constrained set-partition enumeration.

use std::fmt;

use crate::graph::{ConstraintGraph, ConstraintKind};

/// Disjoint blocks of step indices covering `0..num_steps`.
///
/// Blocks appear in creation order (by their smallest step) and each block is
/// sorted ascending.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Partition {
    pub blocks: Vec<Vec<usize>>,
}

impl Partition {
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the block containing `step`.
    pub fn block_of(&self, step: usize) -> Option<usize> {
        self.blocks.iter().position(|b| b.contains(&step))
    }

    /// Every step of `0..num_steps` appears in exactly one block.
    pub fn covers_exactly(&self, num_steps: usize) -> bool {
        let mut seen = vec![false; num_steps];
        for &s in self.blocks.iter().flatten() {
            if s >= num_steps || seen[s] {
                return false;
            }
            seen[s] = true;
        }
        seen.into_iter().all(|x| x)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{{")?;
            for (j, s) in block.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{s}")?;
            }
            write!(f, "}}")?;
        }
        write!(f, "]")
    }
}

/// Enumerates admissible partitions of the steps of a constraint graph.
///
/// A partition is admissible when no block holds a DIFFERENT pair and every SAME
/// pair shares a block (transitively). Without constraints the count is the Bell
/// number of the step count.
#[derive(Clone, Copy, Debug)]
pub struct PartitionGenerator<'a> {
    graph: &'a ConstraintGraph,
}

impl<'a> PartitionGenerator<'a> {
    pub fn new(graph: &'a ConstraintGraph) -> Self {
        Self { graph }
    }

    /// Lazy depth-first stream of admissible partitions.
    pub fn partitions(&self) -> Partitions<'a> {
        Partitions::new(self.graph)
    }

    /// Collect every admissible partition.
    pub fn generate(&self) -> Vec<Partition> {
        self.partitions().collect()
    }
}

/// Explicit-stack DFS over step index.
///
/// For step `t` the options are "join block 0 .. join block len-1, open a new
/// block", tried in that order; `cursors[t]` is the next option.
#[derive(Clone, Debug)]
pub struct Partitions<'a> {
    graph: &'a ConstraintGraph,
    blocks: Vec<Vec<usize>>,
    block_of: Vec<Option<usize>>,
    cursors: Vec<usize>,
    depth: usize,
    done: bool,
}

impl<'a> Partitions<'a> {
    fn new(graph: &'a ConstraintGraph) -> Self {
        let n = graph.num_steps();
        Self {
            graph,
            blocks: Vec::new(),
            block_of: vec![None; n],
            cursors: vec![0; n],
            depth: 0,
            done: false,
        }
    }

    /// `t` may join block `b`: no DIFFERENT partner inside it, and no SAME partner
    /// already placed in another block.
    fn can_join(&self, b: usize, t: usize) -> bool {
        self.graph.partners(t).all(|(x, kind)| match (kind, self.block_of[x]) {
            (_, None) => true,
            (ConstraintKind::Different, Some(bx)) => bx != b,
            (ConstraintKind::Same, Some(bx)) => bx == b,
        })
    }

    /// `t` may open a singleton block only if none of its SAME partners is placed.
    fn can_open(&self, t: usize) -> bool {
        self.graph
            .same_partners(t)
            .all(|x| x == t || self.block_of[x].is_none())
    }

    fn place(&mut self, t: usize) -> bool {
        while self.cursors[t] <= self.blocks.len() {
            let option = self.cursors[t];
            self.cursors[t] += 1;
            if option < self.blocks.len() {
                if self.can_join(option, t) {
                    self.blocks[option].push(t);
                    self.block_of[t] = Some(option);
                    return true;
                }
            } else if self.can_open(t) {
                self.blocks.push(vec![t]);
                self.block_of[t] = Some(option);
                return true;
            }
        }
        false
    }

    /// Undo the placement of `t` (always the most recent one).
    fn unplace(&mut self, t: usize) {
        if let Some(b) = self.block_of[t].take() {
            self.blocks[b].pop();
            if self.blocks[b].is_empty() {
                self.blocks.pop();
            }
        }
    }
}

impl Iterator for Partitions<'_> {
    type Item = Partition;

    fn next(&mut self) -> Option<Partition> {
        let n = self.block_of.len();
        while !self.done {
            if self.depth == n {
                let leaf = Partition {
                    blocks: self.blocks.clone(),
                };
                match self.depth.checked_sub(1) {
                    Some(d) => {
                        self.depth = d;
                        self.unplace(d);
                    }
                    None => self.done = true,
                }
                return Some(leaf);
            }
            let t = self.depth;
            if self.place(t) {
                self.depth += 1;
                if self.depth < n {
                    self.cursors[self.depth] = 0;
                }
            } else if t == 0 {
                self.done = true;
            } else {
                self.depth -= 1;
                self.unplace(self.depth);
            }
        }
        None
    }
}
