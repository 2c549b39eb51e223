//! Block → user bipartite matching (augmenting paths, Kuhn's algorithm).

use std::fmt;

use crate::authorization::AuthorizationMatrix;
use crate::Encoding;

use super::partition::Partition;

/// Injective assignment `block index → user`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockUserMatching {
    block_to_user: Vec<usize>,
}

impl From<Vec<usize>> for BlockUserMatching {
    fn from(block_to_user: Vec<usize>) -> Self {
        Self { block_to_user }
    }
}

impl BlockUserMatching {
    #[inline]
    pub fn user_for(&self, block: usize) -> usize {
        self.block_to_user[block]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.block_to_user
    }

    /// Step-level encoding: every step inherits its block's user.
    pub fn expand(&self, partition: &Partition, num_steps: usize) -> Encoding {
        let mut encoding = vec![0; num_steps];
        for (block, &user) in partition.blocks.iter().zip(&self.block_to_user) {
            for &s in block {
                encoding[s] = user;
            }
        }
        encoding
    }

    /// Pair with its partition for a textual listing.
    pub fn describe<'a>(&'a self, partition: &'a Partition) -> MatchingDisplay<'a> {
        MatchingDisplay {
            partition,
            matching: self,
        }
    }
}

/// `Block 0 (steps: [0, 1]) -> User 0`, one line per block.
pub struct MatchingDisplay<'a> {
    partition: &'a Partition,
    matching: &'a BlockUserMatching,
}

impl fmt::Display for MatchingDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (block, user)) in self
            .partition
            .blocks
            .iter()
            .zip(&self.matching.block_to_user)
            .enumerate()
        {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "Block {i} (steps: {block:?}) -> User {user}")?;
        }
        Ok(())
    }
}

/// Find a matching that saturates every block of `partition`, or `None`.
///
/// A user is eligible for a block iff authorized for all of its steps. Not every
/// user needs to be used.
pub fn authorize_partition(
    partition: &Partition,
    auth: &AuthorizationMatrix,
) -> Option<BlockUserMatching> {
    let eligible: Vec<Vec<usize>> = partition
        .blocks
        .iter()
        .map(|b| auth.eligible_users(b))
        .collect();
    if partition.len() > auth.num_users() || eligible.iter().any(Vec::is_empty) {
        return None;
    }
    let mut kuhn = Kuhn {
        eligible: &eligible,
        owner: vec![None; auth.num_users()],
        visited: vec![false; auth.num_users()],
    };
    for b in 0..partition.len() {
        kuhn.visited.fill(false);
        if !kuhn.try_match(b) {
            return None;
        }
    }
    let mut block_to_user = vec![0; partition.len()];
    for (user, owner) in kuhn.owner.iter().enumerate() {
        if let Some(b) = *owner {
            block_to_user[b] = user;
        }
    }
    Some(BlockUserMatching { block_to_user })
}

struct Kuhn<'e> {
    eligible: &'e [Vec<usize>],
    /// `owner[u]` = block currently matched to user `u`.
    owner: Vec<Option<usize>>,
    /// Users visited in the current augmenting attempt.
    visited: Vec<bool>,
}

impl Kuhn<'_> {
    fn try_match(&mut self, b: usize) -> bool {
        let eligible = self.eligible;
        for &u in &eligible[b] {
            if self.visited[u] {
                continue;
            }
            self.visited[u] = true;
            let free = match self.owner[u] {
                None => true,
                Some(other) => self.try_match(other),
            };
            if free {
                self.owner[u] = Some(b);
                return true;
            }
        }
        false
    }
}
