//! Step × user authorization relation.
//!
//! Stored as a dense `DMatrix<u8>` (rows = steps, columns = users). Entries are
//! validated to {0,1} on construction; the matrix is immutable afterwards.

use nalgebra::{DMatrix, RowDVector};

use crate::error::InstanceError;

/// Immutable `num_steps × num_users` {0,1} matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationMatrix {
    m: DMatrix<u8>,
}

impl AuthorizationMatrix {
    /// Build from a row-major slice (`data[s * num_users + u]`).
    pub fn from_row_major(
        num_steps: usize,
        num_users: usize,
        data: &[u8],
    ) -> Result<Self, InstanceError> {
        if num_steps == 0 || num_users == 0 {
            return Err(InstanceError::EmptyInstance {
                num_steps,
                num_users,
            });
        }
        if data.len() != num_steps * num_users {
            return Err(InstanceError::DimensionMismatch {
                what: "authorization entries",
                expected: num_steps * num_users,
                found: data.len(),
            });
        }
        if let Some(pos) = data.iter().position(|&x| x > 1) {
            return Err(InstanceError::NonBinaryEntry {
                step: pos / num_users,
                user: pos % num_users,
                value: data[pos],
            });
        }
        Ok(Self {
            m: DMatrix::from_row_slice(num_steps, num_users, data),
        })
    }

    /// Build from one row per step; every row must have the same length.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, InstanceError> {
        let num_users = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * num_users);
        for (step, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != num_users {
                return Err(InstanceError::RaggedRow {
                    step,
                    expected: num_users,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_row_major(rows.len(), num_users, &data)
    }

    /// Every user authorized for every step.
    pub fn full(num_steps: usize, num_users: usize) -> Result<Self, InstanceError> {
        Self::from_row_major(num_steps, num_users, &vec![1; num_steps * num_users])
    }

    #[inline]
    pub fn num_steps(&self) -> usize {
        self.m.nrows()
    }

    #[inline]
    pub fn num_users(&self) -> usize {
        self.m.ncols()
    }

    #[inline]
    pub fn is_authorized(&self, step: usize, user: usize) -> bool {
        self.m[(step, user)] == 1
    }

    /// Users authorized for `step`, ascending.
    pub fn authorized_users(&self, step: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_users()).filter(move |&u| self.is_authorized(step, u))
    }

    /// Steps whose row is all zero. Any such step makes the instance UNSAT.
    pub fn empty_steps(&self) -> Vec<usize> {
        (0..self.num_steps())
            .filter(|&s| self.m.row(s).iter().all(|&x| x == 0))
            .collect()
    }

    /// Users authorized for every step of `block` (row-combining: the summed
    /// column over the block equals the block size). Ascending.
    pub fn eligible_users(&self, block: &[usize]) -> Vec<usize> {
        let mut sum = RowDVector::<u32>::zeros(self.num_users());
        for &s in block {
            sum += self.m.row(s).map(u32::from);
        }
        sum.iter()
            .enumerate()
            .filter(|&(_, &c)| c as usize == block.len())
            .map(|(u, _)| u)
            .collect()
    }

    /// Rows as nested vectors (for serialization and display).
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.num_steps())
            .map(|s| self.m.row(s).iter().copied().collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AuthorizationMatrix {
        AuthorizationMatrix::from_rows(&[[1u8, 1, 0], [1, 0, 1], [0, 1, 1], [1, 1, 1]]).unwrap()
    }

    #[test]
    fn row_major_layout() {
        let a = AuthorizationMatrix::from_row_major(2, 3, &[1, 0, 0, 0, 1, 1]).unwrap();
        assert!(a.is_authorized(0, 0));
        assert!(!a.is_authorized(0, 1));
        assert!(a.is_authorized(1, 2));
        assert_eq!(a.to_rows(), vec![vec![1, 0, 0], vec![0, 1, 1]]);
    }

    #[test]
    fn rejects_bad_shapes_and_values() {
        assert!(matches!(
            AuthorizationMatrix::from_row_major(2, 2, &[1, 0, 1]),
            Err(InstanceError::DimensionMismatch { expected: 4, found: 3, .. })
        ));
        assert!(matches!(
            AuthorizationMatrix::from_rows(&[vec![1u8, 0], vec![1]]),
            Err(InstanceError::RaggedRow { step: 1, .. })
        ));
        assert_eq!(
            AuthorizationMatrix::from_rows(&[[1u8, 2]]),
            Err(InstanceError::NonBinaryEntry {
                step: 0,
                user: 1,
                value: 2
            })
        );
        let no_rows: [[u8; 0]; 0] = [];
        assert!(matches!(
            AuthorizationMatrix::from_rows(&no_rows),
            Err(InstanceError::EmptyInstance { .. })
        ));
    }

    #[test]
    fn eligible_users_combine_rows() {
        let a = sample();
        assert_eq!(a.eligible_users(&[0, 1]), vec![0]);
        assert_eq!(a.eligible_users(&[2, 3]), vec![1, 2]);
        assert!(a.eligible_users(&[0, 1, 2]).is_empty());
        assert_eq!(a.eligible_users(&[3]), vec![0, 1, 2]);
    }

    #[test]
    fn authorized_users_and_empty_steps() {
        let a = AuthorizationMatrix::from_rows(&[[0u8, 1, 1], [0, 0, 0]]).unwrap();
        assert_eq!(a.authorized_users(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(a.authorized_users(1).count(), 0);
        assert_eq!(a.empty_steps(), vec![1]);
        assert!(AuthorizationMatrix::full(2, 2).unwrap().empty_steps().is_empty());
    }
}
