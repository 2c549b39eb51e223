//! Reproducible random WSP instances.
//!
//! Model
//! - Every unordered step pair `i < j` receives a constraint with probability
//!   `constraint_density`; its kind is SAME or DIFFERENT with equal odds.
//! - Every authorization entry is 1 with probability `auth_density`.
//!
//! Determinism
//! - A generator owns a master `StdRng`; each sample draws a fresh `u64` seed and
//!   builds the instance from that seed alone, so `regenerate` reproduces any
//!   sample from its `SeedReplay`.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::InstanceError;
use crate::graph::ConstraintKind;
use crate::instance::{Constraint, WspInstance};

/// Shape and densities of generated instances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomInstanceParams {
    pub num_steps: usize,
    pub num_users: usize,
    pub constraint_density: f64,
    pub auth_density: f64,
}

impl Default for RandomInstanceParams {
    fn default() -> Self {
        Self {
            num_steps: 5,
            num_users: 4,
            constraint_density: 0.3,
            auth_density: 0.5,
        }
    }
}

impl RandomInstanceParams {
    pub fn validate(&self) -> Result<(), InstanceError> {
        if self.num_steps == 0 || self.num_users == 0 {
            return Err(InstanceError::invalid("need at least one step and one user"));
        }
        for (name, p) in [
            ("constraint_density", self.constraint_density),
            ("auth_density", self.auth_density),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(InstanceError::invalid(format!("{name} must lie in [0, 1]")));
            }
        }
        Ok(())
    }
}

/// Seed that regenerates one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedReplay {
    pub seed: u64,
}

/// Streaming generator of random instances.
pub struct InstanceGenerator {
    params: RandomInstanceParams,
    master_rng: StdRng,
}

impl InstanceGenerator {
    pub fn new(params: RandomInstanceParams, seed: u64) -> Result<Self, InstanceError> {
        params.validate()?;
        Ok(Self {
            params,
            master_rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &RandomInstanceParams {
        &self.params
    }

    pub fn generate_single(
        params: &RandomInstanceParams,
        seed: u64,
    ) -> Result<WspInstance, InstanceError> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut constraints = Vec::new();
        for a in 0..params.num_steps {
            for b in a + 1..params.num_steps {
                if rng.gen_bool(params.constraint_density) {
                    let kind = if rng.gen_bool(0.5) {
                        ConstraintKind::Same
                    } else {
                        ConstraintKind::Different
                    };
                    constraints.push(Constraint { a, b, kind });
                }
            }
        }
        let authorization = (0..params.num_steps)
            .map(|_| {
                (0..params.num_users)
                    .map(|_| u8::from(rng.gen_bool(params.auth_density)))
                    .collect()
            })
            .collect();
        Ok(WspInstance {
            num_steps: params.num_steps,
            num_users: params.num_users,
            authorization,
            constraints,
        })
    }

    pub fn generate_next(&mut self) -> Result<(WspInstance, SeedReplay), InstanceError> {
        let seed = self.master_rng.next_u64();
        let instance = Self::generate_single(&self.params, seed)?;
        Ok((instance, SeedReplay { seed }))
    }

    pub fn regenerate(&self, replay: &SeedReplay) -> Result<WspInstance, InstanceError> {
        Self::generate_single(&self.params, replay.seed)
    }
}
