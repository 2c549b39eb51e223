//! Property tests: every solver against brute force on small instances.

use std::collections::HashSet;

use proptest::prelude::*;

use crate::backtracking::WspBacktracking;
use crate::graph::{ConstraintKind, Graph};
use crate::instance::{Constraint, WspInstance};
use crate::pbt::{authorize_partition, Partition, PartitionGenerator, WspOrchestrator};
use crate::vertex_cover::{is_vertex_cover, vertex_cover};
use crate::Encoding;

fn kind() -> impl Strategy<Value = Option<ConstraintKind>> {
    prop_oneof![
        2 => Just(None),
        1 => Just(Some(ConstraintKind::Same)),
        1 => Just(Some(ConstraintKind::Different)),
    ]
}

/// Instances with up to 4 steps and 3 users, at most one constraint per pair.
fn small_instance() -> impl Strategy<Value = WspInstance> {
    (1usize..=4, 1usize..=3).prop_flat_map(|(n, m)| {
        (
            proptest::collection::vec(proptest::collection::vec(0u8..=1, m), n),
            proptest::collection::vec(kind(), n * (n - 1) / 2),
        )
            .prop_map(move |(authorization, kinds)| {
                let mut kinds = kinds.into_iter();
                let mut constraints = Vec::new();
                for a in 0..n {
                    for b in a + 1..n {
                        if let Some(kind) = kinds.next().flatten() {
                            constraints.push(Constraint { a, b, kind });
                        }
                    }
                }
                WspInstance {
                    num_steps: n,
                    num_users: m,
                    authorization,
                    constraints,
                }
            })
    })
}

fn satisfies(inst: &WspInstance, e: &[usize]) -> bool {
    (0..inst.num_steps).all(|s| inst.authorization[s][e[s]] == 1)
        && inst.constraints.iter().all(|c| c.kind.holds(e[c.a], e[c.b]))
}

/// All `num_users^num_steps` vectors in lexicographic order, filtered.
fn brute_force(inst: &WspInstance) -> Vec<Encoding> {
    let (n, m) = (inst.num_steps, inst.num_users);
    let total = m.pow(n as u32);
    (0..total)
        .map(|idx| {
            (0..n)
                .map(|s| (idx / m.pow((n - 1 - s) as u32)) % m)
                .collect::<Encoding>()
        })
        .filter(|e| satisfies(inst, e))
        .collect()
}

/// Partition induced by "same user", blocks ordered by smallest step.
fn induced_partition(e: &[usize]) -> Partition {
    let mut blocks: Vec<Vec<usize>> = Vec::new();
    let mut users: Vec<usize> = Vec::new();
    for (s, &u) in e.iter().enumerate() {
        match users.iter().position(|&x| x == u) {
            Some(b) => blocks[b].push(s),
            None => {
                users.push(u);
                blocks.push(vec![s]);
            }
        }
    }
    Partition { blocks }
}

fn brute_force_matching_exists(p: &Partition, inst: &WspInstance) -> bool {
    let m = inst.num_users;
    let k = p.len();
    (0..m.pow(k as u32)).any(|idx| {
        let users: Vec<usize> = (0..k).map(|b| (idx / m.pow(b as u32)) % m).collect();
        let distinct = users.iter().collect::<HashSet<_>>().len() == k;
        distinct
            && p.blocks
                .iter()
                .zip(&users)
                .all(|(block, &u)| block.iter().all(|&s| inst.authorization[s][u] == 1))
    })
}

fn small_graph() -> impl Strategy<Value = Graph> {
    (1usize..=7).prop_flat_map(|n| {
        proptest::collection::vec(proptest::bool::weighted(0.35), n * (n - 1) / 2).prop_map(
            move |bits| {
                let mut g = Graph::new(n);
                let mut bits = bits.into_iter();
                for u in 0..n {
                    for v in u + 1..n {
                        if bits.next() == Some(true) {
                            g.add_edge(u, v);
                        }
                    }
                }
                g
            },
        )
    })
}

fn brute_force_min_cover(g: &Graph) -> usize {
    let n = g.vertex_count();
    (0u32..1 << n)
        .filter(|mask| {
            let cover: Vec<usize> = (0..n).filter(|&v| mask & (1 << v) != 0).collect();
            is_vertex_cover(g, &cover)
        })
        .map(u32::count_ones)
        .min()
        .unwrap_or(0) as usize
}

proptest! {
    #[test]
    fn backtracking_equals_brute_force(inst in small_instance()) {
        let (g, a) = inst.build().unwrap();
        let got = WspBacktracking::new(&g, &a).unwrap().solve_all();
        for e in &got {
            prop_assert!(satisfies(&inst, e), "unsound {:?}", e);
        }
        prop_assert_eq!(got, brute_force(&inst));
    }

    #[test]
    fn pbt_verdict_matches_and_solutions_are_valid(inst in small_instance()) {
        let (g, a) = inst.build().unwrap();
        let expected: HashSet<Encoding> = brute_force(&inst).into_iter().collect();
        let report = WspOrchestrator::new(&g, &a).unwrap().solve();
        prop_assert_eq!(report.satisfiable, !expected.is_empty());
        for e in report.encodings() {
            prop_assert!(expected.contains(e), "pbt produced invalid {:?}", e);
        }
    }

    #[test]
    fn partitions_are_admissible_and_complete(inst in small_instance()) {
        let g = inst.constraint_graph().unwrap();
        let parts = PartitionGenerator::new(&g).generate();
        let unique: HashSet<&Partition> = parts.iter().collect();
        prop_assert_eq!(unique.len(), parts.len());
        for p in &parts {
            prop_assert!(p.covers_exactly(inst.num_steps), "{}", p);
            for c in &inst.constraints {
                let together = p.block_of(c.a) == p.block_of(c.b);
                match c.kind {
                    ConstraintKind::Same => prop_assert!(together, "{} splits {:?}", p, c),
                    ConstraintKind::Different => prop_assert!(!together, "{} merges {:?}", p, c),
                }
            }
        }
        // Every satisfying assignment's user classes form a generated partition.
        for e in brute_force(&inst) {
            let induced = induced_partition(&e);
            prop_assert!(unique.contains(&induced), "missing {}", induced);
        }
    }

    #[test]
    fn matching_equals_brute_force(inst in small_instance()) {
        let (g, a) = inst.build().unwrap();
        for p in PartitionGenerator::new(&g).partitions() {
            let got = authorize_partition(&p, &a);
            prop_assert_eq!(got.is_some(), brute_force_matching_exists(&p, &inst), "{}", p);
            if let Some(m) = got {
                let users: HashSet<_> = m.as_slice().iter().collect();
                prop_assert_eq!(users.len(), p.len());
                for (b, block) in p.blocks.iter().enumerate() {
                    for &s in block {
                        prop_assert!(a.is_authorized(s, m.user_for(b)));
                    }
                }
            }
        }
    }

    #[test]
    fn vertex_cover_equals_brute_force(mut g in small_graph(), k in 0usize..=4) {
        let min = brute_force_min_cover(&g);
        let before = g.clone();
        let got = vertex_cover(&mut g, k);
        prop_assert_eq!(&g, &before);
        prop_assert_eq!(got.is_some(), min <= k);
        if let Some(cover) = got {
            prop_assert!(cover.len() <= k);
            prop_assert!(is_vertex_cover(&g, &cover));
        }
    }
}
