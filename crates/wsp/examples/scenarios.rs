//! Walk through the three solvers on small hand-written instances.

use wsp::api::{
    vertex_cover, Constraint, Graph, SolveCfg, SolverKind, WspInstance, WspOrchestrator,
};

fn main() {
    let inst = WspInstance {
        num_steps: 3,
        num_users: 3,
        authorization: vec![vec![1, 1, 0], vec![1, 1, 1], vec![0, 1, 1]],
        constraints: vec![Constraint::same(0, 1)],
    };

    for solver in [SolverKind::Backtracking, SolverKind::Pbt] {
        let report = wsp::solve(&inst, SolveCfg { solver, max_solutions: None })
            .expect("valid instance");
        println!("{solver}: satisfiable={} {:?}", report.satisfiable, report.solutions);
    }

    let (graph, auth) = inst.build().expect("valid instance");
    let report = WspOrchestrator::new(&graph, &auth)
        .expect("matching dimensions")
        .solve();
    for outcome in &report.outcomes {
        match &outcome.assignment {
            Some((m, _)) => println!("{}\n{}", outcome.partition, m.describe(&outcome.partition)),
            None => println!("{}\nno full matching", outcome.partition),
        }
    }

    let mut star = Graph::new(5);
    for leaf in 1..5 {
        star.add_edge(0, leaf);
    }
    println!("star cover (k=1): {:?}", vertex_cover(&mut star, 1));
}
