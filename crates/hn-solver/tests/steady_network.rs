//! Integration tests for the steady-state network solver.

use hn_core::Real;
use hn_hydraulics::Material;
use hn_network::{Network, NetworkBuilder};
use hn_solver::{solve, SolveConfig};

/// Net inflow at a node: sum of incident pipe flows signed toward the node.
fn net_inflow(network: &Network, flows: &[Real], node_idx: usize) -> Real {
    network
        .node_pipes(node_idx)
        .iter()
        .map(|&p| {
            let (_, end) = network.pipe_endpoints(p);
            if end == node_idx { flows[p] } else { -flows[p] }
        })
        .sum()
}

fn assert_mass_balance(network: &Network, flows: &[Real]) {
    for (i, node) in network.nodes().iter().enumerate() {
        if i == network.reference_index() {
            continue;
        }
        let inflow = net_inflow(network, flows, i);
        assert!(
            (inflow - node.demand_m3s).abs() < 1e-9,
            "node {} unbalanced: inflow {} vs demand {}",
            node.id,
            inflow,
            node.demand_m3s
        );
    }
}

#[test]
fn chain_network_is_solved_exactly_without_iterations() {
    // 1 --> 2 --> 3, supply 10 L/s at node 1, demands 4 and 6 L/s.
    let mut builder = NetworkBuilder::new();
    let n1 = builder.add_node(1, 0.0, 0.0, -0.010);
    let n2 = builder.add_node(2, 100.0, 0.0, 0.004);
    let n3 = builder.add_node(3, 200.0, 0.0, 0.006);
    builder.add_pipe(1, n1, n2, Material::Steel, 0.1);
    builder.add_pipe(2, n2, n3, Material::Steel, 0.1);
    let network = builder.build().unwrap();

    let solution = solve(&network, &SolveConfig::default()).unwrap();

    // A tree has no loops: the linear solution is final.
    assert!(solution.cycles.is_empty());
    assert_eq!(solution.iterations, 0);
    assert!(solution.converged);
    assert_eq!(solution.flows_m3s, solution.initial_flows_m3s);

    assert!((solution.flows_m3s[0] - 0.010).abs() < 1e-12);
    assert!((solution.flows_m3s[1] - 0.006).abs() < 1e-12);
    assert_mass_balance(&network, &solution.flows_m3s);
}

#[test]
fn unit_square_polyethylene_loop() {
    // The reference scenario: 4 nodes on a unit square, equal 0.1 m
    // polyethylene pipes, 10 L/s supply at node 1 roughly balanced by the
    // other three demands.
    let mut builder = NetworkBuilder::new();
    let n1 = builder.add_node(1, 0.0, 0.0, -0.010);
    let n2 = builder.add_node(2, 0.0, 1.0, 0.00333);
    let n3 = builder.add_node(3, 1.0, 1.0, 0.00333);
    let n4 = builder.add_node(4, 1.0, 0.0, 0.00333);
    builder.add_pipe(1, n1, n2, Material::Polyethylene, 0.1);
    builder.add_pipe(2, n2, n3, Material::Polyethylene, 0.1);
    builder.add_pipe(3, n3, n4, Material::Polyethylene, 0.1);
    builder.add_pipe(4, n4, n1, Material::Polyethylene, 0.1);
    let network = builder.build().unwrap();

    let config = SolveConfig::default();
    let solution = solve(&network, &config).unwrap();

    assert_eq!(solution.cycles.len(), 1);
    assert!(solution.converged);
    assert!(solution.iterations <= config.balance.max_iterations);
    for diag in &solution.loops {
        assert!(diag.within_tolerance);
        assert!(diag.discrepancy_m.abs() <= 0.5);
    }
    assert_mass_balance(&network, &solution.flows_m3s);
}

#[test]
fn looped_square_100m_balances_and_conserves_mass() {
    // Same topology at distribution scale: 100 m legs make the tree-seeded
    // flows visibly unbalanced, so the relaxation has real work to do.
    let mut builder = NetworkBuilder::new();
    let n1 = builder.add_node(1, 0.0, 0.0, -0.010);
    let n2 = builder.add_node(2, 0.0, 100.0, 0.0033);
    let n3 = builder.add_node(3, 100.0, 100.0, 0.0033);
    let n4 = builder.add_node(4, 100.0, 0.0, 0.0034);
    builder.add_pipe(1, n1, n2, Material::Polyethylene, 0.1);
    builder.add_pipe(2, n2, n3, Material::Polyethylene, 0.1);
    builder.add_pipe(3, n3, n4, Material::Polyethylene, 0.1);
    builder.add_pipe(4, n4, n1, Material::Polyethylene, 0.1);
    let network = builder.build().unwrap();

    let solution = solve(&network, &SolveConfig::default()).unwrap();

    assert!(solution.converged);
    assert!(solution.iterations >= 1, "seed flows should be out of balance");
    for diag in &solution.loops {
        assert!(diag.discrepancy_m.abs() <= 0.5);
    }
    assert_mass_balance(&network, &solution.initial_flows_m3s);
    assert_mass_balance(&network, &solution.flows_m3s);
}

#[test]
fn two_loop_network_converges() {
    // Two squares sharing the pipe 3-4: 6 nodes, 7 pipes, 2 loops.
    let mut builder = NetworkBuilder::new();
    let n1 = builder.add_node(1, 0.0, 0.0, -0.020);
    let n2 = builder.add_node(2, 0.0, 100.0, 0.004);
    let n3 = builder.add_node(3, 100.0, 100.0, 0.004);
    let n4 = builder.add_node(4, 100.0, 0.0, 0.004);
    let n5 = builder.add_node(5, 200.0, 100.0, 0.004);
    let n6 = builder.add_node(6, 200.0, 0.0, 0.004);
    builder.add_pipe(1, n1, n2, Material::Polyethylene, 0.1);
    builder.add_pipe(2, n2, n3, Material::Polyethylene, 0.1);
    builder.add_pipe(3, n3, n4, Material::Polyethylene, 0.1);
    builder.add_pipe(4, n4, n1, Material::Polyethylene, 0.1);
    builder.add_pipe(5, n3, n5, Material::Polyethylene, 0.1);
    builder.add_pipe(6, n5, n6, Material::Polyethylene, 0.1);
    builder.add_pipe(7, n6, n4, Material::Polyethylene, 0.1);
    let network = builder.build().unwrap();

    let solution = solve(&network, &SolveConfig::default()).unwrap();

    assert_eq!(solution.cycles.len(), 2);
    assert_eq!(solution.loops.len(), 2);
    assert!(solution.converged);
    for diag in &solution.loops {
        assert!(diag.within_tolerance);
    }
    assert_mass_balance(&network, &solution.flows_m3s);
}

#[test]
fn steel_network_uses_steel_roughness_and_still_converges() {
    let mut builder = NetworkBuilder::new();
    let n1 = builder.add_node(1, 0.0, 0.0, -0.015);
    let n2 = builder.add_node(2, 0.0, 150.0, 0.005);
    let n3 = builder.add_node(3, 150.0, 150.0, 0.005);
    let n4 = builder.add_node(4, 150.0, 0.0, 0.005);
    builder.add_pipe(1, n1, n2, Material::Steel, 0.15);
    builder.add_pipe(2, n2, n3, Material::Steel, 0.15);
    builder.add_pipe(3, n3, n4, Material::Steel, 0.15);
    builder.add_pipe(4, n4, n1, Material::Steel, 0.15);
    let network = builder.build().unwrap();

    let solution = solve(&network, &SolveConfig::default()).unwrap();
    assert!(solution.converged);
    assert_mass_balance(&network, &solution.flows_m3s);
}
