//! Node-pipe incidence system assembly.

use hn_core::Real;
use hn_network::Network;
use nalgebra::{DMatrix, DVector};

/// Assemble the incidence matrix A and demand vector b for a network.
///
/// Rows are all nodes except the reference node (nodes are stored sorted by
/// id and the reference is the last, so rows are node indices `0..n-1`).
/// Columns are pipes in sorted-id order. Entry is -1 where the pipe starts
/// and +1 where it ends, so `(A q)_i` is the net inflow at node i and the
/// balance equation is `A q = b` with b the signed demand in m3/s.
///
/// The reference node's balance is implied by the others (mass conservation)
/// and omitting it keeps the rows independent.
pub fn assemble(network: &Network) -> (DMatrix<Real>, DVector<Real>) {
    let rows = network.node_count() - 1;
    let cols = network.pipe_count();

    let mut a = DMatrix::zeros(rows, cols);
    for j in 0..cols {
        let (si, ei) = network.pipe_endpoints(j);
        if si < rows {
            a[(si, j)] = -1.0;
        }
        if ei < rows {
            a[(ei, j)] = 1.0;
        }
    }

    let mut b = DVector::zeros(rows);
    for (i, node) in network.nodes()[..rows].iter().enumerate() {
        b[i] = node.demand_m3s;
    }

    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_hydraulics::Material;
    use hn_network::NetworkBuilder;

    fn triangle() -> Network {
        let mut b = NetworkBuilder::new();
        let n1 = b.add_node(1, 0.0, 0.0, -0.01);
        let n2 = b.add_node(2, 100.0, 0.0, 0.004);
        let n3 = b.add_node(3, 50.0, 80.0, 0.006);
        b.add_pipe(1, n1, n2, Material::Steel, 0.1);
        b.add_pipe(2, n2, n3, Material::Steel, 0.1);
        b.add_pipe(3, n3, n1, Material::Steel, 0.1);
        b.build().unwrap()
    }

    #[test]
    fn shape_excludes_reference_row() {
        let net = triangle();
        let (a, b) = assemble(&net);
        assert_eq!(a.shape(), (2, 3));
        assert_eq!(b.len(), 2);
        assert_eq!(b[0], -0.01);
        assert_eq!(b[1], 0.004);
    }

    #[test]
    fn each_column_has_one_start_and_one_end() {
        let net = triangle();
        let (a, _) = assemble(&net);

        // Reconstruct the full incidence (with the reference row) and check
        // each column carries exactly one -1 and one +1.
        let rows = net.node_count() - 1;
        for j in 0..net.pipe_count() {
            let (si, ei) = net.pipe_endpoints(j);
            let mut full = vec![0.0; net.node_count()];
            for i in 0..rows {
                full[i] = a[(i, j)];
            }
            if si == net.reference_index() {
                full[si] = -1.0;
            }
            if ei == net.reference_index() {
                full[ei] = 1.0;
            }
            assert_eq!(full.iter().filter(|&&v| v == -1.0).count(), 1);
            assert_eq!(full.iter().filter(|&&v| v == 1.0).count(), 1);
            assert_eq!(full.iter().sum::<f64>(), 0.0);
        }
    }
}
