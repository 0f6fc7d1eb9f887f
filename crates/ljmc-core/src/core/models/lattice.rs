use nalgebra::Vector3;

const FCC_BASIS: [[f64; 3]; 4] = [
    [0.25, 0.25, 0.25],
    [0.75, 0.75, 0.25],
    [0.75, 0.25, 0.75],
    [0.25, 0.75, 0.75],
];

/// Smallest number of FCC unit cells per side holding at least `n` particles.
pub fn fcc_cells_per_side(n: usize) -> usize {
    let mut n_cell = 1usize;
    while 4 * n_cell.pow(3) < n {
        n_cell += 1;
    }
    n_cell
}

/// Face-centred cubic arrangement of `n` particles filling the unit box, in box units.
///
/// When `n` is not of the form `4k³` the lattice is built for the next larger `k` and truncated.
pub fn fcc_lattice(n: usize) -> Vec<Vector3<f64>> {
    let n_cell = fcc_cells_per_side(n);
    let a = 1.0 / n_cell as f64;

    let mut positions = Vec::with_capacity(n);
    'cells: for ix in 0..n_cell {
        for iy in 0..n_cell {
            for iz in 0..n_cell {
                for b in &FCC_BASIS {
                    if positions.len() == n {
                        break 'cells;
                    }
                    positions.push(Vector3::new(
                        (ix as f64 + b[0]) * a - 0.5,
                        (iy as f64 + b[1]) * a - 0.5,
                        (iz as f64 + b[2]) * a - 0.5,
                    ));
                }
            }
        }
    }
    positions
}
