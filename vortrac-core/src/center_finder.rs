//! Locates the circulation center at one analysis level with a bounded
//! Nelder–Mead simplex search, maximizing mean VTC0 over a band of radii.
//!
//! Grounded on `original_source/tags/1.0-alpha/Threads/VortexThread.cpp`'s
//! per-level center-finding loop (seed from the prior record, bounded search
//! box, simplex convergence before moving to the next level).

/// A candidate (x, y) center in the volume's local Cartesian frame, in
/// kilometers relative to the radar.
type Point = (f32, f32);

/// The result of one level's center search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterResult {
    pub x_km: f32,
    pub y_km: f32,
    /// Spread of the simplex's vertices at convergence, in kilometers —
    /// reported as the level's `center_std_km`.
    pub center_std_km: f32,
    pub iterations: usize,
}

/// Nelder–Mead simplex search over a 2-D (x, y) center, maximizing an
/// objective (typically mean VTC0 over a band of radii) supplied by the
/// caller per candidate point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexCenterFinder {
    /// Convergence threshold: search stops once the simplex's diameter
    /// falls below this, in kilometers.
    pub epsilon_xy_km: f32,
    pub max_iterations: usize,
    /// Half-width of the initial simplex around the seed, in kilometers.
    pub initial_step_km: f32,
}

impl Default for SimplexCenterFinder {
    fn default() -> Self {
        Self {
            epsilon_xy_km: 0.1,
            max_iterations: 200,
            initial_step_km: 5.0,
        }
    }
}

impl SimplexCenterFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epsilon_xy_km(mut self, epsilon_xy_km: f32) -> Self {
        self.epsilon_xy_km = epsilon_xy_km;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_initial_step_km(mut self, initial_step_km: f32) -> Self {
        self.initial_step_km = initial_step_km;
        self
    }

    /// Searches for the center maximizing `objective(x, y)` starting from
    /// `seed`. `objective` returns `None` for a candidate that falls outside
    /// the volume (e.g. too close to the boundary to sample a full ring),
    /// which is treated as an infinitely bad score but still a valid
    /// simplex vertex for the purposes of reflection/contraction.
    ///
    /// Returns `None` if every vertex of the initial simplex is out of
    /// bounds (no usable gradient to follow).
    pub fn find_center(&self, seed: Point, mut objective: impl FnMut(f32, f32) -> Option<f32>) -> Option<CenterResult> {
        let mut score = |p: Point| -> f64 {
            match objective(p.0, p.1) {
                Some(vtc0_mean) => -(vtc0_mean as f64),
                None => f64::INFINITY,
            }
        };

        let step = self.initial_step_km;
        let mut vertices: Vec<Point> = vec![
            seed,
            (seed.0 + step, seed.1),
            (seed.0, seed.1 + step),
        ];
        let mut values: Vec<f64> = vertices.iter().map(|&p| score(p)).collect();

        if values.iter().all(|v| !v.is_finite()) {
            return None;
        }

        let mut iterations = 0;
        while iterations < self.max_iterations && diameter(&vertices) >= self.epsilon_xy_km as f64 {
            iterations += 1;
            sort_by_value(&mut vertices, &mut values, seed);

            let worst = vertices[2];
            let worst_value = values[2];
            let centroid = (
                (vertices[0].0 + vertices[1].0) / 2.0,
                (vertices[0].1 + vertices[1].1) / 2.0,
            );

            let reflected = (
                centroid.0 + (centroid.0 - worst.0),
                centroid.1 + (centroid.1 - worst.1),
            );
            let reflected_value = score(reflected);

            if reflected_value < values[0] {
                let expanded = (
                    centroid.0 + 2.0 * (centroid.0 - worst.0),
                    centroid.1 + 2.0 * (centroid.1 - worst.1),
                );
                let expanded_value = score(expanded);
                if expanded_value < reflected_value {
                    vertices[2] = expanded;
                    values[2] = expanded_value;
                } else {
                    vertices[2] = reflected;
                    values[2] = reflected_value;
                }
                continue;
            }

            if reflected_value < values[1] {
                vertices[2] = reflected;
                values[2] = reflected_value;
                continue;
            }

            let contracted = (
                centroid.0 + 0.5 * (worst.0 - centroid.0),
                centroid.1 + 0.5 * (worst.1 - centroid.1),
            );
            let contracted_value = score(contracted);
            if contracted_value < worst_value {
                vertices[2] = contracted;
                values[2] = contracted_value;
                continue;
            }

            // Shrink toward the best vertex.
            let best = vertices[0];
            for i in 1..3 {
                vertices[i] = (
                    best.0 + 0.5 * (vertices[i].0 - best.0),
                    best.1 + 0.5 * (vertices[i].1 - best.1),
                );
                values[i] = score(vertices[i]);
            }
        }

        sort_by_value(&mut vertices, &mut values, seed);
        if !values[0].is_finite() {
            return None;
        }

        Some(CenterResult {
            x_km: vertices[0].0,
            y_km: vertices[0].1,
            center_std_km: diameter(&vertices) as f32,
            iterations,
        })
    }
}

fn dist(a: Point, b: Point) -> f64 {
    let dx = (a.0 - b.0) as f64;
    let dy = (a.1 - b.1) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn diameter(vertices: &[Point]) -> f64 {
    let mut max = 0.0f64;
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            max = max.max(dist(vertices[i], vertices[j]));
        }
    }
    max
}

/// Sorts vertices/values ascending by value (best first), breaking ties by
/// smaller displacement from `seed`, then smaller x, then smaller y.
fn sort_by_value(vertices: &mut [Point], values: &mut [f64], seed: Point) {
    let mut indices: Vec<usize> = (0..vertices.len()).collect();
    indices.sort_by(|&i, &j| {
        let vi = values[i];
        let vj = values[j];
        if (vi - vj).abs() > 1e-9 {
            return vi.partial_cmp(&vj).unwrap();
        }
        let di = dist(vertices[i], seed);
        let dj = dist(vertices[j], seed);
        if (di - dj).abs() > 1e-9 {
            return di.partial_cmp(&dj).unwrap();
        }
        if vertices[i].0 != vertices[j].0 {
            return vertices[i].0.partial_cmp(&vertices[j].0).unwrap();
        }
        vertices[i].1.partial_cmp(&vertices[j].1).unwrap()
    });

    let sorted_vertices: Vec<Point> = indices.iter().map(|&i| vertices[i]).collect();
    let sorted_values: Vec<f64> = indices.iter().map(|&i| values[i]).collect();
    vertices.copy_from_slice(&sorted_vertices);
    values.copy_from_slice(&sorted_values);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_peak_of_a_simple_paraboloid() {
        let finder = SimplexCenterFinder::new().with_initial_step_km(2.0);
        // Objective peaks (VTC0 maximal) at (3.0, -2.0).
        let result = finder
            .find_center((0.0, 0.0), |x, y| {
                let dx = x - 3.0;
                let dy = y + 2.0;
                Some(100.0 - (dx * dx + dy * dy))
            })
            .unwrap();

        assert!((result.x_km - 3.0).abs() < 0.2, "x = {}", result.x_km);
        assert!((result.y_km + 2.0).abs() < 0.2, "y = {}", result.y_km);
        assert!(result.center_std_km < 0.2);
    }

    #[test]
    fn returns_none_when_entirely_out_of_bounds() {
        let finder = SimplexCenterFinder::new();
        let result = finder.find_center((0.0, 0.0), |_, _| None);
        assert!(result.is_none());
    }

    #[test]
    fn converges_within_iteration_cap() {
        let finder = SimplexCenterFinder::new().with_max_iterations(500);
        let result = finder
            .find_center((10.0, 10.0), |x, y| Some(-(x * x + y * y)))
            .unwrap();
        assert!(result.iterations <= 500);
    }
}
