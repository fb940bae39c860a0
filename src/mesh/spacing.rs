//! Node distribution along a single mesh direction.

/// Strategy for placing the nodes of one mesh direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Spacing {
  /// Equally spaced nodes.
  #[default]
  Uniform,
  /// Each spacing is `ratio` times the previous one.
  /// A ratio above one clusters nodes towards the minimum.
  Geometric { ratio: f64 },
}

impl Spacing {
  pub fn geometric(ratio: f64) -> Self {
    Self::Geometric { ratio }
  }

  pub fn is_valid(&self) -> bool {
    match *self {
      Self::Uniform => true,
      Self::Geometric { ratio } => ratio.is_finite() && ratio > 0.0,
    }
  }

  /// Width of the first interval, such that all `nnodes - 1` intervals
  /// exactly cover `length`.
  pub fn initial_spacing(&self, nnodes: usize, length: f64) -> f64 {
    assert!(nnodes >= 2, "need at least two nodes to span an interval");
    let nintervals = (nnodes - 1) as f64;
    match *self {
      Self::Uniform => length / nintervals,
      Self::Geometric { ratio } if is_unit_ratio(ratio) => length / nintervals,
      Self::Geometric { ratio } => length * (1.0 - ratio) / (1.0 - ratio.powi(nnodes as i32 - 1)),
    }
  }

  /// Strictly increasing node positions from `min` to `max` inclusive.
  pub fn positions(&self, nnodes: usize, min: f64, max: f64) -> Vec<f64> {
    assert!(nnodes >= 2, "need at least two nodes to span an interval");
    let ratio = match *self {
      Self::Uniform => 1.0,
      Self::Geometric { ratio } => ratio,
    };

    let mut positions = Vec::with_capacity(nnodes);
    let mut delta = self.initial_spacing(nnodes, max - min);
    let mut pos = min;
    positions.push(pos);
    for inode in 1..nnodes {
      pos = if inode == nnodes - 1 {
        max
      } else if is_unit_ratio(ratio) {
        min + (max - min) * inode as f64 / (nnodes - 1) as f64
      } else {
        pos + delta
      };
      positions.push(pos);
      delta *= ratio;
    }
    positions
  }
}

fn is_unit_ratio(ratio: f64) -> bool {
  (ratio - 1.0).abs() <= f64::EPSILON
}

/// Control volume extent of each node: half the distance to each neighbour,
/// a missing neighbour contributing nothing.
pub fn cell_sizes(positions: &[f64]) -> Vec<f64> {
  let n = positions.len();
  (0..n)
    .map(|i| {
      let left = if i > 0 {
        positions[i] - positions[i - 1]
      } else {
        0.0
      };
      let right = if i + 1 < n {
        positions[i + 1] - positions[i]
      } else {
        0.0
      };
      0.5 * (left + right)
    })
    .collect()
}

#[cfg(test)]
mod test {
  use super::*;
  use approx::assert_relative_eq;
  use itertools::Itertools;

  #[test]
  fn uniform_positions() {
    let xs = Spacing::Uniform.positions(5, 0.0, 1.0);
    assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
  }

  #[test]
  fn geometric_positions_grow_by_ratio() {
    let ratio = 1.5;
    let xs = Spacing::geometric(ratio).positions(6, 0.0, 2.0);
    assert_eq!(xs[0], 0.0);
    assert_eq!(xs[5], 2.0);
    let deltas: Vec<f64> = xs.iter().tuple_windows().map(|(a, b)| b - a).collect();
    for (a, b) in deltas.iter().tuple_windows() {
      assert_relative_eq!(b / a, ratio, epsilon = 1e-12);
    }
    assert_relative_eq!(
      deltas[0],
      Spacing::geometric(ratio).initial_spacing(6, 2.0),
      epsilon = 1e-15
    );
  }

  #[test]
  fn unit_ratio_is_uniform() {
    let uniform = Spacing::Uniform.positions(7, -1.0, 3.0);
    let geometric = Spacing::geometric(1.0).positions(7, -1.0, 3.0);
    assert_eq!(uniform, geometric);
  }

  #[test]
  fn cell_sizes_truncate_at_boundary() {
    let xs = Spacing::Uniform.positions(3, 0.0, 1.0);
    assert_eq!(cell_sizes(&xs), vec![0.25, 0.5, 0.25]);

    let xs = [0.0, 0.1, 0.4, 1.0];
    let sizes = cell_sizes(&xs);
    assert_relative_eq!(sizes[0], 0.05);
    assert_relative_eq!(sizes[1], 0.2);
    assert_relative_eq!(sizes[2], 0.45);
    assert_relative_eq!(sizes[3], 0.3);
    assert_relative_eq!(sizes.iter().sum::<f64>(), 1.0);
  }

  #[test]
  #[should_panic(expected = "at least two nodes")]
  fn single_node_has_no_spacing() {
    Spacing::geometric(0.8).initial_spacing(1, 1.0);
  }

  #[test]
  fn invalid_ratios() {
    assert!(Spacing::Uniform.is_valid());
    assert!(Spacing::geometric(0.8).is_valid());
    assert!(!Spacing::geometric(0.0).is_valid());
    assert!(!Spacing::geometric(-2.0).is_valid());
    assert!(!Spacing::geometric(f64::NAN).is_valid());
  }
}
