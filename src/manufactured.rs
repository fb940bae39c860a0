//! Manufactured solutions of the steady diffusion problem $-div(k grad T) = S$.
//!
//! A manufactured solution prescribes $T$ in closed form. The source term
//! and the Dirichlet data are derived from it, so the discrete solution
//! can be compared against the exact one.

use std::f64::consts::PI;

pub trait ManufacturedSolution {
  fn value(&self, x: &na::Vector2<f64>) -> f64;
  fn laplacian(&self, x: &na::Vector2<f64>) -> f64;

  /// Source $S = -k Delta T$ for constant conductivity $k$.
  fn source(&self, x: &na::Vector2<f64>, conductivity: f64) -> f64 {
    -conductivity * self.laplacian(x)
  }
  fn boundary_value(&self, x: &na::Vector2<f64>) -> f64 {
    self.value(x)
  }
}

impl<M: ManufacturedSolution + ?Sized> ManufacturedSolution for &M {
  fn value(&self, x: &na::Vector2<f64>) -> f64 {
    (**self).value(x)
  }
  fn laplacian(&self, x: &na::Vector2<f64>) -> f64 {
    (**self).laplacian(x)
  }
}

/// $T = -x^2 (1 - x^2) y^2 (1 - y^2)$
///
/// Vanishes on the whole boundary of the unit square.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuarticBubble;

impl QuarticBubble {
  fn profile(t: f64) -> f64 {
    let t2 = t * t;
    t2 * (1.0 - t2)
  }
  fn profile_dif2(t: f64) -> f64 {
    2.0 - 12.0 * t * t
  }
}

impl ManufacturedSolution for QuarticBubble {
  fn value(&self, x: &na::Vector2<f64>) -> f64 {
    -Self::profile(x.x) * Self::profile(x.y)
  }
  fn laplacian(&self, x: &na::Vector2<f64>) -> f64 {
    -(Self::profile_dif2(x.x) * Self::profile(x.y) + Self::profile(x.x) * Self::profile_dif2(x.y))
  }
}

/// $T = sin(pi x) sinh(pi y) / sinh(pi)$
///
/// Harmonic, so there is no source. Zero on three edges of the unit square
/// and $sin(pi x)$ on the north edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarmonicSinh;

impl ManufacturedSolution for HarmonicSinh {
  fn value(&self, x: &na::Vector2<f64>) -> f64 {
    (PI * x.x).sin() * (PI * x.y).sinh() / PI.sinh()
  }
  fn laplacian(&self, _x: &na::Vector2<f64>) -> f64 {
    0.0
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use approx::assert_abs_diff_eq;

  fn third(i: usize, j: usize) -> na::Vector2<f64> {
    na::Vector2::new(i as f64 / 3.0, j as f64 / 3.0)
  }

  #[test]
  fn quartic_bubble_values() {
    let sol = QuarticBubble;
    for i in 0..4 {
      for j in [0, 3] {
        assert_abs_diff_eq!(sol.value(&third(i, j)), 0.0);
        assert_abs_diff_eq!(sol.value(&third(j, i)), 0.0);
      }
    }
    assert_abs_diff_eq!(sol.value(&third(1, 1)), -0.009754610577655843, epsilon = 1e-15);
    assert_abs_diff_eq!(sol.value(&third(2, 1)), -0.024386526444139613, epsilon = 1e-15);
    assert_abs_diff_eq!(sol.value(&third(1, 2)), -0.024386526444139613, epsilon = 1e-15);
    assert_abs_diff_eq!(sol.value(&third(2, 2)), -0.060966316110349042, epsilon = 1e-15);
  }

  #[test]
  fn quartic_bubble_source() {
    let sol = QuarticBubble;
    let k = 4.0;
    assert_abs_diff_eq!(sol.source(&third(1, 1), k), 0.52674897119341568, epsilon = 1e-12);
    assert_abs_diff_eq!(sol.source(&third(2, 1), k), -0.6584362139917691, epsilon = 1e-12);
    assert_abs_diff_eq!(sol.source(&third(1, 2), k), -0.65843621399176921, epsilon = 1e-12);
    assert_abs_diff_eq!(sol.source(&third(2, 2), k), -6.5843621399176948, epsilon = 1e-12);
  }

  /// Laplacian against a central second difference.
  #[test]
  fn laplacians_match_finite_differences() {
    let h = 1e-4;
    let check = |sol: &dyn ManufacturedSolution, x: na::Vector2<f64>| {
      let ex = na::Vector2::new(h, 0.0);
      let ey = na::Vector2::new(0.0, h);
      let fd = (sol.value(&(x + ex)) + sol.value(&(x - ex)) + sol.value(&(x + ey))
        + sol.value(&(x - ey))
        - 4.0 * sol.value(&x))
        / (h * h);
      assert_abs_diff_eq!(fd, sol.laplacian(&x), epsilon = 1e-5);
    };
    for x in [
      na::Vector2::new(0.3, 0.6),
      na::Vector2::new(0.75, 0.2),
      na::Vector2::new(0.5, 0.5),
    ] {
      check(&QuarticBubble, x);
      check(&HarmonicSinh, x);
    }
  }

  #[test]
  fn harmonic_sinh_boundary() {
    let sol = HarmonicSinh;
    assert_abs_diff_eq!(sol.boundary_value(&na::Vector2::new(0.5, 1.0)), 1.0, epsilon = 1e-14);
    assert_abs_diff_eq!(sol.boundary_value(&na::Vector2::new(0.5, 0.0)), 0.0);
    assert_abs_diff_eq!(sol.source(&na::Vector2::new(0.2, 0.3), 3.0), 0.0);
  }
}
