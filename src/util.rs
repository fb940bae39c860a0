pub fn indicies_to_flags(indicies: &[usize], len: usize) -> Vec<bool> {
  let mut flags = vec![false; len];
  indicies.iter().for_each(|&i| flags[i] = true);
  flags
}

/// Observed algebraic rate between two successive errors,
/// when the resolution grew by `refinement`.
pub fn algebraic_convergence_rate(next: f64, prev: f64, refinement: f64) -> f64 {
  let quot: f64 = next / prev;
  -quot.ln() / refinement.ln()
}

#[cfg(test)]
mod test {
  use super::*;
  use approx::assert_relative_eq;

  #[test]
  fn flags() {
    assert_eq!(
      indicies_to_flags(&[0, 3], 5),
      vec![true, false, false, true, false]
    );
  }

  #[test]
  fn rate_of_halving() {
    assert_relative_eq!(algebraic_convergence_rate(0.25, 1.0, 2.0), 2.0, epsilon = 1e-12);
    assert_relative_eq!(algebraic_convergence_rate(1e-3, 1.0, 10.0), 3.0, epsilon = 1e-12);
  }
}
