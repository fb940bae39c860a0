//! Error analysis against a manufactured solution.

use crate::{
  error::{Error, Result},
  manufactured::ManufacturedSolution,
  mesh::NodeField,
};

use itertools::Itertools;

pub fn absolute_error(numerical: f64, analytical: f64) -> f64 {
  (numerical - analytical).abs()
}

/// Fills the analytical solution and the absolute error of every node.
pub fn evaluate_errors(field: &mut NodeField, problem: &impl ManufacturedSolution) {
  for node in field.nodes_mut() {
    node.analytical = problem.value(node.coord());
    node.abs_error = absolute_error(node.value, node.analytical);
  }
}

/// Discrete $L^2$ norm of the error, $sqrt(sum_i V_i e_i^2)$.
pub fn l2_error(field: &NodeField) -> f64 {
  field
    .nodes()
    .iter()
    .map(|n| n.volume() * n.abs_error.powi(2))
    .sum::<f64>()
    .sqrt()
}

/// Observed order of convergence.
///
/// Least squares fit of $log(e) = c - p log(n)$ over the samples, where
/// $e$ is the mesh error and $n$ the mesh resolution, e.g. intervals per direction.
/// Returns $p$. With two samples the fit is exact.
pub fn convergence_order(errors: &[f64], resolutions: &[f64]) -> Result<f64> {
  if errors.len() != resolutions.len() {
    return Err(Error::MismatchedSamples {
      nerrors: errors.len(),
      nresolutions: resolutions.len(),
    });
  }
  if errors.len() < 2 {
    return Err(Error::InsufficientSamples(errors.len()));
  }
  if let Some(&bad) = errors
    .iter()
    .chain(resolutions)
    .find(|&&v| !(v.is_finite() && v > 0.0))
  {
    return Err(Error::NonPositiveSample(bad));
  }

  let (log_res, log_err): (Vec<f64>, Vec<f64>) = resolutions
    .iter()
    .zip(errors)
    .map(|(n, e)| (n.ln(), e.ln()))
    .multiunzip();

  let nsamples = log_res.len() as f64;
  let mean_res = log_res.iter().sum::<f64>() / nsamples;
  let mean_err = log_err.iter().sum::<f64>() / nsamples;

  let (covar, var) = log_res.iter().zip(&log_err).fold((0.0, 0.0), |(covar, var), (x, y)| {
    let dx = x - mean_res;
    (covar + dx * (y - mean_err), var + dx * dx)
  });
  if var == 0.0 {
    return Err(Error::IdenticalResolutions);
  }

  Ok(-covar / var)
}
