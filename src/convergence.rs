//! Mesh refinement loops on top of the solve and error analysis.

use crate::{
  analysis::{self, convergence_order},
  error::{Error, Result},
  lse::{check_conductivity, solve_diffusion},
  manufactured::ManufacturedSolution,
  mesh::{MeshBuilder, NodeField, Spacing},
  util::algebraic_convergence_rate,
};

use itertools::Itertools;
use tracing::{info, warn};

/// Solves on the given mesh and compares against the manufactured solution.
pub fn solve_and_analyze<P>(field: NodeField, problem: &P, conductivity: f64) -> Result<NodeField>
where
  P: ManufacturedSolution + Sync,
{
  let mut field = solve_diffusion(field, problem, conductivity)?;
  analysis::evaluate_errors(&mut field, problem);
  Ok(field)
}

/// How the node count of a direction grows between iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refinement {
  /// Add a fixed number of nodes.
  Increment(usize),
  /// Halve every interval, `n -> 2n - 1`. Coarse nodes stay mesh nodes.
  DoubleIntervals,
}
impl Refinement {
  pub fn refine(&self, nnodes: usize) -> usize {
    match *self {
      Self::Increment(step) => nnodes + step,
      Self::DoubleIntervals => 2 * nnodes - 1,
    }
  }
}

#[derive(Debug, Clone)]
pub struct ConvergenceConfig {
  pub initial_nodes: (usize, usize),
  pub conductivity: f64,
  pub tolerance: f64,
  pub refinement: Refinement,
  pub spacing: Spacing,
  /// Number of solves after which the loop gives up. At least one solve happens.
  pub max_iterations: usize,
  /// Largest admissible total node count of a mesh.
  pub max_nodes: usize,
}

impl Default for ConvergenceConfig {
  fn default() -> Self {
    Self {
      initial_nodes: (10, 10),
      conductivity: 4.0,
      tolerance: 1e-4,
      refinement: Refinement::DoubleIntervals,
      spacing: Spacing::Uniform,
      max_iterations: 8,
      max_nodes: 64 * 64,
    }
  }
}

impl ConvergenceConfig {
  pub fn with_initial_nodes(mut self, ncols: usize, nrows: usize) -> Self {
    self.initial_nodes = (ncols, nrows);
    self
  }
  pub fn with_conductivity(mut self, conductivity: f64) -> Self {
    self.conductivity = conductivity;
    self
  }
  pub fn with_tolerance(mut self, tolerance: f64) -> Self {
    self.tolerance = tolerance;
    self
  }
  pub fn with_refinement(mut self, refinement: Refinement) -> Self {
    self.refinement = refinement;
    self
  }
  pub fn with_spacing(mut self, spacing: Spacing) -> Self {
    self.spacing = spacing;
    self
  }
  pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
    self.max_iterations = max_iterations;
    self
  }
  pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
    self.max_nodes = max_nodes;
    self
  }

  pub fn validate(&self) -> Result<()> {
    let (ncols, nrows) = self.initial_nodes;
    if ncols < 2 || nrows < 2 {
      return Err(Error::TooFewNodes { ncols, nrows });
    }
    if ncols * nrows > self.max_nodes {
      return Err(Error::ResolutionCap {
        nnodes: ncols * nrows,
        max_nodes: self.max_nodes,
      });
    }
    check_conductivity(self.conductivity)?;
    if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
      return Err(Error::InvalidTolerance(self.tolerance));
    }
    if self.refinement == Refinement::Increment(0) {
      return Err(Error::ZeroRefinement);
    }
    if let Spacing::Geometric { ratio } = self.spacing {
      if !self.spacing.is_valid() {
        return Err(Error::InvalidStretchRatio(ratio));
      }
    }
    Ok(())
  }

  fn build_mesh(&self, ncols: usize, nrows: usize) -> Result<NodeField> {
    MeshBuilder::new(ncols, nrows).spacing(self.spacing).build()
  }
}

/// Error measurements of one solved mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceStep {
  pub ncols: usize,
  pub nrows: usize,
  pub max_error: f64,
  pub l2_error: f64,
}
impl ConvergenceStep {
  pub fn from_field(field: &NodeField) -> Self {
    Self {
      ncols: field.ncols(),
      nrows: field.nrows(),
      max_error: field.max_abs_error(),
      l2_error: analysis::l2_error(field),
    }
  }

  pub fn nnodes(&self) -> usize {
    self.ncols * self.nrows
  }
  /// Intervals per direction, the inverse mesh spacing on the unit square.
  /// Geometric mean for non-square meshes.
  pub fn resolution(&self) -> f64 {
    (((self.ncols - 1) * (self.nrows - 1)) as f64).sqrt()
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvergenceHistory {
  steps: Vec<ConvergenceStep>,
}
impl ConvergenceHistory {
  pub fn push(&mut self, step: ConvergenceStep) {
    self.steps.push(step);
  }
  pub fn steps(&self) -> &[ConvergenceStep] {
    &self.steps
  }
  pub fn len(&self) -> usize {
    self.steps.len()
  }
  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }
  pub fn last(&self) -> Option<&ConvergenceStep> {
    self.steps.last()
  }

  /// `(resolution, max error)` pairs, ready for a convergence plot.
  pub fn pairs(&self) -> Vec<(f64, f64)> {
    self
      .steps
      .iter()
      .map(|s| (s.resolution(), s.max_error))
      .collect()
  }
  pub fn max_errors(&self) -> Vec<f64> {
    self.steps.iter().map(|s| s.max_error).collect()
  }
  pub fn resolutions(&self) -> Vec<f64> {
    self.steps.iter().map(ConvergenceStep::resolution).collect()
  }

  /// Observed order over the whole history.
  pub fn order(&self) -> Result<f64> {
    convergence_order(&self.max_errors(), &self.resolutions())
  }
  /// Observed order between each pair of successive meshes.
  pub fn rates(&self) -> Vec<f64> {
    self
      .steps
      .iter()
      .tuple_windows()
      .map(|(prev, next)| {
        algebraic_convergence_rate(
          next.max_error,
          prev.max_error,
          next.resolution() / prev.resolution(),
        )
      })
      .collect()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
  Converged,
  /// Iteration or node cap hit before reaching the tolerance.
  NotConverged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceReport {
  pub status: ConvergenceStatus,
  /// The last (finest) mesh solved.
  pub final_step: ConvergenceStep,
  pub history: ConvergenceHistory,
}
impl ConvergenceReport {
  pub fn is_converged(&self) -> bool {
    self.status == ConvergenceStatus::Converged
  }
}

/// Refines the mesh until the maximum absolute error drops below the
/// tolerance, the iteration cap is reached or the next mesh would exceed
/// the node cap.
pub fn drive_convergence<P>(config: &ConvergenceConfig, problem: &P) -> Result<ConvergenceReport>
where
  P: ManufacturedSolution + Sync,
{
  config.validate()?;

  let (mut ncols, mut nrows) = config.initial_nodes;
  let mut history = ConvergenceHistory::default();
  let (status, final_step) = loop {
    let field = config.build_mesh(ncols, nrows)?;
    let field = solve_and_analyze(field, problem, config.conductivity)?;
    let step = ConvergenceStep::from_field(&field);
    history.push(step);
    info!(
      ncols,
      nrows,
      max_error = step.max_error,
      l2_error = step.l2_error,
      "solved mesh"
    );

    if step.max_error <= config.tolerance {
      break (ConvergenceStatus::Converged, step);
    }
    if history.len() >= config.max_iterations {
      warn!(
        iterations = history.len(),
        max_error = step.max_error,
        tolerance = config.tolerance,
        "iteration cap reached before tolerance"
      );
      break (ConvergenceStatus::NotConverged, step);
    }

    let next = (config.refinement.refine(ncols), config.refinement.refine(nrows));
    if next.0 * next.1 > config.max_nodes {
      warn!(
        ncols = next.0,
        nrows = next.1,
        max_nodes = config.max_nodes,
        "next mesh exceeds node cap before tolerance"
      );
      break (ConvergenceStatus::NotConverged, step);
    }
    (ncols, nrows) = next;
  };

  Ok(ConvergenceReport {
    status,
    final_step,
    history,
  })
}

/// Solves on square meshes with the given nodes per direction.
pub fn convergence_study<P>(
  resolutions: &[usize],
  config: &ConvergenceConfig,
  problem: &P,
) -> Result<ConvergenceHistory>
where
  P: ManufacturedSolution + Sync,
{
  check_conductivity(config.conductivity)?;
  let mut history = ConvergenceHistory::default();
  for &nnodes_axis in resolutions {
    let field = config.build_mesh(nnodes_axis, nnodes_axis)?;
    let field = solve_and_analyze(field, problem, config.conductivity)?;
    let step = ConvergenceStep::from_field(&field);
    info!(nnodes_axis, max_error = step.max_error, "solved mesh");
    history.push(step);
  }
  Ok(history)
}
