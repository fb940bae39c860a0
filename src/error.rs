use crate::mesh::Spacing;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
  #[error("mesh needs at least 2 nodes per direction, got {ncols}x{nrows}")]
  TooFewNodes { ncols: usize, nrows: usize },
  #[error("geometric stretch ratio must be positive and finite, got {0}")]
  InvalidStretchRatio(f64),
  #[error("{nnodes} nodes with spacing {spacing:?} collapse below floating point resolution")]
  CollapsedSpacing { nnodes: usize, spacing: Spacing },
  #[error("domain must have positive extent in both directions, got min={min:?} max={max:?}")]
  DegenerateDomain { min: [f64; 2], max: [f64; 2] },
  #[error("thermal conductivity must be positive and finite, got {0}")]
  NonPositiveConductivity(f64),
  #[error("refinement increment must be at least one node")]
  ZeroRefinement,
  #[error("error tolerance must be positive and finite, got {0}")]
  InvalidTolerance(f64),
  #[error("convergence order needs at least 2 samples, got {0}")]
  InsufficientSamples(usize),
  #[error("got {nerrors} errors but {nresolutions} resolutions")]
  MismatchedSamples { nerrors: usize, nresolutions: usize },
  #[error("convergence samples must be positive and finite, got {0}")]
  NonPositiveSample(f64),
  #[error("convergence order is undefined when all resolutions are equal")]
  IdenticalResolutions,
  #[error("initial mesh has {nnodes} nodes, above the cap of {max_nodes}")]
  ResolutionCap { nnodes: usize, max_nodes: usize },
  #[error("linear system of size {0} is singular")]
  SingularSystem(usize),
}
