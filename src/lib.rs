//! Finite volume solver for steady 2D heat diffusion on structured meshes,
//! verified against manufactured solutions.

extern crate nalgebra as na;

pub mod analysis;
pub mod convergence;
pub mod discretization;
pub mod error;
pub mod index;
pub mod lse;
pub mod manufactured;
pub mod mesh;
pub mod util;

pub use error::{Error, Result};
