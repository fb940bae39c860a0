//! Vertex-centred finite volume discretization of $div(k grad T)$.
//!
//! Every node owns a rectangular control volume. Integrating the diffusion
//! operator over it and approximating the face fluxes by central differences
//! gives a five point stencil. Dividing by the control volume makes the row
//! an approximation of the pointwise operator, so sources are pointwise
//! densities as well.
//!
//! Boundary nodes carry Dirichlet conditions and get the identity row.

use crate::{
  index::NodeIdx,
  manufactured::ManufacturedSolution,
  mesh::{NodeField, NodeKind},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stencil {
  FivePoint {
    center: f64,
    west: f64,
    east: f64,
    south: f64,
    north: f64,
  },
  Dirichlet,
}

impl Stencil {
  /// Sum of all coefficients. Zero for a conservative interior stencil.
  pub fn coefficient_sum(&self) -> f64 {
    match *self {
      Self::FivePoint {
        center,
        west,
        east,
        south,
        north,
      } => center + west + east + south + north,
      Self::Dirichlet => 1.0,
    }
  }
}

pub fn stencil(field: &NodeField, conductivity: f64, inode: NodeIdx) -> Stencil {
  let node = field.node(inode);
  match node.kind() {
    NodeKind::Boundary(_) | NodeKind::Corner(..) => Stencil::Dirichlet,
    NodeKind::Interior => {
      let (icol, irow) = field.dims().position(inode);
      let coord = node.coord();
      let cell_size = node.cell_size();
      let volume = node.volume();

      // flux coefficient over a face of given length towards a neighbour at given distance
      let flux = |face_length: f64, distance: f64| conductivity * face_length / (distance * volume);

      let west = flux(cell_size.y, coord.x - field.node_at(icol - 1, irow).coord().x);
      let east = flux(cell_size.y, field.node_at(icol + 1, irow).coord().x - coord.x);
      let south = flux(cell_size.x, coord.y - field.node_at(icol, irow - 1).coord().y);
      let north = flux(cell_size.x, field.node_at(icol, irow + 1).coord().y - coord.y);
      let center = -(west + east + south + north);

      Stencil::FivePoint {
        center,
        west,
        east,
        south,
        north,
      }
    }
  }
}

/// One row of the global diffusion matrix.
pub fn diffusion_row(field: &NodeField, conductivity: f64, inode: NodeIdx) -> na::DVector<f64> {
  let dims = field.dims();
  let mut row = na::DVector::zeros(dims.nnodes());
  match stencil(field, conductivity, inode) {
    Stencil::Dirichlet => row[inode] = 1.0,
    Stencil::FivePoint {
      center,
      west,
      east,
      south,
      north,
    } => {
      let (icol, irow) = dims.position(inode);
      row[inode] = center;
      row[dims.index(icol - 1, irow)] = west;
      row[dims.index(icol + 1, irow)] = east;
      row[dims.index(icol, irow - 1)] = south;
      row[dims.index(icol, irow + 1)] = north;
    }
  }
  row
}

/// Right hand side entry: source density on the interior,
/// prescribed temperature on the boundary.
pub fn source_value(
  field: &NodeField,
  problem: &impl ManufacturedSolution,
  conductivity: f64,
  inode: NodeIdx,
) -> f64 {
  let node = field.node(inode);
  if node.kind().is_interior() {
    problem.source(node.coord(), conductivity)
  } else {
    problem.boundary_value(node.coord())
  }
}

/// Row and right hand side of the global system $-div(k grad T) = S$.
pub fn system_row(
  field: &NodeField,
  problem: &impl ManufacturedSolution,
  conductivity: f64,
  inode: NodeIdx,
) -> (na::DVector<f64>, f64) {
  let row = diffusion_row(field, conductivity, inode);
  let rhs = source_value(field, problem, conductivity, inode);
  if field.node(inode).kind().is_interior() {
    (-row, rhs)
  } else {
    (row, rhs)
  }
}
