use super::{
  spacing::{cell_sizes, Spacing},
  Node, NodeField, NodeKind, Side,
};
use crate::{
  error::{Error, Result},
  index::GridDims,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
  min: na::Vector2<f64>,
  max: na::Vector2<f64>,
}

// constructors
impl Rect {
  pub fn new_min_max(min: na::Vector2<f64>, max: na::Vector2<f64>) -> Self {
    Self { min, max }
  }
  pub fn new_unit() -> Self {
    Self::new_min_max(na::Vector2::zeros(), na::Vector2::repeat(1.0))
  }
}
impl Default for Rect {
  fn default() -> Self {
    Self::new_unit()
  }
}

// getters
impl Rect {
  pub fn min(&self) -> &na::Vector2<f64> {
    &self.min
  }
  pub fn max(&self) -> &na::Vector2<f64> {
    &self.max
  }
  pub fn side_lengths(&self) -> na::Vector2<f64> {
    self.max - self.min
  }
  pub fn area(&self) -> f64 {
    self.side_lengths().product()
  }
  pub fn is_degenerate(&self) -> bool {
    let lengths = self.side_lengths();
    !(lengths.iter().all(|&l| l.is_finite() && l > 0.0))
  }
}

/// Builds the geometry of a structured mesh over a [`Rect`].
#[derive(Debug, Clone)]
pub struct MeshBuilder {
  ncols: usize,
  nrows: usize,
  rect: Rect,
  spacing_x: Spacing,
  spacing_y: Spacing,
}

impl MeshBuilder {
  /// `ncols` nodes in x-direction and `nrows` nodes in y-direction.
  pub fn new(ncols: usize, nrows: usize) -> Self {
    Self {
      ncols,
      nrows,
      rect: Rect::default(),
      spacing_x: Spacing::Uniform,
      spacing_y: Spacing::Uniform,
    }
  }

  pub fn rect(mut self, rect: Rect) -> Self {
    self.rect = rect;
    self
  }
  pub fn spacing(self, spacing: Spacing) -> Self {
    self.spacing_x(spacing).spacing_y(spacing)
  }
  pub fn spacing_x(mut self, spacing: Spacing) -> Self {
    self.spacing_x = spacing;
    self
  }
  pub fn spacing_y(mut self, spacing: Spacing) -> Self {
    self.spacing_y = spacing;
    self
  }

  pub fn build(self) -> Result<NodeField> {
    let Self {
      ncols,
      nrows,
      rect,
      spacing_x,
      spacing_y,
    } = self;

    if ncols < 2 || nrows < 2 {
      return Err(Error::TooFewNodes { ncols, nrows });
    }
    for spacing in [spacing_x, spacing_y] {
      if let Spacing::Geometric { ratio } = spacing {
        if !spacing.is_valid() {
          return Err(Error::InvalidStretchRatio(ratio));
        }
      }
    }
    if rect.is_degenerate() {
      return Err(Error::DegenerateDomain {
        min: [rect.min.x, rect.min.y],
        max: [rect.max.x, rect.max.y],
      });
    }

    let xs = checked_positions(spacing_x, ncols, rect.min.x, rect.max.x)?;
    let ys = checked_positions(spacing_y, nrows, rect.min.y, rect.max.y)?;
    let dxs = cell_sizes(&xs);
    let dys = cell_sizes(&ys);

    let dims = GridDims::new(ncols, nrows);
    let nodes = dims
      .positions()
      .map(|(icol, irow)| {
        let coord = na::Vector2::new(xs[icol], ys[irow]);
        let cell_size = na::Vector2::new(dxs[icol], dys[irow]);
        let kind = node_kind(icol, irow, dims);
        Node::new(coord, cell_size, kind)
      })
      .collect();

    Ok(NodeField::new(dims, rect, nodes))
  }
}

/// Strong stretching can shrink intervals below the float resolution of the
/// coordinates, leaving coincident nodes with zero volume.
fn checked_positions(spacing: Spacing, nnodes: usize, min: f64, max: f64) -> Result<Vec<f64>> {
  let positions = spacing.positions(nnodes, min, max);
  if positions.windows(2).all(|w| w[1] > w[0]) {
    Ok(positions)
  } else {
    Err(Error::CollapsedSpacing { nnodes, spacing })
  }
}

/// Uniform mesh of the unit square.
pub fn build_mesh(ncols: usize, nrows: usize) -> Result<NodeField> {
  MeshBuilder::new(ncols, nrows).build()
}

fn node_kind(icol: usize, irow: usize, dims: GridDims) -> NodeKind {
  let horizontal = if icol == 0 {
    Some(Side::West)
  } else if icol == dims.ncols() - 1 {
    Some(Side::East)
  } else {
    None
  };
  let vertical = if irow == 0 {
    Some(Side::South)
  } else if irow == dims.nrows() - 1 {
    Some(Side::North)
  } else {
    None
  };

  match (horizontal, vertical) {
    (None, None) => NodeKind::Interior,
    (Some(side), None) | (None, Some(side)) => NodeKind::Boundary(side),
    (Some(h), Some(v)) => NodeKind::Corner(h, v),
  }
}
