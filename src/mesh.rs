//! Structured mesh of a rectangle and the per-node data living on it.
//!
//! A [`NodeField`] owns one [`Node`] record per mesh node, stored in
//! linear index order (see [`crate::index`]). Geometry is fixed at
//! construction; the solver and the error analysis fill in the
//! remaining fields.

pub mod cartesian;
pub mod spacing;

pub use cartesian::{build_mesh, MeshBuilder, Rect};
pub use spacing::Spacing;

use crate::index::{GridDims, NodeIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
  West,
  East,
  South,
  North,
}

/// Where a node sits relative to the domain boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
  Interior,
  Boundary(Side),
  /// On two boundaries at once, horizontal side first.
  Corner(Side, Side),
}
impl NodeKind {
  pub fn is_interior(&self) -> bool {
    matches!(self, Self::Interior)
  }
  pub fn is_boundary(&self) -> bool {
    !self.is_interior()
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
  coord: na::Vector2<f64>,
  cell_size: na::Vector2<f64>,
  volume: f64,
  kind: NodeKind,

  pub value: f64,
  pub analytical: f64,
  pub abs_error: f64,
}

impl Node {
  pub fn new(coord: na::Vector2<f64>, cell_size: na::Vector2<f64>, kind: NodeKind) -> Self {
    Self {
      coord,
      cell_size,
      volume: cell_size.product(),
      kind,
      value: 0.0,
      analytical: 0.0,
      abs_error: 0.0,
    }
  }

  pub fn coord(&self) -> &na::Vector2<f64> {
    &self.coord
  }
  pub fn cell_size(&self) -> &na::Vector2<f64> {
    &self.cell_size
  }
  pub fn volume(&self) -> f64 {
    self.volume
  }
  pub fn kind(&self) -> NodeKind {
    self.kind
  }
}

#[derive(Debug, Clone)]
pub struct NodeField {
  dims: GridDims,
  rect: Rect,
  nodes: Vec<Node>,
}

impl NodeField {
  pub fn new(dims: GridDims, rect: Rect, nodes: Vec<Node>) -> Self {
    assert_eq!(nodes.len(), dims.nnodes());
    Self { dims, rect, nodes }
  }

  pub fn dims(&self) -> GridDims {
    self.dims
  }
  pub fn ncols(&self) -> usize {
    self.dims.ncols()
  }
  pub fn nrows(&self) -> usize {
    self.dims.nrows()
  }
  pub fn nnodes(&self) -> usize {
    self.nodes.len()
  }
  pub fn rect(&self) -> &Rect {
    &self.rect
  }

  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }
  pub fn nodes_mut(&mut self) -> &mut [Node] {
    &mut self.nodes
  }
  pub fn node(&self, inode: NodeIdx) -> &Node {
    &self.nodes[inode]
  }
  pub fn node_mut(&mut self, inode: NodeIdx) -> &mut Node {
    &mut self.nodes[inode]
  }
  pub fn node_at(&self, icol: usize, irow: usize) -> &Node {
    &self.nodes[self.dims.index(icol, irow)]
  }
  pub fn node_at_mut(&mut self, icol: usize, irow: usize) -> &mut Node {
    let inode = self.dims.index(icol, irow);
    &mut self.nodes[inode]
  }

  pub fn total_volume(&self) -> f64 {
    self.nodes.iter().map(Node::volume).sum()
  }
  pub fn max_abs_error(&self) -> f64 {
    self.nodes.iter().map(|n| n.abs_error).fold(0.0, f64::max)
  }

  /// Solved field as `ncols x nrows` matrix indexed by `(icol, irow)`.
  pub fn value_grid(&self) -> na::DMatrix<f64> {
    self.grid(|n| n.value)
  }
  pub fn analytical_grid(&self) -> na::DMatrix<f64> {
    self.grid(|n| n.analytical)
  }
  pub fn abs_error_grid(&self) -> na::DMatrix<f64> {
    self.grid(|n| n.abs_error)
  }
  pub fn grid(&self, f: impl Fn(&Node) -> f64) -> na::DMatrix<f64> {
    na::DMatrix::from_fn(self.ncols(), self.nrows(), |icol, irow| {
      f(self.node_at(icol, irow))
    })
  }
}
