//! Mapping between structured mesh positions and linear system offsets.
//!
//! Nodes are ordered row-major: all nodes of row 0 (west to east),
//! then row 1, and so on. Everything that turns a mesh position into a
//! matrix row or vector entry goes through [`node_index`].

pub type NodeIdx = usize;

/// converts cartesian mesh position to linear index
pub fn node_index(icol: usize, irow: usize, ncols: usize) -> NodeIdx {
  irow * ncols + icol
}

/// converts linear index to cartesian mesh position `(icol, irow)`
pub fn node_position(inode: NodeIdx, ncols: usize) -> (usize, usize) {
  (inode % ncols, inode / ncols)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
  ncols: usize,
  nrows: usize,
}

impl GridDims {
  pub fn new(ncols: usize, nrows: usize) -> Self {
    Self { ncols, nrows }
  }

  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn nnodes(&self) -> usize {
    self.ncols * self.nrows
  }

  pub fn index(&self, icol: usize, irow: usize) -> NodeIdx {
    debug_assert!(icol < self.ncols && irow < self.nrows);
    node_index(icol, irow, self.ncols)
  }
  pub fn position(&self, inode: NodeIdx) -> (usize, usize) {
    debug_assert!(inode < self.nnodes());
    node_position(inode, self.ncols)
  }

  /// All mesh positions in linear index order.
  pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
    let ncols = self.ncols;
    (0..self.nnodes()).map(move |inode| node_position(inode, ncols))
  }
}
