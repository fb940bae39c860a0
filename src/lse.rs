//! Assembly and direct solution of the dense linear system.

use crate::{
  discretization::system_row,
  error::{Error, Result},
  index::NodeIdx,
  manufactured::ManufacturedSolution,
  mesh::NodeField,
  util,
};

use rayon::prelude::*;
use tracing::debug;

/// $A T = b$, one row per mesh node in linear index order.
#[derive(Debug, Clone)]
pub struct LinearSystem {
  matrix: na::DMatrix<f64>,
  rhs: na::DVector<f64>,
}

impl LinearSystem {
  pub fn new(matrix: na::DMatrix<f64>, rhs: na::DVector<f64>) -> Self {
    assert!(matrix.is_square());
    assert_eq!(matrix.nrows(), rhs.len());
    Self { matrix, rhs }
  }

  pub fn size(&self) -> usize {
    self.rhs.len()
  }
  pub fn matrix(&self) -> &na::DMatrix<f64> {
    &self.matrix
  }
  pub fn rhs(&self) -> &na::DVector<f64> {
    &self.rhs
  }

  /// Moves the known values of the `fixed` nodes to the right hand side.
  ///
  /// Fixed rows must already be unit rows carrying their value in the
  /// right hand side. Afterwards their columns vanish outside the diagonal,
  /// so the fixed values come out of the solve exactly.
  pub fn lift_dirichlet(&mut self, fixed: &[NodeIdx]) {
    let size = self.size();
    let fixed_flags = util::indicies_to_flags(fixed, size);
    for &jfixed in fixed {
      let value = self.rhs[jfixed];
      for irow in (0..size).filter(|&irow| !fixed_flags[irow]) {
        let coeff = self.matrix[(irow, jfixed)];
        if coeff != 0.0 {
          self.rhs[irow] -= coeff * value;
          self.matrix[(irow, jfixed)] = 0.0;
        }
      }
    }
  }

  /// Direct solve by LU decomposition with partial pivoting.
  pub fn solve(&self) -> Result<na::DVector<f64>> {
    let size = self.size();
    let solution = self
      .matrix
      .clone()
      .lu()
      .solve(&self.rhs)
      .ok_or(Error::SingularSystem(size))?;
    if solution.iter().all(|v| v.is_finite()) {
      Ok(solution)
    } else {
      Err(Error::SingularSystem(size))
    }
  }
}

/// Assembles the global system row by row.
///
/// Rows only depend on the mesh geometry, so they are computed in parallel.
pub fn assemble_system<P>(field: &NodeField, problem: &P, conductivity: f64) -> LinearSystem
where
  P: ManufacturedSolution + Sync,
{
  let nnodes = field.nnodes();
  let rows: Vec<_> = (0..nnodes)
    .into_par_iter()
    .map(|inode| system_row(field, problem, conductivity, inode))
    .collect();

  let mut matrix = na::DMatrix::zeros(nnodes, nnodes);
  let mut rhs = na::DVector::zeros(nnodes);
  for (inode, (row, source)) in rows.into_iter().enumerate() {
    matrix.set_row(inode, &row.transpose());
    rhs[inode] = source;
  }
  LinearSystem::new(matrix, rhs)
}

/// Writes the solution vector into the node values.
pub fn scatter_solution(field: &mut NodeField, solution: &na::DVector<f64>) {
  assert_eq!(solution.len(), field.nnodes());
  let dims = field.dims();
  for (icol, irow) in dims.positions() {
    field.node_at_mut(icol, irow).value = solution[dims.index(icol, irow)];
  }
}

pub fn check_conductivity(conductivity: f64) -> Result<()> {
  if conductivity.is_finite() && conductivity > 0.0 {
    Ok(())
  } else {
    Err(Error::NonPositiveConductivity(conductivity))
  }
}

/// Solves the steady diffusion problem implicitly and stores the
/// temperatures in the returned field.
pub fn solve_diffusion<P>(mut field: NodeField, problem: &P, conductivity: f64) -> Result<NodeField>
where
  P: ManufacturedSolution + Sync,
{
  check_conductivity(conductivity)?;

  let mut system = assemble_system(&field, problem, conductivity);
  let boundary_nodes: Vec<NodeIdx> = (0..field.nnodes())
    .filter(|&inode| field.node(inode).kind().is_boundary())
    .collect();
  system.lift_dirichlet(&boundary_nodes);
  debug!(
    ncols = field.ncols(),
    nrows = field.nrows(),
    size = system.size(),
    "solving diffusion system"
  );
  let solution = system.solve()?;
  scatter_solution(&mut field, &solution);

  Ok(field)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    index::node_index,
    manufactured::{HarmonicSinh, QuarticBubble},
    mesh::build_mesh,
  };
  use approx::assert_abs_diff_eq;

  #[test]
  fn scatter_uses_row_major_index() {
    let mut field = build_mesh(5, 3).unwrap();
    let solution = na::DVector::from_iterator(15, (0..15).map(|i| i as f64));
    scatter_solution(&mut field, &solution);
    for irow in 0..3 {
      for icol in 0..5 {
        assert_eq!(
          field.node_at(icol, irow).value,
          node_index(icol, irow, 5) as f64
        );
      }
    }
  }

  #[test]
  fn assembled_matrix_3x3() {
    let field = build_mesh(3, 3).unwrap();
    let system = assemble_system(&field, &QuarticBubble, 5.0);
    #[rustfmt::skip]
    let expected = na::DMatrix::from_row_slice(9, 9, &[
        1.0,   0.0, 0.0,   0.0,  0.0,   0.0, 0.0,   0.0, 0.0,
        0.0,   1.0, 0.0,   0.0,  0.0,   0.0, 0.0,   0.0, 0.0,
        0.0,   0.0, 1.0,   0.0,  0.0,   0.0, 0.0,   0.0, 0.0,
        0.0,   0.0, 0.0,   1.0,  0.0,   0.0, 0.0,   0.0, 0.0,
        0.0, -20.0, 0.0, -20.0, 80.0, -20.0, 0.0, -20.0, 0.0,
        0.0,   0.0, 0.0,   0.0,  0.0,   1.0, 0.0,   0.0, 0.0,
        0.0,   0.0, 0.0,   0.0,  0.0,   0.0, 1.0,   0.0, 0.0,
        0.0,   0.0, 0.0,   0.0,  0.0,   0.0, 0.0,   1.0, 0.0,
        0.0,   0.0, 0.0,   0.0,  0.0,   0.0, 0.0,   0.0, 1.0,
    ]);
    assert_eq!(system.matrix(), &expected);
  }

  /// Single interior node: $80 T_c = -5 Delta T(1/2, 1/2)$.
  #[test]
  fn single_interior_node() {
    let field = build_mesh(3, 3).unwrap();
    let field = solve_diffusion(field, &QuarticBubble, 5.0).unwrap();
    for node in field.nodes() {
      if node.kind().is_boundary() {
        assert_eq!(node.value, 0.0);
      }
    }
    assert_abs_diff_eq!(field.node_at(1, 1).value, -0.0234375, epsilon = 1e-12);
  }

  #[test]
  fn boundary_values_are_exact() {
    let problem = HarmonicSinh;
    let field = solve_diffusion(build_mesh(6, 5).unwrap(), &problem, 1.0).unwrap();
    for node in field.nodes().iter().filter(|n| n.kind().is_boundary()) {
      assert_eq!(node.value, problem.value(node.coord()));
    }
  }

  #[test]
  fn lifting_keeps_solution() {
    let field = build_mesh(5, 4).unwrap();
    let raw = assemble_system(&field, &HarmonicSinh, 2.0);
    let mut lifted = raw.clone();
    let fixed: Vec<_> = (0..field.nnodes())
      .filter(|&i| field.node(i).kind().is_boundary())
      .collect();
    lifted.lift_dirichlet(&fixed);

    for &j in &fixed {
      let column = lifted.matrix().column(j);
      assert_eq!(column.iter().filter(|&&c| c != 0.0).count(), 1);
      assert_eq!(column[j], 1.0);
    }
    let raw_sol = raw.solve().unwrap();
    let lifted_sol = lifted.solve().unwrap();
    assert_abs_diff_eq!(raw_sol, lifted_sol, epsilon = 1e-12);
  }

  #[test]
  fn rejects_bad_conductivity() {
    for k in [0.0, -1.0, f64::NAN, f64::INFINITY] {
      let field = build_mesh(3, 3).unwrap();
      assert!(matches!(
        solve_diffusion(field, &QuarticBubble, k),
        Err(Error::NonPositiveConductivity(_))
      ));
    }
  }

  #[test]
  fn singular_system() {
    let mut matrix = na::DMatrix::identity(3, 3);
    matrix[(2, 2)] = 0.0;
    let system = LinearSystem::new(matrix, na::DVector::from_element(3, 1.0));
    assert_eq!(system.solve().unwrap_err(), Error::SingularSystem(3));
  }
}
