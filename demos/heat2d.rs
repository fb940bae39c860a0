use fvheat::{
  convergence::{convergence_study, drive_convergence, solve_and_analyze, ConvergenceConfig},
  manufactured::QuarticBubble,
  mesh::build_mesh,
};

fn main() -> fvheat::Result<()> {
  tracing_subscriber::fmt::init();

  let problem = QuarticBubble;
  let conductivity = 4.0;

  // Single solve on a coarse mesh.
  let field = solve_and_analyze(build_mesh(5, 5)?, &problem, conductivity)?;
  println!("Temperature:\n{:.5}", field.value_grid());
  println!("Analytical:\n{:.5}", field.analytical_grid());
  println!("Absolute error:\n{:.6}", field.abs_error_grid());
  println!("Maximum error in the mesh is: {:.3e}", field.max_abs_error());

  // Refinement study with observed order.
  let config = ConvergenceConfig::default().with_conductivity(conductivity);
  let history = convergence_study(&[3, 5, 9, 17, 33], &config, &problem)?;
  let rates: Vec<f64> = std::iter::once(f64::NAN).chain(history.rates()).collect();
  for (step, rate) in history.steps().iter().zip(rates) {
    println!(
      "\
      nnodes: {:3}x{:<3} \
      max_error: {:9.3e}, \
      l2_error: {:9.3e}, \
      conv_rate: {rate:6.2}\
      ",
      step.ncols, step.nrows, step.max_error, step.l2_error,
    );
  }
  println!("Observed order: {:.4}", history.order()?);

  // Coarsest mesh meeting the tolerance.
  let report = drive_convergence(&config.with_initial_nodes(10, 10), &problem)?;
  for step in report.history.steps() {
    println!(
      "Mesh Size: {}x{}\tAbsolute error: {:.3e}",
      step.ncols, step.nrows, step.max_error
    );
  }
  let last = report.final_step;
  println!(
    "{:?} on {}x{} mesh, max error {:.3e}",
    report.status, last.ncols, last.nrows, last.max_error
  );

  Ok(())
}
