/* Codegen command - generate printer and editor sources from struct descriptors */

use super::common::resolve_inputs;
use crate::codegen::Backend;
use crate::config::CodegenSettings;
use crate::driver::CodegenDriver;
use crate::output::{Artifact, assemble, display_artifacts, write_artifacts};
use crate::resolved::StructTable;
use tracing::{debug, info, warn};

/* Execute the codegen command */
pub fn run(inputs: Vec<String>, settings: CodegenSettings, verbose: bool) -> anyhow::Result<()> {
  debug!(
    inputs = inputs.len(),
    backends = ?settings.backends,
    on_redeclare = ?settings.on_redeclare,
    max_depth_default = settings.printer.default_max_depth,
    "codegen configuration"
  );

  let table = resolve_inputs(&inputs, settings.on_redeclare, verbose)?;
  if table.marked().next().is_none() {
    warn!("no struct is marked for generation; nothing to do");
    return Ok(());
  }

  let artifacts = generate_artifacts(&table, &settings);

  match &settings.output_dir {
    Some(dir) => write_artifacts(dir, &artifacts)?,
    None => display_artifacts(&artifacts),
  }

  Ok(())
}

/* Run every selected backend over the table and assemble their artifacts, backend by backend */
pub fn generate_artifacts(table: &StructTable, settings: &CodegenSettings) -> Vec<Artifact> {
  let driver = CodegenDriver::new(table);
  let mut artifacts = Vec::new();

  for backend in settings.backends.backends(settings.printer) {
    let backend: &dyn Backend = backend.as_ref();
    let output = driver.generate_backend(backend);
    for edge in &output.short_circuited {
      debug!(backend = output.backend, from = %edge.from, to = %edge.to, "cycle broken");
    }
    info!(backend = output.backend, structs = output.bodies.len(), "generated");
    artifacts.extend(assemble(backend, &output));
  }

  artifacts
}
