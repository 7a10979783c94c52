/* Common utilities shared between analyze and codegen commands */

use crate::resolved::{RedeclarationPolicy, StructTable, TypeResolver};
use anyhow::{Context, bail};
use cinspect_loader::{DescriptorLoader, DescriptorSource, expand_inputs};
use std::path::PathBuf;
use tracing::{debug, info};

/* Expand command-line inputs into descriptor paths */
pub fn collect_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
  if inputs.is_empty() {
    bail!("Please provide a filename or glob pattern");
  }

  let paths = expand_inputs(inputs)?;
  debug!(count = paths.len(), "expanded inputs");
  for path in &paths {
    debug!("  - {}", path.display());
  }
  Ok(paths)
}

/* Load every input through `source` and resolve all units into one table */
pub fn load_and_resolve(
  source: &dyn DescriptorSource,
  paths: &[PathBuf],
  policy: RedeclarationPolicy,
  verbose: bool,
) -> anyhow::Result<StructTable> {
  let mut resolver = TypeResolver::new(policy);

  for path in paths {
    let unit = source.load_unit(path)?;
    resolver
      .add_unit(unit)
      .with_context(|| format!("Failed to resolve structs of '{}'", path.display()))?;
  }

  let table = resolver.resolve();
  info!(files = paths.len(), structs = table.len(), marked = table.marked().count(), "resolved struct table");

  if verbose {
    dump_marked(&table);
  }

  Ok(table)
}

/* Expand, load with the default loader, and resolve */
pub fn resolve_inputs(inputs: &[String], policy: RedeclarationPolicy, verbose: bool) -> anyhow::Result<StructTable> {
  let paths = collect_inputs(inputs)?;
  load_and_resolve(&DescriptorLoader::new(), &paths, policy, verbose)
}

fn dump_marked(table: &StructTable) {
  for resolved in table.marked() {
    debug!("Resolved struct {} @ {}", resolved.name, resolved.location);
    debug!("{:#?}", resolved);
  }
}
