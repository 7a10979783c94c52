/* Output assembly: annotate fragments with their dependencies and write or display them */

use crate::codegen::Backend;
use crate::driver::BackendOutput;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

fn dependency_banner(
    dependencies: impl Iterator<Item = String>,
    artifact: impl Fn(&str) -> String,
) -> String {
    let mut banner = String::new();
    for dependency in dependencies {
        banner.push_str(&format!("// depends on \"{}\"\n", artifact(&dependency)));
    }
    banner
}

/* Build the body and header artifact of every emitted struct, in emission order */
pub fn assemble(backend: &dyn Backend, output: &BackendOutput) -> Vec<Artifact> {
    let mut artifacts = Vec::with_capacity(output.bodies.len() * 2);

    for (struct_name, body) in &output.bodies {
        let dependencies = output.dependencies.get(struct_name);
        let deps = || dependencies.into_iter().flatten().cloned();

        let mut contents = dependency_banner(deps(), |d| backend.body_artifact(d));
        contents.push_str(body);
        artifacts.push(Artifact {
            file_name: backend.body_artifact(struct_name),
            contents,
        });

        if let Some(header) = output.headers.get(struct_name) {
            let mut contents =
                dependency_banner(deps(), |d| backend.header_artifact(d));
            contents.push_str(header);
            artifacts.push(Artifact {
                file_name: backend.header_artifact(struct_name),
                contents,
            });
        }
    }

    artifacts
}

pub fn write_artifacts(output_dir: &Path, artifacts: &[Artifact]) -> anyhow::Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    for artifact in artifacts {
        let path = output_dir.join(&artifact.file_name);
        fs::write(&path, &artifact.contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "wrote artifact");
    }

    info!(count = artifacts.len(), dir = %output_dir.display(), "wrote artifacts");
    Ok(())
}

/* Render artifacts as one listing for display when no output directory is given */
pub fn render_listing(artifacts: &[Artifact]) -> String {
    let mut listing = String::new();
    for artifact in artifacts {
        listing.push_str(&format!("/* ===== {} ===== */\n", artifact.file_name));
        listing.push_str(&artifact.contents);
        if !artifact.contents.ends_with('\n') {
            listing.push('\n');
        }
        listing.push('\n');
    }
    listing
}

pub fn display_artifacts(artifacts: &[Artifact]) {
    print!("{}", render_listing(artifacts));
}
