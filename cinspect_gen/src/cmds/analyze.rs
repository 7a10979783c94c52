/* Analyze command - report the resolved struct table without generating code */

use super::common::resolve_inputs;
use crate::driver::{BackEdge, CodegenDriver};
use crate::resolved::{RedeclarationPolicy, ResolvedStruct, StructTable, TypeClass};
use anyhow::Context;
use clap::ValueEnum;
use cinspect_types::SourceLocation;
use serde_derive::Serialize;
use std::fmt::Write;
use tracing::info;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, ValueEnum)]
pub enum AnalyzeFormat {
  /* Human-readable report */
  #[default]
  Text,
  /* Pretty-printed JSON */
  Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
  pub name: String,
  pub class: &'static str,
  #[serde(rename = "type")]
  pub type_name: String,
  pub depth: u32,
  pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructReport {
  pub name: String,
  pub unit: String,
  pub marked: bool,
  pub location: SourceLocation,
  pub fields: Vec<FieldReport>,
  pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
  pub structs: Vec<StructReport>,
  /* Emission order the backends will follow */
  pub generation_order: Vec<String>,
  pub short_circuited: Vec<BackEdge>,
}

impl AnalysisReport {
  pub fn build(table: &StructTable) -> Self {
    let driver = CodegenDriver::new(table);
    let structs = table.iter().map(|resolved| struct_report(&driver, resolved)).collect();

    /* names only: the walk itself is what is being reported */
    let run = driver.generate(&|_: &ResolvedStruct, _: &StructTable| String::new());

    Self {
      structs,
      generation_order: run.fragments.keys().cloned().collect(),
      short_circuited: run.short_circuited,
    }
  }

  pub fn render(&self, format: AnalyzeFormat) -> anyhow::Result<String> {
    match format {
      AnalyzeFormat::Json => serde_json::to_string_pretty(self).context("failed to serialize analysis report"),
      AnalyzeFormat::Text => Ok(self.render_text()),
    }
  }

  fn render_text(&self) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "[~] Structs ({}):", self.structs.len());
    for report in &self.structs {
      let marker = if report.marked { " [generate]" } else { "" };
      let _ = writeln!(out, "  {} @ {} ({}){}", report.name, report.location, report.unit, marker);
      for field in &report.fields {
        let _ = writeln!(
          out,
          "    - {}: {} {} depth={} @ {}",
          field.name, field.class, field.type_name, field.depth, field.location
        );
      }
      if !report.dependencies.is_empty() {
        let _ = writeln!(out, "    depends on: {}", report.dependencies.join(", "));
      }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "[~] Generation order:");
    if self.generation_order.is_empty() {
      let _ = writeln!(out, "  (no struct marked for generation)");
    }
    for (index, name) in self.generation_order.iter().enumerate() {
      let _ = writeln!(out, "  {}. {}", index + 1, name);
    }

    if !self.short_circuited.is_empty() {
      let _ = writeln!(out);
      let _ = writeln!(out, "[~] Cycles short-circuited:");
      for edge in &self.short_circuited {
        let _ = writeln!(out, "  {} -> {}", edge.from, edge.to);
      }
    }

    out
  }
}

fn struct_report(driver: &CodegenDriver<'_>, resolved: &ResolvedStruct) -> StructReport {
  StructReport {
    name: resolved.name.clone(),
    unit: resolved.unit.clone(),
    marked: resolved.is_marked(),
    location: resolved.location.clone(),
    fields: resolved
      .fields
      .iter()
      .map(|field| FieldReport {
        name: field.name.clone(),
        class: field.class.label(),
        type_name: field.class.spelling().to_string(),
        depth: field.indirection,
        location: field.location.clone(),
      })
      .collect(),
    dependencies: driver.dependencies(resolved).into_iter().collect(),
  }
}

/* Count of fields per classification, used in the summary line */
fn class_counts(table: &StructTable) -> (usize, usize, usize) {
  let mut counts = (0, 0, 0);
  for field in table.iter().flat_map(|resolved| resolved.fields.iter()) {
    match field.class {
      TypeClass::Primitive(_) => counts.0 += 1,
      TypeClass::StructRef(_) => counts.1 += 1,
      TypeClass::Unknown(_) => counts.2 += 1,
    }
  }
  counts
}

/* Execute the analyze command */
pub fn run(
  inputs: Vec<String>,
  format: AnalyzeFormat,
  policy: RedeclarationPolicy,
  verbose: bool,
) -> anyhow::Result<()> {
  let table = resolve_inputs(&inputs, policy, verbose)?;

  let (primitive, struct_ref, unknown) = class_counts(&table);
  info!(primitive, struct_ref, unknown, "field classification");

  let report = AnalysisReport::build(&table);
  print!("{}", report.render(format)?);
  if format == AnalyzeFormat::Json {
    println!();
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::resolved::resolve_units;
  use cinspect_types::{DescriptorUnit, StructDescriptor};

  fn table() -> StructTable {
    resolve_units(
      vec![DescriptorUnit::new(
        "list.h",
        vec![
          StructDescriptor::new("Tag").field("label", "cstring", 0),
          StructDescriptor::new("Node")
            .field("value", "int", 0)
            .field("tag", "Tag", 0)
            .field("next", "Node", 1)
            .field("owner", "Owner", 1)
            .generate(),
        ],
      )],
      RedeclarationPolicy::Warn,
    )
    .unwrap()
  }

  #[test]
  fn test_report_contents() {
    let table = table();
    let report = AnalysisReport::build(&table);

    assert_eq!(report.generation_order, vec!["Tag", "Node"]);
    assert_eq!(report.short_circuited, vec![BackEdge { from: "Node".to_string(), to: "Node".to_string() }]);

    let node = &report.structs[1];
    assert!(node.marked);
    assert_eq!(node.dependencies, vec!["Node", "Tag"]);
    assert_eq!(node.fields[2].class, "struct");
    assert_eq!(node.fields[2].depth, 1);
    assert_eq!(node.fields[3].class, "unknown");
    assert_eq!(node.fields[3].type_name, "Owner");

    assert_eq!(class_counts(&table), (2, 2, 1));
  }

  #[test]
  fn test_text_rendering() {
    let text = AnalysisReport::build(&table()).render(AnalyzeFormat::Text).unwrap();
    assert!(text.contains("  Node @ "));
    assert!(text.contains("[generate]"));
    assert!(text.contains("    - next: struct Node depth=1 @ "));
    assert!(text.contains("    depends on: Node, Tag"));
    assert!(text.contains("  1. Tag\n  2. Node\n"));
    assert!(text.contains("  Node -> Node\n"));
  }

  #[test]
  fn test_json_rendering() {
    let json = AnalysisReport::build(&table()).render(AnalyzeFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["generation_order"][1], "Node");
    assert_eq!(value["structs"][1]["fields"][0]["type"], "int");
    assert_eq!(value["short_circuited"][0]["from"], "Node");
  }
}
