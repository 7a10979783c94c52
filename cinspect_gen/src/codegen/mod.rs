pub mod editor;
pub mod printer;

use crate::resolved::{ResolvedStruct, StructTable};
use clap::ValueEnum;
use serde_derive::{Deserialize, Serialize};

pub use editor::EditorCodeGenerator;
pub use printer::{PrinterCodeGenerator, PrinterOptions};

/* One category of generated artifact: a body generator and a header generator over the same struct */
pub trait Backend {
    /* Stable identifier used in logs and reports */
    fn id(&self) -> &'static str;

    /* Prefix of every artifact name, e.g. "print" for print_<Struct>.c */
    fn artifact_prefix(&self) -> &'static str;

    fn body_extension(&self) -> &'static str;

    fn header_extension(&self) -> &'static str;

    fn emit_body(&self, resolved: &ResolvedStruct, table: &StructTable) -> String;

    fn emit_header(&self, resolved: &ResolvedStruct, table: &StructTable) -> String;

    fn body_artifact(&self, struct_name: &str) -> String {
        format!("{}_{}.{}", self.artifact_prefix(), struct_name, self.body_extension())
    }

    fn header_artifact(&self, struct_name: &str) -> String {
        format!("{}_{}.{}", self.artifact_prefix(), struct_name, self.header_extension())
    }
}

/* Backend selection on the command line and in config files */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /* C debug-print routines (print_<Struct>.c / .h) */
    Printer,
    /* Dear ImGui editor forms (imgui_<Struct>.cpp / .h) */
    Editor,
    /* Every backend, editor first */
    #[default]
    All,
}

impl BackendKind {
    pub fn backends(self, printer_options: PrinterOptions) -> Vec<Box<dyn Backend>> {
        match self {
            BackendKind::Printer => vec![Box::new(PrinterCodeGenerator::new(printer_options))],
            BackendKind::Editor => vec![Box::new(EditorCodeGenerator::new())],
            BackendKind::All => vec![
                Box::new(EditorCodeGenerator::new()),
                Box::new(PrinterCodeGenerator::new(printer_options)),
            ],
        }
    }
}

/* Placeholder text shared by the backends for fields they do not expand */
pub(crate) fn array_placeholder(type_spelling: &str) -> String {
    format!("Array<{}>", type_spelling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection() {
        let ids = |kind: BackendKind| -> Vec<&'static str> {
            kind.backends(PrinterOptions::default()).iter().map(|b| b.id()).collect()
        };
        assert_eq!(ids(BackendKind::Printer), vec!["printer"]);
        assert_eq!(ids(BackendKind::Editor), vec!["editor"]);
        assert_eq!(ids(BackendKind::All), vec!["editor", "printer"]);
    }

    #[test]
    fn test_artifact_names() {
        let printer = PrinterCodeGenerator::new(PrinterOptions::default());
        assert_eq!(printer.body_artifact("Point"), "print_Point.c");
        assert_eq!(printer.header_artifact("Point"), "print_Point.h");

        let editor = EditorCodeGenerator::new();
        assert_eq!(editor.body_artifact("Point"), "imgui_Point.cpp");
        assert_eq!(editor.header_artifact("Point"), "imgui_Point.h");
    }
}
