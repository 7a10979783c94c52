/* C debug-print backend: one recursive print_<Struct> routine per struct */

use super::{array_placeholder, Backend};
use crate::resolved::{PrimitiveKind, ResolvedField, ResolvedStruct, StructTable, TypeClass};

pub const DEFAULT_MAX_DEPTH: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterOptions {
    /* Recursion bound the generated routine falls back to when called with max_depth == 0 */
    pub default_max_depth: u32,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            default_max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

pub struct PrinterCodeGenerator {
    options: PrinterOptions,
}

impl PrinterCodeGenerator {
    pub fn new(options: PrinterOptions) -> Self {
        Self { options }
    }
}

/* printf conversion per primitive kind; void has no value to format */
pub fn printf_format(kind: PrimitiveKind) -> Option<&'static str> {
    match kind {
        PrimitiveKind::Char => Some("%c"),
        PrimitiveKind::SignedChar => Some("%hhd"),
        PrimitiveKind::UnsignedChar => Some("%hhu"),
        PrimitiveKind::CString => Some("%s"),
        PrimitiveKind::Short => Some("%hd"),
        PrimitiveKind::UnsignedShort => Some("%hu"),
        PrimitiveKind::Int | PrimitiveKind::Signed | PrimitiveKind::Bool => Some("%d"),
        PrimitiveKind::UnsignedInt | PrimitiveKind::Unsigned => Some("%u"),
        PrimitiveKind::Long => Some("%ld"),
        PrimitiveKind::UnsignedLong => Some("%lu"),
        PrimitiveKind::LongLong => Some("%lld"),
        PrimitiveKind::UnsignedLongLong => Some("%llu"),
        PrimitiveKind::Float | PrimitiveKind::Double => Some("%f"),
        PrimitiveKind::Void => None,
    }
}

fn print_fn_name(struct_name: &str) -> String {
    format!("print_{}", struct_name)
}

fn prototype(struct_name: &str) -> String {
    format!(
        "void {}(const {} *data, int rec_depth, int max_depth)",
        print_fn_name(struct_name),
        struct_name
    )
}

fn indent_line(extra: u32) -> String {
    let depth = if extra == 0 {
        "rec_depth".to_string()
    } else {
        format!("rec_depth+{}", extra)
    };
    format!("  for (int i = 0; i < {}; i++) {{ printf(\"  \"); }}\n", depth)
}

fn emit_primitive(field: &ResolvedField, kind: PrimitiveKind, out: &mut String) {
    let Some(format) = printf_format(kind) else {
        out.push_str(&format!("  printf(\"{}: void\\n\");\n", field.name));
        return;
    };

    /* %d takes an int */
    let cast = if kind == PrimitiveKind::Bool { "(int)" } else { "" };

    if field.indirection == 0 {
        out.push_str(&format!(
            "  printf(\"{}: {}\\n\", {}data->{});\n",
            field.name, format, cast, field.name
        ));
    } else {
        out.push_str(&format!("  if (data->{}) {{\n", field.name));
        out.push_str(&format!(
            "    printf(\"{}: {}\\n\", {}*data->{});\n",
            field.name, format, cast, field.name
        ));
        out.push_str("  } else {\n");
        out.push_str(&format!("    printf(\"{}: NULL\\n\");\n", field.name));
        out.push_str("  }\n");
    }
}

fn emit_struct_ref(field: &ResolvedField, target: &str, out: &mut String) {
    let call = print_fn_name(target);
    if field.indirection == 0 {
        out.push_str(&format!("  printf(\"{}:\\n\");\n", field.name));
        out.push_str(&format!(
            "  {}(&data->{}, rec_depth+1, max_depth);\n",
            call, field.name
        ));
    } else {
        out.push_str(&format!("  if (data->{}) {{\n", field.name));
        out.push_str(&format!("    printf(\"{}:\\n\");\n", field.name));
        out.push_str(&format!(
            "    {}(&*data->{}, rec_depth+1, max_depth);\n",
            call, field.name
        ));
        out.push_str("  } else {\n");
        out.push_str(&format!("    printf(\"{}: NULL\\n\");\n", field.name));
        out.push_str("  }\n");
    }
}

fn emit_field(field: &ResolvedField, table: &StructTable, out: &mut String) {
    out.push_str(&indent_line(1));

    if field.indirection > 1 {
        out.push_str(&format!(
            "  printf(\"{}: {}\\n\");\n",
            field.name,
            array_placeholder(field.class.spelling())
        ));
        return;
    }

    match &field.class {
        TypeClass::Primitive(kind) => emit_primitive(field, *kind, out),
        TypeClass::StructRef(target) if table.contains(target) => {
            emit_struct_ref(field, target, out)
        }
        TypeClass::StructRef(_) | TypeClass::Unknown(_) => {
            out.push_str(&format!("  printf(\"{}: Unsupported type\\n\");\n", field.name));
        }
    }
}

impl Backend for PrinterCodeGenerator {
    fn id(&self) -> &'static str {
        "printer"
    }

    fn artifact_prefix(&self) -> &'static str {
        "print"
    }

    fn body_extension(&self) -> &'static str {
        "c"
    }

    fn header_extension(&self) -> &'static str {
        "h"
    }

    fn emit_body(&self, resolved: &ResolvedStruct, table: &StructTable) -> String {
        let mut out = format!("{} {{\n", prototype(&resolved.name));
        out.push_str(&format!(
            "  if (max_depth == 0) max_depth = {};\n",
            self.options.default_max_depth
        ));
        out.push_str("  if (rec_depth > max_depth) { return; }\n");
        out.push_str(&indent_line(0));
        out.push_str(&format!("  printf(\"{} {{\\n\");\n", resolved.name));

        for field in &resolved.fields {
            emit_field(field, table, &mut out);
        }

        out.push_str(&indent_line(0));
        out.push_str("  printf(\"}\\n\");\n");
        out.push_str("}\n\n");
        out
    }

    fn emit_header(&self, resolved: &ResolvedStruct, _table: &StructTable) -> String {
        format!("{};\n", prototype(&resolved.name))
    }
}
