/* Dear ImGui editor backend: one Show<Struct>Editor form per struct */

use super::{array_placeholder, Backend};
use crate::resolved::{PrimitiveKind, ResolvedField, ResolvedStruct, StructTable, TypeClass};

/* Input control used for a primitive field */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorControl {
    IntBox,
    ScalarBox(&'static str),
    FloatBox,
    DoubleBox,
    Checkbox,
    TextBox,
    Label,
}

pub fn control_for(kind: PrimitiveKind) -> EditorControl {
    match kind {
        PrimitiveKind::Int | PrimitiveKind::Signed => EditorControl::IntBox,
        PrimitiveKind::Char | PrimitiveKind::SignedChar => EditorControl::ScalarBox("ImGuiDataType_S8"),
        PrimitiveKind::UnsignedChar => EditorControl::ScalarBox("ImGuiDataType_U8"),
        PrimitiveKind::Short => EditorControl::ScalarBox("ImGuiDataType_S16"),
        PrimitiveKind::UnsignedShort => EditorControl::ScalarBox("ImGuiDataType_U16"),
        PrimitiveKind::UnsignedInt | PrimitiveKind::Unsigned => {
            EditorControl::ScalarBox("ImGuiDataType_U32")
        }
        PrimitiveKind::Long | PrimitiveKind::LongLong => EditorControl::ScalarBox("ImGuiDataType_S64"),
        PrimitiveKind::UnsignedLong | PrimitiveKind::UnsignedLongLong => {
            EditorControl::ScalarBox("ImGuiDataType_U64")
        }
        PrimitiveKind::Float => EditorControl::FloatBox,
        PrimitiveKind::Double => EditorControl::DoubleBox,
        PrimitiveKind::Bool => EditorControl::Checkbox,
        PrimitiveKind::CString => EditorControl::TextBox,
        PrimitiveKind::Void => EditorControl::Label,
    }
}

pub struct EditorCodeGenerator;

impl Default for EditorCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

fn editor_fn_name(struct_name: &str) -> String {
    format!("Show{}Editor", struct_name)
}

fn prototype(struct_name: &str) -> String {
    format!("void {}({}& data)", editor_fn_name(struct_name), struct_name)
}

fn emit_control(name: &str, kind: PrimitiveKind) -> String {
    match control_for(kind) {
        EditorControl::IntBox => format!("    ImGui::InputInt(\"{0}\", &data.{0});\n", name),
        EditorControl::ScalarBox(data_type) => {
            format!("    ImGui::InputScalar(\"{0}\", {1}, &data.{0});\n", name, data_type)
        }
        EditorControl::FloatBox => format!("    ImGui::InputFloat(\"{0}\", &data.{0});\n", name),
        EditorControl::DoubleBox => format!("    ImGui::InputDouble(\"{0}\", &data.{0});\n", name),
        EditorControl::Checkbox => format!("    ImGui::Checkbox(\"{0}\", &data.{0});\n", name),
        EditorControl::TextBox => {
            format!("    ImGui::InputText(\"{0}\", data.{0}, sizeof(data.{0}));\n", name)
        }
        EditorControl::Label => format!("    ImGui::Text(\"{}: {}\");\n", name, kind.spelling()),
    }
}

fn emit_field(field: &ResolvedField, table: &StructTable) -> String {
    /* pointer- and array-valued fields are shown, never edited */
    if field.indirection > 0 {
        return format!(
            "    ImGui::Text(\"{}: {}\");\n",
            field.name,
            array_placeholder(field.class.spelling())
        );
    }

    match &field.class {
        TypeClass::Primitive(kind) => emit_control(&field.name, *kind),
        TypeClass::StructRef(target) if table.contains(target) => {
            let mut out = format!("    if (ImGui::TreeNode(\"{}\")) {{\n", field.name);
            out.push_str(&format!("        {}(data.{});\n", editor_fn_name(target), field.name));
            out.push_str("        ImGui::TreePop();\n");
            out.push_str("    }\n");
            out
        }
        TypeClass::StructRef(_) | TypeClass::Unknown(_) => {
            format!("    ImGui::Text(\"{}: Unsupported Type\");\n", field.name)
        }
    }
}

impl Backend for EditorCodeGenerator {
    fn id(&self) -> &'static str {
        "editor"
    }

    fn artifact_prefix(&self) -> &'static str {
        "imgui"
    }

    fn body_extension(&self) -> &'static str {
        "cpp"
    }

    fn header_extension(&self) -> &'static str {
        "h"
    }

    fn emit_body(&self, resolved: &ResolvedStruct, table: &StructTable) -> String {
        let mut out = format!("// ImGui form for {}\n", resolved.name);
        out.push_str(&format!("{} {{\n", prototype(&resolved.name)));
        for field in &resolved.fields {
            out.push_str(&emit_field(field, table));
        }
        out.push_str("}\n");
        out
    }

    fn emit_header(&self, resolved: &ResolvedStruct, _table: &StructTable) -> String {
        format!("{};\n", prototype(&resolved.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolved::{resolve_units, RedeclarationPolicy};
    use cinspect_types::{DescriptorUnit, StructDescriptor};
    use std::collections::HashSet;

    fn table(structs: Vec<StructDescriptor>) -> StructTable {
        resolve_units(vec![DescriptorUnit::new("test.h", structs)], RedeclarationPolicy::Overwrite).unwrap()
    }

    fn body(table: &StructTable, name: &str) -> String {
        EditorCodeGenerator::new().emit_body(table.get(name).unwrap(), table)
    }

    #[test]
    fn test_distinct_controls_per_kind() {
        let controls: HashSet<EditorControl> = [
            PrimitiveKind::Int,
            PrimitiveKind::Float,
            PrimitiveKind::Double,
            PrimitiveKind::Bool,
            PrimitiveKind::CString,
        ]
        .into_iter()
        .map(control_for)
        .collect();
        assert_eq!(controls.len(), 5);
        assert_ne!(control_for(PrimitiveKind::Short), control_for(PrimitiveKind::UnsignedShort));
    }

    #[test]
    fn test_primitive_controls() {
        let t = table(vec![StructDescriptor::new("Settings")
            .field("count", "int", 0)
            .field("scale", "float", 0)
            .field("ratio", "double", 0)
            .field("enabled", "bool", 0)
            .field("title", "cstring", 0)
            .field("flags", "unsigned short", 0)]);
        let code = body(&t, "Settings");
        assert!(code.starts_with("// ImGui form for Settings\nvoid ShowSettingsEditor(Settings& data) {\n"));
        assert!(code.contains("ImGui::InputInt(\"count\", &data.count);"));
        assert!(code.contains("ImGui::InputFloat(\"scale\", &data.scale);"));
        assert!(code.contains("ImGui::InputDouble(\"ratio\", &data.ratio);"));
        assert!(code.contains("ImGui::Checkbox(\"enabled\", &data.enabled);"));
        assert!(code.contains("ImGui::InputText(\"title\", data.title, sizeof(data.title));"));
        assert!(code.contains("ImGui::InputScalar(\"flags\", ImGuiDataType_U16, &data.flags);"));
    }

    #[test]
    fn test_indirect_fields_are_read_only() {
        let t = table(vec![
            StructDescriptor::new("Vec2").field("x", "float", 0),
            StructDescriptor::new("Mesh")
                .field("count", "int", 1)
                .field("origin", "Vec2", 1)
                .field("indices", "int", 2),
        ]);
        let code = body(&t, "Mesh");
        assert!(code.contains("ImGui::Text(\"count: Array<int>\");"));
        assert!(code.contains("ImGui::Text(\"origin: Array<Vec2>\");"));
        assert!(code.contains("ImGui::Text(\"indices: Array<int>\");"));
        assert!(!code.contains("ShowVec2Editor"));
        assert!(!code.contains("&data."));
    }

    #[test]
    fn test_struct_ref_calls_nested_editor() {
        let t = table(vec![
            StructDescriptor::new("Vec2").field("x", "float", 0),
            StructDescriptor::new("Sprite").field("position", "Vec2", 0).field("atlas", "Texture", 0),
        ]);
        let code = body(&t, "Sprite");
        assert!(code.contains("if (ImGui::TreeNode(\"position\")) {"));
        assert!(code.contains("ShowVec2Editor(data.position);"));
        assert!(code.contains("ImGui::Text(\"atlas: Unsupported Type\");"));
    }

    #[test]
    fn test_header_is_prototype() {
        let t = table(vec![StructDescriptor::new("Point")]);
        let header = EditorCodeGenerator::new().emit_header(t.get("Point").unwrap(), &t);
        assert_eq!(header, "void ShowPointEditor(Point& data);\n");
    }
}
