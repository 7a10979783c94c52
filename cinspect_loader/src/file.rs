use cinspect_types::{
    Diagnostic, DescriptorUnit, FieldDescriptor, SourceLocation, StructDescriptor, StructOptions,
};
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

/* ============================================================================
   Descriptor File Format
   ============================================================================ */

/* On-disk encoding of a descriptor file */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /* Pick the format from the file extension; anything other than .json is read as YAML */
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }
}

/* Struct entry as written by the extraction front end */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct RawStruct {
    pub name: String,
    /* Attribute spellings found on the declaration (e.g. "generate_cinspect") */
    #[serde(default)]
    pub attributes: Vec<String>,
    /* Options set explicitly, merged with the ones derived from attributes */
    #[serde(default)]
    pub options: StructOptions,
    #[serde(default)]
    pub location: SourceLocation,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl RawStruct {
    pub fn into_descriptor(self) -> StructDescriptor {
        let options = self.options.merge(StructOptions::from_attributes(&self.attributes));
        StructDescriptor {
            name: self.name,
            fields: self.fields,
            options,
            location: self.location,
        }
    }
}

/* Top-level layout of a descriptor file */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct DescriptorFile {
    /* Unit name; the loader falls back to the file path */
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default)]
    pub structs: Vec<RawStruct>,
}

impl DescriptorFile {
    pub fn into_unit(self, fallback_name: &str) -> DescriptorUnit {
        let name = self.unit.unwrap_or_else(|| fallback_name.to_string());
        let structs = self.structs.into_iter().map(RawStruct::into_descriptor).collect();
        DescriptorUnit::new(name, structs)
    }
}
