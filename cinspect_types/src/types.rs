use serde_derive::{Deserialize, Serialize};
use std::fmt;

/* Attribute the extraction front end attaches to structs marked for generation */
pub const GENERATE_ATTRIBUTE: &str = "generate_cinspect";

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SourceLocation {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub struct StructOptions {
    /// Emit generated code for this struct even when nothing depends on it.
    #[serde(default)]
    pub generate: bool,
}

impl StructOptions {
    /* Derive options from the attribute spellings found on a struct declaration */
    pub fn from_attributes<S: AsRef<str>>(attributes: &[S]) -> Self {
        let mut options = Self::default();
        for attribute in attributes {
            if attribute.as_ref() == GENERATE_ATTRIBUTE {
                options.generate = true;
            }
        }
        options
    }

    /* Combine two option sets; a flag set in either one stays set */
    pub fn merge(self, other: Self) -> Self {
        Self {
            generate: self.generate || other.generate,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDescriptor {
    pub name: String,
    /// Base type spelling with every pointer level stripped.
    pub type_name: String,
    /// Number of pointer levels wrapping `type_name`.
    #[serde(default)]
    pub indirection: u32,
    #[serde(default)]
    pub location: SourceLocation,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, indirection: u32) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            indirection,
            location: SourceLocation::default(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct StructDescriptor {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub options: StructOptions,
    #[serde(default)]
    pub location: SourceLocation,
}

impl StructDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            options: StructOptions::default(),
            location: SourceLocation::default(),
        }
    }

    pub fn field(mut self, name: &str, type_name: &str, indirection: u32) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_name, indirection));
        self
    }

    pub fn generate(mut self) -> Self {
        self.options.generate = true;
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/* One input unit (usually one parsed source file) and the structs it declares, in declaration order */
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct DescriptorUnit {
    pub name: String,
    #[serde(default)]
    pub structs: Vec<StructDescriptor>,
}

impl DescriptorUnit {
    pub fn new(name: impl Into<String>, structs: Vec<StructDescriptor>) -> Self {
        Self {
            name: name.into(),
            structs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_attribute_sets_option() {
        let options = StructOptions::from_attributes(&["packed", GENERATE_ATTRIBUTE]);
        assert!(options.generate);

        let options = StructOptions::from_attributes(&["packed", "aligned(8)"]);
        assert!(!options.generate);
    }

    #[test]
    fn test_merge_keeps_set_flags() {
        let marked = StructOptions { generate: true };
        assert!(StructOptions::default().merge(marked).generate);
        assert!(marked.merge(StructOptions::default()).generate);
        assert!(!StructOptions::default().merge(StructOptions::default()).generate);
    }

    #[test]
    fn test_location_display() {
        let location = SourceLocation::new("shapes.h", 12, 5);
        assert_eq!(location.to_string(), "shapes.h:12:5");
    }

    #[test]
    fn test_field_defaults_from_yaml() {
        let field: FieldDescriptor = serde_yml::from_str("name: x\ntype-name: int\n").unwrap();
        assert_eq!(field.indirection, 0);
        assert_eq!(field.location, SourceLocation::default());
        assert_eq!(field.type_name, "int");
    }
}
