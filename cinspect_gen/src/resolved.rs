use crate::error::ResolveError;
use cinspect_types::{DescriptorUnit, SourceLocation, StructDescriptor, StructOptions};
use clap::ValueEnum;
use indexmap::IndexMap;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
  Char,
  SignedChar,
  UnsignedChar,
  CString,
  Short,
  UnsignedShort,
  Int,
  UnsignedInt,
  Long,
  UnsignedLong,
  LongLong,
  UnsignedLongLong,
  Signed,
  Unsigned,
  Float,
  Double,
  Bool,
  Void,
}

/* Recognized primitive spellings; "cstring" stands for char* as spelled by the front end */
const PRIMITIVE_SPELLINGS: &[(&str, PrimitiveKind)] = &[
  ("char", PrimitiveKind::Char),
  ("signed char", PrimitiveKind::SignedChar),
  ("unsigned char", PrimitiveKind::UnsignedChar),
  ("cstring", PrimitiveKind::CString),
  ("short", PrimitiveKind::Short),
  ("unsigned short", PrimitiveKind::UnsignedShort),
  ("int", PrimitiveKind::Int),
  ("unsigned int", PrimitiveKind::UnsignedInt),
  ("long", PrimitiveKind::Long),
  ("unsigned long", PrimitiveKind::UnsignedLong),
  ("long long", PrimitiveKind::LongLong),
  ("unsigned long long", PrimitiveKind::UnsignedLongLong),
  ("signed", PrimitiveKind::Signed),
  ("unsigned", PrimitiveKind::Unsigned),
  ("float", PrimitiveKind::Float),
  ("double", PrimitiveKind::Double),
  ("bool", PrimitiveKind::Bool),
  ("_Bool", PrimitiveKind::Bool),
  ("void", PrimitiveKind::Void),
];

impl PrimitiveKind {
  pub fn from_spelling(spelling: &str) -> Option<Self> {
    PRIMITIVE_SPELLINGS.iter().find(|(name, _)| *name == spelling).map(|(_, kind)| *kind)
  }

  /* Canonical C spelling */
  pub fn spelling(self) -> &'static str {
    match self {
      PrimitiveKind::Char => "char",
      PrimitiveKind::SignedChar => "signed char",
      PrimitiveKind::UnsignedChar => "unsigned char",
      PrimitiveKind::CString => "cstring",
      PrimitiveKind::Short => "short",
      PrimitiveKind::UnsignedShort => "unsigned short",
      PrimitiveKind::Int => "int",
      PrimitiveKind::UnsignedInt => "unsigned int",
      PrimitiveKind::Long => "long",
      PrimitiveKind::UnsignedLong => "unsigned long",
      PrimitiveKind::LongLong => "long long",
      PrimitiveKind::UnsignedLongLong => "unsigned long long",
      PrimitiveKind::Signed => "signed",
      PrimitiveKind::Unsigned => "unsigned",
      PrimitiveKind::Float => "float",
      PrimitiveKind::Double => "double",
      PrimitiveKind::Bool => "bool",
      PrimitiveKind::Void => "void",
    }
  }
}

impl fmt::Display for PrimitiveKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.spelling())
  }
}

/* Classification of a field's base type, decided once by the resolver */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "class", content = "type", rename_all = "kebab-case")]
pub enum TypeClass {
  Primitive(PrimitiveKind),
  StructRef(String),
  /// Neither a primitive nor a declared struct; keeps the declared spelling for placeholders.
  Unknown(String),
}

impl TypeClass {
  pub fn spelling(&self) -> &str {
    match self {
      TypeClass::Primitive(kind) => kind.spelling(),
      TypeClass::StructRef(name) | TypeClass::Unknown(name) => name,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      TypeClass::Primitive(_) => "primitive",
      TypeClass::StructRef(_) => "struct",
      TypeClass::Unknown(_) => "unknown",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedField {
  pub name: String,
  pub class: TypeClass,
  pub indirection: u32,
  pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStruct {
  pub name: String,
  pub fields: Vec<ResolvedField>,
  pub options: StructOptions,
  pub location: SourceLocation,
  pub unit: String,
}

impl ResolvedStruct {
  pub fn is_marked(&self) -> bool {
    self.options.generate
  }
}

/* Resolved structs keyed by name, in first-seen order across all units */
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StructTable {
  structs: IndexMap<String, ResolvedStruct>,
}

impl StructTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, name: &str) -> Option<&ResolvedStruct> {
    self.structs.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.structs.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.structs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.structs.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &ResolvedStruct> {
    self.structs.values()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.structs.keys().map(String::as_str)
  }

  /* Structs marked for generation, in table order */
  pub fn marked(&self) -> impl Iterator<Item = &ResolvedStruct> {
    self.structs.values().filter(|s| s.is_marked())
  }

  /* Insert or replace; a replaced entry keeps its original position */
  pub fn insert(&mut self, resolved: ResolvedStruct) {
    self.structs.insert(resolved.name.clone(), resolved);
  }
}

/* What to do when a struct name is declared a second time */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedeclarationPolicy {
  /* Last declaration wins, silently */
  Overwrite,
  /* Last declaration wins, with a warning naming both locations */
  #[default]
  Warn,
  /* Refuse the redeclaration */
  Error,
}

#[derive(Debug)]
struct PendingStruct {
  unit: String,
  descriptor: StructDescriptor,
}

/* Collects raw descriptors from every unit of a run, then classifies all fields in one pass */
#[derive(Debug)]
pub struct TypeResolver {
  policy: RedeclarationPolicy,
  pending: IndexMap<String, PendingStruct>,
}

impl Default for TypeResolver {
  fn default() -> Self {
    Self::new(RedeclarationPolicy::default())
  }
}

impl TypeResolver {
  pub fn new(policy: RedeclarationPolicy) -> Self {
    Self { policy, pending: IndexMap::new() }
  }

  pub fn policy(&self) -> RedeclarationPolicy {
    self.policy
  }

  pub fn add_unit(&mut self, unit: DescriptorUnit) -> Result<(), ResolveError> {
    debug!(unit = %unit.name, structs = unit.structs.len(), "adding descriptor unit");
    let DescriptorUnit { name, structs } = unit;
    for descriptor in structs {
      self.add_descriptor(&name, descriptor)?;
    }
    Ok(())
  }

  pub fn add_descriptor(&mut self, unit: &str, descriptor: StructDescriptor) -> Result<(), ResolveError> {
    if let Some(previous) = self.pending.get(&descriptor.name) {
      match self.policy {
        RedeclarationPolicy::Overwrite => {
          debug!(name = %descriptor.name, unit, "struct redeclared, keeping the later declaration");
        }
        RedeclarationPolicy::Warn => {
          warn!(
            "struct '{}' redeclared in '{}' at {} (first declared in '{}' at {}); keeping the later declaration",
            descriptor.name, unit, descriptor.location, previous.unit, previous.descriptor.location
          );
        }
        RedeclarationPolicy::Error => {
          return Err(ResolveError::Redeclared {
            name: descriptor.name.clone(),
            first_unit: previous.unit.clone(),
            first: previous.descriptor.location.clone(),
            second_unit: unit.to_string(),
            second: descriptor.location.clone(),
          });
        }
      }
    }

    self.pending.insert(descriptor.name.clone(), PendingStruct { unit: unit.to_string(), descriptor });
    Ok(())
  }

  /* Classify every field against the primitives and the full set of declared struct names */
  pub fn resolve(&self) -> StructTable {
    let mut table = StructTable::new();

    for pending in self.pending.values() {
      let descriptor = &pending.descriptor;
      let fields = descriptor
        .fields
        .iter()
        .map(|field| ResolvedField {
          name: field.name.clone(),
          class: self.classify(&field.type_name),
          indirection: field.indirection,
          location: field.location.clone(),
        })
        .collect();

      table.insert(ResolvedStruct {
        name: descriptor.name.clone(),
        fields,
        options: descriptor.options,
        location: descriptor.location.clone(),
        unit: pending.unit.clone(),
      });
    }

    debug!(structs = table.len(), "resolved struct table");
    table
  }

  fn classify(&self, type_name: &str) -> TypeClass {
    if let Some(kind) = PrimitiveKind::from_spelling(type_name) {
      TypeClass::Primitive(kind)
    } else if self.pending.contains_key(type_name) {
      TypeClass::StructRef(type_name.to_string())
    } else {
      TypeClass::Unknown(type_name.to_string())
    }
  }
}

/* Resolve a batch of units in one go */
pub fn resolve_units(units: Vec<DescriptorUnit>, policy: RedeclarationPolicy) -> Result<StructTable, ResolveError> {
  let mut resolver = TypeResolver::new(policy);
  for unit in units {
    resolver.add_unit(unit)?;
  }
  Ok(resolver.resolve())
}
