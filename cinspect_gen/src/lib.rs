/* Struct inspection code generator
 *
 * Resolves the field types of extracted C structs against each other and
 * drives pluggable backends (debug printers, ImGui editors) over the
 * resulting type graph in dependency order.
 */

pub mod cmds;
pub mod codegen;
pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod resolved;

pub use codegen::{Backend, BackendKind};
pub use driver::{
    BackendOutput, CodegenDriver, DriverRun, FragmentMap, generate_backend, generate_fragments,
};
pub use resolved::{
    PrimitiveKind, RedeclarationPolicy, ResolvedField, ResolvedStruct, StructTable, TypeClass,
    TypeResolver,
};
