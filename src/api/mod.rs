//! Purpose: Define the stable public Rust API boundary for structsmith.
//! Exports: Core types and operations needed by the CLI, server, and tests.
//! Role: Public surface; internal module layout can shift underneath it.
//! Invariants: This module is the supported path to the generation engine.

mod generate;

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::infer::{FALLBACK_TYPE, GenerateOptions, Generator};
pub use crate::core::name::{field_name, name_from_file, type_name};
pub use crate::core::render::Renderer;
pub use crate::core::shape::{Field, FieldKind, StructDef};
pub use generate::{generate_from_reader, generate_source, structs_from_file};
