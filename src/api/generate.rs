//! Purpose: One-call generation entrypoints over the core engine.
//! Exports: `generate_source`, `generate_from_reader`, `structs_from_file`.
//! Role: Convenience layer shared by the CLI, server, and workbench.
//! Invariants: File errors carry the offending path.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::core::error::{Error, ErrorKind};
use crate::core::infer::{GenerateOptions, Generator};
use crate::core::name::name_from_file;
use crate::core::render::Renderer;
use crate::core::shape::StructDef;

/// Infer and render in one call.
pub fn generate_source(
    options: &GenerateOptions,
    base_name: &str,
    input: &str,
) -> Result<String, Error> {
    let defs = Generator::new(options.clone()).structs_from_str(base_name, input)?;
    Ok(Renderer::new(options).render(&defs))
}

/// Read a stream to completion and generate from its contents.
pub fn generate_from_reader(
    options: &GenerateOptions,
    base_name: &str,
    mut reader: impl Read,
) -> Result<String, Error> {
    let mut input = String::new();
    reader.read_to_string(&mut input).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read input")
            .with_source(err)
    })?;
    generate_source(options, base_name, &input)
}

/// Struct definitions for one input file. The base name comes from the
/// options override when set, otherwise from the file name.
pub fn structs_from_file(
    options: &GenerateOptions,
    path: &Path,
) -> Result<Vec<StructDef>, Error> {
    let input = fs::read_to_string(path).map_err(|err| {
        let kind = if err.kind() == std::io::ErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            ErrorKind::Io
        };
        Error::new(kind)
            .with_message("failed to read input file")
            .with_path(path)
            .with_source(err)
    })?;
    let base = match &options.name {
        Some(name) => name.clone(),
        None => name_from_file(path),
    };
    Generator::new(options.clone())
        .structs_from_str(&base, &input)
        .map_err(|err| err.with_path(path))
}
