//! Purpose: Shared library crate used by the `structsmith` CLI and tests.
//! Exports: `api` (supported generation surface), `core` (naming, inference, rendering, errors).
//! Role: Library backing the binary; external callers go through `api`.
//! Invariants: `api` re-exports everything the binary and tests need.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
