// Core modules implementing naming, inference, rendering, and error modeling.
pub mod error;
pub mod infer;
pub mod name;
pub mod render;
pub mod shape;
