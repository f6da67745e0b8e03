//! Project brief assembly and YAML persistence.
//!
//! Turns a snapshot, its signals, and the reasoning insights into the final
//! structured document, with save/load/validate round-tripping.

pub mod generator;
pub mod schema;

pub use generator::{generate_brief, infer_project_name, load_brief, save_brief};
pub use schema::{Brief, Metadata, SCHEMA_VERSION};
