#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # idl-resolve
//!
//! Symbol resolution and reference-name integrity for the semantic model.
//!
//! Resolution is a single-hop lookup by (namespace, local name): an
//! unresolved name is an absent result, never an error, and direct or
//! mutual reference cycles are inert until something deliberately walks
//! the inheritance chain (which carries a visited-set guard). The
//! [`IntegrityMaintainer`] is a model listener that keeps every reference
//! field's textual companion synchronized with its live entity pointer.

/// The integrity-maintainer model listener.
pub mod integrity;
/// Symbol table, qualified-name resolution, and reference-name building.
pub mod symbols;

pub use integrity::IntegrityMaintainer;
pub use symbols::{
    build_reference_name, extension_chain, extension_of, library_namespace, resolve,
    resolve_model, Resolution, SymbolTable,
};
