#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # idl-validation
//!
//! Validation engine for the semantic model.
//!
//! Validation never throws for bad input data: every rule violation is
//! accumulated as a severity-tagged [`Finding`] and returned to the
//! caller, who decides whether ERROR findings block downstream code
//! generation. A registry maps each entity kind to its validator, so new
//! model-element kinds can be added without touching a central switch.

/// Field-level assertion vocabulary and finding codes.
pub mod checks;
/// The validator registry and per-run validation context.
pub mod engine;
/// Findings collection and message formatting.
pub mod findings;
/// Built-in validators, one per entity kind, plus the library rules.
pub mod rules;

pub use checks::FieldChecks;
pub use engine::{EntityValidator, ValidationContext, ValidationEngine};
pub use findings::{Finding, Findings, MessageFormat, Severity};
