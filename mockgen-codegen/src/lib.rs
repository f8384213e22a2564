//! Shared code generation utilities for mockgen.
//!
//! This crate provides language-agnostic building blocks used by the
//! language-specific generator (`mockgen-codegen-go`).
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, CodeFragment, etc.)
//! - [`generation`] - Generation state (NamespaceBindings, ImportCollector)
//! - [`testing`] - Test utilities (feature-gated)

pub mod builder;
pub mod generation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
