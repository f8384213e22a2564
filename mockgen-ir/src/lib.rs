//! Descriptor types consumed by the mockgen generator.
//!
//! These types are the contract between a type-resolution front end (Go
//! sources, JSON descriptor files) and the code generator. They carry
//! already-resolved types: the generator never reparses type syntax.
//!
//! # Architecture
//!
//! ```text
//! types.go / api.json → resolver → InterfaceDescriptor → generator → mock.go
//! ```
//!
//! The descriptors are:
//! - Immutable once resolved
//! - Closed over their type shapes (see [`TypeExpr`])
//! - Serializable, so any front end can hand them over as JSON

mod interface;
mod types;

pub use interface::{
    DescriptorSet, FUNCTION_METHOD, InterfaceDescriptor, InterfaceKind, MethodDescriptor,
    ParamDescriptor,
};
pub use types::{ChanDir, Field, Namespace, TypeExpr, Underlying};
