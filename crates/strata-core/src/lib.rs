//! Strata Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Strata layout
//! engine and its hosts:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Model**: Concept nodes and connections supplied by the data service ([`model`] module)

pub mod geometry;
pub mod identifier;
pub mod model;
