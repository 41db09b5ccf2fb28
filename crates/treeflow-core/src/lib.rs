//! Treeflow Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Treeflow
//! flowchart crates. It includes:
//!
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: Stroke definitions used when emitting SVG ([`draw`] module)
//! - **Semantic**: The flowchart document model ([`semantic`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod semantic;
