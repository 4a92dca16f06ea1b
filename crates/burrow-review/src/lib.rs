//! The extraction engine for burrow, plus its GitHub shell.
//!
//! The engine turns raw review sessions into a final [`burrow_core::Report`]:
//! session selection, markup normalization, classification, representation
//! selection, file grouping, and rendering. The engine performs no I/O; the
//! only network code lives in [`github`].

pub mod classify;
pub mod github;
pub mod group;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod sections;
pub mod select;
pub mod session;
