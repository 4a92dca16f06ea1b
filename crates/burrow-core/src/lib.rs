//! Core types, configuration, and error handling for burrow.
//!
//! This crate provides the shared foundation used by the rest of the
//! workspace:
//! - [`BurrowError`] — unified error type using `thiserror`
//! - [`BurrowConfig`] — configuration loaded from `.burrow.toml`
//! - Shared types: [`ReviewSession`], [`RawComment`], [`LineRef`],
//!   [`Category`], [`ClassifiedComment`], [`Representation`],
//!   [`RenderedItem`], [`FileGroup`], [`Report`], [`SessionMode`]

mod config;
mod error;
mod types;

pub use config::{BurrowConfig, MarkerConfig, ReportConfig, ReviewerConfig};
pub use error::BurrowError;
pub use types::{
    Category, ClassifiedComment, Decision, FileGroup, LineRef, RawComment, RenderedItem, Report,
    Representation, ReviewSession, SessionMode, GENERAL_GROUP,
};

/// A convenience `Result` type for burrow operations.
pub type Result<T> = std::result::Result<T, BurrowError>;
