//! Cardsmith Media - file-level pipeline stages
//!
//! This crate provides the two local stages of the pipeline:
//!
//! - [`resize`] - decode, resample, and re-encode card images
//! - [`metadata`] - derive a faction tag and sidecar description per image
//!
//! Both stages are pure functions of a single file and perform no
//! networking, so they can be exercised entirely against a temp directory.

pub mod metadata;
pub mod resize;

// Re-export main types
pub use metadata::{MetadataResolver, DEFAULT_DESCRIPTION};
pub use resize::{derived_suffix, is_derived, ImageTransformer};
