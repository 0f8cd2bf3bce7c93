//! Cardsmith Client - HTTP publisher for the card-game backend
//!
//! This crate provides the single network-facing component of the pipeline:
//!
//! - [`graphql`] - GraphQL mutations over HTTP (multipart card upload and
//!   JSON guild-upgrade creation)
//!
//! # Overview
//!
//! The client builds request bodies programmatically (never through string
//! interpolation), posts to a caller-supplied endpoint, and maps transport
//! and response failures onto the application error taxonomy. Every publish
//! is fire-and-forget, at-most-once: one POST per record, no retry.

pub mod graphql;

// Re-export main client type
pub use graphql::GraphqlClient;
