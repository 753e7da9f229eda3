#![doc = "hn-digest-core: core logic library for hn-digest."]

//! This crate contains the comment thread reconstruction, the digest rendering
//! and the digest pipeline. Network clients are not included here; the pipeline
//! reaches its collaborators through the traits in [`contract`].
//!
//! # Usage
//! Call [`thread::reconstruct`] (or [`ingest::parse_thread`] on an item page)
//! for a bounded reply tree, or [`synchronise::synchronise`] for a full digest run.

pub mod config;
pub mod contract;
pub mod digest;
pub mod ingest;
pub mod synchronise;
pub mod thread;

pub use thread::{reconstruct, CommentNode, CommentRecord, ReconstructPolicy, ThreadError};
