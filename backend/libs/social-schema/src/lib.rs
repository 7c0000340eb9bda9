//! Shared document models for the social graph.
//!
//! These structs are the wire shape of the documents in the store; both
//! services read and write them through the same definitions so the
//! counter invariants have a single source of truth.

pub mod models;

pub use models::{collections, Comment, GeoPoint, Post, UserProfile};
