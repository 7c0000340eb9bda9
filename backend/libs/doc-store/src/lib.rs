//! Document-store contract shared by the social and feed services.
//!
//! The store holds JSON documents in named collections and offers three
//! primitives: point reads, field-equality queries, and atomic
//! version-checked commits. Mutations go through [`Transaction`], which
//! reads fresh values through the store, stages writes, and commits only
//! if nothing it read has changed since: an optimistic discipline with
//! no locks held between read and commit.
//!
//! Every committed write is announced on the store's [`SubscriptionRouter`]
//! as a bare "this document changed" event. Consumers re-fetch or
//! re-derive; events never carry a diff.

pub mod document;
pub mod error;
pub mod memory;
pub mod store;
pub mod subscription;

pub use document::{Direction, DocKey, FieldFilter, Query, VersionedDocument};
pub use error::StoreError;
pub use memory::MemoryGraphStore;
pub use store::{GraphStore, Precondition, Transaction, Write};
pub use subscription::{ChangeEvent, SubscriptionRouter};
