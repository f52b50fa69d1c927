//! # CatalogEntity Trait
//!
//! The contract every remotely stored resource implements so that a [`SnapshotActor`](crate::framework::SnapshotActor)
//! can keep an optimistic copy of its collection. The associated types pin down the id
//! and the draft payload, so a product draft can never be applied to some other resource.
//!
//! # Placeholder ids
//! Entries created locally exist before the server has assigned them an id. The actor
//! hands out a [`LocalKey`] for each of them and builds the id through [`EntityId::local`].
//! Implementations must make sure a local id never collides with a server id.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// Key the actor assigns to a placeholder entry until the server confirms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalKey(pub u64);

impl Display for LocalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "local_{}", self.0)
    }
}

/// Identifier of a cached entity.
pub trait EntityId: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static {
    /// Builds the id of a placeholder entry.
    fn local(key: LocalKey) -> Self;

    /// Returns the local key if this id belongs to an unconfirmed placeholder.
    fn as_local(&self) -> Option<LocalKey>;

    fn is_local(&self) -> bool {
        self.as_local().is_some()
    }
}

/// Trait that any resource must implement to be cached by a `SnapshotActor`.
///
/// # Architecture Note
/// The actor only needs three things from an entity: where its id lives, how to build
/// a placeholder from a draft, and how to apply a draft to an existing value. Everything
/// else (ordering, rollback, per-id sequencing) is written once in the actor.
pub trait CatalogEntity: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The identifier, assigned by the server on creation.
    type Id: EntityId;

    /// The payload sent on create and update.
    type Draft: Clone + Debug + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// Builds an entity from an id and a draft. Used for placeholders.
    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self;

    /// Applies a draft to an existing entity, keeping its id.
    fn apply(&mut self, draft: Self::Draft);

    /// Whether this entity matches an already lowercased search term.
    fn matches(&self, needle: &str) -> bool;
}
