//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract a resource must satisfy to be owned by a
//! [`ResourceActor`](crate::ResourceActor). Associated types pin down the id, the creation
//! payload, the update payload, custom actions, the listing filter, the injected context and the
//! error type, so a payload meant for one resource can never reach another.
//!
//! Resources managed this way are append-and-mutate only: there is no delete hook.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are `async` so they may call other services. The `Context` associated type is handed
/// to `ResourceActor::run` and passed by reference to every hook, which lets dependencies be
/// bound after construction.
///
/// # Staged mutation
/// `on_update` and `handle_action` run against a staged copy of the stored entity. The copy
/// replaces the stored value only when the hook returns `Ok`, so a hook that fails halfway
/// leaves no trace.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Unique identifier. `Ord` gives listings a stable order.
    type Id: Ord + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations that don't fit plain updates.
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Predicate payload used by `List` requests.
    type Filter: Send + Sync + Debug;

    /// Runtime dependencies injected into the actor. Use `()` when none are needed.
    type Context: Send + Sync;

    /// One error enum for the whole entity rather than one per message.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from the generated id and the payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Whether this entity belongs in a listing for `filter`.
    fn matches(&self, _filter: &Self::Filter) -> bool {
        true
    }

    /// Called after construction and before the entity is stored.
    /// Returning an error aborts the creation; nothing is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
