//! # Generic Messages
//!
//! Message types exchanged between `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors and services.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A page of entities plus the number of entities matching the filter overall.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Request sent to a `ResourceActor`.
///
/// Each variant is processed to completion before the next message is read, so every request
/// is one transactional unit against the actor's store.
///
/// - **Create**: builds a resource from [`ActorEntity::Create`] and replies with the stored entity.
/// - **Get**: fetches the current state by id.
/// - **Update**: applies an [`ActorEntity::Update`] to a staged copy and commits it on success.
/// - **Action**: runs an [`ActorEntity::Action`] on a staged copy and commits it on success.
/// - **List**: filters with [`ActorEntity::Filter`] and returns one window of the matches in id order.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    List {
        filter: T::Filter,
        offset: usize,
        limit: usize,
        respond_to: Response<Listing<T>>,
    },
}
