//! # Generic Actor Server
//!
//! `ResourceActor` owns the store for one entity type and processes requests sequentially.
//! Because one task owns the store, every request is applied in full or not at all, and no
//! locks are needed.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Listing, ResourceRequest};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor (server) and its client.
/// 2.  **Wire**: pass dependencies into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// ```rust
/// use actor_runtime::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Counter { id: u32, value: u32 }
/// #[derive(Debug)] struct CounterCreate;
/// #[derive(Debug)] struct CounterUpdate(u32);
/// #[derive(Debug)] enum CounterAction {}
/// #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
///
/// #[async_trait]
/// impl ActorEntity for Counter {
///     type Id = u32;
///     type Create = CounterCreate;
///     type Update = CounterUpdate;
///     type Action = CounterAction;
///     type ActionResult = ();
///     type Filter = ();
///     type Context = ();
///     type Error = CounterError;
///
///     fn from_create_params(id: u32, _: CounterCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, value: 0 })
///     }
///     async fn on_update(&mut self, update: CounterUpdate, _: &()) -> Result<(), Self::Error> {
///         self.value = update.0;
///         Ok(())
///     }
///     async fn handle_action(&mut self, _: CounterAction, _: &()) -> Result<(), Self::Error> {
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let mut next = 0;
///     let (actor, client) = ResourceActor::<Counter>::new(10, move || { next += 1; next });
///     tokio::spawn(actor.run(()));
///
///     let counter = client.create(CounterCreate).await.unwrap();
///     let updated = client.update(counter.id, CounterUpdate(7)).await.unwrap();
///     assert_eq!(updated.value, 7);
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: Box<dyn FnMut() -> T::Id + Send>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// * `buffer_size` - capacity of the request channel. When it is full, client calls wait.
    /// * `next_id` - id generator invoked once per `Create` request.
    pub fn new(
        buffer_size: usize,
        next_id: impl FnMut() -> T::Id + Send + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: Box::new(next_id),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the event loop until every client has been dropped.
    ///
    /// The `context` is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = (self.next_id)();

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.insert(id.clone(), item.clone());
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(mut staged) = self.store.get(&id).cloned() else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    match staged.on_update(update, &context).await {
                        Ok(()) => {
                            self.store.insert(id.clone(), staged.clone());
                            info!(entity_type, %id, "Updated");
                            let _ = respond_to.send(Ok(staged));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(mut staged) = self.store.get(&id).cloned() else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    match staged.handle_action(action, &context).await {
                        Ok(result) => {
                            self.store.insert(id.clone(), staged);
                            info!(entity_type, %id, "Action ok");
                            let _ = respond_to.send(Ok(result));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::List {
                    filter,
                    offset,
                    limit,
                    respond_to,
                } => {
                    let mut total = 0;
                    let mut items = Vec::new();
                    for item in self.store.values().filter(|item| item.matches(&filter)) {
                        if total >= offset && items.len() < limit {
                            items.push(item.clone());
                        }
                        total += 1;
                    }
                    debug!(entity_type, ?filter, offset, limit, total, returned = items.len(), "List");
                    let _ = respond_to.send(Ok(Listing { items, total }));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
