//! # Actor Runtime
//!
//! Building blocks for services that own state in a single task and talk to their
//! collaborators through request-reply channels.
//!
//! ## Two shapes of actor
//!
//! - **Resource actors** ([`ResourceActor`]) own a store of entities and serve
//!   create / get / update / action / list requests against it. One task owns the store and
//!   handles one message at a time, so each request is an all-or-nothing unit with no locks.
//! - **Services** ([`ServiceEndpoint`]) are stateless from the caller's point of view: one
//!   request in, one reply out. A [`ServiceClient`] is how the rest of the system reaches an
//!   external collaborator, whether that collaborator runs in-process or behind a broker bridge.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]): domain state and the hooks that mutate it.
//! 2. **Runtime Layer** ([`ResourceActor`], [`ServiceEndpoint`]): message loops.
//! 3. **Interface Layer** ([`ResourceClient`], [`ServiceClient`], [`ActorClient`]): typed calls.
//!
//! ## Context Injection
//!
//! Dependencies are handed to `ResourceActor::run(context)` rather than to the constructor,
//! so actors can be created first and wired afterwards.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`mock::MockClient`] and [`mock::MockService`], which answer
//! requests from a scripted queue instead of real state.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod service;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Listing, ResourceRequest, Response};
pub use service::{service_channel, ServiceClient, ServiceEndpoint, ServiceHandler, ServiceRequest};
