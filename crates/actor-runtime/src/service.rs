//! # Request-Reply Services
//!
//! Resource actors own state. Services don't: a service answers one request with one reply,
//! the way a remote collaborator does behind a message broker. This module provides the same
//! channel plumbing for that shape.
//!
//! - [`ServiceClient`] sends a request and suspends until the reply, a transport failure or
//!   the optional timeout.
//! - [`ServiceEndpoint`] drains the request channel and hands each request to a
//!   [`ServiceHandler`].
//!
//! A network bridge can sit on either side: it can own the receiver returned by
//! [`service_channel`] and forward requests to a broker, or feed broker messages into a
//! `ServiceClient`.
//!
//! ```rust
//! use actor_runtime::{FrameworkError, ServiceEndpoint, ServiceHandler};
//! use async_trait::async_trait;
//!
//! struct Doubler;
//!
//! #[async_trait]
//! impl ServiceHandler for Doubler {
//!     type Request = u32;
//!     type Reply = u32;
//!     async fn handle(&mut self, request: u32) -> Result<u32, FrameworkError> {
//!         Ok(request * 2)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (endpoint, client) = ServiceEndpoint::new(8);
//!     tokio::spawn(endpoint.run(Doubler));
//!     assert_eq!(client.send(21).await.unwrap(), 42);
//! }
//! ```

use crate::error::FrameworkError;
use crate::message::Response;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// A request in flight, paired with the channel its reply goes back on.
#[derive(Debug)]
pub struct ServiceRequest<Req, Rep> {
    pub request: Req,
    pub respond_to: Response<Rep>,
}

/// Creates a client and the raw receiver its requests arrive on.
pub fn service_channel<Req, Rep>(
    buffer_size: usize,
) -> (ServiceClient<Req, Rep>, mpsc::Receiver<ServiceRequest<Req, Rep>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ServiceClient::new(sender), receiver)
}

/// Sending half of a request-reply service.
pub struct ServiceClient<Req, Rep> {
    sender: mpsc::Sender<ServiceRequest<Req, Rep>>,
    timeout: Option<Duration>,
}

impl<Req, Rep> Clone for ServiceClient<Req, Rep> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            timeout: self.timeout,
        }
    }
}

impl<Req, Rep> ServiceClient<Req, Rep> {
    pub fn new(sender: mpsc::Sender<ServiceRequest<Req, Rep>>) -> Self {
        Self {
            sender,
            timeout: None,
        }
    }

    /// Bounds every round trip, queueing included, by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends one request and waits for its reply.
    pub async fn send(&self, request: Req) -> Result<Rep, FrameworkError> {
        let round_trip = async {
            let (respond_to, response) = oneshot::channel();
            self.sender
                .send(ServiceRequest {
                    request,
                    respond_to,
                })
                .await
                .map_err(|_| FrameworkError::ActorClosed)?;
            response.await.map_err(|_| FrameworkError::ActorDropped)?
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, round_trip)
                .await
                .map_err(|_| FrameworkError::Timeout(limit))?,
            None => round_trip.await,
        }
    }
}

/// Business logic behind a request-reply endpoint.
#[async_trait]
pub trait ServiceHandler: Send + 'static {
    type Request: Send + Debug + 'static;
    type Reply: Send + 'static;

    async fn handle(&mut self, request: Self::Request) -> Result<Self::Reply, FrameworkError>;
}

/// Receiving half of a request-reply service. Requests are handled one at a time.
pub struct ServiceEndpoint<H: ServiceHandler> {
    receiver: mpsc::Receiver<ServiceRequest<H::Request, H::Reply>>,
}

impl<H: ServiceHandler> ServiceEndpoint<H> {
    pub fn new(buffer_size: usize) -> (Self, ServiceClient<H::Request, H::Reply>) {
        let (client, receiver) = service_channel(buffer_size);
        (Self { receiver }, client)
    }

    /// Serves requests until every client has been dropped.
    pub async fn run(mut self, mut handler: H) {
        let service = std::any::type_name::<H>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(service, "Service started");

        let mut handled = 0usize;
        while let Some(ServiceRequest {
            request,
            respond_to,
        }) = self.receiver.recv().await
        {
            debug!(service, ?request, "Request");
            let reply = handler.handle(request).await;
            if let Err(e) = &reply {
                warn!(service, error = %e, "Request failed");
            }
            if respond_to.send(reply).is_err() {
                warn!(service, "Caller went away before the reply");
            }
            handled += 1;
        }

        info!(service, handled, "Shutdown");
    }
}
