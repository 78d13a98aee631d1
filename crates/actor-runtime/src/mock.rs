//! # Mocks & Testing Guide
//!
//! Test doubles for both halves of the runtime: [`MockClient`] stands in for a
//! `ResourceActor`, [`MockService`] stands in for a request-reply collaborator.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | Mocks | Real Actor / Endpoint |
//! |---------|-------|-----------------------|
//! | **Determinism** | Scripted replies | Subject to real state |
//! | **Error Injection** | `return_err` | Requires a handler that fails |
//! | **Use Case** | Logic *around* the client | The actor or full system |
//!
//! ## Fluent expectations
//!
//! Expectations are consumed in order. A request that doesn't match the next expectation
//! panics the mock task, which the caller sees as `FrameworkError::ActorDropped`.
//!
//! ```rust
//! use actor_runtime::mock::MockService;
//! use actor_runtime::FrameworkError;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockService::<u32, String>::new();
//!     mock.expect().return_ok("one".to_string());
//!     mock.expect().return_err(FrameworkError::ServiceFailure("down".into()));
//!
//!     let client = mock.client();
//!     assert_eq!(client.send(1).await.unwrap(), "one");
//!     assert!(client.send(2).await.is_err());
//!
//!     assert_eq!(mock.received(), vec![1, 2]);
//!     mock.verify();
//! }
//! ```
//!
//! ## Channel helpers
//!
//! [`create_mock_client`] and [`create_mock_service`] hand back the raw receiver so a test can
//! inspect each request and answer it by hand with the `expect_*` helpers.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Listing, ResourceRequest, Response};
use crate::service::{service_channel, ServiceClient, ServiceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// RESOURCE MOCK
// =============================================================================

/// A scripted reply for one resource request.
pub enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
    List {
        response: Result<Listing<T>, FrameworkError>,
    },
}

type Queue<E> = Arc<Mutex<VecDeque<E>>>;

/// A mock `ResourceActor` driven by a queue of expectations.
///
/// ```ignore
/// let mut mock = MockClient::<Order>::new();
/// mock.expect_get(order_id.clone()).return_ok(Some(order));
/// let store = OrderStore::new(mock.client());
/// // ...
/// mock.verify();
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<Expectation<T>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<Expectation<T>> = Arc::new(Mutex::new(VecDeque::new()));
        let pending = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = pending.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "Get for unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "Update for unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "Action for unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::List { respond_to, .. },
                        Some(Expectation::List { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    _ => panic!("Unexpected request or expectation mismatch"),
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<Expectation<T>, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<Expectation<T>, T> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<Expectation<T>, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_action(
        &mut self,
        id: T::Id,
    ) -> ExpectationBuilder<Expectation<T>, T::ActionResult> {
        self.builder(move |response| Expectation::Action { id, response })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<Expectation<T>, Listing<T>> {
        self.builder(|response| Expectation::List { response })
    }

    fn builder<R: 'static>(
        &self,
        wrap: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<Expectation<T>, R> {
        ExpectationBuilder {
            queue: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Finishes an expectation with the reply the mock should send.
pub struct ExpectationBuilder<E, R> {
    queue: Queue<E>,
    wrap: Box<dyn FnOnce(Result<R, FrameworkError>) -> E + Send>,
}

impl<E, R> ExpectationBuilder<E, R> {
    /// Reply with a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Reply with an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.wrap)(response);
        self.queue.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// SERVICE MOCK
// =============================================================================

/// A mock request-reply service that answers from a queue and records every request.
pub struct MockService<Req, Rep> {
    client: ServiceClient<Req, Rep>,
    replies: Queue<Result<Rep, FrameworkError>>,
    received: Arc<Mutex<Vec<Req>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<Req: Send + 'static, Rep: Send + 'static> Default for MockService<Req, Rep> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req: Send + 'static, Rep: Send + 'static> MockService<Req, Rep> {
    pub fn new() -> Self {
        let (client, mut receiver) = service_channel::<Req, Rep>(100);
        let replies: Queue<Result<Rep, FrameworkError>> = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let (pending, log) = (replies.clone(), received.clone());

        let handle = tokio::spawn(async move {
            while let Some(ServiceRequest {
                request,
                respond_to,
            }) = receiver.recv().await
            {
                log.lock().unwrap().push(request);
                let reply = pending
                    .lock()
                    .unwrap()
                    .pop_front()
                    .expect("Unexpected request: no reply queued");
                let _ = respond_to.send(reply);
            }
        });

        Self {
            client,
            replies,
            received,
            _handle: handle,
        }
    }

    pub fn client(&self) -> ServiceClient<Req, Rep> {
        self.client.clone()
    }

    /// Queues the reply for the next request.
    pub fn expect(&self) -> ExpectationBuilder<Result<Rep, FrameworkError>, Rep> {
        ExpectationBuilder {
            queue: self.replies.clone(),
            wrap: Box::new(|response| response),
        }
    }

    /// Panics if any queued reply was not consumed.
    pub fn verify(&self) {
        let remaining = self.replies.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

impl<Req: Clone + Send + 'static, Rep: Send + 'static> MockService<Req, Rep> {
    /// Every request received so far, in arrival order.
    pub fn received(&self) -> Vec<Req> {
        self.received.lock().unwrap().clone()
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a resource client and the receiver its requests arrive on.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Creates a service client and the receiver its requests arrive on.
pub fn create_mock_service<Req, Rep>(
    buffer_size: usize,
) -> (ServiceClient<Req, Rep>, mpsc::Receiver<ServiceRequest<Req, Rep>>) {
    service_channel(buffer_size)
}

/// Next message, if it is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Update request.
pub async fn expect_update<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Update, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Action request.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a List request.
pub async fn expect_list<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Filter, usize, usize, Response<Listing<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List {
            filter,
            offset,
            limit,
            respond_to,
        }) => Some((filter, offset, limit, respond_to)),
        _ => None,
    }
}

/// Next message on a service channel.
pub async fn expect_request<Req, Rep>(
    receiver: &mut mpsc::Receiver<ServiceRequest<Req, Rep>>,
) -> Option<(Req, Response<Rep>)> {
    receiver
        .recv()
        .await
        .map(|ServiceRequest { request, respond_to }| (request, respond_to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: u32,
        text: String,
    }

    #[derive(Debug)]
    struct NoteCreate {
        text: String,
    }

    #[derive(Debug)]
    enum NoteAction {}

    #[derive(Debug, thiserror::Error)]
    #[error("Note error")]
    struct NoteError;

    #[async_trait]
    impl ActorEntity for Note {
        type Id = u32;
        type Create = NoteCreate;
        type Update = String;
        type Action = NoteAction;
        type ActionResult = ();
        type Filter = ();
        type Context = ();
        type Error = NoteError;

        fn from_create_params(id: u32, params: NoteCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                text: params.text,
            })
        }

        async fn on_update(&mut self, text: String, _ctx: &()) -> Result<(), Self::Error> {
            self.text = text;
            Ok(())
        }

        async fn handle_action(&mut self, action: NoteAction, _ctx: &()) -> Result<(), Self::Error> {
            match action {}
        }
    }

    #[tokio::test]
    async fn test_channel_helpers() {
        let (client, mut receiver) = create_mock_client::<Note>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(NoteCreate {
                    text: "draft".to_string(),
                })
                .await
        });

        let (params, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(params.text, "draft");
        responder
            .send(Ok(Note {
                id: 1,
                text: params.text,
            }))
            .unwrap();

        let created = create_task.await.unwrap().unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Note>::new();
        let note = Note {
            id: 1,
            text: "hello".to_string(),
        };
        mock.expect_get(1).return_ok(Some(note.clone()));
        mock.expect_list().return_ok(Listing {
            items: vec![note.clone()],
            total: 3,
        });
        mock.expect_update(1).return_err(FrameworkError::NotFound("1".into()));

        let client = mock.client();
        assert_eq!(client.get(1).await.unwrap(), Some(note));
        assert_eq!(client.list((), 0, 1).await.unwrap().total, 3);
        assert!(matches!(
            client.update(1, "bye".to_string()).await,
            Err(FrameworkError::NotFound(_))
        ));

        mock.verify();
    }

    #[tokio::test]
    async fn test_unscripted_request_drops_the_reply() {
        let mock = MockService::<u32, u32>::new();
        let err = mock.client().send(5).await.unwrap_err();
        assert!(matches!(err, FrameworkError::ActorDropped));
    }
}
