//! # Mock Clients
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered from a
//! queue of expectations instead of a running actor. Use it to test code that talks to an
//! actor (the order flow talking to the consumer directory, for instance) without spawning
//! that actor.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | State | none, scripted answers | real store |
//! | Error injection | `return_err` | needs the right state |
//! | Use case | logic around a client | the actor itself, full system |
//!
//! ```rust
//! use rider_dispatch::framework::mock::MockClient;
//! use rider_dispatch::framework::FrameworkError;
//! use rider_dispatch::model::{Consumer, UserId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Consumer>::new();
//!     mock.expect_get(UserId(4)).return_err(FrameworkError::ActorClosed);
//!
//!     let result = mock.client().get(UserId(4)).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! For finer control, [`create_mock_client`] returns the raw receiver and the `expect_*`
//! helpers pull the next request off it together with its responder.

use super::client::ResourceClient;
use super::entity::ActorEntity;
use super::error::FrameworkError;
use super::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with ordered expectations.
///
/// Requests are matched against expectations in FIFO order. A request that does not match
/// the next expectation (wrong kind or wrong id) is recorded as a failure and its responder
/// is dropped, so the caller sees `ActorDropped`. [`MockClient::verify`] panics on recorded
/// failures and on unused expectations.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    failures: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let failures = Arc::new(Mutex::new(Vec::new()));
        let queue = expectations.clone();
        let failed = failures.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();
                let mismatch = match (request, next) {
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response })) => {
                        if id == want {
                            let _ = respond_to.send(response);
                            None
                        } else {
                            Some(format!("get({id}) but expected get({want})"))
                        }
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                        None
                    }
                    (ResourceRequest::List { filter, respond_to }, Some(Expectation::List { response })) => {
                        let response = response.map(|items| match filter {
                            Some(filter) => items.into_iter().filter(|item| filter.matches(item)).collect(),
                            None => items,
                        });
                        let _ = respond_to.send(response);
                        None
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: want, response }),
                    ) => {
                        if id == want {
                            let _ = respond_to.send(response);
                            None
                        } else {
                            Some(format!("action on {id} but expected action on {want}"))
                        }
                    }
                    (_, None) => Some("request arrived with no expectation left".to_string()),
                    _ => Some("request kind did not match the next expectation".to_string()),
                };
                if let Some(message) = mismatch {
                    failed.lock().unwrap().push(message);
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            failures,
            _handle: handle,
        }
    }

    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| Expectation::Get {
            id,
            response,
        })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Create {
            response,
        })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::List {
            response,
        })
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Action { id, response }
        })
    }

    /// Panics if a request went unmatched or an expectation was never consumed.
    pub fn verify(&self) {
        let failures = self.failures.lock().unwrap();
        if !failures.is_empty() {
            panic!("Mock received unexpected requests: {failures:?}");
        }
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Finishes an expectation with the value (or error) the mock should answer with.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    queue: Queue<T>,
    build: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R: 'static> ExpectationBuilder<T, R> {
    fn new(
        queue: Queue<T>,
        build: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            queue,
            build: Box::new(build),
        }
    }

    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.build)(response);
        self.queue.lock().unwrap().push_back(expectation);
    }
}

/// Creates a client plus the receiver its requests arrive on.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Pulls the next request and returns it if it is a Create.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Pulls the next request and returns it if it is a List.
pub async fn expect_list<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<oneshot::Sender<Result<Vec<T>, FrameworkError>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to, .. }) => Some(respond_to),
        _ => None,
    }
}
