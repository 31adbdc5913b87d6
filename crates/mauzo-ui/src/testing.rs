//! Shared test doubles for the native test suite.

use crate::services::api::{ApiError, Transport, WireRequest};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

/// Shared handle onto the requests a [`RecordingTransport`] has seen.
pub(crate) type SeenRequests = Rc<RefCell<Vec<WireRequest>>>;

const EMPTY_SUCCESS: &str = r#"{"success":true,"message":{}}"#;

/// A transport that records every request and replays canned response
/// bodies in order, answering an empty success envelope once exhausted.
pub(crate) struct RecordingTransport {
    responses: RefCell<VecDeque<String>>,
    seen: SeenRequests,
}

impl RecordingTransport {
    pub(crate) fn replying(responses: &[&str]) -> (Self, SeenRequests) {
        let seen = SeenRequests::default();
        let transport = Self {
            responses: RefCell::new(responses.iter().map(ToString::to_string).collect()),
            seen: Rc::clone(&seen),
        };
        (transport, seen)
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: WireRequest) -> impl Future<Output = Result<String, ApiError>> {
        self.seen.borrow_mut().push(request);
        let response = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| EMPTY_SUCCESS.to_string());
        async move { Ok(response) }
    }
}
