//! Scripted generation service for unit tests.
use crate::client::{GenerateRequest, GenerationService, ServiceError};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Replays queued replies in order; an exhausted script fails the call.
pub(crate) struct ScriptedService {
    reachable: bool,
    probes: Cell<usize>,
    replies: RefCell<VecDeque<Result<String, ServiceError>>>,
    requests: RefCell<Vec<GenerateRequest>>,
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self {
            reachable: true,
            probes: Cell::new(0),
            replies: RefCell::new(VecDeque::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    pub(crate) fn reply(self, text: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(text.to_string()));
        self
    }

    pub(crate) fn fail(self, error: ServiceError) -> Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }

    pub(crate) fn probe_count(&self) -> usize {
        self.probes.get()
    }

    pub(crate) fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.borrow().clone()
    }
}

impl GenerationService for ScriptedService {
    fn probe(&self) -> Result<(), ServiceError> {
        self.probes.set(self.probes.get() + 1);
        if self.reachable {
            Ok(())
        } else {
            Err(ServiceError::Unreachable("connection refused".to_string()))
        }
    }

    fn generate(&self, request: &GenerateRequest) -> Result<String, ServiceError> {
        self.requests.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Transport("script exhausted".to_string())))
    }
}
