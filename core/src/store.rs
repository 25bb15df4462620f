//! The todo view-model.
//!
//! # Design
//! `TodoStore` owns the current `TodoState` snapshot and a list of
//! subscribers. Each API operation is two calls: `begin_*` checks the
//! preconditions and hands back a `PendingOp` carrying the request, and
//! `settle` merges whatever came back. The store never performs I/O and
//! never changes the list before the server answers, so a host is free to
//! keep several operations in flight and settle them in any order.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::state::TodoState;
use crate::types::{EnvelopePolicy, TodoId};

/// Which API call a `PendingOp` belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Toggle(TodoId),
    Rename(TodoId),
    Delete(TodoId),
}

impl Operation {
    /// Banner text shown when the operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::List => "Failed to fetch todos",
            Operation::Create => "Failed to add todo",
            Operation::Toggle(_) => "Failed to update todo status",
            Operation::Rename(_) => "Failed to update todo title",
            Operation::Delete(_) => "Failed to delete todo",
        }
    }
}

/// An operation whose request has been built but not yet settled.
#[derive(Debug, Clone)]
pub struct PendingOp {
    pub operation: Operation,
    pub request: HttpRequest,
    client: TodoClient,
}

/// Handle returned by `TodoStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&TodoState)>;

pub struct TodoStore {
    client: Option<TodoClient>,
    policy: EnvelopePolicy,
    state: Arc<TodoState>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoStore")
            .field("client", &self.client)
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TodoStore {
    pub fn new(policy: EnvelopePolicy) -> Self {
        Self {
            client: None,
            policy,
            state: Arc::new(TodoState::default()),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Point the store at a validated endpoint.
    pub fn connect(&mut self, client: TodoClient) {
        self.client = Some(client);
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn snapshot(&self) -> Arc<TodoState> {
        Arc::clone(&self.state)
    }

    /// Register `callback` to receive every committed snapshot.
    pub fn subscribe(&mut self, callback: impl FnMut(&TodoState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn commit(&mut self, next: TodoState) {
        if *self.state == next {
            return;
        }
        self.state = Arc::new(next);
        for (_, callback) in &mut self.subscribers {
            callback(&self.state);
        }
    }

    fn pending(&self, operation: Operation, request: HttpRequest) -> PendingOp {
        debug!(?operation, method = request.method.as_str(), path = %request.path, "request built");
        PendingOp {
            operation,
            request,
            client: self.client.clone().unwrap_or_else(|| TodoClient::new("")),
        }
    }

    pub fn begin_list(&mut self) -> Option<PendingOp> {
        let request = self.client.as_ref()?.build_list_todos();
        let pending = self.pending(Operation::List, request);
        self.commit(self.state.with_loading(true));
        Some(pending)
    }

    /// `None` when unconfigured or when `title` is blank.
    pub fn begin_create(&mut self, title: &str) -> Option<PendingOp> {
        if title.trim().is_empty() {
            return None;
        }
        let built = self.client.as_ref()?.build_create_todo(title);
        self.built_or_failed(Operation::Create, built)
    }

    /// Submit the current draft.
    pub fn begin_create_from_draft(&mut self) -> Option<PendingOp> {
        let draft = self.state.draft.clone();
        self.begin_create(&draft)
    }

    pub fn begin_toggle(&mut self, id: TodoId) -> Option<PendingOp> {
        let request = self.client.as_ref()?.build_toggle_status(id);
        Some(self.pending(Operation::Toggle(id), request))
    }

    pub fn begin_rename(&mut self, id: TodoId, title: &str) -> Option<PendingOp> {
        if title.trim().is_empty() {
            return None;
        }
        let built = self.client.as_ref()?.build_rename_todo(id, title);
        self.built_or_failed(Operation::Rename(id), built)
    }

    /// Submit the open edit session, if any.
    pub fn begin_save_edit(&mut self) -> Option<PendingOp> {
        let session = self.state.editing.clone()?;
        self.begin_rename(session.id, &session.text)
    }

    pub fn begin_delete(&mut self, id: TodoId) -> Option<PendingOp> {
        let request = self.client.as_ref()?.build_delete_todo(id);
        Some(self.pending(Operation::Delete(id), request))
    }

    fn built_or_failed(&mut self, operation: Operation, built: Result<HttpRequest, ApiError>) -> Option<PendingOp> {
        match built {
            Ok(request) => Some(self.pending(operation, request)),
            Err(e) => {
                self.fail(operation, &e);
                None
            }
        }
    }

    /// Merge the outcome of `pending` into the state.
    pub fn settle(&mut self, pending: PendingOp, result: Result<HttpResponse, ApiError>) {
        let PendingOp { operation, client, .. } = pending;
        let base = match operation {
            Operation::List => self.state.with_loading(false),
            _ => (*self.state).clone(),
        };

        let next = match operation {
            Operation::List => result
                .and_then(|r| client.parse_list_todos(r))
                .and_then(|env| self.accept(operation, env.success, env.message, env.data))
                .map(|todos| todos.map(|todos| base.with_todos(todos))),
            Operation::Create => result
                .and_then(|r| client.parse_create_todo(r))
                .and_then(|env| self.accept(operation, env.success, env.message, env.data))
                .map(|todo| todo.map(|todo| base.with_prepended(todo).with_draft(""))),
            Operation::Toggle(id) => result
                .and_then(|r| client.parse_toggle_status(r))
                .and_then(|env| self.accept(operation, env.success, env.message, env.data))
                .map(|todo| todo.map(|todo| base.with_replaced(id, todo))),
            Operation::Rename(id) => result
                .and_then(|r| client.parse_rename_todo(r))
                .and_then(|env| self.accept(operation, env.success, env.message, env.data))
                .map(|todo| todo.map(|todo| base.with_replaced(id, todo).without_editing())),
            Operation::Delete(id) => result
                .and_then(|r| client.parse_delete_todo(r))
                .and_then(|ack| self.accept(operation, ack.success, ack.message, Some(())))
                .map(|done| done.map(|()| base.without(id))),
        };

        match next {
            Ok(Some(state)) => self.commit(state),
            Ok(None) => self.commit(base),
            Err(e) => {
                self.commit(base);
                self.fail(operation, &e);
            }
        }
    }

    /// Apply the envelope policy. `Ok(None)` means "ignore this response".
    fn accept<T>(
        &self,
        operation: Operation,
        success: bool,
        message: String,
        data: Option<T>,
    ) -> Result<Option<T>, ApiError> {
        if success {
            return data
                .map(Some)
                .ok_or_else(|| ApiError::DeserializationError("successful envelope without data".to_string()));
        }
        match self.policy {
            EnvelopePolicy::Lenient => {
                warn!(?operation, %message, "server reported success=false, response ignored");
                Ok(None)
            }
            EnvelopePolicy::Strict => Err(ApiError::Rejected { message }),
        }
    }

    fn fail(&mut self, operation: Operation, cause: &ApiError) {
        let message = operation.failure_message();
        error!(?operation, error = %cause, "{message}");
        self.commit(self.state.with_error(message));
    }

    pub fn set_draft(&mut self, text: &str) {
        self.commit(self.state.with_draft(text));
    }

    /// Open the inline editor for `id`, seeded with its current title.
    /// Returns false if no such item is loaded.
    pub fn start_edit(&mut self, id: TodoId) -> bool {
        let Some(title) = self.state.find(id).map(|t| t.title.clone()) else {
            return false;
        };
        self.commit(self.state.editing(id, title));
        true
    }

    pub fn set_edit_text(&mut self, text: &str) {
        self.commit(self.state.with_edit_text(text));
    }

    pub fn cancel_edit(&mut self) {
        self.commit(self.state.without_editing());
    }

    pub fn dismiss_error(&mut self) {
        self.commit(self.state.without_error());
    }

    pub fn show_success(&mut self, message: &str) {
        self.commit(self.state.with_success_message(message));
    }

    pub fn dismiss_success(&mut self) {
        self.commit(self.state.without_success_message());
    }
}
