//! List view controller - owns one fetched collection and its edit session.
//!
//! Edits are optimistic: an approved update is written into the list before
//! the request is sent and compensated if the request fails. Deletes are
//! pessimistic: the record leaves the list only after the server confirms.
//!
//! [`ListView::resolve`] runs a whole commit. Callers that want to keep
//! editing while a request is in flight can split it into
//! [`ListView::decide`], [`Commit::execute`] and [`ListView::reconcile`]; the
//! last settlement to be reconciled wins.

use tracing::{error, info, warn};

use crate::client::ResourceClient;
use crate::error::{ApiError, SessionError};
use crate::field::{EditableField, FieldValue};
use crate::gate::{ConfirmationGate, Decision, GateTicket, Prompt};
use crate::resource::Resource;
use crate::session::{EditSession, PendingAction};

/// Decision taken on a pending action, before any network traffic.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit<F> {
    Rejected {
        target_id: String,
    },
    /// Already applied to the list; `previous` restores it on failure.
    Update {
        target_id: String,
        field: F,
        value: FieldValue,
        previous: FieldValue,
    },
    Delete {
        target_id: String,
    },
}

/// A commit together with the server's answer.
#[derive(Debug)]
pub enum Settlement<R: Resource> {
    Rejected {
        target_id: String,
    },
    Update {
        target_id: String,
        field: R::Field,
        value: FieldValue,
        previous: FieldValue,
        result: Result<R, ApiError>,
    },
    Delete {
        target_id: String,
        result: Result<(), ApiError>,
    },
}

#[derive(Debug)]
pub enum CommitOutcome<F> {
    Rejected { target_id: String },
    Updated { target_id: String, field: F },
    /// The update failed and the displayed value was restored.
    RolledBack { target_id: String, field: F, error: ApiError },
    Deleted { target_id: String },
    DeleteFailed { target_id: String, error: ApiError },
}

impl<F: EditableField> Commit<F> {
    /// Sends the single request this commit needs. Never retries.
    pub async fn execute<R, C>(self, client: &C) -> Settlement<R>
    where
        R: Resource<Field = F>,
        C: ResourceClient<R> + ?Sized,
    {
        match self {
            Commit::Rejected { target_id } => Settlement::Rejected { target_id },
            Commit::Update {
                target_id,
                field,
                value,
                previous,
            } => {
                let result = client.update_field(&target_id, field, &value).await;
                Settlement::Update {
                    target_id,
                    field,
                    value,
                    previous,
                    result,
                }
            }
            Commit::Delete { target_id } => {
                let result = client.remove(&target_id).await;
                Settlement::Delete { target_id, result }
            }
        }
    }
}

pub struct ListView<R: Resource, C> {
    client: C,
    items: Vec<R>,
    session: EditSession<R::Field>,
    gate: ConfirmationGate,
}

impl<R, C> ListView<R, C>
where
    R: Resource,
    C: ResourceClient<R>,
{
    pub fn new(client: C) -> Self {
        Self::with_items(client, Vec::new())
    }

    pub fn with_items(client: C, items: Vec<R>) -> Self {
        Self {
            client,
            items,
            session: EditSession::new(),
            gate: ConfirmationGate::new(),
        }
    }

    // ---- Reads ----

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn session(&self) -> &EditSession<R::Field> {
        &self.session
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    // ---- Loading ----

    /// Fetches the whole collection. On failure the current list is kept.
    pub async fn load(&mut self) -> Result<usize, ApiError> {
        match self.client.list_all().await {
            Ok(items) => {
                info!("🔄 Loaded {} {} into list view", items.len(), R::COLLECTION);
                self.items = items;
                Ok(self.items.len())
            }
            Err(e) => {
                error!("❌ Error fetching {}: {}", R::COLLECTION, e);
                Err(e)
            }
        }
    }

    // ---- Editing ----

    /// Starts editing and returns the seeded editor text.
    pub fn begin_edit(&mut self, id: &str, field: R::Field) -> Result<String, SessionError> {
        let current = self.current_value(id, field)?;
        self.session.begin_edit(id, field, &current)?;
        Ok(current.edit_text())
    }

    pub fn change_draft(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.session.change_draft(text)
    }

    pub fn focus_lost_outside(&mut self) -> bool {
        self.session.focus_lost_outside()
    }

    /// Enter pressed or editor blurred: validates the draft and opens the gate.
    pub fn request_commit(&mut self) -> Result<GateTicket, SessionError> {
        let (target_id, field) = match self.session.draft() {
            Some(draft) => (draft.target_id.clone(), draft.field),
            None => {
                return Err(SessionError::InvalidTransition {
                    state: self.session.state().name(),
                    event: "commit",
                })
            }
        };
        let current = self.current_value(&target_id, field)?;
        let action = self.session.request_commit(&current)?;
        self.open_gate(&action)
    }

    pub fn request_delete(&mut self, id: &str) -> Result<GateTicket, SessionError> {
        if self.find(id).is_none() {
            return Err(SessionError::UnknownTarget(id.to_string()));
        }
        let action = self.session.request_delete(id)?;
        self.open_gate(&action)
    }

    // ---- Committing ----

    /// Closes the gate and applies the decision locally. An approved update
    /// is visible in [`items`](Self::items) as soon as this returns.
    pub fn decide(
        &mut self,
        ticket: GateTicket,
        decision: Option<Decision>,
    ) -> Result<Commit<R::Field>, SessionError> {
        let decision = self.gate.resolve(ticket, decision)?;

        if decision == Decision::Reject {
            let action = self.session.reject()?;
            info!("↩️ Discarded: {}", action.describe());
            return Ok(Commit::Rejected {
                target_id: action.target_id().to_string(),
            });
        }

        match self.session.approve()? {
            PendingAction::Update {
                target_id,
                field,
                value,
            } => {
                let item = self
                    .items
                    .iter_mut()
                    .find(|item| item.id() == target_id)
                    .ok_or_else(|| SessionError::UnknownTarget(target_id.clone()))?;
                let previous = item.field_value(field);
                item.set_field(field, value.clone())?;

                Ok(Commit::Update {
                    target_id,
                    field,
                    value,
                    previous,
                })
            }
            PendingAction::Delete { target_id } => Ok(Commit::Delete { target_id }),
        }
    }

    /// Folds a server answer back into the list.
    pub fn reconcile(&mut self, settlement: Settlement<R>) -> CommitOutcome<R::Field> {
        match settlement {
            Settlement::Rejected { target_id } => CommitOutcome::Rejected { target_id },
            Settlement::Update {
                target_id,
                field,
                result: Ok(stored),
                ..
            } => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id() == target_id) {
                    *item = stored;
                }
                info!("✅ Updated {}.{}", target_id, field);
                CommitOutcome::Updated { target_id, field }
            }
            Settlement::Update {
                target_id,
                field,
                value,
                previous,
                result: Err(error),
            } => {
                error!("❌ Error updating {}.{}: {}", target_id, field, error);
                self.roll_back(&target_id, field, &value, previous);
                CommitOutcome::RolledBack {
                    target_id,
                    field,
                    error,
                }
            }
            Settlement::Delete {
                target_id,
                result: Ok(()),
            } => {
                self.items.retain(|item| item.id() != target_id);
                info!("🗑️ Deleted {}", target_id);
                CommitOutcome::Deleted { target_id }
            }
            Settlement::Delete {
                target_id,
                result: Err(error),
            } => {
                error!("❌ Error deleting {}: {}", target_id, error);
                CommitOutcome::DeleteFailed { target_id, error }
            }
        }
    }

    pub async fn resolve(
        &mut self,
        ticket: GateTicket,
        decision: Option<Decision>,
    ) -> Result<CommitOutcome<R::Field>, SessionError> {
        let commit = self.decide(ticket, decision)?;
        let settlement = commit.execute::<R, C>(&self.client).await;
        Ok(self.reconcile(settlement))
    }

    /// Asks `prompt` about the open gate and resolves with its answer.
    pub async fn confirm_with<P>(
        &mut self,
        ticket: GateTicket,
        prompt: &mut P,
    ) -> Result<CommitOutcome<R::Field>, SessionError>
    where
        P: Prompt + ?Sized,
    {
        let message = self.gate.message().unwrap_or_default().to_string();
        let decision = prompt.ask(&message).await;
        self.resolve(ticket, decision).await
    }

    // ---- Internals ----

    fn current_value(&self, id: &str, field: R::Field) -> Result<FieldValue, SessionError> {
        self.find(id)
            .map(|item| item.field_value(field))
            .ok_or_else(|| SessionError::UnknownTarget(id.to_string()))
    }

    fn open_gate(&mut self, action: &PendingAction<R::Field>) -> Result<GateTicket, SessionError> {
        match self.gate.show(action.describe()) {
            Ok(ticket) => Ok(ticket),
            Err(e) => {
                // keep session and gate in step
                let _ = self.session.reject();
                Err(e.into())
            }
        }
    }

    /// Restores `previous` unless a later edit already replaced `optimistic`.
    fn roll_back(&mut self, target_id: &str, field: R::Field, optimistic: &FieldValue, previous: FieldValue) {
        let Some(item) = self.items.iter_mut().find(|item| item.id() == target_id) else {
            return;
        };
        if item.field_value(field) != *optimistic {
            warn!(
                "⚠️ {}.{} changed since the failed update, keeping the newer value",
                target_id, field
            );
            return;
        }
        if let Err(e) = item.set_field(field, previous) {
            error!("❌ Could not restore {}.{}: {}", target_id, field, e);
        }
    }
}
