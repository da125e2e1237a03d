//! Edit session state machine shared by the admin list views.
//!
//! ```text
//! Viewing --begin_edit--> Editing --request_commit--> ConfirmPending --approve/reject--> Viewing
//!            Editing --focus_lost_outside--> Viewing
//! Viewing/Editing --request_delete--> ConfirmPending(delete)
//! ```
//!
//! One session exists per list view, so at most one field of one record is
//! ever in edit.

use tracing::debug;

use crate::error::SessionError;
use crate::field::{parse_draft, EditableField, FieldValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Draft<F> {
    pub target_id: String,
    pub field: F,
    pub text: String,
}

/// A mutation waiting behind the confirmation gate.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction<F> {
    Update {
        target_id: String,
        field: F,
        value: FieldValue,
    },
    Delete {
        target_id: String,
    },
}

impl<F: EditableField> PendingAction<F> {
    pub fn target_id(&self) -> &str {
        match self {
            PendingAction::Update { target_id, .. } | PendingAction::Delete { target_id } => target_id,
        }
    }

    /// Question shown by the confirmation gate.
    pub fn describe(&self) -> String {
        match self {
            PendingAction::Update {
                target_id,
                field,
                value,
            } => format!("Set {field} of {target_id} to \"{value}\"?"),
            PendingAction::Delete { target_id } => format!("Delete {target_id}?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditState<F> {
    Viewing,
    Editing(Draft<F>),
    ConfirmPending(PendingAction<F>),
}

impl<F> EditState<F> {
    pub fn name(&self) -> &'static str {
        match self {
            EditState::Viewing => "viewing",
            EditState::Editing(_) => "editing",
            EditState::ConfirmPending(_) => "awaiting confirmation",
        }
    }
}

#[derive(Debug)]
pub struct EditSession<F> {
    state: EditState<F>,
}

impl<F: EditableField> Default for EditSession<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: EditableField> EditSession<F> {
    pub fn new() -> Self {
        Self {
            state: EditState::Viewing,
        }
    }

    pub fn state(&self) -> &EditState<F> {
        &self.state
    }

    pub fn is_viewing(&self) -> bool {
        matches!(self.state, EditState::Viewing)
    }

    pub fn draft(&self) -> Option<&Draft<F>> {
        match &self.state {
            EditState::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingAction<F>> {
        match &self.state {
            EditState::ConfirmPending(action) => Some(action),
            _ => None,
        }
    }

    /// Starts editing `field` of `target_id`, seeding the draft from `current`.
    /// An unsaved draft on another target is dropped.
    pub fn begin_edit(
        &mut self,
        target_id: &str,
        field: F,
        current: &FieldValue,
    ) -> Result<(), SessionError> {
        match &self.state {
            EditState::ConfirmPending(_) => return Err(SessionError::GateOpen),
            EditState::Editing(previous) => {
                debug!(
                    "Discarding unsaved draft for {}.{}",
                    previous.target_id, previous.field
                );
            }
            EditState::Viewing => {}
        }

        self.state = EditState::Editing(Draft {
            target_id: target_id.to_string(),
            field,
            text: current.edit_text(),
        });
        Ok(())
    }

    pub fn change_draft(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        match &mut self.state {
            EditState::Editing(draft) => {
                draft.text = text.into();
                Ok(())
            }
            other => Err(SessionError::InvalidTransition {
                state: other.name(),
                event: "change the draft",
            }),
        }
    }

    /// Parses the draft and moves to `ConfirmPending`. On a parse failure the
    /// session stays in `Editing` with the draft untouched.
    pub fn request_commit(&mut self, current: &FieldValue) -> Result<PendingAction<F>, SessionError> {
        let EditState::Editing(draft) = &self.state else {
            return Err(SessionError::InvalidTransition {
                state: self.state.name(),
                event: "commit",
            });
        };

        let value = parse_draft(draft.field, &draft.text, current)?;
        let action = PendingAction::Update {
            target_id: draft.target_id.clone(),
            field: draft.field,
            value,
        };
        self.state = EditState::ConfirmPending(action.clone());
        Ok(action)
    }

    /// Click outside the editor: drops the draft without committing.
    /// Returns whether a draft was discarded.
    pub fn focus_lost_outside(&mut self) -> bool {
        if let EditState::Editing(draft) = &self.state {
            debug!("Edit of {}.{} abandoned", draft.target_id, draft.field);
            self.state = EditState::Viewing;
            true
        } else {
            false
        }
    }

    pub fn request_delete(&mut self, target_id: &str) -> Result<PendingAction<F>, SessionError> {
        if let EditState::ConfirmPending(_) = self.state {
            return Err(SessionError::GateOpen);
        }
        let action = PendingAction::Delete {
            target_id: target_id.to_string(),
        };
        self.state = EditState::ConfirmPending(action.clone());
        Ok(action)
    }

    pub fn approve(&mut self) -> Result<PendingAction<F>, SessionError> {
        self.close("approve")
    }

    /// Drops the pending action and returns it.
    pub fn reject(&mut self) -> Result<PendingAction<F>, SessionError> {
        self.close("reject")
    }

    fn close(&mut self, event: &'static str) -> Result<PendingAction<F>, SessionError> {
        match std::mem::replace(&mut self.state, EditState::Viewing) {
            EditState::ConfirmPending(action) => Ok(action),
            other => {
                let state = other.name();
                self.state = other;
                Err(SessionError::InvalidTransition { state, event })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::model::ProductField;

    fn sizes() -> FieldValue {
        FieldValue::List(vec!["S".into(), "M".into()])
    }

    #[test]
    fn begin_edit_seeds_the_editable_text() {
        let mut session = EditSession::new();
        session.begin_edit("p1", ProductField::Sizes, &sizes()).unwrap();
        assert_eq!(session.draft().unwrap().text, "S, M");
    }

    #[test]
    fn focus_lost_discards_the_draft() {
        let mut session = EditSession::new();
        session.begin_edit("p1", ProductField::Name, &FieldValue::Text("Shirt".into())).unwrap();
        session.change_draft("Jacket").unwrap();

        assert!(session.focus_lost_outside());
        assert_eq!(session.state(), &EditState::Viewing);
        assert!(!session.focus_lost_outside());
    }

    #[test]
    fn commit_parses_then_waits_for_confirmation() {
        let mut session = EditSession::new();
        session.begin_edit("p1", ProductField::Sizes, &sizes()).unwrap();
        session.change_draft("S, L, XL").unwrap();

        let pending = session.request_commit(&sizes()).unwrap();
        assert_eq!(
            pending,
            PendingAction::Update {
                target_id: "p1".into(),
                field: ProductField::Sizes,
                value: FieldValue::List(vec!["S".into(), "L".into(), "XL".into()]),
            }
        );
        assert_eq!(session.approve().unwrap(), pending);
        assert!(session.is_viewing());
    }

    #[test]
    fn invalid_number_keeps_editing() {
        let current = FieldValue::Number(999.0);
        let mut session = EditSession::new();
        session.begin_edit("p1", ProductField::Mrp, &current).unwrap();
        session.change_draft("12abc").unwrap();

        let err = session.request_commit(&current).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::InvalidNumber { .. })
        ));
        assert_eq!(session.draft().map(|d| d.text.as_str()), Some("12abc"));
    }

    #[test]
    fn switching_target_replaces_the_draft() {
        let mut session = EditSession::new();
        session.begin_edit("p1", ProductField::Name, &FieldValue::Text("Shirt".into())).unwrap();
        session.change_draft("unsaved").unwrap();
        session.begin_edit("p2", ProductField::Variant, &FieldValue::Text("v2".into())).unwrap();

        let draft = session.draft().unwrap();
        assert_eq!(draft.target_id, "p2");
        assert_eq!(draft.text, "v2");
    }

    #[test]
    fn nothing_new_starts_while_confirmation_is_pending() {
        let mut session = EditSession::new();
        session.request_delete("p1").unwrap();

        assert_eq!(
            session.begin_edit("p2", ProductField::Name, &FieldValue::Text(String::new())).unwrap_err(),
            SessionError::GateOpen
        );
        assert_eq!(session.request_delete("p2").unwrap_err(), SessionError::GateOpen);
        assert!(!session.focus_lost_outside());

        let rejected = session.reject().unwrap();
        assert_eq!(rejected, PendingAction::Delete { target_id: "p1".into() });
        assert!(session.is_viewing());
    }

    #[test]
    fn approve_without_pending_action_is_an_error() {
        let mut session: EditSession<ProductField> = EditSession::new();
        assert_eq!(
            session.approve().unwrap_err(),
            SessionError::InvalidTransition { state: "viewing", event: "approve" }
        );
    }
}
