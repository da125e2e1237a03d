//! Yes/no approval interposed between an edit and its persistence.
//!
//! Showing the gate hands out a [`GateTicket`]. The ticket is consumed when the
//! gate is resolved, so every display ends in exactly one decision. Closing
//! the prompt without answering counts as a rejection.

use async_trait::async_trait;

use crate::error::GateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Proof that a gate was shown. Not `Clone`: it can be resolved once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an open gate must be resolved"]
pub struct GateTicket {
    serial: u64,
}

#[derive(Debug, Default)]
pub struct ConfirmationGate {
    open: Option<(u64, String)>,
    shown: u64,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>) -> Result<GateTicket, GateError> {
        if let Some((_, pending)) = &self.open {
            return Err(GateError::AlreadyOpen(pending.clone()));
        }
        self.shown += 1;
        self.open = Some((self.shown, message.into()));
        Ok(GateTicket { serial: self.shown })
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.open.as_ref().map(|(_, message)| message.as_str())
    }

    /// Closes the gate. `None` means it was dismissed without a decision.
    pub fn resolve(
        &mut self,
        ticket: GateTicket,
        decision: Option<Decision>,
    ) -> Result<Decision, GateError> {
        match &self.open {
            Some((serial, _)) if *serial == ticket.serial => {
                self.open = None;
                Ok(decision.unwrap_or(Decision::Reject))
            }
            _ => Err(GateError::StaleTicket),
        }
    }
}

/// Source of decisions for an open gate.
#[async_trait]
pub trait Prompt: Send {
    /// `None` when the prompt was closed without an answer.
    async fn ask(&mut self, message: &str) -> Option<Decision>;
}

/// Approves everything; used for non-interactive runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

#[async_trait]
impl Prompt for AutoApprove {
    async fn ask(&mut self, _message: &str) -> Option<Decision> {
        Some(Decision::Approve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_show_is_refused_while_open() {
        let mut gate = ConfirmationGate::new();
        let ticket = gate.show("Delete p1?").unwrap();
        assert_eq!(
            gate.show("Delete p2?"),
            Err(GateError::AlreadyOpen("Delete p1?".into()))
        );
        assert_eq!(gate.resolve(ticket, Some(Decision::Approve)), Ok(Decision::Approve));
        assert!(!gate.is_open());
    }

    #[test]
    fn dismissing_counts_as_reject() {
        let mut gate = ConfirmationGate::new();
        let ticket = gate.show("Update?").unwrap();
        assert_eq!(gate.resolve(ticket, None), Ok(Decision::Reject));
    }

    #[test]
    fn tickets_from_earlier_displays_are_stale() {
        let mut gate = ConfirmationGate::new();
        let first = gate.show("one").unwrap();
        gate.resolve(first, None).unwrap();
        let _second = gate.show("two").unwrap();

        let forged = GateTicket { serial: 1 };
        assert_eq!(gate.resolve(forged, Some(Decision::Approve)), Err(GateError::StaleTicket));
        assert_eq!(gate.message(), Some("two"));
    }

    #[test]
    fn auto_approve_always_approves() {
        let decision = tokio_test::block_on(AutoApprove.ask("anything"));
        assert_eq!(decision, Some(Decision::Approve));
    }
}
