use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_channel::oneshot;

use crate::error::LedgerError;

struct Pending {
    message: String,
    reply: oneshot::Sender<bool>,
}

/// Single-slot yes/no prompt guarding destructive operations.
///
/// [`confirm`](Self::confirm) registers the question and hands back a
/// [`Confirmation`] future; the UI reads [`pending_message`](Self::pending_message),
/// shows its dialog and calls [`answer`](Self::answer). Only one question may
/// be open at a time.
#[derive(Default)]
pub struct ConfirmationGateway {
    pending: Option<Pending>,
}

impl ConfirmationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm(&mut self, message: impl Into<String>) -> Result<Confirmation, LedgerError> {
        if self.is_pending() {
            return Err(LedgerError::ConfirmationBusy);
        }
        let (reply, rx) = oneshot::channel();
        let message = message.into();
        tracing::debug!(question = %message, "confirmation requested");
        self.pending = Some(Pending { message, reply });
        Ok(Confirmation { rx })
    }

    /// Whether a question is open. A question whose future was dropped is
    /// no longer open.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !p.reply.is_canceled())
    }

    pub fn pending_message(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .filter(|p| !p.reply.is_canceled())
            .map(|p| p.message.as_str())
    }

    pub fn answer(&mut self, yes: bool) -> Result<(), LedgerError> {
        let pending = self
            .pending
            .take()
            .filter(|p| !p.reply.is_canceled())
            .ok_or(LedgerError::NoPendingConfirmation)?;
        if pending.reply.send(yes).is_err() {
            tracing::debug!("confirmation answered after its requester went away");
        }
        Ok(())
    }

    /// Close the open question without an answer; its future resolves `false`.
    pub fn dismiss(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

/// Resolves to the user's answer, or `false` if the question was dismissed.
#[must_use = "a confirmation does nothing unless awaited"]
#[derive(Debug)]
pub struct Confirmation {
    rx: oneshot::Receiver<bool>,
}

impl Future for Confirmation {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.rx).poll(cx).map(|answer| answer.unwrap_or(false))
    }
}
