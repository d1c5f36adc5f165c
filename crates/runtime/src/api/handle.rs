//! Cloneable facade for issuing commands to the session worker.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting actions and streaming events from specific topics.

use std::collections::BTreeSet;

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{Action, GlobalLedger, LocalView, Phase, PlayerId, SectionId};

use super::errors::{Result, RuntimeError};
use super::outcome::TransitionReceipt;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with a running session.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Requests a move into a section inside the actor's visibility window.
    pub async fn request_move(
        &self,
        actor: PlayerId,
        target: SectionId,
    ) -> Result<TransitionReceipt> {
        self.submit(Action::Move { actor, target }).await
    }

    /// Requests an imposter elimination of a visible player.
    pub async fn request_elimination(
        &self,
        actor: PlayerId,
        target: PlayerId,
    ) -> Result<TransitionReceipt> {
        self.submit(Action::Eliminate { actor, target }).await
    }

    /// Casts a ballot against another alive player.
    pub async fn request_vote(
        &self,
        actor: PlayerId,
        ballot: PlayerId,
    ) -> Result<TransitionReceipt> {
        self.submit(Action::Vote { actor, ballot }).await
    }

    /// Submits an arbitrary action on the actor's behalf and waits for the
    /// full accept/reject outcome.
    pub async fn submit(&self, action: Action) -> Result<TransitionReceipt> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::SubmitAction {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Queries a snapshot of the shared ledger.
    pub async fn query_ledger(&self) -> Result<GlobalLedger> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryLedger { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Queries the current turn phase.
    pub async fn query_phase(&self) -> Result<Phase> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryPhase { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Queries a snapshot of one player's local view, `None` for an unknown
    /// player index.
    pub async fn query_view(&self, player: PlayerId) -> Result<Option<LocalView>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryView {
                player,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Returns the set of sections a player may currently perceive or act
    /// upon, `None` for an unknown player index.
    pub async fn current_visibility(
        &self,
        player: PlayerId,
    ) -> Result<Option<BTreeSet<SectionId>>> {
        Ok(self.query_view(player).await?.map(|view| view.visible))
    }

    /// Subscribes to events from a specific topic.
    ///
    /// - [`Topic::Ledger`] - accepted and rejected transitions
    /// - [`Topic::Proof`] - proof generation lifecycle
    /// - [`Topic::Turn`] - view consumption, scheduling, game over
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
