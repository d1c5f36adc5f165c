//! Session worker that owns the shared ledger and every local view.
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), drives the
//! accept pipeline for submitted actions, and publishes topic events. All
//! ledger and view mutation happens on this task; commands are processed
//! strictly one at a time, so at most one transition is ever in flight.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use game_core::{
    Action, ActionKind, GameConfig, GlobalLedger, LocalView, Phase, PlayerId, Role, TurnMachine,
    validate_action,
};
use zk::{BackendHandle, ProofError, TransitionProof, verify_continuity};

use crate::api::{ConsumeReport, Result, RuntimeError, TransitionReceipt};
use crate::commitment::SessionSetup;
use crate::engine::{ConsumeError, consume, prove_transition};
use crate::events::{Event, EventBus, LedgerEvent, ProofEvent, TurnEvent};

/// Commands that can be sent to the session worker.
pub enum Command {
    /// Submit an action for the scheduled player and wait for the full
    /// accept/reject outcome.
    SubmitAction {
        action: Action,
        reply: oneshot::Sender<Result<TransitionReceipt>>,
    },
    /// Query a snapshot of the shared ledger (read-only).
    QueryLedger {
        reply: oneshot::Sender<GlobalLedger>,
    },
    /// Query the current turn phase.
    QueryPhase { reply: oneshot::Sender<Phase> },
    /// Query one player's local view.
    QueryView {
        player: PlayerId,
        reply: oneshot::Sender<Option<LocalView>>,
    },
}

/// Background task that processes session commands.
pub struct SessionWorker {
    config: GameConfig,
    backend: BackendHandle,
    ledger: GlobalLedger,
    views: Vec<LocalView>,
    roles: Vec<Role>,
    turn: TurnMachine,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SessionWorker {
    pub fn new(
        config: GameConfig,
        backend: BackendHandle,
        setup: SessionSetup,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        // A ledger/view count mismatch is a structural breach; nothing
        // downstream can recover from it.
        assert_eq!(
            setup.ledger.player_count(),
            setup.views.len(),
            "ledger records and local views must cover the same players"
        );

        let player_count = setup.views.len() as u8;
        Self {
            config,
            backend,
            ledger: setup.ledger,
            views: setup.views,
            roles: setup.roles,
            turn: TurnMachine::new(player_count),
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                else => break,
            }
        }
        debug!(target: "runtime::session", "session worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SubmitAction { action, reply } => {
                let result = self.submit_action(action).await;
                let _ = reply.send(result);
            }
            Command::QueryLedger { reply } => {
                let _ = reply.send(self.ledger.clone());
            }
            Command::QueryPhase { reply } => {
                let _ = reply.send(self.turn.phase());
            }
            Command::QueryView { player, reply } => {
                let _ = reply.send(self.views.get(player.index()).cloned());
            }
        }
    }

    /// Full accept pipeline for one submitted action.
    ///
    /// Order matters: turn gate, then legality, and only then a proof
    /// request. A rejection at any stage leaves the ledger, every view, and
    /// the scheduled actor exactly as they were.
    async fn submit_action(&mut self, action: Action) -> Result<TransitionReceipt> {
        let actor = action.actor();
        let kind = action.kind();
        let (rows, cols) = (self.config.rows, self.config.cols);

        match self.turn.phase() {
            Phase::AwaitingAction { actor: expected } if expected == actor => {}
            Phase::AwaitingAction { .. } => {
                return Err(RuntimeError::Turn(game_core::TurnError::NotPlayersTurn {
                    actor,
                }));
            }
            Phase::ProofInFlight { .. } | Phase::Resolved { .. } => {
                return Err(RuntimeError::Turn(game_core::TurnError::TransitionInFlight));
            }
            Phase::GameOver { .. } => {
                return Err(RuntimeError::Turn(game_core::TurnError::GameOver));
            }
        }

        let view = self
            .views
            .get(actor.index())
            .cloned()
            .ok_or(RuntimeError::InvalidAction(
                game_core::ActionError::UnknownActor(actor),
            ))?;

        if let Err(e) = validate_action(&action, &self.ledger, &view, &self.roles, rows, cols) {
            let err = RuntimeError::InvalidAction(e);
            self.event_bus
                .publish(Event::Ledger(LedgerEvent::TransitionRejected {
                    actor,
                    kind,
                    reason: err.to_string(),
                }));
            return Err(err);
        }

        self.turn.begin(actor).map_err(RuntimeError::Turn)?;
        self.event_bus
            .publish(Event::Proof(ProofEvent::ProofStarted { actor, kind }));

        let prepared =
            match prove_transition(self.backend.clone(), self.ledger.clone(), view, action).await {
                Ok(prepared) => prepared,
                Err(err) => {
                    self.event_bus
                        .publish(Event::Proof(ProofEvent::ProofFailed {
                            actor,
                            kind,
                            error: err.to_string(),
                        }));
                    return Err(self.reject(actor, kind, err));
                }
            };

        // Schema and continuity gates run against the worker's own knowledge
        // of the chain head, never against anything the prover declared.
        let public = prepared.proof.public;
        if let Err(e) = public.validate(
            self.ledger.player_count() as u8,
            self.config.section_count(),
        ) {
            return Err(self.reject(actor, kind, RuntimeError::MalformedInputs(e)));
        }
        if !verify_continuity(self.ledger.head_hash(), &public) {
            let err = RuntimeError::Desync {
                known: self.ledger.head_hash(),
                declared: public.declared_input_hash,
            };
            return Err(self.reject(actor, kind, err));
        }
        if prepared.next_ledger.head_hash() != public.declared_output_hash
            || prepared.next_ledger.hash_chain.len() != self.ledger.hash_chain.len() + 1
        {
            let err = RuntimeError::ProverFailure(ProofError::Execution(
                "declared outputs do not extend the known chain".to_string(),
            ));
            return Err(self.reject(actor, kind, err));
        }

        self.event_bus
            .publish(Event::Proof(ProofEvent::ProofGenerated {
                actor,
                kind,
                generation_time_ms: prepared.generation_time_ms,
            }));

        // The acting player consumes first; the ledger commits only if their
        // own re-verification succeeds.
        let (acting_view, outcome) = consume(
            self.backend.verifier(),
            &prepared.proof,
            self.views[actor.index()].clone(),
            &prepared.next_ledger,
            rows,
            cols,
        );
        if let Err(e) = outcome {
            self.event_bus
                .publish(Event::Turn(TurnEvent::ViewConsumed {
                    player: actor,
                    accepted: false,
                }));
            let err = consume_error(actor, e);
            return Err(self.reject(actor, kind, err));
        }

        let output_hash = public.declared_output_hash;
        self.ledger = prepared.next_ledger;
        self.views[actor.index()] = acting_view;
        self.turn.resolve().map_err(RuntimeError::Turn)?;

        self.event_bus
            .publish(Event::Ledger(LedgerEvent::TransitionAccepted {
                actor,
                kind,
                output_hash,
                chain_len: self.ledger.hash_chain.len() as u64,
            }));
        self.event_bus
            .publish(Event::Turn(TurnEvent::ViewConsumed {
                player: actor,
                accepted: true,
            }));

        let mut reports = self.fan_out(&prepared.proof, actor).await;
        reports.push(ConsumeReport {
            player: actor,
            accepted: true,
            detail: None,
        });
        reports.sort_by_key(|r| r.player);

        let phase = self
            .turn
            .advance(&self.ledger, &self.roles)
            .map_err(RuntimeError::Turn)?;
        match phase {
            Phase::GameOver { winner } => {
                self.event_bus
                    .publish(Event::Turn(TurnEvent::GameOver { winner }));
            }
            Phase::AwaitingAction { actor: next } => {
                self.event_bus
                    .publish(Event::Turn(TurnEvent::TurnAdvanced { next }));
            }
            _ => {}
        }

        Ok(TransitionReceipt {
            proof: prepared.proof,
            output_hash,
            generation_time_ms: prepared.generation_time_ms,
            reports,
            phase,
        })
    }

    /// Fans the committed transition out to every non-acting view.
    ///
    /// Each consumption runs as its own blocking task since verification is
    /// compute-bound. Failures are tolerated per player: the view is kept
    /// unchanged and the failure lands in that player's report.
    async fn fan_out(&mut self, proof: &TransitionProof, actor: PlayerId) -> Vec<ConsumeReport> {
        let (rows, cols) = (self.config.rows, self.config.cols);
        let mut join = JoinSet::new();

        for (i, view) in self.views.iter().enumerate() {
            if i == actor.index() {
                continue;
            }
            let backend = self.backend.clone();
            let proof = proof.clone();
            let next = self.ledger.clone();
            let view = view.clone();
            join.spawn_blocking(move || {
                let (folded, outcome) = consume(backend.verifier(), &proof, view, &next, rows, cols);
                (i, folded, outcome)
            });
        }

        let mut reports = Vec::with_capacity(self.views.len());
        while let Some(joined) = join.join_next().await {
            match joined {
                Ok((i, folded, Ok(()))) => {
                    let player = PlayerId(i as u8);
                    self.views[i] = folded;
                    self.event_bus
                        .publish(Event::Turn(TurnEvent::ViewConsumed {
                            player,
                            accepted: true,
                        }));
                    reports.push(ConsumeReport {
                        player,
                        accepted: true,
                        detail: None,
                    });
                }
                Ok((i, _, Err(err))) => {
                    let player = PlayerId(i as u8);
                    warn!(
                        target: "runtime::session",
                        %player,
                        %err,
                        "view consumption rejected"
                    );
                    self.event_bus
                        .publish(Event::Turn(TurnEvent::ViewConsumed {
                            player,
                            accepted: false,
                        }));
                    reports.push(ConsumeReport {
                        player,
                        accepted: false,
                        detail: Some(err.to_string()),
                    });
                }
                Err(join_err) => {
                    error!(
                        target: "runtime::session",
                        error = %join_err,
                        "view consumption task failed"
                    );
                }
            }
        }
        reports
    }

    /// Routes any post-legality failure: the pending transition is dropped,
    /// the turn returns to the same actor, and the rejection is published.
    fn reject(&mut self, actor: PlayerId, kind: ActionKind, err: RuntimeError) -> RuntimeError {
        if self.turn.abort().is_err() {
            error!(
                target: "runtime::session",
                %actor,
                "turn machine was not in flight during rejection"
            );
        }
        self.event_bus
            .publish(Event::Ledger(LedgerEvent::TransitionRejected {
                actor,
                kind,
                reason: err.to_string(),
            }));
        err
    }
}

fn consume_error(player: PlayerId, err: ConsumeError) -> RuntimeError {
    match err {
        ConsumeError::Desync { known, declared } => RuntimeError::Desync { known, declared },
        ConsumeError::Verification(_) => RuntimeError::VerificationFailure { player },
    }
}
