//! The cooperative event loop driving the session reducer.
//!
//! All session state lives in one [`SessionEngine`] mutated from a single
//! task. Four event sources feed it through one `tokio::select!`:
//!
//! 1. the growth tick interval,
//! 2. the periodic ledger refresh interval,
//! 3. the user command channel,
//! 4. the executor completion channel.
//!
//! Executor submissions run on the blocking pool and report back over the
//! completion channel, so reducer mutation never happens concurrently.
//! Effects returned by the reducer are dispatched here: `Submit` spawns
//! the executor, `Notify` goes to the sink, `ScheduleRefresh` triggers an
//! immediate ledger read.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use verdant_core::growth;
use verdant_core::ports::{LedgerReader, NotificationSink, TransactionExecutor};
use verdant_core::session::{Command, Effect, SessionEngine};
use verdant_types::IntentId;

/// Outcome of one executor submission, fed back into the loop.
#[derive(Debug)]
struct ExecutorOutcome {
    /// The intent this outcome belongs to.
    intent_id: IntentId,
    /// Confirmation, or the executor's failure reason.
    result: Result<(), String>,
}

/// The engine event loop and its collaborators.
pub struct EngineRuntime<L, E, N> {
    engine: SessionEngine,
    address: String,
    ledger: L,
    executor: Arc<E>,
    sink: N,
}

impl<L, E, N> EngineRuntime<L, E, N>
where
    L: LedgerReader,
    E: TransactionExecutor + Send + Sync + 'static,
    N: NotificationSink,
{
    /// Assemble a runtime around a freshly constructed session.
    pub fn new(engine: SessionEngine, address: String, ledger: L, executor: E, sink: N) -> Self {
        Self {
            engine,
            address,
            ledger,
            executor: Arc::new(executor),
            sink,
        }
    }

    /// Read-only view of the session, for tests and shutdown reporting.
    pub const fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    /// One ledger hydration pass, used at startup and on refresh.
    pub fn refresh_ledger(&mut self) {
        let farms = match self.ledger.user_farms(&self.address) {
            Ok(farms) => farms,
            Err(error) => {
                self.engine.handle_ledger_error(&error.message);
                return;
            }
        };
        let user = self
            .ledger
            .user_data(&self.address)
            .map_err(|error| warn!(error = %error, "user aggregate fetch failed, farms only"))
            .ok();
        // The ledger's harvestable set gates readiness during the merge.
        let harvestable = self
            .ledger
            .harvestable(&self.address)
            .map_err(|error| warn!(error = %error, "harvestable fetch failed, progress only"))
            .unwrap_or_default();
        debug!(count = harvestable.len(), "harvestable farms reported");
        let summary = self
            .engine
            .handle_ledger_update(&farms, user.as_ref(), &harvestable);
        info!(
            matched = summary.matched,
            hydrated = summary.hydrated,
            skipped = summary.skipped,
            "ledger refresh applied"
        );
    }

    /// Run the loop until the command channel closes.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> SessionEngine {
        let tick_interval_ms = self.engine.config().growth.tick_interval_ms;
        let refresh_interval_ms = self.engine.config().ledger.refresh_interval_ms;

        let (completion_tx, mut completions) = mpsc::unbounded_channel::<ExecutorOutcome>();

        let mut tick = tokio::time::interval(Duration::from_millis(tick_interval_ms));
        let mut refresh = tokio::time::interval(Duration::from_millis(refresh_interval_ms));
        // The first interval fire is immediate; hydration already happened.
        tick.tick().await;
        refresh.tick().await;

        info!(
            tick_interval_ms,
            refresh_interval_ms,
            address = self.address,
            "event loop starting"
        );

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.engine.handle_tick(growth::now_ms());
                }
                _ = refresh.tick() => {
                    self.refresh_ledger();
                }
                Some(outcome) = completions.recv() => {
                    let effects = match outcome.result {
                        Ok(()) => self.engine.handle_executor_success(outcome.intent_id),
                        Err(reason) => {
                            self.engine.handle_executor_error(outcome.intent_id, &reason)
                        }
                    };
                    self.dispatch(effects, &completion_tx);
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        info!("command channel closed, shutting down");
                        break;
                    };
                    match self.engine.handle_command(command, growth::now_ms()) {
                        Ok(effects) => self.dispatch(effects, &completion_tx),
                        Err(error) => self.sink.notify(&error.to_string()),
                    }
                }
            }
        }

        self.engine
    }

    /// Carry out the effects one handler pass produced.
    fn dispatch(
        &mut self,
        effects: Vec<Effect>,
        completion_tx: &mpsc::UnboundedSender<ExecutorOutcome>,
    ) {
        for effect in effects {
            match effect {
                Effect::Submit(intent) => {
                    let executor = Arc::clone(&self.executor);
                    let tx = completion_tx.clone();
                    let intent_id = intent.id;
                    debug!(%intent_id, kind = ?intent.kind, "submitting intent");
                    tokio::task::spawn_blocking(move || {
                        let result = executor.execute(&intent);
                        if tx.send(ExecutorOutcome { intent_id, result }).is_err() {
                            warn!(%intent_id, "loop gone before completion delivery");
                        }
                    });
                }
                Effect::Notify(message) => self.sink.notify(&message),
                Effect::ScheduleRefresh => self.refresh_ledger(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use verdant_core::GameConfig;
    use verdant_core::ports::{CollectingSink, RecordingExecutor, StubLedger};

    use super::*;

    fn runtime() -> EngineRuntime<StubLedger, RecordingExecutor, CollectingSink> {
        EngineRuntime::new(
            SessionEngine::new(GameConfig::default()),
            "0xabc".to_owned(),
            StubLedger::default(),
            RecordingExecutor::confirming(),
            CollectingSink::new(),
        )
    }

    #[tokio::test]
    async fn loop_exits_when_command_channel_closes() {
        let (tx, rx) = mpsc::channel(8);
        drop(tx);
        let engine = runtime().run(rx).await;
        assert_eq!(engine.store().plots().len(), 12);
    }

    #[tokio::test]
    async fn invalid_command_goes_to_the_sink() {
        let sink = CollectingSink::new();
        let rt = EngineRuntime::new(
            SessionEngine::new(GameConfig::default()),
            "0xabc".to_owned(),
            StubLedger::default(),
            RecordingExecutor::confirming(),
            sink.clone(),
        );
        let (tx, rx) = mpsc::channel(8);
        let send = tx
            .send(Command::Harvest { plot: 0 })
            .await;
        assert!(send.is_ok());
        drop(tx);
        rt.run(rx).await;
        assert_eq!(sink.messages().len(), 1);
    }
}
