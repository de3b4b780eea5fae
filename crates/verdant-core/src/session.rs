//! The session reducer: single owner of plot state, serializing the four
//! mutation triggers.
//!
//! All state mutation flows through [`SessionEngine`] as discrete events:
//! the periodic growth tick, user commands, the transaction executor's
//! one-shot completion callback, and ledger refreshes. Each handler
//! returns the [`Effect`]s the host must dispatch -- submitting a built
//! intent, emitting a human-readable notification, or scheduling a ledger
//! refresh. The reducer itself performs no I/O.
//!
//! At most one [`TransactionIntent`] is outstanding at a time; a second
//! stake/stack/harvest request is rejected with
//! [`GameError::IntentPending`] rather than queued. While an intent is
//! pending its plot is frozen: the growth tick leaves the plot's derived
//! fields alone so an in-flight harvest cannot race back to "ready", and
//! a ledger refresh neither overwrites the plot nor binds a farm to it.
//! A plant mutates its plot only once the executor confirms the stake;
//! until then the staged parameters ride with the pending intent.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use verdant_types::{
    FarmId, IntentId, IntentKind, LedgerFarm, LedgerUser, SeedKind, TransactionIntent,
};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::reconcile::{self, ReconcileSummary};
use crate::store::{PendingPlant, PlotStateStore};
use crate::{growth, harvest, reward, stack, stake};

// ---------------------------------------------------------------------------
// Commands and effects
// ---------------------------------------------------------------------------

/// A user-initiated action against the farm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Stake into an empty plot.
    Plant {
        /// Target plot index.
        plot: usize,
        /// The token variety to plant.
        seed: SeedKind,
        /// Raw stake amount as entered by the user.
        amount: String,
    },
    /// Add stake to a growing plot.
    Stack {
        /// Target plot index.
        plot: usize,
        /// Raw stake amount as entered by the user.
        amount: String,
    },
    /// Collect a mature plot.
    Harvest {
        /// Target plot index.
        plot: usize,
    },
    /// Close a selection dialog without submitting. Mutates nothing.
    Dismiss,
    /// Request an immediate ledger refresh.
    Refresh,
}

/// An instruction for the host to carry out after a handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the intent to the transaction executor.
    Submit(TransactionIntent),
    /// Deliver a human-readable message to the notification sink.
    Notify(String),
    /// Trigger a ledger refresh soon.
    ScheduleRefresh,
}

// ---------------------------------------------------------------------------
// SessionEngine
// ---------------------------------------------------------------------------

/// The reducer owning all local session state.
#[derive(Debug, Clone)]
pub struct SessionEngine {
    store: PlotStateStore,
    config: GameConfig,
}

impl SessionEngine {
    /// Create a session from configuration: empty plots, starting
    /// progress. Ledger hydration arrives as a regular
    /// [`Self::handle_ledger_update`].
    pub fn new(config: GameConfig) -> Self {
        let store = PlotStateStore::new(config.farm.plot_count, config.farm.starting_tokens);
        Self { store, config }
    }

    /// Read-only view of the owned store.
    pub const fn store(&self) -> &PlotStateStore {
        &self.store
    }

    /// The configuration this session runs with.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Trigger 1: growth tick
    // -----------------------------------------------------------------------

    /// One scheduler pass. The plot with an outstanding intent, if any,
    /// is frozen.
    pub fn handle_tick(&mut self, now_ms: i64) {
        let frozen = self.store.frozen_plot();
        growth::run_tick(self.store.plots_mut(), now_ms, frozen);
    }

    // -----------------------------------------------------------------------
    // Trigger 2: user commands
    // -----------------------------------------------------------------------

    /// Handle a user command at `now_ms`.
    ///
    /// # Errors
    ///
    /// Validation failures return a [`GameError`]; no intent is built and
    /// no state changes in that case.
    pub fn handle_command(
        &mut self,
        command: Command,
        now_ms: i64,
    ) -> Result<Vec<Effect>, GameError> {
        match command {
            Command::Plant { plot, seed, amount } => self.plant(plot, seed, &amount, now_ms),
            Command::Stack { plot, amount } => self.stack(plot, &amount, now_ms),
            Command::Harvest { plot } => self.harvest(plot),
            Command::Dismiss => Ok(Vec::new()),
            Command::Refresh => Ok(vec![Effect::ScheduleRefresh]),
        }
    }

    fn plant(
        &mut self,
        plot_index: usize,
        seed: SeedKind,
        amount: &str,
        now_ms: i64,
    ) -> Result<Vec<Effect>, GameError> {
        if self.store.pending().is_some() {
            return Err(GameError::IntentPending);
        }
        if self.store.plot(plot_index)?.planted {
            return Err(GameError::PlotOccupied { plot: plot_index });
        }
        let level = self.store.progress().level;
        if level < seed.unlock_level() {
            return Err(GameError::SeedLocked {
                seed,
                required_level: seed.unlock_level(),
                level,
            });
        }

        let (intent, validated) = stake::build_stake_intent(amount, plot_index, &self.config)?;
        // The plot stays empty until the executor confirms; the staged
        // parameters ride along with the pending intent.
        self.store.begin_intent(
            &intent,
            Some(PendingPlant {
                seed,
                amount: validated.amount,
                submitted_ms: now_ms,
            }),
        )?;
        Ok(vec![Effect::Submit(intent)])
    }

    fn stack(
        &mut self,
        plot_index: usize,
        amount: &str,
        now_ms: i64,
    ) -> Result<Vec<Effect>, GameError> {
        if self.store.pending().is_some() {
            return Err(GameError::IntentPending);
        }
        let plot = self.store.plot(plot_index)?.clone();
        let (intent, validated) = stack::build_stack_intent(&plot, plot_index, amount, &self.config)?;
        self.store.begin_intent(&intent, None)?;
        // Optimistic stake/timer update; reverted on executor error.
        stack::apply_stack(
            self.store.plot_mut(plot_index)?,
            validated.amount,
            now_ms,
            &self.config,
        )?;
        Ok(vec![Effect::Submit(intent)])
    }

    fn harvest(&mut self, plot_index: usize) -> Result<Vec<Effect>, GameError> {
        if self.store.pending().is_some() {
            return Err(GameError::IntentPending);
        }
        let plot = self.store.plot(plot_index)?.clone();
        let intent = harvest::build_harvest_intent(&plot, plot_index, &self.config)?;
        // No optimistic mutation for harvest; the plot resets only on
        // confirmed success. The pending gate freezes its derived fields.
        self.store.begin_intent(&intent, None)?;
        Ok(vec![Effect::Submit(intent)])
    }

    // -----------------------------------------------------------------------
    // Trigger 3: executor completion (one-shot)
    // -----------------------------------------------------------------------

    /// The executor confirmed the intent. Settles the action and
    /// schedules a reconciling refresh.
    pub fn handle_executor_success(&mut self, intent_id: IntentId) -> Vec<Effect> {
        let Some(pending) = self.store.complete_intent(intent_id) else {
            warn!(%intent_id, "ignoring completion for unknown or stale intent");
            return Vec::new();
        };

        let mut effects = Vec::new();
        match pending.kind {
            IntentKind::Stake => {
                // The staged plant lands now that the stake is confirmed.
                if let Some(plant) = &pending.plant
                    && let Ok(plot) = self.store.plot_mut(pending.plot_index)
                {
                    stake::apply_plant(plot, plant.seed, plant.amount, plant.submitted_ms);
                }
                reward::credit_xp(self.store.progress_mut(), self.config.rewards.plant_xp);
                let seed = pending
                    .plant
                    .as_ref()
                    .map_or("Seed", |p| p.seed.display_name());
                effects.push(Effect::Notify(format!("{seed} planted! 🌱")));
            }
            IntentKind::StackStake => {
                let total = self
                    .store
                    .plot(pending.plot_index)
                    .map(|p| p.stake_amount)
                    .unwrap_or_default();
                let added = total
                    .checked_sub(pending.snapshot.stake_amount)
                    .unwrap_or_default();
                effects.push(Effect::Notify(format!(
                    "+{added} stacked! Total: {total} 💎"
                )));
            }
            IntentKind::Harvest => match self.settle_harvest(pending.plot_index) {
                Ok(mut settled) => effects.append(&mut settled),
                Err(error) => {
                    warn!(%error, "harvest settlement failed");
                    effects.push(Effect::Notify(error.to_string()));
                }
            },
        }
        effects.push(Effect::ScheduleRefresh);
        effects
    }

    fn settle_harvest(&mut self, plot_index: usize) -> Result<Vec<Effect>, GameError> {
        let Self { store, config } = self;
        // Settlement needs the plot and progress together; work on a copy
        // of progress and commit it once the settlement succeeds.
        let mut progress = store.progress().clone();
        let outcome = harvest::settle_harvest(store.plot_mut(plot_index)?, &mut progress, config)?;
        *store.progress_mut() = progress;

        let mut effects = vec![Effect::Notify(format!(
            "Harvested {} 💎 +{} XP!",
            outcome.token_reward, outcome.xp_reward
        ))];
        if let Some(level) = outcome.new_level {
            effects.push(Effect::Notify(format!(
                "Level {level}! +{}💎 bonus!",
                config.rewards.level_bonus_tokens
            )));
        }
        Ok(effects)
    }

    /// The executor reported failure. The pending intent is cleared, the
    /// plot reverts to its pre-intent snapshot, and the reason is passed
    /// through verbatim.
    pub fn handle_executor_error(&mut self, intent_id: IntentId, message: &str) -> Vec<Effect> {
        let error = GameError::Transaction {
            message: message.to_owned(),
        };
        if self.store.revert_intent(intent_id).is_none() {
            warn!(%intent_id, "ignoring failure for unknown or stale intent");
            return Vec::new();
        }
        warn!(%intent_id, %error, "intent failed, plot reverted");
        vec![Effect::Notify(message.to_owned())]
    }

    // -----------------------------------------------------------------------
    // Trigger 4: ledger refresh
    // -----------------------------------------------------------------------

    /// Merge an authoritative ledger batch into local state. Farms in
    /// `harvestable` are marked ready regardless of reported progress.
    pub fn handle_ledger_update(
        &mut self,
        farms: &[LedgerFarm],
        user: Option<&LedgerUser>,
        harvestable: &BTreeSet<FarmId>,
    ) -> ReconcileSummary {
        let summary = reconcile::reconcile_farms(&mut self.store, farms, harvestable);
        if let Some(user) = user {
            reconcile::reconcile_user(self.store.progress_mut(), user);
        }
        debug!(?summary, "ledger update applied");
        summary
    }

    /// A ledger fetch failed. The last known good state is retained; the
    /// data is visibly stale until a later fetch succeeds.
    pub fn handle_ledger_error(&self, message: &str) {
        let error = GameError::ReconciliationStale {
            message: message.to_owned(),
        };
        warn!(%error, "ledger refresh failed");
    }
}
