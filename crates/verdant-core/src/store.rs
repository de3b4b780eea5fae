//! The canonical in-memory plot array and session progress.
//!
//! [`PlotStateStore`] is the single owner of local optimistic state: the
//! fixed-size plot collection, the player's [`GameProgress`], and the
//! at-most-one outstanding [`TransactionIntent`] gate. All mutation flows
//! through the session reducer, which serializes the four triggers
//! (scheduler tick, user action, executor callback, ledger refresh).

use rust_decimal::Decimal;

use verdant_types::{
    FarmId, GameProgress, IntentId, IntentKind, Plot, SeedKind, TransactionIntent,
};

use crate::error::GameError;

// ---------------------------------------------------------------------------
// PendingIntent
// ---------------------------------------------------------------------------

/// Plant parameters staged with a submitted stake intent.
///
/// The plot itself is not touched until the executor confirms; these are
/// the values the confirmation applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPlant {
    /// The token variety being planted.
    pub seed: SeedKind,
    /// Validated stake amount in display precision.
    pub amount: Decimal,
    /// Submission time, used as the plant time on confirmation.
    pub submitted_ms: i64,
}

/// Bookkeeping for the single outstanding transaction intent.
///
/// `snapshot` is the targeted plot exactly as it was before the intent was
/// begun; on executor failure the plot is restored from it, allowing a
/// clean retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingIntent {
    /// Identifier of the outstanding intent.
    pub intent_id: IntentId,
    /// What kind of action is in flight.
    pub kind: IntentKind,
    /// The plot the action targets.
    pub plot_index: usize,
    /// Pre-intent copy of the targeted plot.
    pub snapshot: Plot,
    /// Staged plant parameters, present for stake intents only.
    pub plant: Option<PendingPlant>,
}

// ---------------------------------------------------------------------------
// PlotStateStore
// ---------------------------------------------------------------------------

/// Canonical holder of the local plot array and game progress.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStateStore {
    plots: Vec<Plot>,
    progress: GameProgress,
    pending: Option<PendingIntent>,
}

impl PlotStateStore {
    /// Create a store with `plot_count` empty plots and starting progress.
    pub fn new(plot_count: usize, starting_tokens: Decimal) -> Self {
        Self {
            plots: vec![Plot::empty(); plot_count],
            progress: GameProgress::starting(starting_tokens),
            pending: None,
        }
    }

    /// Number of plots.
    pub fn plot_count(&self) -> usize {
        self.plots.len()
    }

    /// Read-only view of all plots.
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    /// Mutable view of all plots, for the growth scheduler pass.
    pub fn plots_mut(&mut self) -> &mut [Plot] {
        &mut self.plots
    }

    /// Access a plot by index.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlotOutOfRange`] for an invalid index.
    pub fn plot(&self, index: usize) -> Result<&Plot, GameError> {
        self.plots.get(index).ok_or(GameError::PlotOutOfRange {
            plot: index,
            plot_count: self.plots.len(),
        })
    }

    /// Mutable access to a plot by index.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlotOutOfRange`] for an invalid index.
    pub fn plot_mut(&mut self, index: usize) -> Result<&mut Plot, GameError> {
        let plot_count = self.plots.len();
        self.plots.get_mut(index).ok_or(GameError::PlotOutOfRange {
            plot: index,
            plot_count,
        })
    }

    /// The player's progression state.
    pub const fn progress(&self) -> &GameProgress {
        &self.progress
    }

    /// Mutable progression state, for the reward engine and hydration.
    pub const fn progress_mut(&mut self) -> &mut GameProgress {
        &mut self.progress
    }

    // -----------------------------------------------------------------------
    // Pending-intent gate
    // -----------------------------------------------------------------------

    /// The outstanding intent, if any.
    pub const fn pending(&self) -> Option<&PendingIntent> {
        self.pending.as_ref()
    }

    /// Index of the plot frozen by an outstanding intent, if any. The
    /// growth scheduler must not touch this plot's derived fields.
    pub fn frozen_plot(&self) -> Option<usize> {
        self.pending.as_ref().map(|p| p.plot_index)
    }

    /// Register `intent` as the single outstanding submission, capturing a
    /// pre-intent snapshot of its plot. Stake intents carry their staged
    /// plant parameters in `plant`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IntentPending`] if another intent is already
    /// outstanding -- the request is rejected, not queued -- or
    /// [`GameError::PlotOutOfRange`] for an invalid target.
    pub fn begin_intent(
        &mut self,
        intent: &TransactionIntent,
        plant: Option<PendingPlant>,
    ) -> Result<(), GameError> {
        if self.pending.is_some() {
            return Err(GameError::IntentPending);
        }
        let snapshot = self.plot(intent.plot_index)?.clone();
        self.pending = Some(PendingIntent {
            intent_id: intent.id,
            kind: intent.kind,
            plot_index: intent.plot_index,
            snapshot,
            plant,
        });
        Ok(())
    }

    /// Take the outstanding intent if its id matches `intent_id`.
    ///
    /// Returns `None` (and leaves state untouched) for a stale or unknown
    /// id -- the executor callback is assumed at-most-once, so a mismatch
    /// is ignored rather than acted on.
    pub fn complete_intent(&mut self, intent_id: IntentId) -> Option<PendingIntent> {
        if self.pending.as_ref().is_some_and(|p| p.intent_id == intent_id) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Restore the pre-intent snapshot for a failed intent and clear the
    /// gate. Returns the cleared bookkeeping, or `None` for a stale id.
    pub fn revert_intent(&mut self, intent_id: IntentId) -> Option<PendingIntent> {
        let pending = self.complete_intent(intent_id)?;
        if let Some(plot) = self.plots.get_mut(pending.plot_index) {
            *plot = pending.snapshot.clone();
        }
        Some(pending)
    }

    // -----------------------------------------------------------------------
    // Farm correlation
    // -----------------------------------------------------------------------

    /// Find the plot currently holding `farm_id`.
    pub fn find_by_farm_id(&self, farm_id: FarmId) -> Option<usize> {
        self.plots.iter().position(|p| p.farm_id == Some(farm_id))
    }

    /// First planted plot still awaiting its correlation key -- a freshly
    /// confirmed stake whose ledger farm has just appeared. The plot with
    /// an intent in flight is never offered for adoption.
    pub fn first_uncorrelated_planted(&self) -> Option<usize> {
        let frozen = self.frozen_plot();
        self.plots
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != frozen)
            .find(|(_, p)| p.planted && !p.harvested && p.farm_id.is_none())
            .map(|(index, _)| index)
    }

    /// First slot with nothing planted and no correlation key, used for
    /// positional hydration of ledger farms. Skips the frozen plot: a
    /// submitted stake holds its slot even though nothing is planted yet.
    pub fn first_free_slot(&self) -> Option<usize> {
        let frozen = self.frozen_plot();
        self.plots
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != frozen)
            .find(|(_, p)| !p.planted && p.farm_id.is_none())
            .map(|(index, _)| index)
    }

    /// Assign `farm_id` to the plot at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DuplicateFarmId`] if another plot already
    /// holds the key -- a correlation key is never shared between two
    /// simultaneously active plots -- or [`GameError::PlotOutOfRange`]
    /// for an invalid index.
    pub fn assign_farm_id(&mut self, index: usize, farm_id: FarmId) -> Result<(), GameError> {
        if let Some(holder) = self.find_by_farm_id(farm_id)
            && holder != index
        {
            return Err(GameError::DuplicateFarmId {
                farm_id: farm_id.into_inner(),
                plot: holder,
            });
        }
        self.plot_mut(index)?.farm_id = Some(farm_id);
        Ok(())
    }
}
