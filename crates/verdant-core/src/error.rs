//! Error types for the plot lifecycle engine.
//!
//! Every variant here is recoverable: validation failures build no intent
//! and change no state, transaction failures revert the affected plot to
//! its pre-intent snapshot, and a stale ledger fetch retains the last
//! known good state. Nothing in this enum is fatal to the process.

use verdant_types::SeedKind;

/// Errors surfaced by actions, the store, and reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The proposed stake input is malformed, non-positive, or below the
    /// configured minimum unit.
    #[error("invalid stake amount: {input:?}")]
    InvalidAmount {
        /// The rejected raw input.
        input: String,
    },

    /// Harvest or stack attempted on a plot that is not in the required
    /// readiness state.
    #[error("plot {plot} is not ready to harvest")]
    NotReady {
        /// Index of the offending plot.
        plot: usize,
    },

    /// Stack or harvest attempted on a plot without a ledger correlation
    /// key (or otherwise outside the growing state the action requires).
    #[error("plot {plot} has no ledger farm to act on")]
    NoCorrelation {
        /// Index of the offending plot.
        plot: usize,
    },

    /// Plant attempted on a plot that already holds a stake.
    #[error("plot {plot} is already planted")]
    PlotOccupied {
        /// Index of the offending plot.
        plot: usize,
    },

    /// A plot index outside the configured range.
    #[error("plot index {plot} out of range (plot count {plot_count})")]
    PlotOutOfRange {
        /// The rejected index.
        plot: usize,
        /// The configured number of plots.
        plot_count: usize,
    },

    /// A second stake/harvest was requested while an intent is already
    /// outstanding. At most one intent may be pending system-wide.
    #[error("a transaction intent is already pending")]
    IntentPending,

    /// The seed variety is gated behind a higher player level.
    #[error("{seed} unlocks at level {required_level} (current level {level})")]
    SeedLocked {
        /// The gated variety.
        seed: SeedKind,
        /// The level that unlocks it.
        required_level: u32,
        /// The player's current level.
        level: u32,
    },

    /// A checked amount computation overflowed.
    #[error("stake amount arithmetic overflowed")]
    AmountOverflow,

    /// The same ledger farm id was about to be assigned to two
    /// simultaneously active plots.
    #[error("farm {farm_id} is already assigned to plot {plot}")]
    DuplicateFarmId {
        /// The contested correlation key (raw).
        farm_id: u64,
        /// The plot that already holds it.
        plot: usize,
    },

    /// Opaque failure surfaced by the transaction executor. The message
    /// is passed through verbatim.
    #[error("transaction failed: {message}")]
    Transaction {
        /// The executor's reason, unmodified.
        message: String,
    },

    /// A ledger fetch failed. Not fatal -- the last known good state is
    /// retained and visibly stale until a later fetch succeeds.
    #[error("ledger refresh failed, retaining last known state: {message}")]
    ReconciliationStale {
        /// Description of the fetch failure.
        message: String,
    },
}
