//! Enumeration types for the Verdant farming engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Growth stage
// ---------------------------------------------------------------------------

/// Discrete growth phase of a plot, ordinal 0 through 4.
///
/// Stage 0 is an empty plot; stages 1 through 3 are intermediate growth;
/// stage 4 means the plot is mature and harvestable. The stage is always
/// derived -- either from wall-clock progress or from the ledger's
/// `growth_progress` percentage -- and never stored as independent truth.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum GrowthStage {
    /// Nothing planted.
    #[default]
    Empty,
    /// Freshly planted, below a third of the growth window.
    Sprout,
    /// Between a third and two thirds of the growth window.
    Growing,
    /// Past two thirds, not yet mature.
    Budding,
    /// Fully grown and ready to harvest.
    Mature,
}

impl GrowthStage {
    /// Return the numeric ordinal (0 through 4) for display and wire use.
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Sprout => 1,
            Self::Growing => 2,
            Self::Budding => 3,
            Self::Mature => 4,
        }
    }

    /// Map a numeric ordinal back to a stage. Values above 4 clamp to
    /// [`Self::Mature`] so a ledger quirk can never produce an invalid
    /// local stage.
    pub const fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            0 => Self::Empty,
            1 => Self::Sprout,
            2 => Self::Growing,
            3 => Self::Budding,
            _ => Self::Mature,
        }
    }

    /// Whether this stage represents a harvestable plot.
    pub const fn is_mature(self) -> bool {
        matches!(self, Self::Mature)
    }
}

// ---------------------------------------------------------------------------
// Intent kind
// ---------------------------------------------------------------------------

/// The kind of on-chain action a [`TransactionIntent`] describes.
///
/// [`TransactionIntent`]: crate::intent::TransactionIntent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum IntentKind {
    /// Initial stake into an empty plot.
    Stake,
    /// Additional stake into an already-growing farm.
    StackStake,
    /// Collect a mature farm's reward.
    Harvest,
}

// ---------------------------------------------------------------------------
// Seed kind
// ---------------------------------------------------------------------------

/// The plantable token varieties offered by the selector UI.
///
/// Each variety carries its own growth window and level gate. The growth
/// window seeds the local optimistic timer at plant time; the ledger's own
/// timers overwrite it on the next reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SeedKind {
    /// The foundation token. 30 second growth window.
    Base,
    /// Ethereum's native token. 45 second growth window.
    Eth,
    /// Stable and reliable. 60 second growth window.
    Usdc,
    /// The future is onchain. 90 second growth window.
    Onchain,
}

impl SeedKind {
    /// Growth window in milliseconds for this variety.
    pub const fn growth_ms(self) -> i64 {
        match self {
            Self::Base => 30_000,
            Self::Eth => 45_000,
            Self::Usdc => 60_000,
            Self::Onchain => 90_000,
        }
    }

    /// Minimum player level required to plant this variety.
    pub const fn unlock_level(self) -> u32 {
        match self {
            Self::Base => 1,
            Self::Eth => 3,
            Self::Usdc => 5,
            Self::Onchain => 8,
        }
    }

    /// Display name as shown in the selector.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Base => "BASE",
            Self::Eth => "ETH",
            Self::Usdc => "USDC",
            Self::Onchain => "ONCHAIN",
        }
    }
}

impl core::fmt::Display for SeedKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_ordinals_round_trip() {
        for ordinal in 0..=4_u8 {
            assert_eq!(GrowthStage::from_ordinal(ordinal).ordinal(), ordinal);
        }
    }

    #[test]
    fn stage_out_of_range_clamps_to_mature() {
        assert_eq!(GrowthStage::from_ordinal(9), GrowthStage::Mature);
    }

    #[test]
    fn stage_ordering_follows_growth() {
        assert!(GrowthStage::Empty < GrowthStage::Sprout);
        assert!(GrowthStage::Budding < GrowthStage::Mature);
        assert!(GrowthStage::Mature.is_mature());
        assert!(!GrowthStage::Budding.is_mature());
    }

    #[test]
    fn seed_windows_are_positive_and_gated() {
        for seed in [SeedKind::Base, SeedKind::Eth, SeedKind::Usdc, SeedKind::Onchain] {
            assert!(seed.growth_ms() > 0);
            assert!(seed.unlock_level() >= 1);
        }
        assert_eq!(SeedKind::Base.to_string(), "BASE");
    }
}
