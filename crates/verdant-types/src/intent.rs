//! Transaction intents: built, not-yet-executed descriptions of ledger
//! calls.
//!
//! Actions never talk to the chain directly. They produce a
//! [`TransactionIntent`] -- an ordered list of [`CallDescriptor`]s plus
//! bookkeeping -- which the host hands to an external transaction
//! executor. The executor reports success or failure exactly once; only
//! that report mutates plot state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::IntentKind;
use crate::ids::{FarmId, IntentId};

// ---------------------------------------------------------------------------
// Call descriptors
// ---------------------------------------------------------------------------

/// The contract entry point a single call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CallPayload {
    /// `stake()` -- open a new farm; the staked amount rides in `value_raw`.
    Stake,
    /// `stakeInto(farmId)` -- add stake to an existing growing farm.
    StakeInto {
        /// The farm receiving the additional stake.
        farm_id: FarmId,
    },
    /// `harvest(farmId)` -- collect a mature farm.
    Harvest {
        /// The farm being collected.
        farm_id: FarmId,
    },
}

/// One contract call: target address, entry point, and attached value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CallDescriptor {
    /// Contract address the call is sent to.
    pub target: String,
    /// Which entry point, with its arguments.
    pub payload: CallPayload,
    /// Native value attached to the call, in smallest units.
    pub value_raw: u128,
}

// ---------------------------------------------------------------------------
// TransactionIntent
// ---------------------------------------------------------------------------

/// A fully built, pending submission to the transaction executor.
///
/// At most one intent may be outstanding system-wide; the plot store
/// enforces this. Building an intent must not itself mutate any plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TransactionIntent {
    /// Locally minted identifier correlating the executor's callback.
    pub id: IntentId,
    /// What kind of action this intent performs.
    pub kind: IntentKind,
    /// Index of the plot the action targets.
    pub plot_index: usize,
    /// The ordered contract calls to submit.
    pub calls: Vec<CallDescriptor>,
}

impl TransactionIntent {
    /// Build an intent with a fresh [`IntentId`].
    pub fn new(kind: IntentKind, plot_index: usize, calls: Vec<CallDescriptor>) -> Self {
        Self {
            id: IntentId::new(),
            kind,
            plot_index,
            calls,
        }
    }

    /// The farm id referenced by the first call, if the entry point
    /// carries one.
    pub fn farm_id(&self) -> Option<FarmId> {
        self.calls.first().and_then(|call| match call.payload {
            CallPayload::Stake => None,
            CallPayload::StakeInto { farm_id } | CallPayload::Harvest { farm_id } => Some(farm_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stake_call(value_raw: u128) -> CallDescriptor {
        CallDescriptor {
            target: "0x3654cadc3c65a6c0a47bb785eac90e9d21b194a8".to_owned(),
            payload: CallPayload::Stake,
            value_raw,
        }
    }

    #[test]
    fn fresh_intents_get_distinct_ids() {
        let a = TransactionIntent::new(IntentKind::Stake, 0, vec![stake_call(1)]);
        let b = TransactionIntent::new(IntentKind::Stake, 0, vec![stake_call(1)]);
        assert_ne!(a.id, b.id);
        assert_eq!(a.kind, b.kind);
    }

    #[test]
    fn farm_id_extracted_from_harvest_call() {
        let intent = TransactionIntent::new(
            IntentKind::Harvest,
            3,
            vec![CallDescriptor {
                target: String::new(),
                payload: CallPayload::Harvest { farm_id: FarmId(9) },
                value_raw: 0,
            }],
        );
        assert_eq!(intent.farm_id(), Some(FarmId(9)));
    }

    #[test]
    fn plain_stake_has_no_farm_id() {
        let intent = TransactionIntent::new(IntentKind::Stake, 0, vec![stake_call(5)]);
        assert_eq!(intent.farm_id(), None);
    }
}
