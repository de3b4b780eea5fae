//! Type-safe identifier wrappers.
//!
//! Two kinds of identity exist in the engine. Transaction intents are
//! minted locally and use UUID v7 (time-ordered) via the [`define_id!`]
//! macro, matching the rest of the workspace. Farm correlation keys are
//! assigned by the on-chain ledger as plain integers, so [`FarmId`] wraps
//! a `u64` instead of a UUID and is never generated locally.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a locally built transaction intent.
    IntentId
}

/// Correlation key tying a local plot to a ledger farm record.
///
/// The ledger contract assigns these sequentially on stake confirmation.
/// The engine only ever copies them out of ledger reads; it never mints
/// one itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct FarmId(pub u64);

impl FarmId {
    /// Return the raw ledger-assigned key.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for FarmId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "farm#{}", self.0)
    }
}

impl From<u64> for FarmId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<FarmId> for u64 {
    fn from(id: FarmId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_ids_are_unique() {
        let a = IntentId::new();
        let b = IntentId::new();
        assert_ne!(a, b);
        assert_ne!(a.into_inner(), Uuid::nil());
    }

    #[test]
    fn farm_id_round_trips_raw_value() {
        let id = FarmId::from(42_u64);
        assert_eq!(id.into_inner(), 42);
        assert_eq!(u64::from(id), 42);
        assert_eq!(id.to_string(), "farm#42");
    }

    #[test]
    fn farm_id_orders_by_raw_value() {
        assert!(FarmId(1) < FarmId(2));
    }
}
