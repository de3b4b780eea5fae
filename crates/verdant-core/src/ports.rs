//! Collaborator contracts: the external services the engine consumes.
//!
//! The core never talks to a wallet, a chain, or a UI directly. Each
//! collaborator is a trait with a stub implementation used by tests and
//! headless runs:
//!
//! - [`SessionProvider`] -- wallet/session connection state.
//! - [`LedgerReader`] -- authoritative farm and user reads.
//! - [`TransactionExecutor`] -- submits built intents; reports success or
//!   failure exactly once per confirmed user action. The core never
//!   retries automatically.
//! - [`NotificationSink`] -- receives plain human-readable strings.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use verdant_types::{FarmId, LedgerFarm, LedgerUser, TransactionIntent};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by a [`LedgerReader`].
///
/// These map to a stale reconciliation: the engine retains its last known
/// good state and surfaces nothing fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ledger read failed: {message}")]
pub struct LedgerReadError {
    /// Description of the read failure.
    pub message: String,
}

// ---------------------------------------------------------------------------
// SessionProvider
// ---------------------------------------------------------------------------

/// Wallet/session connection state.
pub trait SessionProvider {
    /// The connected account address, if any.
    fn current_address(&self) -> Option<String>;

    /// Whether a session is connected.
    fn connected(&self) -> bool {
        self.current_address().is_some()
    }
}

/// A fixed session for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    address: Option<String>,
}

impl StaticSession {
    /// Create a connected session with the given address.
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
        }
    }

    /// Create a disconnected session.
    pub const fn disconnected() -> Self {
        Self { address: None }
    }
}

impl SessionProvider for StaticSession {
    fn current_address(&self) -> Option<String> {
        self.address.clone()
    }
}

// ---------------------------------------------------------------------------
// LedgerReader
// ---------------------------------------------------------------------------

/// Read access to the authoritative ledger.
pub trait LedgerReader {
    /// All farms belonging to `address`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerReadError`] if the ledger cannot be reached; the
    /// caller treats this as a stale (non-fatal) refresh.
    fn user_farms(&self, address: &str) -> Result<Vec<LedgerFarm>, LedgerReadError>;

    /// The per-address user aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerReadError`] on fetch failure.
    fn user_data(&self, address: &str) -> Result<LedgerUser, LedgerReadError>;

    /// Farm ids currently harvestable for `address`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerReadError`] on fetch failure.
    fn harvestable(&self, address: &str) -> Result<BTreeSet<FarmId>, LedgerReadError>;
}

/// A scripted ledger for tests: returns whatever was loaded into it.
#[derive(Debug, Clone, Default)]
pub struct StubLedger {
    /// Farms returned by [`LedgerReader::user_farms`].
    pub farms: Vec<LedgerFarm>,
    /// Aggregate returned by [`LedgerReader::user_data`].
    pub user: LedgerUser,
    /// When set, every read fails with this message.
    pub fail_with: Option<String>,
}

impl StubLedger {
    fn check(&self) -> Result<(), LedgerReadError> {
        if let Some(message) = &self.fail_with {
            return Err(LedgerReadError {
                message: message.clone(),
            });
        }
        Ok(())
    }
}

impl LedgerReader for StubLedger {
    fn user_farms(&self, _address: &str) -> Result<Vec<LedgerFarm>, LedgerReadError> {
        self.check()?;
        Ok(self.farms.clone())
    }

    fn user_data(&self, _address: &str) -> Result<LedgerUser, LedgerReadError> {
        self.check()?;
        Ok(self.user)
    }

    fn harvestable(&self, _address: &str) -> Result<BTreeSet<FarmId>, LedgerReadError> {
        self.check()?;
        Ok(self
            .farms
            .iter()
            .filter(|farm| farm.is_live() && farm.growth_progress >= 100)
            .map(|farm| farm.farm_id)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// TransactionExecutor
// ---------------------------------------------------------------------------

/// Submits a built intent's calls to the chain.
///
/// `execute` is invoked at most once per confirmed user action and its
/// result is the single valid continuation point for that intent -- the
/// engine resumes on it and never retries on its own. The error string is
/// surfaced to the player verbatim.
pub trait TransactionExecutor {
    /// Submit the intent's calls and block until confirmed or failed.
    ///
    /// # Errors
    ///
    /// Returns the executor's opaque failure reason.
    fn execute(&self, intent: &TransactionIntent) -> Result<(), String>;
}

/// A recording executor for tests: captures every submitted intent and
/// answers with a scripted outcome.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    submitted: Arc<Mutex<Vec<TransactionIntent>>>,
    /// When set, every submission fails with this reason.
    pub fail_with: Option<String>,
}

impl RecordingExecutor {
    /// Create an executor that confirms everything.
    pub fn confirming() -> Self {
        Self::default()
    }

    /// Create an executor that rejects everything with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            submitted: Arc::default(),
            fail_with: Some(reason.into()),
        }
    }

    /// The intents submitted so far.
    pub fn submitted(&self) -> Vec<TransactionIntent> {
        self.submitted.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl TransactionExecutor for RecordingExecutor {
    fn execute(&self, intent: &TransactionIntent) -> Result<(), String> {
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(intent.clone());
        }
        if let Some(reason) = &self.fail_with {
            return Err(reason.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NotificationSink
// ---------------------------------------------------------------------------

/// Receives plain human-readable strings. No structure is required.
pub trait NotificationSink {
    /// Deliver one message.
    fn notify(&self, message: &str);
}

/// A sink that collects messages for assertions.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The messages delivered so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_owned());
        }
    }
}

/// A sink that logs messages through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSink;

impl NotificationSink for LoggingSink {
    fn notify(&self, message: &str) {
        tracing::info!(target: "verdant::notify", "{message}");
    }
}

#[cfg(test)]
mod tests {
    use verdant_types::{CallDescriptor, CallPayload, IntentKind};

    use super::*;

    fn farm(farm_id: u64, progress: u8) -> LedgerFarm {
        LedgerFarm {
            farm_id: FarmId(farm_id),
            staked_amount_raw: 1,
            plant_time_s: 0,
            harvest_time_s: 30,
            growth_stage: 1,
            growth_progress: progress,
            active: true,
            harvested: false,
        }
    }

    #[test]
    fn static_session_reports_connection() {
        assert!(StaticSession::connected("0xabc").connected());
        assert!(!StaticSession::disconnected().connected());
    }

    #[test]
    fn stub_ledger_serves_loaded_farms() {
        let ledger = StubLedger {
            farms: vec![farm(1, 50), farm(2, 100)],
            ..StubLedger::default()
        };
        assert_eq!(ledger.user_farms("0xabc").map(|f| f.len()), Ok(2));
        assert_eq!(
            ledger.harvestable("0xabc"),
            Ok(BTreeSet::from([FarmId(2)]))
        );
    }

    #[test]
    fn failing_ledger_surfaces_the_reason() {
        let ledger = StubLedger {
            fail_with: Some("rpc timeout".to_owned()),
            ..StubLedger::default()
        };
        assert_eq!(
            ledger.user_farms("0xabc").err().map(|e| e.message),
            Some("rpc timeout".to_owned())
        );
    }

    #[test]
    fn recording_executor_captures_and_answers() {
        let executor = RecordingExecutor::confirming();
        let intent = TransactionIntent::new(
            IntentKind::Stake,
            0,
            vec![CallDescriptor {
                target: String::new(),
                payload: CallPayload::Stake,
                value_raw: 1,
            }],
        );
        assert_eq!(executor.execute(&intent), Ok(()));
        assert_eq!(executor.submitted().len(), 1);

        let rejecting = RecordingExecutor::rejecting("user rejected");
        assert_eq!(rejecting.execute(&intent), Err("user rejected".to_owned()));
    }

    #[test]
    fn collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        sink.notify("first");
        sink.notify("second");
        assert_eq!(sink.messages(), vec!["first", "second"]);
    }
}
