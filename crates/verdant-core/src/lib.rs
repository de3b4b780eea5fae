//! Game engine for the verdant staking farm.
//!
//! This crate owns everything that decides what happens: plot lifecycle,
//! growth timing, stake validation, stacking, harvest settlement, reward
//! accrual and ledger reconciliation. It is synchronous and side-effect
//! free -- callers (the engine binary) drive it on a tick, feed it
//! commands and ledger snapshots, and carry out the [`session::Effect`]s
//! it returns.
//!
//! The state machine is deliberately single-threaded: one
//! [`session::SessionEngine`] owns one [`store::PlotStateStore`], and all
//! four triggers (tick, command, executor result, ledger refresh) mutate
//! it from the same call site.

pub mod config;
pub mod error;
pub mod growth;
pub mod harvest;
pub mod ports;
pub mod reconcile;
pub mod reward;
pub mod session;
pub mod stack;
pub mod stake;
pub mod store;

pub use config::GameConfig;
pub use error::GameError;
pub use session::{Command, Effect, SessionEngine};
pub use store::PlotStateStore;
