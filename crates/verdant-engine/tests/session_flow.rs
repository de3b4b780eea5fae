//! End-to-end session flow over the stub collaborators.
//!
//! Drives a full plant → grow → harvest → reconcile cycle through the
//! reducer exactly the way the event loop does: commands produce
//! `Submit` effects, the executor answers, and completions settle the
//! action. No chain, no clock, no channels.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use verdant_core::GameConfig;
use verdant_core::ports::{
    CollectingSink, NotificationSink, RecordingExecutor, TransactionExecutor,
};
use verdant_core::session::{Command, Effect, SessionEngine};
use verdant_types::{FarmId, LedgerFarm, SeedKind, TransactionIntent};

/// 5 tokens at 18 decimals.
const RAW_FIVE: u128 = 5_000_000_000_000_000_000;

fn pull_submit(effects: &[Effect]) -> TransactionIntent {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Submit(intent) => Some(intent.clone()),
            _ => None,
        })
        .unwrap()
}

/// Forward `Notify` effects to the sink, as the runtime does.
fn forward_notifies(sink: &CollectingSink, effects: &[Effect]) {
    for effect in effects {
        if let Effect::Notify(message) = effect {
            sink.notify(message);
        }
    }
}

fn ledger_farm(farm_id: u64, raw: u128, harvest_time_s: i64, progress: u8) -> LedgerFarm {
    LedgerFarm {
        farm_id: FarmId(farm_id),
        staked_amount_raw: raw,
        plant_time_s: 0,
        harvest_time_s,
        growth_stage: 1,
        growth_progress: progress,
        active: true,
        harvested: false,
    }
}

#[test]
fn full_cycle_plant_grow_harvest_reconcile() {
    let mut engine = SessionEngine::new(GameConfig::default());
    let executor = RecordingExecutor::confirming();
    let sink = CollectingSink::new();

    // Plant 5 tokens of BASE into plot 0 at t = 0.
    let effects = engine
        .handle_command(
            Command::Plant {
                plot: 0,
                seed: SeedKind::Base,
                amount: "5".to_owned(),
            },
            0,
        )
        .unwrap();
    let intent = pull_submit(&effects);
    // Nothing lands on the plot until the executor confirms.
    assert!(!engine.store().plot(0).unwrap().planted);
    executor.execute(&intent).unwrap();
    let confirmed = engine.handle_executor_success(intent.id);
    forward_notifies(&sink, &confirmed);
    assert!(confirmed.contains(&Effect::ScheduleRefresh));
    assert!(engine.store().plot(0).unwrap().planted);
    assert_eq!(engine.store().progress().experience, 10);

    // The refresh brings the ledger's record of the new farm. The
    // freshly planted plot adopts the correlation key.
    let farms = vec![ledger_farm(7, RAW_FIVE, 30, 10)];
    let summary = engine.handle_ledger_update(&farms, None, &BTreeSet::new());
    assert_eq!((summary.matched, summary.hydrated), (0, 1));
    let plot = engine.store().plot(0).unwrap();
    assert_eq!(plot.farm_id, Some(FarmId(7)));
    assert!(!plot.ready);

    // Tick past the growth window.
    engine.handle_tick(30_001);
    let plot = engine.store().plot(0).unwrap();
    assert!(plot.ready);

    // Harvest. The intent targets the correlated farm; settlement pays
    // the stake back as reward plus five XP per token.
    let effects = engine
        .handle_command(Command::Harvest { plot: 0 }, 30_001)
        .unwrap();
    let intent = pull_submit(&effects);
    assert_eq!(intent.farm_id(), Some(FarmId(7)));
    executor.execute(&intent).unwrap();
    let settled = engine.handle_executor_success(intent.id);
    forward_notifies(&sink, &settled);

    let progress = engine.store().progress();
    assert_eq!(progress.token_balance, Decimal::from(55));
    assert_eq!(progress.experience, 35);
    assert_eq!(progress.level, 1);
    let plot = engine.store().plot(0).unwrap();
    assert!(!plot.planted);
    assert_eq!(plot.farm_id, None);

    // The next refresh reports the farm as harvested. Dead records are
    // skipped and the reset plot stays empty.
    let mut done = ledger_farm(7, RAW_FIVE, 30, 100);
    done.harvested = true;
    let summary = engine.handle_ledger_update(&[done], None, &BTreeSet::new());
    assert_eq!(summary.skipped, 1);
    assert!(!engine.store().plot(0).unwrap().planted);

    let messages = sink.messages();
    assert!(messages.iter().any(|m| m.contains("planted")));
    assert!(messages.iter().any(|m| m.contains("Harvested 5")));

    // Both submissions went through the executor, in order.
    assert_eq!(executor.submitted().len(), 2);
}

#[test]
fn harvestable_set_overrides_reported_progress() {
    let mut engine = SessionEngine::new(GameConfig::default());

    // The ledger reports 80% but lists the farm as harvestable, the way
    // a contract-side early-maturity rule would.
    let farms = vec![ledger_farm(9, RAW_FIVE, 30, 80)];
    let harvestable = BTreeSet::from([FarmId(9)]);
    let summary = engine.handle_ledger_update(&farms, None, &harvestable);
    assert_eq!(summary.hydrated, 1);

    let plot = engine.store().plot(0).unwrap();
    assert!(plot.ready);

    // Ready via the harvestable set means the harvest goes through.
    let effects = engine
        .handle_command(Command::Harvest { plot: 0 }, 24_000)
        .unwrap();
    assert_eq!(pull_submit(&effects).farm_id(), Some(FarmId(9)));
}

#[test]
fn rejected_plant_leaves_the_plot_empty() {
    let mut engine = SessionEngine::new(GameConfig::default());
    let executor = RecordingExecutor::rejecting("user rejected");
    let sink = CollectingSink::new();

    let effects = engine
        .handle_command(
            Command::Plant {
                plot: 3,
                seed: SeedKind::Base,
                amount: "2".to_owned(),
            },
            0,
        )
        .unwrap();
    let intent = pull_submit(&effects);
    let reason = executor.execute(&intent).unwrap_err();
    let effects = engine.handle_executor_error(intent.id, &reason);
    forward_notifies(&sink, &effects);

    let plot = engine.store().plot(3).unwrap();
    assert!(!plot.planted);
    assert_eq!(plot.stake_amount, Decimal::ZERO);
    assert_eq!(engine.store().progress().experience, 0);
    assert_eq!(sink.messages(), vec!["user rejected"]);
}
