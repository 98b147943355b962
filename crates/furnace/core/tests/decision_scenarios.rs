//! End-to-end decision scenarios and tick-level properties.
//!
//! Every test drives the public [`DecisionEngine`] / [`InterruptHandler`] API
//! against an in-memory [`WorldSnapshot`] of the smelting area.

use furnace_core::ids::{item, object, varbit};
use furnace_core::{
    BotConfig, BotState, DecisionEngine, InputCommand, Intent, InteractionChange, InterruptConfig,
    InterruptHandler, InterruptPhase, InterruptTick, Npc, NpcId, Quantity, SceneObject,
    ScenePoint, SessionState, StorageCommand, Target, Tile, Verb, WidgetView, WorldSnapshot,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

const AT_CONVEYOR: Tile = Tile::new(20, 1);
const NEAR_STORAGE: Tile = Tile::new(1, 1);

fn area(at: Tile) -> WorldSnapshot {
    WorldSnapshot::new()
        .at(at)
        .with_object(SceneObject::new(
            object::BANK_CHEST,
            Tile::new(0, 0),
            ScenePoint { x: 5, y: 5 },
        ))
        .with_object(SceneObject::new(
            object::CONVEYOR_BELT,
            Tile::new(21, 0),
            ScenePoint { x: 30, y: 5 },
        ))
        .with_object(SceneObject::new(
            object::BAR_DISPENSER,
            Tile::new(20, 3),
            ScenePoint { x: 29, y: 8 },
        ))
        .with_object(SceneObject::new(
            object::COFFER,
            Tile::new(18, 2),
            ScenePoint { x: 27, y: 7 },
        ))
        .with_varbit(varbit::COFFER, 40_000)
        .with_varbit(varbit::FURNACE_COAL, 150)
}

fn target_id(intent: &Option<Intent>) -> Option<furnace_core::ObjectId> {
    match intent.as_ref()?.interaction()?.target {
        Target::Object { id, .. } => Some(id),
        _ => None,
    }
}

/// Scenario A: storage closed while carrying product.
#[test]
fn test_scenario_a_product_in_inventory_opens_storage() {
    let engine = DecisionEngine::default();
    let mut session = SessionState::new();
    let mut rng = StdRng::seed_from_u64(11);
    let world = area(AT_CONVEYOR).with_items(item::RUNITE_BAR, 27);

    let decision = engine.evaluate(&world, &mut session, &mut rng);

    assert_eq!(decision.state, Some(BotState::OpeningStorage));
    assert_eq!(target_id(&decision.intent), Some(object::BANK_CHEST));
}

/// Scenario B: product ready but only two free slots.
#[test]
fn test_scenario_b_busy_inventory_prefers_storage_over_collection() {
    let engine = DecisionEngine::default();
    let mut session = SessionState::new();
    let mut rng = StdRng::seed_from_u64(12);
    let world = area(AT_CONVEYOR)
        .with_varbit(varbit::BAR_DISPENSER, 1)
        .with_items(item::COAL_BAG, 1)
        .with_items(item::STAMINA_POTIONS[1], 25);
    assert_eq!(furnace_core::WorldView::free_inventory_slots(&world), 2);

    let decision = engine.evaluate(&world, &mut session, &mut rng);

    assert_eq!(decision.state, Some(BotState::OpeningStorage));
    assert_ne!(target_id(&decision.intent), Some(object::BAR_DISPENSER));
}

/// Scenario C: storage open with product in the inventory.
#[test]
fn test_scenario_c_open_storage_deposits_product() {
    let engine = DecisionEngine::default();
    let mut session = SessionState::new();
    let mut rng = StdRng::seed_from_u64(13);
    let world = area(NEAR_STORAGE)
        .with_storage_open()
        .with_items(item::COAL_BAG, 1)
        .with_items(item::RUNITE_BAR, 27);

    let decision = engine.evaluate(&world, &mut session, &mut rng);

    assert_eq!(decision.state, Some(BotState::Depositing));
    let Some(Intent::Storage(StorageCommand::DepositAllExcept(keep))) = &decision.intent else {
        panic!("expected deposit-all-except, got {:?}", decision.intent);
    };
    assert!(keep.contains(&item::COAL_BAG));
    assert!(!keep.contains(&item::RUNITE_BAR));
}

/// Scenario D: coffer low, not enough coins carried, plenty in storage.
#[test]
fn test_scenario_d_low_coffer_withdraws_coins() {
    let engine = DecisionEngine::default();
    let mut session = SessionState::new();
    let mut rng = StdRng::seed_from_u64(14);
    let world = area(NEAR_STORAGE)
        .with_storage_open()
        .with_varbit(varbit::COFFER, 500)
        .with_items(item::COAL_BAG, 1)
        .with_stack(item::COINS, 100)
        .with_stored(item::COINS, 1_000_000);

    let decision = engine.evaluate(&world, &mut session, &mut rng);

    assert_eq!(decision.state, Some(BotState::Withdrawing));
    assert_eq!(
        decision.intent,
        Some(Intent::Storage(StorageCommand::Withdraw {
            item: item::COINS,
            slot: 0,
            quantity: Quantity::All,
            deposit_first: None,
        }))
    );
}

/// Scenario E: a frog targets the player and is dismissed after the countdown.
#[test]
fn test_scenario_e_disruptor_is_dismissed_after_countdown() {
    let config = InterruptConfig::default();
    let mut handler = InterruptHandler::from_config(&config);
    let mut rng = StdRng::seed_from_u64(15);
    let frog = Npc::new(12, NpcId(5429), "Frog");
    let world = WorldSnapshot::new();

    let armed = handler.on_interacting_changed(
        &InteractionChange {
            source: frog.clone(),
            targets_local_player: true,
            local_player_interacting_with_source: false,
        },
        &config,
        &mut rng,
    );
    assert!(armed);
    assert_eq!(handler.phase(), InterruptPhase::PendingDismiss);

    let mut actions = Vec::new();
    for _ in 0..=config.ticks.max {
        let outcome = handler.tick(&world, &config, &mut rng);
        assert!(outcome.suppresses_engine());
        if let InterruptTick::Acted(action) = outcome {
            actions.push(action);
            break;
        }
    }

    assert_eq!(actions.len(), 1);
    let interaction = actions[0].intent.interaction().unwrap();
    assert_eq!(interaction.verb, Verb::Dismiss);
    assert_eq!(
        interaction.target,
        Target::Npc {
            index: 12,
            id: NpcId(5429)
        }
    );
    assert_eq!(handler.phase(), InterruptPhase::Dismissing);
}

/// The coffer prompt never asks for more than is carried.
#[test]
fn test_coffer_prompt_amount_within_held_coins() {
    let engine = DecisionEngine::default();
    for seed in 0..32 {
        let mut session = SessionState::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let world = area(AT_CONVEYOR)
            .with_stack(item::COINS, 4_000)
            .with_widget(furnace_core::ids::widget::CHATBOX_INPUT, WidgetView::visible());

        let decision = engine.evaluate(&world, &mut session, &mut rng);

        let Some(InputCommand::TypeText(text)) = decision.inputs.first() else {
            panic!("seed {seed}: no amount typed");
        };
        let amount: u32 = text.parse().unwrap();
        assert!((2_500..=4_000).contains(&amount), "seed {seed}: {amount}");
    }
}

fn world_strategy() -> impl Strategy<Value = WorldSnapshot> {
    (
        any::<bool>(),
        0u32..=27,
        0u32..=27,
        0u32..=2,
        0i32..6_000,
        prop::sample::select(vec![AT_CONVEYOR, NEAR_STORAGE]),
    )
        .prop_map(|(open, coal, bars, dispenser, coffer, at)| {
            let mut world = area(at)
                .with_items(item::COAL_BAG, 1)
                .with_items(item::COAL, coal)
                .with_items(item::RUNITE_BAR, bars.min(27 - coal))
                .with_varbit(varbit::BAR_DISPENSER, dispenser as i32)
                .with_varbit(varbit::COFFER, coffer)
                .with_stored(item::COAL, 5_000)
                .with_stored(item::RUNITE_ORE, 5_000)
                .with_stored(item::COINS, 50_000);
            world.storage_open = open;
            world
        })
}

proptest! {
    /// A tick entered with a cooldown acts on nothing and burns exactly one tick.
    #[test]
    fn prop_cooldown_ticks_never_act(world in world_strategy(), cooldown in 1u32..10, seed in any::<u64>()) {
        let engine = DecisionEngine::default();
        let mut session = SessionState::new();
        session.cooldown = cooldown;
        let mut rng = StdRng::seed_from_u64(seed);

        let decision = engine.evaluate(&world, &mut session, &mut rng);

        prop_assert!(decision.intent.is_none());
        prop_assert_eq!(decision.state, Some(BotState::TimedOut));
        prop_assert_eq!(session.cooldown, cooldown - 1);
    }

    /// Movement between two ticks suppresses action and arms a cooldown.
    #[test]
    fn prop_motion_arms_cooldown(world in world_strategy(), delay in 1u32..6, seed in any::<u64>()) {
        let config = BotConfig { delay_amount: delay, ..BotConfig::default() };
        let engine = DecisionEngine::new(config);
        let mut session = SessionState::new();
        session.last_position = Some(Tile::new(50, 50));
        let mut rng = StdRng::seed_from_u64(seed);

        let decision = engine.evaluate(&world, &mut session, &mut rng);

        prop_assert!(decision.intent.is_none());
        prop_assert_eq!(decision.state, Some(BotState::Moving));
        prop_assert!((1..=delay).contains(&session.cooldown));
    }

    /// Unchanged observations with no cooldown pick the same branch again.
    #[test]
    fn prop_evaluation_is_idempotent(world in world_strategy(), aux_full in any::<bool>(), seed in any::<u64>()) {
        let engine = DecisionEngine::default();
        let mut first = SessionState::new();
        first.aux_full = aux_full;
        let mut second = first.clone();

        let a = engine.evaluate(&world, &mut first, &mut StdRng::seed_from_u64(seed));
        let b = engine.evaluate(&world, &mut second, &mut StdRng::seed_from_u64(seed.wrapping_add(1)));

        prop_assert_eq!(a.trail, b.trail);
        prop_assert_eq!(a.state, b.state);
        prop_assert_eq!(a.intent, b.intent);
    }

    /// Typed coffer amounts stay inside `[coffer_amount, min(10000, held)]`.
    #[test]
    fn prop_coffer_amount_bounds(held in 2_500u32..60_000, seed in any::<u64>()) {
        let engine = DecisionEngine::default();
        let mut session = SessionState::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let world = area(AT_CONVEYOR)
            .with_stack(item::COINS, held)
            .with_widget(furnace_core::ids::widget::CHATBOX_INPUT, WidgetView::visible());

        let decision = engine.evaluate(&world, &mut session, &mut rng);

        let typed = decision.inputs.iter().find_map(|input| match input {
            InputCommand::TypeText(text) => text.parse::<u32>().ok(),
            _ => None,
        });
        let amount = typed.unwrap();
        prop_assert!(amount > 0 && amount <= held);
        prop_assert!(amount >= 2_500 && amount <= held.min(10_000));
    }
}
