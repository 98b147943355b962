//! Rule tables of the decision engine.
//!
//! ```text
//! root
//!  ├─ out_of_area          location handles unresolved
//!  ├─ cooldown             cooldown > 0
//!  ├─ moving               agent tile changed
//!  ├─ storage_closed ──┬─ coffer_prompt
//!  │                   ├─ carrying_product
//!  │                   ├─ product_ready
//!  │                   ├─ coffer_low
//!  │                   └─ work_area ──┬─ near storage: near_storage table
//!  │                                  └─ elsewhere:    at_conveyor table
//!  └─ storage_open ────┬─ deposit_product
//!                      ├─ product_ready_inventory_busy
//!                      ├─ product_ready
//!                      ├─ coffer_low ──── restock_coins table
//!                      ├─ restock_stamina
//!                      ├─ missing_aux_container
//!                      ├─ primary_short ─ primary table
//!                      └─ secondary ───── secondary table
//! ```
//!
//! Order inside each table is significant. Guards are pure; bodies report a
//! state and emit at most one intent.
use behavior_tree::{Rule, RuleTable};

use super::DecisionContext;
use super::procedures::{
    arm_run, close_storage, collect_from_dispenser, collect_output, deposit_amount,
    deposit_except, empty_aux_container, fill_aux_container, open_storage, place_on_conveyor,
    withdraw,
};
use crate::action::{InputCommand, Intent, Interaction, Key, NoticeKind, Quantity, Target, Verb};
use crate::config::BotConfig;
use crate::ids::{item, object, varbit, widget};
use crate::state::BotState;

type Ctx<'a> = DecisionContext<'a>;

// ============================================================================
// Root
// ============================================================================

pub fn root<'a>() -> RuleTable<Ctx<'a>> {
    RuleTable::new(
        "root",
        vec![
            Rule::new("out_of_area", location_unresolved, out_of_area),
            Rule::new("cooldown", cooling_down, wait_out_cooldown),
            Rule::new("moving", moving, settle_after_motion),
            Rule::new("storage_closed", storage_closed, run_storage_closed),
            Rule::otherwise("storage_open", run_storage_open),
        ],
    )
}

fn location_unresolved(ctx: &Ctx<'_>) -> bool {
    !ctx.session.has_location_handles()
}

fn out_of_area(ctx: &mut Ctx<'_>) {
    ctx.report(BotState::OutOfArea);
}

fn cooling_down(ctx: &Ctx<'_>) -> bool {
    ctx.session.cooldown > 0
}

fn wait_out_cooldown(ctx: &mut Ctx<'_>) {
    ctx.session.tick_cooldown();
    let threshold = ctx.config.run_while_waiting;
    arm_run(ctx, threshold);
    ctx.report(BotState::TimedOut);
}

fn moving(ctx: &Ctx<'_>) -> bool {
    ctx.moved
}

fn settle_after_motion(ctx: &mut Ctx<'_>) {
    ctx.arm_cooldown();
    ctx.report(BotState::Moving);
}

fn storage_closed(ctx: &Ctx<'_>) -> bool {
    !ctx.world.is_storage_open()
}

fn run_storage_closed(ctx: &mut Ctx<'_>) {
    if !coffer_prompt(ctx) {
        let threshold = ctx.config.run_while_working;
        arm_run(ctx, threshold);
    }
    ctx.fire(&storage_closed_rules());
}

fn run_storage_open(ctx: &mut Ctx<'_>) {
    ctx.fire(&storage_open_rules());
}

// ============================================================================
// Shared guards
// ============================================================================

fn carrying_product(ctx: &Ctx<'_>) -> bool {
    ctx.world
        .inventory_contains(ctx.config.recipe.product, None)
}

fn product_ready(ctx: &Ctx<'_>) -> bool {
    ctx.world.varbit(varbit::BAR_DISPENSER) > 0
}

fn coffer_low(ctx: &Ctx<'_>) -> bool {
    ctx.world.varbit(varbit::COFFER) < ctx.config.coffer_threshold
}

fn carrying_coins(ctx: &Ctx<'_>) -> bool {
    ctx.world
        .inventory_contains(item::COINS, Some(ctx.config.coffer_amount))
}

fn carrying_materials(ctx: &Ctx<'_>) -> bool {
    ctx.world
        .inventory_contains_any(&ctx.config.recipe.materials())
}

fn inventory_busy(ctx: &Ctx<'_>) -> bool {
    ctx.world.free_inventory_slots() < BotConfig::COLLECT_FREE_SLOTS
}

fn inventory_full(ctx: &Ctx<'_>) -> bool {
    ctx.world.is_inventory_full()
}

fn aux_full(ctx: &Ctx<'_>) -> bool {
    ctx.session.aux_full
}

fn carrying_aux_container(ctx: &Ctx<'_>) -> bool {
    ctx.world.inventory_contains(ctx.config.aux_container, None)
}

fn carrying_primary(ctx: &Ctx<'_>) -> bool {
    ctx.world
        .inventory_contains(ctx.config.recipe.primary, None)
}

fn carrying_secondary(ctx: &Ctx<'_>) -> bool {
    ctx.world
        .inventory_contains(ctx.config.recipe.secondary, None)
}

// ============================================================================
// Storage closed
// ============================================================================

pub fn storage_closed_rules<'a>() -> RuleTable<Ctx<'a>> {
    RuleTable::new(
        "storage_closed",
        vec![
            Rule::new("coffer_prompt", coffer_prompt, answer_coffer_prompt),
            Rule::new("carrying_product", carrying_product, open_storage),
            Rule::new("product_ready", product_ready, collect_output),
            Rule::new("coffer_low", coffer_low, refill_coffer),
            Rule::otherwise("work_area", work_area),
        ],
    )
}

fn coffer_prompt(ctx: &Ctx<'_>) -> bool {
    ctx.world.is_widget_visible(widget::CHATBOX_INPUT)
}

fn answer_coffer_prompt(ctx: &mut Ctx<'_>) {
    if !carrying_coins(ctx) {
        open_storage(ctx);
        return;
    }
    let held = ctx.world.inventory_quantity(item::COINS);
    let amount = deposit_amount(ctx, held);
    tracing::info!(amount, held, "depositing coins into the coffer");

    ctx.input(InputCommand::TypeText(amount.to_string()));
    ctx.sleep(10, 50);
    ctx.input(InputCommand::PressKey(Key::Enter));
    ctx.sleep(200, 350);
    ctx.arm_cooldown();
    ctx.report(BotState::FillingCoffer);
}

fn refill_coffer(ctx: &mut Ctx<'_>) {
    if !carrying_coins(ctx) {
        open_storage(ctx);
        return;
    }
    match ctx.world.find_nearest_object(object::COFFER) {
        Some(coffer) => {
            ctx.emit(Intent::Interact(Interaction::new(
                Target::object(&coffer),
                Verb::Use,
            )));
            ctx.sleep(50, 250);
            ctx.input(InputCommand::center_click());
            ctx.arm_cooldown();
        }
        None => ctx.notify(
            NoticeKind::EnvironmentMismatch,
            "Coffer is missing, wrong world?",
        ),
    }
    ctx.report(BotState::FillingCoffer);
}

fn work_area(ctx: &mut Ctx<'_>) {
    let Some(storage) = ctx.world.find_nearest_object(object::BANK_CHEST) else {
        tracing::debug!("storage object not in scene");
        return;
    };
    let near = ctx
        .world
        .local_position()
        .is_some_and(|tile| tile.distance_to(storage.tile) < BotConfig::NEAR_STORAGE_DISTANCE);

    if near {
        ctx.fire(&near_storage_rules());
    } else {
        ctx.fire(&at_conveyor_rules());
    }
}

pub fn near_storage_rules<'a>() -> RuleTable<Ctx<'a>> {
    RuleTable::new(
        "near_storage",
        vec![
            Rule::new("no_materials", no_materials, open_storage),
            Rule::new("no_aux_container", no_aux_container, idle),
            Rule::new("aux_has_room", aux_has_room, load_materials),
            Rule::otherwise("aux_loaded", place_on_conveyor),
        ],
    )
}

fn no_materials(ctx: &Ctx<'_>) -> bool {
    !carrying_materials(ctx)
}

fn no_aux_container(ctx: &Ctx<'_>) -> bool {
    !carrying_aux_container(ctx)
}

fn aux_has_room(ctx: &Ctx<'_>) -> bool {
    !aux_full(ctx)
}

/// Secondary material goes straight to the belt; primary goes into the
/// container first.
fn load_materials(ctx: &mut Ctx<'_>) {
    if carrying_secondary(ctx) {
        place_on_conveyor(ctx);
    } else {
        fill_aux_container(ctx);
    }
}

fn idle(_ctx: &mut Ctx<'_>) {}

pub fn at_conveyor_rules<'a>() -> RuleTable<Ctx<'a>> {
    RuleTable::new(
        "at_conveyor",
        vec![
            Rule::new("empty_handed", empty_handed_with_room, return_for_more),
            Rule::new("aux_loaded", no_materials, empty_aux_container),
            Rule::otherwise("carrying_materials", unload_materials),
        ],
    )
}

fn empty_handed_with_room(ctx: &Ctx<'_>) -> bool {
    no_materials(ctx) && !aux_full(ctx)
}

fn return_for_more(ctx: &mut Ctx<'_>) {
    ctx.sleep(60, 250);
    if product_ready(ctx) {
        collect_from_dispenser(ctx);
    } else {
        open_storage(ctx);
    }
}

fn unload_materials(ctx: &mut Ctx<'_>) {
    place_on_conveyor(ctx);
    if !aux_full(ctx) {
        ctx.arm_cooldown();
    }
}

// ============================================================================
// Storage open
// ============================================================================

pub fn storage_open_rules<'a>() -> RuleTable<Ctx<'a>> {
    RuleTable::new(
        "storage_open",
        vec![
            Rule::new("deposit_product", carrying_product, deposit_except),
            Rule::new(
                "product_ready_inventory_busy",
                product_ready_inventory_busy,
                deposit_except,
            ),
            Rule::new("product_ready", product_ready, collect_output),
            Rule::new("coffer_low", coffer_low, run_restock_coins),
            Rule::new("restock_stamina", stamina_missing, restock_stamina),
            Rule::new("missing_aux_container", no_aux_container, restock_aux_container),
            Rule::new("primary_short", primary_short, run_primary),
            Rule::otherwise("secondary", run_secondary),
        ],
    )
}

fn product_ready_inventory_busy(ctx: &Ctx<'_>) -> bool {
    product_ready(ctx) && inventory_busy(ctx)
}

fn run_restock_coins(ctx: &mut Ctx<'_>) {
    ctx.fire(&restock_coins_rules());
}

pub fn restock_coins_rules<'a>() -> RuleTable<Ctx<'a>> {
    RuleTable::new(
        "restock_coins",
        vec![
            Rule::new("carrying_coins", carrying_coins, leave_for_coffer),
            Rule::new("full_without_coins", full_without_coins, deposit_except),
            Rule::new("coins_in_storage", coins_in_storage, withdraw_coins),
            Rule::otherwise("out_of_coins", out_of_coins),
        ],
    )
}

fn leave_for_coffer(ctx: &mut Ctx<'_>) {
    close_storage(ctx);
    ctx.report(BotState::FillingCoffer);
}

fn full_without_coins(ctx: &Ctx<'_>) -> bool {
    inventory_full(ctx) && !ctx.world.inventory_contains(item::COINS, None)
}

fn coins_in_storage(ctx: &Ctx<'_>) -> bool {
    ctx.world
        .storage_contains(item::COINS, ctx.config.coffer_amount)
}

fn withdraw_coins(ctx: &mut Ctx<'_>) {
    withdraw(ctx, item::COINS, Quantity::All, false);
}

fn out_of_coins(ctx: &mut Ctx<'_>) {
    ctx.notify(NoticeKind::ResourceExhausted, "Out of coins, log off");
    close_storage(ctx);
    ctx.report(BotState::OutOfItems);
}

fn stamina_missing(ctx: &Ctx<'_>) -> bool {
    !ctx.world.inventory_contains_any(&ctx.config.stamina_items)
        && ctx.world.storage_first_of(&ctx.config.stamina_items).is_some()
}

fn restock_stamina(ctx: &mut Ctx<'_>) {
    if let Some(potion) = ctx.world.storage_first_of(&ctx.config.stamina_items) {
        withdraw(ctx, potion, Quantity::One, true);
    }
}

fn restock_aux_container(ctx: &mut Ctx<'_>) {
    let container = ctx.config.aux_container;
    if ctx.world.storage_contains(container, 1) {
        withdraw(ctx, container, Quantity::One, true);
        return;
    }
    close_storage(ctx);
    ctx.notify(NoticeKind::ResourceExhausted, "Missing the coal bag, log off");
    ctx.report(BotState::OutOfItems);
}

fn primary_short(ctx: &Ctx<'_>) -> bool {
    ctx.world.varbit(varbit::FURNACE_COAL) < ctx.config.primary_reserve || !aux_full(ctx)
}

fn run_primary(ctx: &mut Ctx<'_>) {
    ctx.fire(&primary_rules());
}

pub fn primary_rules<'a>() -> RuleTable<Ctx<'a>> {
    RuleTable::new(
        "primary",
        vec![
            Rule::new("holding_primary", carrying_primary, use_held_primary),
            Rule::new("inventory_full", inventory_full, blocked_by_inventory),
            Rule::new("primary_in_storage", primary_in_storage, withdraw_primary),
            Rule::otherwise("out_of_primary", out_of_primary),
        ],
    )
}

fn use_held_primary(ctx: &mut Ctx<'_>) {
    if aux_full(ctx) {
        place_on_conveyor(ctx);
    } else {
        // The container is filled from the storage-closed branch.
        close_storage(ctx);
        ctx.report(BotState::FillingAuxContainer);
    }
}

fn blocked_by_inventory(ctx: &mut Ctx<'_>) {
    deposit_except(ctx);
    ctx.notify(
        NoticeKind::InventoryBlocked,
        "Inventory is full but materials still need withdrawing",
    );
    ctx.report(BotState::OutOfItems);
}

fn primary_in_storage(ctx: &Ctx<'_>) -> bool {
    ctx.world.storage_contains(ctx.config.recipe.primary, 1)
}

fn withdraw_primary(ctx: &mut Ctx<'_>) {
    let primary = ctx.config.recipe.primary;
    withdraw(ctx, primary, Quantity::All, true);
}

fn out_of_primary(ctx: &mut Ctx<'_>) {
    ctx.notify(NoticeKind::ResourceExhausted, "Out of coal, log off");
    ctx.report(BotState::OutOfItems);
}

fn run_secondary(ctx: &mut Ctx<'_>) {
    ctx.fire(&secondary_rules());
}

pub fn secondary_rules<'a>() -> RuleTable<Ctx<'a>> {
    RuleTable::new(
        "secondary",
        vec![
            Rule::new("holding_secondary", carrying_secondary, place_on_conveyor),
            Rule::new("inventory_full", inventory_full, blocked_by_inventory),
            Rule::new("secondary_in_storage", secondary_in_storage, withdraw_secondary),
            Rule::otherwise("out_of_secondary", out_of_secondary),
        ],
    )
}

fn secondary_in_storage(ctx: &Ctx<'_>) -> bool {
    ctx.world.storage_contains(ctx.config.recipe.secondary, 1)
}

fn withdraw_secondary(ctx: &mut Ctx<'_>) {
    let secondary = ctx.config.recipe.secondary;
    withdraw(ctx, secondary, Quantity::All, true);
    ctx.arm_cooldown();
}

fn out_of_secondary(ctx: &mut Ctx<'_>) {
    close_storage(ctx);
    ctx.notify(NoticeKind::ResourceExhausted, "Out of ore, log off");
    ctx.report(BotState::OutOfItems);
}
