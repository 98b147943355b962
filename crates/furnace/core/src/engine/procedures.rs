//! Reusable action sequences shared by several rules.
//!
//! Each procedure emits at most one intent plus the inputs that go with it,
//! and reports the state it settles on. Procedures that need an object or
//! item which turned out to be missing fall back to a notice or an idle tick.
use super::DecisionContext;
use crate::action::{InputCommand, Intent, Interaction, NoticeKind, Quantity, StorageCommand, Target, Verb};
use crate::config::{BotConfig, RunThreshold};
use crate::ids::{ItemId, object};
use crate::state::BotState;

type Ctx<'a> = DecisionContext<'a>;

/// Interacts with the storage chest on the next idle tick.
pub(super) fn open_storage(ctx: &mut Ctx<'_>) {
    let Some(chest) = ctx.world.find_nearest_object(object::BANK_CHEST) else {
        ctx.notify(
            NoticeKind::EnvironmentMismatch,
            "Storage chest is missing, wrong world?",
        );
        return;
    };
    ctx.emit(Intent::Interact(
        Interaction::new(Target::object(&chest), Verb::Use).deferred(),
    ));
    ctx.input(InputCommand::center_click());
    ctx.arm_cooldown();
    ctx.report(BotState::OpeningStorage);
}

pub(super) fn place_on_conveyor(ctx: &mut Ctx<'_>) {
    let Some(conveyor) = ctx.session.conveyor().copied() else {
        tracing::debug!("conveyor handle lost before placing materials");
        return;
    };
    ctx.emit(Intent::Interact(Interaction::new(
        Target::object(&conveyor),
        Verb::Use,
    )));
    ctx.sleep(10, 100);
    ctx.input(InputCommand::center_click());
    ctx.arm_cooldown();
    ctx.report(BotState::PlacingOnConveyor);
}

pub(super) fn collect_from_dispenser(ctx: &mut Ctx<'_>) {
    let Some(dispenser) = ctx.session.dispenser().copied() else {
        tracing::debug!("dispenser handle lost before collecting");
        return;
    };
    ctx.emit(Intent::Interact(Interaction::new(
        Target::object(&dispenser),
        Verb::Use,
    )));
    ctx.input(InputCommand::center_click());
    ctx.arm_cooldown();
    ctx.report(BotState::CollectingOutput);
}

/// Collects product, making room in storage first when the inventory is busy.
pub(super) fn collect_output(ctx: &mut Ctx<'_>) {
    if ctx.world.free_inventory_slots() < BotConfig::COLLECT_FREE_SLOTS {
        open_storage(ctx);
    } else {
        collect_from_dispenser(ctx);
    }
}

pub(super) fn fill_aux_container(ctx: &mut Ctx<'_>) {
    if aux_container_action(ctx, Verb::Fill) {
        ctx.report(BotState::FillingAuxContainer);
    }
}

pub(super) fn empty_aux_container(ctx: &mut Ctx<'_>) {
    if aux_container_action(ctx, Verb::Empty) {
        ctx.report(BotState::EmptyingAuxContainer);
    } else {
        ctx.notify(NoticeKind::ResourceExhausted, "Missing the coal bag, log off");
    }
}

fn aux_container_action(ctx: &mut Ctx<'_>, verb: Verb) -> bool {
    let container = ctx.config.aux_container;
    let Some(slot) = ctx.world.inventory_slot(container) else {
        return false;
    };
    ctx.emit(Intent::Interact(Interaction::new(
        Target::InventoryItem {
            item: container,
            slot,
        },
        verb,
    )));
    ctx.sleep(25, 100);
    ctx.input(InputCommand::center_click());
    true
}

pub(super) fn deposit_except(ctx: &mut Ctx<'_>) {
    let keep = ctx.config.keep_items();
    ctx.emit(Intent::Storage(StorageCommand::DepositAllExcept(keep)));
    ctx.report(BotState::Depositing);
}

pub(super) fn withdraw(ctx: &mut Ctx<'_>, item: ItemId, quantity: Quantity, deposit_first: bool) {
    let Some(slot) = ctx.world.storage_slot(item) else {
        tracing::debug!(%item, "withdraw target not in storage");
        return;
    };
    let deposit_first = deposit_first.then(|| ctx.config.keep_items());
    ctx.emit(Intent::Storage(StorageCommand::Withdraw {
        item,
        slot,
        quantity,
        deposit_first,
    }));
    ctx.report(BotState::Withdrawing);
}

pub(super) fn close_storage(ctx: &mut Ctx<'_>) {
    ctx.emit(Intent::Storage(StorageCommand::Close));
}

/// Re-enables running once energy reaches a threshold drawn from `threshold`.
pub(super) fn arm_run(ctx: &mut Ctx<'_>, threshold: RunThreshold) {
    if ctx.world.is_run_enabled() {
        return;
    }
    let energy = ctx.world.run_energy();
    let required = ctx.between(threshold.min, threshold.max);
    if energy >= required {
        tracing::debug!(energy, required, "re-enabling run");
        ctx.input(InputCommand::ToggleRun);
    }
}

/// Coins typed into the coffer prompt.
///
/// Drawn from `[coffer_amount, min(MAX_COFFER_DEPOSIT, held)]`. When that
/// range is empty the configured amount is used, capped at what is held.
pub(super) fn deposit_amount(ctx: &mut Ctx<'_>, held: u32) -> u32 {
    let floor = ctx.config.coffer_amount;
    let ceiling = held.min(BotConfig::MAX_COFFER_DEPOSIT);
    if ceiling < floor {
        return floor.min(held);
    }
    ctx.between(floor, ceiling)
}
