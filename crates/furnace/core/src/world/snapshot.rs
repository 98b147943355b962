//! In-memory world snapshot.
//!
//! [`WorldSnapshot`] answers every [`WorldView`] query from plain data. Hosts
//! use it to record frames for replay, and tests build fixtures with its
//! `with_*` helpers.
use std::collections::BTreeMap;

use super::{INVENTORY_SIZE, Npc, Rect, SceneObject, Tile, WidgetView, WorldView};
use crate::ids::{ItemId, ObjectId, VarbitId, WidgetId};

/// One occupied inventory or storage slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub item: ItemId,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item: ItemId, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

/// A complete, self-contained world observation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldSnapshot {
    pub playable: bool,
    pub position: Option<Tile>,
    pub objects: Vec<SceneObject>,
    pub varbits: BTreeMap<VarbitId, i32>,
    /// Occupied inventory slots in slot order.
    pub inventory: Vec<ItemStack>,
    pub storage_open: bool,
    pub storage: Vec<ItemStack>,
    pub widgets: BTreeMap<WidgetId, WidgetView>,
    pub run_energy: u32,
    pub run_enabled: bool,
    /// Click bounds keyed by NPC index.
    pub npc_bounds: BTreeMap<u32, Rect>,
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            playable: true,
            position: Some(Tile::default()),
            objects: Vec::new(),
            varbits: BTreeMap::new(),
            inventory: Vec::new(),
            storage_open: false,
            storage: Vec::new(),
            widgets: BTreeMap::new(),
            run_energy: 100,
            run_enabled: true,
            npc_bounds: BTreeMap::new(),
        }
    }
}

impl WorldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, position: Tile) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_object(mut self, object: SceneObject) -> Self {
        self.objects.push(object);
        self
    }

    pub fn with_varbit(mut self, id: VarbitId, value: i32) -> Self {
        self.varbits.insert(id, value);
        self
    }

    /// Adds `slots` single items, one per slot.
    pub fn with_items(mut self, item: ItemId, slots: u32) -> Self {
        for _ in 0..slots {
            self.inventory.push(ItemStack::new(item, 1));
        }
        self
    }

    /// Adds one stacked slot.
    pub fn with_stack(mut self, item: ItemId, quantity: u32) -> Self {
        self.inventory.push(ItemStack::new(item, quantity));
        self
    }

    pub fn with_storage_open(mut self) -> Self {
        self.storage_open = true;
        self
    }

    pub fn with_stored(mut self, item: ItemId, quantity: u32) -> Self {
        self.storage.push(ItemStack::new(item, quantity));
        self
    }

    pub fn with_widget(mut self, id: WidgetId, widget: WidgetView) -> Self {
        self.widgets.insert(id, widget);
        self
    }

    pub fn with_npc_bounds(mut self, index: u32, bounds: Rect) -> Self {
        self.npc_bounds.insert(index, bounds);
        self
    }

    /// Removes every inventory slot holding `item`.
    pub fn without_item(mut self, item: ItemId) -> Self {
        self.inventory.retain(|stack| stack.item != item);
        self
    }
}

impl WorldView for WorldSnapshot {
    fn is_playable(&self) -> bool {
        self.playable
    }

    fn local_position(&self) -> Option<Tile> {
        self.position
    }

    fn find_nearest_object(&self, id: ObjectId) -> Option<SceneObject> {
        let origin = self.position.unwrap_or_default();
        self.objects
            .iter()
            .filter(|object| object.id == id)
            .min_by_key(|object| object.tile.distance_to(origin))
            .copied()
    }

    fn varbit(&self, id: VarbitId) -> i32 {
        self.varbits.get(&id).copied().unwrap_or(0)
    }

    fn inventory_quantity(&self, item: ItemId) -> u32 {
        self.inventory
            .iter()
            .filter(|stack| stack.item == item)
            .map(|stack| stack.quantity)
            .sum()
    }

    fn inventory_slot(&self, item: ItemId) -> Option<u16> {
        self.inventory
            .iter()
            .position(|stack| stack.item == item)
            .map(|slot| slot as u16)
    }

    fn free_inventory_slots(&self) -> u32 {
        INVENTORY_SIZE.saturating_sub(self.inventory.len() as u32)
    }

    fn is_storage_open(&self) -> bool {
        self.storage_open
    }

    fn storage_quantity(&self, item: ItemId) -> u32 {
        self.storage
            .iter()
            .filter(|stack| stack.item == item)
            .map(|stack| stack.quantity)
            .sum()
    }

    fn storage_slot(&self, item: ItemId) -> Option<u16> {
        self.storage
            .iter()
            .position(|stack| stack.item == item && stack.quantity > 0)
            .map(|slot| slot as u16)
    }

    fn widget(&self, id: WidgetId) -> Option<WidgetView> {
        self.widgets.get(&id).cloned()
    }

    fn run_energy(&self) -> u32 {
        self.run_energy
    }

    fn is_run_enabled(&self) -> bool {
        self.run_enabled
    }

    fn npc_bounds(&self, npc: &Npc) -> Option<Rect> {
        self.npc_bounds.get(&npc.index).copied()
    }
}
