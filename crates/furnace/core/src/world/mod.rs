//! Read-only queries over the live world.
//!
//! The host client owns the world; the engine only ever sees it through
//! [`WorldView`]. Every query is synchronous and side-effect free, and any
//! lookup that the client can answer with "nothing there" is `Option`-typed
//! so call sites have to decide what absence means for their branch.
mod snapshot;

pub use snapshot::{ItemStack, WorldSnapshot};

use crate::ids::{ItemId, NpcId, ObjectId, VarbitId, WidgetId};

/// Number of inventory slots.
pub const INVENTORY_SIZE: u32 = 28;

/// A world tile. Distances between different planes are unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub plane: u8,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, plane: 0 }
    }

    /// Chebyshev distance on the same plane, `i32::MAX` across planes.
    pub fn distance_to(self, other: Tile) -> i32 {
        if self.plane != other.plane {
            return i32::MAX;
        }
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Scene-local coordinates used when targeting an object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenePoint {
    pub x: i32,
    pub y: i32,
}

/// An interactable object found in the loaded scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneObject {
    pub id: ObjectId,
    pub tile: Tile,
    pub scene: ScenePoint,
}

impl SceneObject {
    pub fn new(id: ObjectId, tile: Tile, scene: ScenePoint) -> Self {
        Self { id, tile, scene }
    }
}

/// A non-player character as reported by interaction events.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npc {
    /// Index in the client's NPC table; unique while the NPC is spawned.
    pub index: u32,
    pub id: NpcId,
    pub name: String,
}

impl Npc {
    pub fn new(index: u32, id: NpcId, name: impl Into<String>) -> Self {
        Self {
            index,
            id,
            name: name.into(),
        }
    }
}

/// Screen-space rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Presence and content of a UI element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WidgetView {
    #[cfg_attr(feature = "serde", serde(default))]
    pub hidden: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub text: String,
}

impl WidgetView {
    pub fn visible() -> Self {
        Self::default()
    }

    pub fn hidden() -> Self {
        Self {
            hidden: true,
            text: String::new(),
        }
    }
}

/// Observation adapter consumed by the decision engine and interrupt handler.
pub trait WorldView {
    /// True when the session is logged in with a local player present.
    fn is_playable(&self) -> bool;

    /// Current tile of the controlled agent.
    fn local_position(&self) -> Option<Tile>;

    /// Nearest loaded object with the given id.
    fn find_nearest_object(&self, id: ObjectId) -> Option<SceneObject>;

    /// Value of a client variable. Unknown variables read as zero.
    fn varbit(&self, id: VarbitId) -> i32;

    /// Total quantity of an item across inventory slots.
    fn inventory_quantity(&self, item: ItemId) -> u32;

    /// First inventory slot holding the item.
    fn inventory_slot(&self, item: ItemId) -> Option<u16>;

    fn free_inventory_slots(&self) -> u32;

    fn is_storage_open(&self) -> bool;

    /// Quantity of an item in storage. Only meaningful while storage is open.
    fn storage_quantity(&self, item: ItemId) -> u32;

    /// Storage slot of an item, if storage holds any.
    fn storage_slot(&self, item: ItemId) -> Option<u16>;

    fn widget(&self, id: WidgetId) -> Option<WidgetView>;

    /// Run energy, 0 to 100.
    fn run_energy(&self) -> u32;

    fn is_run_enabled(&self) -> bool;

    /// Clickable screen bounds of a spawned NPC.
    fn npc_bounds(&self, npc: &Npc) -> Option<Rect>;

    /// True if the inventory holds at least `min` of the item (default one).
    fn inventory_contains(&self, item: ItemId, min: Option<u32>) -> bool {
        self.inventory_quantity(item) >= min.unwrap_or(1).max(1)
    }

    fn inventory_contains_any(&self, items: &[ItemId]) -> bool {
        items.iter().any(|&item| self.inventory_contains(item, None))
    }

    fn is_inventory_full(&self) -> bool {
        self.free_inventory_slots() == 0
    }

    /// True if storage holds at least `min` of the item.
    fn storage_contains(&self, item: ItemId, min: u32) -> bool {
        self.storage_quantity(item) >= min.max(1)
    }

    /// First of `items` that storage holds, in the given order.
    fn storage_first_of(&self, items: &[ItemId]) -> Option<ItemId> {
        items
            .iter()
            .copied()
            .find(|&item| self.storage_contains(item, 1))
    }

    /// True if the element exists and is not hidden.
    fn is_widget_visible(&self, id: WidgetId) -> bool {
        self.widget(id).is_some_and(|widget| !widget.hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_chebyshev_on_same_plane() {
        let a = Tile::new(10, 10);
        assert_eq!(a.distance_to(Tile::new(13, 8)), 3);
        assert_eq!(a.distance_to(a), 0);
        assert_eq!(
            a.distance_to(Tile {
                x: 10,
                y: 10,
                plane: 1
            }),
            i32::MAX
        );
    }
}
