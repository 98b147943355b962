//! Typed identifiers for things the engine observes or targets.
//!
//! The host world addresses items, scene objects, variables, widgets and NPCs
//! by plain integers. Newtypes keep them from being mixed up at call sites.
//! The well-known identifiers of the smelting area live in the nested
//! modules; anything recipe-specific is configuration instead.

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

id_newtype!(
    /// Item definition id (inventory and storage contents).
    ItemId(u32)
);
id_newtype!(
    /// Scene object definition id.
    ObjectId(u32)
);
id_newtype!(
    /// Client variable (varbit) id.
    VarbitId(u32)
);
id_newtype!(
    /// NPC definition id.
    NpcId(u32)
);

/// A UI element addressed by interface group and child index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WidgetId {
    pub group: u16,
    pub child: u16,
}

impl WidgetId {
    pub const fn new(group: u16, child: u16) -> Self {
        Self { group, child }
    }
}

impl core::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Widget#{}:{}", self.group, self.child)
    }
}

/// Items the engine refers to regardless of recipe.
pub mod item {
    use super::ItemId;

    pub const COINS: ItemId = ItemId(995);
    pub const COAL: ItemId = ItemId(453);
    pub const RUNITE_ORE: ItemId = ItemId(451);
    pub const RUNITE_BAR: ItemId = ItemId(2363);
    pub const COAL_BAG: ItemId = ItemId(12019);

    /// Stamina potion doses, four to one.
    pub const STAMINA_POTIONS: [ItemId; 4] = [
        ItemId(12625),
        ItemId(12627),
        ItemId(12629),
        ItemId(12631),
    ];
}

/// Fixed scene objects of the smelting area.
pub mod object {
    use super::ObjectId;

    pub const BANK_CHEST: ObjectId = ObjectId(26707);
    pub const CONVEYOR_BELT: ObjectId = ObjectId(9100);
    pub const BAR_DISPENSER: ObjectId = ObjectId(9092);
    pub const COFFER: ObjectId = ObjectId(29330);
}

/// Client variables read each tick.
pub mod varbit {
    use super::VarbitId;

    /// Non-zero while finished bars wait in the dispenser.
    pub const BAR_DISPENSER: VarbitId = VarbitId(936);
    /// Coins currently in the shared coffer.
    pub const COFFER: VarbitId = VarbitId(5357);
    /// Coal currently on the furnace.
    pub const FURNACE_COAL: VarbitId = VarbitId(949);
}

/// Interface elements the engine inspects or targets.
pub mod widget {
    use super::WidgetId;

    /// Chatbox amount prompt shown after using the coffer.
    pub const CHATBOX_INPUT: WidgetId = WidgetId::new(162, 40);
    /// "Click here to continue" in an NPC dialogue.
    pub const NPC_DIALOGUE_CONTINUE: WidgetId = WidgetId::new(231, 3);
    /// Product entry of the make-product panel.
    pub const MAKE_PRODUCT: WidgetId = WidgetId::new(270, 14);
    /// Dialogue option list.
    pub const DIALOGUE_OPTIONS: WidgetId = WidgetId::new(219, 1);

    /// Interface groups whose loading the session reacts to.
    pub mod group {
        pub const CHATBOX: u16 = 162;
        pub const DIALOGUE_OPTIONS: u16 = 219;
        pub const MAKE_PRODUCT: u16 = 270;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_kind() {
        assert_eq!(item::COAL.to_string(), "ItemId#453");
        assert_eq!(widget::CHATBOX_INPUT.to_string(), "Widget#162:40");
    }
}
