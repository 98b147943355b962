//! Action descriptors produced by the engine and the interrupt handler.
//!
//! An [`Intent`] is the single interaction chosen for a tick. It is pure
//! data: the host's action emitter decides how to make it happen. Low-level
//! [`InputCommand`]s (typing, key presses, pointer placement, delays) ride
//! along with a decision, and [`Notice`]s carry user-visible diagnostics.
use crate::ids::{ItemId, NpcId, ObjectId, WidgetId};
use crate::world::{Rect, SceneObject, ScenePoint};

/// Interaction verbs, independent of the client's menu encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verb {
    /// The object's first option (use, bank, take, put-on).
    Use,
    /// Fill the auxiliary container from the inventory.
    Fill,
    /// Empty the auxiliary container into the inventory.
    Empty,
    /// An NPC's first option.
    TalkTo,
    /// An NPC's dismiss option.
    Dismiss,
    /// Continue a dialogue.
    Continue,
    /// Pick an entry of a widget list.
    Select,
}

/// What an interaction is aimed at.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    Object { id: ObjectId, scene: ScenePoint },
    InventoryItem { item: ItemId, slot: u16 },
    Widget { widget: WidgetId, index: i32 },
    Npc { index: u32, id: NpcId },
}

impl Target {
    pub fn object(object: &SceneObject) -> Self {
        Target::Object {
            id: object.id,
            scene: object.scene,
        }
    }
}

/// A single intended interaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction {
    pub target: Target,
    pub verb: Verb,
    /// Deliver on the next idle tick instead of immediately.
    pub deferred: bool,
}

impl Interaction {
    pub fn new(target: Target, verb: Verb) -> Self {
        Self {
            target,
            verb,
            deferred: false,
        }
    }

    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }
}

/// How much of a stored item to take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quantity {
    One,
    All,
}

/// Operations on the open storage panel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StorageCommand {
    /// Deposit every inventory item except the listed ones.
    DepositAllExcept(Vec<ItemId>),
    /// Withdraw an item. `deposit_first` holds the items to keep; when set,
    /// everything else is deposited before the withdrawal.
    Withdraw {
        item: ItemId,
        slot: u16,
        quantity: Quantity,
        deposit_first: Option<Vec<ItemId>>,
    },
    Close,
}

/// The one action chosen for a tick.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    Interact(Interaction),
    Storage(StorageCommand),
}

impl Intent {
    pub fn interaction(&self) -> Option<&Interaction> {
        match self {
            Intent::Interact(interaction) => Some(interaction),
            Intent::Storage(_) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Intent::Interact(interaction) => interaction.verb.into(),
            Intent::Storage(StorageCommand::DepositAllExcept(_)) => "deposit-all-except",
            Intent::Storage(StorageCommand::Withdraw { .. }) => "withdraw",
            Intent::Storage(StorageCommand::Close) => "close-storage",
        }
    }
}

/// Keys the engine presses directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Enter,
}

/// Low-level input issued alongside (or instead of) an intent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputCommand {
    TypeText(String),
    PressKey(Key),
    /// Sleep for a uniformly drawn duration, in milliseconds.
    Sleep { min_ms: u64, max_ms: u64 },
    /// Click a random point offset from the viewport center.
    ClickRandomPoint { min_offset: i32, max_offset: i32 },
    /// Click inside `bounds` after `delay_ms`.
    ClickWithin { bounds: Rect, delay_ms: u64 },
    ToggleRun,
}

impl InputCommand {
    pub const fn sleep(min_ms: u64, max_ms: u64) -> Self {
        InputCommand::Sleep { min_ms, max_ms }
    }

    /// The center click used to trigger an injected interaction.
    pub const fn center_click() -> Self {
        InputCommand::ClickRandomPoint {
            min_offset: -100,
            max_offset: 100,
        }
    }
}

/// Classification of user-visible notices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoticeKind {
    /// A consumable or material is gone from both inventory and storage.
    /// Terminal for the session until a human intervenes.
    ResourceExhausted,

    /// An object that always exists in the right place is missing.
    EnvironmentMismatch,

    /// The inventory is in a shape the loop cannot resolve on its own.
    InventoryBlocked,
}

impl NoticeKind {
    /// True if the condition will repeat every tick until a human acts.
    pub const fn needs_human(&self) -> bool {
        matches!(self, Self::ResourceExhausted | Self::InventoryBlocked)
    }
}

/// A one-line message surfaced through the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl core::fmt::Display for Notice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
