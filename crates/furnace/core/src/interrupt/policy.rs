//! Disruptor categories, the id catalog, and the dismiss policy.
use std::collections::BTreeMap;

use crate::ids::NpcId;

/// Category of a random-event NPC.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisruptorKind {
    Beekeeper,
    DrillDemon,
    FreakyForester,
    Frog,
    Genie,
    Jekyll,
    DrunkenDwarf,
    EvilBob,
    Gravedigger,
    MysteriousOldMan,
    QuizMaster,
    Dunce,
    SandwichLady,
    /// Catalogued events without their own policy flag.
    Other,
}

impl DisruptorKind {
    /// The one category whose dialogue has to be continued before dismissal.
    pub const fn has_dialogue_step(self) -> bool {
        matches!(self, DisruptorKind::Genie)
    }
}

/// Maps NPC ids to disruptor categories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisruptorCatalog {
    entries: BTreeMap<NpcId, DisruptorKind>,
}

impl DisruptorCatalog {
    /// Every known random-event NPC. Most events have a legacy id and a
    /// current one; both are listed.
    const DEFAULTS: &'static [(u32, DisruptorKind)] = &[
        (6747, DisruptorKind::Beekeeper),
        (6743, DisruptorKind::DrillDemon),
        (6748, DisruptorKind::FreakyForester),
        (5429, DisruptorKind::Frog),
        (326, DisruptorKind::Genie),
        (327, DisruptorKind::Genie),
        (313, DisruptorKind::Jekyll),
        (314, DisruptorKind::Jekyll),
        (322, DisruptorKind::DrunkenDwarf),
        (390, DisruptorKind::EvilBob),
        (6754, DisruptorKind::EvilBob),
        (6746, DisruptorKind::Gravedigger),
        (6750, DisruptorKind::MysteriousOldMan),
        (6751, DisruptorKind::MysteriousOldMan),
        (6752, DisruptorKind::MysteriousOldMan),
        (6753, DisruptorKind::MysteriousOldMan),
        (6755, DisruptorKind::QuizMaster),
        (6749, DisruptorKind::Dunce),
        (6739, DisruptorKind::SandwichLady),
        // Capt' Arnav
        (6741, DisruptorKind::Other),
        // Flippa
        (6744, DisruptorKind::Other),
        // Niles, Miles, Giles
        (5436, DisruptorKind::Other),
        (5437, DisruptorKind::Other),
        (5438, DisruptorKind::Other),
        (5439, DisruptorKind::Other),
        (5440, DisruptorKind::Other),
        (5441, DisruptorKind::Other),
        // Pillory guard
        (380, DisruptorKind::Other),
        // Postie Pete
        (6738, DisruptorKind::Other),
        // Rick Turpentine
        (375, DisruptorKind::Other),
        (376, DisruptorKind::Other),
    ];

    /// Built-in table extended with host-supplied entries. Extra entries win.
    pub fn with_extra(extra: &[(NpcId, DisruptorKind)]) -> Self {
        let mut catalog = Self::default();
        for &(id, kind) in extra {
            catalog.insert(id, kind);
        }
        catalog
    }

    pub fn insert(&mut self, id: NpcId, kind: DisruptorKind) {
        self.entries.insert(id, kind);
    }

    pub fn kind_of(&self, id: NpcId) -> Option<DisruptorKind> {
        self.entries.get(&id).copied()
    }
}

impl Default for DisruptorCatalog {
    fn default() -> Self {
        let entries = Self::DEFAULTS
            .iter()
            .map(|&(id, kind)| (NpcId(id), kind))
            .collect();
        Self { entries }
    }
}

/// Which disruptor categories are dismissed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DismissPolicy {
    /// Overrides every per-category flag, including [`DisruptorKind::Other`].
    pub dismiss_all: bool,
    pub beekeeper: bool,
    pub drill_demon: bool,
    pub freaky_forester: bool,
    pub frog: bool,
    pub genie: bool,
    pub jekyll: bool,
    pub drunken_dwarf: bool,
    pub evil_bob: bool,
    pub gravedigger: bool,
    pub mysterious_old_man: bool,
    pub quiz_master: bool,
    pub dunce: bool,
    pub sandwich_lady: bool,
}

impl Default for DismissPolicy {
    fn default() -> Self {
        Self {
            dismiss_all: false,
            beekeeper: true,
            drill_demon: true,
            freaky_forester: true,
            frog: true,
            genie: true,
            jekyll: true,
            drunken_dwarf: true,
            evil_bob: true,
            gravedigger: true,
            mysterious_old_man: true,
            quiz_master: true,
            dunce: true,
            sandwich_lady: true,
        }
    }
}

impl DismissPolicy {
    /// Policy that dismisses nothing unless `dismiss_all` is later set.
    pub fn none() -> Self {
        Self {
            dismiss_all: false,
            beekeeper: false,
            drill_demon: false,
            freaky_forester: false,
            frog: false,
            genie: false,
            jekyll: false,
            drunken_dwarf: false,
            evil_bob: false,
            gravedigger: false,
            mysterious_old_man: false,
            quiz_master: false,
            dunce: false,
            sandwich_lady: false,
        }
    }

    pub fn should_dismiss(&self, kind: DisruptorKind) -> bool {
        if self.dismiss_all {
            return true;
        }
        match kind {
            DisruptorKind::Beekeeper => self.beekeeper,
            DisruptorKind::DrillDemon => self.drill_demon,
            DisruptorKind::FreakyForester => self.freaky_forester,
            DisruptorKind::Frog => self.frog,
            DisruptorKind::Genie => self.genie,
            DisruptorKind::Jekyll => self.jekyll,
            DisruptorKind::DrunkenDwarf => self.drunken_dwarf,
            DisruptorKind::EvilBob => self.evil_bob,
            DisruptorKind::Gravedigger => self.gravedigger,
            DisruptorKind::MysteriousOldMan => self.mysterious_old_man,
            DisruptorKind::QuizMaster => self.quiz_master,
            DisruptorKind::Dunce => self.dunce,
            DisruptorKind::SandwichLady => self.sandwich_lady,
            DisruptorKind::Other => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn dismiss_all_overrides_every_category() {
        let policy = DismissPolicy {
            dismiss_all: true,
            ..DismissPolicy::none()
        };
        assert!(DisruptorKind::iter().all(|kind| policy.should_dismiss(kind)));
    }

    #[test]
    fn uncategorized_events_are_kept_without_override() {
        assert!(!DismissPolicy::default().should_dismiss(DisruptorKind::Other));
        assert!(DismissPolicy::default().should_dismiss(DisruptorKind::Frog));
        assert!(!DismissPolicy::none().should_dismiss(DisruptorKind::Frog));
    }

    #[test]
    fn extra_catalog_entries_override_defaults() {
        let catalog = DisruptorCatalog::with_extra(&[
            (NpcId(9_999), DisruptorKind::Genie),
            (NpcId(5429), DisruptorKind::Other),
        ]);
        assert_eq!(catalog.kind_of(NpcId(9_999)), Some(DisruptorKind::Genie));
        assert_eq!(catalog.kind_of(NpcId(5429)), Some(DisruptorKind::Other));
        assert_eq!(catalog.kind_of(NpcId(1)), None);
    }

    #[test]
    fn every_flagged_category_has_a_builtin_id() {
        let catalog = DisruptorCatalog::default();
        for kind in DisruptorKind::iter().filter(|&kind| kind != DisruptorKind::Other) {
            assert!(
                DisruptorCatalog::DEFAULTS
                    .iter()
                    .any(|&(id, entry)| entry == kind && catalog.kind_of(NpcId(id)) == Some(kind)),
                "no built-in id for {kind}"
            );
        }
    }

    #[test]
    fn both_genie_ids_are_known() {
        let catalog = DisruptorCatalog::default();
        assert_eq!(catalog.kind_of(NpcId(326)), Some(DisruptorKind::Genie));
        assert_eq!(catalog.kind_of(NpcId(327)), Some(DisruptorKind::Genie));
        assert_eq!(catalog.kind_of(NpcId(322)), Some(DisruptorKind::DrunkenDwarf));
    }

    #[test]
    fn only_genie_has_a_dialogue_step() {
        let with_step: Vec<_> = DisruptorKind::iter()
            .filter(|kind| kind.has_dialogue_step())
            .collect();
        assert_eq!(with_step, vec![DisruptorKind::Genie]);
    }
}
