//! # Chest Loot
//!
//! The fixed loot table treasure chests draw from. Items carry the minimal
//! stats the world core records; inventory and equipment systems live in
//! external collaborators.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Broad item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
}

/// A lootable item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    /// Damage dice, e.g. "1d8". Empty for armor.
    pub damage: String,
    pub defense: u32,
    /// Hands required to wield. Armor takes none.
    pub hands: u32,
}

struct LootEntry {
    name: &'static str,
    kind: ItemKind,
    damage: &'static str,
    defense: u32,
    hands: u32,
}

const LOOT_TABLE: &[LootEntry] = &[
    LootEntry { name: "Rusty Sword", kind: ItemKind::Weapon, damage: "1d8", defense: 0, hands: 1 },
    LootEntry { name: "Iron Axe", kind: ItemKind::Weapon, damage: "1d8", defense: 0, hands: 1 },
    LootEntry { name: "Greatsword", kind: ItemKind::Weapon, damage: "1d10", defense: 0, hands: 2 },
    LootEntry { name: "Leather Helm", kind: ItemKind::Armor, damage: "", defense: 1, hands: 0 },
    LootEntry { name: "Steel Cuirass", kind: ItemKind::Armor, damage: "", defense: 3, hands: 0 },
    LootEntry { name: "Chain Glove", kind: ItemKind::Armor, damage: "", defense: 1, hands: 0 },
    LootEntry { name: "Plated Greaves", kind: ItemKind::Armor, damage: "", defense: 2, hands: 0 },
    LootEntry { name: "Worn Boots", kind: ItemKind::Armor, damage: "", defense: 1, hands: 0 },
    LootEntry { name: "Wooden Shield", kind: ItemKind::Armor, damage: "", defense: 2, hands: 0 },
];

/// Draws a uniformly random item from the loot table.
pub fn random_item(rng: &mut StdRng) -> Item {
    let entry = &LOOT_TABLE[rng.gen_range(0..LOOT_TABLE.len())];
    Item {
        name: entry.name.to_string(),
        kind: entry.kind,
        damage: entry.damage.to_string(),
        defense: entry.defense,
        hands: entry.hands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{utils, GenerationConfig};

    #[test]
    fn test_random_item_is_from_table() {
        let mut rng = utils::create_rng(&GenerationConfig::for_testing(1));
        for _ in 0..50 {
            let item = random_item(&mut rng);
            assert!(LOOT_TABLE.iter().any(|e| e.name == item.name));
            match item.kind {
                ItemKind::Weapon => assert!(!item.damage.is_empty()),
                ItemKind::Armor => assert_eq!(item.hands, 0),
            }
        }
    }
}
