use crate::{Move, RunState};
use serde::{Deserialize, Serialize};

/// A boon offered between fights, already classified into the shape
/// the engine reasons about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LootOption {
    Heal(i64),
    AddMaxHealth(i64),
    AddMaxArmor(i64),
    UpgradeRock(i64, i64),
    UpgradePaper(i64, i64),
    UpgradeScissor(i64, i64),
    GrantCharges { rock: i8, paper: i8, scissor: i8 },
    /// Anything the classifier could not place. Valued at zero.
    Unknown,
}

impl LootOption {
    pub fn upgraded_move(&self) -> Option<Move> {
        match self {
            LootOption::UpgradeRock(..) => Some(Move::Rock),
            LootOption::UpgradePaper(..) => Some(Move::Paper),
            LootOption::UpgradeScissor(..) => Some(Move::Scissor),
            _ => None,
        }
    }
}

/// A loot offer as the game server sends it: a type discriminator,
/// a human label, and up to two integer value slots. Charge grants
/// carry explicit per-move fields instead of overloading the slots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LootOffer {
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub value2: i64,
    #[serde(default)]
    pub rock: i8,
    #[serde(default)]
    pub paper: i8,
    #[serde(default)]
    pub scissor: i8,
}

/// Maps a raw offer onto the typed sum. Canonical tags are accepted
/// as-is; otherwise the kind and label are matched by keyword, most
/// specific first (max-hp and max-armor before plain heals).
pub fn classify(offer: &LootOffer) -> LootOption {
    match offer.kind.as_str() {
        "Heal" => return LootOption::Heal(offer.value),
        "AddMaxHealth" => return LootOption::AddMaxHealth(offer.value),
        "AddMaxArmor" => return LootOption::AddMaxArmor(offer.value),
        "UpgradeRock" => return LootOption::UpgradeRock(offer.value, offer.value2),
        "UpgradePaper" => return LootOption::UpgradePaper(offer.value, offer.value2),
        "UpgradeScissor" => return LootOption::UpgradeScissor(offer.value, offer.value2),
        "GrantCharges" => {
            return LootOption::GrantCharges {
                rock: offer.rock,
                paper: offer.paper,
                scissor: offer.scissor,
            }
        }
        _ => {}
    }

    let haystack = normalize(&format!("{} {}", offer.kind, offer.label));
    let has = |needle: &str| haystack.contains(needle);

    if has("maxhealth") || has("hp") || has("vitality") {
        LootOption::AddMaxHealth(offer.value)
    } else if has("maxarmor") || has("armor") {
        LootOption::AddMaxArmor(offer.value)
    } else if has("heal") || has("potion") {
        LootOption::Heal(offer.value)
    } else if has("rock") || has("sword") {
        LootOption::UpgradeRock(offer.value, offer.value2)
    } else if has("paper") || has("shield") {
        LootOption::UpgradePaper(offer.value, offer.value2)
    } else if has("scissor") || has("spell") || has("magic") {
        LootOption::UpgradeScissor(offer.value, offer.value2)
    } else if has("charge") || has("ammo") {
        let each = offer.value.clamp(0, 3) as i8;
        LootOption::GrantCharges {
            rock: each,
            paper: each,
            scissor: each,
        }
    } else {
        LootOption::Unknown
    }
}

/// Lowercases and strips everything non-alphanumeric, so labels like
/// "Max Health +5" match the "maxhealth" keyword.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

impl RunState {
    /// Applies a loot effect in place. All effects cap: heals at max
    /// health, armor at max armor, charges at the charge cap.
    pub fn apply_loot(&mut self, loot: &LootOption) {
        match *loot {
            LootOption::Heal(amount) => self.player.health.gain(amount),
            LootOption::AddMaxHealth(amount) => self.player.health.raise_max(amount),
            LootOption::AddMaxArmor(amount) => {
                self.player.armor.max += amount.max(0);
                self.player.armor.gain(amount);
            }
            LootOption::UpgradeRock(atk, def) => {
                self.player.rock.atk += atk;
                self.player.rock.def += def;
            }
            LootOption::UpgradePaper(atk, def) => {
                self.player.paper.atk += atk;
                self.player.paper.def += def;
            }
            LootOption::UpgradeScissor(atk, def) => {
                self.player.scissor.atk += atk;
                self.player.scissor.def += def;
            }
            LootOption::GrantCharges {
                rock,
                paper,
                scissor,
            } => {
                self.player.rock.grant_charges(rock);
                self.player.paper.grant_charges(paper);
                self.player.scissor.grant_charges(scissor);
            }
            LootOption::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Fighter, Gauge, MoveStat};

    fn offer(kind: &str, label: &str, value: i64, value2: i64) -> LootOffer {
        LootOffer {
            kind: kind.to_string(),
            label: label.to_string(),
            value,
            value2,
            rock: 0,
            paper: 0,
            scissor: 0,
        }
    }

    macro_rules! classify_case {
        ($name:ident, $kind:expr, $label:expr, $expected:expr) => {
            #[test]
            fn $name() {
                assert_eq!(classify(&offer($kind, $label, 5, 1)), $expected);
            }
        };
    }

    classify_case!(canonical_heal, "Heal", "", LootOption::Heal(5));
    classify_case!(
        canonical_max_health,
        "AddMaxHealth",
        "",
        LootOption::AddMaxHealth(5)
    );
    classify_case!(
        canonical_rock,
        "UpgradeRock",
        "",
        LootOption::UpgradeRock(5, 1)
    );
    classify_case!(
        label_vitality,
        "boon",
        "Elixir of Vitality",
        LootOption::AddMaxHealth(5)
    );
    classify_case!(
        label_spaced_max_health,
        "boon",
        "Max Health +5",
        LootOption::AddMaxHealth(5)
    );
    classify_case!(
        label_armor_beats_heal,
        "boon",
        "Healing armor plate",
        LootOption::AddMaxArmor(5)
    );
    classify_case!(
        label_potion,
        "boon",
        "Minor Potion",
        LootOption::Heal(5)
    );
    classify_case!(
        label_sword,
        "boon",
        "Rusty Sword",
        LootOption::UpgradeRock(5, 1)
    );
    classify_case!(
        label_shield,
        "boon",
        "Tower Shield",
        LootOption::UpgradePaper(5, 1)
    );
    classify_case!(
        label_magic,
        "boon",
        "Magic focus",
        LootOption::UpgradeScissor(5, 1)
    );
    classify_case!(label_unknown, "boon", "Mystery box", LootOption::Unknown);

    #[test]
    fn canonical_grant_charges_uses_per_move_fields() {
        let mut raw = offer("GrantCharges", "", 0, 0);
        raw.rock = 2;
        raw.scissor = 1;
        assert_eq!(
            classify(&raw),
            LootOption::GrantCharges {
                rock: 2,
                paper: 0,
                scissor: 1
            }
        );
    }

    fn state() -> RunState {
        RunState {
            player: Fighter {
                health: Gauge::new(12, 30),
                armor: Gauge::new(1, 5),
                rock: MoveStat::new(4, 0, 2),
                paper: MoveStat::new(2, 2, 3),
                scissor: MoveStat::new(3, 1, -1),
            },
            enemies: Vec::new(),
            current_enemy_index: 0,
            loot_phase: true,
            loot_options: Vec::new(),
            total_rooms: None,
            current_room_index: None,
        }
    }

    #[test]
    fn heal_caps_at_max() {
        let mut s = state();
        s.apply_loot(&LootOption::Heal(100));
        assert_eq!(s.player.health.current, 30);
        assert_eq!(s.player.health.max, 30);
    }

    #[test]
    fn max_health_raises_both() {
        let mut s = state();
        s.apply_loot(&LootOption::AddMaxHealth(4));
        assert_eq!(s.player.health.current, 16);
        assert_eq!(s.player.health.max, 34);
    }

    #[test]
    fn max_armor_raises_cap_and_fills() {
        let mut s = state();
        s.apply_loot(&LootOption::AddMaxArmor(3));
        assert_eq!(s.player.armor.max, 8);
        assert_eq!(s.player.armor.current, 4);
    }

    #[test]
    fn charge_grant_clamps_at_cap() {
        let mut s = state();
        s.apply_loot(&LootOption::GrantCharges {
            rock: 3,
            paper: 3,
            scissor: 1,
        });
        assert_eq!(s.player.rock.charges, 3);
        assert_eq!(s.player.paper.charges, 3);
        assert_eq!(s.player.scissor.charges, 0);
    }

    #[test]
    fn non_heal_loot_keeps_stacking() {
        let mut once = state();
        once.apply_loot(&LootOption::UpgradeRock(2, 0));
        let mut twice = once.clone();
        twice.apply_loot(&LootOption::UpgradeRock(2, 0));
        assert_ne!(once, twice);
    }

    #[test]
    fn weapon_upgrade_adds_both_slots() {
        let mut s = state();
        s.apply_loot(&LootOption::UpgradeScissor(2, 1));
        assert_eq!(s.player.scissor.atk, 5);
        assert_eq!(s.player.scissor.def, 2);
    }
}
