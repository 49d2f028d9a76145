//! Weighted rarity table for enemy drops.
//!
//! | Tier      | Chance | Contents                                             |
//! |-----------|--------|------------------------------------------------------|
//! | Common    | 60%    | 70% small heal, else 1-3 coins                       |
//! | Uncommon  | 30%    | 60% medium heal, else Pistol/Shotgun                 |
//! | Rare      | 9%     | 40% powerup, 30% 5-10 coins, 30% Rifle/Plasma Gun    |
//! | Legendary | 1%     | 50% large heal, else Rifle/Plasma Gun                |

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{DropKind, HealSize};
use crate::powerup::PowerupKind;
use crate::weapon::WeaponKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// Map a roll in `0.0..100.0` to its tier.
pub fn rarity_for_roll(roll: f64) -> Rarity {
    if roll < 60.0 {
        Rarity::Common
    } else if roll < 90.0 {
        Rarity::Uncommon
    } else if roll < 99.0 {
        Rarity::Rare
    } else {
        Rarity::Legendary
    }
}

/// Roll whether a dead enemy drops anything, and what.
pub fn roll_drop(rng: &mut impl Rng, drop_chance: f64) -> Option<DropKind> {
    if rng.gen_bool(drop_chance.clamp(0.0, 1.0)) {
        Some(roll_loot(rng))
    } else {
        None
    }
}

fn weapon_from(rng: &mut impl Rng, kinds: &[WeaponKind]) -> DropKind {
    DropKind::Weapon(*kinds.choose(rng).unwrap_or(&WeaponKind::Pistol))
}

/// Pick a drop from the rarity table.
pub fn roll_loot(rng: &mut impl Rng) -> DropKind {
    let tier = rarity_for_roll(rng.gen_range(0.0..100.0));
    loot_for_tier(tier, rng)
}

pub fn loot_for_tier(tier: Rarity, rng: &mut impl Rng) -> DropKind {
    match tier {
        Rarity::Common => {
            if rng.gen_bool(0.7) {
                DropKind::Heal(HealSize::Small)
            } else {
                DropKind::Coin(rng.gen_range(1..=3))
            }
        }
        Rarity::Uncommon => {
            if rng.gen_bool(0.6) {
                DropKind::Heal(HealSize::Medium)
            } else {
                weapon_from(rng, &[WeaponKind::Pistol, WeaponKind::Shotgun])
            }
        }
        Rarity::Rare => {
            let choice: f64 = rng.gen();
            if choice < 0.4 {
                let kind = *PowerupKind::ALL.choose(rng).unwrap_or(&PowerupKind::Speed);
                DropKind::Powerup(kind)
            } else if choice < 0.7 {
                DropKind::Coin(rng.gen_range(5..=10))
            } else {
                weapon_from(rng, &[WeaponKind::Rifle, WeaponKind::PlasmaGun])
            }
        }
        Rarity::Legendary => {
            if rng.gen_bool(0.5) {
                DropKind::Heal(HealSize::Large)
            } else {
                weapon_from(rng, &[WeaponKind::Rifle, WeaponKind::PlasmaGun])
            }
        }
    }
}
