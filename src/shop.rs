//! Between-round upgrade shop.
//!
//! Upgrades are permanent and stack. Percentage upgrades compound on the
//! player's current permanent value, never on a temporarily buffed one.

use serde::{Deserialize, Serialize};

use crate::entities::Player;
use crate::geometry::{Rect, Vec2};
use crate::inventory::Inventory;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    Hp,
    Speed,
    Damage,
    FireRate,
}

#[derive(Clone, Debug)]
pub struct Upgrade {
    pub kind: UpgradeKind,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u32,
    /// Flat HP for `Hp`, a fraction for the others.
    pub value: f32,
    pub purchase_count: u32,
}

/// How many times each upgrade has been bought.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeCounts {
    pub hp: u32,
    pub speed: u32,
    pub damage: u32,
    pub fire_rate: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShopAction {
    Purchased(usize),
    /// Clicked an upgrade the player cannot afford.
    Rejected(usize),
    Continue,
}

const BUTTON_WIDTH: f32 = 350.0;
const BUTTON_HEIGHT: f32 = 70.0;
const BUTTON_SPACING: f32 = 15.0;
const BUTTONS_TOP: f32 = 160.0;
const CONTINUE_WIDTH: f32 = 200.0;
const CONTINUE_HEIGHT: f32 = 50.0;

#[derive(Clone, Debug)]
pub struct UpgradeShop {
    pub upgrades: Vec<Upgrade>,
    pub time_limit: f32,
    pub time_remaining: f32,
    width: f32,
    height: f32,
}

impl UpgradeShop {
    pub fn new(time_limit: f32, width: f32, height: f32) -> Self {
        let upgrade = |kind, name, description, cost, value| Upgrade {
            kind,
            name,
            description,
            cost,
            value,
            purchase_count: 0,
        };
        Self {
            upgrades: vec![
                upgrade(UpgradeKind::Hp, "Max HP +20", "Increase maximum health by 20", 50, 20.0),
                upgrade(UpgradeKind::Speed, "Speed +10%", "Move 10% faster", 40, 0.1),
                upgrade(UpgradeKind::Damage, "Damage +15%", "Deal 15% more damage", 60, 0.15),
                upgrade(UpgradeKind::FireRate, "Fire Rate +10%", "Shoot 10% faster", 50, 0.1),
            ],
            time_limit,
            time_remaining: time_limit,
            width,
            height,
        }
    }

    pub fn reset_timer(&mut self) {
        self.time_remaining = self.time_limit;
    }

    /// Tick the countdown. Returns `true` once time is up.
    pub fn update(&mut self, dt: f32) -> bool {
        self.time_remaining = (self.time_remaining - dt).max(0.0);
        self.time_remaining <= 0.0
    }

    pub fn can_afford(&self, index: usize, inventory: &Inventory) -> bool {
        self.upgrades
            .get(index)
            .is_some_and(|u| inventory.coins >= u.cost)
    }

    /// Buy upgrade `index`. Refused (returns `false`, nothing changes) when
    /// the index is unknown or coins are short.
    pub fn purchase(
        &mut self,
        index: usize,
        player: &mut Player,
        inventory: &mut Inventory,
    ) -> bool {
        let Some(upgrade) = self.upgrades.get_mut(index) else {
            return false;
        };
        if !inventory.spend_coins(upgrade.cost) {
            return false;
        }
        apply_upgrade(upgrade.kind, upgrade.value, player, inventory);
        upgrade.purchase_count += 1;
        tracing::info!("Bought {} (x{})", upgrade.name, upgrade.purchase_count);
        true
    }

    pub fn counts(&self) -> UpgradeCounts {
        let count = |kind| {
            self.upgrades
                .iter()
                .find(|u| u.kind == kind)
                .map_or(0, |u| u.purchase_count)
        };
        UpgradeCounts {
            hp: count(UpgradeKind::Hp),
            speed: count(UpgradeKind::Speed),
            damage: count(UpgradeKind::Damage),
            fire_rate: count(UpgradeKind::FireRate),
        }
    }

    /// Restore purchase counts only; the stats themselves are saved directly.
    pub fn set_counts(&mut self, counts: UpgradeCounts) {
        for upgrade in &mut self.upgrades {
            upgrade.purchase_count = match upgrade.kind {
                UpgradeKind::Hp => counts.hp,
                UpgradeKind::Speed => counts.speed,
                UpgradeKind::Damage => counts.damage,
                UpgradeKind::FireRate => counts.fire_rate,
            };
        }
    }

    /// Fire-interval factor matching `count` fire-rate purchases.
    pub fn fire_rate_factor(&self, count: u32) -> f32 {
        let value = self
            .upgrades
            .iter()
            .find(|u| u.kind == UpgradeKind::FireRate)
            .map_or(0.0, |u| u.value);
        (1.0 - value).powi(count as i32)
    }

    pub fn upgrade_button(&self, index: usize) -> Rect {
        Rect::new(
            (self.width - BUTTON_WIDTH) / 2.0,
            BUTTONS_TOP + index as f32 * (BUTTON_HEIGHT + BUTTON_SPACING),
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        )
    }

    pub fn continue_button(&self) -> Rect {
        Rect::new(
            (self.width - CONTINUE_WIDTH) / 2.0,
            self.height - 70.0,
            CONTINUE_WIDTH,
            CONTINUE_HEIGHT,
        )
    }

    /// Resolve a click: continue button, an upgrade, or nothing.
    pub fn handle_click(
        &mut self,
        point: Vec2,
        player: &mut Player,
        inventory: &mut Inventory,
    ) -> Option<ShopAction> {
        if self.continue_button().contains(point) {
            return Some(ShopAction::Continue);
        }
        let index = (0..self.upgrades.len()).find(|&i| self.upgrade_button(i).contains(point))?;
        if self.purchase(index, player, inventory) {
            Some(ShopAction::Purchased(index))
        } else {
            Some(ShopAction::Rejected(index))
        }
    }
}

/// Apply one purchase of `kind` with strength `value`.
pub fn apply_upgrade(
    kind: UpgradeKind,
    value: f32,
    player: &mut Player,
    inventory: &mut Inventory,
) {
    match kind {
        UpgradeKind::Hp => {
            let amount = value as i32;
            player.max_hp += amount;
            player.hp = (player.hp + amount).min(player.max_hp);
        }
        UpgradeKind::Speed => {
            player.base_speed += player.base_speed * value;
        }
        UpgradeKind::Damage => {
            player.base_damage += (player.base_damage as f32 * value) as i32;
        }
        UpgradeKind::FireRate => {
            inventory.scale_fire_rates(1.0 - value);
        }
    }
}
