//! Weapon slots, active powerups and coins.

use crate::entities::Player;
use crate::modifiers::SourceId;
use crate::powerup::{Powerup, PowerupKind};
use crate::weapon::{Weapon, WeaponKind};

pub const MAX_WEAPONS: usize = 3;

#[derive(Clone, Debug)]
pub struct Inventory {
    pub weapons: [Option<Weapon>; MAX_WEAPONS],
    pub active_weapon_index: usize,
    pub powerups: Vec<Powerup>,
    pub coins: u32,
    /// Product of all fire-rate upgrades bought so far. Applied to owned
    /// weapons at purchase time and to every weapon acquired later.
    pub fire_rate_factor: f32,
    next_source: u64,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Starts with a pistol in slot 0.
    pub fn new() -> Self {
        Self {
            weapons: [Some(Weapon::new(WeaponKind::Pistol)), None, None],
            active_weapon_index: 0,
            powerups: Vec::new(),
            coins: 0,
            fire_rate_factor: 1.0,
            next_source: 1,
        }
    }

    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.active_weapon_index)?.as_ref()
    }

    pub fn active_weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.weapons.get_mut(self.active_weapon_index)?.as_mut()
    }

    /// Select slot `index`. Empty or out-of-range slots are refused.
    pub fn switch_weapon(&mut self, index: usize) -> bool {
        match self.weapons.get(index) {
            Some(Some(_)) => {
                self.active_weapon_index = index;
                true
            }
            _ => false,
        }
    }

    /// Take a weapon of `kind` and make it active.
    ///
    /// An owned kind is just selected. Otherwise it goes into the first
    /// empty slot, or replaces the active weapon when all slots are full.
    /// Returns the slot it ended up in.
    pub fn add_weapon(&mut self, kind: WeaponKind) -> usize {
        if let Some(i) = self.slot_of(kind) {
            self.active_weapon_index = i;
            return i;
        }

        let slot = self
            .weapons
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.active_weapon_index);
        self.weapons[slot] = Some(self.new_weapon(kind));
        self.active_weapon_index = slot;
        slot
    }

    pub fn slot_of(&self, kind: WeaponKind) -> Option<usize> {
        self.weapons
            .iter()
            .position(|w| w.as_ref().is_some_and(|w| w.kind == kind))
    }

    /// Build a weapon with the accumulated fire-rate upgrades applied.
    pub fn new_weapon(&self, kind: WeaponKind) -> Weapon {
        let mut weapon = Weapon::new(kind);
        if self.fire_rate_factor != 1.0 {
            weapon.scale_fire_rate(self.fire_rate_factor);
        }
        weapon
    }

    /// Replace every slot from a saved layout.
    pub fn set_weapons(&mut self, kinds: &[Option<WeaponKind>], active: usize) {
        for i in 0..MAX_WEAPONS {
            let weapon = kinds.get(i).copied().flatten().map(|k| self.new_weapon(k));
            self.weapons[i] = weapon;
        }
        if !self.switch_weapon(active) {
            self.active_weapon_index = self
                .weapons
                .iter()
                .position(Option::is_some)
                .unwrap_or(0);
        }
    }

    pub fn weapon_kinds(&self) -> Vec<Option<WeaponKind>> {
        self.weapons.iter().map(|w| w.as_ref().map(|w| w.kind)).collect()
    }

    /// Permanently shorten the interval of every owned weapon (and of
    /// weapons acquired later) by `factor`.
    pub fn scale_fire_rates(&mut self, factor: f32) {
        self.fire_rate_factor *= factor;
        for weapon in self.weapons.iter_mut().flatten() {
            weapon.scale_fire_rate(factor);
        }
    }

    pub fn update_weapons(&mut self, dt: f32) {
        for weapon in self.weapons.iter_mut().flatten() {
            weapon.update(dt);
        }
    }

    /// Add a powerup of `kind` and activate it on `player` right away.
    pub fn add_powerup(&mut self, kind: PowerupKind, player: &mut Player) {
        let source = SourceId(self.next_source);
        self.next_source += 1;
        let mut powerup = Powerup::new(kind, source);
        powerup.activate(player);
        self.powerups.push(powerup);
    }

    /// Tick every powerup; expired ones are reversed and dropped.
    pub fn update_powerups(&mut self, dt: f32, player: &mut Player) {
        self.powerups.retain_mut(|p| p.update(dt, player));
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Deduct `amount` if affordable.
    pub fn spend_coins(&mut self, amount: u32) -> bool {
        if self.coins >= amount {
            self.coins -= amount;
            true
        } else {
            false
        }
    }
}
