//! Battlefield entities: state, per-frame update and collision bounds.

use rand::Rng;

use crate::config::PlayerConfig;
use crate::geometry::{within_radius, Rect, Vec2};
use crate::inventory::Inventory;
use crate::modifiers::{ModifierStack, SourceId, Stat};
use crate::platform::{Color, HeldKeys};
use crate::powerup::PowerupKind;
use crate::weapon::WeaponKind;

pub const PLAYER_SIZE: f32 = 32.0;
pub const ENEMY_SIZE: f32 = 28.0;
pub const BULLET_RADIUS: f32 = 4.0;
pub const DROP_SIZE: f32 = 16.0;

/// Seconds between two contact attacks from the same enemy.
pub const ENEMY_ATTACK_INTERVAL: f32 = 1.0;
/// Enemies appear this far outside the viewport.
pub const SPAWN_OFFSET: f32 = 20.0;
/// Bullets are culled once their centre is this far past any edge.
pub const BULLET_CULL_MARGIN: f32 = 50.0;

pub const DROP_LIFETIME: f32 = 30.0;
pub const DROP_BLINK_TIME: f32 = 5.0;
pub const DROP_PICKUP_RADIUS: f32 = 25.0;

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    /// Permanent speed (config value plus shop upgrades), pixels per second.
    pub base_speed: f32,
    /// Permanent damage (config value plus shop upgrades).
    pub base_damage: i32,
    /// Facing angle in radians, toward the pointer.
    pub angle: f32,
    /// Absorbs the next hit, then breaks. Holds the powerup that raised it.
    pub shield: Option<SourceId>,
    /// Temporary buffs layered over the base stats.
    pub modifiers: ModifierStack,
}

impl Player {
    pub fn new(pos: Vec2, config: &PlayerConfig) -> Self {
        Self {
            pos,
            hp: config.max_hp,
            max_hp: config.max_hp,
            base_speed: config.speed,
            base_damage: config.damage,
            angle: 0.0,
            shield: None,
            modifiers: ModifierStack::new(),
        }
    }

    /// Effective speed with all active buffs applied.
    pub fn speed(&self) -> f32 {
        self.modifiers.apply(Stat::Speed, self.base_speed)
    }

    /// Effective damage with all active buffs applied (truncated).
    pub fn damage(&self) -> i32 {
        self.modifiers.apply(Stat::Damage, self.base_damage as f32) as i32
    }

    pub fn is_invincible(&self) -> bool {
        self.modifiers.is_invincible()
    }

    pub fn has_shield(&self) -> bool {
        self.shield.is_some()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, PLAYER_SIZE)
    }

    /// Move from the held direction keys and turn toward `pointer`.
    ///
    /// Diagonal input is normalised, so every direction covers
    /// `speed × dt`. The whole collision box stays on screen.
    pub fn update(&mut self, held: &HeldKeys, pointer: Vec2, width: f32, height: f32, dt: f32) {
        let mut dir = Vec2::ZERO;
        if held.up {
            dir.y -= 1.0;
        }
        if held.down {
            dir.y += 1.0;
        }
        if held.left {
            dir.x -= 1.0;
        }
        if held.right {
            dir.x += 1.0;
        }

        self.pos += dir.normalized_or_zero() * (self.speed() * dt);

        let half = PLAYER_SIZE / 2.0;
        self.pos.x = self.pos.x.clamp(half, (width - half).max(half));
        self.pos.y = self.pos.y.clamp(half, (height - half).max(half));

        self.angle = (pointer - self.pos).angle();
    }

    /// Apply an incoming hit. Invincibility blocks it, a shield absorbs it
    /// and breaks. Returns whether the player is still alive.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.is_invincible() {
            return true;
        }
        if self.shield.take().is_some() {
            return true;
        }
        self.hp = (self.hp - amount.max(0)).clamp(0, self.max_hp);
        self.hp > 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

/// Stats an enemy is spawned with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    pub hp: i32,
    pub speed: f32,
    pub damage: i32,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    pub speed: f32,
    pub damage: i32,
    /// Seconds until this enemy may attack again.
    pub attack_cooldown: f32,
    pub alive: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, stats: EnemyStats) -> Self {
        let hp = stats.hp.max(1);
        Self {
            pos,
            hp,
            max_hp: hp,
            speed: stats.speed,
            damage: stats.damage,
            attack_cooldown: 0.0,
            alive: true,
        }
    }

    /// Spawn just outside a random screen edge.
    pub fn spawn_at_edge(width: f32, height: f32, stats: EnemyStats, rng: &mut impl Rng) -> Self {
        let pos = match rng.gen_range(0..4) {
            0 => Vec2::new(rng.gen_range(0.0..=width), -SPAWN_OFFSET),
            1 => Vec2::new(rng.gen_range(0.0..=width), height + SPAWN_OFFSET),
            2 => Vec2::new(-SPAWN_OFFSET, rng.gen_range(0.0..=height)),
            _ => Vec2::new(width + SPAWN_OFFSET, rng.gen_range(0.0..=height)),
        };
        Self::new(pos, stats)
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, ENEMY_SIZE)
    }

    /// Chase `target` and tick the attack cooldown. Dead enemies are inert.
    pub fn update(&mut self, target: Vec2, dt: f32) {
        if !self.alive {
            return;
        }
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);

        let to_target = target - self.pos;
        let distance = to_target.length();
        if distance <= f32::EPSILON {
            return;
        }
        // Never overshoot the target in one step.
        let step = (self.speed * dt).min(distance);
        self.pos += to_target * (step / distance);
    }

    /// Returns `true` only for the hit that kills the enemy.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = (self.hp - amount.max(0)).max(0);
        if self.hp == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Contact attack gated by the personal cooldown. Returns whether an
    /// attack was made (it may still have been blocked by shield or
    /// invincibility).
    pub fn try_attack(&mut self, player: &mut Player) -> bool {
        if !self.alive || self.attack_cooldown > 0.0 {
            return false;
        }
        player.take_damage(self.damage);
        self.attack_cooldown = ENEMY_ATTACK_INTERVAL;
        true
    }
}

// ── Bullet ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed at creation; later weapon upgrades do not change it.
    pub damage: i32,
    pub color: Color,
}

impl Bullet {
    pub fn new(pos: Vec2, angle: f32, speed: f32, damage: i32, color: Color) -> Self {
        Self {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            damage,
            color,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        self.pos.x < -BULLET_CULL_MARGIN
            || self.pos.x > width + BULLET_CULL_MARGIN
            || self.pos.y < -BULLET_CULL_MARGIN
            || self.pos.y > height + BULLET_CULL_MARGIN
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, BULLET_RADIUS * 2.0)
    }
}

// ── Drops ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealSize {
    Small,
    Medium,
    Large,
}

impl HealSize {
    pub fn amount(self) -> i32 {
        match self {
            HealSize::Small => 20,
            HealSize::Medium => 40,
            HealSize::Large => 75,
        }
    }
}

/// What a drop gives when collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropKind {
    Heal(HealSize),
    Weapon(WeaponKind),
    Powerup(PowerupKind),
    Coin(u32),
}

impl DropKind {
    pub fn name(&self) -> String {
        match self {
            DropKind::Heal(HealSize::Small) => "Small Health".to_string(),
            DropKind::Heal(HealSize::Medium) => "Medium Health".to_string(),
            DropKind::Heal(HealSize::Large) => "Large Health".to_string(),
            DropKind::Weapon(kind) => format!("Weapon: {}", kind.stats().name),
            DropKind::Powerup(kind) => format!("Powerup: {}", kind.name()),
            DropKind::Coin(value) => format!("Coin ({value})"),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            DropKind::Heal(HealSize::Small) => Color::rgb(100, 255, 100),
            DropKind::Heal(HealSize::Medium) => Color::rgb(50, 200, 50),
            DropKind::Heal(HealSize::Large) => Color::rgb(0, 255, 0),
            DropKind::Weapon(_) => Color::rgb(255, 180, 50),
            DropKind::Powerup(_) => Color::rgb(255, 100, 255),
            DropKind::Coin(_) => Color::rgb(255, 215, 0),
        }
    }

    /// Give the drop's payload to the player. Powerups activate at once.
    pub fn apply(self, player: &mut Player, inventory: &mut Inventory) {
        match self {
            DropKind::Heal(size) => player.heal(size.amount()),
            DropKind::Weapon(kind) => {
                inventory.add_weapon(kind);
            }
            DropKind::Powerup(kind) => inventory.add_powerup(kind, player),
            DropKind::Coin(value) => inventory.add_coins(value),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Drop {
    pub pos: Vec2,
    pub kind: DropKind,
    /// Seconds until the drop despawns.
    pub lifetime: f32,
    pub alive: bool,
}

impl Drop {
    pub fn new(pos: Vec2, kind: DropKind) -> Self {
        Self {
            pos,
            kind,
            lifetime: DROP_LIFETIME,
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.alive = false;
        }
    }

    pub fn can_pickup(&self, player_pos: Vec2) -> bool {
        self.alive && within_radius(self.pos, player_pos, DROP_PICKUP_RADIUS)
    }

    /// Take the drop if the player is in range. A drop yields its payload
    /// at most once; afterwards it is dead and returns `None`.
    pub fn collect(&mut self, player_pos: Vec2) -> Option<DropKind> {
        if !self.can_pickup(player_pos) {
            return None;
        }
        self.alive = false;
        Some(self.kind)
    }

    /// The final seconds before despawn, shown as blinking.
    pub fn is_blinking(&self) -> bool {
        self.alive && self.lifetime < DROP_BLINK_TIME
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, DROP_SIZE)
    }
}
