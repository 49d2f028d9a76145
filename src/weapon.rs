//! Weapon catalog and cooldown-gated firing.

use serde::{Deserialize, Serialize};

use crate::entities::Bullet;
use crate::geometry::Vec2;
use crate::platform::Color;

/// Fire-rate upgrades never push a weapon's interval below this.
pub const MIN_FIRE_INTERVAL: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponKind {
    Pistol,
    Shotgun,
    Rifle,
    PlasmaGun,
}

/// Catalog entry for a weapon kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponStats {
    pub name: &'static str,
    pub damage: i32,
    /// Seconds between shots.
    pub fire_rate: f32,
    /// Pixels per second.
    pub bullet_speed: f32,
    pub bullet_count: u32,
    /// Radians between neighbouring bullets of one shot.
    pub spread_angle: f32,
    pub color: Color,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Pistol,
        WeaponKind::Shotgun,
        WeaponKind::Rifle,
        WeaponKind::PlasmaGun,
    ];

    pub fn stats(self) -> WeaponStats {
        match self {
            WeaponKind::Pistol => WeaponStats {
                name: "Pistol",
                damage: 10,
                fire_rate: 0.15,
                bullet_speed: 400.0,
                bullet_count: 1,
                spread_angle: 0.0,
                color: Color::rgb(255, 255, 100),
            },
            WeaponKind::Shotgun => WeaponStats {
                name: "Shotgun",
                damage: 8,
                fire_rate: 0.8,
                bullet_speed: 350.0,
                bullet_count: 5,
                spread_angle: 0.3,
                color: Color::rgb(255, 150, 50),
            },
            WeaponKind::Rifle => WeaponStats {
                name: "Rifle",
                damage: 25,
                fire_rate: 0.5,
                bullet_speed: 600.0,
                bullet_count: 1,
                spread_angle: 0.0,
                color: Color::rgb(100, 255, 100),
            },
            WeaponKind::PlasmaGun => WeaponStats {
                name: "Plasma Gun",
                damage: 15,
                fire_rate: 0.25,
                bullet_speed: 450.0,
                bullet_count: 2,
                spread_angle: 0.1,
                color: Color::rgb(150, 100, 255),
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub damage: i32,
    pub fire_rate: f32,
    pub bullet_speed: f32,
    pub bullet_count: u32,
    pub spread_angle: f32,
    /// Seconds until the next shot is allowed.
    pub cooldown: f32,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            damage: stats.damage,
            fire_rate: stats.fire_rate,
            bullet_speed: stats.bullet_speed,
            bullet_count: stats.bullet_count,
            spread_angle: stats.spread_angle,
            cooldown: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.stats().name
    }

    pub fn color(&self) -> Color {
        self.kind.stats().color
    }

    pub fn update(&mut self, dt: f32) {
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Fire from `origin` toward `angle`.
    ///
    /// Returns no bullets while cooling down. Otherwise the shot fans
    /// `bullet_count` bullets symmetrically around `angle`: bullet `i` is
    /// offset by `(i - (n - 1) / 2) × spread_angle`.
    pub fn shoot(&mut self, origin: Vec2, angle: f32) -> Vec<Bullet> {
        if !self.can_fire() {
            return Vec::new();
        }

        let color = self.color();
        let center = (self.bullet_count as f32 - 1.0) / 2.0;
        let bullets = (0..self.bullet_count)
            .map(|i| {
                let offset = (i as f32 - center) * self.spread_angle;
                Bullet::new(origin, angle + offset, self.bullet_speed, self.damage, color)
            })
            .collect();

        self.cooldown = self.fire_rate;
        bullets
    }

    /// Permanently scale the fire interval (e.g. 0.9 for 10% faster),
    /// floored at [`MIN_FIRE_INTERVAL`].
    pub fn scale_fire_rate(&mut self, factor: f32) {
        self.fire_rate = (self.fire_rate * factor).max(MIN_FIRE_INTERVAL);
    }
}
