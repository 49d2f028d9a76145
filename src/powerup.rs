//! Timed player buffs.
//!
//! A powerup goes through `activate` and `deactivate` exactly once each, in
//! that order. Its stat effects live on the player's modifier stack under
//! the powerup's own [`SourceId`], so expiry removes precisely what this
//! powerup added regardless of what else is active.

use serde::{Deserialize, Serialize};

use crate::entities::Player;
use crate::modifiers::{Effect, SourceId, Stat};
use crate::platform::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerupKind {
    Speed,
    Damage,
    Shield,
    Invincibility,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Speed,
        PowerupKind::Damage,
        PowerupKind::Shield,
        PowerupKind::Invincibility,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PowerupKind::Speed => "Speed Boost",
            PowerupKind::Damage => "Damage Boost",
            PowerupKind::Shield => "Shield",
            PowerupKind::Invincibility => "Invincibility",
        }
    }

    /// Seconds the buff lasts.
    pub fn duration(self) -> f32 {
        match self {
            PowerupKind::Speed | PowerupKind::Damage => 10.0,
            PowerupKind::Shield => 15.0,
            PowerupKind::Invincibility => 5.0,
        }
    }

    pub fn color(self) -> Color {
        match self {
            PowerupKind::Speed => Color::rgb(100, 200, 255),
            PowerupKind::Damage => Color::rgb(255, 100, 100),
            PowerupKind::Shield => Color::rgb(100, 255, 255),
            PowerupKind::Invincibility => Color::rgb(255, 255, 100),
        }
    }

    /// Modifier-stack effects. The shield is a one-hit flag, not a modifier.
    fn effects(self) -> &'static [Effect] {
        match self {
            PowerupKind::Speed => &[Effect::Scale { stat: Stat::Speed, factor: 1.5 }],
            PowerupKind::Damage => &[Effect::Scale { stat: Stat::Damage, factor: 2.0 }],
            PowerupKind::Shield => &[],
            PowerupKind::Invincibility => &[
                Effect::Invincible,
                Effect::Scale { stat: Stat::Damage, factor: 1.5 },
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Pending,
    Active,
    Expired,
}

#[derive(Clone, Debug)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub duration: f32,
    pub time_remaining: f32,
    source: SourceId,
    phase: Phase,
}

impl Powerup {
    pub fn new(kind: PowerupKind, source: SourceId) -> Self {
        Self {
            kind,
            duration: kind.duration(),
            time_remaining: kind.duration(),
            source,
            phase: Phase::Pending,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    /// Apply the effect to `player`. Only the first call does anything.
    pub fn activate(&mut self, player: &mut Player) -> bool {
        if self.phase != Phase::Pending {
            return false;
        }
        for effect in self.kind.effects() {
            player.modifiers.push(self.source, *effect);
        }
        if self.kind == PowerupKind::Shield {
            player.shield = Some(self.source);
        }
        self.phase = Phase::Active;
        true
    }

    /// Count down; on expiry the effect is reversed. Returns whether the
    /// powerup is still running.
    pub fn update(&mut self, dt: f32, player: &mut Player) -> bool {
        if !self.is_active() {
            return false;
        }
        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            self.time_remaining = 0.0;
            self.deactivate(player);
            return false;
        }
        true
    }

    /// Reverse the effect. A powerup that never activated, or that already
    /// expired, is left alone.
    pub fn deactivate(&mut self, player: &mut Player) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        player.modifiers.remove_source(self.source);
        // Only lower the shield this powerup raised.
        if player.shield == Some(self.source) {
            player.shield = None;
        }
        self.phase = Phase::Expired;
        true
    }
}
