//! Worlds: difficulty tiers that multiply enemy stats and gate progression
//! on a number of cleared rounds.

use crate::config::WorldConfig;
use crate::entities::EnemyStats;
use crate::platform::Color;

const BACKGROUNDS: [Color; 10] = [
    Color::rgb(30, 30, 40),
    Color::rgb(40, 25, 35),
    Color::rgb(25, 35, 25),
    Color::rgb(40, 30, 20),
    Color::rgb(35, 35, 40),
    Color::rgb(40, 20, 20),
    Color::rgb(20, 30, 40),
    Color::rgb(35, 25, 40),
    Color::rgb(40, 40, 25),
    Color::rgb(25, 25, 35),
];

const ACCENTS: [Color; 10] = [
    Color::rgb(100, 200, 255),
    Color::rgb(200, 100, 255),
    Color::rgb(100, 255, 100),
    Color::rgb(255, 180, 100),
    Color::rgb(200, 200, 255),
    Color::rgb(255, 100, 100),
    Color::rgb(100, 180, 255),
    Color::rgb(255, 100, 200),
    Color::rgb(255, 255, 100),
    Color::rgb(180, 180, 255),
];

#[derive(Clone, Debug)]
pub struct World {
    pub id: u32,
    pub name: String,
    pub rounds_to_complete: u32,
    pub enemy_hp_multiplier: f32,
    pub enemy_speed_multiplier: f32,
    pub enemy_damage_multiplier: f32,
    pub rounds_completed: u32,
    pub is_complete: bool,
}

/// Display summary of a world's progress.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldInfo {
    pub id: u32,
    pub name: String,
    pub rounds_completed: u32,
    pub rounds_remaining: u32,
    pub rounds_to_complete: u32,
    /// 0-100.
    pub progress: f32,
    pub is_complete: bool,
}

impl World {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            id: config.world,
            name: config
                .name
                .clone()
                .unwrap_or_else(|| format!("World {}", config.world)),
            rounds_to_complete: config.rounds.max(1),
            enemy_hp_multiplier: config.enemy_health_multiplier,
            enemy_speed_multiplier: config.enemy_speed_multiplier,
            enemy_damage_multiplier: config.enemy_damage_multiplier,
            rounds_completed: 0,
            is_complete: false,
        }
    }

    /// Count a cleared round. Returns `true` when this completes the world.
    pub fn complete_round(&mut self) -> bool {
        self.rounds_completed += 1;
        if self.rounds_completed >= self.rounds_to_complete {
            self.is_complete = true;
        }
        self.is_complete
    }

    pub fn progress(&self) -> f32 {
        (self.rounds_completed as f32 / self.rounds_to_complete as f32 * 100.0).min(100.0)
    }

    /// Compose this world's multipliers on top of already round-scaled stats.
    pub fn apply_enemy_modifiers(&self, stats: EnemyStats) -> EnemyStats {
        EnemyStats {
            hp: (stats.hp as f32 * self.enemy_hp_multiplier) as i32,
            speed: stats.speed * self.enemy_speed_multiplier,
            damage: (stats.damage as f32 * self.enemy_damage_multiplier) as i32,
        }
    }

    pub fn background_color(&self) -> Color {
        BACKGROUNDS[palette_index(self.id)]
    }

    pub fn accent_color(&self) -> Color {
        ACCENTS[palette_index(self.id)]
    }

    pub fn info(&self) -> WorldInfo {
        WorldInfo {
            id: self.id,
            name: self.name.clone(),
            rounds_completed: self.rounds_completed,
            rounds_remaining: self.rounds_to_complete.saturating_sub(self.rounds_completed),
            rounds_to_complete: self.rounds_to_complete,
            progress: self.progress(),
            is_complete: self.is_complete,
        }
    }

    pub fn reset(&mut self) {
        self.rounds_completed = 0;
        self.is_complete = false;
    }
}

fn palette_index(id: u32) -> usize {
    (id.saturating_sub(1) as usize) % BACKGROUNDS.len()
}

/// Ordered worlds plus the index of the one being played. The index never
/// moves backwards during a playthrough.
#[derive(Clone, Debug)]
pub struct WorldManager {
    worlds: Vec<World>,
    current_world_index: usize,
}

impl WorldManager {
    /// `None` when `configs` is empty.
    pub fn new(configs: &[WorldConfig]) -> Option<Self> {
        if configs.is_empty() {
            return None;
        }
        Some(Self {
            worlds: configs.iter().map(World::new).collect(),
            current_world_index: 0,
        })
    }

    pub fn current_world_index(&self) -> usize {
        self.current_world_index
    }

    pub fn current_world(&self) -> &World {
        &self.worlds[self.current_world_index]
    }

    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    pub fn is_last_world(&self) -> bool {
        self.current_world_index + 1 >= self.worlds.len()
    }

    /// Count a cleared round in the current world. Returns `true` if this
    /// moved play on to the next world.
    pub fn complete_round(&mut self) -> bool {
        let index = self.current_world_index;
        if self.worlds[index].complete_round() {
            return self.advance_to_next_world();
        }
        false
    }

    /// No-op (returns `false`) on the last world.
    pub fn advance_to_next_world(&mut self) -> bool {
        if self.is_last_world() {
            return false;
        }
        self.current_world_index += 1;
        tracing::info!("Advanced to {}", self.current_world().name);
        true
    }

    pub fn is_all_worlds_complete(&self) -> bool {
        self.is_last_world() && self.current_world().is_complete
    }

    pub fn apply_enemy_modifiers(&self, stats: EnemyStats) -> EnemyStats {
        self.current_world().apply_enemy_modifiers(stats)
    }

    pub fn current_world_info(&self) -> WorldInfo {
        self.current_world().info()
    }

    pub fn background_color(&self) -> Color {
        self.current_world().background_color()
    }

    pub fn accent_color(&self) -> Color {
        self.current_world().accent_color()
    }

    /// Jump to a saved position. Earlier worlds count as complete; the index
    /// is clamped to the configured worlds.
    pub fn restore(&mut self, world_index: usize, rounds_completed: u32) {
        self.reset();
        let index = world_index.min(self.worlds.len() - 1);
        for world in &mut self.worlds[..index] {
            world.rounds_completed = world.rounds_to_complete;
            world.is_complete = true;
        }
        self.current_world_index = index;
        let world = &mut self.worlds[index];
        world.rounds_completed = rounds_completed;
        world.is_complete = rounds_completed >= world.rounds_to_complete;
    }

    pub fn reset(&mut self) {
        for world in &mut self.worlds {
            world.reset();
        }
        self.current_world_index = 0;
    }
}
