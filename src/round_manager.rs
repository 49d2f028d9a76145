//! Wave scheduling: an Active ⇄ Break state machine.
//!
//! In the Active phase one enemy is requested every `spawn_interval` seconds
//! until the round quota is spawned. The round completes once the quota is
//! spawned *and* nothing is left alive; the manager then moves to the next
//! round number, grows the quota and rests for `break_duration` seconds.
//!
//! Enemy stats scale geometrically with the number of rounds already
//! passed: `base × scale^(round - 1)`.

use crate::config::RoundConfig;
use crate::entities::EnemyStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    Active,
    Break,
}

/// Something the caller must act on after an update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoundEvent {
    /// Spawn one enemy with these (round-scaled) stats.
    Spawn(EnemyStats),
    /// `round` was cleared; the manager is now resting.
    RoundComplete { round: u32 },
    /// The rest is over and the next round has started.
    BreakOver,
}

/// Snapshot for display and for the game's own checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundInfo {
    pub round: u32,
    /// Enemies this round that have not spawned yet.
    pub enemies_remaining: u32,
    pub in_break: bool,
    /// Seconds left in the current break (0 while active).
    pub break_time: f32,
}

#[derive(Clone, Debug)]
pub struct RoundManager {
    config: RoundConfig,
    pub current_round: u32,
    pub enemies_per_round: u32,
    pub enemies_spawned: u32,
    spawn_timer: f32,
    break_timer: f32,
    phase: RoundPhase,
}

impl RoundManager {
    /// Round 1, active, first spawn due immediately.
    pub fn new(config: RoundConfig) -> Self {
        let enemies_per_round = config.enemies_per_round;
        Self {
            config,
            current_round: 1,
            enemies_per_round,
            enemies_spawned: 0,
            spawn_timer: 0.0,
            break_timer: 0.0,
            phase: RoundPhase::Active,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn in_break(&self) -> bool {
        self.phase == RoundPhase::Break
    }

    /// Advance by `dt` given how many enemies are currently alive.
    pub fn update(&mut self, dt: f32, alive_enemies: usize) -> Option<RoundEvent> {
        match self.phase {
            RoundPhase::Break => {
                self.break_timer -= dt;
                if self.break_timer <= 0.0 {
                    self.start_round();
                    return Some(RoundEvent::BreakOver);
                }
                None
            }
            RoundPhase::Active => {
                if self.enemies_spawned >= self.enemies_per_round && alive_enemies == 0 {
                    let round = self.current_round;
                    self.complete_round();
                    return Some(RoundEvent::RoundComplete { round });
                }

                if self.enemies_spawned < self.enemies_per_round {
                    self.spawn_timer -= dt;
                    if self.spawn_timer <= 0.0 {
                        self.enemies_spawned += 1;
                        self.spawn_timer = self.config.spawn_interval;
                        return Some(RoundEvent::Spawn(self.get_enemy_stats()));
                    }
                }
                None
            }
        }
    }

    /// Begin the current round from scratch.
    pub fn start_round(&mut self) {
        self.phase = RoundPhase::Active;
        self.enemies_spawned = 0;
        self.spawn_timer = 0.0;
        self.break_timer = 0.0;
    }

    fn complete_round(&mut self) {
        self.current_round += 1;
        self.enemies_per_round += self.config.enemies_increment;
        tracing::info!(
            "Round {} complete; next round needs {} enemies",
            self.current_round - 1,
            self.enemies_per_round
        );
        self.begin_break();
    }

    /// Rest for `break_duration` before the current round starts.
    pub fn begin_break(&mut self) {
        self.phase = RoundPhase::Break;
        self.break_timer = self.config.break_duration;
    }

    /// Stats for an enemy spawned in the current round.
    pub fn get_enemy_stats(&self) -> EnemyStats {
        let n = self.current_round.saturating_sub(1) as i32;
        let c = &self.config;
        EnemyStats {
            hp: (c.base_enemy_hp as f64 * (c.hp_scale as f64).powi(n)) as i32,
            speed: (c.base_enemy_speed as f64 * (c.speed_scale as f64).powi(n)) as f32,
            damage: (c.base_enemy_damage as f64 * (c.damage_scale as f64).powi(n)) as i32,
        }
    }

    pub fn get_round_info(&self) -> RoundInfo {
        RoundInfo {
            round: self.current_round,
            enemies_remaining: self.enemies_per_round.saturating_sub(self.enemies_spawned),
            in_break: self.in_break(),
            break_time: if self.in_break() { self.break_timer.max(0.0) } else { 0.0 },
        }
    }

    /// Back to round 1 with the starting quota, active.
    pub fn reset(&mut self) {
        self.current_round = 1;
        self.enemies_per_round = self.config.enemies_per_round;
        self.start_round();
    }

    /// Resume at a saved round. The battlefield starts empty, so the round
    /// begins from its first spawn.
    pub fn restore(&mut self, current_round: u32, enemies_per_round: u32) {
        self.current_round = current_round.max(1);
        self.enemies_per_round = enemies_per_round;
        self.start_round();
    }
}
