//! The game orchestrator: owns every subsystem, runs the per-frame pipeline
//! and drives the Menu / Playing / Paused / Shop / GameOver state machine.
//!
//! Frame order while playing is fixed, because reordering it is visible
//! (an enemy could hit the player after dying in the same frame):
//!
//! 1. weapon cooldowns and powerup timers
//! 2. player movement and aim, then firing
//! 3. bullets move and off-screen ones are culled
//! 4. enemies chase the player
//! 5. drops age and are picked up
//! 6. bullet × enemy hits, then enemy × player contact
//! 7. dead enemies are removed and the round manager decides on spawns
//! 8. round / world completion

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bullet, Drop, Enemy, Player};
use crate::error::ConfigError;
use crate::geometry::Vec2;
use crate::inventory::Inventory;
use crate::loot;
use crate::platform::{clamp_delta, Clock, FrameInput, Input, InputEvent, Key};
use crate::round_manager::{RoundEvent, RoundManager};
use crate::save::{
    InventorySnapshot, PlayerSnapshot, RoundState, SaveInfo, SaveManager, SaveState,
    SessionStats, WorldProgress,
};
use crate::shop::{ShopAction, UpgradeShop};
use crate::ui::{Menu, MenuAction};
use crate::world::WorldManager;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    Shop,
    GameOver,
}

pub struct Game {
    pub config: GameConfig,
    pub state: GameState,

    pub player: Player,
    pub inventory: Inventory,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub drops: Vec<Drop>,
    pub round_manager: RoundManager,
    pub world_manager: WorldManager,
    pub shop: UpgradeShop,

    pub kills: u32,
    /// Seconds spent in the Playing state, carried across saves.
    pub playtime: f64,

    pub main_menu: Menu,
    pub pause_menu: Menu,
    pub game_over_menu: Menu,
    /// Summary of the save offered by Continue, if any.
    pub save_info: Option<SaveInfo>,

    saves: SaveManager,
    /// (world index, round) whose completion already opened the shop.
    shop_opened_for: Option<(usize, u32)>,
    running: bool,
}

impl Game {
    /// Build a game sitting at the main menu.
    pub fn new(config: GameConfig, saves: SaveManager) -> Result<Self, ConfigError> {
        config.validate()?;
        let world_manager = WorldManager::new(&config.worlds).ok_or(ConfigError::NoWorlds)?;
        let (w, h) = (config.width(), config.height());

        let mut game = Self {
            player: Player::new(Vec2::new(w / 2.0, h / 2.0), &config.player),
            inventory: Inventory::new(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            drops: Vec::new(),
            round_manager: RoundManager::new(config.rounds.clone()),
            world_manager,
            shop: UpgradeShop::new(config.shop.time_limit, w, h),
            kills: 0,
            playtime: 0.0,
            main_menu: Menu::main(w, h, false),
            pause_menu: Menu::pause(w, h),
            game_over_menu: Menu::game_over(w, h),
            save_info: None,
            saves,
            shop_opened_for: None,
            running: true,
            state: GameState::Menu,
            config,
        };
        game.refresh_main_menu();
        Ok(game)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn saves(&self) -> &SaveManager {
        &self.saves
    }

    pub fn width(&self) -> f32 {
        self.config.width()
    }

    pub fn height(&self) -> f32 {
        self.config.height()
    }

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            tracing::debug!("Game state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    // ── Frame entry points ────────────────────────────────────────────────────

    /// One frame: sample input, take one clamped delta from the clock and
    /// advance the current state.
    pub fn frame(&mut self, input: &mut impl Input, clock: &mut impl Clock, rng: &mut impl Rng) {
        let frame = input.sample();
        let dt = clamp_delta(clock.delta());
        self.step(&frame, dt, rng);
    }

    /// Advance by `dt` seconds with already-sampled input.
    pub fn step(&mut self, input: &FrameInput, dt: f32, rng: &mut impl Rng) {
        if input.quit {
            self.running = false;
            return;
        }

        let mut fire = false;
        for event in &input.events {
            fire |= self.handle_event(*event);
        }

        match self.state {
            GameState::Playing => self.update(input, fire, dt, rng),
            GameState::Shop => {
                if self.shop.update(dt) {
                    self.leave_shop();
                }
            }
            GameState::Menu | GameState::Paused | GameState::GameOver => {}
        }
    }

    /// Route one discrete event to the current state. Returns `true` when
    /// it asks the player to fire this frame.
    fn handle_event(&mut self, event: InputEvent) -> bool {
        match self.state {
            GameState::Menu => {
                if event == InputEvent::KeyPressed(Key::Pause) {
                    self.running = false;
                } else if let Some(action) = menu_action(&self.main_menu, event) {
                    self.apply_menu_action(action);
                }
            }
            GameState::Playing => match event {
                InputEvent::KeyPressed(Key::Fire) | InputEvent::Click(_) => return true,
                InputEvent::KeyPressed(Key::Digit(n @ 1..=3)) => {
                    self.inventory.switch_weapon(n as usize - 1);
                }
                InputEvent::KeyPressed(Key::Pause) | InputEvent::KeyPressed(Key::Char('p')) => {
                    self.pause();
                }
                _ => {}
            },
            GameState::Paused => {
                if matches!(
                    event,
                    InputEvent::KeyPressed(Key::Pause) | InputEvent::KeyPressed(Key::Char('p'))
                ) {
                    self.resume();
                } else if let Some(action) = menu_action(&self.pause_menu, event) {
                    self.apply_menu_action(action);
                }
            }
            GameState::Shop => match event {
                InputEvent::KeyPressed(Key::Digit(n)) if n >= 1 => {
                    self.shop
                        .purchase(n as usize - 1, &mut self.player, &mut self.inventory);
                }
                InputEvent::KeyPressed(Key::Confirm) | InputEvent::KeyPressed(Key::Pause) => {
                    self.leave_shop();
                }
                InputEvent::Click(point) => {
                    let action =
                        self.shop
                            .handle_click(point, &mut self.player, &mut self.inventory);
                    if action == Some(ShopAction::Continue) {
                        self.leave_shop();
                    }
                }
                _ => {}
            },
            GameState::GameOver => {
                if let Some(action) = menu_action(&self.game_over_menu, event) {
                    self.apply_menu_action(action);
                }
            }
        }
        false
    }

    fn apply_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::Continue => self.continue_session(),
            MenuAction::NewGame => self.new_session(),
            MenuAction::Quit => self.running = false,
            MenuAction::Resume => self.resume(),
            MenuAction::MainMenu => self.return_to_menu(),
            MenuAction::Retry => self.retry(),
        }
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// Reinitialise every gameplay object for a brand-new session.
    pub fn reset_session(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.player = Player::new(Vec2::new(w / 2.0, h / 2.0), &self.config.player);
        self.inventory = Inventory::new();
        self.bullets.clear();
        self.enemies.clear();
        self.drops.clear();
        self.round_manager = RoundManager::new(self.config.rounds.clone());
        self.world_manager.reset();
        self.shop = UpgradeShop::new(self.config.shop.time_limit, w, h);
        self.kills = 0;
        self.playtime = 0.0;
        self.shop_opened_for = None;
    }

    /// Discard any save and start from world 1, round 1.
    pub fn new_session(&mut self) {
        if let Err(e) = self.saves.delete_save() {
            tracing::warn!("Could not delete old save: {}", e);
        }
        self.reset_session();
        tracing::info!("Starting new game");
        self.set_state(GameState::Playing);
    }

    /// Resume from the save file, or start fresh when it is missing or bad.
    pub fn continue_session(&mut self) {
        match self.saves.load_game() {
            Ok(Some(save)) => {
                self.restore_from_save(&save);
                self.set_state(GameState::Playing);
            }
            Ok(None) => {
                tracing::info!("No save to continue; starting new game");
                self.new_session();
            }
            Err(e) => {
                tracing::warn!("Rejected save file: {}; starting new game", e);
                self.new_session();
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.set_state(GameState::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.set_state(GameState::Playing);
        }
    }

    /// Leave to the main menu. A paused session is saved first; a finished
    /// (game over) one is abandoned.
    pub fn return_to_menu(&mut self) {
        match self.state {
            GameState::Paused | GameState::Shop => {
                self.persist();
            }
            GameState::GameOver | GameState::Menu | GameState::Playing => {}
        }
        self.refresh_main_menu();
        self.set_state(GameState::Menu);
    }

    /// Start over after a game over, discarding the save.
    pub fn retry(&mut self) {
        self.new_session();
    }

    pub fn open_shop(&mut self) {
        self.shop.reset_timer();
        self.set_state(GameState::Shop);
    }

    /// Close the shop, save, and go back to the (resting) round manager.
    pub fn leave_shop(&mut self) {
        if self.state != GameState::Shop {
            return;
        }
        self.persist();
        self.set_state(GameState::Playing);
    }

    fn game_over(&mut self) {
        tracing::info!(
            "Game over: {} kills in {:.0}s, {} round {}",
            self.kills,
            self.playtime,
            self.world_manager.current_world().name,
            self.round_manager.current_round
        );
        self.set_state(GameState::GameOver);
    }

    /// Write the current session to storage. Failure leaves the previous
    /// save and the running game untouched.
    pub fn persist(&mut self) -> bool {
        match self.saves.save_game(&self.create_save_data()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save game: {}", e);
                false
            }
        }
    }

    fn refresh_main_menu(&mut self) {
        self.save_info = self.saves.save_info();
        self.main_menu = Menu::main(self.width(), self.height(), self.save_info.is_some());
    }

    // ── Playing ───────────────────────────────────────────────────────────────

    fn update(&mut self, input: &FrameInput, fire: bool, dt: f32, rng: &mut impl Rng) {
        let (w, h) = (self.width(), self.height());
        self.playtime += dt as f64;

        self.inventory.update_weapons(dt);
        self.inventory.update_powerups(dt, &mut self.player);

        self.player.update(&input.held, input.pointer, w, h, dt);
        if fire || input.held.fire {
            self.try_shoot();
        }

        for bullet in &mut self.bullets {
            bullet.update(dt);
        }
        self.bullets.retain(|b| !b.is_off_screen(w, h));

        let target = self.player.pos;
        for enemy in &mut self.enemies {
            enemy.update(target, dt);
        }

        for drop in &mut self.drops {
            drop.update(dt);
            if let Some(kind) = drop.collect(self.player.pos) {
                tracing::debug!("Picked up {}", kind.name());
                kind.apply(&mut self.player, &mut self.inventory);
            }
        }
        self.drops.retain(|d| d.alive);

        self.resolve_collisions(rng);
        if !self.player.is_alive() {
            self.game_over();
            return;
        }

        self.enemies.retain(|e| e.alive);

        match self.round_manager.update(dt, self.enemies.len()) {
            Some(RoundEvent::Spawn(stats)) => {
                let stats = self.world_manager.apply_enemy_modifiers(stats);
                self.enemies.push(Enemy::spawn_at_edge(w, h, stats, rng));
            }
            Some(RoundEvent::RoundComplete { round }) => self.on_round_complete(round),
            Some(RoundEvent::BreakOver) => {
                tracing::debug!("Round {} begins", self.round_manager.current_round);
            }
            None => {}
        }
    }

    /// Fire the active weapon from the player toward the aim angle.
    /// Bullets carry the weapon's damage scaled by the player's damage
    /// relative to its configured base.
    pub fn try_shoot(&mut self) -> usize {
        let scale = self.damage_scale();
        let (origin, angle) = (self.player.pos, self.player.angle);
        let Some(weapon) = self.inventory.active_weapon_mut() else {
            return 0;
        };
        let mut fired = weapon.shoot(origin, angle);
        for bullet in &mut fired {
            bullet.damage = (bullet.damage as f32 * scale) as i32;
        }
        let count = fired.len();
        self.bullets.extend(fired);
        count
    }

    fn damage_scale(&self) -> f32 {
        let base = self.config.player.damage;
        if base <= 0 {
            1.0
        } else {
            self.player.damage() as f32 / base as f32
        }
    }

    /// Bullets against enemies first (one enemy per bullet), then contact
    /// attacks from enemies that are still alive.
    fn resolve_collisions(&mut self, rng: &mut impl Rng) {
        let drop_chance = self.config.loot.drop_chance;
        let enemies = &mut self.enemies;
        let drops = &mut self.drops;
        let kills = &mut self.kills;

        self.bullets.retain(|bullet| {
            let hit = enemies
                .iter_mut()
                .find(|e| e.alive && bullet.rect().overlaps(&e.rect()));
            let Some(enemy) = hit else {
                return true;
            };
            if enemy.take_damage(bullet.damage) {
                *kills += 1;
                if let Some(kind) = loot::roll_drop(rng, drop_chance) {
                    drops.push(Drop::new(enemy.pos, kind));
                }
            }
            false
        });

        let player_rect = self.player.rect();
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            if enemy.rect().overlaps(&player_rect) {
                enemy.try_attack(&mut self.player);
            }
        }
    }

    fn on_round_complete(&mut self, round: u32) {
        let cleared = (self.world_manager.current_world_index(), round);
        if self.world_manager.complete_round() {
            if self.config.reset_rounds_on_world_advance {
                self.round_manager.reset();
                self.round_manager.begin_break();
            }
        } else if self.world_manager.is_all_worlds_complete() {
            tracing::info!("All worlds complete; endless play continues");
        }

        if self.shop_opened_for != Some(cleared) {
            self.shop_opened_for = Some(cleared);
            self.open_shop();
        }
    }

    // ── Save / restore ────────────────────────────────────────────────────────

    /// Snapshot of the session's progress. Player speed and damage are the
    /// permanent values; running powerups are not saved.
    pub fn create_save_data(&self) -> SaveState {
        let world = self.world_manager.current_world();
        SaveState {
            world_number: self.world_manager.current_world_index() as u32 + 1,
            round_number: self.round_manager.current_round,
            player: PlayerSnapshot {
                hp: Some(self.player.hp),
                max_hp: Some(self.player.max_hp),
                speed: Some(self.player.base_speed),
                damage: Some(self.player.base_damage),
                x: Some(self.player.pos.x),
                y: Some(self.player.pos.y),
            },
            inventory: InventorySnapshot {
                weapons: self.inventory.weapon_kinds(),
                active_weapon_index: self.inventory.active_weapon_index,
                coins: self.inventory.coins,
            },
            world_progress: Some(WorldProgress {
                current_world_index: self.world_manager.current_world_index(),
                rounds_completed: world.rounds_completed,
            }),
            round_state: Some(RoundState {
                current_round: self.round_manager.current_round,
                enemies_per_round: self.round_manager.enemies_per_round,
            }),
            stats: SessionStats {
                kills: self.kills,
                playtime: self.playtime,
            },
            upgrades: self.shop.counts(),
        }
    }

    /// Replace the session with a saved one, on an empty battlefield at the
    /// start of the saved round.
    pub fn restore_from_save(&mut self, save: &SaveState) {
        self.reset_session();
        let (w, h) = (self.width(), self.height());

        let p = &save.player;
        let player = &mut self.player;
        player.max_hp = p.max_hp.unwrap_or(player.max_hp).max(1);
        player.hp = p.hp.unwrap_or(player.max_hp).clamp(1, player.max_hp);
        player.base_speed = p.speed.unwrap_or(player.base_speed);
        player.base_damage = p.damage.unwrap_or(player.base_damage);
        let x = p.x.unwrap_or(player.pos.x).clamp(0.0, w);
        let y = p.y.unwrap_or(player.pos.y).clamp(0.0, h);
        player.pos = Vec2::new(x, y);

        self.shop.set_counts(save.upgrades);
        self.inventory.fire_rate_factor = self.shop.fire_rate_factor(save.upgrades.fire_rate);
        self.inventory
            .set_weapons(&save.inventory.weapons, save.inventory.active_weapon_index);
        self.inventory.coins = save.inventory.coins;

        let progress = save.world_progress.clone().unwrap_or(WorldProgress {
            current_world_index: save.world_number.saturating_sub(1) as usize,
            rounds_completed: 0,
        });
        self.world_manager
            .restore(progress.current_world_index, progress.rounds_completed);

        let rounds = &self.config.rounds;
        let round_state = save.round_state.clone().unwrap_or(RoundState {
            current_round: save.round_number,
            enemies_per_round: rounds.enemies_per_round
                + rounds.enemies_increment * save.round_number.saturating_sub(1),
        });
        self.round_manager
            .restore(round_state.current_round, round_state.enemies_per_round);

        self.kills = save.stats.kills;
        self.playtime = save.stats.playtime;
        tracing::info!(
            "Restored {} round {}",
            self.world_manager.current_world().name,
            self.round_manager.current_round
        );
    }
}

fn menu_action(menu: &Menu, event: InputEvent) -> Option<MenuAction> {
    match event {
        InputEvent::KeyPressed(key) => menu.handle_key(key),
        InputEvent::Click(point) => menu.handle_click(point),
    }
}
