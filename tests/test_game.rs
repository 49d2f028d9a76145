use pixel_survivor::config::GameConfig;
use pixel_survivor::entities::{Enemy, EnemyStats};
use pixel_survivor::error::ConfigError;
use pixel_survivor::game::{Game, GameState};
use pixel_survivor::geometry::Vec2;
use pixel_survivor::platform::{FixedClock, FrameInput, HeldKeys, Input, InputEvent, Key};
use pixel_survivor::powerup::PowerupKind;
use pixel_survivor::save::{PlayerSnapshot, SaveManager};
use pixel_survivor::weapon::WeaponKind;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::{tempdir, TempDir};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_game() -> (Game, TempDir) {
    let dir = tempdir().expect("tempdir");
    let game = Game::new(GameConfig::default(), SaveManager::new(dir.path())).expect("game");
    (game, dir)
}

fn playing_game() -> (Game, TempDir) {
    let (mut game, dir) = make_game();
    game.new_session();
    (game, dir)
}

fn press(key: Key) -> FrameInput {
    FrameInput {
        events: vec![InputEvent::KeyPressed(key)],
        ..Default::default()
    }
}

fn idle() -> FrameInput {
    FrameInput::default()
}

/// Make the current round's quota spawned and the battlefield empty, so the
/// next update completes the round.
fn clear_round(game: &mut Game) {
    game.round_manager.start_round();
    game.round_manager.enemies_spawned = game.round_manager.enemies_per_round;
    game.enemies.clear();
}

struct Scripted(Vec<FrameInput>);

impl Input for Scripted {
    fn sample(&mut self) -> FrameInput {
        if self.0.is_empty() {
            FrameInput::default()
        } else {
            self.0.remove(0)
        }
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn starts_at_the_menu() {
    let (game, _dir) = make_game();
    assert_eq!(game.state, GameState::Menu);
    assert!(game.is_running());
    assert!(game.save_info.is_none());
}

#[test]
fn config_without_worlds_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let mut config = GameConfig::default();
    config.worlds.clear();
    let result = Game::new(config, SaveManager::new(dir.path()));
    assert!(matches!(result, Err(ConfigError::NoWorlds)));
}

// ── State machine ─────────────────────────────────────────────────────────────

#[test]
fn new_game_from_the_menu() {
    let (mut game, _dir) = make_game();
    let mut rng = seeded_rng();
    // no save: New Game is the first button
    game.step(&press(Key::Digit(1)), 0.016, &mut rng);
    assert_eq!(game.state, GameState::Playing);
    assert_eq!(game.round_manager.current_round, 1);
    assert_eq!(game.world_manager.current_world_index(), 0);
}

#[test]
fn menu_click_hits_buttons() {
    let (mut game, _dir) = make_game();
    let mut rng = seeded_rng();
    let center = game.main_menu.buttons[0].rect.center();
    let input = FrameInput {
        events: vec![InputEvent::Click(center)],
        ..Default::default()
    };
    game.step(&input, 0.016, &mut rng);
    assert_eq!(game.state, GameState::Playing);
}

#[test]
fn quit_from_the_menu() {
    let (mut game, _dir) = make_game();
    let mut rng = seeded_rng();
    game.step(&press(Key::Char('q')), 0.016, &mut rng);
    assert!(!game.is_running());
}

#[test]
fn interrupt_stops_the_game() {
    let (mut game, _dir) = playing_game();
    let input = FrameInput {
        quit: true,
        ..Default::default()
    };
    game.step(&input, 0.016, &mut seeded_rng());
    assert!(!game.is_running());
}

#[test]
fn pause_freezes_the_world() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.step(&idle(), 0.1, &mut rng);
    let playtime = game.playtime;

    game.step(&press(Key::Pause), 0.1, &mut rng);
    assert_eq!(game.state, GameState::Paused);
    let enemies: Vec<Vec2> = game.enemies.iter().map(|e| e.pos).collect();
    for _ in 0..10 {
        game.step(&idle(), 0.1, &mut rng);
    }
    assert_eq!(game.enemies.iter().map(|e| e.pos).collect::<Vec<_>>(), enemies);
    assert_eq!(game.playtime, playtime);

    game.step(&press(Key::Pause), 0.1, &mut rng);
    assert_eq!(game.state, GameState::Playing);
}

#[test]
fn pause_menu_returns_to_menu_and_saves() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.step(&press(Key::Pause), 0.016, &mut rng);
    game.step(&press(Key::Char('m')), 0.016, &mut rng);

    assert_eq!(game.state, GameState::Menu);
    assert!(game.saves().has_save());
    assert!(game.save_info.is_some());
    assert_eq!(
        game.main_menu.buttons.first().map(|b| b.action.label()),
        Some("Continue")
    );
}

#[test]
fn number_keys_switch_weapons() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.inventory.add_weapon(WeaponKind::Shotgun);
    game.step(&press(Key::Digit(1)), 0.016, &mut rng);
    assert_eq!(game.inventory.active_weapon_index, 0);
    game.step(&press(Key::Digit(3)), 0.016, &mut rng);
    assert_eq!(game.inventory.active_weapon_index, 0);
    game.step(&press(Key::Digit(2)), 0.016, &mut rng);
    assert_eq!(game.inventory.active_weapon_index, 1);
}

#[test]
fn frame_clamps_long_deltas() {
    let (mut game, _dir) = playing_game();
    let mut input = Scripted(Vec::new());
    game.frame(&mut input, &mut FixedClock(5.0), &mut seeded_rng());
    assert!((game.playtime - 0.1).abs() < 1e-6);
}

// ── Combat ────────────────────────────────────────────────────────────────────

#[test]
fn bullet_kills_enemy_and_counts() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.config.loot.drop_chance = 0.0;
    game.round_manager.begin_break();

    let target = Vec2::new(game.player.pos.x + 100.0, game.player.pos.y);
    game.enemies.push(Enemy::new(
        target,
        EnemyStats {
            hp: 10,
            speed: 0.0,
            damage: 10,
        },
    ));

    let fire = FrameInput {
        pointer: target,
        events: vec![InputEvent::KeyPressed(Key::Fire)],
        ..Default::default()
    };
    game.step(&fire, 0.05, &mut rng);
    assert_eq!(game.bullets.len(), 1);

    let aim = FrameInput {
        pointer: target,
        ..Default::default()
    };
    for _ in 0..10 {
        game.step(&aim, 0.05, &mut rng);
    }
    assert_eq!(game.kills, 1);
    assert!(game.enemies.is_empty());
    assert!(game.bullets.is_empty());
}

#[test]
fn enemy_killed_this_frame_does_not_attack() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.config.loot.drop_chance = 0.0;
    game.round_manager.begin_break();

    let stats = EnemyStats {
        hp: 1,
        speed: 0.0,
        damage: 50,
    };
    let on_player = Vec2::new(game.player.pos.x + 10.0, game.player.pos.y);
    game.enemies.push(Enemy::new(on_player, stats));
    let fire = FrameInput {
        pointer: Vec2::new(game.player.pos.x + 100.0, game.player.pos.y),
        events: vec![InputEvent::KeyPressed(Key::Fire)],
        ..Default::default()
    };
    game.step(&fire, 0.016, &mut rng);

    assert_eq!(game.kills, 1);
    assert_eq!(game.player.hp, 100);
    assert_eq!(game.state, GameState::Playing);

    // the same enemy left alive does land its hit
    game.enemies.push(Enemy::new(on_player, stats));
    game.step(&idle(), 0.016, &mut rng);
    assert_eq!(game.player.hp, 50);
}

#[test]
fn kills_can_leave_drops() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.config.loot.drop_chance = 1.0;
    game.round_manager.begin_break();

    let target = Vec2::new(game.player.pos.x, game.player.pos.y - 150.0);
    game.enemies.push(Enemy::new(
        target,
        EnemyStats {
            hp: 1,
            speed: 0.0,
            damage: 10,
        },
    ));
    let fire = FrameInput {
        pointer: target,
        held: HeldKeys {
            fire: true,
            ..Default::default()
        },
        ..Default::default()
    };
    for _ in 0..10 {
        game.step(&fire, 0.05, &mut rng);
    }
    assert_eq!(game.kills, 1);
    assert_eq!(game.drops.len(), 1);
    assert_eq!(game.drops[0].pos, target);
}

#[test]
fn bullets_carry_player_damage() {
    let (mut game, _dir) = playing_game();
    game.inventory.add_powerup(PowerupKind::Damage, &mut game.player);
    assert_eq!(game.try_shoot(), 1);
    assert_eq!(game.bullets[0].damage, 20);
    assert_eq!(game.try_shoot(), 0);
}

#[test]
fn contact_damage_ends_the_game() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.player.hp = 5;
    game.enemies.push(Enemy::new(
        game.player.pos,
        EnemyStats {
            hp: 30,
            speed: 80.0,
            damage: 10,
        },
    ));
    game.step(&idle(), 0.016, &mut rng);
    assert_eq!(game.player.hp, 0);
    assert_eq!(game.state, GameState::GameOver);
}

#[test]
fn retry_after_game_over_starts_fresh() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.kills = 12;
    game.persist();
    game.player.hp = 0;
    game.step(&idle(), 0.016, &mut rng);
    assert_eq!(game.state, GameState::GameOver);

    game.step(&press(Key::Char('r')), 0.016, &mut rng);
    assert_eq!(game.state, GameState::Playing);
    assert_eq!(game.kills, 0);
    assert_eq!(game.player.hp, game.player.max_hp);
    assert!(!game.saves().has_save());
}

#[test]
fn drops_are_picked_up_once() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.round_manager.begin_break();
    let pos = game.player.pos;
    game.drops.push(pixel_survivor::entities::Drop::new(
        pos,
        pixel_survivor::entities::DropKind::Coin(4),
    ));
    game.step(&idle(), 0.016, &mut rng);
    game.step(&idle(), 0.016, &mut rng);
    assert_eq!(game.inventory.coins, 4);
    assert!(game.drops.is_empty());
}

// ── Rounds, worlds and the shop ───────────────────────────────────────────────

#[test]
fn cleared_round_opens_the_shop_once() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    clear_round(&mut game);
    game.step(&idle(), 0.016, &mut rng);

    assert_eq!(game.state, GameState::Shop);
    assert_eq!(game.round_manager.current_round, 2);
    assert_eq!(game.round_manager.enemies_per_round, 7);
    assert_eq!(game.world_manager.current_world().rounds_completed, 1);

    game.step(&press(Key::Confirm), 0.016, &mut rng);
    assert_eq!(game.state, GameState::Playing);
    assert!(game.saves().has_save());

    game.step(&idle(), 0.016, &mut rng);
    assert_eq!(game.state, GameState::Playing);
    assert_eq!(game.world_manager.current_world().rounds_completed, 1);
}

#[test]
fn shop_purchases_with_number_keys() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.inventory.coins = 100;
    game.open_shop();

    game.step(&press(Key::Digit(1)), 0.016, &mut rng);
    assert_eq!(game.player.max_hp, 120);
    assert_eq!(game.inventory.coins, 50);

    game.step(&press(Key::Digit(3)), 0.016, &mut rng);
    assert_eq!(game.inventory.coins, 50, "60-coin upgrade is unaffordable");
    assert_eq!(game.player.base_damage, 10);
}

#[test]
fn shop_closes_when_time_runs_out() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.open_shop();
    game.step(&idle(), 10.0, &mut rng);
    assert_eq!(game.state, GameState::Shop);
    game.step(&idle(), 6.0, &mut rng);
    assert_eq!(game.state, GameState::Playing);
}

#[test]
fn finishing_a_world_advances_and_resets_rounds() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    for _ in 0..3 {
        clear_round(&mut game);
        game.step(&idle(), 0.016, &mut rng);
        assert_eq!(game.state, GameState::Shop);
        game.leave_shop();
    }
    assert_eq!(game.world_manager.current_world_index(), 1);
    assert_eq!(game.round_manager.current_round, 1);
    assert!(game.round_manager.in_break());
}

#[test]
fn world_advance_can_keep_the_round_count() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.config.reset_rounds_on_world_advance = false;
    for _ in 0..3 {
        clear_round(&mut game);
        game.step(&idle(), 0.016, &mut rng);
        game.leave_shop();
    }
    assert_eq!(game.world_manager.current_world_index(), 1);
    assert_eq!(game.round_manager.current_round, 4);
}

#[test]
fn spawned_enemies_use_world_multipliers() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.world_manager.restore(2, 0);
    game.step(&idle(), 0.016, &mut rng);
    assert_eq!(game.enemies.len(), 1);
    // world 3: 30 hp × 1.7
    assert_eq!(game.enemies[0].max_hp, 51);
}

// ── Save / restore ────────────────────────────────────────────────────────────

#[test]
fn save_restores_progress() {
    let (mut game, dir) = playing_game();
    game.inventory.coins = 120;
    game.inventory.add_weapon(WeaponKind::Shotgun);
    game.world_manager.restore(1, 2);
    game.round_manager.restore(5, 13);
    game.kills = 7;
    game.player.hp = 64;
    assert!(game.persist());

    let mut resumed = Game::new(GameConfig::default(), SaveManager::new(dir.path())).expect("game");
    assert!(resumed.save_info.is_some());
    resumed.continue_session();

    assert_eq!(resumed.state, GameState::Playing);
    assert_eq!(resumed.inventory.coins, 120);
    assert_eq!(resumed.inventory.active_weapon().map(|w| w.kind), Some(WeaponKind::Shotgun));
    assert_eq!(resumed.world_manager.current_world_index(), 1);
    assert_eq!(resumed.world_manager.current_world().rounds_completed, 2);
    assert_eq!(resumed.round_manager.current_round, 5);
    assert_eq!(resumed.round_manager.enemies_per_round, 13);
    assert_eq!(resumed.kills, 7);
    assert_eq!(resumed.player.hp, 64);
    assert!(resumed.enemies.is_empty());
}

#[test]
fn save_excludes_temporary_buffs() {
    let (mut game, _dir) = playing_game();
    game.inventory.add_powerup(PowerupKind::Speed, &mut game.player);
    let save = game.create_save_data();
    assert_eq!(save.player.speed, Some(300.0));

    let (mut other, _dir2) = make_game();
    other.restore_from_save(&save);
    assert_eq!(other.player.speed(), 300.0);
    assert!(other.inventory.powerups.is_empty());
}

#[test]
fn restore_falls_back_to_world_and_round_numbers() {
    let (mut game, _dir) = make_game();
    let mut save = game.create_save_data();
    save.world_number = 2;
    save.round_number = 3;
    save.world_progress = None;
    save.round_state = None;

    game.restore_from_save(&save);
    assert_eq!(game.world_manager.current_world_index(), 1);
    assert_eq!(game.world_manager.current_world().rounds_completed, 0);
    assert_eq!(game.round_manager.current_round, 3);
    assert_eq!(game.round_manager.enemies_per_round, 9);
}

#[test]
fn restore_fills_missing_player_fields() {
    let (mut game, _dir) = make_game();
    let mut save = game.create_save_data();
    save.player = PlayerSnapshot {
        max_hp: Some(140),
        x: Some(100.0),
        ..Default::default()
    };
    game.restore_from_save(&save);
    assert_eq!(game.player.max_hp, 140);
    assert_eq!(game.player.hp, 140);
    assert_eq!(game.player.base_speed, 300.0);
    assert_eq!(game.player.base_damage, 10);
    assert_eq!(game.player.pos, Vec2::new(100.0, game.height() / 2.0));
}

#[test]
fn restore_clamps_bad_values() {
    let (mut game, _dir) = make_game();
    let mut save = game.create_save_data();
    save.player.hp = Some(500);
    save.player.x = Some(-50.0);
    save.player.y = Some(10_000.0);
    game.restore_from_save(&save);
    assert_eq!(game.player.hp, game.player.max_hp);
    assert_eq!(game.player.pos, Vec2::new(0.0, game.height()));
}

#[test]
fn upgrades_survive_a_save() {
    let (mut game, dir) = playing_game();
    game.inventory.coins = 50;
    assert!(game.shop.purchase(3, &mut game.player, &mut game.inventory));
    game.persist();

    let mut resumed = Game::new(GameConfig::default(), SaveManager::new(dir.path())).expect("game");
    resumed.continue_session();
    assert_eq!(resumed.shop.counts().fire_rate, 1);
    let rate = resumed.inventory.active_weapon().map(|w| w.fire_rate).unwrap_or_default();
    assert!((rate - 0.135).abs() < 1e-6);
}

#[test]
fn corrupt_save_falls_back_to_new_game() {
    let (mut game, _dir) = make_game();
    std::fs::write(game.saves().path(), "garbage").expect("write");
    game.continue_session();
    assert_eq!(game.state, GameState::Playing);
    assert_eq!(game.round_manager.current_round, 1);
    assert!(!game.saves().has_save());
}

#[test]
fn restore_then_create_reproduces_the_record() {
    let (mut game, _dir) = make_game();
    let mut save = game.create_save_data();
    save.world_number = 2;
    save.round_number = 6;
    save.world_progress = Some(pixel_survivor::save::WorldProgress {
        current_world_index: 1,
        rounds_completed: 2,
    });
    save.round_state = Some(pixel_survivor::save::RoundState {
        current_round: 6,
        enemies_per_round: 15,
    });
    save.inventory.weapons = vec![Some(WeaponKind::Rifle), None, Some(WeaponKind::Shotgun)];
    save.inventory.active_weapon_index = 2;
    save.inventory.coins = 88;
    save.stats.kills = 40;
    save.stats.playtime = 600.0;

    game.restore_from_save(&save);
    let again = game.create_save_data();
    assert_eq!(again.world_number, save.world_number);
    assert_eq!(again.round_number, save.round_number);
    assert_eq!(again.inventory, save.inventory);
    assert_eq!(again.stats, save.stats);
    assert_eq!(again.world_progress, save.world_progress);
    assert_eq!(again.round_state, save.round_state);
}

#[test]
fn game_over_menu_abandons_the_session() {
    let (mut game, _dir) = playing_game();
    let mut rng = seeded_rng();
    game.player.hp = 0;
    game.step(&idle(), 0.016, &mut rng);
    game.step(&press(Key::Char('m')), 0.016, &mut rng);
    assert_eq!(game.state, GameState::Menu);
    assert!(!game.saves().has_save());
}
