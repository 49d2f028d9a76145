use pixel_survivor::config::PlayerConfig;
use pixel_survivor::entities::*;
use pixel_survivor::geometry::Vec2;
use pixel_survivor::inventory::Inventory;
use pixel_survivor::modifiers::{Effect, SourceId};
use pixel_survivor::platform::{Color, HeldKeys};
use pixel_survivor::powerup::PowerupKind;
use pixel_survivor::weapon::WeaponKind;

use rand::rngs::StdRng;
use rand::SeedableRng;

const W: f32 = 800.0;
const H: f32 = 600.0;

fn player_config() -> PlayerConfig {
    PlayerConfig {
        speed: 300.0,
        max_hp: 100,
        damage: 10,
    }
}

fn make_player() -> Player {
    Player::new(Vec2::new(400.0, 300.0), &player_config())
}

fn stats(hp: i32, speed: f32, damage: i32) -> EnemyStats {
    EnemyStats { hp, speed, damage }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_starts_at_full_health() {
    let p = make_player();
    assert_eq!(p.hp, 100);
    assert_eq!(p.max_hp, 100);
    assert!(p.is_alive());
    assert_eq!(p.speed(), 300.0);
    assert_eq!(p.damage(), 10);
}

#[test]
fn player_moves_at_speed_times_dt() {
    let mut p = make_player();
    let held = HeldKeys { right: true, ..Default::default() };
    p.update(&held, Vec2::new(800.0, 300.0), W, H, 0.1);
    assert!((p.pos.x - 430.0).abs() < 1e-3);
    assert_eq!(p.pos.y, 300.0);
}

#[test]
fn diagonal_movement_is_normalised() {
    let mut p = make_player();
    let start = p.pos;
    let held = HeldKeys { up: true, right: true, ..Default::default() };
    p.update(&held, Vec2::ZERO, W, H, 0.1);
    let moved = p.pos.distance(start);
    assert!((moved - 30.0).abs() < 1e-3, "moved {moved}");
    assert!(p.pos.x > start.x);
    assert!(p.pos.y < start.y);
}

#[test]
fn player_stays_on_screen() {
    let mut p = Player::new(Vec2::new(20.0, 20.0), &player_config());
    let held = HeldKeys { up: true, left: true, ..Default::default() };
    for _ in 0..10 {
        p.update(&held, Vec2::ZERO, W, H, 0.1);
    }
    assert_eq!(p.pos, Vec2::new(PLAYER_SIZE / 2.0, PLAYER_SIZE / 2.0));

    let held = HeldKeys { down: true, right: true, ..Default::default() };
    for _ in 0..100 {
        p.update(&held, Vec2::ZERO, W, H, 0.1);
    }
    assert_eq!(p.pos, Vec2::new(W - PLAYER_SIZE / 2.0, H - PLAYER_SIZE / 2.0));
}

#[test]
fn player_faces_pointer() {
    let mut p = make_player();
    p.update(&HeldKeys::default(), Vec2::new(400.0, 500.0), W, H, 0.016);
    assert!((p.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
}

#[test]
fn damage_is_clamped_at_zero() {
    let mut p = make_player();
    assert!(p.take_damage(30));
    assert_eq!(p.hp, 70);
    assert!(!p.take_damage(500));
    assert_eq!(p.hp, 0);
    assert!(!p.is_alive());
}

#[test]
fn heal_is_capped_at_max() {
    let mut p = make_player();
    p.take_damage(10);
    p.heal(75);
    assert_eq!(p.hp, 100);
}

#[test]
fn shield_absorbs_exactly_one_hit() {
    let mut p = make_player();
    p.shield = Some(SourceId(1));
    p.take_damage(40);
    assert_eq!(p.hp, 100);
    assert!(!p.has_shield());
    p.take_damage(40);
    assert_eq!(p.hp, 60);
}

#[test]
fn invincibility_blocks_damage() {
    let mut p = make_player();
    p.modifiers.push(SourceId(1), Effect::Invincible);
    assert!(p.take_damage(1000));
    assert_eq!(p.hp, 100);
    p.modifiers.remove_source(SourceId(1));
    p.take_damage(10);
    assert_eq!(p.hp, 90);
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[test]
fn enemy_chases_target() {
    let mut e = Enemy::new(Vec2::new(0.0, 0.0), stats(30, 80.0, 10));
    e.update(Vec2::new(100.0, 0.0), 0.5);
    assert!((e.pos.x - 40.0).abs() < 1e-4);
    assert_eq!(e.pos.y, 0.0);
}

#[test]
fn enemy_does_not_overshoot() {
    let mut e = Enemy::new(Vec2::new(0.0, 0.0), stats(30, 80.0, 10));
    e.update(Vec2::new(1.0, 0.0), 1.0);
    assert_eq!(e.pos, Vec2::new(1.0, 0.0));
    // already there: stays put
    e.update(Vec2::new(1.0, 0.0), 1.0);
    assert_eq!(e.pos, Vec2::new(1.0, 0.0));
}

#[test]
fn enemy_reports_only_the_killing_hit() {
    let mut e = Enemy::new(Vec2::ZERO, stats(30, 80.0, 10));
    assert!(!e.take_damage(10));
    assert_eq!(e.hp, 20);
    assert!(e.take_damage(25));
    assert_eq!(e.hp, 0);
    assert!(!e.alive);
    assert!(!e.take_damage(10));
}

#[test]
fn enemy_hp_is_at_least_one() {
    let e = Enemy::new(Vec2::ZERO, stats(0, 80.0, 10));
    assert_eq!(e.hp, 1);
    assert!(e.alive);
}

#[test]
fn enemy_attack_respects_cooldown() {
    let mut p = make_player();
    let mut e = Enemy::new(p.pos, stats(30, 80.0, 10));

    assert!(e.try_attack(&mut p));
    assert_eq!(p.hp, 90);
    assert!(!e.try_attack(&mut p));
    assert_eq!(p.hp, 90);

    e.update(p.pos, ENEMY_ATTACK_INTERVAL);
    assert!(e.try_attack(&mut p));
    assert_eq!(p.hp, 80);
}

#[test]
fn enemies_spawn_outside_the_viewport() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let e = Enemy::spawn_at_edge(W, H, stats(30, 80.0, 10), &mut rng);
        let outside = e.pos.x < 0.0 || e.pos.x > W || e.pos.y < 0.0 || e.pos.y > H;
        assert!(outside, "spawned inside at {:?}", e.pos);
    }
}

// ── Bullet ────────────────────────────────────────────────────────────────────

#[test]
fn bullet_travels_along_its_angle() {
    let mut b = Bullet::new(Vec2::new(100.0, 100.0), 0.0, 400.0, 10, Color::WHITE);
    b.update(0.5);
    assert!((b.pos.x - 300.0).abs() < 1e-3);
    assert!((b.pos.y - 100.0).abs() < 1e-3);
}

#[test]
fn bullet_is_culled_past_the_margin() {
    let b = Bullet::new(Vec2::new(W + BULLET_CULL_MARGIN - 1.0, 10.0), 0.0, 1.0, 1, Color::WHITE);
    assert!(!b.is_off_screen(W, H));
    let b = Bullet::new(Vec2::new(W + BULLET_CULL_MARGIN + 1.0, 10.0), 0.0, 1.0, 1, Color::WHITE);
    assert!(b.is_off_screen(W, H));
    let b = Bullet::new(Vec2::new(10.0, -BULLET_CULL_MARGIN - 1.0), 0.0, 1.0, 1, Color::WHITE);
    assert!(b.is_off_screen(W, H));
}

// ── Drops ─────────────────────────────────────────────────────────────────────

#[test]
fn drop_is_collected_once() {
    let mut d = Drop::new(Vec2::new(100.0, 100.0), DropKind::Coin(3));
    assert_eq!(d.collect(Vec2::new(110.0, 100.0)), Some(DropKind::Coin(3)));
    assert!(!d.alive);
    assert_eq!(d.collect(Vec2::new(110.0, 100.0)), None);
}

#[test]
fn drop_out_of_reach_stays() {
    let mut d = Drop::new(Vec2::new(100.0, 100.0), DropKind::Coin(1));
    assert_eq!(d.collect(Vec2::new(100.0 + DROP_PICKUP_RADIUS, 100.0)), None);
    assert!(d.alive);
}

#[test]
fn drop_blinks_then_expires() {
    let mut d = Drop::new(Vec2::ZERO, DropKind::Heal(HealSize::Small));
    d.update(DROP_LIFETIME - DROP_BLINK_TIME - 1.0);
    assert!(!d.is_blinking());
    d.update(2.0);
    assert!(d.is_blinking());
    d.update(DROP_BLINK_TIME);
    assert!(!d.alive);
    assert!(!d.is_blinking());
}

#[test]
fn drop_kinds_apply_their_payload() {
    let mut p = make_player();
    let mut inv = Inventory::new();

    p.take_damage(50);
    DropKind::Heal(HealSize::Medium).apply(&mut p, &mut inv);
    assert_eq!(p.hp, 90);

    DropKind::Coin(7).apply(&mut p, &mut inv);
    assert_eq!(inv.coins, 7);

    DropKind::Weapon(WeaponKind::Rifle).apply(&mut p, &mut inv);
    assert_eq!(inv.active_weapon().map(|w| w.kind), Some(WeaponKind::Rifle));

    DropKind::Powerup(PowerupKind::Speed).apply(&mut p, &mut inv);
    assert_eq!(inv.powerups.len(), 1);
    assert_eq!(p.speed(), 450.0);
}

#[test]
fn heal_sizes() {
    assert_eq!(HealSize::Small.amount(), 20);
    assert_eq!(HealSize::Medium.amount(), 40);
    assert_eq!(HealSize::Large.amount(), 75);
}
