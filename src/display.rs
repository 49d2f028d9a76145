//! Rendering layer: translates an immutable view of the [`Game`] into
//! drawing calls on a [`Renderer`]. No game logic happens here.

use crate::entities::{Bullet, Drop, Enemy, BULLET_RADIUS};
use crate::game::{Game, GameState};
use crate::geometry::{Rect, Vec2};
use crate::platform::{Color, Renderer};
use crate::ui::Menu;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::rgb(50, 150, 255);
const C_PLAYER_INVINCIBLE: Color = Color::rgb(255, 255, 120);
const C_SHIELD: Color = Color::rgb(100, 200, 255);
const C_ENEMY: Color = Color::rgb(255, 50, 50);
const C_HP_BACK: Color = Color::rgb(80, 0, 0);
const C_HP_FRONT: Color = Color::rgb(0, 220, 0);
const C_TEXT: Color = Color::WHITE;
const C_HINT: Color = Color::rgb(140, 140, 140);
const C_COINS: Color = Color::rgb(255, 215, 0);
const C_OVERLAY: Color = Color::rgb(15, 15, 20);
const C_BUTTON: Color = Color::rgb(60, 60, 80);
const C_BUTTON_DIM: Color = Color::rgb(45, 35, 35);
const C_GAME_OVER: Color = Color::rgb(255, 60, 60);

const AIM_LENGTH: f32 = 30.0;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<R: Renderer>(out: &mut R, game: &Game) -> Result<(), R::Error> {
    match game.state {
        GameState::Menu => draw_main_menu(out, game),
        GameState::Playing => draw_battlefield(out, game),
        GameState::Paused => {
            draw_battlefield(out, game);
            draw_menu_overlay(out, game, "PAUSED", &game.pause_menu, C_TEXT);
        }
        GameState::Shop => draw_shop(out, game),
        GameState::GameOver => {
            draw_battlefield(out, game);
            draw_menu_overlay(out, game, "GAME OVER", &game.game_over_menu, C_GAME_OVER);
            draw_final_stats(out, game);
        }
    }
    out.present()
}

// ── Battlefield ───────────────────────────────────────────────────────────────

fn draw_battlefield<R: Renderer>(out: &mut R, game: &Game) {
    out.clear(game.world_manager.background_color());

    for drop in &game.drops {
        draw_drop(out, drop, game.playtime);
    }
    for enemy in &game.enemies {
        draw_enemy(out, enemy);
    }
    for bullet in &game.bullets {
        draw_bullet(out, bullet);
    }
    draw_player(out, game);
    draw_hud(out, game);
}

fn draw_player<R: Renderer>(out: &mut R, game: &Game) {
    let player = &game.player;
    let color = if player.is_invincible() {
        C_PLAYER_INVINCIBLE
    } else {
        C_PLAYER
    };
    out.fill_rect(player.rect(), color);
    if player.has_shield() {
        out.circle(player.pos, player.rect().w * 0.8, C_SHIELD);
    }
    let tip = player.pos + Vec2::from_angle(player.angle) * AIM_LENGTH;
    out.line(player.pos, tip, C_TEXT);
}

fn draw_enemy<R: Renderer>(out: &mut R, enemy: &Enemy) {
    let rect = enemy.rect();
    out.fill_rect(rect, C_ENEMY);

    // health bar just above the body
    let bar = Rect::new(rect.x, rect.y - 6.0, rect.w, 3.0);
    out.fill_rect(bar, C_HP_BACK);
    let fraction = (enemy.hp as f32 / enemy.max_hp.max(1) as f32).clamp(0.0, 1.0);
    out.fill_rect(Rect::new(bar.x, bar.y, bar.w * fraction, bar.h), C_HP_FRONT);
}

fn draw_bullet<R: Renderer>(out: &mut R, bullet: &Bullet) {
    out.circle(bullet.pos, BULLET_RADIUS, bullet.color);
}

/// Drops about to despawn blink at 5 Hz.
fn draw_drop<R: Renderer>(out: &mut R, drop: &Drop, clock: f64) {
    if drop.is_blinking() && (clock * 10.0) as i64 % 2 == 1 {
        return;
    }
    out.fill_rect(drop.rect(), drop.kind.color());
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<R: Renderer>(out: &mut R, game: &Game) {
    let width = game.width();
    let accent = game.world_manager.accent_color();

    // Health and coins, top left
    let player = &game.player;
    let bar = Rect::new(10.0, 10.0, 200.0, 16.0);
    out.fill_rect(bar, C_HP_BACK);
    let fraction = (player.hp as f32 / player.max_hp.max(1) as f32).clamp(0.0, 1.0);
    out.fill_rect(Rect::new(bar.x, bar.y, bar.w * fraction, bar.h), C_HP_FRONT);
    out.stroke_rect(bar, C_TEXT);
    out.text(
        Vec2::new(bar.right() + 10.0, bar.y),
        &format!("HP {}/{}", player.hp, player.max_hp),
        C_TEXT,
    );
    out.text(
        Vec2::new(10.0, 34.0),
        &format!("Coins: {}", game.inventory.coins),
        C_COINS,
    );

    // World and round, top centre
    let world = game.world_manager.current_world_info();
    let round = game.round_manager.get_round_info();
    out.text_centered(
        Vec2::new(width / 2.0, 10.0),
        &format!(
            "{}  {}/{}  Round {}",
            world.name, world.rounds_completed, world.rounds_to_complete, round.round
        ),
        accent,
    );
    if round.in_break {
        out.text_centered(
            Vec2::new(width / 2.0, 34.0),
            &format!("Next round in {:.1}s", round.break_time),
            C_HINT,
        );
    } else {
        out.text_centered(
            Vec2::new(width / 2.0, 34.0),
            &format!(
                "Enemies: {} alive, {} to spawn",
                game.enemies.len(),
                round.enemies_remaining
            ),
            C_HINT,
        );
    }

    // Kills, top right
    let kills = format!("Kills: {}", game.kills);
    out.text(
        Vec2::new(width - 10.0 - kills.len() as f32 * 8.0, 10.0),
        &kills,
        C_TEXT,
    );

    // Weapon slots, bottom left
    let bottom = game.height() - 30.0;
    for (i, slot) in game.inventory.weapons.iter().enumerate() {
        let active = i == game.inventory.active_weapon_index;
        let label = match slot {
            Some(weapon) if active => format!("[{} {}]", i + 1, weapon.name()),
            Some(weapon) => format!(" {} {} ", i + 1, weapon.name()),
            None => format!(" {} -- ", i + 1),
        };
        let color = match slot {
            Some(weapon) if active => weapon.color(),
            _ => C_HINT,
        };
        out.text(Vec2::new(10.0 + i as f32 * 150.0, bottom), &label, color);
    }

    // Active powerups, bottom right
    let mut y = bottom;
    for powerup in game.inventory.powerups.iter().filter(|p| p.is_active()) {
        let label = format!("{} {:.0}s", powerup.kind.name(), powerup.time_remaining.ceil());
        out.text(
            Vec2::new(width - 10.0 - label.len() as f32 * 8.0, y),
            &label,
            powerup.kind.color(),
        );
        y -= 20.0;
    }
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn draw_buttons<R: Renderer>(out: &mut R, menu: &Menu) {
    for (i, button) in menu.buttons.iter().enumerate() {
        out.fill_rect(button.rect, C_BUTTON);
        out.stroke_rect(button.rect, C_TEXT);
        out.text_centered(
            Vec2::new(button.rect.center().x, button.rect.center().y - 4.0),
            &format!("{}. {}", i + 1, button.action.label()),
            C_TEXT,
        );
    }
}

fn draw_main_menu<R: Renderer>(out: &mut R, game: &Game) {
    let (w, h) = (game.width(), game.height());
    out.clear(C_OVERLAY);
    out.text_centered(Vec2::new(w / 2.0, h / 4.0), &game.config.game.title, C_PLAYER);
    out.text_centered(
        Vec2::new(w / 2.0, h / 4.0 + 40.0),
        "Survive the rounds. Clear the worlds.",
        C_HINT,
    );
    if let Some(info) = &game.save_info {
        out.text_centered(
            Vec2::new(w / 2.0, h / 4.0 + 80.0),
            &format!(
                "Saved: world {} round {}  ({} kills)",
                info.world_number, info.round_number, info.kills
            ),
            C_COINS,
        );
    }
    draw_buttons(out, &game.main_menu);
    out.text_centered(
        Vec2::new(w / 2.0, h - 30.0),
        "WASD move | mouse aim | space/click fire | 1-3 weapon | Esc pause",
        C_HINT,
    );
}

fn draw_menu_overlay<R: Renderer>(
    out: &mut R,
    game: &Game,
    title: &str,
    menu: &Menu,
    color: Color,
) {
    let (w, h) = (game.width(), game.height());
    let panel = Rect::new(w / 2.0 - 180.0, h / 2.0 - 140.0, 360.0, 330.0);
    out.fill_rect(panel, C_OVERLAY);
    out.stroke_rect(panel, color);
    out.text_centered(Vec2::new(w / 2.0, panel.y + 30.0), title, color);
    draw_buttons(out, menu);
}

fn draw_final_stats<R: Renderer>(out: &mut R, game: &Game) {
    let (w, h) = (game.width(), game.height());
    let minutes = (game.playtime / 60.0) as u64;
    let seconds = (game.playtime % 60.0) as u64;
    out.text_centered(
        Vec2::new(w / 2.0, h / 2.0 - 70.0),
        &format!(
            "{} round {}  |  {} kills  |  {:02}:{:02}",
            game.world_manager.current_world().name,
            game.round_manager.current_round,
            game.kills,
            minutes,
            seconds
        ),
        C_TEXT,
    );
}

// ── Shop ──────────────────────────────────────────────────────────────────────

fn draw_shop<R: Renderer>(out: &mut R, game: &Game) {
    let (w, h) = (game.width(), game.height());
    let shop = &game.shop;
    out.clear(C_OVERLAY);

    out.text_centered(Vec2::new(w / 2.0, 40.0), "UPGRADE SHOP", C_COINS);
    out.text_centered(
        Vec2::new(w / 2.0, 80.0),
        &format!(
            "Coins: {}   Time left: {:.0}s",
            game.inventory.coins,
            shop.time_remaining.ceil()
        ),
        C_TEXT,
    );

    for (i, upgrade) in shop.upgrades.iter().enumerate() {
        let rect = shop.upgrade_button(i);
        let affordable = shop.can_afford(i, &game.inventory);
        out.fill_rect(rect, if affordable { C_BUTTON } else { C_BUTTON_DIM });
        out.stroke_rect(rect, if affordable { C_COINS } else { C_HINT });
        out.text(
            Vec2::new(rect.x + 10.0, rect.y + 10.0),
            &format!("{}. {}  ({} coins)", i + 1, upgrade.name, upgrade.cost),
            if affordable { C_TEXT } else { C_HINT },
        );
        out.text(
            Vec2::new(rect.x + 10.0, rect.y + 40.0),
            &format!("{}  [owned {}]", upgrade.description, upgrade.purchase_count),
            C_HINT,
        );
    }

    let cont = shop.continue_button();
    out.fill_rect(cont, C_BUTTON);
    out.stroke_rect(cont, C_TEXT);
    out.text_centered(
        Vec2::new(cont.center().x, cont.center().y - 4.0),
        "Continue (Enter)",
        C_TEXT,
    );
    out.text_centered(Vec2::new(w / 2.0, h - 90.0), "1-4 to buy", C_HINT);
}
