//! Pixel Survivor: a top-down arcade survival shooter.
//!
//! The library holds all game logic and is independent of any terminal or
//! window. Platform services (time, input, drawing) are reached through the
//! traits in [`platform`]; the crossterm implementations live in [`terminal`].

pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod geometry;
pub mod inventory;
pub mod loot;
pub mod modifiers;
pub mod platform;
pub mod powerup;
pub mod round_manager;
pub mod save;
pub mod shop;
pub mod terminal;
pub mod ui;
pub mod weapon;
pub mod world;
