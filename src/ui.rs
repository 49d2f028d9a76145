//! Menu screens as lists of clickable buttons.
//!
//! Every button can also be chosen from the keyboard: by its 1-based
//! position on the number row or by its shortcut letter.

use crate::geometry::{Rect, Vec2};
use crate::platform::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Continue,
    NewGame,
    Quit,
    Resume,
    MainMenu,
    Retry,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Continue => "Continue",
            MenuAction::NewGame => "New Game",
            MenuAction::Quit => "Quit",
            MenuAction::Resume => "Resume",
            MenuAction::MainMenu => "Main Menu",
            MenuAction::Retry => "Retry",
        }
    }

    pub fn shortcut(self) -> char {
        match self {
            MenuAction::Continue => 'c',
            MenuAction::NewGame => 'n',
            MenuAction::Quit => 'q',
            MenuAction::Resume => 'r',
            MenuAction::MainMenu => 'm',
            MenuAction::Retry => 'r',
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub action: MenuAction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Menu {
    pub buttons: Vec<Button>,
}

const BUTTON_WIDTH: f32 = 220.0;
const BUTTON_HEIGHT: f32 = 60.0;
const BUTTON_STEP: f32 = 80.0;

impl Menu {
    /// Buttons stacked under the screen centre.
    fn stacked(width: f32, height: f32, actions: &[MenuAction]) -> Self {
        let left = (width - BUTTON_WIDTH) / 2.0;
        let top = height / 2.0 - 10.0;
        let buttons = actions
            .iter()
            .enumerate()
            .map(|(i, &action)| Button {
                rect: Rect::new(left, top + i as f32 * BUTTON_STEP, BUTTON_WIDTH, BUTTON_HEIGHT),
                action,
            })
            .collect();
        Self { buttons }
    }

    /// Continue is only offered when a save exists.
    pub fn main(width: f32, height: f32, has_save: bool) -> Self {
        if has_save {
            Self::stacked(
                width,
                height,
                &[MenuAction::Continue, MenuAction::NewGame, MenuAction::Quit],
            )
        } else {
            Self::stacked(width, height, &[MenuAction::NewGame, MenuAction::Quit])
        }
    }

    pub fn pause(width: f32, height: f32) -> Self {
        Self::stacked(width, height, &[MenuAction::Resume, MenuAction::MainMenu])
    }

    pub fn game_over(width: f32, height: f32) -> Self {
        Self::stacked(width, height, &[MenuAction::Retry, MenuAction::MainMenu])
    }

    pub fn handle_click(&self, point: Vec2) -> Option<MenuAction> {
        self.buttons
            .iter()
            .find(|b| b.rect.contains(point))
            .map(|b| b.action)
    }

    pub fn handle_key(&self, key: Key) -> Option<MenuAction> {
        match key {
            Key::Digit(n) if n >= 1 => self.buttons.get(n as usize - 1).map(|b| b.action),
            Key::Char(c) => {
                let c = c.to_ascii_lowercase();
                self.buttons
                    .iter()
                    .find(|b| b.action.shortcut() == c)
                    .map(|b| b.action)
            }
            Key::Confirm => self.buttons.first().map(|b| b.action),
            _ => None,
        }
    }
}
