//! HUD and overlay widgets
//!
//! Thin wrapper over the page's DOM: score text plus the instruction,
//! countdown, waiting and game-over overlays toggled with a `hidden` class.

use web_sys::{Document, Element};

const HIDDEN: &str = "hidden";

/// Element ids the page must provide
pub mod ids {
    pub const SCORE: &str = "score";
    pub const GAME_OVER: &str = "gameOver";
    pub const INSTRUCTIONS: &str = "instructionModal";
    pub const CONFIRM_INSTRUCTIONS: &str = "confirmInstructions";
    pub const COUNTDOWN: &str = "countdown";
    pub const COUNTDOWN_TEXT: &str = "countdownText";
    pub const WAITING: &str = "standByMessage";
    pub const RESTART: &str = "restartButton";
}

pub struct Hud {
    score: Option<Element>,
    game_over: Option<Element>,
    instructions: Option<Element>,
    countdown: Option<Element>,
    countdown_text: Option<Element>,
    waiting: Option<Element>,
}

fn set_visible(el: &Option<Element>, visible: bool) {
    if let Some(el) = el {
        let classes = el.class_list();
        let _ = if visible {
            classes.remove_1(HIDDEN)
        } else {
            classes.add_1(HIDDEN)
        };
    }
}

impl Hud {
    pub fn new(document: &Document) -> Self {
        let hud = Self {
            score: document.get_element_by_id(ids::SCORE),
            game_over: document.get_element_by_id(ids::GAME_OVER),
            instructions: document.get_element_by_id(ids::INSTRUCTIONS),
            countdown: document.get_element_by_id(ids::COUNTDOWN),
            countdown_text: document.get_element_by_id(ids::COUNTDOWN_TEXT),
            waiting: document.get_element_by_id(ids::WAITING),
        };
        let all_found = hud.score.is_some()
            && hud.game_over.is_some()
            && hud.instructions.is_some()
            && hud.countdown.is_some()
            && hud.countdown_text.is_some()
            && hud.waiting.is_some();
        if !all_found {
            log::error!("One or more UI elements not found");
        }
        hud
    }

    pub fn update_score(&self, score: u64) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&format!("Score: {}", score)));
        }
    }

    pub fn show_game_over(&self) {
        set_visible(&self.game_over, true);
    }

    pub fn hide_game_over(&self) {
        set_visible(&self.game_over, false);
    }

    pub fn show_instructions(&self) {
        set_visible(&self.instructions, true);
    }

    pub fn hide_instructions(&self) {
        set_visible(&self.instructions, false);
    }

    pub fn show_countdown(&self) {
        set_visible(&self.countdown, true);
        set_visible(&self.countdown_text, true);
    }

    pub fn hide_countdown(&self) {
        set_visible(&self.countdown, false);
    }

    pub fn update_countdown(&self, value: u32) {
        if let Some(el) = &self.countdown_text {
            el.set_text_content(Some(&value.to_string()));
        }
    }

    pub fn show_waiting(&self) {
        set_visible(&self.waiting, true);
    }

    pub fn hide_waiting(&self) {
        set_visible(&self.waiting, false);
    }

    /// Overlays shown while waiting for the player before a run
    pub fn show_pregame(&self, countdown_from: u32) {
        self.hide_instructions();
        self.hide_game_over();
        self.show_countdown();
        self.update_countdown(countdown_from);
        self.show_waiting();
    }
}
