use web_time::Instant;

use crate::audio::Audio;
use crate::game::{CompletionStats, GameCallbacks, Severity};

const NOTIFICATION_SECONDS: f32 = 3.0;

// ---------------------------------------------------------------------------
// Core helpers
// ---------------------------------------------------------------------------

fn doc() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

fn set_visible(id: &str, visible: bool) {
    if let Some(doc) = doc() {
        if let Some(el) = doc.get_element_by_id(id) {
            let display = if visible {
                "display: block;"
            } else {
                "display: none;"
            };
            let _ = el.set_attribute("style", display);
        }
    }
}

fn set_text(id: &str, text: &str) {
    if let Some(doc) = doc() {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }
}

fn set_class(id: &str, class: &str) {
    if let Some(doc) = doc() {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }
}

fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

// ---------------------------------------------------------------------------
// DOM-backed frontend
// ---------------------------------------------------------------------------

/// Routes game callbacks to the HUD elements in index.html and to the
/// audio elements. Notifications auto-hide after a few seconds, driven by
/// `tick` from the frame loop.
pub struct DomUi {
    audio: Audio,
    notification_shown: Option<Instant>,
}

impl DomUi {
    pub fn new() -> Self {
        Self {
            audio: Audio::new(),
            notification_shown: None,
        }
    }

    pub fn tick(&mut self) {
        if let Some(shown) = self.notification_shown
            && shown.elapsed().as_secs_f32() > NOTIFICATION_SECONDS
        {
            self.notification_shown = None;
            set_visible("notification", false);
        }
    }
}

impl GameCallbacks for DomUi {
    fn update_score(&mut self, score: u32) {
        set_text("score-value", &score.to_string());
    }

    fn update_items(&mut self, collected: usize, total: usize) {
        set_text("items-value", &format!("{collected} / {total}"));
    }

    fn update_timer(&mut self, seconds: u32, counting_down: bool) {
        set_text("timer-value", &format_clock(seconds));
        let class = if !counting_down {
            "timer"
        } else if seconds <= 10 {
            "timer danger"
        } else if seconds <= 30 {
            "timer warning"
        } else {
            "timer"
        };
        set_class("timer-value", class);
    }

    fn update_level(&mut self, index: usize, name: &str) {
        set_text("level-value", &format!("Level {index}: {name}"));
    }

    fn show_notification(&mut self, text: &str, severity: Severity) {
        set_text("notification", text);
        let class = match severity {
            Severity::Info => "notification info",
            Severity::Success => "notification success",
            Severity::Warning => "notification warning",
            Severity::Danger => "notification danger",
        };
        set_class("notification", class);
        set_visible("notification", true);
        self.notification_shown = Some(Instant::now());
    }

    fn show_completion(&mut self, stats: &CompletionStats) {
        set_visible("complete-overlay", true);
        set_text(
            "complete-title",
            if stats.campaign_finished {
                "HUNT COMPLETE!"
            } else {
                "LEVEL CLEAR!"
            },
        );
        set_text(
            "complete-subtitle",
            if stats.campaign_finished {
                "You found every relic. Press Enter for the menu."
            } else {
                "Press Enter for the next level"
            },
        );
        set_text("complete-level", stats.level_name);
        set_text("complete-items", &stats.items.to_string());
        set_text("complete-bonus", &stats.time_bonus.to_string());
        set_text("complete-score", &stats.score.to_string());
    }

    fn show_menu(&mut self, can_continue: bool) {
        set_visible("menu-overlay", true);
        set_visible("continue-hint", can_continue);
        set_visible("complete-overlay", false);
    }

    fn hide_menu(&mut self) {
        set_visible("menu-overlay", false);
        set_visible("complete-overlay", false);
    }

    fn show_hud(&mut self) {
        set_visible("hud", true);
    }

    fn hide_hud(&mut self) {
        set_visible("hud", false);
    }

    fn sfx_collect(&mut self) {
        self.audio.play_collect();
    }

    fn sfx_level_complete(&mut self) {
        self.audio.play_level_complete();
    }

    fn sfx_game_over(&mut self) {
        self.audio.play_game_over();
    }
}
