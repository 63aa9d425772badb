use glam::Vec3;

use crate::config::*;
use crate::input::MoveInput;
use crate::level::Level;
use crate::player::Player;
use crate::themes;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamePhase {
    Menu,
    Playing,
    Paused,
    LevelComplete,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// End-of-level summary handed to the frontend.
#[derive(Debug, Clone)]
pub struct CompletionStats {
    pub level_index: usize,
    pub level_name: &'static str,
    pub items: usize,
    pub time_bonus: u32,
    pub score: u32,
    pub campaign_finished: bool,
}

/// Everything the simulation tells the outside world. The native build
/// wires this to log output, the web build to the DOM HUD and audio.
pub trait GameCallbacks {
    fn update_score(&mut self, score: u32);
    fn update_items(&mut self, collected: usize, total: usize);
    /// `counting_down` distinguishes the countdown clock from the
    /// elapsed-time display on unbounded levels.
    fn update_timer(&mut self, seconds: u32, counting_down: bool);
    fn update_level(&mut self, index: usize, name: &str);
    fn show_notification(&mut self, text: &str, severity: Severity);
    fn show_completion(&mut self, stats: &CompletionStats);
    fn show_menu(&mut self, can_continue: bool);
    fn hide_menu(&mut self);
    fn show_hud(&mut self);
    fn hide_hud(&mut self);
    fn sfx_collect(&mut self) {}
    fn sfx_level_complete(&mut self) {}
    fn sfx_game_over(&mut self) {}
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    level_index: usize,
    score: u32,
}

/// Owns the player, the current level and all cross-level progression
/// state. Every transition funnels through here; the frontend only
/// forwards input and renders what the callbacks report.
pub struct GameManager {
    pub player: Player,
    level: Option<Level>,
    phase: GamePhase,
    score: u32,
    /// 1-based, matching what the HUD shows.
    level_index: usize,
    time_remaining: u32,
    time_elapsed: u32,
    timer_accum: f32,
    warned_major: bool,
    warned_final: bool,
    checkpoint: Option<Checkpoint>,
    menu_delay: Option<f32>,
}

impl GameManager {
    pub fn new() -> Self {
        Self {
            player: Player::new(Self::spawn_point()),
            level: None,
            phase: GamePhase::Menu,
            score: 0,
            level_index: 1,
            time_remaining: 0,
            time_elapsed: 0,
            timer_accum: 0.0,
            warned_major: false,
            warned_final: false,
            checkpoint: None,
            menu_delay: None,
        }
    }

    fn spawn_point() -> Vec3 {
        Vec3::new(0.0, EYE_HEIGHT, 0.0)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn has_checkpoint(&self) -> bool {
        self.checkpoint.is_some()
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Fresh run from level 1 with a zeroed score.
    pub fn start_game(&mut self, cb: &mut dyn GameCallbacks) {
        self.score = 0;
        self.load_level(1, cb);
    }

    /// Resume from the last completed level. Falls back to a fresh run
    /// when no checkpoint exists.
    pub fn continue_game(&mut self, cb: &mut dyn GameCallbacks) {
        match self.checkpoint {
            Some(cp) => {
                self.score = cp.score;
                self.load_level(cp.level_index, cb);
            }
            None => self.start_game(cb),
        }
    }

    fn load_level(&mut self, index: usize, cb: &mut dyn GameCallbacks) {
        if let Some(level) = &mut self.level {
            level.dispose();
        }

        let mut campaign = themes::campaign();
        let theme = campaign.swap_remove(index - 1);
        let mut level = Level::new(theme);
        level.load(index as u64);

        self.level_index = index;
        self.time_remaining = level.time_limit().unwrap_or(0);
        self.time_elapsed = 0;
        self.timer_accum = 0.0;
        self.warned_major = false;
        self.warned_final = false;
        self.menu_delay = None;

        self.player.reset(Self::spawn_point());
        self.player.set_active(true);
        self.phase = GamePhase::Playing;

        cb.hide_menu();
        cb.show_hud();
        cb.update_level(index, level.name());
        cb.update_score(self.score);
        cb.update_items(0, level.total_items());
        match level.time_limit() {
            Some(limit) => cb.update_timer(limit, true),
            None => cb.update_timer(0, false),
        }
        cb.show_notification(
            &format!("Find {} relics!", level.total_items()),
            Severity::Info,
        );

        log::info!("level {} ({}) started", index, level.name());
        self.level = Some(level);
    }

    pub fn look(&mut self, dx: f32, dy: f32) {
        if self.phase == GamePhase::Playing {
            self.player.look(dx, dy);
        }
    }

    pub fn jump(&mut self) {
        if self.phase == GamePhase::Playing {
            self.player.jump();
        }
    }

    /// One simulation frame. Only `Playing` advances the world; a paused
    /// or finished game ignores time except for the game-over menu delay.
    pub fn update(&mut self, dt: f32, input: &MoveInput, cb: &mut dyn GameCallbacks) {
        match self.phase {
            GamePhase::Playing => self.update_playing(dt, input, cb),
            GamePhase::GameOver => {
                if let Some(delay) = &mut self.menu_delay {
                    *delay -= dt;
                    if *delay <= 0.0 {
                        self.menu_delay = None;
                        self.return_to_menu(cb);
                    }
                }
            }
            GamePhase::Menu | GamePhase::Paused | GamePhase::LevelComplete => {}
        }
    }

    fn update_playing(&mut self, dt: f32, input: &MoveInput, cb: &mut dyn GameCallbacks) {
        let Some(level) = &mut self.level else {
            return;
        };

        self.player
            .update(dt, input, level.world(), level.ground_plane());
        level.update(dt);

        let collected = level.check_collisions(self.player.position);
        if collected > 0 {
            self.on_items_collected(collected, cb);
            // Completing the level freezes the frame right here; neither
            // the boundary check nor the clock may run after it.
            if self.phase != GamePhase::Playing {
                return;
            }
        }

        if let Some(level) = &self.level
            && level.check_boundary_violation(self.player.position)
        {
            self.game_over("You wandered out of the hunt area!", cb);
            return;
        }

        self.tick_timer(dt, cb);
    }

    fn on_items_collected(&mut self, count: usize, cb: &mut dyn GameCallbacks) {
        let Some(level) = &self.level else {
            return;
        };

        for _ in 0..count {
            let time_bonus = if level.time_limit().is_some() {
                (self.time_remaining / 10) * 10
            } else {
                0
            };
            self.score += 100 * self.level_index as u32 + time_bonus;
        }

        cb.update_score(self.score);
        cb.update_items(level.items_collected(), level.total_items());
        cb.sfx_collect();

        let remaining = level.total_items() - level.items_collected();
        if remaining > 0 {
            cb.show_notification(&format!("Relic found! {remaining} to go"), Severity::Success);
        }

        if level.is_complete() {
            self.complete_level(cb);
        }
    }

    fn complete_level(&mut self, cb: &mut dyn GameCallbacks) {
        let Some(level) = &self.level else {
            return;
        };

        let time_bonus = if level.time_limit().is_some() {
            self.time_remaining * 10
        } else {
            0
        };
        self.score += time_bonus;

        let finished = self.level_index >= themes::theme_count();
        let stats = CompletionStats {
            level_index: self.level_index,
            level_name: level.name(),
            items: level.items_collected(),
            time_bonus,
            score: self.score,
            campaign_finished: finished,
        };

        // Progress is kept at the level the player will enter next, so a
        // later game over resumes past the cleared level.
        if !finished {
            self.checkpoint = Some(Checkpoint {
                level_index: self.level_index + 1,
                score: self.score,
            });
        }

        self.phase = GamePhase::LevelComplete;
        self.player.set_active(false);
        cb.update_score(self.score);
        cb.show_completion(&stats);
        cb.sfx_level_complete();
        log::info!(
            "level {} complete, score {}, bonus {}",
            self.level_index,
            self.score,
            time_bonus
        );
    }

    /// Move on from the completion screen: next level, or back to the
    /// menu once the campaign is done.
    pub fn advance_level(&mut self, cb: &mut dyn GameCallbacks) {
        if self.phase != GamePhase::LevelComplete {
            return;
        }
        if self.level_index < themes::theme_count() {
            self.load_level(self.level_index + 1, cb);
        } else {
            self.checkpoint = None;
            self.return_to_menu(cb);
        }
    }

    fn game_over(&mut self, reason: &str, cb: &mut dyn GameCallbacks) {
        // Expiry and a boundary breach can race in the same frame; only
        // the first one counts.
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.player.set_active(false);
        self.menu_delay = Some(GAME_OVER_MENU_DELAY);
        cb.show_notification(reason, Severity::Danger);
        cb.sfx_game_over();
        log::info!("game over: {reason}");
    }

    pub fn toggle_pause(&mut self, cb: &mut dyn GameCallbacks) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.player.set_active(false);
                cb.show_notification("Paused", Severity::Info);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.player.set_active(true);
            }
            _ => {}
        }
    }

    pub fn return_to_menu(&mut self, cb: &mut dyn GameCallbacks) {
        if let Some(level) = &mut self.level {
            level.dispose();
        }
        self.level = None;
        self.phase = GamePhase::Menu;
        self.player.set_active(false);
        cb.hide_hud();
        cb.show_menu(self.checkpoint.is_some());
    }

    /// Whole-second clock folded into the frame loop, so pausing the game
    /// pauses the clock for free.
    fn tick_timer(&mut self, dt: f32, cb: &mut dyn GameCallbacks) {
        let Some(level) = &self.level else {
            return;
        };
        let counting_down = level.time_limit().is_some();

        self.timer_accum += dt;
        while self.timer_accum >= 1.0 {
            self.timer_accum -= 1.0;

            if counting_down {
                self.time_remaining = self.time_remaining.saturating_sub(1);
                cb.update_timer(self.time_remaining, true);

                if self.time_remaining == TIME_WARNING_MAJOR && !self.warned_major {
                    self.warned_major = true;
                    cb.show_notification("30 seconds left!", Severity::Warning);
                }
                if self.time_remaining == TIME_WARNING_FINAL && !self.warned_final {
                    self.warned_final = true;
                    cb.show_notification("10 seconds left!", Severity::Danger);
                }
                if self.time_remaining == 0 {
                    self.game_over("Time's up!", cb);
                    return;
                }
            } else {
                self.time_elapsed += 1;
                cb.update_timer(self.time_elapsed, false);
            }
        }
    }
}

impl Default for GameManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        scores: Vec<u32>,
        items: Vec<(usize, usize)>,
        timers: Vec<(u32, bool)>,
        notifications: Vec<(String, Severity)>,
        completions: Vec<CompletionStats>,
        menus: Vec<bool>,
        game_over_sfx: usize,
        collect_sfx: usize,
    }

    impl GameCallbacks for Recorder {
        fn update_score(&mut self, score: u32) {
            self.scores.push(score);
        }
        fn update_items(&mut self, collected: usize, total: usize) {
            self.items.push((collected, total));
        }
        fn update_timer(&mut self, seconds: u32, counting_down: bool) {
            self.timers.push((seconds, counting_down));
        }
        fn update_level(&mut self, _index: usize, _name: &str) {}
        fn show_notification(&mut self, text: &str, severity: Severity) {
            self.notifications.push((text.to_string(), severity));
        }
        fn show_completion(&mut self, stats: &CompletionStats) {
            self.completions.push(stats.clone());
        }
        fn show_menu(&mut self, can_continue: bool) {
            self.menus.push(can_continue);
        }
        fn hide_menu(&mut self) {}
        fn show_hud(&mut self) {}
        fn hide_hud(&mut self) {}
        fn sfx_collect(&mut self) {
            self.collect_sfx += 1;
        }
        fn sfx_game_over(&mut self) {
            self.game_over_sfx += 1;
        }
    }

    fn started() -> (GameManager, Recorder) {
        let mut gm = GameManager::new();
        let mut cb = Recorder::default();
        gm.start_game(&mut cb);
        (gm, cb)
    }

    /// Teleport the player onto each remaining collectible in turn.
    fn collect_all(gm: &mut GameManager, cb: &mut Recorder) {
        while gm.phase() == GamePhase::Playing {
            let Some(spot) = gm
                .level()
                .and_then(|l| l.collectibles().iter().find(|c| !c.is_collected()))
                .map(|c| c.position)
            else {
                break;
            };
            gm.player.position = spot;
            gm.update(0.016, &MoveInput::default(), cb);
        }
    }

    #[test]
    fn starting_a_game_zeroes_progress() {
        let (gm, cb) = started();
        assert_eq!(gm.phase(), GamePhase::Playing);
        assert_eq!(gm.score(), 0);
        assert_eq!(gm.level_index(), 1);
        assert_eq!(gm.level().unwrap().items_collected(), 0);
        assert_eq!(cb.items.last(), Some(&(0, 5)));
        assert_eq!(cb.timers.last(), Some(&(60, true)));
    }

    #[test]
    fn collecting_scores_level_scaled_points() {
        let (mut gm, mut cb) = started();
        let spot = gm.level().unwrap().collectibles()[0].position;
        gm.player.position = spot;
        gm.update(0.016, &MoveInput::default(), &mut cb);

        // 100 * level 1 + full-time bonus (60 / 10 * 10).
        assert_eq!(gm.score(), 160);
        assert_eq!(cb.collect_sfx, 1);
        assert_eq!(gm.level().unwrap().items_collected(), 1);
    }

    #[test]
    fn score_is_monotonic_across_a_whole_level() {
        let (mut gm, mut cb) = started();
        collect_all(&mut gm, &mut cb);

        assert!(
            cb.scores.windows(2).all(|w| w[0] <= w[1]),
            "score went down somewhere in {:?}",
            cb.scores
        );
        assert_eq!(gm.phase(), GamePhase::LevelComplete);
    }

    #[test]
    fn completing_a_level_pays_the_time_bonus_and_checkpoints() {
        let (mut gm, mut cb) = started();
        collect_all(&mut gm, &mut cb);

        let stats = cb.completions.last().expect("completion shown");
        assert_eq!(stats.level_index, 1);
        assert_eq!(stats.items, 5);
        assert_eq!(stats.time_bonus, gm.time_remaining() * 10);
        assert!(!stats.campaign_finished);
        assert!(gm.has_checkpoint());
    }

    #[test]
    fn final_collect_on_the_last_second_still_completes() {
        let (mut gm, mut cb) = started();

        // Leave one relic, then burn the clock down to the final second.
        while gm.level().unwrap().items_collected() < 4 {
            let spot = gm
                .level()
                .unwrap()
                .collectibles()
                .iter()
                .find(|c| !c.is_collected())
                .unwrap()
                .position;
            gm.player.position = spot;
            gm.update(0.016, &MoveInput::default(), &mut cb);
        }
        while gm.time_remaining() > 1 {
            gm.update(1.0, &MoveInput::default(), &mut cb);
        }
        assert_eq!(gm.phase(), GamePhase::Playing);

        // The frame that collects the last relic also spans a whole
        // second; completion must win over expiry.
        let last = gm
            .level()
            .unwrap()
            .collectibles()
            .iter()
            .find(|c| !c.is_collected())
            .unwrap()
            .position;
        gm.player.position = last;
        gm.update(1.0, &MoveInput::default(), &mut cb);

        assert_eq!(gm.phase(), GamePhase::LevelComplete);
        assert_eq!(cb.game_over_sfx, 0);
        assert!(gm.has_checkpoint());
    }

    #[test]
    fn advance_moves_to_the_next_level_carrying_score() {
        let (mut gm, mut cb) = started();
        collect_all(&mut gm, &mut cb);
        let banked = gm.score();

        gm.advance_level(&mut cb);
        assert_eq!(gm.phase(), GamePhase::Playing);
        assert_eq!(gm.level_index(), 2);
        assert_eq!(gm.score(), banked);
        // Level 2 runs on the count-up clock.
        assert_eq!(cb.timers.last(), Some(&(0, false)));
    }

    #[test]
    fn continue_resumes_from_the_checkpoint() {
        let (mut gm, mut cb) = started();
        collect_all(&mut gm, &mut cb);
        let banked = gm.score();
        gm.advance_level(&mut cb);

        // Die on level 2, then continue.
        gm.player.position = Vec3::new(500.0, 1.6, 0.0);
        gm.update(0.016, &MoveInput::default(), &mut cb);
        assert_eq!(gm.phase(), GamePhase::GameOver);

        gm.continue_game(&mut cb);
        assert_eq!(gm.level_index(), 2);
        assert_eq!(gm.score(), banked);
    }

    #[test]
    fn timer_expiry_ends_the_game_exactly_once() {
        let (mut gm, mut cb) = started();
        let input = MoveInput::default();

        for _ in 0..70 {
            gm.update(1.0, &input, &mut cb);
        }
        assert_eq!(cb.game_over_sfx, 1, "game over fired more than once");

        let warnings: Vec<_> = cb
            .notifications
            .iter()
            .filter(|(_, s)| *s == Severity::Warning || *s == Severity::Danger)
            .collect();
        // 30 s warning, 10 s warning, then the time's-up message.
        assert_eq!(warnings.len(), 3, "got {warnings:?}");
    }

    #[test]
    fn boundary_breach_ends_the_game() {
        let (mut gm, mut cb) = started();
        gm.player.position = Vec3::new(45.01, 1.6, 0.0);
        gm.update(0.016, &MoveInput::default(), &mut cb);

        assert_eq!(gm.phase(), GamePhase::GameOver);
        assert_eq!(cb.game_over_sfx, 1);

        // Further frames in GameOver do not re-trigger.
        gm.update(0.016, &MoveInput::default(), &mut cb);
        assert_eq!(cb.game_over_sfx, 1);
    }

    #[test]
    fn game_over_returns_to_menu_after_a_beat() {
        let (mut gm, mut cb) = started();
        gm.player.position = Vec3::new(0.0, 1.6, 100.0);
        gm.update(0.016, &MoveInput::default(), &mut cb);
        assert_eq!(gm.phase(), GamePhase::GameOver);
        assert!(cb.menus.is_empty());

        gm.update(GAME_OVER_MENU_DELAY + 0.1, &MoveInput::default(), &mut cb);
        assert_eq!(gm.phase(), GamePhase::Menu);
        assert_eq!(cb.menus.last(), Some(&false), "no checkpoint on level 1");
    }

    #[test]
    fn pause_freezes_the_clock_and_the_player() {
        let (mut gm, mut cb) = started();
        gm.toggle_pause(&mut cb);
        assert_eq!(gm.phase(), GamePhase::Paused);

        let before = gm.time_remaining();
        let pos = gm.player.position;
        for _ in 0..10 {
            gm.update(1.0, &MoveInput::default(), &mut cb);
        }
        assert_eq!(gm.time_remaining(), before);
        assert_eq!(gm.player.position, pos);

        gm.toggle_pause(&mut cb);
        assert_eq!(gm.phase(), GamePhase::Playing);
    }

    #[test]
    fn unbounded_level_never_times_out() {
        let (mut gm, mut cb) = started();
        collect_all(&mut gm, &mut cb);
        gm.advance_level(&mut cb);
        assert_eq!(gm.level_index(), 2);

        for _ in 0..300 {
            gm.update(1.0, &MoveInput::default(), &mut cb);
        }
        assert_eq!(gm.phase(), GamePhase::Playing);
        assert_eq!(cb.timers.last(), Some(&(300, false)));
    }

    #[test]
    fn look_and_jump_are_ignored_outside_play() {
        let mut gm = GameManager::new();
        let yaw_before = gm.player.yaw;
        gm.look(100.0, 0.0);
        gm.jump();
        assert_eq!(gm.player.yaw, yaw_before);
        assert_eq!(gm.player.velocity.y, 0.0);
    }
}
