use web_sys::HtmlAudioElement;

/// Sound effects for pickup, level completion and game over, served as
/// static files next to the page.
pub struct Audio {
    collect_sound: HtmlAudioElement,
    complete_sound: HtmlAudioElement,
    game_over_sound: HtmlAudioElement,
}

impl Audio {
    pub fn new() -> Self {
        Self {
            collect_sound: create_audio("assets/collect.mp3"),
            complete_sound: create_audio("assets/level-complete.mp3"),
            game_over_sound: create_audio("assets/game-over.mp3"),
        }
    }

    pub fn play_collect(&self) {
        play(&self.collect_sound);
    }

    pub fn play_level_complete(&self) {
        play(&self.complete_sound);
    }

    pub fn play_game_over(&self) {
        play(&self.game_over_sound);
    }
}

fn create_audio(src: &str) -> HtmlAudioElement {
    HtmlAudioElement::new_with_src(src).expect("Failed to create audio element")
}

fn play(sound: &HtmlAudioElement) {
    sound.set_current_time(0.0);
    // Playback can be rejected before the first user gesture; that is fine.
    let _ = sound.play();
}
