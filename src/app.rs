use color_eyre::Result;
use log::{info, warn};
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::config::{Config, TimingConfig};
use crate::game::Game;
use crate::input::{InputAction, InputManager, tick_input};
use crate::renderer::{GameRenderer, RenderView};

/// Prompts blink on and off at this period
const BLINK_MS: u128 = 500;

/// The main application: owns the game and the terminal-side components
/// and runs the frame loop.
pub struct App {
    running: bool,
    game: Game,
    timing: TimingConfig,
    muted: bool,
    last_frame_time: Instant,
    started: Instant,
    input_manager: InputManager,
    renderer: GameRenderer,
    /// None when there's no usable output device
    audio_manager: Option<AudioManager>,
}

impl App {
    /// `reports_release` tells whether the terminal sends key release events
    pub fn new(config: &Config, seed: u64, reports_release: bool) -> Self {
        let audio_manager = match AudioManager::new(&config.audio) {
            Ok(audio) => Some(audio),
            Err(err) => {
                warn!("continuing without audio: {err:#}");
                None
            }
        };

        let now = Instant::now();
        Self {
            running: true,
            game: Game::new(config.game.clone(), seed),
            timing: config.timing.clone(),
            muted: config.audio.start_muted,
            last_frame_time: now,
            started: now,
            input_manager: InputManager::new(
                reports_release,
                Duration::from_millis(config.timing.key_hold_ms),
            ),
            renderer: GameRenderer::new(),
            audio_manager,
        }
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("entering main loop");
        while self.running {
            let now = Instant::now();
            let dt = self.frame_dt(now);

            self.input_manager.poll_events()?;
            let actions = self.input_manager.get_actions(now);
            self.process_actions(&actions);

            self.game.step(&tick_input(&actions), dt);
            for cue in self.game.drain_cues() {
                if let Some(audio) = &mut self.audio_manager {
                    audio.play(cue);
                }
            }

            let blink_on = self.started.elapsed().as_millis() / BLINK_MS % 2 == 0;
            terminal.draw(|frame| {
                let view = RenderView {
                    snapshot: self.game.snapshot(),
                    area: frame.area(),
                    muted: self.muted,
                    blink_on,
                };
                self.renderer.render(frame, &view);
            })?;

            // Small sleep to prevent CPU spinning
            std::thread::sleep(Duration::from_millis(self.timing.frame_ms));
        }
        info!("quit");
        Ok(())
    }

    /// Milliseconds since the last frame, capped so a stall doesn't
    /// teleport everything
    fn frame_dt(&mut self, now: Instant) -> f64 {
        let elapsed = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        (elapsed.as_secs_f64() * 1000.0).min(self.timing.max_frame_ms)
    }

    /// Host-level actions; the rest go to the game through `TickInput`
    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => self.running = false,
                InputAction::ToggleMute => {
                    self.muted = !self.muted;
                    if let Some(audio) = &mut self.audio_manager {
                        audio.set_muted(self.muted);
                    }
                    info!("muted: {}", self.muted);
                }
                InputAction::FocusLost => self.game.focus_lost(),
                InputAction::MoveLeft
                | InputAction::MoveRight
                | InputAction::Fire
                | InputAction::Confirm
                | InputAction::Pause => {}
            }
        }
    }
}
