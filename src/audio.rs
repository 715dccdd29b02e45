use color_eyre::eyre::{Result, WrapErr};
use log::{debug, warn};
use rodio::source::{Buffered, SineWave};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::config::AudioConfig;
use crate::game::{MARCH_STEPS, SoundCue};

type Sample = Buffered<Decoder<BufReader<File>>>;

const MARCH_FILES: [&str; MARCH_STEPS as usize] = [
    "fastinvader1.wav",
    "fastinvader2.wav",
    "fastinvader3.wav",
    "fastinvader4.wav",
];
const TITLE_FILE: &str = "title.wav";
const BONUS_FILE: &str = "ufo_highpitch.wav";
/// One-shot cues with the tone (Hz, ms) played when their file is missing
const ONE_SHOTS: [(SoundCue, f32, u64); 9] = [
    (SoundCue::Shoot, 880.0, 60),
    (SoundCue::InvaderKilled, 440.0, 120),
    (SoundCue::PlayerKilled, 110.0, 400),
    (SoundCue::WaveCreated, 660.0, 200),
    (SoundCue::GameOver, 90.0, 800),
    (SoundCue::March(0), 160.0, 80),
    (SoundCue::March(1), 140.0, 80),
    (SoundCue::March(2), 120.0, 80),
    (SoundCue::March(3), 100.0, 80),
];
/// Tone fallbacks are quieter than samples
const TONE_GAIN: f32 = 0.2;

/// A cue's sound: the decoded file, or a beep when the file couldn't be read
enum CueSound {
    Sample(Sample),
    Tone { frequency: f32, duration: Duration },
}

impl CueSound {
    fn load(dir: &Path, file: &str, frequency: f32, duration_ms: u64) -> Self {
        match load_sample(&dir.join(file)) {
            Ok(sample) => CueSound::Sample(sample),
            Err(err) => {
                warn!("{err:#}, using a tone instead");
                CueSound::Tone {
                    frequency,
                    duration: Duration::from_millis(duration_ms),
                }
            }
        }
    }

    fn append_to(&self, sink: &Sink, looping: bool) {
        match (self, looping) {
            (CueSound::Sample(sample), false) => sink.append(sample.clone()),
            (CueSound::Sample(sample), true) => sink.append(sample.clone().repeat_infinite()),
            (CueSound::Tone { frequency, duration }, false) => {
                sink.append(tone(*frequency, *duration))
            }
            (CueSound::Tone { frequency, duration }, true) => {
                sink.append(tone(*frequency, *duration).repeat_infinite())
            }
        }
    }
}

fn tone(frequency: f32, duration: Duration) -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(frequency)
        .take_duration(duration)
        .amplify(TONE_GAIN)
}

/// Reads and decodes a whole file up front so playback never touches the disk
fn load_sample(path: &Path) -> Result<Sample> {
    let file = File::open(path).wrap_err_with(|| format!("can't open {}", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .wrap_err_with(|| format!("can't decode {}", path.display()))?;
    Ok(source.buffered())
}

/// The file each one-shot cue plays. Loops and `Silence` have none.
fn cue_file(cue: SoundCue) -> Option<&'static str> {
    match cue {
        SoundCue::Shoot => Some("shoot.wav"),
        SoundCue::InvaderKilled => Some("invaderkilled.wav"),
        SoundCue::PlayerKilled => Some("explosion.wav"),
        SoundCue::WaveCreated => Some("create_invaders.wav"),
        SoundCue::GameOver => Some("game-over.wav"),
        SoundCue::March(step) => MARCH_FILES.get(step as usize).copied(),
        SoundCue::BonusLoopStart
        | SoundCue::BonusLoopStop
        | SoundCue::TitleLoopStart
        | SoundCue::TitleLoopStop
        | SoundCue::Silence => None,
    }
}

/// A looping sound that keeps track of whether the game wants it playing,
/// so unmuting can bring it back.
struct Loop {
    sound: Option<CueSound>,
    volume: f32,
    sink: Option<Sink>,
    wanted: bool,
}

impl Loop {
    fn new(sound: Option<CueSound>, volume: f32) -> Self {
        Self {
            sound,
            volume,
            sink: None,
            wanted: false,
        }
    }

    fn start(&mut self, handle: &OutputStreamHandle) {
        if self.sink.is_some() {
            return;
        }
        let Some(sound) = &self.sound else {
            return;
        };
        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                sound.append_to(&sink, true);
                self.sink = Some(sink);
            }
            Err(err) => warn!("failed to start loop: {err}"),
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

/// Plays the game's sound cues on the default output device
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    one_shots: HashMap<SoundCue, CueSound>,
    bonus_loop: Loop,
    title_loop: Loop,
    /// One-shots still playing, kept so `Silence` can cut them off
    effects: Vec<Sink>,
    volume: f32,
    muted: bool,
}

impl AudioManager {
    /// Opens the output device and pre-loads every cue from `asset_dir`
    pub fn new(config: &AudioConfig) -> Result<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().wrap_err("no audio output device")?;

        let dir = config.asset_dir.as_path();
        let one_shots = ONE_SHOTS
            .iter()
            .filter_map(|&(cue, frequency, duration_ms)| {
                let file = cue_file(cue)?;
                Some((cue, CueSound::load(dir, file, frequency, duration_ms)))
            })
            .collect();
        let bonus = CueSound::load(dir, BONUS_FILE, 1200.0, 120);
        let title = match load_sample(&dir.join(TITLE_FILE)) {
            Ok(sample) => Some(CueSound::Sample(sample)),
            Err(err) => {
                warn!("{err:#}, title screen will be silent");
                None
            }
        };

        debug!("audio loaded from {}", dir.display());
        Ok(Self {
            _stream: stream,
            stream_handle,
            one_shots,
            bonus_loop: Loop::new(Some(bonus), config.bonus_volume),
            title_loop: Loop::new(title, config.volume),
            effects: Vec::new(),
            volume: config.volume,
            muted: config.start_muted,
        })
    }

    /// Muting stops everything; unmuting restarts whichever loops the game
    /// still wants
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_effects();
            self.bonus_loop.stop();
            self.title_loop.stop();
        } else {
            for looped in [&mut self.bonus_loop, &mut self.title_loop] {
                if looped.wanted {
                    looped.start(&self.stream_handle);
                }
            }
        }
    }

    pub fn play(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::BonusLoopStart => self.start_loop(LoopKind::Bonus),
            SoundCue::BonusLoopStop => self.stop_loop(LoopKind::Bonus),
            SoundCue::TitleLoopStart => self.start_loop(LoopKind::Title),
            SoundCue::TitleLoopStop => self.stop_loop(LoopKind::Title),
            SoundCue::Silence => {
                self.stop_effects();
                self.stop_loop(LoopKind::Bonus);
                self.stop_loop(LoopKind::Title);
            }
            _ => self.play_effect(cue),
        }
    }

    fn play_effect(&mut self, cue: SoundCue) {
        if self.muted {
            return;
        }
        let Some(sound) = self.one_shots.get(&cue) else {
            return;
        };

        // Ignore errors for sound playback - don't want to crash the game
        if let Ok(sink) = Sink::try_new(&self.stream_handle) {
            sink.set_volume(self.volume);
            sound.append_to(&sink, false);
            self.effects.retain(|sink| !sink.empty());
            self.effects.push(sink);
        }
    }

    fn stop_effects(&mut self) {
        for sink in self.effects.drain(..) {
            sink.stop();
        }
    }

    fn looped(&mut self, kind: LoopKind) -> &mut Loop {
        match kind {
            LoopKind::Bonus => &mut self.bonus_loop,
            LoopKind::Title => &mut self.title_loop,
        }
    }

    fn start_loop(&mut self, kind: LoopKind) {
        let muted = self.muted;
        let handle = self.stream_handle.clone();
        let looped = self.looped(kind);
        looped.wanted = true;
        if !muted {
            looped.start(&handle);
        }
    }

    fn stop_loop(&mut self, kind: LoopKind) {
        let looped = self.looped(kind);
        looped.wanted = false;
        looped.stop();
    }
}

#[derive(Debug, Clone, Copy)]
enum LoopKind {
    Bonus,
    Title,
}
