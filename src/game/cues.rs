/// Sound events the simulation asks the host to play.
///
/// The `*Start`/`*Stop` pairs control looping sounds; everything else is a
/// one-shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Shoot,
    InvaderKilled,
    PlayerKilled,
    BonusLoopStart,
    BonusLoopStop,
    WaveCreated,
    GameOver,
    TitleLoopStart,
    TitleLoopStop,
    /// One of the four march beats, 0..=3
    March(u8),
    /// Stop everything that is playing
    Silence,
}
