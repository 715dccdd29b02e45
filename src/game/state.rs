/// Round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Title,
    Playing,
    Paused,
    GameOver,
}

