//! Input Intent Surface
//!
//! Scripts never see raw device events. The embedder translates whatever
//! input backend it uses into this discrete intent struct and hands it to
//! every tick; scripts read pressed/held signals from it.

/// Discrete player intent for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Intent {
    /// Desired horizontal movement in [-1, 1]
    pub move_x: f32,
    /// Jump was pressed this tick (edge)
    pub jump_pressed: bool,
    /// Jump is held down (level)
    pub jump_held: bool,
    /// Attack was pressed this tick (edge)
    pub attack_pressed: bool,
}

impl Intent {
    /// The neutral intent: nothing pressed.
    pub fn idle() -> Self {
        Self::default()
    }
}
