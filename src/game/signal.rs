// Signal - The four pads of the game

/// One pad of the game board.
///
/// Each signal carries its own tone frequency and display color; the set
/// is fixed at startup and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Green,
    Red,
    Yellow,
    Blue,
}

impl Signal {
    /// All signals, in board order (top-left, top-right, bottom-left, bottom-right).
    pub const ALL: [Signal; 4] = [Signal::Green, Signal::Red, Signal::Yellow, Signal::Blue];

    /// Tone frequency in Hz (E4, C4, G4, A4).
    pub fn frequency(&self) -> f32 {
        match self {
            Signal::Green => 329.63,
            Signal::Red => 261.63,
            Signal::Yellow => 392.0,
            Signal::Blue => 440.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Signal::Green => "Green",
            Signal::Red => "Red",
            Signal::Yellow => "Yellow",
            Signal::Blue => "Blue",
        }
    }

    /// Stable index into [`Signal::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Signal::Green => 0,
            Signal::Red => 1,
            Signal::Yellow => 2,
            Signal::Blue => 3,
        }
    }
}
