mod keyboard;

pub use keyboard::{KeyAction, KeyboardEncoders, parse_key};

/// Which of the two rotary encoders an event came from.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum EncoderId {
    /// Feed selection, seek and pause
    Selection,
    /// Volume and mute
    Volume,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum EncoderEvent {
    RotateCw,
    RotateCcw,
    ButtonPress,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct InputEvent {
    pub encoder: EncoderId,
    pub action: EncoderEvent,
}

impl InputEvent {
    pub fn new(encoder: EncoderId, action: EncoderEvent) -> Self {
        InputEvent { encoder, action }
    }
}

impl std::fmt::Display for EncoderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncoderId::Selection => write!(f, "selection"),
            EncoderId::Volume => write!(f, "volume"),
        }
    }
}
