use super::{EncoderEvent, EncoderId, InputEvent};
use crate::{
    config::{KeyBindingConfig, KeysConfig},
    player::ControlMessage,
};
use anyhow::{Result, bail};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    thread::{self, JoinHandle},
    time::Duration,
};
use tracing::{debug, info, warn};

const X: KeyModifiers = KeyModifiers::NONE;
const C: KeyModifiers = KeyModifiers::CONTROL;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    Encoder(InputEvent),
    Quit,
}

struct Binding {
    cw: KeyCode,
    ccw: KeyCode,
    button: KeyCode,
}

impl Binding {
    fn from_config(config: &KeyBindingConfig) -> Result<Self> {
        Ok(Binding {
            cw: parse_key(&config.cw)?,
            ccw: parse_key(&config.ccw)?,
            button: parse_key(&config.button)?,
        })
    }

    fn event_for(&self, code: KeyCode) -> Option<EncoderEvent> {
        match code {
            c if c == self.cw => Some(EncoderEvent::RotateCw),
            c if c == self.ccw => Some(EncoderEvent::RotateCcw),
            c if c == self.button => Some(EncoderEvent::ButtonPress),
            _ => None,
        }
    }
}

/// Stands in for the two hardware encoders: key presses become encoder
/// events on the controller queue.
pub struct KeyboardEncoders {
    selection: Binding,
    volume: Binding,
}

impl KeyboardEncoders {
    pub fn new(keys: &KeysConfig) -> Result<Self> {
        Ok(KeyboardEncoders {
            selection: Binding::from_config(&keys.selection)?,
            volume: Binding::from_config(&keys.volume)?,
        })
    }

    pub fn map_key(&self, key: &KeyEvent) -> Option<KeyAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match (key.modifiers, key.code) {
            (C, KeyCode::Char('c')) | (X, KeyCode::Char('q')) => Some(KeyAction::Quit),
            (_, code) => {
                if let Some(action) = self.selection.event_for(code) {
                    return Some(KeyAction::Encoder(InputEvent::new(
                        EncoderId::Selection,
                        action,
                    )));
                }
                self.volume
                    .event_for(code)
                    .map(|action| KeyAction::Encoder(InputEvent::new(EncoderId::Volume, action)))
            }
        }
    }

    /// Read keys until `shutdown` fires or disconnects. Each encoder event is
    /// pushed to `commands`; a quit request goes to `quit`.
    pub fn spawn(
        self,
        commands: Sender<ControlMessage>,
        quit: Sender<()>,
        shutdown: Receiver<()>,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("keyboard".into())
            .spawn(move || self.run(commands, quit, shutdown))
    }

    fn run(&self, commands: Sender<ControlMessage>, quit: Sender<()>, shutdown: Receiver<()>) {
        loop {
            if matches!(shutdown.try_recv(), Ok(()) | Err(TryRecvError::Disconnected)) {
                break;
            }

            match next_key(POLL_INTERVAL) {
                Ok(Some(key)) => match self.map_key(&key) {
                    Some(KeyAction::Encoder(event)) => {
                        if commands.send(ControlMessage::Input(event)).is_err() {
                            break;
                        }
                    }
                    Some(KeyAction::Quit) => {
                        info!("Quit requested from keyboard");
                        let _ = quit.try_send(());
                    }
                    None => debug!(code = ?key.code, "Unbound key"),
                },
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "Keyboard input failed");
                    let _ = quit.try_send(());
                    break;
                }
            }
        }
        info!("Keyboard reader exiting");
    }
}

fn next_key(timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            return Ok(Some(key));
        }
    }
    Ok(None)
}

pub fn parse_key(s: &str) -> Result<KeyCode> {
    let code = match s {
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Enter" => KeyCode::Enter,
        "Space" => KeyCode::Char(' '),
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some('q'), None) => bail!("'q' is reserved for quitting"),
                (Some(c), None) => KeyCode::Char(c),
                _ => bail!("Unknown key name: {other:?}"),
            }
        }
    };
    Ok(code)
}
