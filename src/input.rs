use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Turn(Direction),
    Start,
    Pause,
    Quit,
}

/// Maps the named directional identifiers (`ArrowUp`, `KeyW`, `up`, ...)
/// to a direction. Anything unknown maps to nothing.
pub fn direction_for(identifier: &str) -> Option<Direction> {
    match identifier {
        "ArrowUp" | "KeyW" | "up" => Some(Up),
        "ArrowDown" | "KeyS" | "down" => Some(Down),
        "ArrowLeft" | "KeyA" | "left" => Some(Left),
        "ArrowRight" | "KeyD" | "right" => Some(Right),
        _ => None,
    }
}

impl Control {
    pub fn from_key_event(ev: &KeyEvent) -> Option<Control> {
        match ev {
            ev if is_ctrl_c(ev) => Some(Control::Quit),
            KeyEvent { code, modifiers: _ } => match code {
                KeyCode::Up => Some(Control::Turn(Up)),
                KeyCode::Down => Some(Control::Turn(Down)),
                KeyCode::Left => Some(Control::Turn(Left)),
                KeyCode::Right => Some(Control::Turn(Right)),
                KeyCode::Char(ch) => Control::from_char(*ch),
                KeyCode::Enter => Some(Control::Start),
                KeyCode::Esc => Some(Control::Pause),
                _ => None,
            },
        }
    }

    fn from_char(ch: char) -> Option<Control> {
        let key = match ch.to_ascii_lowercase() {
            'w' => "KeyW",
            'a' => "KeyA",
            's' => "KeyS",
            'd' => "KeyD",
            ' ' => return Some(Control::Start),
            'q' => return Some(Control::Quit),
            _ => return None,
        };
        direction_for(key).map(Control::Turn)
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn identifiers_map_to_directions() {
        assert_eq!(direction_for("ArrowUp"), Some(Up));
        assert_eq!(direction_for("KeyW"), Some(Up));
        assert_eq!(direction_for("up"), Some(Up));
        assert_eq!(direction_for("ArrowDown"), Some(Down));
        assert_eq!(direction_for("KeyS"), Some(Down));
        assert_eq!(direction_for("down"), Some(Down));
        assert_eq!(direction_for("ArrowLeft"), Some(Left));
        assert_eq!(direction_for("KeyA"), Some(Left));
        assert_eq!(direction_for("left"), Some(Left));
        assert_eq!(direction_for("ArrowRight"), Some(Right));
        assert_eq!(direction_for("KeyD"), Some(Right));
        assert_eq!(direction_for("right"), Some(Right));
    }

    #[test]
    fn unknown_identifiers_are_ignored() {
        assert_eq!(direction_for(""), None);
        assert_eq!(direction_for("Up"), None);
        assert_eq!(direction_for("KeyQ"), None);
        assert_eq!(direction_for("arrowup"), None);
    }

    #[test]
    fn arrow_and_wasd_keys() {
        assert_eq!(Control::from_key_event(&key(KeyCode::Up)), Some(Control::Turn(Up)));
        assert_eq!(Control::from_key_event(&key(KeyCode::Char('a'))), Some(Control::Turn(Left)));
        assert_eq!(Control::from_key_event(&key(KeyCode::Char('S'))), Some(Control::Turn(Down)));
        assert_eq!(Control::from_key_event(&key(KeyCode::Char('d'))), Some(Control::Turn(Right)));
        assert_eq!(Control::from_key_event(&key(KeyCode::Char('x'))), None);
        assert_eq!(Control::from_key_event(&key(KeyCode::Tab)), None);
    }

    #[test]
    fn commands() {
        assert_eq!(Control::from_key_event(&key(KeyCode::Enter)), Some(Control::Start));
        assert_eq!(Control::from_key_event(&key(KeyCode::Char(' '))), Some(Control::Start));
        assert_eq!(Control::from_key_event(&key(KeyCode::Esc)), Some(Control::Pause));
        assert_eq!(Control::from_key_event(&key(KeyCode::Char('q'))), Some(Control::Quit));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Control::from_key_event(&ctrl_c), Some(Control::Quit));
    }
}
