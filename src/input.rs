//! Keyboard and on-screen button mapping
//!
//! Both inputs produce the same thing: a new facing for the postman.

use crate::sim::Direction;

/// Arrow keys and WASD. Takes `KeyboardEvent.key` values.
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// On-screen pad buttons, named `up`, `down`, `left`, `right`
pub fn direction_for_button(name: &str) -> Option<Direction> {
    match name {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}

/// Button name for a direction (inverse of [`direction_for_button`])
pub fn button_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::Left => "left",
        Direction::Right => "right",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_and_wasd_agree() {
        for (arrow, letter) in [
            ("ArrowUp", "w"),
            ("ArrowDown", "s"),
            ("ArrowLeft", "a"),
            ("ArrowRight", "d"),
        ] {
            assert!(direction_for_key(arrow).is_some());
            assert_eq!(direction_for_key(arrow), direction_for_key(letter));
            assert_eq!(
                direction_for_key(letter),
                direction_for_key(&letter.to_uppercase())
            );
        }
    }

    #[test]
    fn test_other_keys_ignored() {
        for key in ["Enter", " ", "Escape", "q", "Shift"] {
            assert_eq!(direction_for_key(key), None);
        }
    }

    #[test]
    fn test_buttons_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(direction_for_button(button_name(dir)), Some(dir));
        }
        assert_eq!(direction_for_button("jump"), None);
    }
}
