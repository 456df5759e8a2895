use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

/// Pointer buttons a tool can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// Primary button
    Left,
    /// Wheel button
    Middle,
    /// Secondary button
    Right,
}

impl PointerButton {
    /// Every button, in bit order.
    pub const ALL: [PointerButton; 3] = [PointerButton::Left, PointerButton::Middle, PointerButton::Right];

    fn bit(self) -> u8 {
        1 << self as u8
    }

    fn to_macroquad(self) -> MouseButton {
        match self {
            PointerButton::Left => MouseButton::Left,
            PointerButton::Middle => MouseButton::Middle,
            PointerButton::Right => MouseButton::Right,
        }
    }
}

/// Small set of pointer buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonSet(u8);

impl ButtonSet {
    /// No buttons.
    pub const EMPTY: ButtonSet = ButtonSet(0);

    /// Adds `b`.
    pub fn insert(&mut self, b: PointerButton) {
        self.0 |= b.bit();
    }

    /// Whether `b` is in the set.
    pub fn contains(self, b: PointerButton) -> bool {
        self.0 & b.bit() != 0
    }

    /// Whether no button is in the set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Buttons present in both sets.
    pub fn intersection(self, other: ButtonSet) -> ButtonSet {
        ButtonSet(self.0 & other.0)
    }

    /// Buttons in the set, in bit order.
    pub fn iter(self) -> impl Iterator<Item = PointerButton> {
        PointerButton::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl FromIterator<PointerButton> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = PointerButton>>(iter: I) -> Self {
        let mut set = ButtonSet::EMPTY;
        for b in iter {
            set.insert(b);
        }
        set
    }
}

/// Pointer state for one frame, in window coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position this frame
    pub pointer: Vec2,
    /// Pointer position last frame
    pub previous_pointer: Vec2,
    /// Buttons held
    pub down: ButtonSet,
    /// Buttons that went down this frame
    pub pressed: ButtonSet,
    /// Buttons that went up this frame
    pub released: ButtonSet,
    /// Wheel notches, positive away from the user
    pub wheel: f32,
}

impl FrameInput {
    /// Pointer movement since the previous frame.
    pub fn delta(&self) -> Vec2 {
        self.pointer - self.previous_pointer
    }

    /// Reads the current macroquad input state.
    pub fn poll(previous_pointer: Vec2) -> Self {
        let mut input = FrameInput {
            pointer: mouse_position().into(),
            previous_pointer,
            ..Default::default()
        };
        for b in PointerButton::ALL {
            let mb = b.to_macroquad();
            if is_mouse_button_down(mb) {
                input.down.insert(b);
            }
            if is_mouse_button_pressed(mb) {
                input.pressed.insert(b);
            }
            if is_mouse_button_released(mb) {
                input.released.insert(b);
            }
        }
        let (_, wheel_y) = mouse_wheel();
        input.wheel = if wheel_y > 0.0 {
            1.0
        } else if wheel_y < 0.0 {
            -1.0
        } else {
            0.0
        };
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_set_operations() {
        let set: ButtonSet = [PointerButton::Left, PointerButton::Right].into_iter().collect();
        assert!(set.contains(PointerButton::Left));
        assert!(!set.contains(PointerButton::Middle));
        let only_right: ButtonSet = [PointerButton::Right].into_iter().collect();
        assert_eq!(set.intersection(only_right), only_right);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![PointerButton::Left, PointerButton::Right]);
        assert!(ButtonSet::EMPTY.is_empty());
    }
}
