// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Current input modality.
//!
//! The host-wide tracker reacts to capture-phase document events:
//!
//! - `touchstart` switches to [`InputModality::Touch`],
//! - `keydown` switches to [`InputModality::Keyboard`],
//! - two `mousemove`s within [`MOUSE_MOVE_WINDOW_MS`] while in touch mode, or any
//!   `mousemove` while in keyboard mode, switch back to [`InputModality::Mouse`],
//! - window blur resets to [`InputModality::Mouse`].
//!
//! Touch devices emit a compatibility `mousemove` after each tap, so a single
//! move is not enough to leave touch mode.

/// Two mouse moves closer than this (in milliseconds) mean a real pointer.
pub const MOUSE_MOVE_WINDOW_MS: u64 = 20;

/// The last kind of input the user gave.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputModality {
    /// Pointer device.
    #[default]
    Mouse,
    /// Touch screen.
    Touch,
    /// Keyboard.
    Keyboard,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct InputTracker {
    modality: InputModality,
    last_mouse_move: Option<u64>,
}

impl InputTracker {
    pub(crate) fn modality(&self) -> InputModality {
        self.modality
    }

    pub(crate) fn is_touch(&self) -> bool {
        self.modality == InputModality::Touch
    }

    pub(crate) fn touch_start(&mut self) {
        self.modality = InputModality::Touch;
        self.last_mouse_move = None;
    }

    pub(crate) fn key_down(&mut self) {
        self.modality = InputModality::Keyboard;
    }

    pub(crate) fn mouse_move(&mut self, now: u64) {
        match self.modality {
            InputModality::Mouse => {}
            InputModality::Keyboard => self.modality = InputModality::Mouse,
            InputModality::Touch => {
                if self
                    .last_mouse_move
                    .is_some_and(|prev| now.saturating_sub(prev) < MOUSE_MOVE_WINDOW_MS)
                {
                    self.modality = InputModality::Mouse;
                }
            }
        }
        self.last_mouse_move = Some(now);
    }

    pub(crate) fn window_blur(&mut self) {
        self.modality = InputModality::Mouse;
        self.last_mouse_move = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_move_after_touch_keeps_touch() {
        let mut t = InputTracker::default();
        t.touch_start();
        t.mouse_move(100);
        assert!(t.is_touch());
        t.mouse_move(150);
        assert!(t.is_touch());
        t.mouse_move(160);
        assert_eq!(t.modality(), InputModality::Mouse);
    }

    #[test]
    fn keyboard_then_any_move_is_mouse() {
        let mut t = InputTracker::default();
        t.key_down();
        assert_eq!(t.modality(), InputModality::Keyboard);
        t.mouse_move(0);
        assert_eq!(t.modality(), InputModality::Mouse);
    }

    #[test]
    fn window_blur_resets() {
        let mut t = InputTracker::default();
        t.touch_start();
        t.window_blur();
        assert_eq!(t.modality(), InputModality::Mouse);
    }
}
