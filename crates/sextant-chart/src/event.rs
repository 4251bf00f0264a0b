//! Host events delivered to a [`Canvas`](crate::canvas::Canvas).
//!
//! All positions are device pixels, origin top-left, y growing downward.

use sextant_core::math::Vec2;

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Character(char),
    Other,
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub repeat: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self { key, repeat: false }
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// Input delivered by the host container.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// `click_count` is the host's own multi-click counter (1 for a single
    /// press, 2 for a native double click).
    PointerDown {
        position: Vec2,
        button: PointerButton,
        click_count: u32,
    },
    PointerMoved {
        position: Vec2,
    },
    PointerUp {
        position: Vec2,
        button: PointerButton,
        click_count: u32,
    },
    Resized {
        width: f32,
        height: f32,
    },
    Key(KeyInput),
}

impl CanvasEvent {
    /// Primary-button press with a single click.
    ///
    /// Positions convert from anything `Vec2` does, including the `mint`
    /// points host toolkits hand out.
    pub fn press(position: impl Into<Vec2>) -> Self {
        Self::PointerDown {
            position: position.into(),
            button: PointerButton::Primary,
            click_count: 1,
        }
    }

    /// Primary-button release with a single click.
    pub fn release(position: impl Into<Vec2>) -> Self {
        Self::PointerUp {
            position: position.into(),
            button: PointerButton::Primary,
            click_count: 1,
        }
    }

    pub fn moved(position: impl Into<Vec2>) -> Self {
        Self::PointerMoved {
            position: position.into(),
        }
    }

    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            Self::PointerDown { position, .. }
            | Self::PointerMoved { position }
            | Self::PointerUp { position, .. } => Some(*position),
            Self::Resized { .. } | Self::Key(_) => None,
        }
    }
}

bitflags::bitflags! {
    /// Outcome of handling an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HandleStatus: u8 {
        const HANDLED = 0b00000001;
        const CONSUMED = 0b00000010;
    }
}

impl HandleStatus {
    pub const fn is_consumed(&self) -> bool {
        self.contains(Self::CONSUMED)
    }

    pub const fn is_handled(&self) -> bool {
        self.contains(Self::HANDLED)
    }

    pub const fn consumed() -> Self {
        Self::from_bits_truncate(Self::HANDLED.bits() | Self::CONSUMED.bits())
    }

    pub const fn handled() -> Self {
        Self::from_bits_truncate(Self::HANDLED.bits())
    }

    pub const fn ignored() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_status_constructors() {
        assert!(HandleStatus::consumed().is_handled());
        assert!(HandleStatus::consumed().is_consumed());
        assert!(!HandleStatus::handled().is_consumed());
        assert!(!HandleStatus::ignored().is_handled());
    }

    #[test]
    fn test_event_position() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(CanvasEvent::press(p).position(), Some(p));
        assert_eq!(
            CanvasEvent::Resized {
                width: 1.0,
                height: 1.0
            }
            .position(),
            None
        );
    }

    #[test]
    fn test_mint_positions() {
        let host = mint::Point2 { x: 7.0f32, y: 9.0 };
        assert_eq!(CanvasEvent::moved(host).position(), Some(Vec2::new(7.0, 9.0)));
    }
}
