//! Translation from raw window events to simulation input.
//!
//! Mouse and touch both reduce to a single [`PointerEvent::Move`], so the
//! simulation never needs to know which device the pointer came from.
//! A handful of keys map to viewer [`Command`]s.

use winit::event::{TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::pointer::PointerEvent;

/// Viewer actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Stop or resume ticking (Space).
    TogglePause,
    /// Rebuild the field from the current image (R).
    Reload,
    /// Close the viewer (Escape).
    Quit,
}

/// Pointer movement carried by `event`, if any.
///
/// Cursor moves and touch start/move both count; touch end and cancel do
/// not move the pointer.
pub fn pointer_event(event: &WindowEvent) -> Option<PointerEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => Some(PointerEvent::Move {
            x: position.x,
            y: position.y,
        }),
        WindowEvent::Touch(touch) => match touch.phase {
            TouchPhase::Started | TouchPhase::Moved => Some(PointerEvent::Move {
                x: touch.location.x,
                y: touch.location.y,
            }),
            TouchPhase::Ended | TouchPhase::Cancelled => None,
        },
        _ => None,
    }
}

/// Command bound to a physical key.
pub fn key_command(key: PhysicalKey) -> Option<Command> {
    match key {
        PhysicalKey::Code(KeyCode::Space) => Some(Command::TogglePause),
        PhysicalKey::Code(KeyCode::KeyR) => Some(Command::Reload),
        PhysicalKey::Code(KeyCode::Escape) => Some(Command::Quit),
        _ => None,
    }
}
