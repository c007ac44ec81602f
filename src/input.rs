use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};

#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Left click at terminal column `x`, row `y`.
    Click { x: u16, y: u16 },
}

/// Next key press or left click within `timeout`. Other events are skipped.
pub fn next_input(timeout: Duration) -> Result<Option<InputEvent>> {
    loop {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                return Ok(Some(InputEvent::Key(key)))
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                return Ok(Some(InputEvent::Click {
                    x: mouse.column,
                    y: mouse.row,
                }))
            }
            _ => continue,
        }
    }
}
