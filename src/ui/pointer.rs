// Pointer shape escape (OSC 22), understood by kitty and foot

use std::fmt;

use crate::bar::PointerShape;

/// crossterm command setting the mouse pointer shape over the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPointerShape(pub PointerShape);

impl crossterm::Command for SetPointerShape {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b]22;{}\x1b\\", self.0.css_name())
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Ok(())
    }
}
