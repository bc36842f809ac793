use anyhow::Context;
use crossterm::{cursor, execute, terminal};
use std::io::{stdout, Stdout, Write};

const KITTY_DELETE_ALL: &[u8] = b"\x1b_Ga=d,d=A,q=2\x1b\\";
const RESET_MODES: &[u8] = b"\x1b[?2026l\x1b[?7h\x1b[0m";

/// Owns the terminal while the viewer runs: raw input, alternate screen, hidden
/// cursor. Everything is undone on drop, including panics unwinding through `run`.
pub struct TerminalGuard {
    kitty_images: bool,
}

impl TerminalGuard {
    /// `kitty_images` marks that graphics-protocol images will be placed and must be
    /// deleted on exit; they are not part of the text screen.
    pub fn enter(kitty_images: bool) -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        let guard = Self { kitty_images };
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )
        .context("prepare alternate screen")?;
        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }

    /// (cols, rows) of the visible screen.
    pub fn size() -> anyhow::Result<(u16, u16)> {
        terminal::size().context("query terminal size")
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.kitty_images {
            let _ = out.write_all(KITTY_DELETE_ALL);
        }
        let _ = out.write_all(RESET_MODES);
        let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
