use crate::render::{draw_popup, write_hud, Frame, Renderer};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use std::io::Write;

/// Largest base64 payload the graphics protocol accepts per escape.
const PAYLOAD_CHUNK: usize = 4096;
const IMAGE_ID: u32 = 1;

/// Sends the working buffer at native resolution through the kitty graphics
/// protocol and lets the terminal scale it onto the visual area.
pub struct KittyRenderer {
    encoded: String,
    popup_shown: bool,
}

impl KittyRenderer {
    pub fn new() -> Self {
        Self {
            encoded: String::new(),
            popup_shown: false,
        }
    }

    fn transmit(&mut self, out: &mut dyn Write, frame: &Frame<'_>) -> anyhow::Result<()> {
        let (w, h) = (frame.pixel_width, frame.pixel_height);
        self.encoded.clear();
        B64.encode_string(&frame.pixels_rgba[..w * h * 4], &mut self.encoded);

        let payload = self.encoded.as_bytes();
        let count = payload.len().div_ceil(PAYLOAD_CHUNK);
        for (i, chunk) in payload.chunks(PAYLOAD_CHUNK).enumerate() {
            let more = u8::from(i + 1 < count);
            if i == 0 {
                write!(
                    out,
                    "\x1b_Ga=T,f=32,s={w},v={h},t=d,i={IMAGE_ID},p=1,c={},r={},C=1,q=2,z=-1,m={more};",
                    frame.term_cols, frame.visual_rows
                )?;
            } else {
                write!(out, "\x1b_Gm={more};")?;
            }
            out.write_all(chunk)?;
            out.write_all(b"\x1b\\")?;
        }
        Ok(())
    }
}

impl Default for KittyRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for KittyRenderer {
    fn name(&self) -> &'static str {
        "kitty"
    }

    fn pixel_grid(&self, _cols: u16, _visual_rows: u16) -> Option<(usize, usize)> {
        None
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let (w, h) = (frame.pixel_width, frame.pixel_height);
        if frame.term_cols == 0
            || frame.visual_rows == 0
            || w == 0
            || h == 0
            || frame.pixels_rgba.len() < w * h * 4
        {
            return Ok(());
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }
        out.write_all(b"\x1b[H\x1b[0m")?;

        // Popup text sits on the text layer above the image; wipe it once it closes.
        let popup_now = frame.overlay.is_some();
        if self.popup_shown && !popup_now {
            for row in 1..=frame.visual_rows {
                write!(out, "\x1b[{row};1H\x1b[2K")?;
            }
            out.write_all(b"\x1b[H")?;
        }
        self.popup_shown = popup_now;

        self.transmit(out, frame)?;

        write_hud(out, frame)?;
        if let Some(popup) = frame.overlay {
            draw_popup(out, frame.term_cols, frame.term_rows, popup)?;
        }
        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        Ok(())
    }
}
