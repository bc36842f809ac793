mod halfblock;
mod kitty;

pub use halfblock::HalfBlockRenderer;
pub use kitty::KittyRenderer;

use std::io::Write;

pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub overlay: Option<Popup<'a>>,
    pub sync_updates: bool,
}

/// Centered text box drawn over the image. The first line is the title.
#[derive(Clone, Copy, Debug)]
pub struct Popup<'a> {
    pub text: &'a str,
    pub accent: (u8, u8, u8),
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    /// Pixel grid the renderer wants for a `cols` x `visual_rows` area, or `None`
    /// when it scales the working buffer itself.
    fn pixel_grid(&self, cols: u16, visual_rows: u16) -> Option<(usize, usize)>;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Aspect-preserving nearest-neighbour fit of `src` into a `dw` x `dh` grid, letterboxed with `bg`.
pub fn fit_nearest(
    src: &[u8],
    sw: usize,
    sh: usize,
    dst: &mut Vec<u8>,
    dw: usize,
    dh: usize,
    bg: [u8; 3],
) {
    dst.clear();
    dst.resize(dw.saturating_mul(dh).saturating_mul(4), 0);
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&[bg[0], bg[1], bg[2], 255]);
    }
    if sw == 0 || sh == 0 || dw == 0 || dh == 0 || src.len() < sw * sh * 4 {
        return;
    }

    let scale = (dw as f32 / sw as f32).min(dh as f32 / sh as f32);
    let fw = ((sw as f32 * scale).round() as usize).clamp(1, dw);
    let fh = ((sh as f32 * scale).round() as usize).clamp(1, dh);
    let ox = (dw - fw) / 2;
    let oy = (dh - fh) / 2;

    for y in 0..fh {
        let sy = (y * sh / fh).min(sh - 1);
        for x in 0..fw {
            let sx = (x * sw / fw).min(sw - 1);
            let si = (sy * sw + sx) * 4;
            let di = ((oy + y) * dw + ox + x) * 4;
            dst[di..di + 4].copy_from_slice(&src[si..si + 4]);
        }
    }
}

pub fn write_hud(out: &mut dyn Write, frame: &Frame<'_>) -> anyhow::Result<()> {
    let cols = frame.term_cols as usize;
    let mut lines = frame.hud.lines();
    for i in 0..(frame.hud_rows as usize) {
        write!(
            out,
            "\x1b[{};1H\x1b[0m\x1b[2K",
            frame.visual_rows as usize + i + 1
        )?;
        if let Some(line) = lines.next() {
            let clipped: String = line.chars().take(cols).collect();
            write!(out, "{clipped}")?;
        }
    }
    Ok(())
}

pub fn draw_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    popup: Popup<'_>,
) -> anyhow::Result<()> {
    if popup.text.trim().is_empty() {
        return Ok(());
    }
    let cols = term_cols as usize;
    let rows = term_rows as usize;
    if cols < 8 || rows < 4 {
        return Ok(());
    }

    let max_inner_w = cols.saturating_sub(6).max(1);
    let mut lines: Vec<String> = Vec::new();
    for raw in popup.text.lines() {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        for piece in chars.chunks(max_inner_w) {
            lines.push(piece.iter().collect());
        }
    }

    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(1, max_inner_w);
    let box_w = inner_w + 4;
    let body_h = lines.len().min(rows.saturating_sub(3).max(1));
    let box_h = body_h + 2;
    let col0 = (cols.saturating_sub(box_w)) / 2 + 1;
    let row0 = (rows.saturating_sub(box_h)) / 2 + 1;
    let edge = format!("+{}+", "-".repeat(box_w - 2));
    let (ar, ag, ab) = popup.accent;

    out.write_all(b"\x1b[0m\x1b[38;2;236;230;246m\x1b[48;2;16;8;26m")?;
    write!(out, "\x1b[{};{}H{}", row0, col0, edge)?;
    for (i, line) in lines.iter().take(body_h).enumerate() {
        let row = row0 + 1 + i;
        write!(out, "\x1b[{};{}H| {:<inner_w$} |", row, col0, "")?;
        if i == 0 {
            write!(
                out,
                "\x1b[{};{}H\x1b[1m\x1b[38;2;{ar};{ag};{ab}m{}\x1b[22m\x1b[38;2;236;230;246m",
                row,
                col0 + 2,
                line
            )?;
        } else {
            write!(out, "\x1b[{};{}H{}", row, col0 + 2, line)?;
        }
    }
    write!(out, "\x1b[{};{}H{}", row0 + box_h - 1, col0, edge)?;
    out.write_all(b"\x1b[0m")?;
    Ok(())
}
