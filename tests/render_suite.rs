use lilacam::render::{
    draw_popup, fit_nearest, Frame, HalfBlockRenderer, KittyRenderer, Popup, Renderer,
};

/// Build a solid-color RGBA pixel buffer.
fn solid_pixels(w: usize, h: usize, r: u8, g: u8, b: u8) -> Vec<u8> {
    let mut buf = vec![0u8; w * h * 4];
    for px in buf.chunks_exact_mut(4) {
        px.copy_from_slice(&[r, g, b, 255]);
    }
    buf
}

/// Two-tone checkerboard, like a dithered buffer.
fn checker_pixels(w: usize, h: usize) -> Vec<u8> {
    let mut buf = vec![0u8; w * h * 4];
    for y in 0..h {
        for x in 0..w {
            let i = (y * w + x) * 4;
            let rgb = if (x + y) % 2 == 0 {
                [206, 164, 255]
            } else {
                [38, 14, 58]
            };
            buf[i..i + 4].copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }
    buf
}

fn make_frame<'a>(
    cols: u16,
    visual_rows: u16,
    pw: usize,
    ph: usize,
    pixels: &'a [u8],
    sync: bool,
) -> Frame<'a> {
    Frame {
        term_cols: cols,
        term_rows: visual_rows + 1,
        visual_rows,
        pixel_width: pw,
        pixel_height: ph,
        pixels_rgba: pixels,
        hud: "LIVE | synthetic | palette lila | thr 140",
        hud_rows: 1,
        overlay: None,
        sync_updates: sync,
    }
}

// ── HalfBlock renderer ─────────────────────────────────────────────────────

#[test]
fn halfblock_renders_checker_frame() {
    let cols = 48u16;
    let rows = 4u16;
    let pw = cols as usize;
    let ph = rows as usize * 2;
    let pixels = checker_pixels(pw, ph);
    let frame = make_frame(cols, rows, pw, ph, &pixels, true);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains("\x1b[?2026h"), "missing sync-begin");
    assert!(s.contains("\x1b[?2026l"), "missing sync-end");
    assert!(s.contains("\u{2580}"), "missing half-block char");
    assert!(s.contains("38;2;206;164;255"), "missing light FG");
    assert!(s.contains("48;2;38;14;58"), "missing dark BG");
    assert!(s.contains("palette lila"), "HUD text missing");
    assert_eq!(s.matches('\u{2580}').count(), pw * rows as usize);
}

#[test]
fn halfblock_clips_hud_to_terminal_width() {
    let pixels = checker_pixels(8, 8);
    let frame = make_frame(8, 4, 8, 8, &pixels, false);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains("LIVE | s"));
    assert!(!s.contains("palette"), "HUD not clipped");
}

#[test]
fn halfblock_skips_mismatched_grid() {
    let pixels = solid_pixels(10, 10, 255, 0, 0);
    let frame = make_frame(8, 4, 10, 10, &pixels, false);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn halfblock_requests_two_pixels_per_cell() {
    assert_eq!(HalfBlockRenderer::new().pixel_grid(80, 23), Some((80, 46)));
    assert_eq!(HalfBlockRenderer::new().name(), "halfblock");
}

#[test]
fn halfblock_draws_popup_over_image() {
    let pixels = solid_pixels(40, 24, 0, 0, 0);
    let mut frame = make_frame(40, 12, 40, 24, &pixels, false);
    frame.overlay = Some(Popup {
        text: "Camera access denied\nno device",
        accent: (255, 96, 120),
    });
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains("Camera access denied"));
    assert!(s.contains("38;2;255;96;120"), "title accent missing");
}

// ── Kitty renderer ─────────────────────────────────────────────────────────

#[test]
fn kitty_streams_native_buffer_in_chunks() {
    let (w, h) = (160usize, 120usize);
    let pixels = checker_pixels(w, h);
    let frame = make_frame(40, 20, w, h, &pixels, false);
    let mut out = Vec::new();
    let mut renderer = KittyRenderer::new();
    assert_eq!(renderer.pixel_grid(40, 20), None);
    renderer.render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains("\x1b_Ga=T,f=32,s=160,v=120,"), "missing transmit header");
    assert!(s.contains("c=40,r=20"), "missing placement size");
    // 76800 raw bytes encode to 102400 base64 bytes, sent 4096 at a time.
    let chunks = 25;
    assert_eq!(s.matches("\x1b\\").count(), chunks);
    assert_eq!(s.matches("m=1;").count(), chunks - 1);
    assert!(s.contains("\x1b_Gm=0;"), "missing final chunk");
}

#[test]
fn kitty_skips_short_buffers() {
    let pixels = vec![0u8; 16];
    let frame = make_frame(40, 20, 160, 120, &pixels, false);
    let mut out = Vec::new();
    KittyRenderer::new().render(&frame, &mut out).unwrap();
    assert!(out.is_empty());
}

// ── Helpers ────────────────────────────────────────────────────────────────

#[test]
fn fit_nearest_letterboxes_wide_targets() {
    let src = solid_pixels(4, 3, 200, 100, 50);
    let mut dst = Vec::new();
    fit_nearest(&src, 4, 3, &mut dst, 8, 3, [1, 2, 3]);
    assert_eq!(dst.len(), 8 * 3 * 4);
    for y in 0..3 {
        for x in 0..8 {
            let i = (y * 8 + x) * 4;
            let expect = if (2..6).contains(&x) {
                [200, 100, 50, 255]
            } else {
                [1, 2, 3, 255]
            };
            assert_eq!(&dst[i..i + 4], &expect, "pixel {x},{y}");
        }
    }
}

#[test]
fn fit_nearest_upscales_by_repetition() {
    let src = checker_pixels(2, 2);
    let mut dst = Vec::new();
    fit_nearest(&src, 2, 2, &mut dst, 4, 4, [0, 0, 0]);
    assert_eq!(&dst[0..4], &dst[4..8], "columns 0 and 1 come from one source pixel");
    assert_ne!(&dst[4..8], &dst[8..12]);
}

#[test]
fn popup_ignores_tiny_terminals() {
    let mut out = Vec::new();
    draw_popup(
        &mut out,
        6,
        3,
        Popup {
            text: "help",
            accent: (1, 2, 3),
        },
    )
    .unwrap();
    assert!(out.is_empty());
}
