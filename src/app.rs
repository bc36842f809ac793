use crate::config::{Config, RendererMode};
use crate::prefs::{prefs_storage_path, AppPrefs};
use crate::render::{fit_nearest, Frame, HalfBlockRenderer, KittyRenderer, Popup, Renderer};
use crate::session::{CaptureState, Session, SessionConfig};
use crate::sprites::OverlayConfig;
use crate::still;
use crate::terminal::TerminalGuard;
use crate::tracker::TrackerConfig;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::{info, warn};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const THRESHOLD_STEP: f32 = 5.0;
const STATUS_TTL: Duration = Duration::from_secs(3);
const DENIED_ACCENT: (u8, u8, u8) = (255, 96, 120);
const HELP_ACCENT: (u8, u8, u8) = (214, 176, 255);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    None,
    Quit,
    ToggleCapture,
    SaveStill,
    ThresholdUp,
    ThresholdDown,
    NextPalette,
    StartStop,
    ToggleHud,
    ToggleHelp,
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    if cfg.fps == 0 {
        anyhow::bail!("--fps must be >= 1");
    }

    let prefs_path = if cfg.no_prefs {
        None
    } else {
        prefs_storage_path()
    };
    let prefs = AppPrefs::load(prefs_path.as_deref()).unwrap_or_else(|err| {
        warn!("ignoring unreadable prefs: {err}");
        AppPrefs::default()
    });

    let mut session = Session::new(SessionConfig {
        palette: cfg.palette.unwrap_or(prefs.palette),
        threshold: cfg.threshold.unwrap_or(prefs.threshold),
        tracker: TrackerConfig {
            mirror_x: cfg.mirror_tracking,
            ..TrackerConfig::default()
        },
        overlay: OverlayConfig::default(),
        seed: cfg.seed,
    });

    let spec = cfg.source_spec();
    if let Err(err) = session.start(&spec) {
        info!("continuing without video, showing denial: {err}");
    }

    let _term = TerminalGuard::enter(cfg.renderer == RendererMode::Kitty)?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Kitty => Box::new(KittyRenderer::new()),
    };

    let mut show_hud = true;
    let mut show_help = false;
    let mut status: Option<(String, Instant)> = None;
    let mut fps = FpsCounter::new();
    let mut scaled: Vec<u8> = Vec::new();
    let target = Duration::from_secs_f32(1.0 / cfg.fps as f32);

    loop {
        let now = Instant::now();

        let mut quit = false;
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(k) = event::read()? else {
                continue;
            };
            if k.kind == KeyEventKind::Release {
                continue;
            }
            match map_key(k.code, k.modifiers) {
                Action::None => {}
                Action::Quit => quit = true,
                Action::ToggleCapture => {
                    session.toggle_capture();
                }
                Action::SaveStill => {
                    let msg = save_still(&session, &cfg.still_dir, cfg.still_scale);
                    status = Some((msg, now));
                }
                Action::ThresholdUp => session.set_threshold(session.threshold() + THRESHOLD_STEP),
                Action::ThresholdDown => {
                    session.set_threshold(session.threshold() - THRESHOLD_STEP)
                }
                Action::NextPalette => session.set_palette(session.palette_name().next()),
                Action::StartStop => match session.state() {
                    CaptureState::Live | CaptureState::Frozen => session.stop(),
                    CaptureState::Idle => {
                        if let Err(err) = session.start(&spec) {
                            status = Some((err.to_string(), now));
                        }
                    }
                    CaptureState::Denied => {}
                },
                Action::ToggleHud => show_hud = !show_hud,
                Action::ToggleHelp => show_help = !show_help,
            }
        }
        if quit {
            break;
        }

        session.tick();

        let (cols, rows) = TerminalGuard::size()?;
        if cols < 4 || rows < 2 {
            std::thread::sleep(target);
            continue;
        }

        if status
            .as_ref()
            .is_some_and(|(_, at)| now.duration_since(*at) > STATUS_TTL)
        {
            status = None;
        }
        let hud = if show_hud {
            build_hud(
                &session,
                renderer.name(),
                fps.fps(),
                status.as_ref().map(|(s, _)| s.as_str()),
            )
        } else {
            String::new()
        };
        let hud_rows = u16::from(show_hud && rows > 2);
        let visual_rows = rows.saturating_sub(hud_rows).max(1);

        let denied_text;
        let overlay = if session.state() == CaptureState::Denied {
            denied_text = denied_popup_text(session.denial().unwrap_or("unknown reason"));
            Some(Popup {
                text: denied_text.as_str(),
                accent: DENIED_ACCENT,
            })
        } else if show_help {
            Some(Popup {
                text: help_popup_text(),
                accent: HELP_ACCENT,
            })
        } else {
            None
        };

        let buf = session.buffer();
        let (pw, ph, pixels) = match renderer.pixel_grid(cols, visual_rows) {
            Some((gw, gh)) => {
                fit_nearest(
                    buf.pixels(),
                    buf.width(),
                    buf.height(),
                    &mut scaled,
                    gw,
                    gh,
                    [0, 0, 0],
                );
                (gw, gh, scaled.as_slice())
            }
            None => (buf.width(), buf.height(), buf.pixels()),
        };

        let frame = Frame {
            term_cols: cols,
            term_rows: rows,
            visual_rows,
            pixel_width: pw,
            pixel_height: ph,
            pixels_rgba: pixels,
            hud: &hud,
            hud_rows,
            overlay,
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;
        fps.tick();

        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }

    session.stop();
    let picked = AppPrefs {
        palette: session.palette_name(),
        threshold: session.threshold(),
    };
    if let Err(err) = picked.save(prefs_path.as_deref()) {
        warn!("failed to save prefs: {err}");
    }
    Ok(())
}

fn map_key(code: KeyCode, mods: KeyModifiers) -> Action {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return Action::Quit;
    }
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        KeyCode::Char(' ') | KeyCode::Enter => Action::ToggleCapture,
        KeyCode::Char('s') | KeyCode::Char('S') => Action::SaveStill,
        KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => Action::ThresholdUp,
        KeyCode::Down | KeyCode::Char('-') | KeyCode::Char('_') => Action::ThresholdDown,
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Tab => Action::NextPalette,
        KeyCode::Char('o') | KeyCode::Char('O') => Action::StartStop,
        KeyCode::Char('i') | KeyCode::Char('I') => Action::ToggleHud,
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::F(1) => {
            Action::ToggleHelp
        }
        _ => Action::None,
    }
}

fn save_still(session: &Session, dir: &std::path::Path, scale: u32) -> String {
    if !matches!(session.state(), CaptureState::Live | CaptureState::Frozen) {
        return "nothing to save (capture is not running)".to_string();
    }
    let path: PathBuf = still::timestamped_path(dir);
    match still::save_png(session.buffer(), &path, scale) {
        Ok(()) => {
            info!("saved still {}", path.display());
            format!("saved {}", path.display())
        }
        Err(err) => {
            warn!("still export failed: {err:#}");
            format!("save failed: {err}")
        }
    }
}

fn build_hud(session: &Session, renderer: &str, fps: f32, status: Option<&str>) -> String {
    let (hx, hy) = session.head();
    let overlay = session.overlay();
    let mut hud = format!(
        "{} | {} | palette {} | thr {:.0} | head {:.0},{:.0} | eyes {} mouths {} | {:.0} fps | {}",
        session.state().label(),
        session.source_name().unwrap_or("-"),
        session.palette_name().label(),
        session.threshold(),
        hx,
        hy,
        overlay.eyes().len(),
        overlay.mouths().len(),
        fps,
        renderer,
    );
    if let Some(msg) = status {
        hud = format!("{msg} | {hud}");
    }
    hud
}

fn denied_popup_text(reason: &str) -> String {
    format!(
        "Camera access denied\n\
{reason}\n\
\n\
The effect needs a video device. Fix access and relaunch.\n\
q quit"
    )
}

fn help_popup_text() -> &'static str {
    "lilacam controls\n\
space/enter  capture still / retake\n\
s            save current image as PNG\n\
up/down +/-  threshold\n\
p or tab     next palette (lila, mono)\n\
o            stop / start capture\n\
i            toggle HUD\n\
? or h or F1 toggle this help\n\
q or esc     quit"
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = self.frames as f32 / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}
