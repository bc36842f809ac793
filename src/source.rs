use crate::config::SourceKind;
use log::{debug, info, warn};
use std::f32::consts::PI;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;
use thiserror::Error;

/// The only hard failure of the pipeline: the video device could not be acquired.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera access denied: {0}")]
    AccessDenied(String),
    #[error("video source unavailable: {0}")]
    Unavailable(String),
}

/// One frame at the source's native resolution, tightly packed RGBA.
#[derive(Clone, Copy, Debug)]
pub struct SourceFrame<'a> {
    pub width: usize,
    pub height: usize,
    pub rgba: &'a [u8],
}

impl SourceFrame<'_> {
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.rgba.len() >= self.width.saturating_mul(self.height).saturating_mul(4)
    }
}

pub trait FrameSource {
    fn name(&self) -> &'static str;
    fn native_size(&self) -> (usize, usize);
    /// Latest frame, or `None` when nothing has arrived yet.
    fn current_frame(&mut self) -> Option<SourceFrame<'_>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSpec {
    pub kind: SourceKind,
    pub device: Option<String>,
    pub image: Option<PathBuf>,
    pub width: usize,
    pub height: usize,
}

/// Acquires the configured device. Blocks until the first frame for camera sources.
pub fn acquire(spec: &SourceSpec) -> Result<Box<dyn FrameSource>, CaptureError> {
    if spec.width == 0 || spec.height == 0 {
        return Err(CaptureError::Unavailable(format!(
            "invalid capture size {}x{}",
            spec.width, spec.height
        )));
    }
    let source: Box<dyn FrameSource> = match spec.kind {
        SourceKind::Synthetic => Box::new(SyntheticSource::orbit(spec.width, spec.height)),
        SourceKind::Image => {
            let path = spec.image.clone().ok_or_else(|| {
                CaptureError::Unavailable("--image <PATH> is required for --source image".into())
            })?;
            Box::new(ImageSource::open(path)?)
        }
        SourceKind::Camera => Box::new(CameraSource::open(
            spec.device.as_deref(),
            spec.width,
            spec.height,
        )?),
    };
    info!(
        "acquired {} source ({}x{})",
        source.name(),
        source.native_size().0,
        source.native_size().1
    );
    Ok(source)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pattern {
    Solid([u8; 3]),
    /// A bright disc drifting over a dark backdrop.
    Orbit,
}

/// Procedural frames; needs no hardware.
pub struct SyntheticSource {
    width: usize,
    height: usize,
    pattern: Pattern,
    started: Instant,
    pixels: Vec<u8>,
}

impl SyntheticSource {
    pub fn solid(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        Self::new(width, height, Pattern::Solid(rgb))
    }

    pub fn orbit(width: usize, height: usize) -> Self {
        Self::new(width, height, Pattern::Orbit)
    }

    pub fn new(width: usize, height: usize, pattern: Pattern) -> Self {
        Self {
            width,
            height,
            pattern,
            started: Instant::now(),
            pixels: vec![0u8; width.saturating_mul(height).saturating_mul(4)],
        }
    }

    fn paint(&mut self) {
        match self.pattern {
            Pattern::Solid(rgb) => {
                for px in self.pixels.chunks_exact_mut(4) {
                    px.copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
                }
            }
            Pattern::Orbit => {
                let t = self.started.elapsed().as_secs_f32();
                let w = self.width as f32;
                let h = self.height as f32;
                let cx = w * 0.5 + (t * 0.7).cos() * w * 0.2;
                let cy = h * 0.45 + (t * 1.1 + PI * 0.25).sin() * h * 0.12;
                let r = h.min(w) * 0.28;
                for (i, px) in self.pixels.chunks_exact_mut(4).enumerate() {
                    let x = (i % self.width) as f32;
                    let y = (i / self.width) as f32;
                    let d = ((x - cx) * (x - cx) + (y - cy) * (y - cy) * 0.8).sqrt() / r;
                    // Soft falloff so the dither has a gradient to work with.
                    let v = (1.0 - d).clamp(0.0, 1.0);
                    let shade = (24.0 + v.powf(0.6) * 220.0) as u8;
                    px.copy_from_slice(&[shade, shade, (shade as f32 * 0.92) as u8, 255]);
                }
            }
        }
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn native_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn current_frame(&mut self) -> Option<SourceFrame<'_>> {
        if self.pixels.is_empty() {
            return None;
        }
        self.paint();
        Some(SourceFrame {
            width: self.width,
            height: self.height,
            rgba: &self.pixels,
        })
    }
}

/// A still picture served as an endless video.
pub struct ImageSource {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl ImageSource {
    pub fn open(path: PathBuf) -> Result<Self, CaptureError> {
        let img = image::open(&path).map_err(|err| match err {
            image::ImageError::IoError(io_err) if io_err.kind() == io::ErrorKind::PermissionDenied => {
                CaptureError::AccessDenied(format!("{}: {io_err}", path.display()))
            }
            other => CaptureError::Unavailable(format!("{}: {other}", path.display())),
        })?;
        let rgba = img.to_rgba8();
        Ok(Self::from_rgba(
            rgba.width() as usize,
            rgba.height() as usize,
            rgba.into_raw(),
        ))
    }

    pub fn from_rgba(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }
}

impl FrameSource for ImageSource {
    fn name(&self) -> &'static str {
        "image"
    }

    fn native_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn current_frame(&mut self) -> Option<SourceFrame<'_>> {
        let frame = SourceFrame {
            width: self.width,
            height: self.height,
            rgba: &self.pixels,
        };
        frame.is_well_formed().then_some(frame)
    }
}

#[derive(Default)]
struct LatestFrame {
    seq: u64,
    pixels: Vec<u8>,
}

/// Live camera frames piped from an ffmpeg child process as raw RGBA.
pub struct CameraSource {
    child: Child,
    width: usize,
    height: usize,
    latest: Arc<Mutex<LatestFrame>>,
    running: Arc<AtomicBool>,
    reader: Option<thread::JoinHandle<()>>,
    seen_seq: u64,
    local: Vec<u8>,
}

impl CameraSource {
    pub fn open(device: Option<&str>, width: usize, height: usize) -> Result<Self, CaptureError> {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-hide_banner").arg("-loglevel").arg("error");
        push_input_args(&mut cmd, device);
        cmd.arg("-vf")
            .arg(format!("scale={width}:{height}"))
            .arg("-pix_fmt")
            .arg("rgba")
            .arg("-f")
            .arg("rawvideo")
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                CaptureError::Unavailable("ffmpeg not found in PATH (install ffmpeg and retry)".into())
            }
            _ => CaptureError::Unavailable(format!("failed to run ffmpeg: {err}")),
        })?;

        let Some(mut stdout) = child.stdout.take() else {
            let _ = child.kill();
            return Err(CaptureError::Unavailable("ffmpeg stdout was not captured".into()));
        };

        let frame_len = width * height * 4;
        let mut first = vec![0u8; frame_len];
        if let Err(err) = stdout.read_exact(&mut first) {
            let _ = child.kill();
            let _ = child.wait();
            let mut stderr_text = String::new();
            if let Some(mut stderr) = child.stderr.take() {
                let _ = stderr.read_to_string(&mut stderr_text);
            }
            return Err(classify_ffmpeg_failure(stderr_text.trim(), &err));
        }

        if let Some(stderr) = child.stderr.take() {
            thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    warn!("ffmpeg: {line}");
                }
            });
        }

        let latest = Arc::new(Mutex::new(LatestFrame {
            seq: 1,
            pixels: first,
        }));
        let running = Arc::new(AtomicBool::new(true));
        let reader = spawn_reader(stdout, frame_len, Arc::clone(&latest), Arc::clone(&running));

        Ok(Self {
            child,
            width,
            height,
            latest,
            running,
            reader: Some(reader),
            seen_seq: 0,
            local: Vec::with_capacity(frame_len),
        })
    }
}

fn push_input_args(cmd: &mut Command, device: Option<&str>) {
    if cfg!(target_os = "macos") {
        cmd.arg("-f")
            .arg("avfoundation")
            .arg("-framerate")
            .arg("30")
            .arg("-i")
            .arg(device.unwrap_or("0"));
    } else if cfg!(target_os = "windows") {
        cmd.arg("-f")
            .arg("dshow")
            .arg("-i")
            .arg(format!("video={}", device.unwrap_or("Integrated Camera")));
    } else {
        cmd.arg("-f")
            .arg("v4l2")
            .arg("-i")
            .arg(device.unwrap_or("/dev/video0"));
    }
}

fn classify_ffmpeg_failure(stderr: &str, err: &io::Error) -> CaptureError {
    let detail = if stderr.is_empty() {
        format!("no frame from ffmpeg ({err})")
    } else {
        stderr.lines().last().unwrap_or(stderr).to_string()
    };
    let lower = stderr.to_ascii_lowercase();
    if lower.contains("permission denied") || lower.contains("not authorized") {
        CaptureError::AccessDenied(detail)
    } else {
        CaptureError::Unavailable(detail)
    }
}

fn spawn_reader(
    mut stdout: ChildStdout,
    frame_len: usize,
    latest: Arc<Mutex<LatestFrame>>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut scratch = vec![0u8; frame_len];
        while running.load(Ordering::Relaxed) {
            if stdout.read_exact(&mut scratch).is_err() {
                debug!("camera stream ended");
                break;
            }
            let Ok(mut slot) = latest.lock() else {
                break;
            };
            std::mem::swap(&mut slot.pixels, &mut scratch);
            slot.seq += 1;
            if scratch.len() != frame_len {
                scratch.resize(frame_len, 0);
            }
        }
    })
}

impl FrameSource for CameraSource {
    fn name(&self) -> &'static str {
        "camera"
    }

    fn native_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn current_frame(&mut self) -> Option<SourceFrame<'_>> {
        if let Ok(slot) = self.latest.lock() {
            if slot.seq != self.seen_seq {
                self.local.clear();
                self.local.extend_from_slice(&slot.pixels);
                self.seen_seq = slot.seq;
            }
        }
        if self.local.is_empty() {
            return None;
        }
        Some(SourceFrame {
            width: self.width,
            height: self.height,
            rgba: &self.local,
        })
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        // Killing ffmpeg closes stdout, which unblocks the reader.
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}
