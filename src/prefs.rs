use crate::dither::{clamp_threshold, DEFAULT_THRESHOLD};
use crate::palette::PaletteName;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Last palette and threshold the user picked; restored on next launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppPrefs {
    pub palette: PaletteName,
    pub threshold: f32,
}

impl Default for AppPrefs {
    fn default() -> Self {
        Self {
            palette: PaletteName::Lila,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefsError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl AppPrefs {
    pub fn load(path: Option<&Path>) -> Result<Self, PrefsError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = match std::fs::read_to_string(path) {
            Ok(v) => v,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(PrefsError::Io(err.to_string())),
        };
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, PrefsError> {
        let mut prefs = Self::default();
        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key_raw, value_raw)) = line.split_once('=') else {
                return Err(PrefsError::Parse {
                    line: line_no,
                    message: "expected <key>=<value>".to_string(),
                });
            };
            let value = value_raw.trim();
            match key_raw.trim() {
                "palette" => {
                    prefs.palette =
                        PaletteName::from_label(value).ok_or_else(|| PrefsError::Parse {
                            line: line_no,
                            message: format!("unknown palette '{value}'"),
                        })?;
                }
                "threshold" => {
                    let t = value.parse::<f32>().map_err(|_| PrefsError::Parse {
                        line: line_no,
                        message: "threshold must be a number".to_string(),
                    })?;
                    prefs.threshold = clamp_threshold(t);
                }
                // Unknown keys are left for newer versions.
                _ => {}
            }
        }
        Ok(prefs)
    }

    pub fn save(&self, path: Option<&Path>) -> Result<(), PrefsError> {
        let Some(path) = path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PrefsError::Io(e.to_string()))?;
        }
        let body = format!(
            "# lilacam prefs v1\npalette={}\nthreshold={:.1}\n",
            self.palette.label(),
            self.threshold
        );
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, &body).map_err(|e| PrefsError::Io(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| PrefsError::Io(e.to_string()))
    }
}

pub fn prefs_storage_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Some(PathBuf::from(xdg).join("lilacam").join("prefs.txt"));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".config").join("lilacam").join("prefs.txt"))
}
