use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub dark: [u8; 3],
    pub light: [u8; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PaletteName {
    #[value(alias = "purple", alias = "violet")]
    Lila,
    #[value(alias = "monochrome", alias = "bw")]
    Mono,
}

impl PaletteName {
    pub const fn all() -> [Self; 2] {
        [Self::Lila, Self::Mono]
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Lila => Palette {
                dark: [38, 14, 58],
                light: [206, 164, 255],
            },
            Self::Mono => Palette {
                dark: [0, 0, 0],
                light: [255, 255, 255],
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Lila => "lila",
            Self::Mono => "mono",
        }
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|p| *p == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Lenient lookup used for persisted prefs and UI selection.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lila" | "purple" | "violet" => Some(Self::Lila),
            "mono" | "monochrome" | "bw" => Some(Self::Mono),
            _ => None,
        }
    }
}
