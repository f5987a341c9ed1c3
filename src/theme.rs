/// Theme system: five fixed palettes, cycled with a shortcut.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// RGBA color with float channels in `0.0..=1.0`, the shape GDK expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub foreground: Rgba,
    pub cursor: Rgba,
}

impl Palette {
    /// Foreground doubles as the cursor color in every bundled theme.
    const fn new(background: Rgba, foreground: Rgba) -> Self {
        Self { background, foreground, cursor: foreground }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Classic,
    Home,
    Cold,
    Cute,
    Light,
}

const PALETTES: [Palette; 5] = [
    Palette::new(Rgba::opaque(0.0, 0.0, 0.0), Rgba::opaque(1.0, 1.0, 1.0)),
    Palette::new(Rgba::opaque(0.20, 0.15, 0.12), Rgba::opaque(0.96, 0.91, 0.84)),
    Palette::new(Rgba::opaque(0.12, 0.14, 0.25), Rgba::opaque(0.67, 0.84, 0.90)),
    Palette::new(Rgba::opaque(0.35, 0.12, 0.25), Rgba::opaque(1.0, 0.89, 0.88)),
    Palette::new(Rgba::opaque(1.0, 1.0, 1.0), Rgba::opaque(0.0, 0.0, 0.0)),
];

impl Theme {
    /// Cycle order; also the on-disk index order.
    pub const ALL: [Theme; 5] = [
        Theme::Classic,
        Theme::Home,
        Theme::Cold,
        Theme::Cute,
        Theme::Light,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Convert a persisted index. Anything outside `0..=4` is rejected.
    pub fn from_index(index: i64) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(Error::InvalidThemeIndex(index))
    }

    /// Next theme, wrapping from `Light` back to `Classic`.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn palette(self) -> Palette {
        PALETTES[self.index()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Home => "home",
            Theme::Cold => "cold",
            Theme::Cute => "cute",
            Theme::Light => "light",
        }
    }
}

/// Background, foreground and cursor colors for a theme.
pub fn colors_for(theme: Theme) -> Palette {
    theme.palette()
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme: {s}"))
    }
}
