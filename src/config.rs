/// Configuration: theme selector and font scale, persisted as a small INI file.
/// Config file: `~/.config/gsf-term/config.ini`

use crate::error::{Error, Result};
use crate::theme::Theme;
use log::{info, warn};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "gsf-term";
pub const CONFIG_FILE: &str = "config.ini";
pub const SECTION: &str = "GSF-Term";

pub const DEFAULT_FONT_SCALE: f64 = 1.2;
pub const FONT_SCALE_STEP: f64 = 0.1;
pub const MIN_FONT_SCALE: f64 = 0.1;
pub const MAX_FONT_SCALE: f64 = 10.0;

/// Keep a finite scale inside `MIN_FONT_SCALE..=MAX_FONT_SCALE`.
fn clamp_font_scale(scale: f64) -> f64 {
    scale.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub theme: Theme,
    pub font_scale: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::Classic,
            font_scale: DEFAULT_FONT_SCALE,
        }
    }
}

impl Config {
    /// Parse `key=value` lines, falling back to defaults field by field.
    /// Section headers, blank lines and unknown keys are skipped.
    pub fn from_str(s: &str) -> Self {
        let mut cfg = Self::default();
        for line in s.lines() {
            let Some((key, value)) = line.split_once('=') else { continue };
            let value = value.trim();
            match key.trim() {
                "theme" => match value.parse::<i64>() {
                    Ok(index) => {
                        cfg.theme = Theme::from_index(index).unwrap_or_else(|e| {
                            warn!("{e}; using {}", Theme::default());
                            Theme::default()
                        });
                    }
                    Err(_) => warn!("ignoring malformed theme value {value:?}"),
                },
                "font_scale" => match value.parse::<f64>() {
                    Ok(scale) if scale.is_finite() => cfg.font_scale = clamp_font_scale(scale),
                    _ => warn!("ignoring malformed font_scale value {value:?}"),
                },
                _ => {}
            }
        }
        cfg
    }

    /// Serialize in the on-disk layout; font scale keeps two fraction digits.
    pub fn to_ini(&self) -> String {
        format!(
            "[{SECTION}]\ntheme={}\nfont_scale={:.2}\n",
            self.theme.index(),
            self.font_scale
        )
    }

    /// Advance to the next theme and return it.
    pub fn cycle_theme(&mut self) -> Theme {
        self.theme = self.theme.next();
        self.theme
    }

    /// Never goes above `MAX_FONT_SCALE`.
    pub fn increase_font_scale(&mut self) -> f64 {
        self.step_font_scale(FONT_SCALE_STEP)
    }

    /// Never goes below `MIN_FONT_SCALE`.
    pub fn decrease_font_scale(&mut self) -> f64 {
        self.step_font_scale(-FONT_SCALE_STEP)
    }

    fn step_font_scale(&mut self, delta: f64) -> f64 {
        // Round to hundredths so memory matches what `to_ini` writes.
        let next = ((self.font_scale + delta) * 100.0).round() / 100.0;
        self.font_scale = clamp_font_scale(next);
        self.font_scale
    }
}

/// `<home>/.config/gsf-term/config.ini`
pub fn config_path_in(home: &Path) -> PathBuf {
    home.join(".config").join(APP_DIR).join(CONFIG_FILE)
}

/// Reads and writes the config file at a fixed location.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at the current user's home directory.
    pub fn user_default() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDirectory)?;
        Ok(Self::at(config_path_in(&home)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<Config> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Config::from_str(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::ConfigNotFound { path: self.path.clone() })
            }
            Err(source) => Err(Error::ConfigRead { path: self.path.clone(), source }),
        }
    }

    /// Load config from file, falling back to defaults.
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(cfg) => {
                info!("loaded config from {}: theme={}, font_scale={:.2}",
                    self.path.display(), cfg.theme, cfg.font_scale);
                cfg
            }
            Err(e @ Error::ConfigNotFound { .. }) => {
                info!("{e}, using defaults");
                Config::default()
            }
            Err(e) => {
                warn!("{e}, using defaults");
                Config::default()
            }
        }
    }

    /// Write through a temporary sibling and rename it into place.
    pub fn save(&self, cfg: &Config) -> Result<()> {
        let write_failed = |source| Error::ConfigWriteFailed { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_failed)?;
        }
        let tmp = self.path.with_extension("ini.tmp");
        let written = std::fs::write(&tmp, cfg.to_ini())
            .and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(write_failed(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.theme, Theme::Classic);
        assert_eq!(cfg.font_scale, 1.2);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Config::from_str(""), Config::default());
    }

    #[test]
    fn test_parse_written_layout() {
        let cfg = Config::from_str("[GSF-Term]\ntheme=3\nfont_scale=1.70\n");
        assert_eq!(cfg.theme, Theme::Cute);
        assert_eq!(cfg.font_scale, 1.7);
    }

    #[test]
    fn test_parse_any_order_and_unknown_keys() {
        let cfg = Config::from_str("font_scale = 0.90\r\nopacity=0.5\r\n\r\n theme = 4 \r\n");
        assert_eq!(cfg.theme, Theme::Light);
        assert_eq!(cfg.font_scale, 0.9);
    }

    #[test]
    fn test_partial_keeps_defaults() {
        let cfg = Config::from_str("theme=2");
        assert_eq!(cfg.theme, Theme::Cold);
        assert_eq!(cfg.font_scale, DEFAULT_FONT_SCALE);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let cfg = Config::from_str("theme=two\nfont_scale=big\n");
        assert_eq!(cfg, Config::default());

        let cfg = Config::from_str("theme=1\nfont_scale=NaN\n");
        assert_eq!(cfg.theme, Theme::Home);
        assert_eq!(cfg.font_scale, DEFAULT_FONT_SCALE);
    }

    #[test]
    fn test_out_of_range_theme_uses_classic() {
        assert_eq!(Config::from_str("theme=7").theme, Theme::Classic);
        assert_eq!(Config::from_str("theme=-2").theme, Theme::Classic);
    }

    #[test]
    fn test_tiny_font_scale_is_clamped() {
        assert_eq!(Config::from_str("font_scale=-3.0").font_scale, MIN_FONT_SCALE);
        assert_eq!(Config::from_str("font_scale=0").font_scale, MIN_FONT_SCALE);
    }

    #[test]
    fn test_huge_font_scale_stays_finite() {
        let mut cfg = Config::from_str("font_scale=1e307\n");
        assert_eq!(cfg.font_scale, MAX_FONT_SCALE);
        cfg.increase_font_scale();
        assert_eq!(cfg.font_scale, MAX_FONT_SCALE);
        assert!(cfg.to_ini().ends_with("font_scale=10.00\n"));
        assert_eq!(Config::from_str(&cfg.to_ini()).font_scale, MAX_FONT_SCALE);

        cfg.font_scale = 9.95;
        assert_eq!(cfg.increase_font_scale(), MAX_FONT_SCALE);
        assert!((cfg.decrease_font_scale() - 9.9).abs() < 1e-9);
    }

    #[test]
    fn test_to_ini_layout() {
        let cfg = Config { theme: Theme::Home, font_scale: 1.5 };
        assert_eq!(cfg.to_ini(), "[GSF-Term]\ntheme=1\nfont_scale=1.50\n");
    }

    #[test]
    fn test_font_scale_steps() {
        let mut cfg = Config::default();
        for _ in 0..3 {
            cfg.increase_font_scale();
        }
        assert!((cfg.font_scale - 1.5).abs() < 1e-6);

        cfg.font_scale = 0.2;
        assert!((cfg.decrease_font_scale() - 0.1).abs() < 1e-9);
        assert_eq!(cfg.decrease_font_scale(), MIN_FONT_SCALE);
    }

    #[test]
    fn test_cycle_theme() {
        let mut cfg = Config::default();
        assert_eq!(cfg.cycle_theme(), Theme::Home);
        assert_eq!(cfg.theme, Theme::Home);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("config.ini"));
        for theme in Theme::ALL {
            for scale in [0.1, 0.75, 1.2, 2.35, 4.0] {
                let cfg = Config { theme, font_scale: scale };
                store.save(&cfg).unwrap();
                assert_eq!(store.try_load().unwrap(), cfg);
            }
        }
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = config_path_in(dir.path());
        let store = ConfigStore::at(&path);
        store.save(&Config::default()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("ini.tmp").exists());
        // Second save with the directory already present.
        store.save(&Config { theme: Theme::Cold, font_scale: 1.3 }).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[GSF-Term]\ntheme=2\nfont_scale=1.30\n");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("absent.ini"));
        assert!(matches!(store.try_load(), Err(Error::ConfigNotFound { .. })));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn test_load_unreadable_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let store = ConfigStore::at(&path);
        assert!(matches!(store.try_load(), Err(Error::ConfigRead { .. })));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn test_save_into_file_parent_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();
        let store = ConfigStore::at(blocker.join("config.ini"));
        let err = store.save(&Config::default()).unwrap_err();
        assert!(matches!(err, Error::ConfigWriteFailed { .. }));
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        // A non-empty directory in place of the file makes the rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "").unwrap();

        let store = ConfigStore::at(&path);
        let err = store.save(&Config::default()).unwrap_err();
        assert!(matches!(err, Error::ConfigWriteFailed { .. }));
        assert!(!path.with_extension("ini.tmp").exists());
    }

    #[test]
    fn test_config_path() {
        let path = config_path_in(Path::new("/home/someone"));
        assert!(path.to_str().unwrap().ends_with(".config/gsf-term/config.ini"));
    }
}
