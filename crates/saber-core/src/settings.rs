use std::{fs, io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A setting that would make the simulation meaningless. Gameplay constants are
/// never clamped into range, they are rejected.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("hit cooldown must be positive, got {0} ms")]
    NonPositiveCooldown(u64),
    #[error("hit damage must be positive, got {0}")]
    NonPositiveDamage(u32),
    #[error("max hp must be positive, got {0}")]
    NonPositiveMaxHp(u32),
    #[error("center smoothing factor must be in (0, 1], got {0}")]
    InvalidAlpha(f64),
    #[error("calibration scale must be finite and at least 1, got {0}")]
    InvalidCalibrationScale(f64),
    #[error("slot offsets must be finite, got ({0}, {1})")]
    InvalidSlotOffset(f64, f64),
    #[error("snap grid must be finite and positive, got {0}")]
    InvalidSnapGrid(f64),
    #[error("blade length must be finite and not negative, got {0}")]
    InvalidBladeLength(f64),
    #[error("frame size must be finite and positive, got {0}x{1}")]
    InvalidFrameSize(f64, f64),
    #[error("target fps must be positive with a representable frame budget, got {0}")]
    InvalidFps(f64),
    #[error("host interval must be positive, got {0} ms")]
    NonPositiveHostInterval(u64),
}

/// Pixel dimensions of the video frames the sensor runs on.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FrameSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Settings for the hitbox tracker.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrackerSettings {
    /// Blend factor of the center EMA, weight of the newest observation.
    pub center_ema_alpha: f64,
    /// Multiplier applied to the shared box size when calibration locks.
    pub calibration_scale: f64,
    /// Horizontal push of each box toward the opponent, in px.
    pub slot_offset_x: f64,
    /// Vertical shift applied to both boxes, in px.
    pub slot_offset_y: f64,
    /// Grid the emitted boxes are snapped to, in px.
    pub snap_grid: f64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            center_ema_alpha: 0.30,
            calibration_scale: 1.15,
            slot_offset_x: 60.0,
            slot_offset_y: 0.0,
            snap_grid: 2.0,
        }
    }
}

/// Settings for the weapon tracker.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeaponSettings {
    /// Blade length from the palm, in px.
    pub blade_length: f64,
}

impl Default for WeaponSettings {
    fn default() -> Self {
        Self {
            blade_length: 180.0,
        }
    }
}

/// Health and hit rules.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RuleSettings {
    pub max_hp: u32,
    pub hit_damage: u32,
    /// Minimum time between two hits on the same slot, in ms.
    pub hit_cooldown_ms: u64,
}

impl RuleSettings {
    pub fn hit_cooldown(&self) -> Duration {
        Duration::from_millis(self.hit_cooldown_ms)
    }
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            max_hp: 100,
            hit_damage: 8,
            hit_cooldown_ms: 250,
        }
    }
}

/// Settings for the tick loop.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExecutorSettings {
    /// Upper bound on ticks per second. Faster host requests are dropped.
    pub target_fps: f64,
    /// How often the host asks for a tick, in ms.
    pub host_interval_ms: u64,
}

impl ExecutorSettings {
    /// Minimum time between two ticks. `None` when `target_fps` gives no
    /// representable budget.
    pub fn try_frame_budget(&self) -> Option<Duration> {
        if !(self.target_fps > 0.0) {
            return None;
        }
        Duration::try_from_secs_f64(1.0 / self.target_fps).ok()
    }

    /// Minimum time between two ticks. Saturates for settings that fail
    /// [`MatchSettings::validate`].
    pub fn frame_budget(&self) -> Duration {
        self.try_frame_budget().unwrap_or(Duration::MAX)
    }

    pub fn host_interval(&self) -> Duration {
        Duration::from_millis(self.host_interval_ms)
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            target_fps: 30.0,
            host_interval_ms: 16,
        }
    }
}

/// All tunables of a match.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchSettings {
    #[serde(default)]
    pub frame: FrameSettings,
    #[serde(default)]
    pub tracker: TrackerSettings,
    #[serde(default)]
    pub weapon: WeaponSettings,
    #[serde(default)]
    pub rules: RuleSettings,
    #[serde(default)]
    pub executor: ExecutorSettings,
}

impl MatchSettings {
    /// Check that every constant is in its meaningful range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let FrameSettings { width, height } = self.frame;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(SettingsError::InvalidFrameSize(width, height));
        }

        let tracker = &self.tracker;
        if !(tracker.center_ema_alpha > 0.0 && tracker.center_ema_alpha <= 1.0) {
            return Err(SettingsError::InvalidAlpha(tracker.center_ema_alpha));
        }
        if !(tracker.calibration_scale >= 1.0 && tracker.calibration_scale.is_finite()) {
            return Err(SettingsError::InvalidCalibrationScale(
                tracker.calibration_scale,
            ));
        }
        if !(tracker.slot_offset_x.is_finite() && tracker.slot_offset_y.is_finite()) {
            return Err(SettingsError::InvalidSlotOffset(
                tracker.slot_offset_x,
                tracker.slot_offset_y,
            ));
        }
        if !(tracker.snap_grid > 0.0 && tracker.snap_grid.is_finite()) {
            return Err(SettingsError::InvalidSnapGrid(tracker.snap_grid));
        }

        let blade_length = self.weapon.blade_length;
        if !(blade_length >= 0.0 && blade_length.is_finite()) {
            return Err(SettingsError::InvalidBladeLength(blade_length));
        }

        let rules = &self.rules;
        if rules.max_hp == 0 {
            return Err(SettingsError::NonPositiveMaxHp(rules.max_hp));
        }
        if rules.hit_damage == 0 {
            return Err(SettingsError::NonPositiveDamage(rules.hit_damage));
        }
        if rules.hit_cooldown_ms == 0 {
            return Err(SettingsError::NonPositiveCooldown(rules.hit_cooldown_ms));
        }

        let executor = &self.executor;
        if !executor.target_fps.is_finite() || executor.try_frame_budget().is_none() {
            return Err(SettingsError::InvalidFps(executor.target_fps));
        }
        if executor.host_interval_ms == 0 {
            return Err(SettingsError::NonPositiveHostInterval(
                executor.host_interval_ms,
            ));
        }

        Ok(())
    }

    /// Load settings from a JSON file.
    ///
    /// A missing file is created with the defaults. A file that fails to parse is
    /// reported and replaced by the defaults in memory (the file is left untouched).
    /// Other I/O errors are returned.
    pub fn load_or_insert(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => Ok(settings),
                Err(err) => {
                    log::error!(
                        "Failed to parse match settings from {}: {}",
                        path.display(),
                        err
                    );
                    Ok(Self::default())
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let settings = Self::default();
                let contents = serde_json::to_string_pretty(&settings)?;
                fs::write(path, contents)?;
                log::info!("Wrote default match settings to {}", path.display());
                Ok(settings)
            }
            Err(err) => Err(err),
        }
    }
}
