//! Process configuration and JSON helpers.

use crate::MarkerDictionary;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid frame size {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },
    #[error("command magnitude must be finite and positive (got {0})")]
    InvalidMagnitude(f64),
    #[error("`{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("topics.queue_depth must be at least 1")]
    InvalidQueueDepth,
}

/// Frame sides are handed to OpenCV as `i32`.
const MAX_FRAME_SIDE: u32 = i32::MAX as u32;

/// What the controller emits when no marker is in view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerLostPolicy {
    /// Emit the zero command.
    #[default]
    Stop,
    /// Feed the `(-1, -1)` sentinel through the sign rule like a real
    /// centroid. With any positive setpoint this always commands "up".
    Legacy,
}

/// Where frames come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraSource {
    /// Capture device index (0 = system default).
    Device(i32),
    /// Recorded video file.
    File(PathBuf),
}

impl Default for CameraSource {
    fn default() -> Self {
        Self::Device(0)
    }
}

fn default_window_name() -> String {
    "Marker position".to_owned()
}

fn default_abort_key() -> char {
    'q'
}

fn default_wait_ms() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

/// Debug window settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_window_name")]
    pub window_name: String,
    /// Key that aborts the current cycle before publishing.
    #[serde(default = "default_abort_key")]
    pub abort_key: char,
    /// How long the window waits for a key each cycle, in milliseconds.
    #[serde(default = "default_wait_ms")]
    pub wait_ms: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_name: default_window_name(),
            abort_key: default_abort_key(),
            wait_ms: default_wait_ms(),
        }
    }
}

fn default_node_name() -> String {
    "camera_aruco".to_owned()
}

fn default_pose_topic() -> String {
    "/turtle1/pose".to_owned()
}

fn default_cmd_vel_topic() -> String {
    "/turtle1/cmd_vel".to_owned()
}

fn default_queue_depth() -> usize {
    10
}

/// Message-bus wiring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    #[serde(default = "default_node_name")]
    pub node_name: String,
    #[serde(default = "default_pose_topic")]
    pub pose: String,
    #[serde(default = "default_cmd_vel_topic")]
    pub cmd_vel: String,
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            node_name: default_node_name(),
            pose: default_pose_topic(),
            cmd_vel: default_cmd_vel_topic(),
            queue_depth: default_queue_depth(),
        }
    }
}

fn default_frame_width() -> u32 {
    800
}

fn default_frame_height() -> u32 {
    600
}

fn default_command_magnitude() -> f64 {
    5.0
}

/// Configuration for one servo process. Built once at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServoConfig {
    #[serde(default)]
    pub dictionary: MarkerDictionary,
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
    /// Fixed `linear.x` magnitude of every non-zero command.
    #[serde(default = "default_command_magnitude")]
    pub command_magnitude: f64,
    #[serde(default)]
    pub marker_lost: MarkerLostPolicy,
    #[serde(default)]
    pub camera: CameraSource,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub topics: TopicConfig,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            dictionary: MarkerDictionary::default(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            command_magnitude: default_command_magnitude(),
            marker_lost: MarkerLostPolicy::default(),
            camera: CameraSource::default(),
            display: DisplayConfig::default(),
            topics: TopicConfig::default(),
        }
    }
}

impl ServoConfig {
    /// Vertical pixel coordinate the controller centers the marker on.
    #[inline]
    pub fn setpoint(&self) -> f64 {
        f64::from(self.frame_height) / 2.0
    }

    /// Check invariants that cannot be expressed in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let side_ok = |v: u32| (1..=MAX_FRAME_SIDE).contains(&v);
        if !side_ok(self.frame_width) || !side_ok(self.frame_height) {
            return Err(ConfigError::InvalidFrameSize {
                width: self.frame_width,
                height: self.frame_height,
            });
        }
        if !self.command_magnitude.is_finite() || self.command_magnitude <= 0.0 {
            return Err(ConfigError::InvalidMagnitude(self.command_magnitude));
        }
        if self.topics.pose.trim().is_empty() {
            return Err(ConfigError::EmptyField("topics.pose"));
        }
        if self.topics.cmd_vel.trim().is_empty() {
            return Err(ConfigError::EmptyField("topics.cmd_vel"));
        }
        if self.topics.node_name.trim().is_empty() {
            return Err(ConfigError::EmptyField("topics.node_name"));
        }
        if self.topics.queue_depth == 0 {
            return Err(ConfigError::InvalidQueueDepth);
        }
        Ok(())
    }

    /// Load and validate a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_turtlesim() {
        let cfg = ServoConfig::default();
        assert_eq!(cfg.dictionary, MarkerDictionary::Dict5x5_100);
        assert_eq!((cfg.frame_width, cfg.frame_height), (800, 600));
        assert_eq!(cfg.setpoint(), 300.0);
        assert_eq!(cfg.command_magnitude, 5.0);
        assert_eq!(cfg.marker_lost, MarkerLostPolicy::Stop);
        assert_eq!(cfg.camera, CameraSource::Device(0));
        assert_eq!(cfg.topics.cmd_vel, "/turtle1/cmd_vel");
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn empty_json_object_gives_defaults() {
        let cfg: ServoConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ServoConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let cfg: ServoConfig = serde_json::from_str(
            r#"{
                "dictionary": "DICT_4X4_50",
                "frame_height": 480,
                "marker_lost": "legacy",
                "camera": { "file": "run.mp4" },
                "display": { "enabled": false }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.dictionary, MarkerDictionary::Dict4x4_50);
        assert_eq!(cfg.setpoint(), 240.0);
        assert_eq!(cfg.marker_lost, MarkerLostPolicy::Legacy);
        assert_eq!(cfg.camera, CameraSource::File(PathBuf::from("run.mp4")));
        assert!(!cfg.display.enabled);
        assert_eq!(cfg.display.abort_key, 'q');
    }

    #[test]
    fn unknown_dictionary_fails_to_parse() {
        let err = serde_json::from_str::<ServoConfig>(r#"{ "dictionary": "DICT_3X3_9" }"#)
            .unwrap_err();
        assert!(err.to_string().contains("DICT_3X3_9"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = ServoConfig {
            frame_height: 0,
            ..ServoConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidFrameSize { height: 0, .. })
        ));

        let cfg = ServoConfig {
            command_magnitude: f64::NAN,
            ..ServoConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidMagnitude(_))));

        let mut cfg = ServoConfig::default();
        cfg.topics.cmd_vel = " ".to_owned();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmptyField("topics.cmd_vel"))
        ));
    }

    #[test]
    fn validate_bounds_values_handed_to_backends() {
        let cfg = ServoConfig {
            frame_width: i32::MAX as u32 + 1,
            ..ServoConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidFrameSize { height: 600, .. })
        ));

        let cfg = ServoConfig {
            frame_width: i32::MAX as u32,
            ..ServoConfig::default()
        };
        assert!(cfg.validate().is_ok());

        let mut cfg = ServoConfig::default();
        cfg.topics.queue_depth = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidQueueDepth)));
    }
}
