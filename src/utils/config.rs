use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::{
    DEFAULT_BASE_LINK_FRAME, DEFAULT_EARTH_FRAME, DEFAULT_MAP_FRAME, DEFAULT_ODOM_FRAME,
    DEFAULT_POSITION_SENSOR_FRAME,
};
use crate::geometry::EarthModel;

/// Names of the frames the maintainer publishes and listens for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Earth-centered, earth-fixed frame
    pub earth_frame: String,
    /// NED frame anchored at the first geodetic fix
    pub map_frame: String,
    /// Odometry frame, continuous but drifting
    pub odom_frame: String,
    /// Vehicle body frame
    pub base_link_frame: String,
    /// Frame of the sensor producing geodetic fixes
    pub global_pos_sensor_frame: String,
    /// Frame of the sensor producing odometry, when not reported in base_link
    pub local_pos_sensor_frame: String,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            earth_frame: DEFAULT_EARTH_FRAME.to_string(),
            map_frame: DEFAULT_MAP_FRAME.to_string(),
            odom_frame: DEFAULT_ODOM_FRAME.to_string(),
            base_link_frame: DEFAULT_BASE_LINK_FRAME.to_string(),
            global_pos_sensor_frame: DEFAULT_POSITION_SENSOR_FRAME.to_string(),
            local_pos_sensor_frame: DEFAULT_POSITION_SENSOR_FRAME.to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintainerConfig {
    pub frames: FrameConfig,
    pub earth_model: EarthModel,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("failed to access config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("failed to parse configuration: {message}")]
    Parse { message: String },

    #[error("invalid {parameter} = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
}

impl MaintainerConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: MaintainerConfig = serde_json::from_str(content)
            .map_err(|e| ConfigError::Parse { message: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        Self::from_json_str(&content).map_err(|e| match e {
            ConfigError::Parse { message } => ConfigError::Parse {
                message: format!("'{}': {}", path_str, message),
            },
            other => other,
        })
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse { message: e.to_string() })
    }

    /// Check frame names and ellipsoid parameters.
    ///
    /// Frame names must be non-empty and earth/map/odom/base_link must be
    /// pairwise distinct. The two sensor frames may share a name with each
    /// other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let frames = &self.frames;
        let named = [
            ("earth_frame", &frames.earth_frame),
            ("map_frame", &frames.map_frame),
            ("odom_frame", &frames.odom_frame),
            ("base_link_frame", &frames.base_link_frame),
            ("global_pos_sensor_frame", &frames.global_pos_sensor_frame),
            ("local_pos_sensor_frame", &frames.local_pos_sensor_frame),
        ];

        for (parameter, value) in named.iter() {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: value.to_string(),
                    reason: "frame name must not be empty".to_string(),
                });
            }
        }

        let chain = &named[..4];
        for (i, (parameter, value)) in chain.iter().enumerate() {
            if let Some((other, _)) = chain[..i].iter().find(|(_, v)| v == value) {
                return Err(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: value.to_string(),
                    reason: format!("duplicates {}", other),
                });
            }
        }

        let model = &self.earth_model;
        if !(model.semi_major_axis.is_finite() && model.semi_major_axis > 0.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "earth_model.semi_major_axis".to_string(),
                value: model.semi_major_axis.to_string(),
                reason: "must be a positive length in meters".to_string(),
            });
        }
        if !(0.0..1.0).contains(&model.flattening) {
            return Err(ConfigError::InvalidParameter {
                parameter: "earth_model.flattening".to_string(),
                value: model.flattening.to_string(),
                reason: "must lie in [0, 1)".to_string(),
            });
        }

        Ok(())
    }
}
