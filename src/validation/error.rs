//! Error taxonomy for the frame maintainer
//!
//! Every failure is non-fatal: the offending message is dropped and the
//! maintainer keeps running. Errors carry enough context to be logged as a
//! single structured line by [`report`].

use log::Level;
use thiserror::Error;

/// Which inbound channel a frame mismatch was observed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    GeodeticFix,
    Odometry,
}

/// Prerequisites a handler may be waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    Heading,
    GlobalSensorMount,
    LocalSensorMount,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaintainerError {
    #[error("{kind:?} message with unsupported frame {received}, expected {expected}")]
    UnsupportedFrame {
        kind: MessageKind,
        received: String,
        expected: String,
    },

    #[error("update dropped, {missing:?} not yet available")]
    PrerequisiteMissing { missing: Prerequisite },

    #[error("no transform available from '{parent}' to '{child}'")]
    TransformUnavailable { parent: String, child: String },

    #[error("{kind:?} message rejected: {reason}")]
    InvalidMeasurement { kind: MessageKind, reason: String },
}

pub type MaintainerResult<T> = Result<T, MaintainerError>;

impl MaintainerError {
    /// Log level the error is reported at
    pub fn severity(&self) -> Level {
        match self {
            MaintainerError::UnsupportedFrame { .. } => Level::Error,
            MaintainerError::PrerequisiteMissing { .. } => Level::Warn,
            MaintainerError::TransformUnavailable { .. } => Level::Warn,
            MaintainerError::InvalidMeasurement { .. } => Level::Warn,
        }
    }

    /// Whether a later message on the same channel can succeed without any
    /// change to the message itself
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            MaintainerError::UnsupportedFrame { .. } | MaintainerError::InvalidMeasurement { .. }
        )
    }
}

/// Log `error` at its severity and hand it back
pub fn report(error: MaintainerError) -> MaintainerError {
    log::log!(error.severity(), "TRANSFORM | {}", error);
    error
}
