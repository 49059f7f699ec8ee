// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Platform seam - the polymorphic boundary to whatever sensor primitive the
//! host exposes. The engine never talks to hardware directly; it opens event
//! streams through a [`Platform`] and normalizes what comes out.

use async_trait::async_trait;
use thiserror::Error;

/// Why a sensor acquisition attempt failed.
///
/// `CapabilityMissing` silently selects the mock/synthetic path and is never
/// surfaced to callers. `Hardware` is absorbed for single-shot reads and
/// surfaced to the error continuation for active watches.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The platform does not expose the requested sensor type.
    #[error("sensor capability not exposed by platform")]
    CapabilityMissing,
    /// The subscription threw, or the sensor signalled an error event.
    #[error("sensor hardware fault: {0}")]
    Hardware(String),
}

/// One event from a magnetic-field subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// Raw axis sample in microtesla.
    Sample {
        /// X axis (µT)
        x: f64,
        /// Y axis (µT)
        y: f64,
        /// Z axis (µT)
        z: f64,
    },
    /// The sensor signalled an error event.
    Fault(String),
}

/// One event from an absolute-orientation subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum OrientationEvent {
    /// Orientation quaternion in `[x, y, z, w]` scalar-last convention.
    Quaternion([f64; 4]),
    /// The sensor signalled an error event.
    Fault(String),
}

/// A live magnetic-field subscription. `stop` releases the hardware resource;
/// after it returns no further events are delivered.
#[async_trait]
pub trait FieldStream: Send {
    /// Await the next event; `None` means the stream ended.
    async fn next(&mut self) -> Option<FieldEvent>;
    /// Release the underlying sensor subscription.
    fn stop(&mut self);
}

/// A live absolute-orientation subscription.
#[async_trait]
pub trait OrientationStream: Send {
    /// Await the next event; `None` means the stream ended.
    async fn next(&mut self) -> Option<OrientationEvent>;
    /// Release the underlying sensor subscription.
    fn stop(&mut self);
}

/// Host sensor capabilities. Implementations wrap a real driver; the crate
/// ships only [`NullPlatform`], which exposes nothing and forces the
/// simulation path.
pub trait Platform: Send + Sync {
    /// True iff a magnetic-field sensor is exposed. Pure query, no side effects.
    fn has_field_sensor(&self) -> bool;

    /// True iff an absolute-orientation sensor is exposed.
    fn has_orientation_sensor(&self) -> bool;

    /// Open an event-driven magnetic-field subscription at `rate_hz`.
    fn open_field_stream(&self, rate_hz: f64) -> Result<Box<dyn FieldStream>, SourceError>;

    /// Open an event-driven orientation subscription at `rate_hz`.
    fn open_orientation_stream(
        &self,
        rate_hz: f64,
    ) -> Result<Box<dyn OrientationStream>, SourceError>;
}

/// A platform with no sensor capabilities. Every probe is false and every
/// open fails with [`SourceError::CapabilityMissing`], so the engine runs
/// entirely on synthetic data.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlatform;

impl Platform for NullPlatform {
    fn has_field_sensor(&self) -> bool {
        false
    }

    fn has_orientation_sensor(&self) -> bool {
        false
    }

    fn open_field_stream(&self, _rate_hz: f64) -> Result<Box<dyn FieldStream>, SourceError> {
        Err(SourceError::CapabilityMissing)
    }

    fn open_orientation_stream(
        &self,
        _rate_hz: f64,
    ) -> Result<Box<dyn OrientationStream>, SourceError> {
        Err(SourceError::CapabilityMissing)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_platform_has_no_capabilities() {
        let platform = NullPlatform;
        assert!(!platform.has_field_sensor());
        assert!(!platform.has_orientation_sensor());
        assert!(matches!(
            platform.open_field_stream(10.0),
            Err(SourceError::CapabilityMissing)
        ));
        assert!(matches!(
            platform.open_orientation_stream(10.0),
            Err(SourceError::CapabilityMissing)
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SourceError::CapabilityMissing.to_string(),
            "sensor capability not exposed by platform"
        );
        assert_eq!(
            SourceError::Hardware("sensor went away".into()).to_string(),
            "sensor hardware fault: sensor went away"
        );
    }
}
