// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Signal source adapter - single-shot acquisition against the platform seam
//! with an inline mock fallback. Single-shot calls never surface a hardware
//! error; a reading is always produced.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::config::Config;

use super::orientation::heading_from_quaternion;
use super::platform::{FieldEvent, OrientationEvent, Platform, SourceError};
use super::types::{HeadingReading, MagneticReading};

/// Probes for hardware capabilities and captures one-shot samples, releasing
/// the sensor subscription immediately after the first event.
pub struct SignalAdapter {
    config: Arc<Config>,
    platform: Arc<dyn Platform>,
}

impl SignalAdapter {
    /// Bind an adapter to a platform.
    pub fn new(config: Arc<Config>, platform: Arc<dyn Platform>) -> Self {
        Self { config, platform }
    }

    /// True iff any recognized sensor capability is exposed. Pure query.
    pub fn probe_availability(&self) -> bool {
        self.platform.has_field_sensor() || self.platform.has_orientation_sensor()
    }

    /// Capture one magnetic-field sample, falling back to the deterministic
    /// mock reading on any acquisition failure.
    pub async fn acquire_single_reading(&self) -> MagneticReading {
        match self.hardware_reading().await {
            Ok(reading) => reading,
            Err(e) => {
                debug!("single-shot reading fell back to mock: {e}");
                MagneticReading::mock()
            }
        }
    }

    /// Capture one compass heading, falling back to the deterministic mock
    /// heading on any acquisition failure.
    pub async fn acquire_single_heading(&self) -> HeadingReading {
        match self.hardware_heading().await {
            Ok(heading) => heading,
            Err(e) => {
                debug!("single-shot heading fell back to mock: {e}");
                HeadingReading::mock()
            }
        }
    }

    /// Rounded field magnitude of a single sample (mock value: 54).
    pub async fn acquire_field_strength(&self) -> i64 {
        self.acquire_single_reading().await.magnitude.round() as i64
    }

    /// One hardware field sample, expressed as an explicit result so callers
    /// select the fallback by matching, not by catching.
    async fn hardware_reading(&self) -> Result<MagneticReading, SourceError> {
        if !self.platform.has_field_sensor() {
            return Err(SourceError::CapabilityMissing);
        }

        let mut stream = self
            .platform
            .open_field_stream(self.config.single_shot_rate_hz)?;
        let event = stream.next().await;
        // Single-shot acquisition must not leave a live hardware listener.
        stream.stop();

        match event {
            Some(FieldEvent::Sample { x, y, z }) => Ok(MagneticReading::from_axes(
                x,
                y,
                z,
                Utc::now().timestamp_millis(),
            )),
            Some(FieldEvent::Fault(message)) => Err(SourceError::Hardware(message)),
            None => Err(SourceError::Hardware(
                "sensor stream ended before first sample".to_string(),
            )),
        }
    }

    /// One hardware orientation sample converted to a heading.
    async fn hardware_heading(&self) -> Result<HeadingReading, SourceError> {
        if !self.platform.has_orientation_sensor() {
            return Err(SourceError::CapabilityMissing);
        }

        let mut stream = self
            .platform
            .open_orientation_stream(self.config.single_shot_rate_hz)?;
        let event = stream.next().await;
        stream.stop();

        match event {
            Some(OrientationEvent::Quaternion(q)) => Ok(HeadingReading::from_degrees(
                heading_from_quaternion(&q),
                Utc::now().timestamp_millis(),
            )),
            Some(OrientationEvent::Fault(message)) => Err(SourceError::Hardware(message)),
            None => Err(SourceError::Hardware(
                "sensor stream ended before first sample".to_string(),
            )),
        }
    }
}
