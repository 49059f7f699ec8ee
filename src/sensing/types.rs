// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Canonical reading shapes and common sensing types

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Fixed mock magnetic-field axes (µT), emitted when no hardware is reachable.
pub const MOCK_FIELD_X: f64 = 25.5;
/// Mock Y axis in µT.
pub const MOCK_FIELD_Y: f64 = -12.3;
/// Mock Z axis in µT.
pub const MOCK_FIELD_Z: f64 = 45.8;
/// Mock field magnitude in µT. A fixed literal from the mock profile, not
/// recomputed from the mock axes.
pub const MOCK_FIELD_MAGNITUDE: f64 = 54.2;
/// Mock compass heading in degrees.
pub const MOCK_HEADING: f64 = 180.0;
/// Sentinel accuracy meaning "unknown".
pub const ACCURACY_UNKNOWN: f64 = -1.0;

/// A single magnetic-field sample, axes in microtesla.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagneticReading {
    /// X axis field strength (µT)
    pub x: f64,
    /// Y axis field strength (µT)
    pub y: f64,
    /// Z axis field strength (µT)
    pub z: f64,
    /// Total field magnitude (µT)
    pub magnitude: f64,
    /// Unix millis at emission
    pub timestamp: i64,
}

impl MagneticReading {
    /// Normalize raw sensor axes into a reading; magnitude is derived.
    pub fn from_axes(x: f64, y: f64, z: f64, timestamp: i64) -> Self {
        Self {
            x,
            y,
            z,
            magnitude: (x * x + y * y + z * z).sqrt(),
            timestamp,
        }
    }

    /// The deterministic fallback reading used when hardware is absent or faulted.
    pub fn mock() -> Self {
        Self {
            x: MOCK_FIELD_X,
            y: MOCK_FIELD_Y,
            z: MOCK_FIELD_Z,
            magnitude: MOCK_FIELD_MAGNITUDE,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// A single compass-heading sample, degrees in `[0, 360)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingReading {
    /// Heading relative to magnetic north
    pub magnetic_heading: f64,
    /// Always mirrors `magnetic_heading`; true-north correction is not modelled
    pub true_heading: f64,
    /// Accuracy in degrees, `-1.0` when unknown
    pub heading_accuracy: f64,
    /// Unix millis at emission
    pub timestamp: i64,
}

impl HeadingReading {
    /// Build a heading sample; the heading is normalized into `[0, 360)` and
    /// mirrored into `true_heading`.
    pub fn from_degrees(heading: f64, timestamp: i64) -> Self {
        let heading = heading.rem_euclid(360.0);
        Self {
            magnetic_heading: heading,
            true_heading: heading,
            heading_accuracy: ACCURACY_UNKNOWN,
            timestamp,
        }
    }

    /// The deterministic fallback heading used when hardware is absent or faulted.
    pub fn mock() -> Self {
        Self::from_degrees(MOCK_HEADING, Utc::now().timestamp_millis())
    }
}

/// Sensor accuracy levels, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccuracyLevel {
    /// Readings cannot be trusted
    Unreliable,
    /// Low accuracy
    Low,
    /// Medium accuracy
    Medium,
    /// High accuracy
    High,
}

impl AccuracyLevel {
    /// Numeric level used on the command surface (0..=3).
    pub fn level(self) -> u8 {
        match self {
            AccuracyLevel::Unreliable => 0,
            AccuracyLevel::Low => 1,
            AccuracyLevel::Medium => 2,
            AccuracyLevel::High => 3,
        }
    }
}

/// Point-in-time composite of sensor state. Recomputed on every request,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorInfo {
    /// Whether any recognized sensor capability is exposed
    pub is_available: bool,
    /// A current (mock-or-real) field reading
    pub reading: MagneticReading,
    /// A current (mock-or-real) heading
    pub heading: HeadingReading,
    /// Numeric accuracy level (0..=3)
    pub accuracy: u8,
    /// Whether the sensor needs calibration
    pub calibration_needed: bool,
    /// Platform tag from configuration
    pub platform: String,
}

/// Clock that hands out strictly increasing Unix-milli timestamps.
///
/// Successive emissions from one watch session must never share a timestamp,
/// even when the wall clock has not advanced between ticks.
#[derive(Debug, Default)]
pub struct MonotonicMillis {
    last: i64,
}

impl MonotonicMillis {
    /// Next timestamp: wall-clock millis, clamped above the previous value.
    pub fn next(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_matches_axes() {
        let r = MagneticReading::from_axes(3.0, 4.0, 12.0, 0);
        assert!((r.magnitude - 13.0).abs() < 1e-6);

        let r = MagneticReading::from_axes(25.5, -12.3, 45.8, 0);
        let expected = (25.5f64 * 25.5 + 12.3 * 12.3 + 45.8 * 45.8).sqrt();
        assert!((r.magnitude - expected).abs() < 1e-6);
    }

    #[test]
    fn test_mock_reading_is_fixed() {
        let r = MagneticReading::mock();
        assert_eq!(r.x, 25.5);
        assert_eq!(r.y, -12.3);
        assert_eq!(r.z, 45.8);
        assert_eq!(r.magnitude, 54.2);
    }

    #[test]
    fn test_heading_normalized_and_mirrored() {
        let h = HeadingReading::from_degrees(-90.0, 0);
        assert!((h.magnetic_heading - 270.0).abs() < 1e-9);
        assert_eq!(h.magnetic_heading, h.true_heading);

        let h = HeadingReading::from_degrees(360.0, 0);
        assert_eq!(h.magnetic_heading, 0.0);

        let h = HeadingReading::from_degrees(725.0, 0);
        assert!((h.magnetic_heading - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_mock_heading() {
        let h = HeadingReading::mock();
        assert_eq!(h.magnetic_heading, 180.0);
        assert_eq!(h.true_heading, 180.0);
        assert_eq!(h.heading_accuracy, -1.0);
    }

    #[test]
    fn test_monotonic_millis_strictly_increases() {
        let mut clock = MonotonicMillis::default();
        let mut prev = clock.next();
        for _ in 0..1000 {
            let ts = clock.next();
            assert!(ts > prev);
            prev = ts;
        }
    }

    #[test]
    fn test_accuracy_levels() {
        assert_eq!(AccuracyLevel::Unreliable.level(), 0);
        assert_eq!(AccuracyLevel::High.level(), 3);
    }

    #[test]
    fn test_heading_wire_format_is_camel_case() {
        let h = HeadingReading::from_degrees(90.0, 42);
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["magneticHeading"], 90.0);
        assert_eq!(json["trueHeading"], 90.0);
        assert_eq!(json["headingAccuracy"], -1.0);
        assert_eq!(json["timestamp"], 42);
    }
}
