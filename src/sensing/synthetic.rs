// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Deterministic signal synthesis - the fallback generators that stand in for
//! hardware when no sensor is reachable. Given the same starting phase the
//! emitted sequence is fully reproducible.

use super::types::{
    HeadingReading, MagneticReading, MOCK_FIELD_MAGNITUDE, MOCK_FIELD_X, MOCK_FIELD_Y,
    MOCK_FIELD_Z, MOCK_HEADING,
};

/// Phase increment per magnetic tick, radians.
const FIELD_PHASE_STEP: f64 = 0.1;
/// Heading advance per tick, degrees.
const HEADING_STEP: f64 = 1.0;

/// Evolving phase state for the synthetic magnetic-field signal.
///
/// Each tick advances the phase by 0.1 rad and modulates the mock baseline:
/// `x = 25.5 + 5·sin(a)`, `y = -12.3 + 5·cos(a)`, `z = 45.8 + 3·sin(a/2)`,
/// `magnitude = 54.2 + 2·sin(a)`.
#[derive(Debug, Default)]
pub struct FieldPhase {
    angle: f64,
}

impl FieldPhase {
    /// Advance the phase and synthesize the next reading.
    pub fn tick(&mut self, timestamp: i64) -> MagneticReading {
        self.angle += FIELD_PHASE_STEP;
        MagneticReading {
            x: MOCK_FIELD_X + 5.0 * self.angle.sin(),
            y: MOCK_FIELD_Y + 5.0 * self.angle.cos(),
            z: MOCK_FIELD_Z + 3.0 * (self.angle * 0.5).sin(),
            magnitude: MOCK_FIELD_MAGNITUDE + 2.0 * self.angle.sin(),
            timestamp,
        }
    }
}

/// Evolving state for the synthetic compass heading.
///
/// Emits the current heading then advances one degree, so the observed
/// sequence is `180, 181, …, 359, 0, 1, …`.
#[derive(Debug)]
pub struct HeadingPhase {
    heading: f64,
}

impl Default for HeadingPhase {
    fn default() -> Self {
        Self {
            heading: MOCK_HEADING,
        }
    }
}

impl HeadingPhase {
    /// Synthesize the next heading sample and advance the phase.
    pub fn tick(&mut self, timestamp: i64) -> HeadingReading {
        let reading = HeadingReading::from_degrees(self.heading, timestamp);
        self.heading = (self.heading + HEADING_STEP) % 360.0;
        reading
    }
}
