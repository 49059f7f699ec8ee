// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Sensing module - platform seam, signal adapter, watch lifecycle and
//! deterministic simulation

mod adapter;
mod orientation;
mod platform;
mod synthetic;
mod types;
mod watch;

pub use adapter::SignalAdapter;
pub use orientation::heading_from_quaternion;
pub use platform::{
    FieldEvent, FieldStream, NullPlatform, OrientationEvent, OrientationStream, Platform,
    SourceError,
};
pub use synthetic::{FieldPhase, HeadingPhase};
pub use types::{
    AccuracyLevel, HeadingReading, MagneticReading, MonotonicMillis, SensorInfo,
    ACCURACY_UNKNOWN, MOCK_FIELD_MAGNITUDE, MOCK_FIELD_X, MOCK_FIELD_Y, MOCK_FIELD_Z,
    MOCK_HEADING,
};
pub use watch::{FaultSink, HeadingSink, ReadingSink, WatchKind, WatchManager};
