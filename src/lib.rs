// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Lodestone - Magnetometer and Compass Sensing Engine
//!
//! Exposes magnetic-field and compass-heading data to an application,
//! abstracting over whether a real sensor is present:
//! - One-shot readings and continuous watches at a configurable cadence
//! - Quaternion-to-heading conversion for orientation-sensor platforms
//! - At most one active watch per signal type, with replace/stop semantics
//! - Deterministic simulated signal whenever hardware is absent or faults
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Lodestone Engine                    │
//! ├─────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌───────────────┐   ┌────────────┐  │
//! │  │ Command  │ → │ Magnetometer  │ → │   Watch    │  │
//! │  │ Bridge   │   │ Engine        │   │  Manager   │  │
//! │  └──────────┘   └───────────────┘   └────────────┘  │
//! │        ↓               ↓                  ↓         │
//! │  ┌─────────────────────────────────────────────┐    │
//! │  │       Signal Adapter / Platform Seam        │    │
//! │  └─────────────────────────────────────────────┘    │
//! │        ↓                                  ↓         │
//! │  ┌──────────────┐              ┌────────────────┐   │
//! │  │ Hardware     │              │ Deterministic  │   │
//! │  │ Streams      │              │ Simulation     │   │
//! │  └──────────────┘              └────────────────┘   │
//! └─────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod bridge;
pub mod config;
pub mod engine;
pub mod sensing;

// Re-exports for convenience
pub use bridge::{Command, ErrorFn, MagnetometerBridge, SuccessFn};
pub use config::Config;
pub use engine::MagnetometerEngine;
pub use sensing::{
    heading_from_quaternion, AccuracyLevel, FieldEvent, FieldStream, HeadingReading, NullPlatform,
    OrientationEvent, OrientationStream, MagneticReading, Platform, SensorInfo, SourceError,
    WatchKind,
};

/// Lodestone version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lodestone name
pub const NAME: &str = "Lodestone";
