// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Magnetometer engine - composes the signal adapter and the watch manager
//! behind one handle

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::sensing::{
    AccuracyLevel, FaultSink, HeadingReading, HeadingSink, MagneticReading, Platform, ReadingSink,
    SensorInfo, SignalAdapter, WatchKind, WatchManager,
};

/// Top-level engine handle. One instance owns both watch slots; every query
/// goes through the same platform seam.
pub struct MagnetometerEngine {
    config: Arc<Config>,
    adapter: SignalAdapter,
    watches: WatchManager,
}

impl MagnetometerEngine {
    /// Build an engine over the given platform.
    pub fn new(config: Config, platform: Arc<dyn Platform>) -> Self {
        let config = Arc::new(config);
        info!("magnetometer engine starting (platform tag: {})", config.platform);
        Self {
            adapter: SignalAdapter::new(Arc::clone(&config), Arc::clone(&platform)),
            watches: WatchManager::new(Arc::clone(&config), platform),
            config,
        }
    }

    /// Whether any recognized sensor capability is exposed.
    pub fn is_available(&self) -> bool {
        self.adapter.probe_availability()
    }

    /// One magnetic-field reading, mock-or-real. Never fails.
    pub async fn reading(&self) -> MagneticReading {
        self.adapter.acquire_single_reading().await
    }

    /// One compass heading, mock-or-real. Never fails.
    pub async fn heading(&self) -> HeadingReading {
        self.adapter.acquire_single_heading().await
    }

    /// Rounded field magnitude of a single sample.
    pub async fn field_strength(&self) -> i64 {
        self.adapter.acquire_field_strength().await
    }

    /// Point-in-time composite of availability, a current reading and
    /// heading, and the fixed accuracy/calibration values.
    pub async fn info(&self) -> SensorInfo {
        SensorInfo {
            is_available: self.is_available(),
            reading: self.reading().await,
            heading: self.heading().await,
            accuracy: self.accuracy().level(),
            calibration_needed: self.calibration_needed(),
            platform: self.config.platform.clone(),
        }
    }

    /// Reported accuracy. No real accuracy model exists in this environment;
    /// the level is a fixed constant.
    pub fn accuracy(&self) -> AccuracyLevel {
        AccuracyLevel::High
    }

    /// Whether calibration is needed. Fixed constant, same caveat as
    /// [`MagnetometerEngine::accuracy`].
    pub fn calibration_needed(&self) -> bool {
        false
    }

    /// Start (or replace) the magnetic-field watch.
    pub async fn watch_readings(
        &self,
        on_reading: ReadingSink,
        on_fault: FaultSink,
        frequency_ms: Option<u64>,
    ) {
        self.watches
            .watch_readings(on_reading, on_fault, frequency_ms)
            .await;
    }

    /// Stop the magnetic-field watch (idempotent).
    pub async fn stop_watch(&self) {
        self.watches.stop_watch().await;
    }

    /// Start (or replace) the heading watch. `filter_degrees` is accepted
    /// but not applied.
    pub async fn watch_heading(
        &self,
        on_heading: HeadingSink,
        on_fault: FaultSink,
        frequency_ms: Option<u64>,
        filter_degrees: Option<f64>,
    ) {
        self.watches
            .watch_heading(on_heading, on_fault, frequency_ms, filter_degrees)
            .await;
    }

    /// Stop the heading watch (idempotent).
    pub async fn stop_watch_heading(&self) {
        self.watches.stop_watch_heading().await;
    }

    /// Whether a watch of the given kind is active.
    pub async fn is_watching(&self, kind: WatchKind) -> bool {
        self.watches.is_active(kind).await
    }
}
