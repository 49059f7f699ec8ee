// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Watch lifecycle manager - owns at most one active subscription per signal
//! type and decides, per call, whether to pump a hardware stream or run the
//! synthetic generator. Starting a new watch of a type always releases the
//! previous session of that type first.

use std::sync::Arc;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;

use super::orientation::heading_from_quaternion;
use super::platform::{FieldEvent, OrientationEvent, Platform, SourceError};
use super::synthetic::{FieldPhase, HeadingPhase};
use super::types::{HeadingReading, MagneticReading, MonotonicMillis};

/// Continuation invoked once per emitted field reading.
pub type ReadingSink = Arc<dyn Fn(MagneticReading) + Send + Sync>;
/// Continuation invoked once per emitted heading.
pub type HeadingSink = Arc<dyn Fn(HeadingReading) + Send + Sync>;
/// Continuation invoked when an active hardware watch faults.
pub type FaultSink = Arc<dyn Fn(String) + Send + Sync>;

/// The two independent watch slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchKind {
    /// Magnetic-field readings
    Magnetic,
    /// Compass headings
    Heading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionKind {
    Hardware,
    Synthetic,
}

/// One live subscription: the cancel signal plus the pump task it controls.
/// Releasing sends the cancel and joins the pump, so no emission can follow.
struct WatchSession {
    kind: SessionKind,
    cancel: oneshot::Sender<()>,
    pump: JoinHandle<()>,
}

impl WatchSession {
    async fn release(self, watch: WatchKind) {
        let _ = self.cancel.send(());
        let _ = self.pump.await;
        debug!("released {:?} session for {:?} watch", self.kind, watch);
    }
}

/// Per-type watch state machine: `Idle -> Active(Hardware|Synthetic) -> Idle`.
pub struct WatchManager {
    config: Arc<Config>,
    platform: Arc<dyn Platform>,
    magnetic: Mutex<Option<WatchSession>>,
    heading: Mutex<Option<WatchSession>>,
}

impl WatchManager {
    /// Bind a manager to a platform; both slots start idle.
    pub fn new(config: Arc<Config>, platform: Arc<dyn Platform>) -> Self {
        Self {
            config,
            platform,
            magnetic: Mutex::new(None),
            heading: Mutex::new(None),
        }
    }

    /// Start (or replace) the magnetic-field watch. Emits to `on_reading`
    /// until the matching stop; hardware faults go to `on_fault`.
    pub async fn watch_readings(
        &self,
        on_reading: ReadingSink,
        on_fault: FaultSink,
        frequency_ms: Option<u64>,
    ) {
        let frequency_ms = self.effective_frequency(frequency_ms);
        let mut slot = self.magnetic.lock().await;
        if let Some(previous) = slot.take() {
            info!("replacing active magnetic watch");
            previous.release(WatchKind::Magnetic).await;
        }

        let session =
            match self.open_hardware_field(frequency_ms, Arc::clone(&on_reading), on_fault) {
                Ok(session) => {
                    info!("magnetic watch bound to hardware sensor at {frequency_ms}ms");
                    session
                }
                Err(e) => {
                    info!("magnetic watch using synthetic generator at {frequency_ms}ms: {e}");
                    Self::spawn_synthetic_field(frequency_ms, on_reading)
                }
            };
        *slot = Some(session);
    }

    /// Stop the magnetic-field watch. Idempotent: a stop with no active
    /// session is a no-op success.
    pub async fn stop_watch(&self) {
        let mut slot = self.magnetic.lock().await;
        match slot.take() {
            Some(session) => {
                session.release(WatchKind::Magnetic).await;
                info!("magnetic watch stopped");
            }
            None => debug!("stop requested with no active magnetic watch"),
        }
    }

    /// Start (or replace) the heading watch. `filter_degrees` is accepted on
    /// the call surface but has no effect on emission cadence or content.
    pub async fn watch_heading(
        &self,
        on_heading: HeadingSink,
        on_fault: FaultSink,
        frequency_ms: Option<u64>,
        filter_degrees: Option<f64>,
    ) {
        if let Some(filter) = filter_degrees {
            debug!("heading filter of {filter}° accepted but not applied");
        }

        let frequency_ms = self.effective_frequency(frequency_ms);
        let mut slot = self.heading.lock().await;
        if let Some(previous) = slot.take() {
            info!("replacing active heading watch");
            previous.release(WatchKind::Heading).await;
        }

        let session =
            match self.open_hardware_heading(frequency_ms, Arc::clone(&on_heading), on_fault) {
                Ok(session) => {
                    info!("heading watch bound to orientation sensor at {frequency_ms}ms");
                    session
                }
                Err(e) => {
                    info!("heading watch using synthetic generator at {frequency_ms}ms: {e}");
                    Self::spawn_synthetic_heading(frequency_ms, on_heading)
                }
            };
        *slot = Some(session);
    }

    /// Stop the heading watch. Idempotent like [`WatchManager::stop_watch`].
    pub async fn stop_watch_heading(&self) {
        let mut slot = self.heading.lock().await;
        match slot.take() {
            Some(session) => {
                session.release(WatchKind::Heading).await;
                info!("heading watch stopped");
            }
            None => debug!("stop requested with no active heading watch"),
        }
    }

    /// Whether a session of the given kind is currently active.
    pub async fn is_active(&self, kind: WatchKind) -> bool {
        match kind {
            WatchKind::Magnetic => self.magnetic.lock().await.is_some(),
            WatchKind::Heading => self.heading.lock().await.is_some(),
        }
    }

    fn effective_frequency(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(frequency) if frequency > 0 => frequency,
            _ => self.config.default_frequency_ms,
        }
    }

    fn open_hardware_field(
        &self,
        frequency_ms: u64,
        on_reading: ReadingSink,
        on_fault: FaultSink,
    ) -> Result<WatchSession, SourceError> {
        if !self.platform.has_field_sensor() {
            return Err(SourceError::CapabilityMissing);
        }
        let mut stream = self
            .platform
            .open_field_stream(1000.0 / frequency_ms as f64)?;

        let (cancel, mut cancelled) = oneshot::channel();
        let pump = tokio::spawn(async move {
            let mut clock = MonotonicMillis::default();
            loop {
                tokio::select! {
                    _ = &mut cancelled => {
                        stream.stop();
                        break;
                    }
                    event = stream.next() => match event {
                        Some(FieldEvent::Sample { x, y, z }) => {
                            on_reading(MagneticReading::from_axes(x, y, z, clock.next()));
                        }
                        Some(FieldEvent::Fault(message)) => {
                            warn!("magnetic watch hardware fault: {message}");
                            on_fault(message);
                        }
                        None => {
                            stream.stop();
                            break;
                        }
                    }
                }
            }
        });

        Ok(WatchSession {
            kind: SessionKind::Hardware,
            cancel,
            pump,
        })
    }

    fn open_hardware_heading(
        &self,
        frequency_ms: u64,
        on_heading: HeadingSink,
        on_fault: FaultSink,
    ) -> Result<WatchSession, SourceError> {
        if !self.platform.has_orientation_sensor() {
            return Err(SourceError::CapabilityMissing);
        }
        let mut stream = self
            .platform
            .open_orientation_stream(1000.0 / frequency_ms as f64)?;

        let (cancel, mut cancelled) = oneshot::channel();
        let pump = tokio::spawn(async move {
            let mut clock = MonotonicMillis::default();
            loop {
                tokio::select! {
                    _ = &mut cancelled => {
                        stream.stop();
                        break;
                    }
                    event = stream.next() => match event {
                        Some(OrientationEvent::Quaternion(q)) => {
                            on_heading(HeadingReading::from_degrees(
                                heading_from_quaternion(&q),
                                clock.next(),
                            ));
                        }
                        Some(OrientationEvent::Fault(message)) => {
                            warn!("heading watch hardware fault: {message}");
                            on_fault(message);
                        }
                        None => {
                            stream.stop();
                            break;
                        }
                    }
                }
            }
        });

        Ok(WatchSession {
            kind: SessionKind::Hardware,
            cancel,
            pump,
        })
    }

    fn spawn_synthetic_field(frequency_ms: u64, on_reading: ReadingSink) -> WatchSession {
        let (cancel, mut cancelled) = oneshot::channel();
        let period = Duration::from_millis(frequency_ms);
        let pump = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            let mut phase = FieldPhase::default();
            let mut clock = MonotonicMillis::default();
            loop {
                tokio::select! {
                    _ = &mut cancelled => break,
                    _ = ticker.tick() => on_reading(phase.tick(clock.next())),
                }
            }
        });

        WatchSession {
            kind: SessionKind::Synthetic,
            cancel,
            pump,
        }
    }

    fn spawn_synthetic_heading(frequency_ms: u64, on_heading: HeadingSink) -> WatchSession {
        let (cancel, mut cancelled) = oneshot::channel();
        let period = Duration::from_millis(frequency_ms);
        let pump = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            let mut phase = HeadingPhase::default();
            let mut clock = MonotonicMillis::default();
            loop {
                tokio::select! {
                    _ = &mut cancelled => break,
                    _ = ticker.tick() => on_heading(phase.tick(clock.next())),
                }
            }
        });

        WatchSession {
            kind: SessionKind::Synthetic,
            cancel,
            pump,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::super::platform::testutil::ScriptedPlatform;
    use super::super::platform::NullPlatform;
    use super::*;

    fn manager(platform: Arc<dyn Platform>) -> WatchManager {
        WatchManager::new(Arc::new(Config::default()), platform)
    }

    fn reading_sink() -> (ReadingSink, Arc<StdMutex<Vec<MagneticReading>>>) {
        let collected = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&collected);
        (
            Arc::new(move |r| sink.lock().unwrap().push(r)),
            collected,
        )
    }

    fn heading_sink() -> (HeadingSink, Arc<StdMutex<Vec<HeadingReading>>>) {
        let collected = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&collected);
        (
            Arc::new(move |h| sink.lock().unwrap().push(h)),
            collected,
        )
    }

    fn fault_sink() -> (FaultSink, Arc<StdMutex<Vec<String>>>) {
        let collected = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&collected);
        (
            Arc::new(move |m| sink.lock().unwrap().push(m)),
            collected,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_synthetic_field_watch_emits_deterministic_sequence() {
        let manager = manager(Arc::new(NullPlatform));
        let (on_reading, readings) = reading_sink();
        let (on_fault, faults) = fault_sink();

        manager.watch_readings(on_reading, on_fault, Some(50)).await;
        assert!(manager.is_active(WatchKind::Magnetic).await);

        tokio::time::sleep(Duration::from_millis(175)).await;
        manager.stop_watch().await;

        let emitted = readings.lock().unwrap().clone();
        assert_eq!(emitted.len(), 3);

        let mut expected = FieldPhase::default();
        for (i, reading) in emitted.iter().enumerate() {
            let want = expected.tick(reading.timestamp);
            assert_eq!(reading, &want, "emission {i} diverged");
        }
        assert!(faults.lock().unwrap().is_empty());

        // No emission may follow a completed stop.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(readings.lock().unwrap().len(), 3);
        assert!(!manager.is_active(WatchKind::Magnetic).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_or_absent_frequency_uses_default() {
        let manager = manager(Arc::new(NullPlatform));
        let (on_reading, readings) = reading_sink();
        let (on_fault, _) = fault_sink();

        manager.watch_readings(on_reading, on_fault, Some(0)).await;
        tokio::time::sleep(Duration::from_millis(250)).await;
        manager.stop_watch().await;

        // Default cadence is 100ms: ticks at 100 and 200.
        assert_eq!(readings.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_watch_replaces_previous_session() {
        let manager = manager(Arc::new(NullPlatform));
        let (first_reading, first) = reading_sink();
        let (second_reading, second) = reading_sink();
        let (on_fault, _) = fault_sink();

        manager
            .watch_readings(first_reading, Arc::clone(&on_fault), Some(50))
            .await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        let first_count = first.lock().unwrap().len();
        assert_eq!(first_count, 2);

        manager
            .watch_readings(second_reading, on_fault, Some(50))
            .await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        manager.stop_watch().await;

        // Only the replacement emits after the second start.
        assert_eq!(first.lock().unwrap().len(), first_count);
        assert_eq!(second.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_watch_is_idempotent() {
        let manager = manager(Arc::new(NullPlatform));
        manager.stop_watch().await;
        manager.stop_watch().await;
        manager.stop_watch_heading().await;
        assert!(!manager.is_active(WatchKind::Magnetic).await);
        assert!(!manager.is_active(WatchKind::Heading).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_synthetic_heading_sequence_wraps() {
        let manager = manager(Arc::new(NullPlatform));
        let (on_heading, headings) = heading_sink();
        let (on_fault, _) = fault_sink();

        manager
            .watch_heading(on_heading, on_fault, Some(10), Some(5.0))
            .await;
        tokio::time::sleep(Duration::from_millis(1855)).await;
        manager.stop_watch_heading().await;

        let emitted = headings.lock().unwrap().clone();
        assert_eq!(emitted.len(), 185);
        assert_eq!(emitted[0].magnetic_heading, 180.0);
        assert_eq!(emitted[1].magnetic_heading, 181.0);
        assert_eq!(emitted[179].magnetic_heading, 359.0);
        assert_eq!(emitted[180].magnetic_heading, 0.0);
        assert_eq!(emitted[184].magnetic_heading, 4.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hardware_watch_pumps_and_surfaces_faults() {
        let platform = Arc::new(ScriptedPlatform::with_field(vec![
            FieldEvent::Sample {
                x: 1.0,
                y: 2.0,
                z: 2.0,
            },
            FieldEvent::Fault("transient glitch".to_string()),
            FieldEvent::Sample {
                x: 3.0,
                y: 4.0,
                z: 0.0,
            },
        ]));
        let manager = manager(Arc::clone(&platform) as Arc<dyn Platform>);
        let (on_reading, readings) = reading_sink();
        let (on_fault, faults) = fault_sink();

        manager.watch_readings(on_reading, on_fault, Some(100)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        {
            let emitted = readings.lock().unwrap();
            assert_eq!(emitted.len(), 2);
            assert!((emitted[0].magnitude - 3.0).abs() < 1e-6);
            assert!((emitted[1].magnitude - 5.0).abs() < 1e-6);
            assert!(emitted[1].timestamp > emitted[0].timestamp);
        }
        assert_eq!(
            faults.lock().unwrap().as_slice(),
            &["transient glitch".to_string()]
        );

        // A fault does not tear the session down.
        assert!(manager.is_active(WatchKind::Magnetic).await);

        manager.stop_watch().await;
        assert_eq!(platform.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hardware_heading_watch_converts_quaternions() {
        let frac = std::f64::consts::FRAC_1_SQRT_2;
        let platform = Arc::new(ScriptedPlatform::with_orientation(vec![
            OrientationEvent::Quaternion([0.0, 0.0, 0.0, 1.0]),
            OrientationEvent::Quaternion([0.0, 0.0, frac, frac]),
        ]));
        let manager = manager(Arc::clone(&platform) as Arc<dyn Platform>);
        let (on_heading, headings) = heading_sink();
        let (on_fault, _) = fault_sink();

        manager
            .watch_heading(on_heading, on_fault, Some(100), None)
            .await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        manager.stop_watch_heading().await;

        let emitted = headings.lock().unwrap().clone();
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[0].magnetic_heading, 0.0);
        assert!((emitted[1].magnetic_heading - 90.0).abs() < 1e-9);
        assert_eq!(platform.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_requests_rate_from_cadence() {
        let platform = Arc::new(ScriptedPlatform::with_field(vec![]));
        let manager = manager(Arc::clone(&platform) as Arc<dyn Platform>);
        let (on_reading, _) = reading_sink();
        let (on_fault, _) = fault_sink();

        manager.watch_readings(on_reading, on_fault, Some(200)).await;
        manager.stop_watch().await;

        // 200ms cadence -> 5Hz sampling.
        assert_eq!(platform.rates.lock().unwrap().as_slice(), &[5.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_magnetic_and_heading_watches_are_independent() {
        let manager = manager(Arc::new(NullPlatform));
        let (on_reading, readings) = reading_sink();
        let (on_heading, headings) = heading_sink();
        let (on_fault, _) = fault_sink();

        manager
            .watch_readings(on_reading, Arc::clone(&on_fault), Some(50))
            .await;
        manager
            .watch_heading(on_heading, on_fault, Some(50), None)
            .await;
        tokio::time::sleep(Duration::from_millis(120)).await;

        manager.stop_watch().await;
        assert!(manager.is_active(WatchKind::Heading).await);
        tokio::time::sleep(Duration::from_millis(100)).await;
        manager.stop_watch_heading().await;

        // The heading watch kept ticking after the magnetic stop.
        assert_eq!(readings.lock().unwrap().len(), 2);
        assert!(headings.lock().unwrap().len() > 2);
    }
}
