// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Command surface - the named operations the invoking layer ferries across
//! its opaque request/response channel. Payloads travel as JSON values; every
//! non-watch operation resolves exactly once.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::engine::MagnetometerEngine;
use crate::sensing::{FaultSink, HeadingSink, ReadingSink};

/// Success continuation. Watch operations re-invoke it once per emission;
/// everything else calls it exactly once.
pub type SuccessFn = Arc<dyn Fn(Value) + Send + Sync>;
/// Error continuation, invoked with a human-readable message.
pub type ErrorFn = Arc<dyn Fn(String) + Send + Sync>;

/// A parsed invocation of the command surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `isAvailable` -> `1`/`0`
    IsAvailable,
    /// `getReading` -> magnetic reading payload
    GetReading,
    /// `getHeading` -> heading payload
    GetHeading,
    /// `watchReadings(frequencyMillis)` -> repeated reading payloads
    WatchReadings {
        /// Emission cadence in milliseconds; engine default when absent/zero
        frequency_ms: Option<u64>,
    },
    /// `stopWatch` -> null, idempotent
    StopWatch,
    /// `watchHeading(frequencyMillis, filterDegrees)` -> repeated headings
    WatchHeading {
        /// Emission cadence in milliseconds; engine default when absent/zero
        frequency_ms: Option<u64>,
        /// Accepted for forward compatibility; has no effect
        filter_degrees: Option<f64>,
    },
    /// `stopWatchHeading` -> null, idempotent
    StopWatchHeading,
    /// `getMagnetometerInfo` -> composite snapshot payload
    GetMagnetometerInfo,
    /// `getAccuracy` -> `3`
    GetAccuracy,
    /// `isCalibrationNeeded` -> `0`
    IsCalibrationNeeded,
    /// `getFieldStrength` -> rounded magnitude
    GetFieldStrength,
}

impl Command {
    /// Parse an operation name plus positional JSON arguments. Returns `None`
    /// for operations this surface does not expose.
    pub fn parse(name: &str, args: &[Value]) -> Option<Self> {
        match name {
            "isAvailable" => Some(Command::IsAvailable),
            "getReading" => Some(Command::GetReading),
            "getHeading" => Some(Command::GetHeading),
            "watchReadings" => Some(Command::WatchReadings {
                frequency_ms: args.first().and_then(Value::as_u64),
            }),
            "stopWatch" => Some(Command::StopWatch),
            "watchHeading" => Some(Command::WatchHeading {
                frequency_ms: args.first().and_then(Value::as_u64),
                filter_degrees: args.get(1).and_then(Value::as_f64),
            }),
            "stopWatchHeading" => Some(Command::StopWatchHeading),
            "getMagnetometerInfo" => Some(Command::GetMagnetometerInfo),
            "getAccuracy" => Some(Command::GetAccuracy),
            "isCalibrationNeeded" => Some(Command::IsCalibrationNeeded),
            "getFieldStrength" => Some(Command::GetFieldStrength),
            _ => None,
        }
    }
}

/// Dispatches parsed commands into the engine and routes results back through
/// the caller's continuations.
pub struct MagnetometerBridge {
    engine: Arc<MagnetometerEngine>,
}

impl MagnetometerBridge {
    /// Wrap an engine for command dispatch.
    pub fn new(engine: Arc<MagnetometerEngine>) -> Self {
        Self { engine }
    }

    /// Invoke a named operation. Unknown names go to the error continuation;
    /// watch operations re-invoke `success` per emission, everything else
    /// resolves exactly once.
    pub async fn invoke(&self, name: &str, args: &[Value], success: SuccessFn, error: ErrorFn) {
        let Some(command) = Command::parse(name, args) else {
            error(format!("unknown command: {name}"));
            return;
        };
        debug!("dispatching {command:?}");
        self.dispatch(command, success, error).await;
    }

    /// Dispatch an already-parsed command.
    pub async fn dispatch(&self, command: Command, success: SuccessFn, error: ErrorFn) {
        match command {
            Command::IsAvailable => {
                success(json!(if self.engine.is_available() { 1 } else { 0 }));
            }
            Command::GetReading => {
                success(payload(&self.engine.reading().await));
            }
            Command::GetHeading => {
                success(payload(&self.engine.heading().await));
            }
            Command::WatchReadings { frequency_ms } => {
                let on_reading: ReadingSink = Arc::new(move |reading| success(payload(&reading)));
                let on_fault: FaultSink = Arc::new(move |message| error(message));
                self.engine
                    .watch_readings(on_reading, on_fault, frequency_ms)
                    .await;
            }
            Command::StopWatch => {
                self.engine.stop_watch().await;
                success(Value::Null);
            }
            Command::WatchHeading {
                frequency_ms,
                filter_degrees,
            } => {
                let on_heading: HeadingSink = Arc::new(move |heading| success(payload(&heading)));
                let on_fault: FaultSink = Arc::new(move |message| error(message));
                self.engine
                    .watch_heading(on_heading, on_fault, frequency_ms, filter_degrees)
                    .await;
            }
            Command::StopWatchHeading => {
                self.engine.stop_watch_heading().await;
                success(Value::Null);
            }
            Command::GetMagnetometerInfo => {
                success(payload(&self.engine.info().await));
            }
            Command::GetAccuracy => {
                success(json!(self.engine.accuracy().level()));
            }
            Command::IsCalibrationNeeded => {
                success(json!(if self.engine.calibration_needed() { 1 } else { 0 }));
            }
            Command::GetFieldStrength => {
                success(json!(self.engine.field_strength().await));
            }
        }
    }
}

fn payload<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
