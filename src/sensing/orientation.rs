// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/lodestone-rs

//! Quaternion math helpers

/// Extract the compass heading (yaw) from an orientation quaternion in
/// `[x, y, z, w]` scalar-last convention.
///
/// Pitch and roll are discarded; only the rotation about the vertical axis
/// survives. Returns degrees in `[0, 360)`. Quaternions with fewer than four
/// components yield `0.0` rather than an error.
pub fn heading_from_quaternion(q: &[f64]) -> f64 {
    if q.len() < 4 {
        return 0.0;
    }

    let (x, y, z, w) = (q[0], q[1], q[2], q[3]);

    let siny_cosp = 2.0 * (w * z + x * y);
    let cosy_cosp = 1.0 - 2.0 * (y * y + z * z);
    let yaw = siny_cosp.atan2(cosy_cosp);

    yaw.to_degrees().rem_euclid(360.0)
}
