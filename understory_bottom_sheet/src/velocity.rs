// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-dimensional pointer velocity estimation.
//!
//! [`VelocityTracker`] keeps a small ring of timestamped positions and estimates
//! velocity with the impulse strategy: each pair of consecutive samples contributes
//! kinetic energy, and the final energy is converted back into a velocity. Only
//! samples within [`HORIZON_MS`] of the newest one are considered, and a gap longer
//! than [`ASSUME_STOPPED_MS`] between samples ends the window.
//!
//! ```
//! use understory_bottom_sheet::VelocityTracker;
//!
//! let mut tracker = VelocityTracker::new();
//! for i in 0..5_u32 {
//!     tracker.add(u64::from(i) * 10, f64::from(i) * 20.0);
//! }
//! // 20 px every 10 ms is 2000 px/s.
//! assert!((tracker.velocity() - 2000.0).abs() < 1.0);
//! ```

/// Number of samples retained.
const HISTORY_SIZE: usize = 20;

/// Samples older than this (relative to the newest) are ignored.
pub const HORIZON_MS: u64 = 100;

/// A gap longer than this between samples means the pointer had stopped.
pub const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Sample {
    time_ms: u64,
    position: f64,
}

/// Velocity estimator over absolute positions, reported in units per second.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    newest: usize,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            newest: 0,
        }
    }

    /// Records a position at the given timestamp.
    pub fn add(&mut self, time_ms: u64, position: f64) {
        self.newest = (self.newest + 1) % HISTORY_SIZE;
        self.samples[self.newest] = Some(Sample { time_ms, position });
    }

    /// Discards every recorded sample.
    pub fn clear(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.newest = 0;
    }

    /// Returns `true` when no samples are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples[self.newest].is_none()
    }

    /// Estimated velocity in units per second (positive toward increasing positions).
    ///
    /// Returns `0` with fewer than two usable samples.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let Some(newest) = self.samples[self.newest] else {
            return 0.0;
        };

        // Collected newest first: (age in ms as negative time, position).
        let mut window = [(0.0_f64, 0.0_f64); HISTORY_SIZE];
        let mut count = 0;
        let mut index = self.newest;
        let mut previous = newest;
        while let Some(sample) = self.samples[index] {
            if sample.time_ms > previous.time_ms {
                // Timestamps went backwards; the ring wrapped into stale data.
                break;
            }
            let age = newest.time_ms - sample.time_ms;
            let gap = previous.time_ms - sample.time_ms;
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            window[count] = (-(age as f64), sample.position);
            count += 1;
            if count == HISTORY_SIZE {
                break;
            }
            previous = sample;
            index = if index == 0 { HISTORY_SIZE - 1 } else { index - 1 };
        }

        impulse_velocity(&window[..count]) * 1000.0
    }

    /// Estimated velocity clamped to `[-max, max]`; `0` for a non-positive `max`.
    #[must_use]
    pub fn velocity_with_max(&self, max: f64) -> f64 {
        if !max.is_finite() || max <= 0.0 {
            return 0.0;
        }
        let velocity = self.velocity();
        if velocity.is_nan() {
            0.0
        } else {
            velocity.clamp(-max, max)
        }
    }
}

/// Velocity per millisecond from newest-first `(time, position)` pairs.
fn impulse_velocity(window: &[(f64, f64)]) -> f64 {
    if window.len() < 2 {
        return 0.0;
    }
    let oldest = window.len() - 1;
    let mut work = 0.0;
    for i in (1..=oldest).rev() {
        let (t_older, p_older) = window[i];
        let (t_newer, p_newer) = window[i - 1];
        if t_older == t_newer {
            continue;
        }
        let v_curr = (p_newer - p_older) / (t_newer - t_older);
        let v_prev = energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == oldest {
            work *= 0.5;
        }
    }
    energy_to_velocity(work)
}

/// `E = v^2 / 2` with unit mass, keeping the sign of the energy.
fn energy_to_velocity(energy: f64) -> f64 {
    energy.signum() * libm::sqrt(2.0 * energy.abs())
}
