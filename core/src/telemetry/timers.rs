//! telemetry/timers.rs
//! Wall time per stage of a write or read pass.
//!
//! A write records `Validate`, `Linearize` and `Encode`; a read records
//! `Validate`, `Decode` and `Replay`. A stage that never ran stays `None`,
//! which is distinct from one that ran in under a nanosecond.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Linearize,
    Encode,
    Decode,
    Replay,
    Validate,
}

impl Stage {
    /// Stages a write pass charges time to.
    pub const WRITE: [Stage; 3] = [Stage::Validate, Stage::Linearize, Stage::Encode];
    /// Stages a read pass charges time to.
    pub const READ: [Stage; 3] = [Stage::Validate, Stage::Decode, Stage::Replay];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Linearize => "linearize",
            Stage::Encode    => "encode",
            Stage::Decode    => "decode",
            Stage::Replay    => "replay",
            Stage::Validate  => "validate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated time per stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    pub linearize: Option<Duration>,
    pub encode: Option<Duration>,
    pub decode: Option<Duration>,
    pub replay: Option<Duration>,
    pub validate: Option<Duration>,
}

impl StageTimes {
    fn slot(&self, stage: Stage) -> &Option<Duration> {
        match stage {
            Stage::Linearize => &self.linearize,
            Stage::Encode    => &self.encode,
            Stage::Decode    => &self.decode,
            Stage::Replay    => &self.replay,
            Stage::Validate  => &self.validate,
        }
    }

    fn slot_mut(&mut self, stage: Stage) -> &mut Option<Duration> {
        match stage {
            Stage::Linearize => &mut self.linearize,
            Stage::Encode    => &mut self.encode,
            Stage::Decode    => &mut self.decode,
            Stage::Replay    => &mut self.replay,
            Stage::Validate  => &mut self.validate,
        }
    }

    /// Charge `dur` to `stage`. Repeated calls accumulate.
    pub fn add(&mut self, stage: Stage, dur: Duration) {
        let slot = self.slot_mut(stage);
        *slot = Some(slot.unwrap_or(Duration::ZERO) + dur);
    }

    /// Time charged to `stage`, zero if it never ran.
    pub fn get(&self, stage: Stage) -> Duration {
        self.slot(stage).unwrap_or(Duration::ZERO)
    }

    pub fn get_ms(&self, stage: Stage) -> f64 {
        self.get(stage).as_secs_f64() * 1_000.0
    }

    pub fn recorded(&self, stage: Stage) -> bool {
        self.slot(stage).is_some()
    }

    pub fn has_all(&self, expected: &[Stage]) -> bool {
        expected.iter().all(|s| self.recorded(*s))
    }

    pub fn total(&self) -> Duration {
        [self.linearize, self.encode, self.decode, self.replay, self.validate]
            .into_iter()
            .flatten()
            .sum()
    }
}

/// Clock for one pass. `finish` freezes the elapsed time.
#[derive(Clone, Debug)]
pub struct TelemetryTimer {
    started: Instant,
    finished: Option<Duration>,
    pub stage_times: StageTimes,
}

impl Default for TelemetryTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryTimer {
    pub fn new() -> Self {
        Self { started: Instant::now(), finished: None, stage_times: StageTimes::default() }
    }

    pub fn finish(&mut self) {
        self.finished = Some(self.started.elapsed());
    }

    pub fn add_stage_time(&mut self, stage: Stage, dur: Duration) {
        self.stage_times.add(stage, dur);
    }

    /// Run `f` and charge its wall time to `stage`.
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.add_stage_time(stage, start.elapsed());
        out
    }

    pub fn elapsed(&self) -> Duration {
        self.finished.unwrap_or_else(|| self.started.elapsed())
    }
}
