use foundation::time::Time;

/// Per-frame timing handed to frame handlers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Real elapsed time since the previous frame (seconds, never negative).
    pub dt_s: f64,
    /// Accumulated session time at this frame (seconds).
    pub time: Time,
}

/// Turns host display timestamps into [`Frame`]s.
///
/// The first tick has `dt_s == 0`. Timestamps that go backwards (or are not
/// finite) produce a zero delta, so accumulated time is monotonic.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last_timestamp_s: Option<f64>,
    next_index: u64,
    time: Time,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, timestamp_s: f64) -> Frame {
        let dt_s = match self.last_timestamp_s {
            Some(last) if timestamp_s.is_finite() => (timestamp_s - last).max(0.0),
            _ => 0.0,
        };
        if timestamp_s.is_finite() {
            // Keep the high-water mark so a backwards jump can't be replayed.
            self.last_timestamp_s = Some(match self.last_timestamp_s {
                Some(last) => last.max(timestamp_s),
                None => timestamp_s,
            });
        }

        self.time = self.time.advanced(dt_s);
        let frame = Frame {
            index: self.next_index,
            dt_s,
            time: self.time,
        };
        self.next_index = self.next_index.wrapping_add(1);
        frame
    }

    /// Forgets the previous timestamp; the next tick has a zero delta.
    ///
    /// Used when a stopped loop is restarted so the pause is not counted as
    /// elapsed time.
    pub fn resync(&mut self) {
        self.last_timestamp_s = None;
    }

    pub fn time(&self) -> Time {
        self.time
    }
}
