//! Time management utilities

/// Frame clock driven by externally supplied timestamps
///
/// The display/refresh driver owns real time; the clock only turns the
/// timestamps it is handed into clamped per-tick deltas, which keeps the
/// simulation reproducible in tests.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.25)
    }
}

impl FrameClock {
    /// Create a new clock that never reports a delta above `max_delta` seconds
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_timestamp: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta: max_delta.max(0.0),
        }
    }
    
    /// Advance to `timestamp` (seconds) and return the elapsed time since the previous frame
    ///
    /// The first call establishes the time base and yields zero. Timestamps
    /// that go backwards also yield zero rather than a negative delta.
    pub fn advance(&mut self, timestamp: f64) -> f32 {
        let delta = match self.last_timestamp {
            Some(last) => ((timestamp - last).max(0.0) as f32).min(self.max_delta),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp);
        self.delta_time = delta;
        self.total_time += f64::from(delta);
        self.frame_count += 1;
        delta
    }
    
    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }
    
    /// Get the total simulated time
    pub fn total_time(&self) -> f64 {
        self.total_time
    }
    
    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
    
    /// Get the current FPS (based on last frame time)
    pub fn current_fps(&self) -> f32 {
        if self.delta_time > 0.0 {
            1.0 / self.delta_time
        } else {
            0.0
        }
    }

    /// Forget the time base so the next frame yields zero again
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        self.delta_time = 0.0;
    }
}
