use foundation::time::Time;

/// Animation-frame metadata.
///
/// `time` is the timestamp handed to the frame callback, so two frames built
/// from the same inputs compare equal and traces can be replayed in tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Timestamp of the frame callback.
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, time: Time) -> Self {
        Self { index, time }
    }

    pub fn first(timestamp_ms: f64) -> Self {
        Self::new(0, Time::from_millis(timestamp_ms))
    }

    pub fn next(self, timestamp_ms: f64) -> Self {
        Self::new(self.index + 1, Time::from_millis(timestamp_ms))
    }

    /// Seconds elapsed since `earlier`, never negative.
    pub fn dt_since(&self, earlier: Frame) -> f64 {
        self.time.since(earlier.time)
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn frames_from_same_timestamp_are_equal() {
        assert_eq!(Frame::first(16.0), Frame::first(16.0));
        assert_eq!(Frame::first(500.0).time, Time(0.5));
    }

    #[test]
    fn next_advances_index_and_takes_new_timestamp() {
        let f0 = Frame::first(1000.0);
        let f1 = f0.next(1016.0);
        assert_eq!(f1.index, 1);
        assert!((f1.dt_since(f0) - 0.016).abs() < 1e-12);
        assert_eq!(f0.dt_since(f1), 0.0);
    }
}
