use crate::frame::Frame;

/// Coalesces bursts of scroll/resize notifications into at most one update
/// per animation frame.
///
/// The host calls [`FrameThrottle::request`] from every raw event and only
/// schedules a frame callback when it returns `true`; the callback then calls
/// [`FrameThrottle::on_frame`] and performs the actual update.
#[derive(Debug, Default)]
pub struct FrameThrottle {
    pending: bool,
    last_frame: Option<Frame>,
    coalesced: u64,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the caller must schedule a frame callback.
    pub fn request(&mut self) -> bool {
        if self.pending {
            self.coalesced += 1;
            return false;
        }
        self.pending = true;
        true
    }

    /// Marks the scheduled callback as running and returns its frame.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> Frame {
        self.pending = false;
        let frame = match self.last_frame {
            Some(prev) => prev.next(timestamp_ms),
            None => Frame::first(timestamp_ms),
        };
        self.last_frame = Some(frame);
        frame
    }

    /// Drops a request whose frame callback could not be scheduled, so the
    /// next raw event schedules again.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.last_frame
    }

    /// Number of requests absorbed by an already-scheduled frame.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}

#[cfg(test)]
mod tests {
    use super::FrameThrottle;

    #[test]
    fn burst_of_requests_schedules_one_frame() {
        let mut t = FrameThrottle::new();
        assert!(t.request());
        assert!(!t.request());
        assert!(!t.request());
        assert_eq!(t.coalesced(), 2);

        let f = t.on_frame(16.0);
        assert_eq!(f.index, 0);
        assert!(!t.is_pending());
        assert!(t.request());
    }

    #[test]
    fn frame_indices_advance_per_callback() {
        let mut t = FrameThrottle::new();
        t.request();
        t.on_frame(0.0);
        t.request();
        let f = t.on_frame(16.7);
        assert_eq!(f.index, 1);
        assert_eq!(t.last_frame(), Some(f));
    }

    #[test]
    fn cancelled_request_can_be_made_again() {
        let mut t = FrameThrottle::new();
        assert!(t.request());
        t.cancel();
        assert!(!t.is_pending());
        assert!(t.request());
        assert_eq!(t.coalesced(), 0);
        assert_eq!(t.last_frame(), None);
    }
}
