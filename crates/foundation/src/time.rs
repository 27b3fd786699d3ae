/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn as_millis(&self) -> f64 {
        self.0 * 1000.0
    }

    pub fn since(&self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn millis_round_trip_and_since_clamps() {
        let t = Time::from_millis(2000.0);
        assert_eq!(t, Time(2.0));
        assert_eq!(t.as_millis(), 2000.0);
        assert_eq!(Time(1.0).since(t), 0.0);
        assert_eq!(t.since(Time(0.5)), 1.5);
    }
}
