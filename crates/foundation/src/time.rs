/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    /// Advances by `dt_s`; negative or non-finite deltas are ignored so the
    /// timeline never runs backwards.
    pub fn advanced(self, dt_s: f64) -> Self {
        if dt_s.is_finite() && dt_s > 0.0 {
            Time(self.0 + dt_s)
        } else {
            self
        }
    }

    pub fn seconds(self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn advance_is_monotonic() {
        let t = Time::ZERO.advanced(0.5).advanced(-1.0).advanced(f64::NAN);
        assert_eq!(t, Time(0.5));
        assert_eq!(t.advanced(0.25).seconds(), 0.75);
    }
}
