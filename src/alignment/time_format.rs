use std::fmt;

/// A line start split into the fields of a synchronized-lyrics tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub minutes: u64,
    pub seconds: u8,
    pub milliseconds: u16,
}

impl Timestamp {
    /// Splits an offset in seconds. The total is rounded to the nearest
    /// millisecond first so a fraction like .9996 carries into the next second
    /// instead of producing a 1000 ms field.
    ///
    /// # Panics
    ///
    /// Panics on negative or non-finite input; upstream components never
    /// produce either.
    pub fn from_seconds(seconds: f64) -> Self {
        assert!(
            seconds.is_finite() && seconds >= 0.0,
            "timestamp seconds must be finite and non-negative, got {seconds}"
        );
        let total_ms = (seconds * 1000.0).round() as u64;
        Self {
            minutes: total_ms / 60_000,
            seconds: ((total_ms / 1000) % 60) as u8,
            milliseconds: (total_ms % 1000) as u16,
        }
    }

    pub fn as_seconds(&self) -> f64 {
        (self.minutes * 60) as f64 + self.seconds as f64 + self.milliseconds as f64 / 1000.0
    }

    /// Hundredths of a second, truncated.
    pub fn centiseconds(&self) -> u8 {
        (self.milliseconds / 10) as u8
    }

    pub fn minutes_field(&self) -> String {
        format!("{:02}", self.minutes)
    }

    pub fn seconds_field(&self) -> String {
        format!("{:02}", self.seconds)
    }

    pub fn milliseconds_field(&self) -> String {
        format!("{:03}", self.milliseconds)
    }

    pub fn centiseconds_field(&self) -> String {
        format!("{:02}", self.centiseconds())
    }
}

/// LRC tag form: `[mm:ss.xx]`.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:02}:{:02}.{:02}]",
            self.minutes,
            self.seconds,
            self.centiseconds()
        )
    }
}
