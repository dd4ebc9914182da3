//! Match clock - глобальный countdown матча

/// Оставшееся время матча
///
/// Инвариант: remaining ≥ 0. Expiry event срабатывает ровно один раз.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchClock {
    remaining: f32,
    expired: bool,
}

impl MatchClock {
    pub fn new(seconds: f32) -> Self {
        let remaining = seconds.max(0.0);
        Self {
            remaining,
            expired: false,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Вычитает `dt`, floor на 0.
    ///
    /// Возвращает `true` только на том тике, когда часы впервые дошли до 0.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.expired {
            return false;
        }

        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.expired = true;
            return true;
        }
        false
    }

    pub fn format(&self) -> String {
        format_time(self.remaining)
    }
}

/// `MM:SS` с ведущими нулями; дробные секунды отбрасываются (не округляются)
pub fn format_time(seconds: f32) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u32;
    let secs = (seconds % 60.0).floor() as u32;
    format!("{:02}:{:02}", minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_truncates_fraction() {
        assert_eq!(format_time(65.9), "01:05");
        assert_eq!(format_time(59.999), "00:59");
        assert_eq!(format_time(240.0), "04:00");
        assert_eq!(format_time(0.0), "00:00");
    }

    #[test]
    fn test_format_negative_clamps_to_zero() {
        assert_eq!(format_time(-3.0), "00:00");
    }

    #[test]
    fn test_tick_never_goes_negative() {
        let mut clock = MatchClock::new(1.0);
        for _ in 0..10 {
            clock.tick(0.3);
            assert!(clock.remaining() >= 0.0);
        }
        assert_eq!(clock.remaining(), 0.0);
    }

    #[test]
    fn test_expiry_fires_once() {
        let mut clock = MatchClock::new(0.5);
        assert!(!clock.tick(0.25));
        assert!(clock.tick(0.5));

        // Повторные тики не дают второго события
        assert!(!clock.tick(0.25));
        assert!(!clock.tick(10.0));
        assert_eq!(clock.remaining(), 0.0);
    }

    #[test]
    fn test_expiry_on_exact_zero() {
        let mut clock = MatchClock::new(1.0);
        assert!(clock.tick(1.0));
        assert_eq!(clock.format(), "00:00");
    }
}
