use services::TimeRemaining;

#[must_use]
pub fn timer_banner(remaining: TimeRemaining) -> String {
    if remaining.is_low() {
        format!("⏳ Time Remaining: {remaining}  ⚠ hurry up!")
    } else {
        format!("⏳ Time Remaining: {remaining}")
    }
}

/// Whether a tick is worth printing: the first one, every whole minute, the
/// switch into low time, and the last ten seconds.
#[must_use]
pub fn should_announce(previous: Option<TimeRemaining>, current: TimeRemaining) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    current.secs() % 60 == 0
        || (current.is_low() && !previous.is_low())
        || current.secs() <= 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_flags_low_time() {
        assert_eq!(
            timer_banner(TimeRemaining::from_secs(10_800)),
            "⏳ Time Remaining: 180:00"
        );
        assert_eq!(
            timer_banner(TimeRemaining::from_secs(299)),
            "⏳ Time Remaining: 4:59  ⚠ hurry up!"
        );
    }

    #[test]
    fn announces_first_tick_minutes_and_low_time() {
        let t = TimeRemaining::from_secs;
        assert!(should_announce(None, t(3_599)));
        assert!(!should_announce(Some(t(3_599)), t(3_598)));
        assert!(should_announce(Some(t(3_601)), t(3_600)));
        assert!(should_announce(Some(t(301)), t(300)));
        assert!(!should_announce(Some(t(300)), t(299)));
        assert!(should_announce(Some(t(11)), t(10)));
    }
}
