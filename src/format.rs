//! Countdown text and color helpers

/// Color category for a countdown value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayColor {
    Red,
    Yellow,
    Green,
}

/// Format seconds as `M:SS`, minutes unpadded
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Red at zero, yellow at or below the warning threshold, green otherwise
pub fn color_for(seconds: u32, warning_time: u32) -> DisplayColor {
    if seconds == 0 {
        DisplayColor::Red
    } else if seconds <= warning_time {
        DisplayColor::Yellow
    } else {
        DisplayColor::Green
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> u32 {
        let (minutes, seconds) = text.split_once(':').unwrap();
        assert_eq!(seconds.len(), 2);
        minutes.parse::<u32>().unwrap() * 60 + seconds.parse::<u32>().unwrap()
    }

    #[test]
    fn test_format_time_examples() {
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(5), "0:05");
        assert_eq!(format_time(600), "10:00");
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(3599), "59:59");
        assert_eq!(format_time(7200), "120:00");
    }

    #[test]
    fn test_format_time_parses_back() {
        for seconds in (0..=4000).chain([86_399, 1_000_000]) {
            assert_eq!(parse(&format_time(seconds)), seconds);
        }
    }

    #[test]
    fn test_color_red_at_zero() {
        for warning in [0, 1, 10, 300] {
            assert_eq!(color_for(0, warning), DisplayColor::Red);
        }
    }

    #[test]
    fn test_color_yellow_within_warning() {
        assert_eq!(color_for(1, 10), DisplayColor::Yellow);
        assert_eq!(color_for(10, 10), DisplayColor::Yellow);
        assert_eq!(color_for(11, 10), DisplayColor::Green);
        assert_eq!(color_for(1, 0), DisplayColor::Green);
    }

    #[test]
    fn test_color_matches_threshold_rule() {
        for warning in 0..20 {
            for seconds in 1..40 {
                let expected = if seconds <= warning {
                    DisplayColor::Yellow
                } else {
                    DisplayColor::Green
                };
                assert_eq!(color_for(seconds, warning), expected);
            }
        }
    }
}
