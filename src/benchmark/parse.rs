//! Parsers for external command output

use std::sync::LazyLock;

use regex::Regex;

/// A decimal or scientific number, optionally followed by `%`
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?%?").expect("valid number regex")
});

/// `real 10.40` (POSIX `time -p`) or `real 0m10.400s` (bash keyword)
static REAL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*real\s+(?:(\d+)m)?(\d+(?:[.,]\d+)?)s?\s*$").expect("valid time regex")
});

/// Extract the quality metric from evaluator stdout.
///
/// The metric is the last number on the last non-empty line, so both
/// `0.1234` and `MAPE: 12.34%` are accepted. A trailing `%` is dropped,
/// not divided out.
///
/// The evaluator must print the metric last on that line: anything numeric
/// after it wins, so `MAPE: 12.3 (5 folds)` reads as `5` and `fold 1-5`
/// as `-5`.
pub fn parse_quality_metric(stdout: &str) -> Option<f64> {
    let line = stdout.lines().rev().find(|l| !l.trim().is_empty())?;
    let token = NUMBER.find_iter(line).last()?.as_str();
    let value: f64 = token.trim_end_matches('%').parse().ok()?;
    value.is_finite().then_some(value)
}

/// Extract elapsed real seconds from the stderr of a `time` wrapper.
///
/// The last `real` line wins, since the wrapped program may print its own
/// lines before the timer's summary.
pub fn parse_time_report(stderr: &str) -> Option<f64> {
    let caps = stderr.lines().rev().find_map(|line| REAL_LINE.captures(line))?;

    let minutes: f64 = match caps.get(1) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };
    let seconds: f64 = caps.get(2)?.as_str().replace(',', ".").parse().ok()?;

    Some(minutes * 60.0 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_metric() {
        assert_eq!(parse_quality_metric("0.1234\n"), Some(0.1234));
        assert_eq!(parse_quality_metric("  7  "), Some(7.0));
        assert_eq!(parse_quality_metric("1.5e-2"), Some(0.015));
    }

    #[test]
    fn test_labelled_metric_on_last_line() {
        let stdout = "loading data\nscoring 5 folds\nMAPE: 12.34%\n\n";
        assert_eq!(parse_quality_metric(stdout), Some(12.34));
    }

    #[test]
    fn test_trailing_number_wins() {
        assert_eq!(parse_quality_metric("MAPE: 12.3 (5 folds)"), Some(5.0));
        assert_eq!(parse_quality_metric("fold 1-5"), Some(-5.0));
    }

    #[test]
    fn test_unparseable_metric() {
        assert_eq!(parse_quality_metric(""), None);
        assert_eq!(parse_quality_metric("\n  \n"), None);
        assert_eq!(parse_quality_metric("score: nan"), None);
        assert_eq!(parse_quality_metric("done"), None);
    }

    #[test]
    fn test_posix_time_report() {
        let stderr = "training...\nreal 10.40\nuser 9.80\nsys 0.31\n";
        assert_eq!(parse_time_report(stderr), Some(10.40));
    }

    #[test]
    fn test_bash_time_report() {
        let stderr = "\nreal\t1m2.500s\nuser\t0m59.100s\nsys\t0m1.000s\n";
        assert_eq!(parse_time_report(stderr), Some(62.5));
    }

    #[test]
    fn test_comma_decimal_time_report() {
        assert_eq!(parse_time_report("real 3,25\n"), Some(3.25));
    }

    #[test]
    fn test_last_real_line_wins() {
        let stderr = "real 1.00\nreal 2.00\n";
        assert_eq!(parse_time_report(stderr), Some(2.0));
    }

    #[test]
    fn test_missing_time_report() {
        assert_eq!(parse_time_report("user 1.0\nsys 0.1\n"), None);
        assert_eq!(parse_time_report("really 1.0"), None);
    }
}
