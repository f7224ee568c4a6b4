/*!
 * Report Rendering
 *
 * Text, JSON and comparison-table views of `RunReport`.
 */

use crate::pipeline::RunReport;
use std::fmt;
use std::time::Duration;

/// What the text report shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Results and execution time
    #[default]
    Full,
    /// Results only
    NoExecTimes,
    /// Execution time only
    OnlyExecTimes,
}

/// Human-readable view of one run
pub struct TextReport<'a> {
    report: &'a RunReport,
    mode: DisplayMode,
}

impl<'a> TextReport<'a> {
    pub fn new(report: &'a RunReport, mode: DisplayMode) -> Self {
        Self { report, mode }
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let totals = &report.totals;

        if self.mode != DisplayMode::OnlyExecTimes {
            writeln!(f, "Threads: {}", report.config.threads)?;
            writeln!(
                f,
                "Queue: {} ({}), aggregation: {}, mode: {}",
                report.config.queue,
                report.config.queue.discipline(),
                report.config.aggregation,
                report.config.mode
            )?;
            writeln!(f, "Primes: {}", totals.primes)?;
            writeln!(f, "Non-primes: {}", totals.nonprimes)?;
            match report.mean {
                Some(mean) => writeln!(f, "Mean: {:.4}", mean)?,
                None => writeln!(f, "Mean: n/a (no values consumed)")?,
            }
            writeln!(f, "Number counts by last digit:")?;
            for (digit, count) in totals.histogram.iter().enumerate() {
                writeln!(f, "  {}: {}", digit, count)?;
            }
        }
        if self.mode != DisplayMode::NoExecTimes {
            writeln!(f, "Execution time: {:.3} ms", millis(report.elapsed))?;
        }
        Ok(())
    }
}

/// Pretty-printed JSON view of one run
pub fn render_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Whether every report carries the same totals
pub fn aggregates_agree(reports: &[RunReport]) -> bool {
    reports
        .windows(2)
        .all(|pair| pair[0].totals == pair[1].totals && pair[0].produced == pair[1].produced)
}

/// Side-by-side timing of several runs over the same input
pub struct ComparisonTable<'a>(pub &'a [RunReport]);

impl fmt::Display for ComparisonTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:<10} {:<12} {:<10} {:>8} {:>10} {:>10} {:>7} {:>12}",
            "queue",
            "discipline",
            "aggregation",
            "mode",
            "threads",
            "primes",
            "nonprimes",
            "merges",
            "elapsed_ms"
        )?;
        for report in self.0 {
            writeln!(
                f,
                "{:<10} {:<10} {:<12} {:<10} {:>8} {:>10} {:>10} {:>7} {:>12.3}",
                report.config.queue.as_str(),
                report.config.queue.discipline().as_str(),
                report.config.aggregation.as_str(),
                report.config.mode.as_str(),
                report.config.threads,
                report.totals.primes,
                report.totals.nonprimes,
                report.merges,
                millis(report.elapsed)
            )?;
        }
        let verdict = if aggregates_agree(self.0) { "yes" } else { "NO" };
        writeln!(f, "Aggregates identical across runs: {}", verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::is_prime;
    use crate::pipeline::{Pipeline, PipelineConfig};
    use crate::source::IterSource;

    fn sample_report(values: Vec<i64>) -> RunReport {
        Pipeline::new(PipelineConfig::default().with_threads(4))
            .unwrap()
            .run(IterSource::from(values.into_iter()), is_prime)
            .unwrap()
    }

    #[test]
    fn test_full_text() {
        let report = sample_report((2..=11).collect());
        let text = TextReport::new(&report, DisplayMode::Full).to_string();

        assert!(text.contains("Threads: 4"));
        assert!(text.contains("Queue: spin (busy-wait), aggregation: atomic"));
        assert!(text.contains("Primes: 5"));
        assert!(text.contains("Non-primes: 5"));
        assert!(text.contains("Mean: 6.5000"));
        assert!(text.contains("  0: 1"));
        assert!(text.contains("  9: 1"));
        assert!(text.contains("Execution time:"));
    }

    #[test]
    fn test_display_modes() {
        let report = sample_report(vec![4, 6, 8]);

        let no_times = TextReport::new(&report, DisplayMode::NoExecTimes).to_string();
        assert!(no_times.contains("Primes: 0"));
        assert!(!no_times.contains("Execution time"));

        let only_times = TextReport::new(&report, DisplayMode::OnlyExecTimes).to_string();
        assert!(only_times.starts_with("Execution time:"));
        assert!(!only_times.contains("Primes"));
    }

    #[test]
    fn test_empty_mean() {
        let report = sample_report(Vec::new());
        let text = TextReport::new(&report, DisplayMode::NoExecTimes).to_string();
        assert!(text.contains("Mean: n/a"));
    }

    #[test]
    fn test_json() {
        let report = sample_report(vec![2, 3]);
        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(json["totals"]["primes"], 2);
        assert_eq!(json["mean"], 2.5);
        assert_eq!(json["workers"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_comparison_table() {
        let reports = vec![sample_report(vec![1, 2, 3]), sample_report(vec![1, 2, 3])];
        let table = ComparisonTable(&reports).to_string();
        assert_eq!(table.lines().count(), 4);
        assert!(table.lines().nth(1).unwrap().starts_with("spin       busy-wait"));
        assert!(table.ends_with("Aggregates identical across runs: yes\n"));

        let mismatched = vec![sample_report(vec![1]), sample_report(vec![2])];
        assert!(!aggregates_agree(&mismatched));
    }
}
