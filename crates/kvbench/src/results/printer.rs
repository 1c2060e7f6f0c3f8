//! Stdout report printer.
//!
//! The metric line is a compatibility surface consumed by scripts; it is
//! printed exactly as formatted here, never colored. Only the phase header
//! gets styling.

use crate::results::PhaseReport;
use owo_colors::OwoColorize;

pub struct ReportPrinter {
    color: bool,
}

impl ReportPrinter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Print one phase header plus its metric line.
    pub fn print_phase(&self, store_name: &str, report: &PhaseReport) {
        let header = format!("===== benchmark {store_name} {} =====", report.phase);
        if self.color {
            println!("{}", header.cyan().bold());
        } else {
            println!("{header}");
        }
        println!("{}", metric_line(report));
    }
}

fn metric_line(report: &PhaseReport) -> String {
    format!(
        "time[{}s] total[{}] fail[{}] QPS[{}] cost_avg[{:.3}ms] cost_99[{:.3}ms] cost_95[{:.3}ms]",
        report.elapsed_secs,
        report.total_ops,
        report.failures,
        report.qps,
        report.avg_cost_ms,
        report.p99_ms,
        report.p95_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_line_format_is_stable() {
        let report = PhaseReport {
            phase: "read".to_owned(),
            elapsed_secs: 2,
            total_ops: 100,
            failures: 0,
            qps: 50,
            avg_cost_ms: 20.0,
            p99_ms: 31.5,
            p95_ms: 27.25,
        };
        assert_eq!(
            metric_line(&report),
            "time[2s] total[100] fail[0] QPS[50] cost_avg[20.000ms] cost_99[31.500ms] cost_95[27.250ms]"
        );
    }
}
