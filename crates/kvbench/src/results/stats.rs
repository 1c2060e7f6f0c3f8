//! Statistics computation for phase reports.
//!
//! The average cost is the wall-clock phase duration divided by the
//! operation count, not the mean of the individual samples. Percentiles use the nearest-rank method on the
//! ascending-sorted samples, zero-based, with no interpolation.

use crate::results::PhaseReport;
use std::time::Duration;

/// Nearest-rank percentile: `sorted[len * percent / 100]`.
///
/// `sorted` must be non-empty and ascending.
pub fn nearest_rank(sorted: &[f64], percent: usize) -> f64 {
    debug_assert!(!sorted.is_empty());
    let index = (sorted.len() * percent / 100).min(sorted.len() - 1);
    sorted[index]
}

/// Compute a phase report from raw phase totals.
///
/// A phase with no samples (empty worker ranges, or every worker aborted)
/// yields an all-zero report rather than dividing by zero.
pub fn compute(
    phase: &str,
    elapsed: Duration,
    success: u64,
    fail: u64,
    samples_ms: &[f64],
) -> PhaseReport {
    let total = success + fail;
    let elapsed_ms = elapsed.as_secs_f64() * 1e3;
    let elapsed_secs = elapsed.as_secs();

    if total == 0 || samples_ms.is_empty() {
        tracing::warn!(phase, "no operations completed; reporting zeros");
        return PhaseReport {
            phase: phase.to_owned(),
            elapsed_secs,
            total_ops: total,
            failures: fail,
            qps: 0,
            avg_cost_ms: 0.0,
            p99_ms: 0.0,
            p95_ms: 0.0,
        };
    }

    let avg_cost_ms = elapsed_ms / total as f64;
    let qps = if elapsed_ms > 0.0 {
        (total as f64 / (elapsed_ms / 1e3)) as u64
    } else {
        0
    };

    let mut sorted = samples_ms.to_vec();
    sorted.sort_by(f64::total_cmp);

    PhaseReport {
        phase: phase.to_owned(),
        elapsed_secs,
        total_ops: total,
        failures: fail,
        qps,
        avg_cost_ms,
        p99_ms: nearest_rank(&sorted, 99),
        p95_ms: nearest_rank(&sorted, 95),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_rank_on_one_to_hundred() {
        let samples: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(nearest_rank(&samples, 95), 96.0);
        assert_eq!(nearest_rank(&samples, 99), 100.0);
        assert_eq!(nearest_rank(&samples, 50), 51.0);
    }

    #[test]
    fn nearest_rank_single_sample() {
        assert_eq!(nearest_rank(&[7.5], 95), 7.5);
        assert_eq!(nearest_rank(&[7.5], 99), 7.5);
    }

    #[test]
    fn qps_and_avg_use_phase_duration() {
        let samples = vec![1.0; 100];
        let report = compute("read", Duration::from_millis(2000), 100, 0, &samples);
        assert_eq!(report.qps, 50);
        assert_eq!(report.avg_cost_ms, 20.0);
        assert_eq!(report.elapsed_secs, 2);
        assert_eq!(report.total_ops, 100);
    }

    #[test]
    fn avg_is_not_the_sample_mean() {
        // Samples average 1 ms but the phase took 1 s for 10 ops: the
        // reported average must be 100 ms.
        let samples = vec![1.0; 10];
        let report = compute("write", Duration::from_secs(1), 10, 0, &samples);
        assert_eq!(report.avg_cost_ms, 100.0);
    }

    #[test]
    fn failures_count_toward_totals() {
        let samples = vec![2.0; 10];
        let report = compute("read", Duration::from_millis(100), 7, 3, &samples);
        assert_eq!(report.total_ops, 10);
        assert_eq!(report.failures, 3);
        assert_eq!(report.qps, 100);
    }

    #[test]
    fn empty_phase_reports_zeros_without_panicking() {
        let report = compute("read", Duration::from_millis(5), 0, 0, &[]);
        assert_eq!(report.total_ops, 0);
        assert_eq!(report.qps, 0);
        assert_eq!(report.avg_cost_ms, 0.0);
        assert_eq!(report.p99_ms, 0.0);
    }

    #[test]
    fn percentiles_come_from_sorted_samples() {
        // Deliberately unsorted input.
        let samples = vec![9.0, 1.0, 5.0, 3.0, 7.0];
        let report = compute("read", Duration::from_millis(50), 5, 0, &samples);
        // len 5: index 5*95/100 = 4 and 5*99/100 = 4 -> max sample.
        assert_eq!(report.p95_ms, 9.0);
        assert_eq!(report.p99_ms, 9.0);
    }
}
