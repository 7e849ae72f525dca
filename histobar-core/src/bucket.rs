use histobar_common::{HistobarError, Result, WidthMode};
use serde::{Deserialize, Serialize};

/// Largest bucket count accepted; bounds and counts are allocated per bucket.
pub const MAX_BUCKET_COUNT: i64 = 1 << 24;

/// Integer bucket width. Rust's `/` on `i64` truncates toward zero, so the
/// remainder of an uneven span is discarded.
pub fn compute_bucket_width(min: i64, max: i64, count: i64) -> Result<i64> {
    if count <= 0 {
        return Err(HistobarError::InvalidBucketCount(count));
    }
    if count > MAX_BUCKET_COUNT {
        return Err(HistobarError::TooManyBuckets { count, limit: MAX_BUCKET_COUNT });
    }
    if max <= min {
        return Err(HistobarError::InvalidRange { min, max });
    }
    let span = max
        .checked_sub(min)
        .ok_or(HistobarError::InvalidRange { min, max })?;
    Ok(span / count)
}

/// Upper bound of bucket `i` is `min + width * (i + 1)`, computed in `i64`.
/// The result is exact; only the final `f64` conversion rounds, for bounds
/// beyond 2^53 in magnitude. A bound that overflows `i64` saturates.
pub fn compute_bucket_bounds(min: i64, width: i64, count: usize) -> Vec<f64> {
    (1..=count)
        .map(|i| {
            i64::try_from(i)
                .ok()
                .and_then(|i| width.checked_mul(i))
                .and_then(|step| min.checked_add(step))
                .unwrap_or(if width < 0 { i64::MIN } else { i64::MAX }) as f64
        })
        .collect()
}

/// Bounds for [`WidthMode::Exact`]; the last one is `max` itself.
pub fn compute_exact_bounds(min: i64, max: i64, count: usize) -> Vec<f64> {
    let span = max as f64 - min as f64;
    (1..=count)
        .map(|i| {
            if i == count {
                max as f64
            } else {
                min as f64 + span * i as f64 / count as f64
            }
        })
        .collect()
}

/// Validated range plus the derived width and upper bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketLayout {
    pub min: i64,
    pub max: i64,
    pub width: f64,
    pub bounds: Vec<f64>,
}

impl BucketLayout {
    pub fn new(min: i64, max: i64, count: i64, mode: WidthMode) -> Result<Self> {
        // validation is shared with the exact mode so both reject the same inputs
        let int_width = compute_bucket_width(min, max, count)?;
        let n = count as usize;
        let (width, bounds) = match mode {
            WidthMode::Truncated => (int_width as f64, compute_bucket_bounds(min, int_width, n)),
            WidthMode::Exact => (
                (max as f64 - min as f64) / count as f64,
                compute_exact_bounds(min, max, n),
            ),
        };
        log::debug!("layout min={min} max={max} count={count} width={width} mode={mode:?}");
        Ok(Self { min, max, width, bounds })
    }

    pub fn bucket_count(&self) -> usize {
        self.bounds.len()
    }

    /// Exclusive upper edge of the bucketed domain.
    pub fn upper_edge(&self) -> f64 {
        self.bounds.last().copied().unwrap_or(self.min as f64)
    }
}
