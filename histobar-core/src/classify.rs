use histobar_common::Strategy;
use serde::{Deserialize, Serialize};

/// Where a single measurement lands relative to the bucket layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Bucket(usize),
    /// below `min` (NaN is treated as below)
    Below,
    /// at or above the last upper bound
    Above,
}

impl Placement {
    pub fn index(self) -> Option<usize> {
        match self {
            Placement::Bucket(i) => Some(i),
            _ => None,
        }
    }
}

fn below_min(value: f64, min: i64) -> bool {
    value.is_nan() || value < min as f64
}

/// Smallest `i` with `min <= value < bounds[i]`.
pub fn classify_linear(value: f64, bounds: &[f64], min: i64) -> Placement {
    if below_min(value, min) {
        return Placement::Below;
    }
    for (i, &upper) in bounds.iter().enumerate() {
        if value < upper {
            return Placement::Bucket(i);
        }
    }
    Placement::Above
}

/// Binary search over the predicate `bounds[i] <= value`, which holds for a
/// prefix of the (non-decreasing) bounds. The partition point is the first
/// bound strictly greater than `value`, i.e. the same bucket the linear scan
/// picks; running off the end means the value is past the last bound.
pub fn classify_binary(value: f64, bounds: &[f64], min: i64) -> Placement {
    if below_min(value, min) {
        return Placement::Below;
    }
    let idx = bounds.partition_point(|&upper| upper <= value);
    if idx == bounds.len() {
        Placement::Above
    } else {
        Placement::Bucket(idx)
    }
}

pub fn classify(value: f64, bounds: &[f64], min: i64, strategy: Strategy) -> Placement {
    let placement = match strategy {
        Strategy::Linear => classify_linear(value, bounds, min),
        Strategy::Binary => classify_binary(value, bounds, min),
    };
    log::trace!("value={value} -> {placement:?}");
    placement
}
