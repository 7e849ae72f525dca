use crate::bucket::BucketLayout;
use crate::classify::{classify, Placement};
use histobar_common::{Config, HistobarError, Result, Strategy};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const PARALLEL_CHUNK: usize = 8192;

/// Per-bucket counts plus the values that fell outside every bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    pub counts: Vec<u64>,
    pub below: u64,
    pub above: u64,
}

impl Histogram {
    pub fn new(bucket_count: usize) -> Self {
        Self { counts: vec![0; bucket_count], below: 0, above: 0 }
    }

    pub fn increment(&mut self, index: usize) -> Result<()> {
        let bucket_count = self.counts.len();
        let slot = self
            .counts
            .get_mut(index)
            .ok_or(HistobarError::OutOfRangeBucket { index, bucket_count })?;
        *slot += 1;
        Ok(())
    }

    pub fn record(&mut self, placement: Placement) -> Result<()> {
        match placement {
            Placement::Bucket(i) => self.increment(i)?,
            Placement::Below => self.below += 1,
            Placement::Above => self.above += 1,
        }
        Ok(())
    }

    pub fn dropped(&self) -> u64 {
        self.below + self.above
    }

    pub fn bucketed(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Every value recorded, bucketed or dropped.
    pub fn total(&self) -> u64 {
        self.bucketed() + self.dropped()
    }

    pub fn merge(mut self, other: Histogram) -> Result<Self> {
        if other.counts.len() != self.counts.len() {
            return Err(HistobarError::OutOfRangeBucket {
                index: other.counts.len().saturating_sub(1),
                bucket_count: self.counts.len(),
            });
        }
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
        self.below += other.below;
        self.above += other.above;
        Ok(self)
    }
}

pub fn classify_all(data: &[f64], layout: &BucketLayout, strategy: Strategy) -> Result<Histogram> {
    let mut hist = Histogram::new(layout.bucket_count());
    for &v in data {
        hist.record(classify(v, &layout.bounds, layout.min, strategy))?;
    }
    Ok(hist)
}

/// Same result as [`classify_all`]; each chunk fills its own histogram and the
/// partials are summed.
pub fn classify_all_parallel(data: &[f64], layout: &BucketLayout, strategy: Strategy) -> Result<Histogram> {
    let n = layout.bucket_count();
    data.par_chunks(PARALLEL_CHUNK)
        .map(|chunk| classify_all(chunk, layout, strategy))
        .try_reduce(|| Histogram::new(n), |a, b| a.merge(b))
}

/// Layout plus the lookup settings for one run.
#[derive(Debug, Clone)]
pub struct Bucketizer {
    pub layout: BucketLayout,
    pub strategy: Strategy,
    /// classify in parallel once the data set reaches this size
    pub parallel_threshold: Option<usize>,
}

impl Bucketizer {
    pub fn new(layout: BucketLayout, strategy: Strategy) -> Self {
        Self { layout, strategy, parallel_threshold: None }
    }

    pub fn from_config(min: i64, max: i64, bucket_count: i64, config: &Config) -> Result<Self> {
        let layout = BucketLayout::new(min, max, bucket_count, config.bucketing.width_mode)?;
        let mut b = Self::new(layout, config.bucketing.strategy);
        if config.parallel.enabled {
            b.parallel_threshold = Some(config.parallel.threshold);
        }
        Ok(b)
    }

    pub fn classify(&self, value: f64) -> Placement {
        classify(value, &self.layout.bounds, self.layout.min, self.strategy)
    }

    pub fn classify_all(&self, data: &[f64]) -> Result<Histogram> {
        let hist = match self.parallel_threshold {
            Some(t) if data.len() >= t => classify_all_parallel(data, &self.layout, self.strategy)?,
            _ => classify_all(data, &self.layout, self.strategy)?,
        };
        log::debug!(
            "classified {} values: {} bucketed, {} below, {} above",
            data.len(),
            hist.bucketed(),
            hist.below,
            hist.above
        );
        Ok(hist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use histobar_common::WidthMode;

    fn layout(min: i64, max: i64, count: i64) -> BucketLayout {
        BucketLayout::new(min, max, count, WidthMode::Truncated).unwrap()
    }

    #[test]
    fn increment_rejects_missing_bucket() {
        let mut h = Histogram::new(3);
        h.increment(2).unwrap();
        let err = h.increment(3).unwrap_err();
        assert!(matches!(err, HistobarError::OutOfRangeBucket { index: 3, bucket_count: 3 }));
        assert_eq!(h.counts, vec![0, 0, 1]);
    }

    #[test]
    fn four_bucket_scenario() {
        let l = layout(0, 20, 4);
        for s in [Strategy::Linear, Strategy::Binary] {
            let h = classify_all(&[1.0, 4.0, 6.0, 11.0, 19.0, 20.0], &l, s).unwrap();
            assert_eq!(h.counts, vec![2, 1, 1, 1]);
            assert_eq!(h.above, 1);
            assert_eq!(h.below, 0);
        }
    }

    #[test]
    fn truncation_gap_drops_top_values() {
        let l = layout(0, 10, 3);
        let h = classify_all(&[0.0, 2.9, 3.0, 8.9, 9.0, 9.5, 10.0], &l, Strategy::Linear).unwrap();
        assert_eq!(h.counts, vec![2, 1, 1]);
        assert_eq!(h.above, 3);
    }

    #[test]
    fn conservation() {
        let l = layout(-5, 5, 4);
        let data = [-7.0, -5.0, -2.5, 0.0, 0.1, 4.0, 5.0, 11.0, f64::NAN];
        let h = classify_all(&data, &l, Strategy::Binary).unwrap();
        assert_eq!(h.total(), data.len() as u64);
        assert_eq!(h.bucketed() + h.dropped(), data.len() as u64);
    }

    #[test]
    fn idempotent() {
        let l = layout(0, 100, 7);
        let data: Vec<f64> = (0..500).map(|i| (i as f64 * 0.37) % 110.0 - 3.0).collect();
        let a = classify_all(&data, &l, Strategy::Binary).unwrap();
        let b = classify_all(&data, &l, Strategy::Binary).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parallel_matches_sequential() {
        let l = layout(0, 1000, 33);
        let data: Vec<f64> = (0..50_000).map(|i| ((i * 7919) % 1100) as f64 - 20.5).collect();
        let seq = classify_all(&data, &l, Strategy::Linear).unwrap();
        let par = classify_all_parallel(&data, &l, Strategy::Binary).unwrap();
        assert_eq!(seq, par);
        assert_eq!(par.total(), data.len() as u64);
    }

    #[test]
    fn parallel_on_empty_data() {
        let l = layout(0, 10, 2);
        let h = classify_all_parallel(&[], &l, Strategy::Binary).unwrap();
        assert_eq!(h, Histogram::new(2));
    }

    #[test]
    fn merge_rejects_mismatched_lengths() {
        assert!(Histogram::new(2).merge(Histogram::new(3)).is_err());
    }

    #[test]
    fn bucketizer_uses_threshold() {
        let mut cfg = Config::default();
        cfg.parallel.enabled = true;
        cfg.parallel.threshold = 4;
        let b = Bucketizer::from_config(0, 20, 4, &cfg).unwrap();
        assert_eq!(b.parallel_threshold, Some(4));
        let h = b.classify_all(&[1.0, 4.0, 6.0, 11.0, 19.0, 20.0]).unwrap();
        assert_eq!(h.counts, vec![2, 1, 1, 1]);
        assert_eq!(b.classify(5.0), Placement::Bucket(1));
    }
}
