pub mod bucket;
pub mod classify;
pub mod histogram;
pub mod input;
pub mod render;
pub use histobar_common::{Config, HistobarError, OutOfRangePolicy, Result, Strategy, WidthMode};
pub use bucket::{compute_bucket_bounds, compute_bucket_width, compute_exact_bounds, BucketLayout};
pub use classify::{classify, classify_binary, classify_linear, Placement};
pub use histogram::{classify_all, classify_all_parallel, Bucketizer, Histogram};
pub use input::{read_session, SessionInput, TokenReader};
pub use render::{render, render_bar, render_diagnostics, render_dropped, render_header, write_lines};

/// Output lines for one collected session: diagnostics, optional drop summary,
/// then the histogram table.
pub fn histogram_report(input: &SessionInput, config: &Config) -> Result<(Histogram, Vec<String>)> {
    let bucketizer = Bucketizer::from_config(input.min, input.max, input.bucket_count, config)?;
    let hist = bucketizer.classify_all(&input.data)?;
    let mut lines = Vec::new();
    if config.display.show_bounds {
        lines.extend(render_diagnostics(&bucketizer.layout));
    }
    if config.bucketing.out_of_range == OutOfRangePolicy::Report {
        lines.push(render_dropped(&hist, &bucketizer.layout));
    }
    lines.extend(render(&hist.counts, config.display.marker));
    Ok((hist, lines))
}
