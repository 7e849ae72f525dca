use crate::bucket::BucketLayout;
use crate::histogram::Histogram;
use std::io::Write;

pub const DEFAULT_MARKER: char = '*';
const ROW_PADDING: usize = 14;

pub fn render_header() -> String {
    format!("{}{:>17}", "Bucket#", "Histogram")
}

pub fn render_bar(count: u64, marker: char) -> String {
    let n = usize::try_from(count).unwrap_or(usize::MAX);
    std::iter::repeat(marker).take(n).collect()
}

pub fn render_row(index: usize, count: u64, marker: char) -> String {
    format!("{index}{:w$}{}", "", render_bar(count, marker), w = ROW_PADDING)
}

/// Header followed by one row per bucket, in index order.
pub fn render(counts: &[u64], marker: char) -> Vec<String> {
    let mut lines = Vec::with_capacity(counts.len() + 1);
    lines.push(render_header());
    lines.extend(counts.iter().enumerate().map(|(i, &c)| render_row(i, c, marker)));
    lines
}

pub fn render_diagnostics(layout: &BucketLayout) -> Vec<String> {
    let mut lines = Vec::with_capacity(layout.bounds.len() + 1);
    lines.push(format!("The bucket width is: {}", layout.width));
    for (i, bound) in layout.bounds.iter().enumerate() {
        lines.push(format!("The bucket_max for bucket {i} is {bound}: "));
    }
    lines
}

pub fn render_dropped(hist: &Histogram, layout: &BucketLayout) -> String {
    format!(
        "Out of range: {} below {}, {} at or above {}",
        hist.below,
        layout.min,
        hist.above,
        layout.upper_edge()
    )
}

pub fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
