use super::stats::percentile;
use super::types::{Histogram, HistogramBin};

pub const DEFAULT_BINS: usize = 50;

/// Equal-width bins spanning the observed range. The last bin is closed on
/// both ends, so every finite value lands in exactly one bin.
pub fn build_histogram(values: &[f64], bins: usize) -> Histogram {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Histogram::default();
    }

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in &finite {
        out[bin_index(*v, lo, width, bins)].count += 1;
    }

    let mut sorted = finite;
    let median = percentile(&mut sorted, 50.0);

    Histogram {
        median_bin: Some(bin_index(median, lo, width, bins)),
        median,
        bins: out,
    }
}

fn bin_index(value: f64, lo: f64, width: f64, bins: usize) -> usize {
    let idx = ((value - lo) / width).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(bins - 1)
    }
}
