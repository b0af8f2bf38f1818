use crate::core::{Histogram, Summary};

/// `$` plus the value with thousands separators and two decimals.
/// Negative values keep the sign after the symbol: `$-1,234.50`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }

    let fixed = format!("{value:.2}");
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${sign}{grouped}.{fraction}")
}

pub fn summary_lines(summary: &Summary) -> [String; 3] {
    [
        format!(
            "Median Final Portfolio Value: {}",
            format_currency(summary.median)
        ),
        format!(
            "10th Percentile (worst case): {}",
            format_currency(summary.p10)
        ),
        format!(
            "90th Percentile (best case): {}",
            format_currency(summary.p90)
        ),
    ]
}

/// Horizontal bar chart, one row per bin, bars scaled to `width` columns.
pub fn render_histogram(hist: &Histogram, width: usize) -> String {
    let peak = hist.bins.iter().map(|b| b.count).max().unwrap_or(0);
    let mut out = String::new();

    for (idx, bin) in hist.bins.iter().enumerate() {
        let bar_len = if peak == 0 {
            0
        } else {
            (bin.count * width).div_ceil(peak)
        };
        let marker = if hist.median_bin == Some(idx) {
            "  <- median"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:>18} | {:<width$} {}{}\n",
            format_currency(bin.lower),
            "#".repeat(bar_len),
            bin.count,
            marker,
        ));
    }

    if let Some(idx) = hist.median_bin {
        out.push_str(&format!(
            "median {} falls in bin {} of {}\n",
            format_currency(hist.median),
            idx + 1,
            hist.bins.len()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HistogramBin, build_histogram};

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1_210.0), "$1,210.00");
        assert_eq!(format_currency(76_122.5), "$76,122.50");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(100_000.0), "$100,000.00");
    }

    #[test]
    fn currency_keeps_sign_after_symbol() {
        assert_eq!(format_currency(-1_234.5), "$-1,234.50");
        assert_eq!(format_currency(-12.0), "$-12.00");
    }

    #[test]
    fn summary_lines_use_report_labels() {
        let summary = Summary {
            count: 3,
            median: 1_210.0,
            p10: 1_000.0,
            p90: 25_000.126,
            ..Summary::default()
        };
        let lines = summary_lines(&summary);
        assert_eq!(lines[0], "Median Final Portfolio Value: $1,210.00");
        assert_eq!(lines[1], "10th Percentile (worst case): $1,000.00");
        assert_eq!(lines[2], "90th Percentile (best case): $25,000.13");
    }

    #[test]
    fn histogram_rows_flag_median_bin() {
        let hist = build_histogram(&[0.0, 1.0, 2.0, 3.0, 4.0, 10.0], 5);
        let text = render_histogram(&hist, 10);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 6);
        assert!(rows[1].ends_with("2  <- median"));
        assert!(rows[0].contains("##########"));
        assert!(rows[5].starts_with("median $2.50 falls in bin 2 of 5"));
    }

    #[test]
    fn empty_histogram_renders_nothing() {
        let hist = Histogram {
            bins: vec![HistogramBin {
                lower: 0.0,
                upper: 1.0,
                count: 0,
            }],
            median: 0.0,
            median_bin: None,
        };
        assert_eq!(render_histogram(&hist, 20).lines().count(), 1);
        assert!(render_histogram(&Histogram::default(), 20).is_empty());
    }
}
