use super::types::{ResultSet, Summary};

pub fn summarize(results: &ResultSet, initial_investment: f64) -> Summary {
    if results.is_empty() {
        return Summary::default();
    }

    let mut values = results.final_values.clone();
    let count = values.len();
    let losses = values.iter().filter(|v| **v < initial_investment).count();
    let mean = values.iter().sum::<f64>() / count as f64;

    // percentile sorts in place, so min/max are read afterwards.
    let median = percentile(&mut values, 50.0);
    let p10 = percentile(&mut values, 10.0);
    let p90 = percentile(&mut values, 90.0);

    Summary {
        count,
        median,
        p10,
        p90,
        mean,
        min: values[0],
        max: values[count - 1],
        probability_of_loss: losses as f64 / count as f64,
    }
}

/// Linear interpolation between closest ranks. Sorts `values` in place.
pub fn percentile(values: &mut [f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.sort_by(|a, b| a.total_cmp(b));

    let n = values.len();
    if n == 1 {
        return values[0];
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (n as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        values[lower]
    } else {
        let w = rank - lower as f64;
        values[lower] * (1.0 - w) + values[upper] * w
    }
}
