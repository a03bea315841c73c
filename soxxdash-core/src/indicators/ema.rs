//! Exponential Moving Average (EMA) over an arbitrary value series.
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1)
//! Seed: SMA of the first `span` defined values.
//! Leading NaN values are skipped, so an EMA can be stacked on another
//! indicator's output (MACD signal line).

/// Compute EMA values from a pre-extracted f64 slice.
///
/// Output has the input's length. A NaN after the seed taints every later
/// value; a NaN inside the seed window makes the whole output NaN.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if span == 0 {
        return result;
    }

    let start = match values.iter().position(|v| !v.is_nan()) {
        Some(start) => start,
        None => return result,
    };
    if n - start < span {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);

    let seed_window = &values[start..start + span];
    if seed_window.iter().any(|v| v.is_nan()) {
        return result;
    }
    let seed = seed_window.iter().sum::<f64>() / span as f64;
    let seed_index = start + span - 1;
    result[seed_index] = seed;

    let mut prev = seed;
    for i in (seed_index + 1)..n {
        if values[i].is_nan() {
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
