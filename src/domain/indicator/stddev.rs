//! Rolling population standard deviation.
//!
//! STDDEV(n)[i] = sqrt(sum((P[i-j] - SMA(n)[i])^2 for j in 0..n) / n)
//! Warmup: first (n-1) values are `None`.

/// Returns `(mean, stddev)` for each full trailing window.
pub fn rolling_stddev(prices: &[f64], period: usize) -> Vec<Option<(f64, f64)>> {
    let mut out = vec![None; prices.len()];
    if period == 0 {
        return out;
    }

    for i in (period - 1)..prices.len() {
        let window = &prices[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|p| {
                let diff = p - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        out[i] = Some((mean, variance.sqrt()));
    }

    out
}
