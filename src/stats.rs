//! Internal descriptive-statistics kernel.
//!
//! Numerically stable primitives shared by the summarizers: Kahan
//! compensated mean, Welford sample variance, and R-7 quantiles (the
//! default linear-interpolation method in R, NumPy, and Excel;
//! Hyndman & Fan 1996). All functions return `None` on empty or
//! non-finite input; callers map that to NaN in their result records.

/// Neumaier-compensated summation, O(ε) error independent of length.
pub(crate) fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Arithmetic mean. `None` if empty or any value is non-finite.
pub(crate) fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Sample variance with Bessel's correction (n − 1 denominator), via
/// Welford's online algorithm. `None` if fewer than 2 values or any
/// value is non-finite.
pub(crate) fn sample_variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut count = 0u64;
    let mut mean_acc = 0.0_f64;
    let mut m2 = 0.0_f64;
    for &x in data {
        count += 1;
        let delta = x - mean_acc;
        mean_acc += delta / count as f64;
        m2 += delta * (x - mean_acc);
    }
    Some(m2 / (count - 1) as f64)
}

/// Sample standard deviation: `sqrt(sample_variance)`.
pub(crate) fn sample_std_dev(data: &[f64]) -> Option<f64> {
    sample_variance(data).map(f64::sqrt)
}

/// Minimum value. `None` if empty or any value is NaN.
pub(crate) fn min(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter()
        .copied()
        .try_fold(f64::INFINITY, |acc, x| (!x.is_nan()).then(|| acc.min(x)))
}

/// Maximum value. `None` if empty or any value is NaN.
pub(crate) fn max(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter()
        .copied()
        .try_fold(f64::NEG_INFINITY, |acc, x| (!x.is_nan()).then(|| acc.max(x)))
}

/// Returns a sorted copy of `data`. `None` if any value is NaN.
pub(crate) fn sorted(data: &[f64]) -> Option<Vec<f64>> {
    if data.iter().any(|x| x.is_nan()) {
        return None;
    }
    let mut out = data.to_vec();
    out.sort_unstable_by(|a, b| a.partial_cmp(b).expect("no NaN after check"));
    Some(out)
}

/// R-7 quantile on **pre-sorted** data: `h = (n − 1)p`, linear
/// interpolation between the two bracketing order statistics. Sorting
/// once and calling this repeatedly avoids re-sorting per quantile.
///
/// `None` if `sorted_data` is empty or `p` is outside `[0, 1]`.
pub(crate) fn quantile_sorted(sorted_data: &[f64], p: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if n == 1 {
        return Some(sorted_data[0]);
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n {
        Some(sorted_data[n - 1])
    } else {
        Some((1.0 - g) * sorted_data[j] + g * sorted_data[j + 1])
    }
}
