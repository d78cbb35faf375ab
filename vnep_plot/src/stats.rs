// NaN marks inapplicable values: every reduction here ignores it, and an
// input without a single number reduces to NaN.

fn numbers(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|value| !value.is_nan())
}

pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = numbers(values)
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

pub fn nan_min(values: &[f64]) -> f64 {
    numbers(values).fold(f64::NAN, f64::min)
}

pub fn nan_max(values: &[f64]) -> f64 {
    numbers(values).fold(f64::NAN, f64::max)
}

/// `min: ..; mean: ..; max: ..` with two decimals.
pub fn summary(values: &[f64]) -> String {
    format!(
        "min: {:.2}; mean: {:.2}; max: {:.2}",
        nan_min(values),
        nan_mean(values),
        nan_max(values)
    )
}
