use std::time::Duration;

fn as_millis_f64(samples: &[Duration]) -> impl Iterator<Item = f64> + '_ {
    samples.iter().map(|d| d.as_micros() as f64 / 1000.0)
}

/// Mean of `samples` in milliseconds
pub fn mean_ms(samples: &[Duration]) -> Option<f64> {
    match samples.len() {
        0 => None,
        count => Some(as_millis_f64(samples).sum::<f64>() / count as f64),
    }
}

/// Population standard deviation of `samples` in milliseconds
pub fn std_dev_ms(samples: &[Duration]) -> Option<f64> {
    let mean = mean_ms(samples)?;
    let variance = as_millis_f64(samples)
        .map(|value| {
            let diff = mean - value;

            diff * diff
        })
        .sum::<f64>()
        / samples.len() as f64;

    Some(variance.sqrt())
}

pub fn fastest(samples: &[Duration]) -> Option<Duration> {
    samples.iter().min().copied()
}
