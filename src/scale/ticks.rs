//! "Nice" tick steps and evenly spaced tick values.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Upper bound on ticks a single call will emit.
const MAX_TICKS: i64 = 100_000;

fn nice_factor(error: f64) -> f64 {
    if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    }
}

/// Increment between roughly `count` ticks over `[start, stop]`.
///
/// Positive results are the step itself. Negative results `-k` stand for a
/// step of `1 / k`, so sub-unit ticks can be produced by division without
/// accumulating representation error.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = nice_factor(error);
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Signed distance between adjacent ticks for roughly `count` ticks.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start).abs() / count.max(1) as f64;
    let base = 10f64.powf(raw.log10().floor());
    let step = base * nice_factor(raw / base);
    if stop < start { -step } else { step }
}

/// Tick values inside `[start, stop]`, in the direction of the interval.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let inc = tick_increment(lo, hi, count);
    if inc == 0.0 || !inc.is_finite() {
        return Vec::new();
    }

    // Index-based so each value is computed once, not accumulated.
    let mut out: Vec<f64> = if inc > 0.0 {
        let i0 = (lo / inc).ceil() as i64;
        let i1 = (hi / inc).floor() as i64;
        (i0..=i1.min(i0 + MAX_TICKS)).map(|i| i as f64 * inc).collect()
    } else {
        let inv = -inc;
        let i0 = (lo * inv).ceil() as i64;
        let i1 = (hi * inv).floor() as i64;
        (i0..=i1.min(i0 + MAX_TICKS)).map(|i| i as f64 / inv).collect()
    };

    if reverse {
        out.reverse();
    }
    out
}

/// Decimal places needed to tell ticks `step` apart.
pub fn precision_for_step(step: f64) -> usize {
    let step = step.abs();
    if step == 0.0 || !step.is_finite() {
        return 0;
    }
    (-step.log10().floor()).max(0.0) as usize
}

/// Tick label with a fixed number of decimals; never prints `-0`.
pub fn format_fixed(value: f64, precision: usize) -> String {
    let s = format!("{value:.precision$}");
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => s,
    }
}
