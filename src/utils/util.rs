use crate::error::CombineResult;
use log;
use std::{fmt::Display, path::Path, sync::Once};

pub type Result<T> = CombineResult<T>;

#[allow(unused)]
static INIT_LOG: Once = Once::new();

#[allow(unused)]
pub fn init_logger() {
    INIT_LOG.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .init();
    });
}

pub fn handle_error_and_exit(err: impl Display) -> ! {
    log::error!("{err}");
    std::process::exit(1);
}

pub fn try_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::combine_error!(
            "Path/File does not exist: {}",
            path.display()
        ));
    }
    Ok(())
}

/// Rounds the exact binary value (not `value * 10^decimals`) to `decimals` fractional digits.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

pub fn round_to_i64(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Shortest round-trip rendering that always carries a fractional part, e.g. `0.5`, `1.0`.
pub fn format_float(value: f64) -> String {
    let mut rendered = value.to_string();
    if value.is_finite() && !rendered.contains('.') {
        rendered.push_str(".0");
    }
    rendered
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); `None` below two observations.
pub fn sample_sd(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mu = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - mu).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_format_float_keeps_fractional_part() {
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(7.07), "7.07");
        assert_eq!(format_float(12.0), "12.0");
    }

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to(1.0 / 3.0, 2), 0.33);
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_to(7.0710678, 2), 7.07);
    }

    #[test]
    fn test_round_to_uses_exact_binary_value() {
        assert_eq!(round_to(1.0 / 40.0, 2), 0.03);
        assert_eq!(round_to(3.0 / 40.0, 2), 0.07);
        assert_eq!(round_to(9.0 / 40.0, 2), 0.23);
        assert_eq!(round_to(2.0_f64.sqrt(), 2), 1.41);
    }

    #[test]
    fn test_round_to_i64_ties_to_even() {
        assert_eq!(round_to_i64(2.5), 2);
        assert_eq!(round_to_i64(3.5), 4);
        assert_eq!(round_to_i64(4.4), 4);
        assert_eq!(round_to_i64(15.0), 15);
    }

    #[test]
    fn test_sample_sd() {
        assert!(sample_sd(&[]).is_none());
        assert!(sample_sd(&[4.0]).is_none());
        assert_relative_eq!(
            sample_sd(&[10.0, 20.0]).unwrap(),
            7.0710678118654755,
            epsilon = 1e-12
        );
        assert_relative_eq!(sample_sd(&[3.0, 3.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_try_exists_reports_missing_path() {
        let err = try_exists(Path::new("/definitely/not/here.vcf")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
