use core::fmt::Display;
use core::fmt::Formatter;
use std::str::FromStr;

use tracing::debug;

use crate::error::StatsError;

/// The statistic that `compute` calculates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticMode {
    /// Arithmetic mean
    Mean,
    /// Middle value, or mean of the two middle values for an even count
    Median,
    /// Population standard deviation
    StandardDeviation,
}

impl FromStr for StatisticMode {
    type Err = StatsError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "mean" => Ok(StatisticMode::Mean),
            "median" => Ok(StatisticMode::Median),
            "std" => Ok(StatisticMode::StandardDeviation),
            _ => Err(StatsError::UnknownMode {
                mode: mode.to_owned(),
            }),
        }
    }
}

impl Display for StatisticMode {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        let name = match self {
            StatisticMode::Mean => "mean",
            StatisticMode::Median => "median",
            StatisticMode::StandardDeviation => "std",
        };
        write!(fmt, "{}", name)
    }
}

/// Options controlling how `compute` validates its input and rounds its result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticOptions {
    round_digits: u32,
    allow_negative: bool,
}

impl Default for StatisticOptions {
    fn default() -> Self {
        Self {
            round_digits: 2,
            allow_negative: false,
        }
    }
}

impl StatisticOptions {
    /// Returns a copy of these options that rounds to `round_digits` decimal digits
    pub fn with_round_digits(self, round_digits: u32) -> Self {
        Self {
            round_digits,
            ..self
        }
    }

    /// Returns a copy of these options that does or does not accept negative values
    pub fn with_allow_negative(self, allow_negative: bool) -> Self {
        Self {
            allow_negative,
            ..self
        }
    }

    pub fn round_digits(&self) -> u32 {
        self.round_digits
    }

    pub fn allow_negative(&self) -> bool {
        self.allow_negative
    }
}

/// Every finite `f64` is exact with this many fractional digits (the smallest subnormal is 2^-1074)
const MAX_SIGNIFICANT_DIGITS: u32 = 1074;

/// Rounds `value` to `digits` decimal digits. Ties go to the even neighbour, and the decision is made on
/// the exact binary value, so `2.675` (stored as `2.67499999...`) rounds down to `2.67`
pub fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() || digits > MAX_SIGNIFICANT_DIGITS {
        return value;
    }
    format!("{:.*}", digits as usize, value)
        .parse::<f64>()
        .unwrap_or(value)
}

fn mean(data: &[f64]) -> f64 {
    let sum = data.iter().sum::<f64>();
    sum / data.len() as f64
}

fn median(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mid = count / 2;
    if count % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

fn std_deviation(data: &[f64], round_digits: u32) -> f64 {
    // The mean is rounded to `round_digits` before the deviations are summed
    let data_mean = round_to(mean(data), round_digits);
    debug!(mean = data_mean, "rounded intermediate mean");

    let variance = data
        .iter()
        .map(|value| {
            let diff = value - data_mean;

            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    variance.sqrt()
}

/// Computes the statistic `mode` over `values`, rounded to `options.round_digits()` decimal digits.
/// Returns `Ok(None)` if `values` is absent or empty
pub fn compute(
    values: Option<&[f64]>,
    mode: StatisticMode,
    options: &StatisticOptions,
) -> Result<Option<f64>, StatsError> {
    let values = match values {
        Some(values) if !values.is_empty() => values,
        _ => return Ok(None),
    };

    if !options.allow_negative() {
        if let Some(&value) = values.iter().find(|&&value| value < 0.0) {
            return Err(StatsError::NegativeValue { value });
        }
    }

    debug!(%mode, count = values.len(), "computing statistic");
    let value = match mode {
        StatisticMode::Mean => mean(values),
        StatisticMode::Median => median(values),
        StatisticMode::StandardDeviation => std_deviation(values, options.round_digits()),
    };

    Ok(Some(round_to(value, options.round_digits())))
}
