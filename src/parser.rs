use tracing::trace;

use crate::error::StatsError;

/// Parses a list of numbers separated by commas, tabs or whitespace. Absent text yields an empty list
pub fn parse_numbers(text: Option<&str>) -> Result<Vec<f64>, StatsError> {
    let text = match text {
        None => return Ok(vec![]),
        Some(text) => text,
    };

    let normalized = text.replace(',', " ").replace('\t', " ");
    let numbers = normalized
        .split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| StatsError::Parse {
                token: token.to_owned(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    trace!(count = numbers.len(), "parsed numbers");
    Ok(numbers)
}
