/// Errors raised while parsing numbers or computing a statistic
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// A token of the input text is not a valid number
    #[error("could not parse number: {token}")]
    Parse { token: String },

    /// A negative value was encountered while negative values are disallowed
    #[error("negative not allowed: {value:?}")]
    NegativeValue { value: f64 },

    #[error("Unknown mode:{mode}")]
    UnknownMode { mode: String },
}
