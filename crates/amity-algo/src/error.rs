use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AlgoError {
    #[error("damping factor must be in (0, 1], got {0}")]
    InvalidDamping(f64),

    #[error("weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}
