use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {name} {value}: must be a positive finite number")]
    InvalidMargin { name: &'static str, value: f64 },

    #[error("model index {index} is out of range (structure has {count} models)")]
    ModelOutOfRange { index: usize, count: usize },
}

impl Error {
    pub fn invalid_margin(name: &'static str, value: f64) -> Self {
        Self::InvalidMargin { name, value }
    }

    pub fn model_out_of_range(index: usize, count: usize) -> Self {
        Self::ModelOutOfRange { index, count }
    }
}
