use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("invalid month key: {0:?} (expected \"Mon YYYY\")")]
    InvalidMonthKey(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
