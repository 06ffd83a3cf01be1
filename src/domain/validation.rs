use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidMediaUrl { input: String },
    PageSizeOutOfRange { min: u32, max: u32, actual: u32 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidMediaUrl { input } => write!(f, "invalid media url: {input}"),
            Self::PageSizeOutOfRange { min, max, actual } => {
                write!(f, "page size out of range: {actual} (expected {min}..={max})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
