#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    UnexpectedEof,
    InvalidValue(&'static str),
    TrailingBytes,
    LengthOverflow,
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::UnexpectedEof => write!(f, "unexpected end of state bytes"),
            StateError::InvalidValue(what) => write!(f, "invalid state value: {}", what),
            StateError::TrailingBytes => write!(f, "trailing bytes after state record"),
            StateError::LengthOverflow => write!(f, "state length overflows length field"),
        }
    }
}

impl std::error::Error for StateError {}
