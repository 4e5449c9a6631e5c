/// Contract violations detected while building a deck.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckError {
    MissingCardRenderer,
    MissingExhaustedRenderer,
    MissingViewportWidth,
    InvalidViewportWidth(f32),
    DuplicateKey(String),
}

impl std::fmt::Display for DeckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckError::MissingCardRenderer => f.write_str("deck has no card renderer"),
            DeckError::MissingExhaustedRenderer => {
                f.write_str("deck has no renderer for the exhausted state")
            }
            DeckError::MissingViewportWidth => f.write_str("deck viewport width was not set"),
            DeckError::InvalidViewportWidth(width) => {
                write!(f, "viewport width {width} must be finite and positive")
            }
            DeckError::DuplicateKey(key) => write!(f, "item key {key} appears more than once"),
        }
    }
}

impl std::error::Error for DeckError {}
