use thiserror::Error;

/// Malformed markup. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unterminated attribute value; unable to find '{quote}' character.")]
    UnterminatedAttributeValue { quote: char },

    #[error("Unexpected end of string, expected {expected}.")]
    UnexpectedEnd { expected: &'static str },

    #[error("Expected {expected} but found '{found}'.")]
    UnexpectedChar { expected: &'static str, found: char },

    #[error("Expected \"=\" after attribute \"{name}\".")]
    ExpectedEquals { name: String },

    #[error("Variable attribute names are not allowed.")]
    VariableAttributeName,

    #[error("Unable to read name.")]
    MissingName,

    #[error("Invalid name \"{0}\".")]
    InvalidName(String),

    #[error("Unterminated start tag.")]
    UnterminatedStartTag,

    #[error("Stack is empty, no root node.")]
    EmptyStack,
}
