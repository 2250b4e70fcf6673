use thiserror::Error;

/// Reasons an incoming message could not be recorded as an answer.
///
/// Both are shown to the user verbatim and leave the session untouched, so
/// the user can simply retry on the same question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("no current question to answer")]
    NoCurrentQuestion,

    /// `options` is the already rendered set literal, e.g. `{'x', 'y'}`.
    #[error("Invalid answer. Please choose from {options}.")]
    InvalidOption { options: String },
}

/// Errors raised while loading the question bank at startup.
#[derive(Debug, Error)]
pub enum QuestionBankError {
    #[error("failed to read question file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse question file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question #{index} has no options")]
    NoOptions { index: usize },

    #[error("question #{index} lists option '{option}' more than once")]
    DuplicateOption { index: usize, option: String },

    #[error("question #{index}: correct answer '{answer}' is not one of its options")]
    CorrectAnswerNotAnOption { index: usize, answer: String },
}
