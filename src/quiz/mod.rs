pub mod controller;
pub mod error;
pub mod session;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use error::QuestionBankError;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub text: String,
    /// Allowed answers. Order is kept for display, duplicates are rejected on load.
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    pub fn new(text: impl Into<String>, options: &[&str], correct_answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct_answer.into(),
        }
    }

    pub fn accepts(&self, answer: &str) -> bool {
        self.options.iter().any(|o| o == answer)
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    /// Renders the options as a set literal: `{'x', 'y'}`.
    pub fn render_options(&self) -> String {
        let inner = self
            .options
            .iter()
            .map(|o| format!("'{}'", o))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{}}}", inner)
    }
}

/// The fixed, ordered list of questions. A question's index is its id.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank after checking every question is answerable.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        for (index, question) in questions.iter().enumerate() {
            if question.options.is_empty() {
                return Err(QuestionBankError::NoOptions { index });
            }
            for (i, option) in question.options.iter().enumerate() {
                if question.options[..i].contains(option) {
                    return Err(QuestionBankError::DuplicateOption {
                        index,
                        option: option.clone(),
                    });
                }
            }
            if !question.accepts(&question.correct_answer) {
                return Err(QuestionBankError::CorrectAnswerNotAnOption {
                    index,
                    answer: question.correct_answer.clone(),
                });
            }
        }

        Ok(Self { questions })
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, QuestionBankError> {
        let questions: Vec<Question> = serde_json::from_reader(reader)?;
        Self::new(questions)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, QuestionBankError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn get(&self, id: usize) -> Option<&Question> {
        self.questions.get(id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
