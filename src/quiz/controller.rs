use std::str::FromStr;
use std::sync::Arc;

use log::{debug, info, warn};

use super::error::AnswerError;
use super::session::Session;
use super::{Question, QuestionBank};

pub const BOT_WELCOME_MESSAGE: &str =
    "Welcome to the Python quiz! Send /start to begin, then answer each question with one of its options.";

/// When the welcome message is put in front of a turn's replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WelcomePolicy {
    /// Welcome whenever no question is pending or the first question is pending.
    #[default]
    Legacy,
    /// Welcome only when no question is pending.
    Strict,
}

impl WelcomePolicy {
    fn greets(self, current_question_id: Option<usize>) -> bool {
        match (self, current_question_id) {
            (_, None) => true,
            (WelcomePolicy::Legacy, Some(0)) => true,
            _ => false,
        }
    }
}

impl FromStr for WelcomePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(WelcomePolicy::Legacy),
            "strict" => Ok(WelcomePolicy::Strict),
            other => Err(format!("unknown welcome policy '{}'", other)),
        }
    }
}

/// Drives one conversation turn over an injected question bank.
pub struct QuizController {
    questions: Arc<QuestionBank>,
    welcome: String,
    policy: WelcomePolicy,
}

impl QuizController {
    pub fn new(questions: Arc<QuestionBank>, policy: WelcomePolicy) -> Self {
        Self::with_welcome(questions, BOT_WELCOME_MESSAGE, policy)
    }

    pub fn with_welcome(
        questions: Arc<QuestionBank>,
        welcome: impl Into<String>,
        policy: WelcomePolicy,
    ) -> Self {
        Self {
            questions,
            welcome: welcome.into(),
            policy,
        }
    }

    /// Validates `answer` against the pending question and stores it.
    /// The session is only touched on success.
    pub fn record_answer(
        &self,
        answer: &str,
        current_question_id: Option<usize>,
        session: &mut impl Session,
    ) -> Result<(), AnswerError> {
        let Some(id) = current_question_id else {
            return Err(AnswerError::NoCurrentQuestion);
        };
        let Some(question) = self.questions.get(id) else {
            warn!(
                "Session points at question #{} but only {} questions are loaded",
                id,
                self.questions.len()
            );
            return Err(AnswerError::NoCurrentQuestion);
        };

        if !question.accepts(answer) {
            return Err(AnswerError::InvalidOption {
                options: question.render_options(),
            });
        }

        session.set_answer(id, answer.to_string());
        Ok(())
    }

    /// The question after `current_question_id`, or the first one when nothing
    /// is pending. `None` means the quiz is exhausted.
    pub fn next_question(&self, current_question_id: Option<usize>) -> Option<(&str, usize)> {
        let next_id = match current_question_id {
            None => 0,
            Some(id) => id + 1,
        };

        self.questions
            .get(next_id)
            .map(|question| (question.text.as_str(), next_id))
    }

    pub fn score(&self, session: &impl Session) -> usize {
        self.questions
            .iter()
            .enumerate()
            .filter(|(id, question)| {
                session
                    .answer(*id)
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count()
    }

    pub fn final_response(&self, session: &impl Session) -> String {
        format!(
            "You scored {} out of {}.",
            self.score(session),
            self.questions.len()
        )
    }

    pub fn current_question(&self, session: &impl Session) -> Option<&Question> {
        session
            .current_question_id()
            .and_then(|id| self.questions.get(id))
    }

    /// Handles one incoming message and returns the replies in display order.
    pub fn respond(&self, message: &str, session: &mut impl Session) -> Vec<String> {
        let mut responses = Vec::new();

        let current_question_id = session.current_question_id();
        debug!("Answering question {:?} with {:?}", current_question_id, message);

        if self.policy.greets(current_question_id) {
            responses.push(self.welcome.clone());
        }

        if let Err(err) = self.record_answer(message, current_question_id, session) {
            responses.push(err.to_string());
            return responses;
        }

        let next_question_id = match self.next_question(current_question_id) {
            Some((text, id)) => {
                responses.push(text.to_string());
                Some(id)
            }
            None => {
                let summary = self.final_response(&*session);
                info!("Quiz completed: {}", summary);
                responses.push(summary);
                None
            }
        };

        session.set_current_question_id(next_question_id);
        session.save();

        responses
    }

    /// Begins a fresh run, discarding any previous answers.
    pub fn start(&self, session: &mut impl Session) -> Vec<String> {
        session.clear_answers();

        let mut responses = vec![self.welcome.clone()];
        let first_question_id = match self.next_question(None) {
            Some((text, id)) => {
                responses.push(text.to_string());
                Some(id)
            }
            None => {
                responses.push(self.final_response(&*session));
                None
            }
        };

        session.set_current_question_id(first_question_id);
        session.save();

        info!("Quiz started with {} questions", self.questions.len());
        responses
    }
}
