use std::collections::BTreeMap;

/// Per-conversation state the controller reads and mutates.
///
/// The implementor owns loading and persisting. Mutations must be visible to
/// subsequent reads right away; nothing is persisted until [`Session::save`].
pub trait Session {
    fn current_question_id(&self) -> Option<usize>;
    fn set_current_question_id(&mut self, id: Option<usize>);

    fn answer(&self, question_id: usize) -> Option<&str>;
    fn set_answer(&mut self, question_id: usize, answer: String);
    fn clear_answers(&mut self);

    fn save(&mut self);
}

/// The persisted shape of a conversation, stored per chat by the dialogue storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizSession {
    pub current_question_id: Option<usize>,
    #[serde(default)]
    pub answers: BTreeMap<usize, String>,
}

/// Wraps a loaded [`QuizSession`] and stages a snapshot on `save`, so the
/// async storage write can happen after the synchronous turn has finished.
#[derive(Debug, Default)]
pub struct StagedSession {
    state: QuizSession,
    staged: Option<QuizSession>,
}

impl StagedSession {
    pub fn new(state: QuizSession) -> Self {
        Self {
            state,
            staged: None,
        }
    }

    /// The snapshot from the last `save`, if any. Unsaved changes are dropped.
    pub fn into_saved(self) -> Option<QuizSession> {
        self.staged
    }
}

impl Session for StagedSession {
    fn current_question_id(&self) -> Option<usize> {
        self.state.current_question_id
    }

    fn set_current_question_id(&mut self, id: Option<usize>) {
        self.state.current_question_id = id;
    }

    fn answer(&self, question_id: usize) -> Option<&str> {
        self.state.answers.get(&question_id).map(String::as_str)
    }

    fn set_answer(&mut self, question_id: usize, answer: String) {
        self.state.answers.insert(question_id, answer);
    }

    fn clear_answers(&mut self) {
        self.state.answers.clear();
    }

    fn save(&mut self) {
        self.staged = Some(self.state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_staged_without_save() {
        let mut session = StagedSession::new(QuizSession::default());
        session.set_current_question_id(Some(2));
        session.set_answer(1, "b".to_string());

        assert_eq!(session.current_question_id(), Some(2));
        assert_eq!(session.answer(1), Some("b"));
        assert_eq!(session.into_saved(), None);
    }

    #[test]
    fn save_snapshots_current_state() {
        let mut session = StagedSession::new(QuizSession::default());
        session.set_answer(0, "a".to_string());
        session.set_current_question_id(Some(1));
        session.save();
        session.set_current_question_id(Some(5));

        let saved = session.into_saved().unwrap();
        assert_eq!(saved.current_question_id, Some(1));
        assert_eq!(saved.answers.get(&0).map(String::as_str), Some("a"));
    }

    #[test]
    fn zero_index_survives_json_round_trip() {
        let state = QuizSession {
            current_question_id: Some(0),
            answers: BTreeMap::new(),
        };
        let json = serde_json::to_string(&state).unwrap();
        let restored: QuizSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.current_question_id, Some(0));
    }

    #[test]
    fn missing_answers_field_defaults_to_empty() {
        let restored: QuizSession = serde_json::from_str(r#"{"current_question_id":null}"#).unwrap();
        assert_eq!(restored, QuizSession::default());
    }
}
