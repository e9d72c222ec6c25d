//! Mutable answer storage for one session.

use crate::error::SessionError;

/// Holds the learner's answers by question index.
///
/// Mutable until [`freeze`](AnswerStore::freeze); afterwards every
/// `set_answer` fails with [`SessionError::SessionFrozen`].
#[derive(Debug, Clone)]
pub struct AnswerStore {
    answers: Vec<String>,
    frozen: bool,
}

impl AnswerStore {
    /// Create an empty store for `question_count` questions.
    pub fn new(question_count: usize) -> Self {
        Self {
            answers: vec![String::new(); question_count],
            frozen: false,
        }
    }

    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Overwrite the answer at `index`. Last write wins.
    pub fn set_answer(&mut self, index: usize, text: impl Into<String>) -> Result<(), SessionError> {
        if self.frozen {
            return Err(SessionError::SessionFrozen);
        }
        if index >= self.answers.len() {
            return Err(SessionError::InvalidIndex {
                index,
                count: self.answers.len(),
            });
        }
        self.answers[index] = text.into();
        Ok(())
    }

    /// Read back the current answer at `index`.
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    /// Disable further writes and return the final ordered answers.
    ///
    /// Never-set indices come back as empty strings. Idempotent: freezing
    /// twice returns the same snapshot.
    pub fn freeze(&mut self) -> Vec<String> {
        self.frozen = true;
        self.answers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_freeze_roundtrip() {
        let mut store = AnswerStore::new(3);
        store.set_answer(1, "a valid answer").unwrap();
        store.set_answer(2, "another").unwrap();
        let frozen = store.freeze();
        assert_eq!(frozen, vec!["", "a valid answer", "another"]);
    }

    #[test]
    fn last_write_wins() {
        let mut store = AnswerStore::new(1);
        store.set_answer(0, "first").unwrap();
        store.set_answer(0, "second").unwrap();
        assert_eq!(store.answer(0), Some("second"));
    }

    #[test]
    fn invalid_index_rejected() {
        let mut store = AnswerStore::new(2);
        let err = store.set_answer(2, "x").unwrap_err();
        assert_eq!(err, SessionError::InvalidIndex { index: 2, count: 2 });
    }

    #[test]
    fn set_after_freeze_fails() {
        let mut store = AnswerStore::new(2);
        store.freeze();
        let err = store.set_answer(0, "late").unwrap_err();
        assert_eq!(err, SessionError::SessionFrozen);
    }

    #[test]
    fn freeze_is_idempotent() {
        let mut store = AnswerStore::new(1);
        store.set_answer(0, "kept").unwrap();
        let first = store.freeze();
        let second = store.freeze();
        assert_eq!(first, second);
    }

    #[test]
    fn unset_answers_freeze_to_empty() {
        let mut store = AnswerStore::new(4);
        let frozen = store.freeze();
        assert_eq!(frozen, vec![""; 4]);
    }
}
