use crate::catalog::{Article, WordEntry};
use crate::util::percentage;
use std::fmt;
use std::time::{Duration, Instant};

/// What the user gave for a question that was graded wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAnswer {
    Article(Article),
    Skipped,
}

impl fmt::Display for UserAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserAnswer::Article(a) => write!(f, "{a}"),
            UserAnswer::Skipped => f.write_str("(skip)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MistakeRecord {
    pub term: String,
    pub translation: Option<String>,
    pub user_answer: UserAnswer,
    pub correct_answer: Article,
}

/// Results of one quiz run; folded into the lifetime record when it ends
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub planned: usize,
    pub correct: usize,
    pub answered: usize,
    pub mistakes: Vec<MistakeRecord>,
    pub started_at: Instant,
}

impl SessionResult {
    pub fn new(planned: usize) -> Self {
        Self {
            planned,
            correct: 0,
            answered: 0,
            mistakes: Vec::new(),
            started_at: Instant::now(),
        }
    }

    pub fn record_correct(&mut self) {
        self.correct += 1;
        self.answered += 1;
    }

    pub fn record_mistake(&mut self, word: &WordEntry, user_answer: UserAnswer) {
        self.answered += 1;
        self.mistakes.push(MistakeRecord {
            term: word.term.clone(),
            translation: word.translation.clone(),
            user_answer,
            correct_answer: word.article,
        });
    }

    /// Percentage of answered questions that were correct, None if nothing was answered
    pub fn score(&self) -> Option<f64> {
        percentage(self.correct, self.answered)
    }

    pub fn is_empty(&self) -> bool {
        self.answered == 0
    }

    pub fn ended_early(&self) -> bool {
        self.answered < self.planned
    }

    /// Wall time rounded to whole seconds
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs(self.started_at.elapsed().as_secs_f64().round() as u64)
    }
}
