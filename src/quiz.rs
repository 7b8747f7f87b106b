use crate::answer::{parse_response, Response};
use crate::catalog::{Difficulty, WordEntry};
use crate::config::Config;
use crate::display::Screen;
use crate::runtime::{ExitReason, InputEvent, InputSource};
use crate::selection::{PracticeSelector, QuestionSelector, Selection, UniformSelector};
use crate::session::{SessionResult, UserAnswer};
use crate::stats::StatisticsRecord;
use rand::RngCore;
use std::io::{self, Write};

/// How the questions of a session are drawn from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Uniform {
        count: usize,
        difficulty: Option<Difficulty>,
    },
    /// Practice: biased toward words missed before
    Weighted,
}

impl SelectionMode {
    pub fn select<'a>(
        &self,
        pool: &'a [WordEntry],
        stats: &StatisticsRecord,
        config: &Config,
        rng: &mut dyn RngCore,
    ) -> Selection<'a> {
        match *self {
            SelectionMode::Uniform { count, difficulty } => {
                UniformSelector { count, difficulty }.select(pool, stats, rng)
            }
            SelectionMode::Weighted => PracticeSelector {
                limit: config.practice_questions,
                max_repeats: config.max_practice_repeats,
            }
            .select(pool, stats, rng),
        }
    }
}

/// Result of asking a list of questions
#[derive(Debug)]
pub struct SessionOutcome {
    pub result: SessionResult,
    /// Set when the input closed or a signal arrived mid-session
    pub exit: Option<ExitReason>,
}

enum Step {
    Next,
    QuitSession,
    Exit(ExitReason),
}

/// Ask every question in order. Mistakes are counted into `stats` as they
/// happen; totals are left to the caller.
pub fn run_session<I, W>(
    questions: &[&WordEntry],
    stats: &mut StatisticsRecord,
    input: &mut I,
    screen: &mut Screen<W>,
) -> io::Result<SessionOutcome>
where
    I: InputSource,
    W: Write,
{
    let total = questions.len();
    let mut result = SessionResult::new(total);

    for (i, word) in questions.iter().enumerate() {
        screen.question(word, i + 1, total)?;
        match ask(word, &mut result, stats, input, screen)? {
            Step::Next => {}
            Step::QuitSession => break,
            Step::Exit(reason) => {
                return Ok(SessionOutcome {
                    result,
                    exit: Some(reason),
                })
            }
        }
    }

    Ok(SessionOutcome { result, exit: None })
}

fn ask<I, W>(
    word: &WordEntry,
    result: &mut SessionResult,
    stats: &mut StatisticsRecord,
    input: &mut I,
    screen: &mut Screen<W>,
) -> io::Result<Step>
where
    I: InputSource,
    W: Write,
{
    loop {
        screen.answer_prompt()?;
        let line = match input.next_event() {
            InputEvent::Line(line) => line,
            InputEvent::Closed => return Ok(Step::Exit(ExitReason::InputClosed)),
            InputEvent::Interrupted => return Ok(Step::Exit(ExitReason::Interrupted)),
        };

        match parse_response(&line) {
            Ok(Response::Quit) => {
                screen.quiz_quit()?;
                return Ok(Step::QuitSession);
            }
            Ok(Response::Hint) => screen.hint(word)?,
            Ok(Response::Skip) => {
                mark_wrong(word, UserAnswer::Skipped, result, stats, screen)?;
                return Ok(Step::Next);
            }
            Ok(Response::Answer(article)) if article == word.article => {
                result.record_correct();
                screen.correct(word)?;
                return Ok(Step::Next);
            }
            Ok(Response::Answer(article)) => {
                mark_wrong(word, UserAnswer::Article(article), result, stats, screen)?;
                return Ok(Step::Next);
            }
            Err(e) => {
                tracing::debug!("{e}");
                screen.invalid_answer()?;
            }
        }
    }
}

fn mark_wrong<W: Write>(
    word: &WordEntry,
    answer: UserAnswer,
    result: &mut SessionResult,
    stats: &mut StatisticsRecord,
    screen: &mut Screen<W>,
) -> io::Result<()> {
    screen.wrong(word)?;
    result.record_mistake(word, answer);
    stats.record_mistake(&word.term);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Article;
    use crate::display::DisplayOptions;
    use crate::runtime::ScriptedInput;

    fn words() -> Vec<WordEntry> {
        vec![
            WordEntry::new("Haus", Article::Das),
            WordEntry::new("Tisch", Article::Der),
        ]
    }

    fn run(
        lines: &[&str],
        stats: &mut StatisticsRecord,
    ) -> (SessionOutcome, String) {
        let pool = words();
        let questions: Vec<&WordEntry> = pool.iter().collect();
        let mut input = ScriptedInput::new(lines.iter().copied());
        let mut screen = Screen::new(Vec::new(), DisplayOptions::plain());
        let outcome = run_session(&questions, stats, &mut input, &mut screen).unwrap();
        (outcome, String::from_utf8(screen.into_inner()).unwrap())
    }

    #[test]
    fn test_all_correct() {
        let mut stats = StatisticsRecord::default();
        let (outcome, out) = run(&["3", "der"], &mut stats);

        assert_eq!(outcome.exit, None);
        assert_eq!(outcome.result.correct, 2);
        assert_eq!(outcome.result.answered, 2);
        assert!(outcome.result.mistakes.is_empty());
        assert!(stats.mistake_counts.is_empty());
        assert_eq!(out.matches("✓ Correct!").count(), 2);
    }

    #[test]
    fn test_wrong_then_quit() {
        let mut stats = StatisticsRecord::default();
        let (outcome, out) = run(&["1", "q"], &mut stats);

        assert_eq!(outcome.exit, None);
        assert_eq!(outcome.result.answered, 1);
        assert_eq!(outcome.result.correct, 0);
        assert_eq!(outcome.result.mistakes.len(), 1);
        assert_eq!(outcome.result.mistakes[0].term, "Haus");
        assert_eq!(
            outcome.result.mistakes[0].user_answer,
            UserAnswer::Article(Article::Die)
        );
        assert_eq!(stats.mistake_count("Haus"), 1);
        assert!(out.contains("Exiting quiz early..."));
    }

    #[test]
    fn test_hint_and_invalid_input_do_not_consume_questions() {
        let mut stats = StatisticsRecord::default();
        let (outcome, out) = run(&["?", "xyz", "", "das", "hint", "masc"], &mut stats);

        assert_eq!(outcome.result.answered, 2);
        assert_eq!(outcome.result.correct, 2);
        assert_eq!(out.matches("No hint available.").count(), 2);
        assert_eq!(out.matches("Invalid input.").count(), 2);
    }

    #[test]
    fn test_skip_is_a_mistake() {
        let mut stats = StatisticsRecord::default();
        let (outcome, _) = run(&["skip", "s"], &mut stats);

        assert_eq!(outcome.result.answered, 2);
        assert_eq!(outcome.result.correct, 0);
        assert!(outcome
            .result
            .mistakes
            .iter()
            .all(|m| m.user_answer == UserAnswer::Skipped));
        assert_eq!(stats.mistake_count("Haus"), 1);
        assert_eq!(stats.mistake_count("Tisch"), 1);
    }

    #[test]
    fn test_input_closed_mid_session() {
        let mut stats = StatisticsRecord::default();
        let (outcome, _) = run(&["3"], &mut stats);

        assert_eq!(outcome.exit, Some(ExitReason::InputClosed));
        assert_eq!(outcome.result.answered, 1);
    }

    #[test]
    fn test_interrupt_mid_session() {
        let pool = words();
        let questions: Vec<&WordEntry> = pool.iter().collect();
        let mut stats = StatisticsRecord::default();
        let mut input = ScriptedInput::new(["2"]).then(InputEvent::Interrupted);
        let mut screen = Screen::new(Vec::new(), DisplayOptions::plain());

        let outcome = run_session(&questions, &mut stats, &mut input, &mut screen).unwrap();
        assert_eq!(outcome.exit, Some(ExitReason::Interrupted));
        assert_eq!(outcome.result.answered, 1);
        assert_eq!(stats.mistake_count("Haus"), 1);
    }

    #[test]
    fn test_selection_mode_dispatch() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let pool = words();
        let config = Config::default();
        let mut stats = StatisticsRecord::default();
        let mut rng = StdRng::seed_from_u64(2);

        let uniform = SelectionMode::Uniform {
            count: 10,
            difficulty: None,
        }
        .select(&pool, &stats, &config, &mut rng);
        assert_eq!(uniform.questions.len(), 2);

        assert!(SelectionMode::Weighted
            .select(&pool, &stats, &config, &mut rng)
            .questions
            .is_empty());

        stats.record_mistake("Tisch");
        let practice = SelectionMode::Weighted.select(&pool, &stats, &config, &mut rng);
        assert_eq!(practice.questions.len(), 2);
        assert!(practice.questions.iter().all(|w| w.term == "Tisch"));
    }
}
