use crate::catalog::{Catalog, Difficulty};
use crate::config::Config;
use crate::display::Screen;
use crate::quiz::{run_session, SelectionMode};
use crate::runtime::{ExitReason, InputEvent, InputSource};
use crate::session::SessionResult;
use crate::stats::{StatisticsRecord, StatsError, StatsStore};
use rand::rngs::StdRng;
use std::io::{self, Write};

/// Where the menu loop is
#[derive(Debug)]
pub enum MenuState {
    MainMenu,
    CustomConfig,
    Running(SelectionMode),
    Results(SessionResult),
    Stats,
    Exit(ExitReason),
}

/// Map the custom-quiz difficulty answer; anything unrecognized means all levels.
pub fn parse_difficulty_choice(input: &str) -> Option<Difficulty> {
    match input.trim().to_lowercase().as_str() {
        "2" | "easy" | "e" => Some(Difficulty::Easy),
        "3" | "medium" | "m" => Some(Difficulty::Medium),
        "4" | "hard" | "h" => Some(Difficulty::Hard),
        _ => None,
    }
}

/// Owns the catalog, the lifetime statistics and the terminal for one run
pub struct App<S: StatsStore, I: InputSource, W: Write> {
    catalog: Catalog,
    stats: StatisticsRecord,
    store: S,
    config: Config,
    input: I,
    screen: Screen<W>,
    rng: StdRng,
}

impl<S: StatsStore, I: InputSource, W: Write> App<S, I, W> {
    /// Loads the statistics from `store`; a missing or broken file starts fresh.
    pub fn new(
        catalog: Catalog,
        store: S,
        config: Config,
        input: I,
        screen: Screen<W>,
        rng: StdRng,
    ) -> Self {
        let stats = store.load();
        Self {
            catalog,
            stats,
            store,
            config,
            input,
            screen,
            rng,
        }
    }

    pub fn stats(&self) -> &StatisticsRecord {
        &self.stats
    }

    /// Drive the menus until the user quits, input ends or a signal arrives.
    pub fn run(&mut self) -> io::Result<ExitReason> {
        self.screen.welcome(&self.stats)?;

        let mut state = MenuState::MainMenu;
        loop {
            state = match state {
                MenuState::MainMenu => self.main_menu()?,
                MenuState::CustomConfig => self.custom_config()?,
                MenuState::Running(mode) => self.running(mode)?,
                MenuState::Results(result) => self.results(result)?,
                MenuState::Stats => {
                    self.screen
                        .statistics(&self.stats, &self.catalog, self.config.top_missed)?;
                    MenuState::MainMenu
                }
                MenuState::Exit(reason) => return Ok(reason),
            };
        }
    }

    /// Say goodbye and persist the statistics. Shared by every exit path.
    pub fn finalize(&mut self, reason: ExitReason) -> Result<(), StatsError> {
        let shown = match reason {
            ExitReason::Quit => self.screen.goodbye(),
            ExitReason::InputClosed => self.screen.input_closed(),
            ExitReason::Interrupted => self.screen.interrupted(),
        };
        if let Err(e) = shown {
            tracing::debug!("could not print exit message: {e}");
        }
        tracing::debug!(?reason, "saving statistics");
        self.store.save(&self.stats)
    }

    fn next_line(&mut self) -> Result<String, ExitReason> {
        match self.input.next_event() {
            InputEvent::Line(line) => Ok(line),
            InputEvent::Closed => Err(ExitReason::InputClosed),
            InputEvent::Interrupted => Err(ExitReason::Interrupted),
        }
    }

    fn main_menu(&mut self) -> io::Result<MenuState> {
        self.screen.main_menu(&self.config)?;
        let choice = match self.next_line() {
            Ok(line) => line,
            Err(reason) => return Ok(MenuState::Exit(reason)),
        };

        let next = match choice.trim().to_lowercase().as_str() {
            "1" => MenuState::Running(SelectionMode::Uniform {
                count: self.config.quick_quiz_questions,
                difficulty: None,
            }),
            "2" => MenuState::CustomConfig,
            "3" => MenuState::Stats,
            "4" => MenuState::Running(SelectionMode::Weighted),
            "q" | "quit" | "exit" => MenuState::Exit(ExitReason::Quit),
            _ => {
                self.screen.invalid_choice()?;
                MenuState::MainMenu
            }
        };
        Ok(next)
    }

    fn custom_config(&mut self) -> io::Result<MenuState> {
        self.screen.question_count_prompt(&self.config)?;
        let count = match self.next_line() {
            Ok(line) => line,
            Err(reason) => return Ok(MenuState::Exit(reason)),
        };
        let count = match self.config.parse_question_count(&count) {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!("{e}");
                self.screen
                    .invalid_question_count(self.config.default_custom_questions)?;
                self.config.default_custom_questions
            }
        };

        self.screen.difficulty_menu()?;
        let difficulty = match self.next_line() {
            Ok(line) => parse_difficulty_choice(&line),
            Err(reason) => return Ok(MenuState::Exit(reason)),
        };

        Ok(MenuState::Running(SelectionMode::Uniform { count, difficulty }))
    }

    fn running(&mut self, mode: SelectionMode) -> io::Result<MenuState> {
        let selection = mode.select(
            self.catalog.entries(),
            &self.stats,
            &self.config,
            &mut self.rng,
        );
        if let Some(notice) = selection.notice {
            self.screen.notice(notice)?;
        }
        if selection.questions.is_empty() {
            return Ok(MenuState::MainMenu);
        }

        self.screen.quiz_start(selection.questions.len())?;
        let outcome = run_session(
            &selection.questions,
            &mut self.stats,
            &mut self.input,
            &mut self.screen,
        )?;

        match outcome.exit {
            None => Ok(MenuState::Results(outcome.result)),
            Some(reason) => {
                // keep totals in step with the mistakes already counted
                self.stats.fold_session(&outcome.result);
                Ok(MenuState::Exit(reason))
            }
        }
    }

    fn results(&mut self, result: SessionResult) -> io::Result<MenuState> {
        self.screen.results(&result)?;
        if self.stats.fold_session(&result) {
            tracing::debug!(
                answered = result.answered,
                correct = result.correct,
                "session folded into lifetime statistics"
            );
        }
        Ok(MenuState::MainMenu)
    }
}
