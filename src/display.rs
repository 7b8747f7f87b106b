use crate::catalog::{Article, Catalog, WordEntry};
use crate::config::Config;
use crate::selection::SelectionNotice;
use crate::session::SessionResult;
use crate::stats::StatisticsRecord;
use crate::util::ScoreBand;
use crossterm::style::{style, Color, Stylize};
use crossterm::tty::IsTty;
use std::fmt::Display;
use std::io::{self, Write};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const RULE_WIDTH: usize = 40;

/// Presentation settings resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub color_enabled: bool,
}

impl DisplayOptions {
    pub fn plain() -> Self {
        Self {
            color_enabled: false,
        }
    }

    /// Color only when asked for, `NO_COLOR` is unset, `TERM` is usable and
    /// stdout is a terminal.
    pub fn detect(requested: bool) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        let term = std::env::var("TERM").unwrap_or_default();
        Self {
            color_enabled: Self::resolve(requested, no_color, &term, io::stdout().is_tty()),
        }
    }

    fn resolve(requested: bool, no_color: bool, term: &str, is_tty: bool) -> bool {
        requested && !no_color && !term.is_empty() && term != "dumb" && is_tty
    }

    fn paint(&self, text: impl Display, tone: Tone) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        let styled = style(text);
        match tone {
            Tone::Title => styled.with(Color::Blue).bold().to_string(),
            Tone::Strong => styled.bold().to_string(),
            Tone::Accent => styled.with(Color::Cyan).to_string(),
            Tone::Good => styled.with(Color::Green).to_string(),
            Tone::Warn => styled.with(Color::Yellow).to_string(),
            Tone::Bad => styled.with(Color::Red).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Title,
    Strong,
    Accent,
    Good,
    Warn,
    Bad,
}

impl From<ScoreBand> for Tone {
    fn from(band: ScoreBand) -> Self {
        match band {
            ScoreBand::Good => Tone::Good,
            ScoreBand::Fair => Tone::Warn,
            ScoreBand::Poor => Tone::Bad,
        }
    }
}

/// Line-oriented terminal output for menus, questions and reports
pub struct Screen<W: Write> {
    out: W,
    options: DisplayOptions,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, options: DisplayOptions) -> Self {
        Self { out, options }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print a prompt without a newline and make sure it is visible
    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn welcome(&mut self, stats: &StatisticsRecord) -> io::Result<()> {
        writeln!(self.out, "{}\n", self.options.paint("=== German Article Quiz ===", Tone::Title))?;
        match stats.accuracy() {
            Some(acc) => {
                writeln!(
                    self.out,
                    "Welcome back! Your overall accuracy: {}",
                    self.options.paint(format!("{acc:.1}%"), Tone::Accent)
                )?;
                writeln!(self.out, "Total quizzes completed: {}\n", stats.total_quizzes)
            }
            None => writeln!(
                self.out,
                "Welcome! Let's start with a quick quiz to build your stats.\n"
            ),
        }
    }

    pub fn main_menu(&mut self, config: &Config) -> io::Result<()> {
        writeln!(self.out, "\n{}", self.options.paint("Main Menu:", Tone::Strong))?;
        writeln!(
            self.out,
            "1. Quick Quiz ({} questions)",
            config.quick_quiz_questions
        )?;
        writeln!(self.out, "2. Custom Quiz")?;
        writeln!(self.out, "3. View Statistics")?;
        writeln!(self.out, "4. Practice Mode (focus on mistakes)")?;
        writeln!(self.out, "q. Quit")?;
        self.prompt("\nYour choice: ")
    }

    pub fn invalid_choice(&mut self) -> io::Result<()> {
        let msg = self.options.paint("Invalid choice. Please try again.", Tone::Bad);
        writeln!(self.out, "{msg}")
    }

    pub fn question_count_prompt(&mut self, config: &Config) -> io::Result<()> {
        self.prompt(&format!(
            "\nHow many questions? ({}-{}): ",
            config.custom_min_questions, config.custom_max_questions
        ))
    }

    pub fn invalid_question_count(&mut self, default: usize) -> io::Result<()> {
        let msg = self.options.paint(format!("Invalid number. Using default of {default}."), Tone::Bad);
        writeln!(self.out, "{msg}")
    }

    pub fn difficulty_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nSelect difficulty:")?;
        writeln!(self.out, "1. All levels")?;
        writeln!(self.out, "2. Easy only")?;
        writeln!(self.out, "3. Medium only")?;
        writeln!(self.out, "4. Hard only")?;
        self.prompt("Your choice: ")
    }

    pub fn notice(&mut self, notice: SelectionNotice) -> io::Result<()> {
        let msg = match notice {
            SelectionNotice::DifficultyFallback(d) => self.options.paint(
                format!("No words found for '{d}'. Using all levels."),
                Tone::Warn,
            ),
            SelectionNotice::Practicing { words } => self.options.paint(
                format!("\nPractice Mode: Focusing on {words} challenging words"),
                Tone::Warn,
            ),
            SelectionNotice::NothingToPractice => {
                self.options.paint("\nNo mistakes to practice yet! Great job!", Tone::Good)
            }
        };
        writeln!(self.out, "{msg}")
    }

    pub fn quiz_start(&mut self, questions: usize) -> io::Result<()> {
        let banner = self.options.paint(format!("Starting quiz with {questions} questions..."), Tone::Accent);
        writeln!(self.out, "\n{}", self.options.paint(banner, Tone::Strong))?;
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))
    }

    pub fn question(&mut self, word: &WordEntry, current: usize, total: usize) -> io::Result<()> {
        writeln!(
            self.out,
            "\n{}",
            self.options.paint(format!("Question {current}/{total}"), Tone::Strong)
        )?;
        if let Some(ref en) = word.translation {
            writeln!(self.out, "({})", self.options.paint(en, Tone::Accent))?;
        }
        writeln!(
            self.out,
            "\nWhat is the article for {}?",
            self.options.paint(&word.term, Tone::Strong)
        )?;
        for article in Article::ALL {
            let number = self.options.paint(format!("{}.", article.shortcut()), Tone::Warn);
            writeln!(self.out, "  {number} {article}")?;
        }
        writeln!(
            self.out,
            "\nType 1-3 or 'der/die/das'. '?': hint, 's': skip, 'q': quit quiz"
        )
    }

    pub fn answer_prompt(&mut self) -> io::Result<()> {
        self.prompt("Your answer: ")
    }

    pub fn hint(&mut self, word: &WordEntry) -> io::Result<()> {
        let parts = word.hint_parts();
        if parts.is_empty() {
            writeln!(self.out, "No hint available.")
        } else {
            writeln!(self.out, "Hint: {}", parts.join(" | "))
        }
    }

    pub fn invalid_answer(&mut self) -> io::Result<()> {
        let msg = self.options.paint(
            "Invalid input. Try 1/2/3 or der/die/das ('?': hint).",
            Tone::Bad,
        );
        writeln!(self.out, "{msg}")
    }

    pub fn correct(&mut self, word: &WordEntry) -> io::Result<()> {
        let mark = self.options.paint("✓ Correct!", Tone::Good);
        match word.plural {
            Some(ref plural) => writeln!(self.out, "{mark} (Plural: {plural})"),
            None => writeln!(self.out, "{mark}"),
        }
    }

    pub fn wrong(&mut self, word: &WordEntry) -> io::Result<()> {
        writeln!(
            self.out,
            "{} The correct answer is {} {}",
            self.options.paint("✗ Wrong!", Tone::Bad),
            self.options.paint(word.article, Tone::Good),
            word.term
        )
    }

    pub fn quiz_quit(&mut self) -> io::Result<()> {
        let msg = self.options.paint("Exiting quiz early...", Tone::Warn);
        writeln!(self.out, "{msg}")
    }

    pub fn results(&mut self, session: &SessionResult) -> io::Result<()> {
        let Some(score) = session.score() else {
            let msg = self.options.paint("No answers recorded.", Tone::Warn);
            return writeln!(self.out, "\n{msg}");
        };

        writeln!(self.out, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.out, "{}", self.options.paint("Quiz Complete!", Tone::Strong))?;
        writeln!(self.out, "Time: {}", format_duration(session.elapsed()))?;
        writeln!(
            self.out,
            "Score: {}",
            self.options.paint(
                format!("{}/{} ({score:.1}%)", session.correct, session.answered),
                ScoreBand::for_percentage(score).into(),
            )
        )?;

        if !session.mistakes.is_empty() {
            writeln!(self.out, "\n{}", self.options.paint("Mistakes to review:", Tone::Warn))?;
            for m in &session.mistakes {
                let mut line = format!("• {} {}", self.options.paint(m.correct_answer, Tone::Strong), m.term);
                if let Some(ref en) = m.translation {
                    line.push_str(&format!(" ({en})"));
                }
                line.push_str(&format!(" - you said: {}", self.options.paint(m.user_answer, Tone::Bad)));
                writeln!(self.out, "{line}")?;
            }
        }

        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))
    }

    pub fn statistics(
        &mut self,
        stats: &StatisticsRecord,
        catalog: &Catalog,
        top_n: usize,
    ) -> io::Result<()> {
        let Some(accuracy) = stats.accuracy() else {
            let msg = self.options.paint("No statistics available yet. Take a quiz first!", Tone::Warn);
            return writeln!(self.out, "\n{msg}");
        };

        let heading = self.options.paint("Overall Statistics:", Tone::Accent);
        writeln!(self.out, "\n{}", self.options.paint(heading, Tone::Strong))?;
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(self.out, "Total Quizzes: {}", stats.total_quizzes)?;
        writeln!(self.out, "Total Questions: {}", stats.total_questions)?;
        writeln!(self.out, "Correct Answers: {}", stats.correct_answers)?;
        writeln!(
            self.out,
            "Overall Accuracy: {}",
            self.options.paint(
                format!("{accuracy:.1}%"),
                ScoreBand::for_percentage(accuracy).into()
            )
        )?;

        let missed = stats.top_missed(catalog, top_n);
        if missed.is_empty() {
            return Ok(());
        }

        writeln!(self.out, "\n{}", self.options.paint("Most Challenging Words:", Tone::Warn))?;
        let width = missed
            .iter()
            .map(|m| m.entry.article.to_string().width() + 1 + m.entry.term.width())
            .max()
            .unwrap_or(0);
        for m in &missed {
            let label = format!("{} {}", m.entry.article, m.entry.term);
            let pad = " ".repeat(width - label.width());
            writeln!(self.out, "• {label}{pad} - missed {} time(s)", m.count)?;
        }
        Ok(())
    }

    pub fn goodbye(&mut self) -> io::Result<()> {
        let msg = self.options.paint("Tschüss! Keep practicing!", Tone::Warn);
        writeln!(self.out, "\n{msg}")
    }

    pub fn input_closed(&mut self) -> io::Result<()> {
        let msg = self.options.paint("Input closed. Exiting...", Tone::Warn);
        writeln!(self.out, "\n{msg}")
    }

    pub fn interrupted(&mut self) -> io::Result<()> {
        let msg = self.options.paint("Saving stats and exiting...", Tone::Warn);
        writeln!(self.out, "\n{msg}")
    }
}

/// Compact `1m5s` style rendering of whole seconds
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    match (secs / 3600, secs / 60 % 60, secs % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m{s}s"),
        (h, m, s) => format!("{h}h{m}m{s}s"),
    }
}
