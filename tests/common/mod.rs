#![allow(dead_code)]

use derdiedas::catalog::{Article, Catalog, WordEntry};
use derdiedas::config::Config;
use derdiedas::controller::App;
use derdiedas::display::{DisplayOptions, Screen};
use derdiedas::runtime::{InputEvent, InputSource};
use derdiedas::stats::FileStatsStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

/// Output buffer the test can read while the app still owns a handle to it
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub enum Step {
    /// Type this line verbatim
    Say(&'static str),
    /// Type the right article for the word currently asked
    Correct,
    /// Type an article that is wrong for the word currently asked
    Wrong,
    /// Deliver a termination signal
    Interrupt,
}

/// Input source that reads the question off the screen to pick its answer
pub struct Tutor {
    words: Vec<WordEntry>,
    screen: SharedBuffer,
    steps: VecDeque<Step>,
}

impl Tutor {
    pub fn new(words: &[WordEntry], screen: SharedBuffer, steps: Vec<Step>) -> Self {
        Self {
            words: words.to_vec(),
            screen,
            steps: steps.into(),
        }
    }

    fn current_word(&self) -> WordEntry {
        let out = self.screen.contents();
        let marker = "What is the article for ";
        let start = out.rfind(marker).expect("no question on screen") + marker.len();
        let end = start + out[start..].find('?').expect("unterminated question");
        let term = &out[start..end];
        self.words
            .iter()
            .find(|w| w.term == term)
            .cloned()
            .unwrap_or_else(|| panic!("unknown word on screen: {term}"))
    }
}

impl InputSource for Tutor {
    fn next_event(&mut self) -> InputEvent {
        match self.steps.pop_front() {
            None => InputEvent::Closed,
            Some(Step::Say(line)) => InputEvent::Line(line.to_string()),
            Some(Step::Interrupt) => InputEvent::Interrupted,
            Some(Step::Correct) => InputEvent::Line(self.current_word().article.to_string()),
            Some(Step::Wrong) => {
                let right = self.current_word().article;
                let wrong = Article::ALL
                    .into_iter()
                    .find(|a| *a != right)
                    .expect("three articles");
                InputEvent::Line(wrong.to_string())
            }
        }
    }
}

pub fn haus_tisch() -> Vec<WordEntry> {
    vec![
        WordEntry::new("Haus", Article::Das),
        WordEntry::new("Tisch", Article::Der),
    ]
}

pub fn first_asked(output: &str) -> String {
    let marker = "What is the article for ";
    let start = output.find(marker).expect("no question asked") + marker.len();
    let end = start + output[start..].find('?').expect("unterminated question");
    output[start..end].to_string()
}

pub type TestApp = App<FileStatsStore, Tutor, SharedBuffer>;

pub fn build_app(words: Vec<WordEntry>, data_dir: &Path, steps: Vec<Step>) -> (TestApp, SharedBuffer) {
    let screen = SharedBuffer::default();
    let tutor = Tutor::new(&words, screen.clone(), steps);
    let app = App::new(
        Catalog::from_entries(words).expect("non-empty catalog"),
        FileStatsStore::with_path(data_dir.join("stats.json")),
        Config::default(),
        tutor,
        Screen::new(screen.clone(), DisplayOptions::plain()),
        StdRng::seed_from_u64(17),
    );
    (app, screen)
}
