use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;

/// Unified event type consumed by the controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// One line of user input, trailing newline removed
    Line(String),
    /// The input stream reached EOF or failed
    Closed,
    /// SIGINT or SIGTERM was received
    Interrupted,
}

/// Why the program is leaving the main loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    InputClosed,
    Interrupted,
}

/// Source of user input lines and process-level events
pub trait InputSource {
    /// Block until the next event. Once `Closed` has been returned, every
    /// later call returns `Closed` again.
    fn next_event(&mut self) -> InputEvent;
}

/// Lines read ahead of the quiz before the reader thread blocks
const LINE_BUFFER: usize = 16;

/// Production source: a stdin reader thread and a signal listener thread
/// feeding one bounded channel. A delivered signal also raises `interrupted`,
/// which is checked before any queued line is handed out.
pub struct ChannelInputSource {
    rx: Receiver<InputEvent>,
    interrupted: Arc<AtomicBool>,
    closed: bool,
}

impl ChannelInputSource {
    pub fn new(rx: Receiver<InputEvent>, interrupted: Arc<AtomicBool>) -> Self {
        Self {
            rx,
            interrupted,
            closed: false,
        }
    }

    /// Wire up stdin and termination signals
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::sync_channel(LINE_BUFFER);
        let interrupted = Arc::new(AtomicBool::new(false));
        spawn_signal_listener(tx.clone(), Arc::clone(&interrupted));
        spawn_line_reader(BufReader::new(std::io::stdin()), tx);
        Self::new(rx, interrupted)
    }
}

impl InputSource for ChannelInputSource {
    fn next_event(&mut self) -> InputEvent {
        if self.interrupted.load(Ordering::SeqCst) {
            return InputEvent::Interrupted;
        }
        if self.closed {
            return InputEvent::Closed;
        }
        match self.rx.recv() {
            Ok(_) if self.interrupted.load(Ordering::SeqCst) => InputEvent::Interrupted,
            Ok(InputEvent::Closed) | Err(_) => {
                self.closed = true;
                InputEvent::Closed
            }
            Ok(ev) => ev,
        }
    }
}

/// Raise the flag, then wake a reader blocked in `recv`. A full queue already
/// guarantees a wake-up, so that send may be dropped.
pub fn deliver_interrupt(interrupted: &AtomicBool, tx: &SyncSender<InputEvent>) {
    interrupted.store(true, Ordering::SeqCst);
    let _ = tx.try_send(InputEvent::Interrupted);
}

/// Forward lines from `reader` until EOF, then send `Closed`. Bytes that are
/// not UTF-8 are passed on lossily so they reach the answer parser.
pub fn spawn_line_reader<R>(mut reader: R, tx: SyncSender<InputEvent>)
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches('\n').trim_end_matches('\r');
                    if tx.send(InputEvent::Line(line.to_string())).is_err() {
                        return;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!("stdin read failed: {e}");
                    break;
                }
            }
        }
        let _ = tx.send(InputEvent::Closed);
    });
}

/// Deliver the first SIGINT/SIGTERM as an `Interrupted` event.
pub fn spawn_signal_listener(tx: SyncSender<InputEvent>, interrupted: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::warn!("signal handling unavailable: {e}");
                return;
            }
        };

        runtime.block_on(async {
            wait_for_termination().await;
        });
        tracing::debug!("termination signal received");
        deliver_interrupt(&interrupted, &tx);
    });
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("cannot listen for SIGTERM: {e}");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Test source replaying fixed lines, then reporting the stream as closed
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: lines
                .into_iter()
                .map(|l| InputEvent::Line(l.into()))
                .collect(),
        }
    }

    /// Queue an arbitrary event after the lines given so far
    pub fn then(mut self, event: InputEvent) -> Self {
        self.events.push_back(event);
        self
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> InputEvent {
        self.events.pop_front().unwrap_or(InputEvent::Closed)
    }
}
