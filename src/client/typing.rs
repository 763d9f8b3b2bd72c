use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Instant, sleep_until};

use crate::event::model::Command;
use crate::user;

/// Keystroke inactivity window after which the peer stops seeing "typing".
const TYPING_IDLE: Duration = Duration::from_secs(1);

struct State {
    typing: bool,
    deadline: Instant,
}

/// Sender-side debounce of typing signals. `pressed` emits one
/// `typing_start` per burst and keeps pushing the idle deadline; the watcher
/// task emits exactly one `typing_stop` when the deadline lapses. The server
/// side stays a pure relay and owns no timers.
#[derive(Clone)]
pub struct TypingSignal {
    recipient: user::Sub,
    commands: UnboundedSender<Command>,
    state: Arc<Mutex<State>>,
}

impl TypingSignal {
    pub fn new(recipient: user::Sub, commands: UnboundedSender<Command>) -> Self {
        Self {
            recipient,
            commands,
            state: Arc::new(Mutex::new(State {
                typing: false,
                deadline: Instant::now(),
            })),
        }
    }

    pub async fn pressed(&self) {
        let mut state = self.state.lock().await;
        state.deadline = Instant::now() + TYPING_IDLE;

        if !state.typing {
            state.typing = true;
            let _ = self.commands.send(Command::TypingStart {
                recipient: self.recipient.clone(),
            });

            tokio::spawn(expire(
                self.state.clone(),
                self.recipient.clone(),
                self.commands.clone(),
            ));
        }
    }

    /// Explicit stop, e.g. the message was sent or the input cleared.
    pub async fn stopped(&self) {
        let mut state = self.state.lock().await;

        if state.typing {
            state.typing = false;
            let _ = self.commands.send(Command::TypingStop {
                recipient: self.recipient.clone(),
            });
        }
    }
}

async fn expire(state: Arc<Mutex<State>>, recipient: user::Sub, commands: UnboundedSender<Command>) {
    loop {
        let deadline = state.lock().await.deadline;
        sleep_until(deadline).await;

        let mut state = state.lock().await;
        if !state.typing {
            // an explicit stop already went out
            break;
        }

        if Instant::now() >= state.deadline {
            state.typing = false;
            let _ = commands.send(Command::TypingStop { recipient });
            break;
        }
        // a later keystroke moved the deadline, keep waiting
    }
}
