// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, sync::Arc, time::Duration};

use log::debug;
use tokio::{sync::watch, time};

pub(crate) const DEFAULT_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    Success,
    Error,
    Info,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::Success => "✓",
            Self::Error => "✗",
            Self::Info => "ℹ",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Message {
    pub(crate) text: String,
    pub(crate) kind: Kind,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.text)
    }
}

#[derive(Debug, Default)]
struct Slot {
    // Bumped on every `show` so an expiry timer only clears the message it was
    // started for.
    generation: u64,
    message: Option<Message>,
}

/// Holds at most one transient status message.
pub(crate) struct Channel {
    tx: Arc<watch::Sender<Slot>>,
    lifetime: Duration,
}

impl Channel {
    pub(crate) fn new(lifetime: Duration) -> Self {
        let (tx, _) = watch::channel(Slot::default());
        Self {
            tx: Arc::new(tx),
            lifetime,
        }
    }

    /// Replaces the current message and restarts the expiry timer. Must be
    /// called from within a Tokio runtime.
    pub(crate) fn show<S: Into<String>>(&self, text: S, kind: Kind) {
        let message = Message {
            text: text.into(),
            kind,
        };
        debug!("Showing feedback: {:?}", message);

        let mut generation = 0;
        self.tx.send_modify(|slot| {
            slot.generation += 1;
            generation = slot.generation;
            slot.message = Some(message);
        });

        let tx = Arc::clone(&self.tx);
        let lifetime = self.lifetime;
        _ = tokio::spawn(async move {
            time::sleep(lifetime).await;
            _ = tx.send_if_modified(|slot| {
                if slot.generation != generation || slot.message.is_none() {
                    return false;
                }
                slot.message = None;
                true
            });
        });
    }

    pub(crate) fn success<S: Into<String>>(&self, text: S) {
        self.show(text, Kind::Success);
    }

    pub(crate) fn error<S: Into<String>>(&self, text: S) {
        self.show(text, Kind::Error);
    }

    pub(crate) fn info<S: Into<String>>(&self, text: S) {
        self.show(text, Kind::Info);
    }

    pub(crate) fn current(&self) -> Option<Message> {
        self.tx.borrow().message.clone()
    }

    pub(crate) fn subscribe(&self) -> Receiver {
        Receiver(self.tx.subscribe())
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::new(DEFAULT_LIFETIME)
    }
}

pub(crate) struct Receiver(watch::Receiver<Slot>);

impl Receiver {
    /// Waits for the next change: `Some` for a newly shown message, `None` when
    /// the current one expires. Returns `Err` once the channel is gone.
    pub(crate) async fn changed(&mut self) -> Result<Option<Message>, watch::error::RecvError> {
        self.0.changed().await?;
        Ok(self.0.borrow_and_update().message.clone())
    }
}
