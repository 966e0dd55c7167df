//! Off-thread image loading.
//!
//! A load is identified by a [`LoadTicket`] handed out by the session. Decoding runs on the rayon
//! pool and the result comes back as a [`LoadOutcome`]; the session compares the ticket's
//! generation against the newest request for that slot and drops outcomes that were overtaken.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::{
    assets::{decode::Raster, source::AssetSource},
    foundation::error::TintmarkResult,
};

/// Which piece of render state a load will replace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Background,
    Logo,
}

/// What a load is for, so the session can record it once the image arrives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadTarget {
    GalleryBackground { name: String },
    UploadedBackground { name: String },
    Logo { name: String },
}

impl LoadTarget {
    pub fn slot(&self) -> Slot {
        match self {
            LoadTarget::GalleryBackground { .. } | LoadTarget::UploadedBackground { .. } => {
                Slot::Background
            }
            LoadTarget::Logo { .. } => Slot::Logo,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub(crate) target: LoadTarget,
    pub(crate) generation: u64,
}

impl LoadTicket {
    pub fn target(&self) -> &LoadTarget {
        &self.target
    }

    pub fn slot(&self) -> Slot {
        self.target.slot()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub result: TintmarkResult<Raster>,
}

impl LoadOutcome {
    /// Decode on the calling thread.
    pub fn run(ticket: LoadTicket, source: &AssetSource) -> Self {
        Self {
            ticket,
            result: source.load(),
        }
    }
}

/// Channel-backed loader running decodes on the rayon pool.
pub struct Loader {
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn spawn(&self, ticket: LoadTicket, source: AssetSource) {
        let tx = self.tx.clone();
        tracing::debug!(slot = ?ticket.slot(), generation = ticket.generation, "spawn load");
        rayon::spawn(move || {
            let outcome = LoadOutcome::run(ticket, &source);
            // The receiving side may have been dropped with the session; nothing to report then.
            let _ = tx.send(outcome);
        });
    }

    /// Block until the next outcome arrives.
    ///
    /// The loader holds its own sender, so the channel never disconnects and this does not
    /// return `None` in practice. Calling it with no load in flight blocks forever; poll with
    /// [`Self::try_recv`] when that is possible.
    pub fn recv(&self) -> Option<LoadOutcome> {
        self.rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(o) => Some(o),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
