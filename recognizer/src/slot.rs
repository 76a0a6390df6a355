use crate::error::{RecognizerError, RecognizerResult};
use crate::inference::{DigitModel, IntensityImage};
use anyhow::anyhow;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Observable lifecycle of a [`ModelSlot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelStatus {
    Uninitialized,
    Initializing,
    Ready,
    Failed(String),
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelStatus::Uninitialized => f.write_str("uninitialized"),
            ModelStatus::Initializing => f.write_str("initializing"),
            ModelStatus::Ready => f.write_str("ready"),
            ModelStatus::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

enum SlotState<M> {
    Uninitialized,
    Initializing,
    Ready(Arc<Mutex<M>>),
    Failed(String),
}

/// Holds the classifier model through `Uninitialized -> Initializing ->
/// Ready | Failed`. Each slot is initialized at most once.
///
/// Clones share the same state, so a slot can be handed to a loader thread
/// while the caller keeps recording gestures.
pub struct ModelSlot<M> {
    state: Arc<RwLock<SlotState<M>>>,
}

impl<M> Clone for ModelSlot<M> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<M> Default for ModelSlot<M> {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(SlotState::Uninitialized)),
        }
    }
}

impl<M: DigitModel + 'static> ModelSlot<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that is already `Ready` with `model`.
    pub fn ready(model: M) -> RecognizerResult<Self> {
        let slot = Self::new();
        slot.initialize(|| Ok(model))?;
        Ok(slot)
    }

    pub fn status(&self) -> ModelStatus {
        status_of(&self.state.read())
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.state.read(), SlotState::Ready(_))
    }

    /// Load and warm up the model on the calling thread. A panicking loader
    /// leaves the slot `Failed`.
    pub fn initialize<F>(&self, loader: F) -> RecognizerResult<()>
    where
        F: FnOnce() -> anyhow::Result<M>,
    {
        self.begin()?;
        self.finish(load_and_warm_up(loader))
    }

    /// Load and warm up the model on a background thread. The slot is
    /// `Initializing` as soon as this returns.
    pub fn spawn_initialize<F>(&self, loader: F) -> RecognizerResult<JoinHandle<RecognizerResult<()>>>
    where
        F: FnOnce() -> anyhow::Result<M> + Send + 'static,
    {
        self.begin()?;
        let slot = self.clone();
        Ok(thread::spawn(move || slot.finish(load_and_warm_up(loader))))
    }

    /// The ready model, or `NotReady` in any other state.
    pub fn model(&self) -> RecognizerResult<Arc<Mutex<M>>> {
        let state = self.state.read();
        match &*state {
            SlotState::Ready(model) => Ok(Arc::clone(model)),
            other => Err(RecognizerError::NotReady {
                status: status_of(other),
            }),
        }
    }

    fn begin(&self) -> RecognizerResult<()> {
        let mut state = self.state.write();
        match *state {
            SlotState::Uninitialized => {
                *state = SlotState::Initializing;
                Ok(())
            }
            _ => Err(RecognizerError::AlreadyInitialized),
        }
    }

    fn finish(&self, loaded: anyhow::Result<M>) -> RecognizerResult<()> {
        match loaded {
            Ok(model) => {
                *self.state.write() = SlotState::Ready(Arc::new(Mutex::new(model)));
                info!("digit model ready");
                Ok(())
            }
            Err(err) => {
                warn!("digit model failed to initialize: {err:#}");
                *self.state.write() = SlotState::Failed(format!("{err:#}"));
                Err(RecognizerError::Model(err))
            }
        }
    }
}

fn status_of<M>(state: &SlotState<M>) -> ModelStatus {
    match state {
        SlotState::Uninitialized => ModelStatus::Uninitialized,
        SlotState::Initializing => ModelStatus::Initializing,
        SlotState::Ready(_) => ModelStatus::Ready,
        SlotState::Failed(reason) => ModelStatus::Failed(reason.clone()),
    }
}

// Runs the loader and the warm-up with panics turned into errors, so the
// slot never stays `Initializing`.
fn load_and_warm_up<M, F>(loader: F) -> anyhow::Result<M>
where
    M: DigitModel,
    F: FnOnce() -> anyhow::Result<M>,
{
    panic::catch_unwind(AssertUnwindSafe(|| loader().and_then(warm_up)))
        .unwrap_or_else(|payload| Err(anyhow!("model loader panicked: {}", panic_reason(&*payload))))
}

// Throwaway prediction on a blank input before the slot turns Ready.
fn warm_up<M: DigitModel>(model: M) -> anyhow::Result<M> {
    model.predict(&IntensityImage::zeros(model.input_size()))?;
    Ok(model)
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
