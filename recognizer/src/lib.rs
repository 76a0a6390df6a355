#![recursion_limit = "256"]

//! Classifies the gesture boxes recorded by [`sketch`]: each box is cropped
//! out of the surface snapshot, resized to the model's input square,
//! collapsed to one intensity channel and run through a digit model.
//!
//! The model sits behind [`DigitModel`]; [`BurnDigitModel`] is the bundled
//! CNN on burn's NdArray backend. [`ModelSlot`] gates classification until
//! the model has been loaded and warmed up.

pub mod classifier;
pub mod config;
pub mod display;
pub mod error;
pub mod inference;
pub mod model;
pub mod preprocess;
pub mod slot;

pub use classifier::{BoxClassifier, ClassificationResult, Classifications, final_output};
pub use config::{ClassifierOptions, DEFAULT_INPUT_SIZE, ModelConfig};
pub use display::{ConsoleSink, DisplaySink, Transcript};
pub use error::{RecognizerError, RecognizerResult};
pub use inference::{BurnDigitModel, DIGIT_LABELS, DigitModel, IntensityImage, default_labels};
pub use model::{DigitNet, MIN_INPUT_SIZE};
pub use slot::{ModelSlot, ModelStatus};
