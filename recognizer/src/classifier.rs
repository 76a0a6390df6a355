use crate::config::ClassifierOptions;
use crate::display::{DisplaySink, STATUS_CLASSIFYING, STATUS_NOT_READY};
use crate::error::{RecognizerError, RecognizerResult};
use crate::inference::{DigitModel, top_class};
use crate::preprocess::box_to_input;
use crate::slot::ModelSlot;
use anyhow::anyhow;
use image::RgbImage;
use parking_lot::Mutex;
use sketch::{BoundingBox, BoxList};
use std::iter::Enumerate;
use std::slice::Iter;
use std::sync::Arc;
use tracing::{debug, warn};

/// Best label for one box.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Position of the box in the list it came from.
    pub box_index: usize,
    pub label_index: usize,
    pub label: String,
    /// Probability of `label`, in `[0, 1]`.
    pub confidence: f32,
}

/// Crops every gesture box out of a surface snapshot and classifies it.
pub struct BoxClassifier<M> {
    slot: ModelSlot<M>,
    options: ClassifierOptions,
}

impl<M: DigitModel + 'static> BoxClassifier<M> {
    pub fn new(slot: ModelSlot<M>, options: ClassifierOptions) -> Self {
        Self { slot, options }
    }

    pub fn slot(&self) -> &ModelSlot<M> {
        &self.slot
    }

    /// Lazily classify `boxes` in order.
    ///
    /// Fails with `NotReady` before touching any box if the model is not
    /// loaded yet. Degenerate boxes are skipped.
    pub fn classify<'a>(
        &self,
        boxes: &'a BoxList,
        surface: &'a RgbImage,
    ) -> RecognizerResult<Classifications<'a, M>> {
        let model = self.slot.model()?;
        let (labels, input_size) = {
            let guard = model.lock();
            (guard.labels().to_vec(), guard.input_size())
        };

        debug!(boxes = boxes.len(), input_size, "classifying gesture boxes");
        Ok(Classifications {
            model,
            labels,
            input_size,
            options: self.options,
            boxes: boxes.iter().enumerate(),
            surface,
        })
    }

    pub fn classify_all(
        &self,
        boxes: &BoxList,
        surface: &RgbImage,
    ) -> RecognizerResult<Vec<ClassificationResult>> {
        self.classify(boxes, surface)?.collect()
    }

    /// Classify and report to `sink`: one `Detected:` line per box, then the
    /// concatenated labels.
    pub fn render(
        &self,
        boxes: &BoxList,
        surface: &RgbImage,
        sink: &mut dyn DisplaySink,
    ) -> RecognizerResult<Vec<ClassificationResult>> {
        let classifications = match self.classify(boxes, surface) {
            Ok(iter) => iter,
            Err(err @ RecognizerError::NotReady { .. }) => {
                sink.status(STATUS_NOT_READY);
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        sink.status(STATUS_CLASSIFYING);
        let mut results = Vec::with_capacity(boxes.len());
        for result in classifications {
            let result = result?;
            sink.line(&format!(
                "Detected: {} (confidence={:.3})",
                result.label, result.confidence
            ));
            results.push(result);
        }
        sink.line(&format!("Final Output: {}", final_output(&results)));

        Ok(results)
    }
}

/// Labels of `results` joined in order, e.g. `"427"`.
pub fn final_output(results: &[ClassificationResult]) -> String {
    results.iter().map(|r| r.label.as_str()).collect()
}

/// Iterator returned by [`BoxClassifier::classify`].
pub struct Classifications<'a, M> {
    model: Arc<Mutex<M>>,
    labels: Vec<String>,
    input_size: usize,
    options: ClassifierOptions,
    boxes: Enumerate<Iter<'a, BoundingBox>>,
    surface: &'a RgbImage,
}

impl<M: DigitModel> Classifications<'_, M> {
    fn classify_box(
        &self,
        box_index: usize,
        bbox: &BoundingBox,
    ) -> RecognizerResult<ClassificationResult> {
        let input = box_to_input(
            self.surface,
            bbox,
            self.input_size,
            self.options.normalize_y_by_height,
        );
        let probabilities = self.model.lock().predict(&input)?;
        if probabilities.len() != self.labels.len() {
            return Err(anyhow!(
                "model returned {} probabilities for {} labels",
                probabilities.len(),
                self.labels.len()
            )
            .into());
        }
        let (label_index, confidence) = top_class(&probabilities)
            .ok_or_else(|| anyhow!("model returned an empty distribution"))?;
        let label = self.labels[label_index].clone();

        debug!(box_index, %label, confidence, "box classified");
        Ok(ClassificationResult {
            box_index,
            label_index,
            label,
            confidence,
        })
    }
}

impl<M: DigitModel> Iterator for Classifications<'_, M> {
    type Item = RecognizerResult<ClassificationResult>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, bbox) = self.boxes.next()?;
            if bbox.is_degenerate() {
                warn!(index, ?bbox, "skipping degenerate box");
                continue;
            }
            return Some(self.classify_box(index, bbox));
        }
    }
}
