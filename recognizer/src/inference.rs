use crate::config::ModelConfig;
use crate::model::{DigitNet, MIN_INPUT_SIZE};
use anyhow::{Context, Result, anyhow};
use burn::module::Module;
use burn::record::{DefaultFileRecorder, FullPrecisionSettings};
use burn::tensor::{Tensor, TensorData, activation::softmax, backend::Backend};
use std::fs::File;
use tracing::{debug, info};

/// 默认使用 CPU（NdArray）后端，避免依赖特定图形 API，便于跨平台编译。
type InferenceBackend = burn::backend::ndarray::NdArray<f32>;

/// 模型的标签集合：数字 0-9。
pub const DIGIT_LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

pub fn default_labels() -> Vec<String> {
    DIGIT_LABELS.iter().map(|s| s.to_string()).collect()
}

/// 单通道方图，按行存储，像素取值 `[0, 1]`。
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityImage {
    size: usize,
    data: Vec<f32>,
}

impl IntensityImage {
    pub fn new(size: usize, data: Vec<f32>) -> Result<Self> {
        anyhow::ensure!(
            data.len() == size * size,
            "像素数量 {} 与尺寸 {size}x{size} 不符",
            data.len()
        );
        Ok(Self { size, data })
    }

    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    /// 按 `(x, y)` 逐像素生成。
    pub fn from_fn(size: usize, mut pixel: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                data.push(pixel(x, y));
            }
        }
        Self { size, data }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.data.get(y * self.size + x).copied()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// 外部分类器的抽象：输入归一化单通道方图，输出标签集合上的概率分布。
pub trait DigitModel: Send {
    /// 按类别编号排列的标签。
    fn labels(&self) -> &[String];

    /// 模型期望的输入边长。
    fn input_size(&self) -> usize;

    /// 返回与 `labels()` 等长的概率分布。
    fn predict(&self, image: &IntensityImage) -> Result<Vec<f32>>;
}

/// 取概率最大的类别；并列时取编号最小者。
pub fn top_class(probabilities: &[f32]) -> Option<(usize, f32)> {
    probabilities
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (idx, prob)| match best {
            Some((_, best_prob)) if best_prob >= prob => best,
            _ => Some((idx, prob)),
        })
}

/// 封装 Burn 模型，可在运行时复用。
pub struct BurnDigitModel {
    device: <InferenceBackend as Backend>::Device,
    model: DigitNet<InferenceBackend>,
    labels: Vec<String>,
    size: usize,
}

impl BurnDigitModel {
    /// 根据给定配置加载模型权重与标签映射。
    pub fn load(config: &ModelConfig) -> Result<Self> {
        anyhow::ensure!(
            config.input_size >= MIN_INPUT_SIZE,
            "输入尺寸至少需要 {MIN_INPUT_SIZE}x{MIN_INPUT_SIZE}，配置为 {0}x{0}",
            config.input_size
        );

        let labels = match &config.labels_path {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("无法读取标签文件：{}", path.display()))?;
                let labels: Vec<String> = serde_json::from_reader(file)
                    .with_context(|| format!("解析标签文件失败：{}", path.display()))?;
                if labels.is_empty() {
                    anyhow::bail!("标签列表为空：{}", path.display());
                }
                labels
            }
            None => default_labels(),
        };

        let mut digits = Self::with_random_weights(labels, config.input_size);
        digits.model = digits
            .model
            .load_file(
                &config.weight_path,
                &DefaultFileRecorder::<FullPrecisionSettings>::new(),
                &digits.device,
            )
            .with_context(|| format!("加载模型权重失败：{}", config.weight_path.display()))?;

        info!(
            weights = %config.weight_path.display(),
            classes = digits.labels.len(),
            input_size = digits.size,
            "digit model loaded"
        );
        Ok(digits)
    }

    /// 未经训练的随机权重模型，仅用于冒烟测试。
    pub fn with_random_weights(labels: Vec<String>, input_size: usize) -> Self {
        let device = <InferenceBackend as Backend>::Device::default();
        let model = DigitNet::<InferenceBackend>::new(&device, input_size, labels.len());
        Self {
            device,
            model,
            labels,
            size: input_size,
        }
    }

    fn to_tensor(&self, image: &IntensityImage) -> Tensor<InferenceBackend, 4> {
        Tensor::<InferenceBackend, 4>::from_data(
            TensorData::new(image.as_slice().to_vec(), [1, 1, self.size, self.size]),
            &self.device,
        )
    }
}

impl DigitModel for BurnDigitModel {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn input_size(&self) -> usize {
        self.size
    }

    fn predict(&self, image: &IntensityImage) -> Result<Vec<f32>> {
        anyhow::ensure!(
            image.size() == self.size,
            "输入尺寸 {0}x{0} 与模型期望的 {1}x{1} 不符",
            image.size(),
            self.size
        );

        let logits = self.model.forward(self.to_tensor(image));
        let probabilities = softmax(logits, 1)
            .into_data()
            .into_vec::<f32>()
            .map_err(|err| anyhow!("读取概率分布失败：{err:?}"))?;

        debug!(?probabilities, "digit model output");
        Ok(probabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_model_outputs_a_distribution() {
        let model = BurnDigitModel::with_random_weights(default_labels(), 28);
        let probs = model.predict(&IntensityImage::zeros(28)).unwrap();

        assert_eq!(probs.len(), 10);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-4, "sum was {total}");
    }

    #[test]
    fn wrong_input_size_is_rejected() {
        let model = BurnDigitModel::with_random_weights(default_labels(), 28);
        assert!(model.predict(&IntensityImage::zeros(14)).is_err());
    }

    #[test]
    fn missing_weights_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig::from_dir(dir.path(), 28);
        assert!(BurnDigitModel::load(&config).is_err());
    }

    #[test]
    fn too_small_input_size_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig::from_dir(dir.path(), 2);

        let err = BurnDigitModel::load(&config).err().unwrap();
        assert!(err.to_string().contains("2x2"), "unexpected error: {err:#}");
    }

    #[test]
    fn top_class_prefers_first_on_ties() {
        assert_eq!(top_class(&[0.1, 0.45, 0.45]), Some((1, 0.45)));
        assert_eq!(top_class(&[]), None);
    }

    #[test]
    fn intensity_image_checks_pixel_count() {
        assert!(IntensityImage::new(2, vec![0.0; 3]).is_err());
        let image = IntensityImage::new(2, vec![0.0, 0.25, 0.5, 1.0]).unwrap();
        assert_eq!(image.get(1, 1), Some(1.0));
        assert_eq!(image.get(2, 0), None);
    }
}
