use burn::{
    module::Module,
    nn::{
        Linear, LinearConfig, PaddingConfig2d,
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
    },
    tensor::{Tensor, activation::relu, backend::Backend},
};

/// 两次 2x2 池化后仍需至少 1x1 的特征图。
pub const MIN_INPUT_SIZE: usize = 4;

/// 单通道手写数字分类用的小型 CNN。
#[derive(Module, Debug)]
pub struct DigitNet<B: Backend> {
    conv1: Conv2d<B>,
    conv2: Conv2d<B>,
    pool1: MaxPool2d,
    pool2: MaxPool2d,
    fc1: Linear<B>,
    fc_out: Linear<B>,
}

impl<B: Backend> DigitNet<B> {
    /// 创建网络。
    ///
    /// # 参数
    /// - `device`: 设备（对 NdArray 后端即 CPU）。
    /// - `input_size`: 输入方图边长（默认 28）。
    /// - `num_classes`: 类别数量。
    pub fn new(device: &B::Device, input_size: usize, num_classes: usize) -> Self {
        assert!(
            input_size >= MIN_INPUT_SIZE,
            "输入尺寸至少需要 {MIN_INPUT_SIZE}x{MIN_INPUT_SIZE}，当前为 {0}x{0}",
            input_size
        );

        let conv1 = Conv2dConfig::new([1, 16], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);

        let conv2 = Conv2dConfig::new([16, 32], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);

        let pool1 = MaxPool2dConfig::new([2, 2]).init();
        let pool2 = MaxPool2dConfig::new([2, 2]).init();

        let side_after = (input_size / 2).max(1) / 2;
        let flattened = 32 * side_after * side_after;

        let fc1 = LinearConfig::new(flattened, 128).init(device);
        let fc_out = LinearConfig::new(128, num_classes).init(device);

        Self {
            conv1,
            conv2,
            pool1,
            pool2,
            fc1,
            fc_out,
        }
    }

    /// 前向推理，输入形状 `[batch, 1, size, size]`，返回 logits。
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = relu(self.conv1.forward(input));
        let x = self.pool1.forward(x);

        let x = relu(self.conv2.forward(x));
        let x = self.pool2.forward(x);

        let x = x.flatten(1, 3);
        let x = relu(self.fc1.forward(x));
        self.fc_out.forward(x)
    }
}
