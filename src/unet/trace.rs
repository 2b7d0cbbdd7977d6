//! 逐层尺寸追踪：给出一个空间尺寸在编码器各层的变化，用于解释为何某个尺寸合法/不合法

use super::config::NetworkConfig;
use super::input::InputShape;
use crate::shape::{conv_output_size, round_trip_size};

/// 单个空间尺寸的逐层追踪结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTrace {
    /// 编码器各层的输入尺寸：`[v, ceil(v/s0), ceil(ceil(v/s0)/s1), ...]`，长度为深度+1
    pub encoder_sizes: Vec<usize>,
    /// 嵌套层步长之积，超出`usize`时为None
    pub inner_product: Option<usize>,
    /// 每个嵌套层的 (下采样, 上采样) 是否都恰好还原了该层输入尺寸
    pub skip_connections_exact: bool,
}

impl StageTrace {
    pub fn input_size(&self) -> usize {
        self.encoder_sizes[0]
    }

    pub fn after_first_down(&self) -> usize {
        self.encoder_sizes[1]
    }

    /// 最深处（瓶颈层）的尺寸
    pub fn bottleneck_size(&self) -> usize {
        self.encoder_sizes[self.encoder_sizes.len() - 1]
    }
}

/// 追踪单个空间尺寸；尺寸为0时返回None
///
/// # 示例
/// ```
/// use unet_size::unet::{trace_spatial_size, NetworkConfig, NormalizationKind};
///
/// let norm = NormalizationKind::LOCAL_RESPONSE;
/// let config = NetworkConfig::new(&[1, 4, 8, 16], &[3, 2, 4], norm).unwrap();
/// let trace = trace_spatial_size(&config, 22).unwrap();
/// assert_eq!(trace.encoder_sizes, vec![22, 8, 4, 1]);
/// assert!(trace.skip_connections_exact);
/// ```
pub fn trace_spatial_size(config: &NetworkConfig, size: usize) -> Option<StageTrace> {
    if size == 0 {
        return None;
    }
    let mut encoder_sizes = Vec::with_capacity(config.depth() + 1);
    encoder_sizes.push(size);
    let mut current = size;
    for &stride in config.strides() {
        current = conv_output_size(current, stride);
        encoder_sizes.push(current);
    }

    // 第 i 个嵌套层（i≥1）的输入为 encoder_sizes[i]，其下采样/上采样须还原该尺寸
    let skip_connections_exact = config
        .strides()
        .iter()
        .enumerate()
        .skip(1)
        .all(|(level, &stride)| {
            round_trip_size(encoder_sizes[level], stride) == Some(encoder_sizes[level])
        });

    Some(StageTrace {
        encoder_sizes,
        inner_product: config.inner_product(),
        skip_connections_exact,
    })
}

/// 追踪输入形状的每个空间维度；有尺寸为0时返回None
pub fn trace_shape(config: &NetworkConfig, input: &InputShape) -> Option<Vec<StageTrace>> {
    input
        .spatial_sizes()
        .iter()
        .map(|&size| trace_spatial_size(config, size))
        .collect()
}
