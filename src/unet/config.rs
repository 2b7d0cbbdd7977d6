/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : UNet 拓扑配置（通道数、步长、卷积核大小、归一化层）
 *
 * 拓扑约定：
 * - 最外层：一次步长为 strides[0] 的下采样，最后由同步长的转置卷积还原
 * - strides[1..] 中每个步长对应一层嵌套的 (下采样, 递归, 上采样)，其输出与该层输入按通道拼接
 * - 嵌套是严格线性的，深度 = channels.len() - 1
 */

use super::norm::NormalizationKind;
use crate::errors::{ComparisonOperator, ConfigError};
use crate::shape::same_padding;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_KERNEL_SIZE: usize = 3;

/// UNet 拓扑配置（不可变）
///
/// 只能通过[`NetworkConfig::new`]或反序列化得到，二者都会检查
/// `strides.len() == channels.len() - 1`等不变式。
///
/// # 示例
/// ```
/// use unet_size::unet::{NetworkConfig, NormalizationKind};
///
/// let config = NetworkConfig::new(&[1, 8, 16], &[3, 5], NormalizationKind::BATCH).unwrap();
/// assert_eq!(config.depth(), 2);
/// assert_eq!(config.inner_product(), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NetworkConfigDescriptor", into = "NetworkConfigDescriptor")]
pub struct NetworkConfig {
    channels: Vec<usize>,
    strides: Vec<usize>,
    kernel_size: usize,
    up_kernel_size: usize,
    normalization: NormalizationKind,
}

/// `NetworkConfig`的可序列化描述（未经检查）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfigDescriptor {
    pub channels: Vec<usize>,
    pub strides: Vec<usize>,
    #[serde(default = "default_kernel_size")]
    pub kernel_size: usize,
    #[serde(default = "default_kernel_size")]
    pub up_kernel_size: usize,
    pub normalization: NormalizationKind,
}

fn default_kernel_size() -> usize {
    DEFAULT_KERNEL_SIZE
}

impl NetworkConfig {
    /// 创建配置，卷积核与转置卷积核大小均取默认值3
    ///
    /// # 参数
    /// - `channels`: 各层通道数，长度≥2
    /// - `strides`: 各层步长，长度须为`channels.len() - 1`
    /// - `normalization`: 归一化层种类
    pub fn new(
        channels: &[usize],
        strides: &[usize],
        normalization: NormalizationKind,
    ) -> Result<Self, ConfigError> {
        if channels.len() < 2 {
            return Err(ConfigError::ValueMustSatisfyComparison {
                value_name: "通道数列表长度".to_string(),
                operator: ComparisonOperator::GreaterOrEqual,
                threshold: 2,
                actual: channels.len(),
            });
        }
        if strides.len() != channels.len() - 1 {
            return Err(ConfigError::StrideCountMismatch {
                channels: channels.len(),
                strides: strides.len(),
            });
        }
        if let Some(index) = channels.iter().position(|&c| c == 0) {
            return Err(ConfigError::ZeroChannel { index });
        }
        if let Some(index) = strides.iter().position(|&s| s == 0) {
            return Err(ConfigError::ZeroStride { index });
        }

        Ok(Self {
            channels: channels.to_vec(),
            strides: strides.to_vec(),
            kernel_size: DEFAULT_KERNEL_SIZE,
            up_kernel_size: DEFAULT_KERNEL_SIZE,
            normalization,
        })
    }

    /// 指定卷积核与转置卷积核大小（均须为正奇数）
    pub fn with_kernel_sizes(
        mut self,
        kernel_size: usize,
        up_kernel_size: usize,
    ) -> Result<Self, ConfigError> {
        check_kernel_size("kernel_size", kernel_size)?;
        check_kernel_size("up_kernel_size", up_kernel_size)?;
        self.kernel_size = kernel_size;
        self.up_kernel_size = up_kernel_size;
        Ok(self)
    }

    pub fn channels(&self) -> &[usize] {
        &self.channels
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    pub fn up_kernel_size(&self) -> usize {
        self.up_kernel_size
    }

    pub fn normalization(&self) -> NormalizationKind {
        self.normalization
    }

    /// 网络深度（即步长个数）
    pub fn depth(&self) -> usize {
        self.strides.len()
    }

    /// 最外层下采样的步长
    pub fn first_stride(&self) -> usize {
        self.strides[0]
    }

    /// 嵌套层的步长（可能为空）
    pub fn inner_strides(&self) -> &[usize] {
        &self.strides[1..]
    }

    /// 嵌套层步长之积；无嵌套时为空积1，超出`usize`范围时为None
    pub fn inner_product(&self) -> Option<usize> {
        self.inner_strides()
            .iter()
            .try_fold(1usize, |acc, &stride| acc.checked_mul(stride))
    }

    /// 是否存在嵌套的跳跃连接
    pub fn is_nested(&self) -> bool {
        self.strides.len() > 1
    }

    /// 卷积的 same padding
    pub fn padding(&self) -> usize {
        (self.kernel_size - 1) / 2
    }

    /// 转置卷积的 same padding
    pub fn up_padding(&self) -> usize {
        (self.up_kernel_size - 1) / 2
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

fn check_kernel_size(name: &'static str, value: usize) -> Result<(), ConfigError> {
    same_padding(value, 1)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidKernelSize { name, value })
}

impl TryFrom<NetworkConfigDescriptor> for NetworkConfig {
    type Error = ConfigError;

    fn try_from(desc: NetworkConfigDescriptor) -> Result<Self, Self::Error> {
        Self::new(&desc.channels, &desc.strides, desc.normalization)?
            .with_kernel_sizes(desc.kernel_size, desc.up_kernel_size)
    }
}

impl From<NetworkConfig> for NetworkConfigDescriptor {
    fn from(config: NetworkConfig) -> Self {
        Self {
            channels: config.channels,
            strides: config.strides,
            kernel_size: config.kernel_size,
            up_kernel_size: config.up_kernel_size,
            normalization: config.normalization,
        }
    }
}
