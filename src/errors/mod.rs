use std::path::PathBuf;
use thiserror::Error;
mod ops;
pub use self::ops::*;

/// 网络拓扑配置错误
///
/// 与输入形状是否合法无关：配置本身有误时在构造阶段就直接报错，不会被悄悄修正。
#[derive(Error, Debug)]
pub enum ConfigError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}，实际为{actual}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
        actual: usize,
    },
    #[error("步长个数须等于通道数个数减1：通道数列表长度为{channels}，步长列表长度为{strides}")]
    StrideCountMismatch { channels: usize, strides: usize },
    #[error("第{index}个通道数为0")]
    ZeroChannel { index: usize },
    #[error("第{index}个步长为0")]
    ZeroStride { index: usize },
    #[error("{name}须为正奇数（保证same padding为整数），实际为{value}")]
    InvalidKernelSize { name: &'static str, value: usize },
    #[error("未知（或不受支持）的归一化层：{0}")]
    UnknownNormalization(String),

    #[error("配置文件未找到: {0}")]
    FileNotFound(PathBuf),
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// 输入形状违反某条尺寸约束
///
/// 只作为`ValidationResult::Invalid`的负载出现；求值器本身从不panic或返回`Err`。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("违反{rule}：{detail}")]
pub struct ShapeViolation {
    /// 被违反的规则
    pub rule: ConstraintKind,
    /// 出问题的空间轴（0起，不含batch/channel维）；规则与具体轴无关时为None
    pub axis: Option<usize>,
    /// 可读的说明（含出错的数值）
    pub detail: String,
}

impl ShapeViolation {
    pub fn new(rule: ConstraintKind, axis: Option<usize>, detail: impl Into<String>) -> Self {
        Self {
            rule,
            axis,
            detail: detail.into(),
        }
    }
}
