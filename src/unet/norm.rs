/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 归一化层种类及其对输入尺寸的最小要求
 *
 * 只收录约束与具体输入值无关的三种：
 * - BatchNorm：训练时每个通道至少要有 2 个样本参与统计，即 batch_size > 1
 * - InstanceNorm：每个样本每个通道的空间元素数须 > 1
 * - LocalResponseNorm：无约束
 * GroupNorm / LayerNorm / SyncBatchNorm 的约束依赖通道数或分布式环境，不在此列。
 */

use crate::errors::{ComparisonOperator, ConfigError, ConstraintKind, ShapeViolation};
use enum_dispatch::enum_dispatch;
use num_integer::Integer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 归一化层检查时所需的上下文（均针对最大的那个空间维度）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormSizeContext {
    pub batch_size: usize,
    /// 最大空间维度所在的轴
    pub largest_axis: usize,
    /// 最大空间维度的输入尺寸
    pub largest_size: usize,
    /// 首个步长
    pub first_stride: usize,
    /// 最大空间维度经首次下采样后的尺寸
    pub after_first_down: usize,
    /// 其余步长之积（无嵌套时为1）
    pub inner_product: usize,
    /// 是否存在嵌套的跳跃连接（即步长个数>1）
    pub nested: bool,
}

#[enum_dispatch]
pub trait TraitNormalization {
    /// 规范名称（小写）
    fn name(&self) -> &'static str;

    /// 检查该归一化层对批大小/空间尺寸的要求
    fn check_size(&self, ctx: &NormSizeContext) -> Result<(), ShapeViolation>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BatchNorm;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InstanceNorm;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LocalResponseNorm;

impl TraitNormalization for BatchNorm {
    fn name(&self) -> &'static str {
        "batch"
    }

    fn check_size(&self, ctx: &NormSizeContext) -> Result<(), ShapeViolation> {
        if ctx.batch_size > 1 {
            return Ok(());
        }
        Err(ShapeViolation::new(
            ConstraintKind::NormalizationSizeViolation,
            None,
            format!(
                "批归一化要求批大小{}1，实际为{}",
                ComparisonOperator::GreaterThan,
                ctx.batch_size
            ),
        ))
    }
}

impl TraitNormalization for InstanceNorm {
    fn name(&self) -> &'static str {
        "instance"
    }

    fn check_size(&self, ctx: &NormSizeContext) -> Result<(), ShapeViolation> {
        if !ctx.nested {
            if ctx.after_first_down >= 2 {
                return Ok(());
            }
            return Err(ShapeViolation::new(
                ConstraintKind::NormalizationSizeViolation,
                Some(ctx.largest_axis),
                format!(
                    "实例归一化要求最大空间维度下采样后{}2：轴{}尺寸{}经步长{}下采样后为{}（即输入尺寸须{}{}）",
                    ComparisonOperator::GreaterOrEqual,
                    ctx.largest_axis,
                    ctx.largest_size,
                    ctx.first_stride,
                    ctx.after_first_down,
                    ComparisonOperator::GreaterOrEqual,
                    ctx.first_stride.saturating_add(1)
                ),
            ));
        }

        // 嵌套时把整除约束收紧为2倍，保证最深处的归一化层看到的尺寸≥2
        // 2×P 超出 usize 时，任何下采样后的尺寸都不可能是它的倍数
        let required = ctx.inner_product.checked_mul(2);
        if required.is_some_and(|m| Integer::is_multiple_of(&ctx.after_first_down, &m)) {
            return Ok(());
        }
        let required = required.map_or_else(|| "超出usize的数".to_string(), |m| m.to_string());
        Err(ShapeViolation::new(
            ConstraintKind::NormalizationSizeViolation,
            Some(ctx.largest_axis),
            format!(
                "实例归一化要求最大空间维度下采样后的尺寸能被{}（2×{}）整除：轴{}尺寸{}经步长{}下采样后为{}",
                required,
                ctx.inner_product,
                ctx.largest_axis,
                ctx.largest_size,
                ctx.first_stride,
                ctx.after_first_down
            ),
        ))
    }
}

impl TraitNormalization for LocalResponseNorm {
    fn name(&self) -> &'static str {
        "localresponse"
    }

    fn check_size(&self, _ctx: &NormSizeContext) -> Result<(), ShapeViolation> {
        Ok(())
    }
}

/// 归一化层种类
///
/// 用带标签的枚举代替“按名字查工厂”的注册表，每个变体自带其尺寸约束。
/// 序列化时以名字字符串出现，如`"batch"`。
///
/// # 示例
/// ```
/// use unet_size::unet::{NormalizationKind, TraitNormalization};
///
/// let norm: NormalizationKind = "InstanceNorm".parse().unwrap();
/// assert_eq!(norm, NormalizationKind::INSTANCE);
/// assert_eq!(norm.name(), "instance");
/// assert!("group".parse::<NormalizationKind>().is_err());
/// ```
#[enum_dispatch(TraitNormalization)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NormalizationKind {
    Batch(BatchNorm),
    Instance(InstanceNorm),
    LocalResponse(LocalResponseNorm),
}

impl NormalizationKind {
    pub const BATCH: Self = Self::Batch(BatchNorm);
    pub const INSTANCE: Self = Self::Instance(InstanceNorm);
    pub const LOCAL_RESPONSE: Self = Self::LocalResponse(LocalResponseNorm);
}

impl FromStr for NormalizationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "batch" | "batchnorm" => Ok(Self::BATCH),
            "instance" | "instancenorm" => Ok(Self::INSTANCE),
            "localresponse" | "localresponsenorm" | "lrn" => Ok(Self::LOCAL_RESPONSE),
            _ => Err(ConfigError::UnknownNormalization(s.to_string())),
        }
    }
}

impl TryFrom<String> for NormalizationKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NormalizationKind> for String {
    fn from(kind: NormalizationKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for NormalizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
