/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 约束求值器：判断某个输入形状能否被给定拓扑的 UNet 接受
 *
 * 规则（按顺序检查，遇到第一个违反即返回）：
 * 0. 批大小与各空间尺寸均须≥1，空间维数须在 1~3 之间
 * 1. 每个空间维度 v：a = ceil(v / strides[0])
 * 2. P = strides[1..] 之积（空积为1）
 * 3. 跳跃连接：a 须能被 P 整除（否则嵌套的下采样/上采样无法还原尺寸，拼接失败）
 * 4. 归一化层：按最大空间维度检查（见 norm.rs）
 * 5. 全部通过时输出形状与输入形状一致
 *
 * 纯函数、无状态，同一输入多次求值结果相同。
 */

use super::config::NetworkConfig;
use super::input::{InputShape, MAX_SPATIAL_DIMS};
use super::norm::{NormSizeContext, TraitNormalization};
use crate::errors::{ConstraintKind, ShapeViolation};
use crate::shape::conv_output_size;
use num_integer::Integer;
use rayon::prelude::*;
use tracing::{debug, trace};

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// 合法，附带输出形状
    Valid(InputShape),
    /// 不合法，附带第一条被违反的规则
    Invalid(ShapeViolation),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// 合法时的输出形状
    pub fn output_shape(&self) -> Option<&InputShape> {
        match self {
            Self::Valid(shape) => Some(shape),
            Self::Invalid(_) => None,
        }
    }

    pub fn violation(&self) -> Option<&ShapeViolation> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(violation) => Some(violation),
        }
    }

    /// 被违反的规则
    pub fn violated_rule(&self) -> Option<ConstraintKind> {
        self.violation().map(|v| v.rule)
    }

    /// 转为`Result`，方便配合`?`使用
    pub fn into_result(self) -> Result<InputShape, ShapeViolation> {
        match self {
            Self::Valid(shape) => Ok(shape),
            Self::Invalid(violation) => Err(violation),
        }
    }
}

impl From<Result<InputShape, ShapeViolation>> for ValidationResult {
    fn from(result: Result<InputShape, ShapeViolation>) -> Self {
        match result {
            Ok(shape) => Self::Valid(shape),
            Err(violation) => Self::Invalid(violation),
        }
    }
}

/// 校验单个输入形状
///
/// # 示例
/// ```
/// use unet_size::errors::ConstraintKind;
/// use unet_size::unet::{validate, InputShape, NetworkConfig, NormalizationKind};
///
/// let config = NetworkConfig::new(&[1, 8, 16], &[3, 5], NormalizationKind::BATCH).unwrap();
///
/// let ok = validate(&config, &InputShape::new(2, &[13, 14, 15]));
/// assert_eq!(ok.output_shape().unwrap().spatial_sizes(), &[13, 14, 15]);
///
/// // ceil(12 / 3) = 4 不能被 5 整除
/// let bad = validate(&config, &InputShape::new(2, &[12, 14, 15]));
/// assert_eq!(bad.violated_rule(), Some(ConstraintKind::SkipDivisibilityViolation));
/// ```
pub fn validate(config: &NetworkConfig, input: &InputShape) -> ValidationResult {
    let result = evaluate(config, input);
    match &result {
        Ok(output) => debug!(input = %input, output = %output, "输入形状合法"),
        Err(violation) => debug!(input = %input, %violation, "输入形状不合法"),
    }
    result.into()
}

/// 并行校验多个输入形状，结果顺序与输入一致
pub fn validate_many(config: &NetworkConfig, inputs: &[InputShape]) -> Vec<ValidationResult> {
    inputs.par_iter().map(|input| validate(config, input)).collect()
}

impl NetworkConfig {
    /// 等价于[`validate`]
    pub fn validate(&self, input: &InputShape) -> ValidationResult {
        validate(self, input)
    }
}

fn evaluate(config: &NetworkConfig, input: &InputShape) -> Result<InputShape, ShapeViolation> {
    check_dimensions(input)?;
    let (after_first_down, inner_product) = check_skip_divisibility(config, input)?;
    check_normalization(config, input, &after_first_down, inner_product)?;
    Ok(input.clone())
}

fn check_dimensions(input: &InputShape) -> Result<(), ShapeViolation> {
    if input.batch_size() < 1 {
        return Err(ShapeViolation::new(
            ConstraintKind::NonPositiveDimension,
            None,
            format!("批大小须≥1，实际为{}", input.batch_size()),
        ));
    }
    if input.rank() == 0 || input.rank() > MAX_SPATIAL_DIMS {
        return Err(ShapeViolation::new(
            ConstraintKind::UnsupportedRank,
            None,
            format!(
                "空间维数须在1~{}之间，实际为{}",
                MAX_SPATIAL_DIMS,
                input.rank()
            ),
        ));
    }
    if let Some(axis) = input.spatial_sizes().iter().position(|&v| v < 1) {
        return Err(ShapeViolation::new(
            ConstraintKind::NonPositiveDimension,
            Some(axis),
            format!("轴{}的空间尺寸须≥1，实际为{}", axis, input.spatial_sizes()[axis]),
        ));
    }
    Ok(())
}

/// 返回各空间维度经首次下采样后的尺寸，以及嵌套步长之积
fn check_skip_divisibility(
    config: &NetworkConfig,
    input: &InputShape,
) -> Result<(Vec<usize>, usize), ShapeViolation> {
    let first_stride = config.first_stride();
    // 嵌套步长之积超出 usize 时，不存在能被它整除的正尺寸，第一个轴即违反
    let Some(inner_product) = config.inner_product() else {
        return Err(ShapeViolation::new(
            ConstraintKind::SkipDivisibilityViolation,
            Some(0),
            format!(
                "嵌套步长之积（{:?}）超出usize范围，任何输入尺寸都无法整除",
                config.inner_strides()
            ),
        ));
    };

    let mut after_first_down = Vec::with_capacity(input.rank());
    for (axis, &v) in input.spatial_sizes().iter().enumerate() {
        let a = conv_output_size(v, first_stride);
        trace!(axis, size = v, after_first_down = a, inner_product, "跳跃连接整除检查");
        if !Integer::is_multiple_of(&a, &inner_product) {
            return Err(ShapeViolation::new(
                ConstraintKind::SkipDivisibilityViolation,
                Some(axis),
                format!(
                    "轴{}尺寸{}经步长{}下采样后为{}，不能被嵌套步长之积{}（{:?}）整除",
                    axis,
                    v,
                    first_stride,
                    a,
                    inner_product,
                    config.inner_strides()
                ),
            ));
        }
        after_first_down.push(a);
    }
    Ok((after_first_down, inner_product))
}

fn check_normalization(
    config: &NetworkConfig,
    input: &InputShape,
    after_first_down: &[usize],
    inner_product: usize,
) -> Result<(), ShapeViolation> {
    // check_dimensions 已保证至少有一个空间维
    let Some((largest_axis, largest_size)) = input.largest_spatial() else {
        return Ok(());
    };
    let ctx = NormSizeContext {
        batch_size: input.batch_size(),
        largest_axis,
        largest_size,
        first_stride: config.first_stride(),
        after_first_down: after_first_down[largest_axis],
        inner_product,
        nested: config.is_nested(),
    };
    trace!(norm = %config.normalization(), ?ctx, "归一化层尺寸检查");
    config.normalization().check_size(&ctx)
}
