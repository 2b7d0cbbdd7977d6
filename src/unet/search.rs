/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 合法输入尺寸的查找（各向同性，即所有空间维度取同一尺寸）
 *
 * 所有规则都只通过 a = ceil(v / strides[0]) 依赖 v，合法条件可化为对 a 的要求：
 * - 有嵌套：a 为 m 的倍数，m = P（实例归一化时为 2P）
 * - 无嵌套 + 实例归一化：a ≥ 2
 * - 其他：无要求
 * 满足 ceil(v / s0) = a 的最小 v 为 s0 * (a - 1) + 1。
 */

use super::config::NetworkConfig;
use super::evaluator::validate;
use super::input::InputShape;
use super::norm::NormalizationKind;
use crate::shape::conv_output_size;
use std::ops::RangeInclusive;
use tracing::trace;

/// 各向同性尺寸`size`（任意空间维数下结论相同）在给定批大小下是否合法
pub fn is_valid_spatial_size(config: &NetworkConfig, batch_size: usize, size: usize) -> bool {
    validate(config, &InputShape::new(batch_size, &[size])).is_valid()
}

/// 遍历区间内所有合法尺寸
pub fn valid_spatial_sizes(
    config: &NetworkConfig,
    batch_size: usize,
    range: RangeInclusive<usize>,
) -> impl Iterator<Item = usize> + '_ {
    range.filter(move |&size| is_valid_spatial_size(config, batch_size, size))
}

/// 不小于`size`的最小合法尺寸
///
/// 任何尺寸都不可能合法时（批大小为0，批归一化配批大小1，或所需尺寸超出`usize`）返回None。
///
/// # 示例
/// ```
/// use unet_size::unet::{next_valid_spatial_size, NetworkConfig, NormalizationKind};
///
/// let config = NetworkConfig::new(&[1, 8, 16], &[3, 5], NormalizationKind::BATCH).unwrap();
/// assert_eq!(next_valid_spatial_size(&config, 2, 12), Some(13));
/// assert_eq!(next_valid_spatial_size(&config, 1, 12), None);
/// ```
pub fn next_valid_spatial_size(
    config: &NetworkConfig,
    batch_size: usize,
    size: usize,
) -> Option<usize> {
    if batch_size == 0 {
        return None;
    }
    if config.normalization() == NormalizationKind::BATCH && batch_size <= 1 {
        return None;
    }

    let size = size.max(1);
    let first_stride = config.first_stride();
    let after_first_down = conv_output_size(size, first_stride);
    let required = min_after_first_down(config, after_first_down)?;
    let found = if required == after_first_down {
        size
    } else {
        // 超出 usize 时视为不存在
        first_stride.checked_mul(required - 1)?.checked_add(1)?
    };
    trace!(size, after_first_down, required, found, "查找下一个合法尺寸");
    Some(found)
}

/// 最小合法尺寸
pub fn smallest_valid_spatial_size(config: &NetworkConfig, batch_size: usize) -> Option<usize> {
    next_valid_spatial_size(config, batch_size, 1)
}

/// 满足约束且不小于`after_first_down`的最小下采样后尺寸，超出`usize`时返回None
fn min_after_first_down(config: &NetworkConfig, after_first_down: usize) -> Option<usize> {
    let instance = config.normalization() == NormalizationKind::INSTANCE;
    if !config.is_nested() {
        return Some(if instance { after_first_down.max(2) } else { after_first_down });
    }
    let mut multiple = config.inner_product()?;
    if instance {
        multiple = multiple.checked_mul(2)?;
    }
    // next_multiple_of 的结果可能溢出，先用余数判断
    match after_first_down % multiple {
        0 => Some(after_first_down),
        rem => after_first_down.checked_add(multiple - rem),
    }
}
