/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 卷积 / 转置卷积的输出尺寸计算（单个空间维度）
 *
 * 通用公式（PyTorch 约定）：
 * 卷积：      out = (in + 2*padding - dilation*(kernel-1) - 1) / stride + 1
 * 转置卷积：  out = (in-1)*stride - 2*padding + dilation*(kernel-1) + output_padding + 1
 *
 * UNet 中固定 dilation=1、padding=(kernel-1)/2（kernel 为奇数）、output_padding=stride-1，
 * 此时两个公式分别化简为：
 * 卷积：      out = ceil(in / stride)
 * 转置卷积：  out = in * stride
 * 与 kernel 大小无关，所以后面的约束推导只依赖步长。
 */

use crate::errors::ConfigError;
use num_integer::Integer;

#[cfg(test)]
mod tests;

/// 步长为`stride`的卷积（same padding）作用在长度为`input_size`的维度上后的输出长度
///
/// 等价于`input_size`对`stride`做向上取整除法，因此对任何正的输入结果都≥1。
///
/// # 示例
/// ```
/// use unet_size::shape::conv_output_size;
///
/// assert_eq!(conv_output_size(12, 3), 4);
/// assert_eq!(conv_output_size(13, 3), 5);
/// assert_eq!(conv_output_size(1, 5), 1);
/// ```
pub fn conv_output_size(input_size: usize, stride: usize) -> usize {
    debug_assert!(input_size >= 1 && stride >= 1);
    Integer::div_ceil(&input_size, &stride)
}

/// 步长为`stride`的转置卷积（same padding，`output_padding = stride - 1`）的输出长度
///
/// 结果超出`usize`时返回None。
///
/// # 示例
/// ```
/// use unet_size::shape::transposed_conv_output_size;
///
/// assert_eq!(transposed_conv_output_size(5, 3), Some(15));
/// assert_eq!(transposed_conv_output_size(usize::MAX, 2), None);
/// ```
pub fn transposed_conv_output_size(input_size: usize, stride: usize) -> Option<usize> {
    input_size.checked_mul(stride)
}

/// 先下采样再上采样（同一步长）后的长度
///
/// 当且仅当`input_size`能被`stride`整除时等于`input_size`，
/// 这正是跳跃连接拼接时两侧空间尺寸必须一致的来源。超出`usize`时返回None。
pub fn round_trip_size(input_size: usize, stride: usize) -> Option<usize> {
    transposed_conv_output_size(conv_output_size(input_size, stride), stride)
}

/// same padding：使步长为1的卷积不改变尺寸的填充量
///
/// 要求`dilation*(kernel-1)`为偶数（dilation为1时即kernel为奇数），否则两侧无法对称填充。
pub fn same_padding(kernel_size: usize, dilation: usize) -> Result<usize, ConfigError> {
    if kernel_size == 0 || dilation == 0 {
        return Err(ConfigError::InvalidKernelSize {
            name: "kernel_size",
            value: kernel_size,
        });
    }
    let Some(extent) = dilation.checked_mul(kernel_size - 1) else {
        return Err(ConfigError::InvalidKernelSize {
            name: "kernel_size",
            value: kernel_size,
        });
    };
    if extent.is_odd() {
        return Err(ConfigError::InvalidKernelSize {
            name: "kernel_size",
            value: kernel_size,
        });
    }
    Ok(extent / 2)
}

/// 通用的卷积输出长度（单维度）
///
/// 卷积窗口放不下（结果<1）或中间结果超出`usize`时返回None。
pub fn conv_output_size_with(
    input_size: usize,
    kernel_size: usize,
    stride: usize,
    padding: usize,
    dilation: usize,
) -> Option<usize> {
    if input_size == 0 || kernel_size == 0 || stride == 0 || dilation == 0 {
        return None;
    }
    let padded = padding.checked_mul(2)?.checked_add(input_size)?;
    let receptive = dilation.checked_mul(kernel_size - 1)?.checked_add(1)?;
    let span = padded.checked_sub(receptive)?;
    Some(span / stride + 1)
}

/// 通用的转置卷积输出长度（单维度）
///
/// 结果<1或超出`usize`时返回None。
pub fn transposed_conv_output_size_with(
    input_size: usize,
    kernel_size: usize,
    stride: usize,
    padding: usize,
    output_padding: usize,
    dilation: usize,
) -> Option<usize> {
    if input_size == 0 || kernel_size == 0 || stride == 0 || dilation == 0 {
        return None;
    }
    let grown = (input_size - 1)
        .checked_mul(stride)?
        .checked_add(dilation.checked_mul(kernel_size - 1)?)?
        .checked_add(output_padding)?
        .checked_add(1)?;
    grown
        .checked_sub(padding.checked_mul(2)?)
        .filter(|&out| out >= 1)
}
