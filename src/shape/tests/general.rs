use crate::assert_err;
use crate::errors::ConfigError;
use crate::shape::{
    conv_output_size, conv_output_size_with, same_padding, transposed_conv_output_size,
    transposed_conv_output_size_with,
};

#[test]
fn test_same_padding() {
    assert_eq!(same_padding(1, 1).unwrap(), 0);
    assert_eq!(same_padding(3, 1).unwrap(), 1);
    assert_eq!(same_padding(5, 1).unwrap(), 2);
    // 偶数核在dilation为2时仍可对称填充
    assert_eq!(same_padding(4, 2).unwrap(), 3);

    assert_err!(same_padding(2, 1), ConfigError::InvalidKernelSize { value: 2, .. });
    assert_err!(same_padding(0, 1), ConfigError::InvalidKernelSize { value: 0, .. });
}

#[test]
fn test_conv_output_size_with_pytorch_cases() {
    // 与nn.Conv2d的形状一致：H=4, kernel=2, stride=1, padding=0 -> 3
    assert_eq!(conv_output_size_with(4, 2, 1, 0, 1), Some(3));
    // H=28, kernel=5, stride=1, padding=2 -> 28
    assert_eq!(conv_output_size_with(28, 5, 1, 2, 1), Some(28));
    // H=7, kernel=3, stride=2, padding=1 -> 4
    assert_eq!(conv_output_size_with(7, 3, 2, 1, 1), Some(4));
    // dilation=2：有效感受野为5
    assert_eq!(conv_output_size_with(9, 3, 1, 0, 2), Some(5));
    // 窗口放不下
    assert_eq!(conv_output_size_with(2, 5, 1, 0, 1), None);
    assert_eq!(conv_output_size_with(0, 3, 1, 1, 1), None);
}

#[test]
fn test_transposed_conv_output_size_with_pytorch_cases() {
    // nn.ConvTranspose2d(kernel=3, stride=2, padding=1, output_padding=1)：4 -> 8
    assert_eq!(transposed_conv_output_size_with(4, 3, 2, 1, 1, 1), Some(8));
    // kernel=2, stride=2, padding=0：3 -> 6
    assert_eq!(transposed_conv_output_size_with(3, 2, 2, 0, 0, 1), Some(6));
    // 填充过大导致结果非正
    assert_eq!(transposed_conv_output_size_with(1, 1, 1, 1, 0, 1), None);
}

#[test]
fn test_general_formulas_reduce_to_unet_convention() {
    for kernel in [1, 3, 5, 7] {
        let padding = same_padding(kernel, 1).unwrap();
        for stride in 1..=5 {
            for input in 1..=30 {
                assert_eq!(
                    conv_output_size_with(input, kernel, stride, padding, 1),
                    Some(conv_output_size(input, stride)),
                    "conv: input={input}, kernel={kernel}, stride={stride}"
                );
                assert_eq!(
                    transposed_conv_output_size_with(input, kernel, stride, padding, stride - 1, 1),
                    transposed_conv_output_size(input, stride),
                    "transposed: input={input}, kernel={kernel}, stride={stride}"
                );
            }
        }
    }
}

#[test]
fn test_general_formulas_overflow() {
    // input + 2*padding 超出 usize
    assert_eq!(conv_output_size_with(usize::MAX, 3, 1, 1, 1), None);
    assert_eq!(conv_output_size_with(8, 3, 1, usize::MAX / 2 + 1, 1), None);
    // dilation*(kernel-1) 超出 usize
    assert_eq!(conv_output_size_with(8, 3, 1, 1, usize::MAX), None);
    // (input-1)*stride 超出 usize
    assert_eq!(transposed_conv_output_size_with(1 << 40, 3, 1 << 30, 1, 0, 1), None);
    assert_eq!(transposed_conv_output_size_with(4, 3, 2, usize::MAX, 1, 1), None);
    assert_err!(same_padding(3, usize::MAX), ConfigError::InvalidKernelSize { value: 3, .. });
}
