/// 错误断言宏 - 灵活粒度验证 Result 错误
///
/// # 用法
/// - `assert_err!(expr)` — 只验证是 Err
/// - `assert_err!(expr, Variant(literal))` — 验证错误类型 + 精确消息（String 变体）
/// - `assert_err!(expr, Pattern { .. })` — 验证错误类型
/// - `assert_err!(expr, Pattern { field, .. } if condition)` — 验证类型 + 条件
///
/// # 示例
/// ```ignore
/// // 只验证是错误
/// assert_err!(result);
///
/// // 验证错误类型 + 精确消息（简洁语法）
/// assert_err!(result, ConfigError::UnknownNormalization("group"));
///
/// // 验证错误类型（忽略所有字段）
/// assert_err!(result, ConfigError::StrideCountMismatch { .. });
///
/// // 验证类型 + 关键字段
/// assert_err!(result, ConfigError::ZeroStride { index } if *index == 1);
/// ```
#[macro_export]
macro_rules! assert_err {
    // 只验证是 Err
    ($expr:expr) => {
        assert!($expr.is_err(), "预期 Err，实际得到 {:?}", $expr);
    };
    // 简洁语法：Variant(字符串字面量) - 精确匹配 String 内容
    ($expr:expr, $err_type:ident :: $variant:ident ( $expected:literal )) => {
        match &$expr {
            Err($err_type::$variant(actual)) => assert_eq!(
                actual, $expected,
                "错误消息不匹配：预期 `{}`，实际得到 `{}`",
                $expected, actual
            ),
            Err(e) => panic!(
                "错误类型不匹配：预期 `{}::{}`，实际得到 `{:?}`",
                stringify!($err_type), stringify!($variant), e
            ),
            Ok(v) => panic!(
                "预期 Err({}::{})，实际得到 Ok({:?})",
                stringify!($err_type), stringify!($variant), v
            ),
        }
    };
    // 通用模式匹配（带 if guard 或复杂 pattern）
    ($expr:expr, $($pattern:tt)+) => {
        match &$expr {
            Err(e) => assert!(
                matches!(e, $($pattern)+),
                "错误类型不匹配：预期 `{}`，实际得到 `{:?}`",
                stringify!($($pattern)+),
                e
            ),
            Ok(v) => panic!(
                "预期 Err 匹配 `{}`，实际得到 Ok({:?})",
                stringify!($($pattern)+),
                v
            ),
        }
    };
}

/// 校验结果断言宏 - 验证`ValidationResult`
///
/// # 用法
/// - `assert_invalid!(result, ConstraintKind::X)` — 验证为 Invalid 且违反的是指定规则
/// - `assert_invalid!(result, ConstraintKind::X, axis)` — 同上，并验证出错的空间轴
#[macro_export]
macro_rules! assert_invalid {
    ($result:expr, $kind:expr) => {
        match &$result {
            $crate::unet::ValidationResult::Invalid(violation) => assert_eq!(
                violation.rule, $kind,
                "违反的规则不匹配：预期 `{:?}`，实际得到 `{}`",
                $kind, violation
            ),
            $crate::unet::ValidationResult::Valid(shape) => panic!(
                "预期 Invalid({:?})，实际得到 Valid({:?})",
                $kind, shape
            ),
        }
    };
    ($result:expr, $kind:expr, $axis:expr) => {
        $crate::assert_invalid!($result, $kind);
        if let $crate::unet::ValidationResult::Invalid(violation) = &$result {
            assert_eq!(violation.axis, Some($axis), "出错的空间轴不匹配：{}", violation);
        }
    };
}
