use std::fmt::{self, Display};

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterOrEqual,
    GreaterThan,
}
impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator_name = match self {
            ComparisonOperator::GreaterOrEqual => "≥",
            ComparisonOperator::GreaterThan => ">",
        };
        write!(f, "{}", operator_name)
    }
}

/// 尺寸约束的种类（即`ValidationResult::Invalid`中被违反的规则）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// 批大小或某个空间尺寸小于1
    NonPositiveDimension,
    /// 空间维数不在1~3之间
    UnsupportedRank,
    /// 嵌套的下采样/上采样无法还原原尺寸，导致跳跃连接拼接失败
    SkipDivisibilityViolation,
    /// 归一化层对批大小或空间尺寸的最小要求未满足
    NormalizationSizeViolation,
}
impl Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule_name = match self {
            ConstraintKind::NonPositiveDimension => "非正维度",
            ConstraintKind::UnsupportedRank => "不支持的空间维数",
            ConstraintKind::SkipDivisibilityViolation => "跳跃连接整除约束",
            ConstraintKind::NormalizationSizeViolation => "归一化层尺寸约束",
        };
        write!(f, "{}", rule_name)
    }
}
