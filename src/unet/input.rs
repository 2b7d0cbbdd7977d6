use crate::errors::{ConstraintKind, ShapeViolation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 最多支持的空间维数（1D/2D/3D）
pub const MAX_SPATIAL_DIMS: usize = 3;

/// 候选输入形状：批大小 + 各空间维度尺寸
///
/// 通道数不参与尺寸约束，故不记录。
/// 构造时不做任何检查，非法的值（如0）由求值器报告为`NonPositiveDimension`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputShape {
    batch_size: usize,
    spatial_sizes: Vec<usize>,
}

impl InputShape {
    pub fn new(batch_size: usize, spatial_sizes: &[usize]) -> Self {
        Self {
            batch_size,
            spatial_sizes: spatial_sizes.to_vec(),
        }
    }

    /// 从完整张量形状`[batch, channels, *spatial]`创建，丢弃通道维
    ///
    /// # 示例
    /// ```
    /// use unet_size::unet::InputShape;
    ///
    /// let shape = InputShape::from_tensor_shape(&[2, 1, 13, 14, 15]).unwrap();
    /// assert_eq!(shape.batch_size(), 2);
    /// assert_eq!(shape.spatial_sizes(), &[13, 14, 15]);
    /// ```
    pub fn from_tensor_shape(shape: &[usize]) -> Result<Self, ShapeViolation> {
        match shape {
            [batch_size, _channels, spatial @ ..] if !spatial.is_empty() => {
                Ok(Self::new(*batch_size, spatial))
            }
            _ => Err(ShapeViolation::new(
                ConstraintKind::UnsupportedRank,
                None,
                format!("张量形状须为[batch, channels, *spatial]且至少含1个空间维，得到{shape:?}"),
            )),
        }
    }

    /// 还原为完整张量形状`[batch, channels, *spatial]`
    pub fn to_tensor_shape(&self, channels: usize) -> Vec<usize> {
        let mut shape = Vec::with_capacity(self.spatial_sizes.len() + 2);
        shape.push(self.batch_size);
        shape.push(channels);
        shape.extend_from_slice(&self.spatial_sizes);
        shape
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn spatial_sizes(&self) -> &[usize] {
        &self.spatial_sizes
    }

    /// 空间维数
    pub fn rank(&self) -> usize {
        self.spatial_sizes.len()
    }

    /// 最大的空间维度：(轴, 尺寸)；并列时取靠前的轴
    pub fn largest_spatial(&self) -> Option<(usize, usize)> {
        self.spatial_sizes
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (axis, size)| match best {
                Some((_, best_size)) if best_size >= size => best,
                _ => Some((axis, size)),
            })
    }
}

impl fmt::Display for InputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} | ", self.batch_size)?;
        let spatial: Vec<String> = self.spatial_sizes.iter().map(|s| s.to_string()).collect();
        write!(f, "{}]", spatial.join(", "))
    }
}
