//! # UNet Size
//!
//! 在不真正运行网络的前提下，判断一个输入形状能否被给定拓扑的 UNet（步长卷积编码器 +
//! 转置卷积解码器 + 嵌套跳跃连接）接受，并给出输出形状。
//!
//! 约束来自三处：
//! - 卷积/转置卷积的输出尺寸公式（见[`shape`]）
//! - 跳跃连接拼接要求两侧空间尺寸一致
//! - 归一化层对批大小或空间尺寸的最小要求
//!
//! # 使用示例
//!
//! ```
//! use unet_size::unet::{InputShape, NetworkConfig, NormalizationKind};
//!
//! let norm = NormalizationKind::LOCAL_RESPONSE;
//! let config = NetworkConfig::new(&[1, 4, 8, 16], &[3, 2, 4], norm).unwrap();
//! assert!(config.validate(&InputShape::new(1, &[22, 23, 24])).is_valid());
//! assert!(!config.validate(&InputShape::new(1, &[25, 23, 24])).is_valid());
//! ```

pub mod errors;
pub mod shape;
pub mod unet;
pub mod utils;
