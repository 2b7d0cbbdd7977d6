/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : UNet 输入尺寸约束：拓扑配置、约束求值、逐层追踪与合法尺寸查找
 */

mod config;
mod evaluator;
mod input;
mod norm;
mod search;
mod trace;

pub use config::{NetworkConfig, NetworkConfigDescriptor};
pub use evaluator::{ValidationResult, validate, validate_many};
pub use input::{InputShape, MAX_SPATIAL_DIMS};
pub use norm::{
    BatchNorm, InstanceNorm, LocalResponseNorm, NormSizeContext, NormalizationKind,
    TraitNormalization,
};
pub use search::{
    is_valid_spatial_size, next_valid_spatial_size, smallest_valid_spatial_size,
    valid_spatial_sizes,
};
pub use trace::{StageTrace, trace_shape, trace_spatial_size};
