/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 尺寸公式与约束求值器的性质测试
 */
use proptest::prelude::*;
use unet_size::shape::{conv_output_size, round_trip_size, transposed_conv_output_size};
use unet_size::unet::{
    InputShape, NetworkConfig, NormalizationKind, next_valid_spatial_size, trace_spatial_size,
    validate,
};

fn arb_norm() -> impl Strategy<Value = NormalizationKind> {
    prop::sample::select(vec![
        NormalizationKind::BATCH,
        NormalizationKind::INSTANCE,
        NormalizationKind::LOCAL_RESPONSE,
    ])
}

fn arb_config() -> impl Strategy<Value = NetworkConfig> {
    (prop::collection::vec(1usize..=5, 1..=4), arb_norm()).prop_map(|(strides, norm)| {
        let channels: Vec<usize> = (0..=strides.len()).map(|i| 1 << i).collect();
        NetworkConfig::new(&channels, &strides, norm).unwrap()
    })
}

fn arb_input() -> impl Strategy<Value = InputShape> {
    (1usize..=4, prop::collection::vec(1usize..=200, 1..=3))
        .prop_map(|(batch, spatial)| InputShape::new(batch, &spatial))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn prop_conv_output_size_positive(input in 1usize..10_000, stride in 1usize..64) {
        prop_assert!(conv_output_size(input, stride) >= 1);
    }

    #[test]
    fn prop_round_trip_exact_iff_divisible(input in 1usize..10_000, stride in 1usize..64) {
        let back = transposed_conv_output_size(conv_output_size(input, stride), stride);
        prop_assert_eq!(back, round_trip_size(input, stride));
        let back = back.unwrap();
        prop_assert_eq!(back == input, input % stride == 0);
        // 不能整除时只会变大
        prop_assert!(back >= input);
    }

    #[test]
    fn prop_validate_idempotent(config in arb_config(), input in arb_input()) {
        prop_assert_eq!(validate(&config, &input), validate(&config, &input));
    }

    #[test]
    fn prop_valid_output_equals_input(config in arb_config(), input in arb_input()) {
        if let Some(output) = validate(&config, &input).output_shape() {
            prop_assert_eq!(output, &input);
        }
    }

    #[test]
    fn prop_valid_implies_exact_skip_connections(config in arb_config(), input in arb_input()) {
        if validate(&config, &input).is_valid() {
            for &size in input.spatial_sizes() {
                prop_assert!(trace_spatial_size(&config, size).unwrap().skip_connections_exact);
            }
        }
    }

    #[test]
    fn prop_next_valid_size_is_valid_and_minimal(config in arb_config(), size in 1usize..200) {
        if let Some(found) = next_valid_spatial_size(&config, 2, size) {
            prop_assert!(found >= size);
            prop_assert!(config.validate(&InputShape::new(2, &[found])).is_valid());
            for smaller in size..found {
                prop_assert!(!config.validate(&InputShape::new(2, &[smaller])).is_valid());
            }
        }
    }

    #[test]
    fn prop_validate_never_panics_on_huge_strides(
        strides in prop::collection::vec(any::<usize>().prop_map(|s| s.max(1)), 1..=4),
        norm in arb_norm(),
        batch in any::<usize>(),
        spatial in prop::collection::vec(any::<usize>(), 1..=3),
        size in any::<usize>(),
    ) {
        let channels: Vec<usize> = (0..=strides.len()).map(|i| 1 << i).collect();
        let config = NetworkConfig::new(&channels, &strides, norm).unwrap();
        let input = InputShape::new(batch, &spatial);
        prop_assert_eq!(validate(&config, &input), validate(&config, &input));
        let _ = trace_spatial_size(&config, size);
        if let Some(found) = next_valid_spatial_size(&config, batch, size) {
            prop_assert!(found >= size);
            prop_assert!(config.validate(&InputShape::new(batch, &[found])).is_valid());
        }
    }
}
