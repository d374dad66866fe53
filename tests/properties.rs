use std::collections::HashSet;

use proptest::prelude::*;
use scatterkit::core::{AxisRole, AxisType, DataPoint};
use scatterkit::radius::{MAX_RADIUS, MIN_RADIUS, RadiusMapper};
use scatterkit::scale::{LinearScale, OrdinalScale, ScaleBuilder, ticks};

fn arb_linear() -> impl Strategy<Value = LinearScale> {
    (-1e3..1e3f64, 1.0..1e3f64, 1.0..2000.0f64, any::<bool>()).prop_map(
        |(lo, span, length, inverted)| {
            let range = if inverted {
                [length, 0.0]
            } else {
                [0.0, length]
            };
            LinearScale::new([lo, lo + span], range)
        },
    )
}

/// Distance between the first two default ticks, or 1 when there are fewer.
fn first_tick_step(min: f64, max: f64) -> f64 {
    let sample = ticks(min, max, 10);
    match sample[..] {
        [first, second, ..] => second - first,
        _ => 1.0,
    }
}

proptest! {
    #[test]
    fn linear_round_trip(scale in arb_linear(), t in -0.5..1.5f64) {
        let [lo, hi] = scale.domain();
        let v = lo + t * (hi - lo);
        let back = scale.invert(scale.map(v));
        prop_assert!((back - v).abs() < 1e-9, "{v} came back as {back}");
    }

    #[test]
    fn ordinal_positions_are_inside_evenly_spaced_and_bijective(
        n in 1usize..60,
        length in 1.0..2000.0f64,
    ) {
        let labels: Vec<String> = (0..n).map(|i| format!("L{i}")).collect();
        let scale = OrdinalScale::new(labels.iter().cloned(), [0.0, length]);
        prop_assert_eq!(scale.len(), n);

        let positions: Vec<f64> = labels.iter().map(|l| scale.map(l).unwrap()).collect();
        for &p in &positions {
            prop_assert!(p > 0.0 && p < length);
        }
        for pair in positions.windows(2) {
            prop_assert!((pair[1] - pair[0] - scale.step()).abs() < 1e-9);
        }
        let distinct: HashSet<u64> = positions.iter().map(|p| p.to_bits()).collect();
        prop_assert_eq!(distinct.len(), n);

        // each position leads back to the label that produced it
        for (i, &p) in positions.iter().enumerate() {
            let nearest = ((p / scale.step()).round() as usize) - 1;
            prop_assert_eq!(&scale.labels()[nearest], &labels[i]);
        }
    }

    #[test]
    fn radius_stays_in_band(zs in prop::collection::vec(-1e6..1e6f64, 1..40)) {
        let points: Vec<DataPoint> = zs
            .iter()
            .map(|&z| DataPoint::new(0.0, 0.0).with_z(z))
            .collect();
        let mapper = RadiusMapper::new(&points, 3.0);
        for p in &points {
            let r = mapper.radius(p);
            prop_assert!((MIN_RADIUS..=MAX_RADIUS).contains(&r), "radius {r}");
        }
    }

    #[test]
    fn derived_linear_domain_extends_one_end_by_a_tick_step(
        raw in prop::collection::vec(-8000i32..8000, 1..30),
        on_y in any::<bool>(),
        right in any::<bool>(),
    ) {
        let values: Vec<f64> = raw.iter().map(|&v| f64::from(v) / 8.0).collect();
        let role = if on_y { AxisRole::Y } else { AxisRole::X };
        let points: Vec<DataPoint> = values
            .iter()
            .map(|&v| if on_y { DataPoint::new(0.0, v) } else { DataPoint::new(v, 0.0) })
            .collect();
        let scale = ScaleBuilder::new(role, AxisType::Linear, 500.0)
            .y_axis_orient_right(right)
            .build(&points)
            .unwrap();
        let [lo, hi] = scale.as_linear().unwrap().domain();

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let step = first_tick_step(min, max);
        prop_assert!(step > 0.0);
        if on_y || right {
            prop_assert_eq!((lo, hi), (min - step, max));
        } else {
            prop_assert_eq!((lo, hi), (min, max + step));
        }
    }
}
