use proptest::prelude::*;
use spinwheel::geometry::{self, LABEL_RADIUS, MAX_FONT_SIZE, MIN_FONT_SIZE};
use spinwheel::palette::{self, PALETTE};

proptest! {
    #[test]
    fn slice_angles__sum_to_a_full_circle(n in 2usize..=48) {
        let total: f64 = (0..n).map(|_| geometry::slice_angle(n)).sum();
        prop_assert!((total - 360.0).abs() < 1e-9, "n={} total={}", n, total);
    }

    #[test]
    fn slice_paths__tile_without_gap_or_overlap(n in 2usize..=48, i in 0usize..48) {
        prop_assume!(i + 1 < n);
        let a = geometry::slice_path(i, n);
        let b = geometry::slice_path(i + 1, n);
        prop_assert_eq!(a.end_angle, b.start_angle);
    }

    #[test]
    fn resolve_winner__ignores_whole_turns(
        angle in 0.0f64..360.0,
        turns in 0u32..12,
        n in 2usize..=24,
    ) {
        let shifted = angle + f64::from(turns) * 360.0;
        prop_assert_eq!(
            geometry::resolve_winner(shifted, n),
            geometry::resolve_winner(angle, n)
        );
    }

    #[test]
    fn resolve_winner__always_names_a_slice(
        angle in -10_000.0f64..10_000.0,
        n in 2usize..=24,
    ) {
        prop_assert!(geometry::resolve_winner(angle, n) < n);
    }

    #[test]
    fn labels__stay_inside_the_rim(n in 2usize..=48, i in 0usize..48) {
        prop_assume!(i < n);
        let placement = geometry::label_placement(i, n);
        let dx = placement.x - geometry::CENTER;
        let dy = placement.y - geometry::CENTER;
        let distance = (dx * dx + dy * dy).sqrt();
        prop_assert!((distance - LABEL_RADIUS).abs() < 1e-9);
        prop_assert!(placement.font_size >= MIN_FONT_SIZE);
        prop_assert!(placement.font_size <= MAX_FONT_SIZE);
    }

    #[test]
    fn font_size__never_grows_with_more_options(n in 2usize..=47) {
        prop_assert!(geometry::font_size(n + 1) <= geometry::font_size(n));
    }

    #[test]
    fn palette__cycles_by_list_length(len in 0usize..200) {
        prop_assert_eq!(
            palette::color_for(len),
            palette::color_for(len + PALETTE.len())
        );
    }
}

#[test]
fn winner_examples_match_the_formula() {
    // (360 - angle) / (360 / n), floored, wrapped into 0..n.
    assert_eq!(geometry::resolve_winner(0.0, 4), 0);
    assert_eq!(geometry::resolve_winner(270.0, 4), 1);
    assert_eq!(geometry::resolve_winner(45.0, 4), 3);
}
