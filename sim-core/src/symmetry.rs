//! Eight-fold mirror symmetry across the three coordinate planes.

use crate::types::Position;
use glam::Vec3;

/// Sign patterns applied to a position, in insertion order.
///
/// The identity comes first, then single-axis flips (x, y, z), then the
/// pairs (xy, xz, yz) and finally the full inversion.
pub const MIRROR_SIGNS: [Vec3; 8] = [
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, -1.0),
];

/// Returns `p` followed by its seven reflections across the YZ, XZ and XY
/// planes and their combinations.
///
/// Coordinates that are zero produce coincident images; no de-duplication
/// happens here.
#[inline]
pub fn mirror_images(p: Position) -> [Position; 8] {
    MIRROR_SIGNS.map(|s| p * s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_image_is_input() {
        let p = Vec3::new(0.3, -1.2, 2.5);
        assert_eq!(mirror_images(p)[0], p);
    }

    #[test]
    fn images_follow_fixed_order() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let images = mirror_images(p);
        assert_eq!(images[1], Vec3::new(-1.0, 2.0, 3.0));
        assert_eq!(images[2], Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(images[3], Vec3::new(1.0, 2.0, -3.0));
        assert_eq!(images[7], Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn origin_maps_onto_itself() {
        for img in mirror_images(Vec3::ZERO) {
            assert_eq!(img.abs(), Vec3::ZERO);
        }
    }

    #[test]
    fn point_on_axis_has_two_distinct_images() {
        let images = mirror_images(Vec3::new(0.5, 0.0, 0.0));
        let mut xs: Vec<f32> = images.iter().map(|p| p.x).collect();
        xs.sort_by(f32::total_cmp);
        xs.dedup();
        assert_eq!(xs, vec![-0.5, 0.5]);
    }

    fn nonzero() -> impl Strategy<Value = f32> {
        prop_oneof![-100.0f32..-1e-3, 1e-3f32..100.0]
    }

    proptest! {
        #[test]
        fn nonzero_point_has_eight_distinct_sign_flips(
            x in nonzero(), y in nonzero(), z in nonzero()
        ) {
            let p = Vec3::new(x, y, z);
            let images = mirror_images(p);

            for (i, a) in images.iter().enumerate() {
                prop_assert_eq!(a.abs(), p.abs());
                for b in &images[i + 1..] {
                    prop_assert_ne!(a, b);
                }
            }
        }
    }
}
