/// Scalar vector helpers shared by the projector, rasterizer and player movement
use nalgebra::Vector3;

/// Rotate the pair `(a, b)` about the origin by `angle` radians.
///
/// The camera transform applies this three times, each call reading the
/// output of the previous one, so the composed rotation is order dependent.
pub fn rotate2(a: f32, b: f32, angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    (b * sin + a * cos, b * cos - a * sin)
}

/// Euclidean distance between two points.
pub fn distance3(p1: &Vector3<f32>, p2: &Vector3<f32>) -> f32 {
    (p2 - p1).norm()
}

/// Saturating clamp that tests the upper bound first.
///
/// With `lo > hi` every value above `hi` becomes `hi`, and only values at or
/// below `hi` can fall through to the `lo` check.
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    if x > hi {
        hi
    } else if x < lo {
        lo
    } else {
        x
    }
}

/// Signed doubled area of the screen triangle `(x1,y1)-(x2,y2)-(x3,y3)`.
///
/// Positive values are front facing.
pub fn cross_sign(x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> f32 {
    (x2 * y3 - x3 * y2) - (x1 * y3 - x3 * y1) + (x1 * y2 - x2 * y1)
}

/// X component of a step of `length` along `direction`.
pub fn length_dir_x(length: f32, direction: f32) -> f32 {
    -direction.sin() * length
}

/// Y component of a step of `length` along `direction`.
///
/// Uses `tan`, not `sin`. Player movement is tuned against this.
pub fn length_dir_y(length: f32, direction: f32) -> f32 {
    -direction.tan() * length
}

/// Z component of a step of `length` along `direction`.
pub fn length_dir_z(length: f32, direction: f32) -> f32 {
    direction.cos() * length
}

/// Offset from `from` to `to`.
pub fn point_at(from: &Vector3<f32>, to: &Vector3<f32>) -> Vector3<f32> {
    to - from
}

/// Centroid of a triangle.
pub fn center_point(a: &Vector3<f32>, b: &Vector3<f32>, c: &Vector3<f32>) -> Vector3<f32> {
    (a + b + c) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_rotate2_quarter_turn() {
        let (a, b) = rotate2(1.0, 0.0, FRAC_PI_2);
        assert!(a.abs() < EPS);
        assert!((b + 1.0).abs() < EPS);
    }

    #[test]
    fn test_rotate2_four_quarter_turns_is_identity() {
        let (mut a, mut b) = (3.0_f32, -2.0_f32);
        for _ in 0..4 {
            (a, b) = rotate2(a, b, FRAC_PI_2);
        }
        assert!((a - 3.0).abs() < EPS);
        assert!((b + 2.0).abs() < EPS);
    }

    #[test]
    fn test_rotate2_zero_angle() {
        assert_eq!(rotate2(1.5, -4.0, 0.0), (1.5, -4.0));
    }

    #[test]
    fn test_distance3() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 6.0, 3.0);
        assert!((distance3(&a, &b) - 5.0).abs() < EPS);
        assert_eq!(distance3(&a, &a), 0.0);
    }

    #[test]
    fn test_clamp_in_range() {
        for x in [0.0, 0.25, 1.0, 255.0] {
            assert_eq!(clamp(x, 0.0, 255.0), x);
        }
        assert_eq!(clamp(-3.0, 0.0, 255.0), 0.0);
        assert_eq!(clamp(300.0, 0.0, 255.0), 255.0);
    }

    #[test]
    fn test_clamp_swapped_bounds_checks_hi_first() {
        // lo = 10, hi = 0: anything above 0 saturates to hi, the rest to lo.
        assert_eq!(clamp(5.0, 10.0, 0.0), 0.0);
        assert_eq!(clamp(20.0, 10.0, 0.0), 0.0);
        assert_eq!(clamp(-5.0, 10.0, 0.0), 10.0);
        // min-then-max disagrees on the in-between value.
        assert_eq!(5.0_f32.min(0.0).max(10.0), 10.0);
    }

    #[test]
    fn test_clamp_zero_upper_bound_for_negative_steps() {
        // Movement clamps a negative step into [0, speed].
        assert_eq!(clamp(-0.05, 0.0, 0.05), 0.0);
        assert_eq!(clamp(0.02, 0.0, 0.05), 0.02);
    }

    #[test]
    fn test_cross_sign_winding() {
        assert_eq!(cross_sign(0.0, 0.0, 10.0, 0.0, 0.0, 10.0), 100.0);
        assert_eq!(cross_sign(0.0, 0.0, 0.0, 10.0, 10.0, 0.0), -100.0);
        // Translation invariant.
        let shifted = cross_sign(400.0, 300.0, 410.0, 300.0, 400.0, 310.0);
        assert!((shifted - 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_cross_sign_degenerate() {
        assert_eq!(cross_sign(0.0, 0.0, 5.0, 5.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn test_length_dir() {
        assert!(length_dir_x(1.0, 0.0).abs() < EPS);
        assert!((length_dir_z(1.0, 0.0) - 1.0).abs() < EPS);
        assert!((length_dir_x(2.0, FRAC_PI_2) + 2.0).abs() < EPS);
        // tan(pi/4) == 1
        assert!((length_dir_y(0.5, std::f32::consts::FRAC_PI_4) + 0.5).abs() < EPS);
    }

    #[test]
    fn test_point_at_and_center() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(3.0, 0.0, 0.0);
        let c = Vector3::new(0.0, 6.0, 3.0);
        assert_eq!(point_at(&a, &b), Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(center_point(&a, &b, &c), Vector3::new(1.0, 2.0, 1.0));
    }
}
