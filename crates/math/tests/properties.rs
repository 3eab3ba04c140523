use approx::{assert_abs_diff_eq, assert_relative_eq};
use core::f32::consts::FRAC_PI_2;

use math::batch;
use math::*;

// Fixed xorshift stream so failures reproduce.
struct Stream(u32);

impl Stream {
    fn next(&mut self) -> f32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 % 20000) as f32 / 1000.0 - 10.0
    }

    fn vec<const D: usize>(&mut self) -> Vector<D> {
        let mut v = Vector::zero();
        for e in v.0.iter_mut() {
            *e = self.next();
        }
        v
    }

    /// Diagonally dominant, hence invertible.
    fn invertible<const D: usize>(&mut self) -> Matrix<D, D> {
        let mut m = Matrix::zero();
        for j in 0..D {
            for i in 0..D {
                m[(i, j)] = self.next() * 0.05;
            }
            m[(j, j)] += 4.0;
        }
        m
    }

    fn unit_quat(&mut self) -> Quat {
        Quat(self.vec::<4>()).normalize()
    }
}

#[test]
fn negation_cancels_exactly() {
    let mut s = Stream(7);
    for _ in 0..32 {
        let v2: Vec2 = s.vec();
        let v3: Vec3 = s.vec();
        let v4: Vec4 = s.vec();
        assert_eq!(v2 + (-v2), Vec2::zero());
        assert_eq!(v3 + (-v3), Vec3::zero());
        assert_eq!(v4 + (-v4), Vec4::zero());
    }
}

#[test]
fn normalized_length_is_one() {
    let mut s = Stream(11);
    for _ in 0..32 {
        let v2: Vec2 = s.vec();
        let v3: Vec3 = s.vec();
        let v4: Vec4 = s.vec();
        assert_abs_diff_eq!(v2.normalize().length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(v3.normalize().length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(v4.normalize().length(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn product_with_inverse_is_identity() {
    let mut s = Stream(13);
    for _ in 0..32 {
        let m2: Mat2 = s.invertible();
        let m3: Mat3 = s.invertible();
        let m4: Mat4 = s.invertible();
        assert_abs_diff_eq!(m2 * m2.invert(), Mat2::identity(), epsilon = 1e-4);
        assert_abs_diff_eq!(m3 * m3.invert(), Mat3::identity(), epsilon = 1e-4);
        assert_abs_diff_eq!(m4 * m4.invert(), Mat4::identity(), epsilon = 1e-4);
    }

    let t = Mat4::translate(Vec3::new(3.0, -1.0, 2.0)) * mat_rotate(0.4, -0.2, 1.3);
    assert_abs_diff_eq!(t * t.invert(), Mat4::identity(), epsilon = 1e-4);
}

#[test]
fn double_transpose_is_exact() {
    let mut s = Stream(17);
    let m: Mat4 = s.invertible();
    assert_eq!(m.transpose().transpose(), m);

    let r = Mat3x4::from_columns([s.vec(), s.vec(), s.vec(), s.vec()]);
    let t: Mat4x3 = r.transpose();
    assert_eq!(t.transpose(), r);
    assert_eq!(t[(3, 1)], r[(1, 3)]);
}

#[test]
fn unit_quaternion_times_inverse_is_identity() {
    let mut s = Stream(19);
    for _ in 0..32 {
        let q = s.unit_quat();
        assert_abs_diff_eq!(q * q.invert(), Quat::identity(), epsilon = 1e-5);
    }
}

#[test]
fn slerp_reproduces_endpoints() {
    let mut s = Stream(23);
    for _ in 0..32 {
        let a = s.unit_quat();
        let b = s.unit_quat();
        assert_abs_diff_eq!(Quat::slerp(a, b, 0.0), a, epsilon = 1e-5);
        assert_abs_diff_eq!(Quat::slerp(a, b, 1.0), b, epsilon = 1e-5);
    }
}

#[test]
fn identity_times_vector_is_exact() {
    let mut s = Stream(29);
    for _ in 0..32 {
        let v: Vec4 = s.vec();
        assert_eq!(mat_identity::<4, 4>() * v, v);
    }
}

#[test]
fn ortho_maps_pixels_to_clip_space() {
    let m = mat_ortho2d(0.0, 640.0, 0.0, 480.0);

    let lo = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
    assert_abs_diff_eq!(lo.xy(), Vec2::new(-1.0, -1.0), epsilon = 1e-6);

    let hi = m * Vec4::new(640.0, 480.0, 0.0, 1.0);
    assert_abs_diff_eq!(hi.xy(), Vec2::new(1.0, 1.0), epsilon = 1e-6);

    let full = mat_ortho(0.0, 640.0, 0.0, 480.0, -1.0, 1.0);
    assert_eq!(full, m);
}

#[test]
fn quarter_turn_about_z() {
    let q = quat_angle_axis(FRAC_PI_2, Vec3::new(0.0, 0.0, 1.0));
    let v = q * Vec3::new(1.0, 0.0, 0.0);
    assert_abs_diff_eq!(v, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
}

#[test]
fn ordering_is_any_lane() {
    let a = Vec3::new(1.0, 5.0, 0.0);
    let b = Vec3::new(2.0, 2.0, 0.0);

    // One lane smaller, one larger: both hold.
    assert!(a < b);
    assert!(a > b);
    assert!(a != b);
    assert_eq!(a.partial_cmp(&b), None);

    let c = Vec3::new(2.0, 3.0, 0.0);
    assert!(b < c);
    assert!(!(b > c));
    assert!(b <= c);
    assert!(c >= b);
    assert!(c >= c);
    assert_eq!(b.partial_cmp(&c), Some(core::cmp::Ordering::Less));

    let v4 = Vec4::new(0.0, 0.0, 0.0, -1.0);
    assert!(v4 < Vec4::zero());
    assert!(!(v4 > Vec4::zero()));
    assert!(Vec2::new(1.0, 0.0) > Vec2::new(0.0, 1.0));
}

#[test]
fn batch_matches_single_values() {
    let mut s = Stream(31);
    let a: Vec<Vec3> = (0..8).map(|_| s.vec()).collect();
    let b: Vec<Vec3> = (0..8).map(|_| s.vec()).collect();
    let k: Vec<f32> = (0..8).map(|_| s.next()).collect();

    let mut out = vec![Vec3::zero(); 8];
    batch::cross(&mut out, &a, &b);
    for i in 0..8 {
        assert_eq!(out[i], a[i].cross(b[i]));
    }

    batch::vec_scalar_sub(&mut out, &k, &a);
    for i in 0..8 {
        assert_eq!(out[i], k[i] - a[i]);
    }

    let mut d = vec![0.0; 8];
    batch::dot(&mut d, &a, &b);
    for i in 0..8 {
        assert_eq!(d[i], a[i].dot(b[i]));
    }

    let m: Vec<Mat4> = (0..8).map(|_| s.invertible()).collect();
    let mut inv = vec![Mat4::zero(); 8];
    batch::invert(&mut inv, &m);
    let mut prod = vec![Mat4::zero(); 8];
    batch::mat_mul(&mut prod, &m, &inv);
    for p in &prod {
        assert_abs_diff_eq!(*p, Mat4::identity(), epsilon = 1e-4);
    }

    let q: Vec<Quat> = (0..8).map(|_| s.unit_quat()).collect();
    let mut r = vec![Vec3::zero(); 8];
    batch::quat_rotate(&mut r, &q, &a);
    for i in 0..8 {
        assert_eq!(r[i], q[i] * a[i]);
        assert_relative_eq!(r[i].length(), a[i].length(), max_relative = 1e-5);
    }
}

#[test]
fn batch_comparisons() {
    let a = [Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)];
    let b = [Vec2::new(1.0, 2.0), Vec2::new(3.0, 5.0)];

    assert!(!batch::vec_eq(&a, &b));
    assert!(batch::vec_ne(&a, &b));
    assert!(batch::vec_eq(&a, &a));
    assert!(!batch::vec_ne(&a, &a));

    // The first pair is equal, so not every pair has a smaller lane.
    assert!(!batch::vec_lt(&a, &b));
    assert!(batch::vec_lt(&a[1..], &b[1..]));
    assert!(batch::vec_gt(&b[1..], &a[1..]));
}

#[test]
fn batch_scalar_forms_use_per_element_scalars() {
    let a = [Mat2::identity(), Mat2::splat(2.0)];
    let mut out = [Mat2::zero(); 2];

    batch::mat_mul_scalar(&mut out, &a, &[3.0, 0.5]);
    assert_eq!(out, [Mat2::new(3.0, 0.0, 0.0, 3.0), Mat2::splat(1.0)]);

    batch::mat_scalar_sub(&mut out, &[1.0, 1.0], &a);
    assert_eq!(out, [Mat2::new(0.0, 1.0, 1.0, 0.0), Mat2::splat(-1.0)]);

    let v = [Vec4::splat(2.0)];
    let mut o = [Vec4::zero()];
    batch::vec_scalar_div(&mut o, &[1.0], &v);
    assert_eq!(o[0], Vec4::splat(0.5));
}

#[test]
fn raw_view_uploads_column_major() {
    let m = Mat4::translate(Vec3::new(1.0, 2.0, 3.0));
    let raw = m.as_slice();
    assert_eq!(raw.len(), 16);
    assert_eq!(&raw[12..], &[1.0, 2.0, 3.0, 1.0]);

    let bytes: &[u8] = bytemuck::bytes_of(&m);
    assert_eq!(bytes.len(), 64);

    let many = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
    let flat: &[f32] = bytemuck::cast_slice(&many);
    assert_eq!(flat, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}
