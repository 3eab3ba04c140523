use core::f32::consts::FRAC_PI_2;
use core::fmt;
use core::ops;
use core::slice;

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use bytemuck::{Pod, Zeroable};

use crate::mat::{mat_rotate3, Mat3, Mat4};
use crate::vec::{Vec3, Vec4};

/// Quaternion `x i + y j + z k + w`.
///
/// Rotation operations assume unit length; nothing enforces it.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(transparent)]
pub struct Quat(pub Vec4);

impl Quat {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Quat {
        Quat(Vec4::new(x, y, z, w))
    }

    #[inline]
    pub const fn from_vector(v: Vec3, w: f32) -> Quat {
        Quat(Vec4::extend(v, w))
    }

    #[inline]
    pub const fn identity() -> Quat {
        Quat::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn x(&self) -> f32 {
        self.0.x()
    }

    #[inline]
    pub const fn y(&self) -> f32 {
        self.0.y()
    }

    #[inline]
    pub const fn z(&self) -> f32 {
        self.0.z()
    }

    #[inline]
    pub const fn w(&self) -> f32 {
        self.0.w()
    }

    #[inline]
    pub fn x_mut(&mut self) -> &mut f32 {
        self.0.x_mut()
    }

    #[inline]
    pub fn y_mut(&mut self) -> &mut f32 {
        self.0.y_mut()
    }

    #[inline]
    pub fn z_mut(&mut self) -> &mut f32 {
        self.0.z_mut()
    }

    #[inline]
    pub fn w_mut(&mut self) -> &mut f32 {
        self.0.w_mut()
    }

    /// Copy of the vector part.
    #[inline]
    pub const fn vector(&self) -> Vec3 {
        self.0.xyz()
    }

    /// The vector part, aliasing `self`.
    #[inline]
    pub fn vector_mut(&mut self) -> &mut Vec3 {
        self.0.xyz_mut()
    }

    #[inline]
    pub const fn as_vec4(&self) -> &Vec4 {
        &self.0
    }

    #[inline]
    pub fn dot(self, b: Quat) -> f32 {
        self.0.dot(b.0)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.0.length()
    }

    #[inline]
    pub fn normalize(self) -> Quat {
        once(self, normalize)
    }

    /// Conjugate. This is the inverse only for unit quaternions.
    #[inline]
    pub fn invert(self) -> Quat {
        once(self, invert)
    }

    /// Rotation axis in xyz and angle in w, in radians.
    ///
    /// The sign of w selects the shorter of the two equivalent rotations, so
    /// the angle is in `[0, pi]`. The identity has no axis and yields NaN.
    pub fn angle_axis(self) -> Vec4 {
        let v = if self.w() > 0.0 { self.vector() } else { -self.vector() };
        let l = v.length();
        let angle = 2.0 * l.atan2(self.w().abs());
        Vec4::extend(v / l, angle)
    }

    pub fn rotation_matrix(self) -> Mat3 {
        let [x, y, z, w] = self.0 .0;

        let xy = x * y;
        let xz = x * z;
        let xw = x * w;
        let yz = y * z;
        let yw = y * w;
        let zw = z * w;
        let x_squared = x * x;
        let y_squared = y * y;
        let z_squared = z * z;

        Mat3::new(
            1.0 - 2.0 * (y_squared + z_squared),
            2.0 * (xy + zw),
            2.0 * (xz - yw),
            2.0 * (xy - zw),
            1.0 - 2.0 * (x_squared + z_squared),
            2.0 * (xw + yz),
            2.0 * (yw + xz),
            2.0 * (yz - xw),
            1.0 - 2.0 * (x_squared + y_squared),
        )
    }

    #[inline]
    pub fn matrix(self) -> Mat4 {
        mat_rotate3(self.rotation_matrix())
    }

    /// `(roll, pitch, yaw)` around x, y and z for `R = Rz * Ry * Rx`.
    ///
    /// At pitch = +-pi/2 roll and yaw rotate around the same axis; roll is
    /// reported as zero and the combined angle goes to yaw.
    pub fn euler_angles(self) -> Vec3 {
        let r = self.rotation_matrix();
        let m = r.as_array();
        let cos2 = m[0] * m[0] + m[1] * m[1];

        if cos2 < 1e-6 {
            let pitch = if m[2] < 0.0 { FRAC_PI_2 } else { -FRAC_PI_2 };
            Vec3::new(0.0, pitch, -m[3].atan2(m[4]))
        } else {
            Vec3::new(m[5].atan2(m[8]), (-m[2]).atan2(cos2.sqrt()), m[1].atan2(m[0]))
        }
    }

    /// Scales the rotation angle by `s` around the same axis.
    #[inline]
    pub fn pow(self, s: f32) -> Quat {
        let mut out = Quat::identity();
        pow(slice::from_mut(&mut out), slice::from_ref(&self), slice::from_ref(&s));
        out
    }

    /// Spherical interpolation from `a` (`s = 0`) to `b` (`s = 1`).
    ///
    /// Both endpoints are reproduced exactly up to rounding, including when
    /// `a` and `b` lie in opposite hemispheres.
    #[inline]
    pub fn slerp(a: Quat, b: Quat, s: f32) -> Quat {
        let mut out = Quat::identity();
        slerp(
            slice::from_mut(&mut out),
            slice::from_ref(&a),
            slice::from_ref(&b),
            slice::from_ref(&s),
        );
        out
    }

    /// Linear interpolation followed by normalization.
    #[inline]
    pub fn nlerp(a: Quat, b: Quat, s: f32) -> Quat {
        Quat(a.0.lerp(b.0, s)).normalize()
    }
}

#[inline]
fn once(a: Quat, k: fn(&mut [Quat], &[Quat])) -> Quat {
    let mut out = Quat::identity();
    k(slice::from_mut(&mut out), slice::from_ref(&a));
    out
}

pub(crate) fn mul(out: &mut [Quat], a: &[Quat], b: &[Quat]) {
    for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
        let (v1, w1) = (a.vector(), a.w());
        let (v2, w2) = (b.vector(), b.w());

        let v = w1 * v2 + w2 * v1 + v1.cross(v2);
        *o = Quat::from_vector(v, w1 * w2 - v1.dot(v2));
    }
}

pub(crate) fn pow(out: &mut [Quat], a: &[Quat], s: &[f32]) {
    for ((o, a), s) in out.iter_mut().zip(a).zip(s) {
        if a.vector().length_squared() == 0.0 {
            *o = Quat::identity();
            continue;
        }
        let aa = a.angle_axis();
        let (sin, cos) = (aa.w() * s * 0.5).sin_cos();
        *o = Quat::from_vector(aa.xyz().normalize() * sin, cos);
    }
}

pub(crate) fn rotate(out: &mut [Vec3], q: &[Quat], v: &[Vec3]) {
    for ((o, q), v) in out.iter_mut().zip(q).zip(v) {
        let (u, w) = (q.vector(), q.w());
        *o = 2.0 * w * u.cross(*v) + (2.0 * w * w - 1.0) * *v + 2.0 * u.dot(*v) * u;
    }
}

pub(crate) fn invert(out: &mut [Quat], a: &[Quat]) {
    for (o, a) in out.iter_mut().zip(a) {
        *o = Quat::from_vector(-a.vector(), a.w());
    }
}

pub(crate) fn normalize(out: &mut [Quat], a: &[Quat]) {
    for (o, a) in out.iter_mut().zip(a) {
        *o = Quat(a.0.normalize());
    }
}

pub(crate) fn slerp(out: &mut [Quat], a: &[Quat], b: &[Quat], s: &[f32]) {
    for (((o, a), b), s) in out.iter_mut().zip(a).zip(b).zip(s) {
        if a.dot(*b) > 0.999999 {
            *o = Quat::nlerp(*a, *b, *s);
            continue;
        }

        // Power of the relative rotation along the arc joining a and b, keeping
        // the sign of its w so that s = 1 lands on b rather than -b.
        let d = a.invert() * *b;
        let l = d.vector().length();
        let half = l.atan2(d.w()) * s;
        let axis = if l > 0.0 { d.vector() / l } else { Vec3::new(1.0, 0.0, 0.0) };
        let (sin, cos) = half.sin_cos();

        *o = *a * Quat::from_vector(axis * sin, cos);
    }
}

/// Rotation of `angle` radians around `axis`, which need not be unit length.
#[inline]
pub fn quat_angle_axis(angle: f32, axis: Vec3) -> Quat {
    let (s, c) = (angle * 0.5).sin_cos();
    Quat::from_vector(axis.normalize() * s, c)
}

/// Inverse of [`Quat::angle_axis`]: axis in xyz, angle in w.
#[inline]
pub fn quat_axis_angle(v: Vec4) -> Quat {
    quat_angle_axis(v.w(), v.xyz())
}

/// From `(roll, pitch, yaw)`, the inverse of [`Quat::euler_angles`].
pub fn quat_euler(angles: Vec3) -> Quat {
    let (sx, cx) = (angles.x() * 0.5).sin_cos();
    let (sy, cy) = (angles.y() * 0.5).sin_cos();
    let (sz, cz) = (angles.z() * 0.5).sin_cos();

    Quat::new(
        sx * cy * cz - cx * sy * sz,
        cx * sy * cz + sx * cy * sz,
        cx * cy * sz - sx * sy * cz,
        cx * cy * cz + sx * sy * sz,
    )
}

/// From a rotation matrix.
///
/// Divides by the largest of the trace and the diagonal terms.
pub fn quat_mat(r: &Mat3) -> Quat {
    let m = r.as_array();
    let trace = m[0] + m[4] + m[8];

    if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        Quat::new((m[5] - m[7]) / s, (m[6] - m[2]) / s, (m[1] - m[3]) / s, 0.25 * s)
    } else if m[0] > m[4] && m[0] > m[8] {
        let s = (1.0 + m[0] - m[4] - m[8]).sqrt() * 2.0;
        Quat::new(0.25 * s, (m[3] + m[1]) / s, (m[6] + m[2]) / s, (m[5] - m[7]) / s)
    } else if m[4] > m[8] {
        let s = (1.0 + m[4] - m[0] - m[8]).sqrt() * 2.0;
        Quat::new((m[3] + m[1]) / s, 0.25 * s, (m[5] + m[7]) / s, (m[6] - m[2]) / s)
    } else {
        let s = (1.0 + m[8] - m[0] - m[4]).sqrt() * 2.0;
        Quat::new((m[6] + m[2]) / s, (m[5] + m[7]) / s, 0.25 * s, (m[1] - m[3]) / s)
    }
}

impl Default for Quat {
    #[inline]
    fn default() -> Quat {
        Quat::identity()
    }
}

impl ops::Index<usize> for Quat {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl ops::IndexMut<usize> for Quat {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.0[i]
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Quat(w: {:.prec$}, x: {:.prec$}, y: {:.prec$}, z: {:.prec$})",
            self.w(),
            self.x(),
            self.y(),
            self.z(),
            prec = f.precision().unwrap_or(3)
        )
    }
}

/// Hamilton product.
impl ops::Mul<Quat> for Quat {
    type Output = Quat;

    #[inline]
    fn mul(self, rhs: Quat) -> Quat {
        let mut out = Quat::identity();
        mul(slice::from_mut(&mut out), slice::from_ref(&self), slice::from_ref(&rhs));
        out
    }
}

impl ops::MulAssign<Quat> for Quat {
    #[inline]
    fn mul_assign(&mut self, rhs: Quat) {
        *self = *self * rhs;
    }
}

/// Rotation power, see [`Quat::pow`].
impl ops::Mul<f32> for Quat {
    type Output = Quat;

    #[inline]
    fn mul(self, rhs: f32) -> Quat {
        self.pow(rhs)
    }
}

impl ops::Mul<Quat> for f32 {
    type Output = Quat;

    #[inline]
    fn mul(self, rhs: Quat) -> Quat {
        rhs.pow(self)
    }
}

/// Rotates a vector.
impl ops::Mul<Vec3> for Quat {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        let mut out = Vec3::zero();
        rotate(slice::from_mut(&mut out), slice::from_ref(&self), slice::from_ref(&rhs));
        out
    }
}

impl AbsDiffEq for Quat {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Quat, epsilon: f32) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for Quat {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Quat, epsilon: f32, max_relative: f32) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}

impl UlpsEq for Quat {
    fn default_max_ulps() -> u32 {
        f32::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Quat, epsilon: f32, max_ulps: u32) -> bool {
        self.0.ulps_eq(&other.0, epsilon, max_ulps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f32::consts::PI;

    #[test]
    fn euler_round_trip() {
        for angles in [
            Vec3::new(0.1, 0.2, 0.3),
            Vec3::new(-1.0, 0.7, 2.5),
            Vec3::new(2.9, -1.2, -0.4),
        ] {
            let q = quat_euler(angles);
            assert_abs_diff_eq!(q.length(), 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(q.euler_angles(), angles, epsilon = 1e-5);
        }
    }

    #[test]
    fn euler_gimbal_lock() {
        let q = quat_euler(Vec3::new(0.0, FRAC_PI_2, 0.8));
        let e = q.euler_angles();
        assert_abs_diff_eq!(e.y(), FRAC_PI_2, epsilon = 1e-6);
        assert_eq!(e.x(), 0.0);
        assert_abs_diff_eq!(e.z(), 0.8, epsilon = 1e-3);

        let q = quat_euler(Vec3::new(0.0, -FRAC_PI_2, -0.3));
        assert_abs_diff_eq!(q.euler_angles().y(), -FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn matrix_round_trip_every_branch() {
        let axis = Vec3::new(1.0, 2.0, 3.0).normalize();
        let samples = [
            quat_angle_axis(0.5, axis),
            quat_angle_axis(PI * 0.95, Vec3::new(1.0, 0.1, 0.0).normalize()),
            quat_angle_axis(PI * 0.95, Vec3::new(0.1, 1.0, 0.0).normalize()),
            quat_angle_axis(PI * 0.95, Vec3::new(0.0, 0.1, 1.0).normalize()),
        ];
        for q in samples {
            let r = quat_mat(&q.rotation_matrix());
            // q and -q are the same rotation.
            let r = if r.dot(q) < 0.0 { Quat(-r.0) } else { r };
            assert_abs_diff_eq!(r, q, epsilon = 1e-5);
        }
    }

    #[test]
    fn rotation_agrees_with_matrix() {
        let q = quat_angle_axis(1.1, Vec3::new(-2.0, 1.0, 0.5).normalize());
        let v = Vec3::new(0.3, -4.0, 2.0);
        assert_abs_diff_eq!(q * v, q.rotation_matrix() * v, epsilon = 1e-5);
        assert_abs_diff_eq!(q.matrix().transform_point(v), q * v, epsilon = 1e-5);
    }

    #[test]
    fn angle_axis_and_power() {
        let axis = Vec3::new(0.0, 1.0, 0.0);
        let q = quat_angle_axis(1.2, axis);
        assert_abs_diff_eq!(q.angle_axis(), Vec4::extend(axis, 1.2), epsilon = 1e-6);
        assert_abs_diff_eq!(quat_axis_angle(q.angle_axis()), q, epsilon = 1e-6);

        assert_abs_diff_eq!(q * 0.5, quat_angle_axis(0.6, axis), epsilon = 1e-6);
        assert_abs_diff_eq!(2.0 * q, q * q, epsilon = 1e-6);
        assert_eq!(Quat::identity().pow(3.0), Quat::identity());

        // -q is the same rotation; the angle stays on the short side.
        assert_abs_diff_eq!(Quat(-q.0).angle_axis(), Vec4::extend(axis, 1.2), epsilon = 1e-6);
    }

    #[test]
    fn angle_axis_normalizes_axis() {
        let q = quat_angle_axis(FRAC_PI_2, Vec3::new(0.0, 0.0, 2.0));
        assert_abs_diff_eq!(q.length(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q * Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);

        let long = quat_axis_angle(Vec4::new(3.0, -6.0, 2.0, 0.9));
        let unit = quat_angle_axis(0.9, Vec3::new(3.0, -6.0, 2.0) / 7.0);
        assert_abs_diff_eq!(long, unit, epsilon = 1e-6);
    }

    #[test]
    fn slerp_midpoint_and_hemispheres() {
        let a = quat_angle_axis(0.2, Vec3::new(0.0, 0.0, 1.0));
        let b = quat_angle_axis(1.0, Vec3::new(0.0, 0.0, 1.0));
        let mid = Quat::slerp(a, b, 0.5);
        assert_abs_diff_eq!(mid, quat_angle_axis(0.6, Vec3::new(0.0, 0.0, 1.0)), epsilon = 1e-6);

        let c = Quat(-b.0);
        assert_abs_diff_eq!(Quat::slerp(a, c, 0.0), a, epsilon = 1e-6);
        assert_abs_diff_eq!(Quat::slerp(a, c, 1.0), c, epsilon = 1e-5);

        // Nearly parallel inputs take the normalized lerp path.
        let d = quat_angle_axis(0.2001, Vec3::new(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(Quat::slerp(a, d, 0.5).length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn accessors() {
        let mut q = Quat::new(1.0, 2.0, 3.0, 4.0);
        *q.vector_mut() *= 2.0;
        *q.w_mut() = 0.5;
        assert_eq!(q, Quat::new(2.0, 4.0, 6.0, 0.5));
        assert_eq!(q[2], 6.0);
        assert_eq!(q.vector(), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(q.invert(), Quat::new(-2.0, -4.0, -6.0, 0.5));
        assert_eq!(format!("{:.1}", q), "Quat(w: 0.5, x: 2.0, y: 4.0, z: 6.0)");
        assert_eq!(bytemuck::cast::<Quat, [f32; 4]>(q), [2.0, 4.0, 6.0, 0.5]);
    }
}
