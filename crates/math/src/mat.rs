use core::cmp::Ordering;
use core::fmt;
use core::ops;
use core::slice;

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use bytemuck::{Pod, Zeroable};

use crate::backend::{F32x4, Mat4x4, Simd4f};
use crate::error::MathError;
use crate::quat::quat_angle_axis;
use crate::vec::{Vec1, Vec2, Vec3, Vec4, Vector};

/// `R` rows by `C` columns, stored as `C` column vectors.
///
/// The memory layout is `R * C` floats in column-major order with no padding,
/// which is what uniform uploads expect.
#[derive(Debug, Copy, Clone)]
#[repr(transparent)]
pub struct Matrix<const R: usize, const C: usize>(pub [Vector<R>; C]);

pub type Mat2 = Matrix<2, 2>;
pub type Mat3 = Matrix<3, 3>;
pub type Mat4 = Matrix<4, 4>;

// Rows x columns.
pub type Mat2x3 = Matrix<2, 3>;
pub type Mat2x4 = Matrix<2, 4>;
pub type Mat3x2 = Matrix<3, 2>;
pub type Mat3x4 = Matrix<3, 4>;
pub type Mat4x2 = Matrix<4, 2>;
pub type Mat4x3 = Matrix<4, 3>;

unsafe impl<const R: usize, const C: usize> Zeroable for Matrix<R, C> {}
unsafe impl<const R: usize, const C: usize> Pod for Matrix<R, C> {}

/// Shape tag selecting the matrix kernels for `R x C`.
pub struct Shape<const R: usize, const C: usize>;

/// Batch kernels over parallel slices of matrices.
///
/// Defaults are element loops; `Shape<4, 4>` runs on the 4x4 register matrix.
pub trait MatrixKernel<const R: usize, const C: usize> {
    #[inline]
    fn negate(out: &mut [Matrix<R, C>], a: &[Matrix<R, C>]) {
        elems1(out, a, |a| -a)
    }

    #[inline]
    fn add(out: &mut [Matrix<R, C>], a: &[Matrix<R, C>], b: &[Matrix<R, C>]) {
        elems2(out, a, b, |a, b| a + b)
    }

    #[inline]
    fn sub(out: &mut [Matrix<R, C>], a: &[Matrix<R, C>], b: &[Matrix<R, C>]) {
        elems2(out, a, b, |a, b| a - b)
    }

    #[inline]
    fn add_scalar(out: &mut [Matrix<R, C>], a: &[Matrix<R, C>], s: &[f32]) {
        elems_s(out, a, s, |a, s| a + s)
    }

    #[inline]
    fn sub_scalar(out: &mut [Matrix<R, C>], a: &[Matrix<R, C>], s: &[f32]) {
        elems_s(out, a, s, |a, s| a - s)
    }

    #[inline]
    fn scalar_sub(out: &mut [Matrix<R, C>], s: &[f32], a: &[Matrix<R, C>]) {
        elems_s(out, a, s, |a, s| s - a)
    }

    #[inline]
    fn mul_scalar(out: &mut [Matrix<R, C>], a: &[Matrix<R, C>], s: &[f32]) {
        elems_s(out, a, s, |a, s| a * s)
    }

    #[inline]
    fn div_scalar(out: &mut [Matrix<R, C>], a: &[Matrix<R, C>], s: &[f32]) {
        elems_s(out, a, s, |a, s| a / s)
    }

    #[inline]
    fn scalar_div(out: &mut [Matrix<R, C>], s: &[f32], a: &[Matrix<R, C>]) {
        elems_s(out, a, s, |a, s| s / a)
    }

    #[inline]
    fn hadamard(out: &mut [Matrix<R, C>], a: &[Matrix<R, C>], b: &[Matrix<R, C>]) {
        elems2(out, a, b, |a, b| a * b)
    }

    /// `(R x C) * (C x K) -> (R x K)`
    #[inline]
    fn mul_matrix<const K: usize>(
        out: &mut [Matrix<R, K>],
        a: &[Matrix<R, C>],
        b: &[Matrix<C, K>],
    ) {
        for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
            for (oc, bc) in o.0.iter_mut().zip(b.0.iter()) {
                *oc = column_combination(a, bc);
            }
        }
    }

    #[inline]
    fn mul_vector(out: &mut [Vector<R>], a: &[Matrix<R, C>], v: &[Vector<C>]) {
        for ((o, a), v) in out.iter_mut().zip(a).zip(v) {
            *o = column_combination(a, v);
        }
    }

    /// Row vector times matrix.
    #[inline]
    fn vector_mul(out: &mut [Vector<C>], v: &[Vector<R>], a: &[Matrix<R, C>]) {
        for ((o, v), a) in out.iter_mut().zip(v).zip(a) {
            for (o, col) in o.0.iter_mut().zip(a.0.iter()) {
                *o = col.0.iter().zip(v.0.iter()).fold(-0.0, |acc, (c, v)| acc + c * v);
            }
        }
    }

    #[inline]
    fn transpose(out: &mut [Matrix<C, R>], a: &[Matrix<R, C>]) {
        for (o, a) in out.iter_mut().zip(a) {
            for (j, col) in a.0.iter().enumerate() {
                for (i, e) in col.0.iter().enumerate() {
                    o.0[i].0[j] = *e;
                }
            }
        }
    }

    #[inline]
    fn outer_product(out: &mut [Matrix<R, C>], a: &[Vector<R>], b: &[Vector<C>]) {
        for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
            for (oc, s) in o.0.iter_mut().zip(b.0.iter()) {
                *oc = Vector(a.0.map(|a| a * s));
            }
        }
    }

    /// Every pair has all elements equal.
    #[inline]
    fn eq(a: &[Matrix<R, C>], b: &[Matrix<R, C>]) -> bool {
        a.iter().zip(b).all(|(a, b)| a.as_slice() == b.as_slice())
    }

    /// Every pair has at least one element where `a < b`.
    #[inline]
    fn lt(a: &[Matrix<R, C>], b: &[Matrix<R, C>]) -> bool {
        a.iter()
            .zip(b)
            .all(|(a, b)| a.as_slice().iter().zip(b.as_slice()).any(|(a, b)| a < b))
    }

    /// Every pair has at least one element where `a > b`.
    #[inline]
    fn gt(a: &[Matrix<R, C>], b: &[Matrix<R, C>]) -> bool {
        a.iter()
            .zip(b)
            .all(|(a, b)| a.as_slice().iter().zip(b.as_slice()).any(|(a, b)| a > b))
    }
}

/// `sum_k a[k] * v[k]` over the columns of `a`, accumulated in column order.
#[inline]
fn column_combination<const R: usize, const C: usize>(a: &Matrix<R, C>, v: &Vector<C>) -> Vector<R> {
    let mut r = Vector::zero();
    for (k, (col, s)) in a.0.iter().zip(v.0.iter()).enumerate() {
        for i in 0..R {
            r.0[i] = if k == 0 { col.0[i] * s } else { r.0[i] + col.0[i] * s };
        }
    }
    r
}

#[inline]
fn elems1<const R: usize, const C: usize>(
    out: &mut [Matrix<R, C>],
    a: &[Matrix<R, C>],
    f: impl Fn(f32) -> f32,
) {
    for (o, a) in out.iter_mut().zip(a) {
        for (o, a) in o.as_mut_slice().iter_mut().zip(a.as_slice()) {
            *o = f(*a);
        }
    }
}

#[inline]
fn elems2<const R: usize, const C: usize>(
    out: &mut [Matrix<R, C>],
    a: &[Matrix<R, C>],
    b: &[Matrix<R, C>],
    f: impl Fn(f32, f32) -> f32,
) {
    for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
        let ab = a.as_slice().iter().zip(b.as_slice());
        for (o, (a, b)) in o.as_mut_slice().iter_mut().zip(ab) {
            *o = f(*a, *b);
        }
    }
}

#[inline]
fn elems_s<const R: usize, const C: usize>(
    out: &mut [Matrix<R, C>],
    a: &[Matrix<R, C>],
    s: &[f32],
    f: impl Fn(f32, f32) -> f32,
) {
    for ((o, a), s) in out.iter_mut().zip(a).zip(s) {
        for (o, a) in o.as_mut_slice().iter_mut().zip(a.as_slice()) {
            *o = f(*a, *s);
        }
    }
}

macro_rules! generic_matrix_kernel {
    ($( ($r: literal, $c: literal) ),*) => {
        $( impl MatrixKernel<$r, $c> for Shape<$r, $c> {} )*
    }
}

generic_matrix_kernel!(
    (1, 1), (1, 2), (1, 3), (1, 4),
    (2, 1), (2, 2), (2, 3), (2, 4),
    (3, 1), (3, 2), (3, 3), (3, 4),
    (4, 1), (4, 2), (4, 3)
);

#[inline]
fn load(m: &Mat4) -> Mat4x4 {
    Mat4x4::load(m.as_array())
}

#[inline]
fn store(r: Mat4x4, m: &mut Mat4) {
    r.store(m.as_array_mut())
}

#[inline]
fn simd1(out: &mut [Mat4], a: &[Mat4], f: impl Fn(Mat4x4) -> Mat4x4) {
    for (o, a) in out.iter_mut().zip(a) {
        store(f(load(a)), o);
    }
}

#[inline]
fn simd2(out: &mut [Mat4], a: &[Mat4], b: &[Mat4], f: impl Fn(Mat4x4, Mat4x4) -> Mat4x4) {
    for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
        store(f(load(a), load(b)), o);
    }
}

#[inline]
fn simd_s(out: &mut [Mat4], a: &[Mat4], s: &[f32], f: impl Fn(Mat4x4, f32) -> Mat4x4) {
    for ((o, a), s) in out.iter_mut().zip(a).zip(s) {
        store(f(load(a), *s), o);
    }
}

impl MatrixKernel<4, 4> for Shape<4, 4> {
    #[inline]
    fn negate(out: &mut [Mat4], a: &[Mat4]) {
        simd1(out, a, |a| Mat4x4::zero().sub(a))
    }

    #[inline]
    fn add(out: &mut [Mat4], a: &[Mat4], b: &[Mat4]) {
        simd2(out, a, b, Mat4x4::add)
    }

    #[inline]
    fn sub(out: &mut [Mat4], a: &[Mat4], b: &[Mat4]) {
        simd2(out, a, b, Mat4x4::sub)
    }

    #[inline]
    fn add_scalar(out: &mut [Mat4], a: &[Mat4], s: &[f32]) {
        simd_s(out, a, s, |a, s| a.add_scalar(F32x4::splat(s)))
    }

    #[inline]
    fn sub_scalar(out: &mut [Mat4], a: &[Mat4], s: &[f32]) {
        simd_s(out, a, s, |a, s| a.sub(Mat4x4::splat(s)))
    }

    #[inline]
    fn scalar_sub(out: &mut [Mat4], s: &[f32], a: &[Mat4]) {
        simd_s(out, a, s, |a, s| Mat4x4::splat(s).sub(a))
    }

    #[inline]
    fn mul_scalar(out: &mut [Mat4], a: &[Mat4], s: &[f32]) {
        simd_s(out, a, s, |a, s| a.mul_scalar(F32x4::splat(s)))
    }

    #[inline]
    fn div_scalar(out: &mut [Mat4], a: &[Mat4], s: &[f32]) {
        simd_s(out, a, s, |a, s| a.div(Mat4x4::splat(s)))
    }

    #[inline]
    fn scalar_div(out: &mut [Mat4], s: &[f32], a: &[Mat4]) {
        simd_s(out, a, s, |a, s| Mat4x4::splat(s).div(a))
    }

    #[inline]
    fn hadamard(out: &mut [Mat4], a: &[Mat4], b: &[Mat4]) {
        simd2(out, a, b, Mat4x4::mul)
    }

    #[inline]
    fn mul_matrix<const K: usize>(out: &mut [Matrix<4, K>], a: &[Mat4], b: &[Matrix<4, K>]) {
        for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
            let m = load(a);
            for (oc, bc) in o.0.iter_mut().zip(b.0.iter()) {
                m.matrix_vector_mul(F32x4::load4(&bc.0)).store4(&mut oc.0);
            }
        }
    }

    #[inline]
    fn mul_vector(out: &mut [Vec4], a: &[Mat4], v: &[Vec4]) {
        for ((o, a), v) in out.iter_mut().zip(a).zip(v) {
            load(a).matrix_vector_mul(F32x4::load4(&v.0)).store4(&mut o.0);
        }
    }

    #[inline]
    fn vector_mul(out: &mut [Vec4], v: &[Vec4], a: &[Mat4]) {
        for ((o, v), a) in out.iter_mut().zip(v).zip(a) {
            let t = load(a).transpose();
            t.matrix_vector_mul(F32x4::load4(&v.0)).store4(&mut o.0);
        }
    }

    #[inline]
    fn transpose(out: &mut [Mat4], a: &[Mat4]) {
        simd1(out, a, Mat4x4::transpose)
    }

    #[inline]
    fn outer_product(out: &mut [Mat4], a: &[Vec4], b: &[Vec4]) {
        for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
            let c = F32x4::load4(&a.0);
            let s = F32x4::load4(&b.0);
            let m = Mat4x4::create(
                c.mul(s.splat_x()),
                c.mul(s.splat_y()),
                c.mul(s.splat_z()),
                c.mul(s.splat_w()),
            );
            store(m, o);
        }
    }
}

/// Closed-form inverse, available for 2x2, 3x3 and 4x4 only.
///
/// Singular input is not detected; the result holds non-finite values.
pub trait Invert<const D: usize> {
    fn invert(out: &mut [Matrix<D, D>], a: &[Matrix<D, D>]);
}

impl Invert<2> for Shape<2, 2> {
    fn invert(out: &mut [Mat2], a: &[Mat2]) {
        for (o, a) in out.iter_mut().zip(a) {
            let [m0, m1, m2, m3] = *a.as_array();
            let det = m0 * m3 - m1 * m2;
            *o = Mat2::new(m3 / det, m1 / -det, m2 / -det, m0 / det);
        }
    }
}

impl Invert<3> for Shape<3, 3> {
    fn invert(out: &mut [Mat3], a: &[Mat3]) {
        for (o, a) in out.iter_mut().zip(a) {
            let [m0, m1, m2, m3, m4, m5, m6, m7, m8] = *a.as_array();

            // Cofactors of the first column.
            let sub11 = m4 * m8 - m5 * m7;
            let sub12 = -m1 * m8 + m2 * m7;
            let sub13 = m1 * m5 - m2 * m4;

            let det = m0 * sub11 + m3 * sub12 + m6 * sub13;

            *o = Mat3::new(
                sub11 / det,
                sub12 / det,
                sub13 / det,
                (m6 * m5 - m3 * m8) / det,
                (m0 * m8 - m6 * m2) / det,
                (m3 * m2 - m0 * m5) / det,
                (m3 * m7 - m6 * m4) / det,
                (m6 * m1 - m0 * m7) / det,
                (m0 * m4 - m3 * m1) / det,
            );
        }
    }
}

impl Invert<4> for Shape<4, 4> {
    fn invert(out: &mut [Mat4], a: &[Mat4]) {
        simd1(out, a, |a| a.inverse().0)
    }
}

#[inline]
fn apply<const R: usize, const C: usize>(
    a: Matrix<R, C>,
    k: fn(&mut [Matrix<R, C>], &[Matrix<R, C>]),
) -> Matrix<R, C> {
    let mut out = Matrix::zero();
    k(slice::from_mut(&mut out), slice::from_ref(&a));
    out
}

#[inline]
fn apply2<const R: usize, const C: usize>(
    a: Matrix<R, C>,
    b: Matrix<R, C>,
    k: fn(&mut [Matrix<R, C>], &[Matrix<R, C>], &[Matrix<R, C>]),
) -> Matrix<R, C> {
    let mut out = Matrix::zero();
    k(slice::from_mut(&mut out), slice::from_ref(&a), slice::from_ref(&b));
    out
}

#[inline]
fn apply_scalar<const R: usize, const C: usize>(
    a: Matrix<R, C>,
    s: f32,
    k: fn(&mut [Matrix<R, C>], &[Matrix<R, C>], &[f32]),
) -> Matrix<R, C> {
    let mut out = Matrix::zero();
    k(slice::from_mut(&mut out), slice::from_ref(&a), slice::from_ref(&s));
    out
}

#[inline]
fn apply_scalar_first<const R: usize, const C: usize>(
    s: f32,
    a: Matrix<R, C>,
    k: fn(&mut [Matrix<R, C>], &[f32], &[Matrix<R, C>]),
) -> Matrix<R, C> {
    let mut out = Matrix::zero();
    k(slice::from_mut(&mut out), slice::from_ref(&s), slice::from_ref(&a));
    out
}

impl<const R: usize, const C: usize> Matrix<R, C> {
    #[inline]
    pub const fn zero() -> Self {
        Matrix([Vector::zero(); C])
    }

    #[inline]
    pub const fn splat(s: f32) -> Self {
        Matrix([Vector::splat(s); C])
    }

    #[inline]
    pub const fn from_columns(c: [Vector<R>; C]) -> Self {
        Matrix(c)
    }

    /// Ones on the main diagonal, zero elsewhere.
    #[inline]
    pub fn identity() -> Self {
        let mut m = Self::zero();
        for i in 0..R.min(C) {
            m.0[i].0[i] = 1.0;
        }
        m
    }

    /// Reads the first `R * C` floats of `a`, column-major. Panics if `a` is
    /// shorter.
    #[inline]
    pub fn from_slice(a: &[f32]) -> Self {
        let mut m = Self::zero();
        m.as_mut_slice().copy_from_slice(&a[..R * C]);
        m
    }

    #[inline]
    pub fn column(&self, j: usize) -> Vector<R> {
        self.0[j]
    }

    #[inline]
    pub fn column_mut(&mut self, j: usize) -> &mut Vector<R> {
        &mut self.0[j]
    }

    /// The `R * C` floats in column-major order.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.0)
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        bytemuck::cast_slice_mut(&mut self.0)
    }
}

impl<const R: usize, const C: usize> Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    #[inline]
    pub fn transpose(self) -> Matrix<C, R> {
        let mut out = Matrix::zero();
        Shape::<R, C>::transpose(slice::from_mut(&mut out), slice::from_ref(&self));
        out
    }

    #[inline]
    pub fn hadamard_product(self, b: Self) -> Self {
        apply2(self, b, Shape::<R, C>::hadamard)
    }

    /// Column `j` is `a * b[j]`.
    #[inline]
    pub fn outer_product(a: Vector<R>, b: Vector<C>) -> Self {
        let mut out = Self::zero();
        Shape::<R, C>::outer_product(
            slice::from_mut(&mut out),
            slice::from_ref(&a),
            slice::from_ref(&b),
        );
        out
    }
}

impl<const D: usize> Matrix<D, D>
where
    Shape<D, D>: Invert<D>,
{
    /// Inverse of a 2x2, 3x3 or 4x4 matrix. A singular matrix yields
    /// non-finite elements.
    #[inline]
    pub fn invert(self) -> Self {
        apply(self, <Shape<D, D> as Invert<D>>::invert)
    }
}

impl Mat2 {
    #[inline]
    pub const fn new(m00: f32, m10: f32, m01: f32, m11: f32) -> Mat2 {
        Matrix([Vector([m00, m10]), Vector([m01, m11])])
    }

    #[inline]
    pub fn scale(v: Vec2) -> Mat2 {
        Mat2::new(v.x(), 0.0, 0.0, v.y())
    }

    #[inline]
    pub fn as_array(&self) -> &[f32; 4] {
        bytemuck::cast_ref(self)
    }
}

impl Mat3 {
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        m00: f32, m10: f32, m20: f32,
        m01: f32, m11: f32, m21: f32,
        m02: f32, m12: f32, m22: f32,
    ) -> Mat3 {
        Matrix([
            Vector([m00, m10, m20]),
            Vector([m01, m11, m21]),
            Vector([m02, m12, m22]),
        ])
    }

    /// 2D homogeneous translation.
    #[inline]
    pub fn translate(v: Vec2) -> Mat3 {
        let mut m = Mat3::identity();
        m.0[2] = Vec3::extend(v, 1.0);
        m
    }

    #[inline]
    pub fn scale(v: Vec2) -> Mat3 {
        let mut m = Mat3::identity();
        m.0[0].0[0] = v.x();
        m.0[1].0[1] = v.y();
        m
    }

    #[inline]
    pub fn as_array(&self) -> &[f32; 9] {
        bytemuck::cast_ref(self)
    }
}

impl Mat4 {
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        m00: f32, m10: f32, m20: f32, m30: f32,
        m01: f32, m11: f32, m21: f32, m31: f32,
        m02: f32, m12: f32, m22: f32, m32: f32,
        m03: f32, m13: f32, m23: f32, m33: f32,
    ) -> Mat4 {
        Matrix([
            Vector([m00, m10, m20, m30]),
            Vector([m01, m11, m21, m31]),
            Vector([m02, m12, m22, m32]),
            Vector([m03, m13, m23, m33]),
        ])
    }

    #[inline]
    pub fn translate(v: Vec3) -> Mat4 {
        let mut m = Mat4::identity();
        m.0[3] = Vec4::extend(v, 1.0);
        m
    }

    #[inline]
    pub fn scale(v: Vec3) -> Mat4 {
        let mut m = Mat4::identity();
        for i in 0..3 {
            m.0[i].0[i] = v.0[i];
        }
        m
    }

    #[inline]
    pub fn as_array(&self) -> &[f32; 16] {
        bytemuck::cast_ref(self)
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> &mut [f32; 16] {
        bytemuck::cast_mut(self)
    }

    /// Transforms a point, with an implicit w of 1.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let mut out = Vec3::zero();
        load(self).matrix_point3_mul(F32x4::load3(&p.0)).store3(&mut out.0);
        out
    }

    /// Transforms a direction; the translation column is ignored.
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let mut out = Vec3::zero();
        load(self).matrix_vector3_mul(F32x4::load3(&v.0)).store3(&mut out.0);
        out
    }
}

macro_rules! translation_vector_impl {
    ($d: literal, $v: ident) => {
        impl Matrix<$d, $d> {
            /// Leading elements of the last column.
            #[inline]
            pub fn translation_vector(&self) -> $v {
                Vector::from_slice(&self.0[$d - 1].0)
            }
        }
    };
}

translation_vector_impl!(2, Vec1);
translation_vector_impl!(3, Vec2);
translation_vector_impl!(4, Vec3);

impl<const R: usize, const C: usize> Default for Matrix<R, C> {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl<const R: usize, const C: usize> TryFrom<&[f32]> for Matrix<R, C> {
    type Error = MathError;

    fn try_from(a: &[f32]) -> Result<Self, MathError> {
        if a.len() != R * C {
            return Err(MathError::LengthMismatch {
                expected: R * C,
                found: a.len(),
            });
        }
        Ok(Self::from_slice(a))
    }
}

impl<const R: usize, const C: usize> ops::Index<usize> for Matrix<R, C> {
    type Output = Vector<R>;

    #[inline]
    fn index(&self, j: usize) -> &Vector<R> {
        debug_assert!(j < C, "column {} out of range for Mat{}x{}", j, R, C);
        &self.0[j]
    }
}

impl<const R: usize, const C: usize> ops::IndexMut<usize> for Matrix<R, C> {
    #[inline]
    fn index_mut(&mut self, j: usize) -> &mut Vector<R> {
        debug_assert!(j < C, "column {} out of range for Mat{}x{}", j, R, C);
        &mut self.0[j]
    }
}

/// `m[(row, col)]`
impl<const R: usize, const C: usize> ops::Index<(usize, usize)> for Matrix<R, C> {
    type Output = f32;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        &self[j][i]
    }
}

impl<const R: usize, const C: usize> ops::IndexMut<(usize, usize)> for Matrix<R, C> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f32 {
        &mut self[j][i]
    }
}

impl<const R: usize, const C: usize> fmt::Display for Matrix<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prec = f.precision().unwrap_or(3);
        write!(f, "Mat{}x{}(", R, C)?;
        for i in 0..R {
            if i > 0 {
                write!(f, "; ")?;
            }
            for j in 0..C {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:.prec$}", self.0[j].0[i], prec = prec)?;
            }
        }
        write!(f, ")")
    }
}

impl<const R: usize, const C: usize> ops::Neg for Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        apply(self, Shape::<R, C>::negate)
    }
}

macro_rules! mat_op_impl {
    ($trait: ident, $func: ident, $kernel: ident) => {
        impl<const R: usize, const C: usize> ops::$trait<Matrix<R, C>> for Matrix<R, C>
        where
            Shape<R, C>: MatrixKernel<R, C>,
        {
            type Output = Matrix<R, C>;

            #[inline]
            fn $func(self, rhs: Matrix<R, C>) -> Matrix<R, C> {
                apply2(self, rhs, Shape::<R, C>::$kernel)
            }
        }
    };
}

macro_rules! mat_scalar_op_impl {
    ($trait: ident, $func: ident, $kernel: ident, $kernel_first: ident) => {
        impl<const R: usize, const C: usize> ops::$trait<f32> for Matrix<R, C>
        where
            Shape<R, C>: MatrixKernel<R, C>,
        {
            type Output = Matrix<R, C>;

            #[inline]
            fn $func(self, rhs: f32) -> Matrix<R, C> {
                apply_scalar(self, rhs, Shape::<R, C>::$kernel)
            }
        }

        impl<const R: usize, const C: usize> ops::$trait<Matrix<R, C>> for f32
        where
            Shape<R, C>: MatrixKernel<R, C>,
        {
            type Output = Matrix<R, C>;

            #[inline]
            fn $func(self, rhs: Matrix<R, C>) -> Matrix<R, C> {
                apply_scalar_first(self, rhs, Shape::<R, C>::$kernel_first)
            }
        }
    };
}

mat_op_impl!(Add, add, add);
mat_op_impl!(Sub, sub, sub);

mat_scalar_op_impl!(Sub, sub, sub_scalar, scalar_sub);
mat_scalar_op_impl!(Div, div, div_scalar, scalar_div);

impl<const R: usize, const C: usize> ops::Add<f32> for Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    type Output = Matrix<R, C>;

    #[inline]
    fn add(self, rhs: f32) -> Matrix<R, C> {
        apply_scalar(self, rhs, Shape::<R, C>::add_scalar)
    }
}

impl<const R: usize, const C: usize> ops::Add<Matrix<R, C>> for f32
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    type Output = Matrix<R, C>;

    #[inline]
    fn add(self, rhs: Matrix<R, C>) -> Matrix<R, C> {
        apply_scalar(rhs, self, Shape::<R, C>::add_scalar)
    }
}

impl<const R: usize, const C: usize> ops::Mul<f32> for Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    type Output = Matrix<R, C>;

    #[inline]
    fn mul(self, rhs: f32) -> Matrix<R, C> {
        apply_scalar(self, rhs, Shape::<R, C>::mul_scalar)
    }
}

impl<const R: usize, const C: usize> ops::Mul<Matrix<R, C>> for f32
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    type Output = Matrix<R, C>;

    #[inline]
    fn mul(self, rhs: Matrix<R, C>) -> Matrix<R, C> {
        apply_scalar(rhs, self, Shape::<R, C>::mul_scalar)
    }
}

impl<const R: usize, const C: usize, const K: usize> ops::Mul<Matrix<C, K>> for Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    type Output = Matrix<R, K>;

    #[inline]
    fn mul(self, rhs: Matrix<C, K>) -> Matrix<R, K> {
        let mut out = Matrix::zero();
        Shape::<R, C>::mul_matrix(
            slice::from_mut(&mut out),
            slice::from_ref(&self),
            slice::from_ref(&rhs),
        );
        out
    }
}

impl<const R: usize, const C: usize> ops::Mul<Vector<C>> for Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    type Output = Vector<R>;

    #[inline]
    fn mul(self, rhs: Vector<C>) -> Vector<R> {
        let mut out = Vector::zero();
        Shape::<R, C>::mul_vector(
            slice::from_mut(&mut out),
            slice::from_ref(&self),
            slice::from_ref(&rhs),
        );
        out
    }
}

impl<const R: usize, const C: usize> ops::Mul<Matrix<R, C>> for Vector<R>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    type Output = Vector<C>;

    #[inline]
    fn mul(self, rhs: Matrix<R, C>) -> Vector<C> {
        let mut out = Vector::zero();
        Shape::<R, C>::vector_mul(
            slice::from_mut(&mut out),
            slice::from_ref(&self),
            slice::from_ref(&rhs),
        );
        out
    }
}

macro_rules! mat_assign_op_impl {
    ($trait: ident, $func: ident, $op: tt, $rhs: ty) => {
        impl<const R: usize, const C: usize> ops::$trait<$rhs> for Matrix<R, C>
        where
            Shape<R, C>: MatrixKernel<R, C>,
        {
            #[inline]
            fn $func(&mut self, rhs: $rhs) {
                *self = *self $op rhs;
            }
        }
    };
}

mat_assign_op_impl!(AddAssign, add_assign, +, Matrix<R, C>);
mat_assign_op_impl!(SubAssign, sub_assign, -, Matrix<R, C>);
mat_assign_op_impl!(AddAssign, add_assign, +, f32);
mat_assign_op_impl!(SubAssign, sub_assign, -, f32);
mat_assign_op_impl!(MulAssign, mul_assign, *, f32);
mat_assign_op_impl!(DivAssign, div_assign, /, f32);

impl<const D: usize> ops::MulAssign<Matrix<D, D>> for Matrix<D, D>
where
    Shape<D, D>: MatrixKernel<D, D>,
{
    #[inline]
    fn mul_assign(&mut self, rhs: Matrix<D, D>) {
        *self = *self * rhs;
    }
}

impl<const R: usize, const C: usize> PartialEq for Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Shape::<R, C>::eq(slice::from_ref(self), slice::from_ref(other))
    }
}

/// Element-wise with *any* semantics, mirroring [`Vector`].
impl<const R: usize, const C: usize> PartialOrd for Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self.lt(other), self.gt(other)) {
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            _ => None,
        }
    }

    #[inline]
    fn lt(&self, other: &Self) -> bool {
        Shape::<R, C>::lt(slice::from_ref(self), slice::from_ref(other))
    }

    #[inline]
    fn gt(&self, other: &Self) -> bool {
        Shape::<R, C>::gt(slice::from_ref(self), slice::from_ref(other))
    }

    #[inline]
    fn le(&self, other: &Self) -> bool {
        self.lt(other) || self == other
    }

    #[inline]
    fn ge(&self, other: &Self) -> bool {
        self.gt(other) || self == other
    }
}

impl<const R: usize, const C: usize> AbsDiffEq for Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<const R: usize, const C: usize> RelativeEq for Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl<const R: usize, const C: usize> UlpsEq for Matrix<R, C>
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    fn default_max_ulps() -> u32 {
        f32::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .all(|(a, b)| a.ulps_eq(b, epsilon, max_ulps))
    }
}

#[inline]
pub fn mat_identity<const R: usize, const C: usize>() -> Matrix<R, C> {
    Matrix::identity()
}

/// Orthographic projection.
///
/// Note the argument order: `top` comes *before* `bottom`. `top` maps to clip
/// y = -1 and `bottom` to clip y = +1, so `mat_ortho(0, w, 0, h, ..)` maps the
/// pixel rectangle with y growing downwards onto clip space with y up. Depth
/// maps `near` to -1 and `far` to +1 along -z.
pub fn mat_ortho(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Mat4 {
    let mut m = Mat4::identity();
    m.0[0].0[0] = 2.0 / (right - left);
    m.0[1].0[1] = 2.0 / (bottom - top);
    m.0[2].0[2] = -2.0 / (far - near);
    m.0[3].0[0] = -(right + left) / (right - left);
    m.0[3].0[1] = -(bottom + top) / (bottom - top);
    m.0[3].0[2] = -(far + near) / (far - near);
    m
}

/// [`mat_ortho`] with `near = -1` and `far = 1`.
#[inline]
pub fn mat_ortho2d(left: f32, right: f32, top: f32, bottom: f32) -> Mat4 {
    mat_ortho(left, right, top, bottom, -1.0, 1.0)
}

/// Perspective projection with depth in [0, 1].
///
/// `handedness` is `1.0` for a right-handed view space (camera looks down -z)
/// and `-1.0` for a left-handed one (camera looks down +z).
///
/// The focal scale is `1 / tan(fovy / 2)`, so a wider `fovy` shrinks the
/// image. Scaling by `tan` instead would invert the zoom.
pub fn mat_perspective(fovy: f32, aspect: f32, near: f32, far: f32, handedness: f32) -> Mat4 {
    let y = 1.0 / (fovy * 0.5).tan();
    let x = y / aspect;
    let zdist = (near - far) * handedness;

    let mut m = Mat4::zero();
    m.0[0].0[0] = x;
    m.0[1].0[1] = y;
    m.0[2].0[2] = far / zdist;
    m.0[2].0[3] = -handedness;
    m.0[3].0[2] = (near * far / zdist) * handedness;
    m
}

/// View matrix for a camera at `eye` looking at `at`, with +z towards `at`.
///
/// `up` parallel to the view direction is not checked and yields NaN.
pub fn mat_lookat(at: Vec3, eye: Vec3, up: Vec3) -> Mat4 {
    let z = (at - eye).normalize();
    let x = up.cross(z).normalize();
    let y = z.cross(x);

    let mut m = Mat4::identity();
    for i in 0..3 {
        m.0[i].0[0] = x.0[i];
        m.0[i].0[1] = y.0[i];
        m.0[i].0[2] = z.0[i];
    }
    m.0[3] = Vec4::new(-x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0);
    m
}

#[inline]
pub fn mat_rotate_x_pair(c: f32, s: f32) -> Mat3 {
    Mat3::new(
        1.0, 0.0, 0.0,
        0.0, c, s,
        0.0, -s, c,
    )
}

#[inline]
pub fn mat_rotate_y_pair(c: f32, s: f32) -> Mat3 {
    Mat3::new(
        c, 0.0, -s,
        0.0, 1.0, 0.0,
        s, 0.0, c,
    )
}

#[inline]
pub fn mat_rotate_z_pair(c: f32, s: f32) -> Mat3 {
    Mat3::new(
        c, s, 0.0,
        -s, c, 0.0,
        0.0, 0.0, 1.0,
    )
}

#[inline]
pub fn mat_rotate_x(angle: f32) -> Mat3 {
    let (s, c) = angle.sin_cos();
    mat_rotate_x_pair(c, s)
}

#[inline]
pub fn mat_rotate_y(angle: f32) -> Mat3 {
    let (s, c) = angle.sin_cos();
    mat_rotate_y_pair(c, s)
}

#[inline]
pub fn mat_rotate_z(angle: f32) -> Mat3 {
    let (s, c) = angle.sin_cos();
    mat_rotate_z_pair(c, s)
}

/// Embeds a 3x3 rotation in a 4x4 transform with no translation.
#[inline]
pub fn mat_rotate3(r: Mat3) -> Mat4 {
    let mut m = Mat4::identity();
    for (mc, rc) in m.0.iter_mut().zip(r.0.iter()) {
        *mc = Vec4::extend(*rc, 0.0);
    }
    m
}

/// `Rx * Ry * Rz`, angles in radians.
#[inline]
pub fn mat_rotate(x: f32, y: f32, z: f32) -> Mat4 {
    mat_rotate3(mat_rotate_x(x) * mat_rotate_y(y) * mat_rotate_z(z))
}

/// [`mat_rotate`] from precomputed `(cos, sin)` pairs.
#[inline]
pub fn mat_rotate_pairs(x: (f32, f32), y: (f32, f32), z: (f32, f32)) -> Mat4 {
    mat_rotate3(mat_rotate_x_pair(x.0, x.1) * mat_rotate_y_pair(y.0, y.1) * mat_rotate_z_pair(z.0, z.1))
}

/// Rotation of `angle` radians around `axis`, normalized first.
#[inline]
pub fn mat_rotate_axis(angle: f32, axis: Vec3) -> Mat4 {
    quat_angle_axis(angle, axis).matrix()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use core::f32::consts::FRAC_PI_2;

    struct Loops;
    impl MatrixKernel<4, 4> for Loops {}

    fn sample() -> Mat4 {
        Mat4::new(
            2.0, 0.5, -1.0, 0.0,
            0.0, 3.0, 0.25, 0.0,
            1.0, -0.5, 4.0, 0.0,
            5.0, -2.0, 1.5, 1.0,
        )
    }

    #[test]
    fn register_and_loop_kernels_agree() {
        let a = [sample(), sample().transpose()];
        let b = [sample() * 0.5, -sample()];
        let mut simd = [Mat4::zero(); 2];
        let mut plain = [Mat4::zero(); 2];

        Shape::<4, 4>::mul_matrix(&mut simd, &a, &b);
        Loops::mul_matrix(&mut plain, &a, &b);
        assert_relative_eq!(simd[..], plain[..], max_relative = 1e-6);

        Shape::<4, 4>::outer_product(&mut simd, &[Vec4::new(1.0, 2.0, 3.0, 4.0)], &[Vec4::new(-1.0, 0.5, 2.0, 0.0)]);
        Loops::outer_product(&mut plain, &[Vec4::new(1.0, 2.0, 3.0, 4.0)], &[Vec4::new(-1.0, 0.5, 2.0, 0.0)]);
        assert_eq!(simd[0], plain[0]);

        Shape::<4, 4>::scalar_div(&mut simd, &[2.0, 4.0], &a);
        Loops::scalar_div(&mut plain, &[2.0, 4.0], &a);
        assert_eq!(simd[0].as_slice(), plain[0].as_slice());

        let v = [Vec4::new(1.0, -1.0, 2.0, 1.0)];
        let mut r0 = [Vec4::zero()];
        let mut r1 = [Vec4::zero()];
        Shape::<4, 4>::vector_mul(&mut r0, &v, &a[..1]);
        Loops::vector_mul(&mut r1, &v, &a[..1]);
        assert_relative_eq!(r0[0], r1[0], max_relative = 1e-6);
    }

    #[test]
    fn rectangular_product() {
        let a = Mat2x3::from_columns([Vec2::new(1.0, 4.0), Vec2::new(2.0, 5.0), Vec2::new(3.0, 6.0)]);
        let b = Mat3x2::from_columns([Vec3::new(7.0, 9.0, 11.0), Vec3::new(8.0, 10.0, 12.0)]);
        let c: Mat2 = a * b;
        assert_eq!(c, Mat2::new(58.0, 139.0, 64.0, 154.0));

        assert_eq!(a * Vec3::new(1.0, 0.0, -1.0), Vec2::new(-2.0, -2.0));
        assert_eq!(Vec2::new(1.0, 1.0) * a, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.transpose()[(2, 1)], 6.0);
    }

    #[test]
    fn small_inverses() {
        let m2 = Mat2::new(4.0, 2.0, 7.0, 6.0);
        assert_abs_diff_eq!(m2 * m2.invert(), Mat2::identity(), epsilon = 1e-6);

        let m3 = Mat3::new(
            2.0, 0.0, 1.0,
            1.0, 3.0, 0.0,
            0.0, 1.0, 4.0,
        );
        assert_abs_diff_eq!(m3 * m3.invert(), Mat3::identity(), epsilon = 1e-6);
        assert_abs_diff_eq!(m3.invert() * m3, Mat3::identity(), epsilon = 1e-6);
    }

    #[test]
    fn translation_and_scale() {
        let t = Mat4::translate(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.translation_vector(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_point(Vec3::splat(1.0)), Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(t.transform_vector(Vec3::splat(1.0)), Vec3::splat(1.0));

        let s = Mat4::scale(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!((t * s).transform_point(Vec3::splat(1.0)), Vec3::new(3.0, 5.0, 7.0));

        let t2 = Mat3::translate(Vec2::new(-1.0, 5.0));
        assert_eq!(t2.translation_vector(), Vec2::new(-1.0, 5.0));
        assert_eq!(Mat3::scale(Vec2::new(2.0, 2.0)) * Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 1.0));
        assert_eq!(Mat2::new(1.0, 2.0, 3.0, 4.0).translation_vector(), Vec1::new(3.0));
    }

    #[test]
    fn rotations() {
        let r = mat_rotate_z(FRAC_PI_2);
        assert_abs_diff_eq!(r * Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        let r = mat_rotate_x(FRAC_PI_2);
        assert_abs_diff_eq!(r * Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        let r = mat_rotate_y(FRAC_PI_2);
        assert_abs_diff_eq!(r * Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);

        let (a, b, c) = (0.3f32, -0.7f32, 1.1f32);
        let m = mat_rotate(a, b, c);
        let p = mat_rotate_pairs((a.cos(), a.sin()), (b.cos(), b.sin()), (c.cos(), c.sin()));
        assert_relative_eq!(m, p);
        assert_eq!(m[3], Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(m[(3, 0)], 0.0);

        let axis = mat_rotate_axis(FRAC_PI_2, Vec3::new(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(axis, mat_rotate3(mat_rotate_z(FRAC_PI_2)), epsilon = 1e-6);

        let scaled = mat_rotate_axis(FRAC_PI_2, Vec3::new(0.0, 0.0, 2.0));
        assert_abs_diff_eq!(scaled[0], Vec4::new(0.0, 1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_abs_diff_eq!(scaled, axis, epsilon = 1e-6);
    }

    #[test]
    fn lookat_moves_eye_to_origin() {
        let eye = Vec3::new(1.0, 2.0, -5.0);
        let v = mat_lookat(Vec3::new(1.0, 2.0, 0.0), eye, Vec3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(v.transform_point(eye), Vec3::zero(), epsilon = 1e-6);
        assert_abs_diff_eq!(v.transform_point(Vec3::new(1.0, 2.0, 0.0)), Vec3::new(0.0, 0.0, 5.0), epsilon = 1e-6);
    }

    #[test]
    fn perspective_depth_range() {
        for handedness in [1.0f32, -1.0] {
            let p = mat_perspective(1.2, 16.0 / 9.0, 0.1, 100.0, handedness);
            let near = p * Vec4::new(0.0, 0.0, -0.1 * handedness, 1.0);
            let far = p * Vec4::new(0.0, 0.0, -100.0 * handedness, 1.0);
            assert_abs_diff_eq!(near.z() / near.w(), 0.0, epsilon = 1e-6);
            assert_relative_eq!(far.z() / far.w(), 1.0, max_relative = 1e-5);
        }

        let p = mat_perspective(FRAC_PI_2, 2.0, 1.0, 10.0, 1.0);
        assert_relative_eq!(p[(1, 1)], 1.0, max_relative = 1e-6);
        assert_relative_eq!(p[(0, 0)], 0.5, max_relative = 1e-6);
    }

    #[test]
    fn ordering_is_any_element() {
        let a = Mat2::new(1.0, 5.0, 1.0, 1.0);
        let b = Mat2::splat(2.0);
        assert!(a < b);
        assert!(a > b);
        assert_eq!(a.partial_cmp(&b), None);
        assert_eq!(Mat2::splat(1.0).partial_cmp(&b), Some(Ordering::Less));
        assert!(b >= b);
    }

    #[test]
    fn raw_view_is_column_major() {
        let m = Mat3x2::from_columns([Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m[(2, 0)], 3.0);
        assert_eq!(Mat3x2::try_from(m.as_slice()), Ok(m));
        assert!(Mat4::try_from(m.as_slice()).is_err());
        assert_eq!(format!("{:.0}", Mat2::new(1.0, 2.0, 3.0, 4.0)), "Mat2x2(1, 3; 2, 4)");
    }
}
