//! Array-of-N entry points.
//!
//! Each function takes parallel slices and processes as many elements as the
//! shortest one holds. Mismatched lengths are a caller bug and trip a debug
//! assertion.

use crate::mat::{Invert, Matrix, MatrixKernel, Shape};
use crate::quat::{self, Quat};
use crate::vec::{Dim, Vec3, Vector, VectorKernel};

macro_rules! check_len {
    ($first: expr, $($rest: expr),+) => {
        debug_assert!(
            $( $first.len() == $rest.len() )&&+,
            "batch slices differ in length"
        )
    };
}

macro_rules! vec_unary {
    ($name: ident, $kernel: ident) => {
        #[inline]
        pub fn $name<const D: usize>(out: &mut [Vector<D>], a: &[Vector<D>])
        where
            Dim<D>: VectorKernel<D>,
        {
            check_len!(out, a);
            Dim::<D>::$kernel(out, a)
        }
    };
}

macro_rules! vec_binary {
    ($name: ident, $kernel: ident) => {
        #[inline]
        pub fn $name<const D: usize>(out: &mut [Vector<D>], a: &[Vector<D>], b: &[Vector<D>])
        where
            Dim<D>: VectorKernel<D>,
        {
            check_len!(out, a, b);
            Dim::<D>::$kernel(out, a, b)
        }
    };
}

macro_rules! vec_scalar {
    ($name: ident, $kernel: ident) => {
        #[inline]
        pub fn $name<const D: usize>(out: &mut [Vector<D>], a: &[Vector<D>], s: &[f32])
        where
            Dim<D>: VectorKernel<D>,
        {
            check_len!(out, a, s);
            Dim::<D>::$kernel(out, a, s)
        }
    };
}

macro_rules! vec_scalar_first {
    ($name: ident, $kernel: ident) => {
        #[inline]
        pub fn $name<const D: usize>(out: &mut [Vector<D>], s: &[f32], a: &[Vector<D>])
        where
            Dim<D>: VectorKernel<D>,
        {
            check_len!(out, s, a);
            Dim::<D>::$kernel(out, s, a)
        }
    };
}

vec_unary!(vec_negate, negate);
vec_unary!(normalize, normalize);
vec_unary!(abs, abs);

vec_binary!(vec_add, add);
vec_binary!(vec_sub, sub);
vec_binary!(hadamard_product, hadamard_product);
vec_binary!(hadamard_factor, hadamard_factor);

vec_scalar!(vec_add_scalar, add_scalar);
vec_scalar!(vec_sub_scalar, sub_scalar);
vec_scalar!(vec_mul_scalar, mul_scalar);
vec_scalar!(vec_div_scalar, div_scalar);

vec_scalar_first!(vec_scalar_sub, scalar_sub);
vec_scalar_first!(vec_scalar_div, scalar_div);

#[inline]
pub fn dot<const D: usize>(out: &mut [f32], a: &[Vector<D>], b: &[Vector<D>])
where
    Dim<D>: VectorKernel<D>,
{
    check_len!(out, a, b);
    Dim::<D>::dot(out, a, b)
}

#[inline]
pub fn cross(out: &mut [Vec3], a: &[Vec3], b: &[Vec3]) {
    check_len!(out, a, b);
    Dim::<3>::cross(out, a, b)
}

#[inline]
pub fn length<const D: usize>(out: &mut [f32], a: &[Vector<D>])
where
    Dim<D>: VectorKernel<D>,
{
    check_len!(out, a);
    Dim::<D>::length(out, a)
}

#[inline]
pub fn length_squared<const D: usize>(out: &mut [f32], a: &[Vector<D>])
where
    Dim<D>: VectorKernel<D>,
{
    check_len!(out, a);
    Dim::<D>::length_squared(out, a)
}

#[inline]
pub fn lerp<const D: usize>(out: &mut [Vector<D>], a: &[Vector<D>], b: &[Vector<D>], s: &[f32])
where
    Dim<D>: VectorKernel<D>,
{
    check_len!(out, a, b, s);
    Dim::<D>::lerp(out, a, b, s)
}

/// Every pair is equal.
#[inline]
pub fn vec_eq<const D: usize>(a: &[Vector<D>], b: &[Vector<D>]) -> bool
where
    Dim<D>: VectorKernel<D>,
{
    check_len!(a, b);
    Dim::<D>::eq(a, b)
}

/// Some pair differs.
#[inline]
pub fn vec_ne<const D: usize>(a: &[Vector<D>], b: &[Vector<D>]) -> bool
where
    Dim<D>: VectorKernel<D>,
{
    !vec_eq(a, b)
}

/// Every pair satisfies the any-lane `<`.
#[inline]
pub fn vec_lt<const D: usize>(a: &[Vector<D>], b: &[Vector<D>]) -> bool
where
    Dim<D>: VectorKernel<D>,
{
    check_len!(a, b);
    Dim::<D>::lt(a, b)
}

/// Every pair satisfies the any-lane `>`.
#[inline]
pub fn vec_gt<const D: usize>(a: &[Vector<D>], b: &[Vector<D>]) -> bool
where
    Dim<D>: VectorKernel<D>,
{
    check_len!(a, b);
    Dim::<D>::gt(a, b)
}

macro_rules! mat_binary {
    ($name: ident, $kernel: ident) => {
        #[inline]
        pub fn $name<const R: usize, const C: usize>(
            out: &mut [Matrix<R, C>],
            a: &[Matrix<R, C>],
            b: &[Matrix<R, C>],
        ) where
            Shape<R, C>: MatrixKernel<R, C>,
        {
            check_len!(out, a, b);
            Shape::<R, C>::$kernel(out, a, b)
        }
    };
}

macro_rules! mat_scalar {
    ($name: ident, $kernel: ident) => {
        #[inline]
        pub fn $name<const R: usize, const C: usize>(
            out: &mut [Matrix<R, C>],
            a: &[Matrix<R, C>],
            s: &[f32],
        ) where
            Shape<R, C>: MatrixKernel<R, C>,
        {
            check_len!(out, a, s);
            Shape::<R, C>::$kernel(out, a, s)
        }
    };
}

macro_rules! mat_scalar_first {
    ($name: ident, $kernel: ident) => {
        #[inline]
        pub fn $name<const R: usize, const C: usize>(
            out: &mut [Matrix<R, C>],
            s: &[f32],
            a: &[Matrix<R, C>],
        ) where
            Shape<R, C>: MatrixKernel<R, C>,
        {
            check_len!(out, s, a);
            Shape::<R, C>::$kernel(out, s, a)
        }
    };
}

#[inline]
pub fn mat_negate<const R: usize, const C: usize>(out: &mut [Matrix<R, C>], a: &[Matrix<R, C>])
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    check_len!(out, a);
    Shape::<R, C>::negate(out, a)
}

mat_binary!(mat_add, add);
mat_binary!(mat_sub, sub);
mat_binary!(mat_hadamard, hadamard);

mat_scalar!(mat_add_scalar, add_scalar);
mat_scalar!(mat_sub_scalar, sub_scalar);
mat_scalar!(mat_mul_scalar, mul_scalar);
mat_scalar!(mat_div_scalar, div_scalar);

mat_scalar_first!(mat_scalar_sub, scalar_sub);
mat_scalar_first!(mat_scalar_div, scalar_div);

#[inline]
pub fn mat_mul<const R: usize, const C: usize, const K: usize>(
    out: &mut [Matrix<R, K>],
    a: &[Matrix<R, C>],
    b: &[Matrix<C, K>],
) where
    Shape<R, C>: MatrixKernel<R, C>,
{
    check_len!(out, a, b);
    Shape::<R, C>::mul_matrix(out, a, b)
}

#[inline]
pub fn mat_mul_vec<const R: usize, const C: usize>(
    out: &mut [Vector<R>],
    a: &[Matrix<R, C>],
    v: &[Vector<C>],
) where
    Shape<R, C>: MatrixKernel<R, C>,
{
    check_len!(out, a, v);
    Shape::<R, C>::mul_vector(out, a, v)
}

#[inline]
pub fn transpose<const R: usize, const C: usize>(out: &mut [Matrix<C, R>], a: &[Matrix<R, C>])
where
    Shape<R, C>: MatrixKernel<R, C>,
{
    check_len!(out, a);
    Shape::<R, C>::transpose(out, a)
}

#[inline]
pub fn outer_product<const R: usize, const C: usize>(
    out: &mut [Matrix<R, C>],
    a: &[Vector<R>],
    b: &[Vector<C>],
) where
    Shape<R, C>: MatrixKernel<R, C>,
{
    check_len!(out, a, b);
    Shape::<R, C>::outer_product(out, a, b)
}

#[inline]
pub fn invert<const D: usize>(out: &mut [Matrix<D, D>], a: &[Matrix<D, D>])
where
    Shape<D, D>: Invert<D>,
{
    check_len!(out, a);
    <Shape<D, D> as Invert<D>>::invert(out, a)
}

#[inline]
pub fn quat_mul(out: &mut [Quat], a: &[Quat], b: &[Quat]) {
    check_len!(out, a, b);
    quat::mul(out, a, b)
}

#[inline]
pub fn quat_pow(out: &mut [Quat], a: &[Quat], s: &[f32]) {
    check_len!(out, a, s);
    quat::pow(out, a, s)
}

#[inline]
pub fn quat_rotate(out: &mut [Vec3], q: &[Quat], v: &[Vec3]) {
    check_len!(out, q, v);
    quat::rotate(out, q, v)
}

#[inline]
pub fn quat_invert(out: &mut [Quat], a: &[Quat]) {
    check_len!(out, a);
    quat::invert(out, a)
}

#[inline]
pub fn quat_normalize(out: &mut [Quat], a: &[Quat]) {
    check_len!(out, a);
    quat::normalize(out, a)
}

#[inline]
pub fn slerp(out: &mut [Quat], a: &[Quat], b: &[Quat], s: &[f32]) {
    check_len!(out, a, b, s);
    quat::slerp(out, a, b, s)
}
