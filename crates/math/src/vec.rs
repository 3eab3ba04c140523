use core::cmp::Ordering;
use core::fmt;
use core::ops;
use core::slice;

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use bytemuck::{Pod, Zeroable};

use crate::backend::{F32x4, Simd4f};
use crate::error::MathError;

/// Fixed-size `f32` vector.
#[derive(Debug, Copy, Clone)]
#[repr(transparent)]
pub struct Vector<const D: usize>(pub [f32; D]);

pub type Vec1 = Vector<1>;
pub type Vec2 = Vector<2>;
pub type Vec3 = Vector<3>;
pub type Vec4 = Vector<4>;

unsafe impl<const D: usize> Zeroable for Vector<D> {}
unsafe impl<const D: usize> Pod for Vector<D> {}

/// Size tag selecting the vector kernels for dimension `D`.
pub struct Dim<const D: usize>;

/// Batch kernels over parallel slices of vectors.
///
/// Every method processes `min(len)` elements of its inputs. The default
/// bodies are plain lane loops; `Dim<3>` and `Dim<4>` replace them with the
/// 4-wide backend.
pub trait VectorKernel<const D: usize> {
    #[inline]
    fn negate(out: &mut [Vector<D>], a: &[Vector<D>]) {
        lanes1(out, a, |a| -a)
    }

    #[inline]
    fn add(out: &mut [Vector<D>], a: &[Vector<D>], b: &[Vector<D>]) {
        lanes2(out, a, b, |a, b| a + b)
    }

    #[inline]
    fn sub(out: &mut [Vector<D>], a: &[Vector<D>], b: &[Vector<D>]) {
        lanes2(out, a, b, |a, b| a - b)
    }

    #[inline]
    fn add_scalar(out: &mut [Vector<D>], a: &[Vector<D>], s: &[f32]) {
        lanes_s(out, a, s, |a, s| a + s)
    }

    #[inline]
    fn sub_scalar(out: &mut [Vector<D>], a: &[Vector<D>], s: &[f32]) {
        lanes_s(out, a, s, |a, s| a - s)
    }

    #[inline]
    fn scalar_sub(out: &mut [Vector<D>], s: &[f32], a: &[Vector<D>]) {
        lanes_s(out, a, s, |a, s| s - a)
    }

    #[inline]
    fn mul_scalar(out: &mut [Vector<D>], a: &[Vector<D>], s: &[f32]) {
        lanes_s(out, a, s, |a, s| a * s)
    }

    #[inline]
    fn div_scalar(out: &mut [Vector<D>], a: &[Vector<D>], s: &[f32]) {
        lanes_s(out, a, s, |a, s| a / s)
    }

    #[inline]
    fn scalar_div(out: &mut [Vector<D>], s: &[f32], a: &[Vector<D>]) {
        lanes_s(out, a, s, |a, s| s / a)
    }

    #[inline]
    fn hadamard_product(out: &mut [Vector<D>], a: &[Vector<D>], b: &[Vector<D>]) {
        lanes2(out, a, b, |a, b| a * b)
    }

    #[inline]
    fn hadamard_factor(out: &mut [Vector<D>], a: &[Vector<D>], b: &[Vector<D>]) {
        lanes2(out, a, b, |a, b| a / b)
    }

    #[inline]
    fn dot(out: &mut [f32], a: &[Vector<D>], b: &[Vector<D>]) {
        for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
            // Starting from -0.0 keeps the sum of negative zeros negative,
            // matching a plain `x * x + y * y + ...` expansion.
            *o = a.0.iter().zip(b.0.iter()).fold(-0.0, |acc, (a, b)| acc + a * b);
        }
    }

    #[inline]
    fn length_squared(out: &mut [f32], a: &[Vector<D>]) {
        Self::dot(out, a, a)
    }

    #[inline]
    fn length(out: &mut [f32], a: &[Vector<D>]) {
        Self::length_squared(out, a);
        for o in out.iter_mut() {
            *o = o.sqrt();
        }
    }

    #[inline]
    fn normalize(out: &mut [Vector<D>], a: &[Vector<D>]) {
        for (o, a) in out.iter_mut().zip(a) {
            let mut l = 0.0;
            Self::length(slice::from_mut(&mut l), slice::from_ref(a));
            let inv = 1.0 / l;
            *o = Vector(a.0.map(|a| a * inv));
        }
    }

    #[inline]
    fn abs(out: &mut [Vector<D>], a: &[Vector<D>]) {
        lanes1(out, a, f32::abs)
    }

    #[inline]
    fn lerp(out: &mut [Vector<D>], a: &[Vector<D>], b: &[Vector<D>], s: &[f32]) {
        for (((o, a), b), s) in out.iter_mut().zip(a).zip(b).zip(s) {
            let t = 1.0 - s;
            for i in 0..D {
                o.0[i] = a.0[i] * t + b.0[i] * s;
            }
        }
    }

    /// Every pair has all lanes equal.
    #[inline]
    fn eq(a: &[Vector<D>], b: &[Vector<D>]) -> bool {
        a.iter().zip(b).all(|(a, b)| a.0.iter().zip(b.0.iter()).all(|(a, b)| a == b))
    }

    /// Every pair has at least one lane where `a < b`.
    #[inline]
    fn lt(a: &[Vector<D>], b: &[Vector<D>]) -> bool {
        a.iter().zip(b).all(|(a, b)| a.0.iter().zip(b.0.iter()).any(|(a, b)| a < b))
    }

    /// Every pair has at least one lane where `a > b`.
    #[inline]
    fn gt(a: &[Vector<D>], b: &[Vector<D>]) -> bool {
        a.iter().zip(b).all(|(a, b)| a.0.iter().zip(b.0.iter()).any(|(a, b)| a > b))
    }
}

#[inline]
fn lanes1<const D: usize>(out: &mut [Vector<D>], a: &[Vector<D>], f: impl Fn(f32) -> f32) {
    for (o, a) in out.iter_mut().zip(a) {
        for i in 0..D {
            o.0[i] = f(a.0[i]);
        }
    }
}

#[inline]
fn lanes2<const D: usize>(
    out: &mut [Vector<D>],
    a: &[Vector<D>],
    b: &[Vector<D>],
    f: impl Fn(f32, f32) -> f32,
) {
    for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
        for i in 0..D {
            o.0[i] = f(a.0[i], b.0[i]);
        }
    }
}

#[inline]
fn lanes_s<const D: usize>(
    out: &mut [Vector<D>],
    a: &[Vector<D>],
    s: &[f32],
    f: impl Fn(f32, f32) -> f32,
) {
    for ((o, a), s) in out.iter_mut().zip(a).zip(s) {
        for i in 0..D {
            o.0[i] = f(a.0[i], *s);
        }
    }
}

impl VectorKernel<1> for Dim<1> {}
impl VectorKernel<2> for Dim<2> {}

/// A vector that fits in one 4-wide register.
trait Register: Copy {
    /// Sign mask of the lanes that carry data.
    const LANES: u32;

    fn load(&self) -> F32x4;
    fn store(&mut self, r: F32x4);
}

impl Register for Vec3 {
    const LANES: u32 = 0x7;

    #[inline]
    fn load(&self) -> F32x4 {
        F32x4::load3(&self.0)
    }

    #[inline]
    fn store(&mut self, r: F32x4) {
        r.store3(&mut self.0)
    }
}

impl Register for Vec4 {
    const LANES: u32 = 0xF;

    #[inline]
    fn load(&self) -> F32x4 {
        F32x4::load4(&self.0)
    }

    #[inline]
    fn store(&mut self, r: F32x4) {
        r.store4(&mut self.0)
    }
}

#[inline]
fn simd1<V: Register>(out: &mut [V], a: &[V], f: impl Fn(F32x4) -> F32x4) {
    for (o, a) in out.iter_mut().zip(a) {
        o.store(f(a.load()));
    }
}

#[inline]
fn simd2<V: Register>(out: &mut [V], a: &[V], b: &[V], f: impl Fn(F32x4, F32x4) -> F32x4) {
    for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
        o.store(f(a.load(), b.load()));
    }
}

#[inline]
fn simd_s<V: Register>(out: &mut [V], a: &[V], s: &[f32], f: impl Fn(F32x4, F32x4) -> F32x4) {
    for ((o, a), s) in out.iter_mut().zip(a).zip(s) {
        o.store(f(a.load(), F32x4::splat(*s)));
    }
}

#[inline]
fn simd_reduce<V: Register>(out: &mut [f32], a: &[V], b: &[V], f: impl Fn(F32x4, F32x4) -> f32) {
    for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
        *o = f(a.load(), b.load());
    }
}

#[inline]
fn simd_test<V: Register>(
    a: &[V],
    b: &[V],
    cmp: impl Fn(F32x4, F32x4) -> F32x4,
    all_lanes: bool,
) -> bool {
    a.iter().zip(b).all(|(a, b)| {
        let m = cmp(a.load(), b.load()).signs() & V::LANES;
        if all_lanes {
            m == V::LANES
        } else {
            m != 0
        }
    })
}

macro_rules! simd_vector_kernel {
    ($d: literal, $dot: expr, $length: expr, $length_squared: expr, $normalize: expr) => {
        impl VectorKernel<$d> for Dim<$d> {
            #[inline]
            fn negate(out: &mut [Vector<$d>], a: &[Vector<$d>]) {
                simd1(out, a, |a| F32x4::zero().sub(a))
            }

            #[inline]
            fn add(out: &mut [Vector<$d>], a: &[Vector<$d>], b: &[Vector<$d>]) {
                simd2(out, a, b, F32x4::add)
            }

            #[inline]
            fn sub(out: &mut [Vector<$d>], a: &[Vector<$d>], b: &[Vector<$d>]) {
                simd2(out, a, b, F32x4::sub)
            }

            #[inline]
            fn add_scalar(out: &mut [Vector<$d>], a: &[Vector<$d>], s: &[f32]) {
                simd_s(out, a, s, F32x4::add)
            }

            #[inline]
            fn sub_scalar(out: &mut [Vector<$d>], a: &[Vector<$d>], s: &[f32]) {
                simd_s(out, a, s, F32x4::sub)
            }

            #[inline]
            fn scalar_sub(out: &mut [Vector<$d>], s: &[f32], a: &[Vector<$d>]) {
                simd_s(out, a, s, |a, s| s.sub(a))
            }

            #[inline]
            fn mul_scalar(out: &mut [Vector<$d>], a: &[Vector<$d>], s: &[f32]) {
                simd_s(out, a, s, F32x4::mul)
            }

            #[inline]
            fn div_scalar(out: &mut [Vector<$d>], a: &[Vector<$d>], s: &[f32]) {
                simd_s(out, a, s, F32x4::div)
            }

            #[inline]
            fn scalar_div(out: &mut [Vector<$d>], s: &[f32], a: &[Vector<$d>]) {
                simd_s(out, a, s, |a, s| s.div(a))
            }

            #[inline]
            fn hadamard_product(out: &mut [Vector<$d>], a: &[Vector<$d>], b: &[Vector<$d>]) {
                simd2(out, a, b, F32x4::mul)
            }

            #[inline]
            fn hadamard_factor(out: &mut [Vector<$d>], a: &[Vector<$d>], b: &[Vector<$d>]) {
                simd2(out, a, b, F32x4::div)
            }

            #[inline]
            fn dot(out: &mut [f32], a: &[Vector<$d>], b: &[Vector<$d>]) {
                simd_reduce(out, a, b, $dot)
            }

            #[inline]
            fn length_squared(out: &mut [f32], a: &[Vector<$d>]) {
                simd_reduce(out, a, a, |a, _| $length_squared(a))
            }

            #[inline]
            fn length(out: &mut [f32], a: &[Vector<$d>]) {
                simd_reduce(out, a, a, |a, _| $length(a))
            }

            #[inline]
            fn normalize(out: &mut [Vector<$d>], a: &[Vector<$d>]) {
                simd1(out, a, $normalize)
            }

            #[inline]
            fn abs(out: &mut [Vector<$d>], a: &[Vector<$d>]) {
                simd1(out, a, F32x4::abs)
            }

            #[inline]
            fn lerp(out: &mut [Vector<$d>], a: &[Vector<$d>], b: &[Vector<$d>], s: &[f32]) {
                for (((o, a), b), s) in out.iter_mut().zip(a).zip(b).zip(s) {
                    let t = F32x4::splat(1.0 - s);
                    o.store(a.load().mul(t).add(b.load().mul(F32x4::splat(*s))));
                }
            }

            #[inline]
            fn eq(a: &[Vector<$d>], b: &[Vector<$d>]) -> bool {
                simd_test(a, b, F32x4::cmp_eq, true)
            }

            #[inline]
            fn lt(a: &[Vector<$d>], b: &[Vector<$d>]) -> bool {
                simd_test(a, b, F32x4::cmp_lt, false)
            }

            #[inline]
            fn gt(a: &[Vector<$d>], b: &[Vector<$d>]) -> bool {
                simd_test(a, b, F32x4::cmp_gt, false)
            }
        }
    };
}

simd_vector_kernel!(
    3,
    |a: F32x4, b: F32x4| a.dot3(b),
    |a: F32x4| a.length3().get(0),
    |a: F32x4| a.length3_squared(),
    |a: F32x4| a.normalize3()
);

simd_vector_kernel!(
    4,
    |a: F32x4, b: F32x4| a.dot4(b).get(0),
    |a: F32x4| a.length4().get(0),
    |a: F32x4| a.length4_squared().get(0),
    |a: F32x4| a.normalize4()
);

impl Dim<3> {
    #[inline]
    pub fn cross(out: &mut [Vec3], a: &[Vec3], b: &[Vec3]) {
        simd2(out, a, b, F32x4::cross3)
    }
}

// Single values run through the batch kernels with one element.

#[inline]
pub(crate) fn apply<const D: usize>(
    a: Vector<D>,
    k: fn(&mut [Vector<D>], &[Vector<D>]),
) -> Vector<D> {
    let mut out = Vector::zero();
    k(slice::from_mut(&mut out), slice::from_ref(&a));
    out
}

#[inline]
pub(crate) fn apply2<const D: usize>(
    a: Vector<D>,
    b: Vector<D>,
    k: fn(&mut [Vector<D>], &[Vector<D>], &[Vector<D>]),
) -> Vector<D> {
    let mut out = Vector::zero();
    k(slice::from_mut(&mut out), slice::from_ref(&a), slice::from_ref(&b));
    out
}

#[inline]
fn apply_scalar<const D: usize>(
    a: Vector<D>,
    s: f32,
    k: fn(&mut [Vector<D>], &[Vector<D>], &[f32]),
) -> Vector<D> {
    let mut out = Vector::zero();
    k(slice::from_mut(&mut out), slice::from_ref(&a), slice::from_ref(&s));
    out
}

#[inline]
fn apply_scalar_first<const D: usize>(
    s: f32,
    a: Vector<D>,
    k: fn(&mut [Vector<D>], &[f32], &[Vector<D>]),
) -> Vector<D> {
    let mut out = Vector::zero();
    k(slice::from_mut(&mut out), slice::from_ref(&s), slice::from_ref(&a));
    out
}

#[inline]
fn reduce<const D: usize>(
    a: Vector<D>,
    b: Vector<D>,
    k: fn(&mut [f32], &[Vector<D>], &[Vector<D>]),
) -> f32 {
    let mut out = 0.0;
    k(slice::from_mut(&mut out), slice::from_ref(&a), slice::from_ref(&b));
    out
}

#[inline]
fn measure<const D: usize>(a: Vector<D>, k: fn(&mut [f32], &[Vector<D>])) -> f32 {
    let mut out = 0.0;
    k(slice::from_mut(&mut out), slice::from_ref(&a));
    out
}

impl<const D: usize> Vector<D> {
    #[inline]
    pub const fn zero() -> Self {
        Vector([0.0; D])
    }

    #[inline]
    pub const fn splat(s: f32) -> Self {
        Vector([s; D])
    }

    #[inline]
    pub const fn from_array(a: [f32; D]) -> Self {
        Vector(a)
    }

    /// Reads the first `D` floats of `a`. Panics if `a` is shorter.
    #[inline]
    pub fn from_slice(a: &[f32]) -> Self {
        let mut v = Self::zero();
        v.0.copy_from_slice(&a[..D]);
        v
    }

    #[inline]
    pub const fn to_array(self) -> [f32; D] {
        self.0
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.0
    }

    #[inline]
    pub fn min(a: Self, b: Self) -> Self {
        let mut v = a;
        for (v, b) in v.0.iter_mut().zip(b.0.iter()) {
            if *b < *v {
                *v = *b;
            }
        }
        v
    }

    #[inline]
    pub fn max(a: Self, b: Self) -> Self {
        let mut v = a;
        for (v, b) in v.0.iter_mut().zip(b.0.iter()) {
            if *b > *v {
                *v = *b;
            }
        }
        v
    }

    #[inline]
    pub fn clamp(a: Self, min: Self, max: Self) -> Self {
        Self::min(Self::max(a, min), max)
    }

    /// `N` contiguous lanes starting at `offset`, aliasing `self`.
    #[inline]
    fn lanes_mut<const N: usize>(&mut self, offset: usize) -> &mut Vector<N> {
        assert!(offset + N <= D);
        // SAFETY: `Vector<N>` is a transparent `[f32; N]` with the alignment of
        // `f32`, and the asserted range lies inside `self.0`.
        unsafe { &mut *(self.0.as_mut_ptr().add(offset) as *mut Vector<N>) }
    }
}

impl<const D: usize> Vector<D>
where
    Dim<D>: VectorKernel<D>,
{
    #[inline]
    pub fn dot(self, b: Self) -> f32 {
        reduce(self, b, Dim::<D>::dot)
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        measure(self, Dim::<D>::length_squared)
    }

    #[inline]
    pub fn length(self) -> f32 {
        measure(self, Dim::<D>::length)
    }

    /// Unit vector in the direction of `self`. A zero vector gives NaN lanes.
    #[inline]
    pub fn normalize(self) -> Self {
        apply(self, Dim::<D>::normalize)
    }

    #[inline]
    pub fn abs(self) -> Self {
        apply(self, Dim::<D>::abs)
    }

    /// `(1 - s) * self + s * b`, not clamped.
    #[inline]
    pub fn lerp(self, b: Self, s: f32) -> Self {
        let mut out = Self::zero();
        Dim::<D>::lerp(
            slice::from_mut(&mut out),
            slice::from_ref(&self),
            slice::from_ref(&b),
            slice::from_ref(&s),
        );
        out
    }

    #[inline]
    pub fn hadamard_product(self, b: Self) -> Self {
        apply2(self, b, Dim::<D>::hadamard_product)
    }

    #[inline]
    pub fn hadamard_factor(self, b: Self) -> Self {
        apply2(self, b, Dim::<D>::hadamard_factor)
    }
}

impl Vec3 {
    #[inline]
    pub fn cross(self, b: Vec3) -> Vec3 {
        apply2(self, b, Dim::<3>::cross)
    }
}

macro_rules! vec_new_impl {
    ($d: literal, $($e: ident),*) => {
        impl Vector<$d> {
            #[inline]
            pub const fn new($( $e: f32, )*) -> Self {
                Vector([$( $e, )*])
            }
        }
    }
}

vec_new_impl!(1, x);
vec_new_impl!(2, x, y);
vec_new_impl!(3, x, y, z);
vec_new_impl!(4, x, y, z, w);

macro_rules! vec_accessor_impl {
    ($d: literal, $($e: ident, $e_mut: ident, $i: literal),*) => {
        impl Vector<$d> {
            $(
                #[inline]
                pub const fn $e(&self) -> f32 {
                    self.0[$i]
                }

                #[inline]
                pub fn $e_mut(&mut self) -> &mut f32 {
                    &mut self.0[$i]
                }
            )*
        }
    }
}

vec_accessor_impl!(1, x, x_mut, 0);
vec_accessor_impl!(2, x, x_mut, 0, y, y_mut, 1);
vec_accessor_impl!(3, x, x_mut, 0, y, y_mut, 1, z, z_mut, 2);
vec_accessor_impl!(4, x, x_mut, 0, y, y_mut, 1, z, z_mut, 2, w, w_mut, 3);

impl Vec3 {
    #[inline]
    pub const fn extend(v: Vec2, z: f32) -> Vec3 {
        Vector([v.0[0], v.0[1], z])
    }
}

impl Vec4 {
    #[inline]
    pub const fn extend(v: Vec3, w: f32) -> Vec4 {
        Vector([v.0[0], v.0[1], v.0[2], w])
    }
}

/// Mutable view over lanes of a vector that are not adjacent in memory.
///
/// Holds borrows into the owning vector; writes land in the owner.
pub struct SwizzleMut<'a, const N: usize> {
    lanes: [&'a mut f32; N],
}

impl<'a, const N: usize> SwizzleMut<'a, N> {
    #[inline]
    pub fn get(&self) -> Vector<N> {
        let mut v = Vector::zero();
        for (v, l) in v.0.iter_mut().zip(self.lanes.iter()) {
            *v = **l;
        }
        v
    }

    #[inline]
    pub fn set(&mut self, v: Vector<N>) {
        for (l, v) in self.lanes.iter_mut().zip(v.0.iter()) {
            **l = *v;
        }
    }
}

impl<'a, const N: usize> ops::Index<usize> for SwizzleMut<'a, N> {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &*self.lanes[i]
    }
}

impl<'a, const N: usize> ops::IndexMut<usize> for SwizzleMut<'a, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut *self.lanes[i]
    }
}

macro_rules! swizzle_assign_impl {
    ($trait: ident, $func: ident, $rhs: ty) => {
        impl<'a, const N: usize> ops::$trait<$rhs> for SwizzleMut<'a, N>
        where
            Dim<N>: VectorKernel<N>,
        {
            #[inline]
            fn $func(&mut self, rhs: $rhs) {
                let mut v = self.get();
                ops::$trait::$func(&mut v, rhs);
                self.set(v);
            }
        }
    };
}

swizzle_assign_impl!(AddAssign, add_assign, Vector<N>);
swizzle_assign_impl!(SubAssign, sub_assign, Vector<N>);
swizzle_assign_impl!(MulAssign, mul_assign, f32);
swizzle_assign_impl!(DivAssign, div_assign, f32);

macro_rules! swizzle_copy_impl {
    ($v: ident, $($name: ident, $a: literal, $b: literal),*) => {
        impl $v {
            $(
                #[inline]
                pub const fn $name(&self) -> Vec2 {
                    Vector([self.0[$a], self.0[$b]])
                }
            )*
        }
    }
}

swizzle_copy_impl!(Vec3, xy, 0, 1, xz, 0, 2, yz, 1, 2);
swizzle_copy_impl!(Vec4, xy, 0, 1, xz, 0, 2, yz, 1, 2);

macro_rules! swizzle_mut_impl {
    ($v: ident) => {
        impl $v {
            #[inline]
            pub fn xy_mut(&mut self) -> &mut Vec2 {
                self.lanes_mut::<2>(0)
            }

            #[inline]
            pub fn yz_mut(&mut self) -> &mut Vec2 {
                self.lanes_mut::<2>(1)
            }

            #[inline]
            pub fn xz_mut(&mut self) -> SwizzleMut<'_, 2> {
                let [x, _, z, ..] = &mut self.0;
                SwizzleMut { lanes: [x, z] }
            }
        }
    };
}

swizzle_mut_impl!(Vec3);
swizzle_mut_impl!(Vec4);

impl Vec4 {
    #[inline]
    pub const fn xyz(&self) -> Vec3 {
        Vector([self.0[0], self.0[1], self.0[2]])
    }

    #[inline]
    pub fn xyz_mut(&mut self) -> &mut Vec3 {
        self.lanes_mut::<3>(0)
    }
}

impl<const D: usize> Default for Vector<D> {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl<const D: usize> From<[f32; D]> for Vector<D> {
    #[inline]
    fn from(a: [f32; D]) -> Self {
        Vector(a)
    }
}

impl<const D: usize> From<Vector<D>> for [f32; D] {
    #[inline]
    fn from(v: Vector<D>) -> Self {
        v.0
    }
}

impl<const D: usize> TryFrom<&[f32]> for Vector<D> {
    type Error = MathError;

    fn try_from(a: &[f32]) -> Result<Self, MathError> {
        if a.len() != D {
            return Err(MathError::LengthMismatch {
                expected: D,
                found: a.len(),
            });
        }
        Ok(Self::from_slice(a))
    }
}

impl<const D: usize> ops::Index<usize> for Vector<D> {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        debug_assert!(i < D, "index {} out of range for Vec{}", i, D);
        &self.0[i]
    }
}

impl<const D: usize> ops::IndexMut<usize> for Vector<D> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        debug_assert!(i < D, "index {} out of range for Vec{}", i, D);
        &mut self.0[i]
    }
}

impl<const D: usize> fmt::Display for Vector<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prec = f.precision().unwrap_or(3);
        write!(f, "Vec{}(", D)?;
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.prec$}", e, prec = prec)?;
        }
        write!(f, ")")
    }
}

impl<const D: usize> ops::Neg for Vector<D>
where
    Dim<D>: VectorKernel<D>,
{
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        apply(self, Dim::<D>::negate)
    }
}

macro_rules! vec_op_impl {
    ($trait: ident, $func: ident, $kernel: ident) => {
        impl<const D: usize> ops::$trait<Vector<D>> for Vector<D>
        where
            Dim<D>: VectorKernel<D>,
        {
            type Output = Vector<D>;

            #[inline]
            fn $func(self, rhs: Vector<D>) -> Vector<D> {
                apply2(self, rhs, Dim::<D>::$kernel)
            }
        }
    };
}

macro_rules! scalar_op_impl {
    ($trait: ident, $func: ident, $kernel: ident) => {
        scalar_op_impl!(@vector_first $trait, $func, $kernel);

        // Commutative: `s op v` runs the vector-first kernel.
        impl<const D: usize> ops::$trait<Vector<D>> for f32
        where
            Dim<D>: VectorKernel<D>,
        {
            type Output = Vector<D>;

            #[inline]
            fn $func(self, rhs: Vector<D>) -> Vector<D> {
                apply_scalar(rhs, self, Dim::<D>::$kernel)
            }
        }
    };
    ($trait: ident, $func: ident, $kernel: ident, $kernel_first: ident) => {
        scalar_op_impl!(@vector_first $trait, $func, $kernel);

        impl<const D: usize> ops::$trait<Vector<D>> for f32
        where
            Dim<D>: VectorKernel<D>,
        {
            type Output = Vector<D>;

            #[inline]
            fn $func(self, rhs: Vector<D>) -> Vector<D> {
                apply_scalar_first(self, rhs, Dim::<D>::$kernel_first)
            }
        }
    };
    (@vector_first $trait: ident, $func: ident, $kernel: ident) => {
        impl<const D: usize> ops::$trait<f32> for Vector<D>
        where
            Dim<D>: VectorKernel<D>,
        {
            type Output = Vector<D>;

            #[inline]
            fn $func(self, rhs: f32) -> Vector<D> {
                apply_scalar(self, rhs, Dim::<D>::$kernel)
            }
        }
    };
}

macro_rules! assign_op_impl {
    ($trait: ident, $func: ident, $op: tt, $rhs: ty) => {
        impl<const D: usize> ops::$trait<$rhs> for Vector<D>
        where
            Dim<D>: VectorKernel<D>,
        {
            #[inline]
            fn $func(&mut self, rhs: $rhs) {
                *self = *self $op rhs;
            }
        }
    };
}

vec_op_impl!(Add, add, add);
vec_op_impl!(Sub, sub, sub);
vec_op_impl!(Mul, mul, hadamard_product);
vec_op_impl!(Div, div, hadamard_factor);

scalar_op_impl!(Add, add, add_scalar);
scalar_op_impl!(Sub, sub, sub_scalar, scalar_sub);
scalar_op_impl!(Mul, mul, mul_scalar);
scalar_op_impl!(Div, div, div_scalar, scalar_div);

assign_op_impl!(AddAssign, add_assign, +, Vector<D>);
assign_op_impl!(SubAssign, sub_assign, -, Vector<D>);
assign_op_impl!(MulAssign, mul_assign, *, Vector<D>);
assign_op_impl!(DivAssign, div_assign, /, Vector<D>);
assign_op_impl!(AddAssign, add_assign, +, f32);
assign_op_impl!(SubAssign, sub_assign, -, f32);
assign_op_impl!(MulAssign, mul_assign, *, f32);
assign_op_impl!(DivAssign, div_assign, /, f32);

impl<const D: usize> PartialEq for Vector<D>
where
    Dim<D>: VectorKernel<D>,
{
    /// All lanes equal.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Dim::<D>::eq(slice::from_ref(self), slice::from_ref(other))
    }
}

/// Ordering is lane-wise with *any* semantics: `a < b` holds when at least one
/// lane of `a` is smaller than the same lane of `b`. Both `a < b` and `a > b`
/// may hold at once, in which case `partial_cmp` returns `None`.
impl<const D: usize> PartialOrd for Vector<D>
where
    Dim<D>: VectorKernel<D>,
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
        Dim::<D>::lt(slice::from_ref(self), slice::from_ref(other))
    }

    #[inline]
    fn gt(&self, other: &Self) -> bool {
        Dim::<D>::gt(slice::from_ref(self), slice::from_ref(other))
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

impl<const D: usize> AbsDiffEq for Vector<D>
where
    Dim<D>: VectorKernel<D>,
{
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<const D: usize> RelativeEq for Vector<D>
where
    Dim<D>: VectorKernel<D>,
{
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl<const D: usize> UlpsEq for Vector<D>
where
    Dim<D>: VectorKernel<D>,
{
    fn default_max_ulps() -> u32 {
        f32::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a.ulps_eq(b, epsilon, max_ulps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn generic_and_register_paths_agree() {
        let a = [Vec3::new(1.0, -2.0, 0.5), Vec3::new(3.0, 4.0, -12.0)];
        let b = [Vec3::new(0.25, 8.0, -1.0), Vec3::new(-3.0, 2.0, 6.0)];

        struct Lanes;
        impl VectorKernel<3> for Lanes {}

        let mut simd = [Vec3::zero(); 2];
        let mut plain = [Vec3::zero(); 2];

        Dim::<3>::hadamard_factor(&mut simd, &a, &b);
        Lanes::hadamard_factor(&mut plain, &a, &b);
        assert_relative_eq!(simd[..], plain[..]);

        Dim::<3>::normalize(&mut simd, &a);
        Lanes::normalize(&mut plain, &a);
        assert_relative_eq!(simd[..], plain[..], max_relative = 1e-6);

        Dim::<3>::lerp(&mut simd, &a, &b, &[0.25, 1.5]);
        Lanes::lerp(&mut plain, &a, &b, &[0.25, 1.5]);
        assert_relative_eq!(simd[..], plain[..]);

        let mut d0 = [0.0; 2];
        let mut d1 = [0.0; 2];
        Dim::<3>::dot(&mut d0, &a, &b);
        Lanes::dot(&mut d1, &a, &b);
        assert_relative_eq!(d0[..], d1[..], max_relative = 1e-6);
    }

    #[test]
    fn scalar_first_forms() {
        let v = Vec4::new(1.0, 2.0, 4.0, 8.0);
        assert_eq!(8.0 / v, Vec4::new(8.0, 4.0, 2.0, 1.0));
        assert_eq!(10.0 - v, Vec4::new(9.0, 8.0, 6.0, 2.0));
        assert_eq!(2.0 * v, v * 2.0);
        assert_eq!(1.0 + v, v + 1.0);

        let w = Vec2::new(1.0, 4.0);
        assert_eq!(2.0 / w, Vec2::new(2.0, 0.5));
    }

    #[test]
    fn compound_assignment() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        v += Vec3::splat(1.0);
        v *= 2.0;
        v -= 1.0;
        v /= Vec3::new(1.0, 5.0, 7.0);
        assert_eq!(v, Vec3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn swizzles_alias() {
        let mut v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.xz(), Vec2::new(1.0, 3.0));
        assert_eq!(v.xyz(), Vec3::new(1.0, 2.0, 3.0));

        *v.yz_mut() += Vec2::new(10.0, 20.0);
        assert_eq!(v, Vec4::new(1.0, 12.0, 23.0, 4.0));

        v.xyz_mut().0[0] = -1.0;
        assert_eq!(v.x(), -1.0);

        let mut xz = v.xz_mut();
        xz *= 2.0;
        xz[1] += 1.0;
        assert_eq!(xz.get(), Vec2::new(-2.0, 47.0));
        assert_eq!(v, Vec4::new(-2.0, 12.0, 47.0, 4.0));

        let mut u = Vec3::new(1.0, 2.0, 3.0);
        u.xz_mut().set(Vec2::new(5.0, 6.0));
        *u.xy_mut() -= Vec2::splat(1.0);
        assert_eq!(u, Vec3::new(4.0, 1.0, 6.0));
    }

    #[test]
    fn conversions() {
        let s = [1.0, 2.0, 3.0];
        assert_eq!(Vec3::try_from(&s[..]), Ok(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(
            Vec4::try_from(&s[..]),
            Err(MathError::LengthMismatch { expected: 4, found: 3 })
        );
        assert_eq!(Vec2::from_slice(&s), Vec2::new(1.0, 2.0));
        assert_eq!(<[f32; 3]>::from(Vec3::from(s)), s);
        let v = Vec4::extend(Vec3::extend(Vec2::new(1.0, 2.0), 3.0), 4.0);
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn display() {
        let v = Vec3::new(1.0, 2.5, -3.0);
        assert_eq!(format!("{}", v), "Vec3(1.000, 2.500, -3.000)");
        assert_eq!(format!("{:.1}", Vec2::new(0.5, 1.0)), "Vec2(0.5, 1.0)");
    }

    #[test]
    fn min_max_clamp() {
        let a = Vec3::new(1.0, 5.0, -2.0);
        let b = Vec3::new(2.0, 3.0, -4.0);
        assert_eq!(Vec3::min(a, b), Vec3::new(1.0, 3.0, -4.0));
        assert_eq!(Vec3::max(a, b), Vec3::new(2.0, 5.0, -2.0));
        assert_eq!(Vec3::clamp(a, Vec3::splat(0.0), Vec3::splat(2.0)), Vec3::new(1.0, 2.0, 0.0));
    }
}
