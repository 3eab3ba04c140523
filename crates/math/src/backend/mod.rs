//! 4-wide float primitive and 4x4 register matrix.
//!
//! The vector and matrix kernels for the 3- and 4-element cases are written
//! against [`Simd4f`] only. Two implementations exist:
//!
//! * [`scalar::F32x4`], a portable emulation over `[f32; 4]`;
//! * [`sse::F32x4`], SSE through `core::arch` on x86 and x86_64.
//!
//! Exactly one of them is exported as [`F32x4`] (and [`Mat4x4`]), picked at
//! compile time from the target features. There is no runtime dispatch.

mod simd4x4;

pub use simd4x4::Simd4x4;

#[cfg(feature = "portable")]
pub mod scalar;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse"))]
pub mod sse;

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse",
    not(feature = "force-scalar")
))]
mod active {
    pub use super::sse::F32x4;
    pub const NAME: &str = "SSE";
}

#[cfg(all(
    feature = "portable",
    not(all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse",
        not(feature = "force-scalar")
    ))
))]
mod active {
    pub use super::scalar::F32x4;
    pub const NAME: &str = "SCALAR";
}

#[cfg(not(any(
    feature = "portable",
    all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse")
)))]
compile_error!("no 4-wide float backend for this target; enable the `portable` feature");

pub use active::{F32x4, NAME};

/// The active 4x4 register matrix.
pub type Mat4x4 = Simd4x4<F32x4>;

/// Operation set of a 4-lane `f32` register.
///
/// Comparisons return lane masks (all bits set for true, all clear for
/// false); [`Simd4f::signs`] packs the lane sign bits into the low four bits
/// of the result, lane 0 first.
pub trait Simd4f: Copy + core::fmt::Debug {
    fn create(x: f32, y: f32, z: f32, w: f32) -> Self;

    fn splat(v: f32) -> Self;

    fn load4(a: &[f32; 4]) -> Self;

    fn store4(self, a: &mut [f32; 4]);

    fn to_array(self) -> [f32; 4];

    #[inline]
    fn zero() -> Self {
        Self::splat(0.0)
    }

    #[inline]
    fn load3(a: &[f32; 3]) -> Self {
        Self::create(a[0], a[1], a[2], 0.0)
    }

    #[inline]
    fn load2(a: &[f32; 2]) -> Self {
        Self::create(a[0], a[1], 0.0, 0.0)
    }

    #[inline]
    fn store3(self, a: &mut [f32; 3]) {
        let v = self.to_array();
        a.copy_from_slice(&v[..3]);
    }

    #[inline]
    fn store2(self, a: &mut [f32; 2]) {
        let v = self.to_array();
        a.copy_from_slice(&v[..2]);
    }

    #[inline]
    fn get(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    fn splat_x(self) -> Self;
    fn splat_y(self) -> Self;
    fn splat_z(self) -> Self;
    fn splat_w(self) -> Self;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn div(self, rhs: Self) -> Self;

    /// `self * m + a`
    #[inline]
    fn madd(self, m: Self, a: Self) -> Self {
        self.mul(m).add(a)
    }

    fn reciprocal(self) -> Self;
    fn sqrt(self) -> Self;
    fn rsqrt(self) -> Self;

    fn min(self, rhs: Self) -> Self;
    fn max(self, rhs: Self) -> Self;

    fn cmp_eq(self, rhs: Self) -> Self;
    fn cmp_gt(self, rhs: Self) -> Self;
    fn cmp_lt(self, rhs: Self) -> Self;
    fn signs(self) -> u32;

    /// Dot product of the x, y and z lanes.
    fn dot3(self, rhs: Self) -> f32;
    /// Cross product of the x, y and z lanes; w is zero.
    fn cross3(self, rhs: Self) -> Self;

    fn shuffle_wxyz(self) -> Self;
    fn shuffle_zwxy(self) -> Self;
    fn shuffle_yzwx(self) -> Self;
    fn zero_w(self) -> Self;
    fn zero_zw(self) -> Self;
    /// `(self.z, self.w, rhs.z, rhs.w)`
    fn merge_high(self, rhs: Self) -> Self;

    /// `(x, -y, z, -w)`
    fn flip_sign_0101(self) -> Self;
    /// `(-x, y, -z, w)`
    fn flip_sign_1010(self) -> Self;

    fn transpose4(c: [Self; 4]) -> [Self; 4];

    /// Lane sum, splatted.
    #[inline]
    fn sum(self) -> Self {
        let s1 = self.splat_x().add(self.splat_y());
        let s2 = s1.add(self.splat_z());
        s2.add(self.splat_w())
    }

    #[inline]
    fn dot4(self, rhs: Self) -> Self {
        self.mul(rhs).sum()
    }

    #[inline]
    fn dot2(self, rhs: Self) -> Self {
        let m = self.mul(rhs);
        m.splat_x().add(m.splat_y())
    }

    #[inline]
    fn length4(self) -> Self {
        self.dot4(self).sqrt()
    }

    #[inline]
    fn length3(self) -> Self {
        Self::splat(self.dot3(self)).sqrt()
    }

    #[inline]
    fn length2(self) -> Self {
        self.dot2(self).sqrt()
    }

    #[inline]
    fn length4_squared(self) -> Self {
        self.dot4(self)
    }

    #[inline]
    fn length3_squared(self) -> f32 {
        self.dot3(self)
    }

    #[inline]
    fn length2_squared(self) -> Self {
        self.dot2(self)
    }

    #[inline]
    fn normalize4(self) -> Self {
        self.mul(self.dot4(self).rsqrt())
    }

    #[inline]
    fn normalize3(self) -> Self {
        self.mul(Self::splat(self.dot3(self)).rsqrt())
    }

    #[inline]
    fn normalize2(self) -> Self {
        self.mul(self.dot2(self).rsqrt())
    }

    #[inline]
    fn abs(self) -> Self {
        Self::zero().sub(self).max(self)
    }
}
