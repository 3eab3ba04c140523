//! SSE implementation of the 4-wide register.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use core::fmt;

use super::Simd4f;

#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(pub __m128);

impl fmt::Debug for F32x4 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("F32x4").field(&self.to_array()).finish()
    }
}

impl Default for F32x4 {
    #[inline]
    fn default() -> F32x4 {
        F32x4::zero()
    }
}

// All intrinsics below only require `sse`, which is statically enabled for
// every build that compiles this module. `dot3` additionally uses `sse4.1`
// when the target enables it.
impl Simd4f for F32x4 {
    #[inline]
    fn create(x: f32, y: f32, z: f32, w: f32) -> F32x4 {
        unsafe { F32x4(_mm_setr_ps(x, y, z, w)) }
    }

    #[inline]
    fn splat(v: f32) -> F32x4 {
        unsafe { F32x4(_mm_set1_ps(v)) }
    }

    #[inline]
    fn zero() -> F32x4 {
        unsafe { F32x4(_mm_setzero_ps()) }
    }

    #[inline]
    fn load4(a: &[f32; 4]) -> F32x4 {
        // SAFETY: `a` points to four readable floats; the load is unaligned.
        unsafe { F32x4(_mm_loadu_ps(a.as_ptr())) }
    }

    #[inline]
    fn store4(self, a: &mut [f32; 4]) {
        // SAFETY: `a` points to four writable floats; the store is unaligned.
        unsafe { _mm_storeu_ps(a.as_mut_ptr(), self.0) }
    }

    #[inline]
    fn to_array(self) -> [f32; 4] {
        let mut a = [0.0; 4];
        self.store4(&mut a);
        a
    }

    #[inline]
    fn get(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    #[inline]
    fn splat_x(self) -> F32x4 {
        unsafe { F32x4(_mm_shuffle_ps::<0x00>(self.0, self.0)) }
    }

    #[inline]
    fn splat_y(self) -> F32x4 {
        unsafe { F32x4(_mm_shuffle_ps::<0x55>(self.0, self.0)) }
    }

    #[inline]
    fn splat_z(self) -> F32x4 {
        unsafe { F32x4(_mm_shuffle_ps::<0xAA>(self.0, self.0)) }
    }

    #[inline]
    fn splat_w(self) -> F32x4 {
        unsafe { F32x4(_mm_shuffle_ps::<0xFF>(self.0, self.0)) }
    }

    #[inline]
    fn add(self, rhs: F32x4) -> F32x4 {
        unsafe { F32x4(_mm_add_ps(self.0, rhs.0)) }
    }

    #[inline]
    fn sub(self, rhs: F32x4) -> F32x4 {
        unsafe { F32x4(_mm_sub_ps(self.0, rhs.0)) }
    }

    #[inline]
    fn mul(self, rhs: F32x4) -> F32x4 {
        unsafe { F32x4(_mm_mul_ps(self.0, rhs.0)) }
    }

    #[inline]
    fn div(self, rhs: F32x4) -> F32x4 {
        unsafe { F32x4(_mm_div_ps(self.0, rhs.0)) }
    }

    #[inline]
    fn reciprocal(self) -> F32x4 {
        unsafe {
            // s * (2 - v * s)
            let s = _mm_rcp_ps(self.0);
            let two = _mm_set1_ps(2.0);
            F32x4(_mm_mul_ps(s, _mm_sub_ps(two, _mm_mul_ps(self.0, s))))
        }
    }

    #[inline]
    fn sqrt(self) -> F32x4 {
        unsafe { F32x4(_mm_sqrt_ps(self.0)) }
    }

    #[inline]
    fn rsqrt(self) -> F32x4 {
        unsafe {
            // (s / 2) * (3 - s * (v * s))
            let s = _mm_rsqrt_ps(self.0);
            let half = _mm_mul_ps(s, _mm_set1_ps(0.5));
            let vs = _mm_mul_ps(self.0, s);
            F32x4(_mm_mul_ps(half, _mm_sub_ps(_mm_set1_ps(3.0), _mm_mul_ps(s, vs))))
        }
    }

    #[inline]
    fn min(self, rhs: F32x4) -> F32x4 {
        unsafe { F32x4(_mm_min_ps(self.0, rhs.0)) }
    }

    #[inline]
    fn max(self, rhs: F32x4) -> F32x4 {
        unsafe { F32x4(_mm_max_ps(self.0, rhs.0)) }
    }

    #[inline]
    fn cmp_eq(self, rhs: F32x4) -> F32x4 {
        unsafe { F32x4(_mm_cmpeq_ps(self.0, rhs.0)) }
    }

    #[inline]
    fn cmp_gt(self, rhs: F32x4) -> F32x4 {
        unsafe { F32x4(_mm_cmpgt_ps(self.0, rhs.0)) }
    }

    #[inline]
    fn cmp_lt(self, rhs: F32x4) -> F32x4 {
        unsafe { F32x4(_mm_cmplt_ps(self.0, rhs.0)) }
    }

    #[inline]
    fn signs(self) -> u32 {
        unsafe { _mm_movemask_ps(self.0) as u32 }
    }

    #[cfg(target_feature = "sse4.1")]
    #[inline]
    fn dot3(self, rhs: F32x4) -> f32 {
        unsafe { _mm_cvtss_f32(_mm_dp_ps::<0x71>(self.0, rhs.0)) }
    }

    #[cfg(not(target_feature = "sse4.1"))]
    #[inline]
    fn dot3(self, rhs: F32x4) -> f32 {
        unsafe {
            let m = self.mul(rhs).zero_w().0;
            let s = _mm_add_ps(m, _mm_movehl_ps(m, m));
            let s = _mm_add_ss(s, _mm_shuffle_ps::<1>(s, s));
            _mm_cvtss_f32(s)
        }
    }

    #[inline]
    fn cross3(self, rhs: F32x4) -> F32x4 {
        unsafe {
            let a_yzx = _mm_shuffle_ps::<0xC9>(self.0, self.0);
            let b_yzx = _mm_shuffle_ps::<0xC9>(rhs.0, rhs.0);
            let c = _mm_sub_ps(_mm_mul_ps(self.0, b_yzx), _mm_mul_ps(a_yzx, rhs.0));
            F32x4(_mm_shuffle_ps::<0xC9>(c, c)).zero_w()
        }
    }

    #[inline]
    fn shuffle_wxyz(self) -> F32x4 {
        unsafe { F32x4(_mm_shuffle_ps::<0x93>(self.0, self.0)) }
    }

    #[inline]
    fn shuffle_zwxy(self) -> F32x4 {
        unsafe { F32x4(_mm_shuffle_ps::<0x4E>(self.0, self.0)) }
    }

    #[inline]
    fn shuffle_yzwx(self) -> F32x4 {
        unsafe { F32x4(_mm_shuffle_ps::<0x39>(self.0, self.0)) }
    }

    #[inline]
    fn zero_w(self) -> F32x4 {
        unsafe {
            let ones = f32::from_bits(!0);
            F32x4(_mm_and_ps(self.0, _mm_setr_ps(ones, ones, ones, 0.0)))
        }
    }

    #[inline]
    fn zero_zw(self) -> F32x4 {
        unsafe { F32x4(_mm_movelh_ps(self.0, _mm_setzero_ps())) }
    }

    #[inline]
    fn merge_high(self, rhs: F32x4) -> F32x4 {
        unsafe { F32x4(_mm_movehl_ps(rhs.0, self.0)) }
    }

    #[inline]
    fn flip_sign_0101(self) -> F32x4 {
        unsafe { F32x4(_mm_xor_ps(self.0, _mm_setr_ps(0.0, -0.0, 0.0, -0.0))) }
    }

    #[inline]
    fn flip_sign_1010(self) -> F32x4 {
        unsafe { F32x4(_mm_xor_ps(self.0, _mm_setr_ps(-0.0, 0.0, -0.0, 0.0))) }
    }

    #[inline]
    fn transpose4(c: [F32x4; 4]) -> [F32x4; 4] {
        unsafe {
            let t0 = _mm_unpacklo_ps(c[0].0, c[1].0);
            let t1 = _mm_unpacklo_ps(c[2].0, c[3].0);
            let t2 = _mm_unpackhi_ps(c[0].0, c[1].0);
            let t3 = _mm_unpackhi_ps(c[2].0, c[3].0);
            [
                F32x4(_mm_movelh_ps(t0, t1)),
                F32x4(_mm_movehl_ps(t1, t0)),
                F32x4(_mm_movelh_ps(t2, t3)),
                F32x4(_mm_movehl_ps(t3, t2)),
            ]
        }
    }
}
