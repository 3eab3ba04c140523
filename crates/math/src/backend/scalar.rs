//! Portable emulation of the 4-wide register over a plain array.

use super::Simd4f;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[repr(C, align(16))]
pub struct F32x4(pub [f32; 4]);

#[inline]
fn mask(b: bool) -> f32 {
    if b {
        f32::from_bits(!0)
    } else {
        0.0
    }
}

macro_rules! lanewise {
    ($a: expr, $b: expr, $op: tt) => {
        F32x4([
            $a.0[0] $op $b.0[0],
            $a.0[1] $op $b.0[1],
            $a.0[2] $op $b.0[2],
            $a.0[3] $op $b.0[3],
        ])
    };
}

impl F32x4 {
    #[inline]
    fn map(self, f: impl Fn(f32) -> f32) -> F32x4 {
        F32x4(self.0.map(f))
    }

    #[inline]
    fn zip(self, rhs: F32x4, f: impl Fn(f32, f32) -> f32) -> F32x4 {
        let [a, b, c, d] = self.0;
        let [e, g, h, i] = rhs.0;
        F32x4([f(a, e), f(b, g), f(c, h), f(d, i)])
    }
}

impl Simd4f for F32x4 {
    #[inline]
    fn create(x: f32, y: f32, z: f32, w: f32) -> F32x4 {
        F32x4([x, y, z, w])
    }

    #[inline]
    fn splat(v: f32) -> F32x4 {
        F32x4([v; 4])
    }

    #[inline]
    fn load4(a: &[f32; 4]) -> F32x4 {
        F32x4(*a)
    }

    #[inline]
    fn store4(self, a: &mut [f32; 4]) {
        *a = self.0;
    }

    #[inline]
    fn to_array(self) -> [f32; 4] {
        self.0
    }

    #[inline]
    fn get(self, lane: usize) -> f32 {
        self.0[lane]
    }

    #[inline]
    fn splat_x(self) -> F32x4 {
        F32x4([self.0[0]; 4])
    }

    #[inline]
    fn splat_y(self) -> F32x4 {
        F32x4([self.0[1]; 4])
    }

    #[inline]
    fn splat_z(self) -> F32x4 {
        F32x4([self.0[2]; 4])
    }

    #[inline]
    fn splat_w(self) -> F32x4 {
        F32x4([self.0[3]; 4])
    }

    #[inline]
    fn add(self, rhs: F32x4) -> F32x4 {
        lanewise!(self, rhs, +)
    }

    #[inline]
    fn sub(self, rhs: F32x4) -> F32x4 {
        lanewise!(self, rhs, -)
    }

    #[inline]
    fn mul(self, rhs: F32x4) -> F32x4 {
        lanewise!(self, rhs, *)
    }

    #[inline]
    fn div(self, rhs: F32x4) -> F32x4 {
        lanewise!(self, rhs, /)
    }

    #[inline]
    fn reciprocal(self) -> F32x4 {
        self.map(|a| 1.0 / a)
    }

    #[inline]
    fn sqrt(self) -> F32x4 {
        self.map(f32::sqrt)
    }

    #[inline]
    fn rsqrt(self) -> F32x4 {
        self.map(|a| 1.0 / a.sqrt())
    }

    #[inline]
    fn min(self, rhs: F32x4) -> F32x4 {
        self.zip(rhs, |a, b| if a < b { a } else { b })
    }

    #[inline]
    fn max(self, rhs: F32x4) -> F32x4 {
        self.zip(rhs, |a, b| if a > b { a } else { b })
    }

    #[inline]
    fn cmp_eq(self, rhs: F32x4) -> F32x4 {
        self.zip(rhs, |a, b| mask(a == b))
    }

    #[inline]
    fn cmp_gt(self, rhs: F32x4) -> F32x4 {
        self.zip(rhs, |a, b| mask(a > b))
    }

    #[inline]
    fn cmp_lt(self, rhs: F32x4) -> F32x4 {
        self.zip(rhs, |a, b| mask(a < b))
    }

    #[inline]
    fn signs(self) -> u32 {
        self.0
            .iter()
            .enumerate()
            .fold(0, |m, (i, v)| m | ((v.to_bits() >> 31) << i))
    }

    #[inline]
    fn dot3(self, rhs: F32x4) -> f32 {
        let (a, b) = (self.0, rhs.0);
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[inline]
    fn cross3(self, rhs: F32x4) -> F32x4 {
        let (a, b) = (self.0, rhs.0);
        F32x4([
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
            0.0,
        ])
    }

    #[inline]
    fn shuffle_wxyz(self) -> F32x4 {
        let [x, y, z, w] = self.0;
        F32x4([w, x, y, z])
    }

    #[inline]
    fn shuffle_zwxy(self) -> F32x4 {
        let [x, y, z, w] = self.0;
        F32x4([z, w, x, y])
    }

    #[inline]
    fn shuffle_yzwx(self) -> F32x4 {
        let [x, y, z, w] = self.0;
        F32x4([y, z, w, x])
    }

    #[inline]
    fn zero_w(self) -> F32x4 {
        let [x, y, z, _] = self.0;
        F32x4([x, y, z, 0.0])
    }

    #[inline]
    fn zero_zw(self) -> F32x4 {
        let [x, y, _, _] = self.0;
        F32x4([x, y, 0.0, 0.0])
    }

    #[inline]
    fn merge_high(self, rhs: F32x4) -> F32x4 {
        F32x4([self.0[2], self.0[3], rhs.0[2], rhs.0[3]])
    }

    #[inline]
    fn flip_sign_0101(self) -> F32x4 {
        let [x, y, z, w] = self.0;
        F32x4([x, -y, z, -w])
    }

    #[inline]
    fn flip_sign_1010(self) -> F32x4 {
        let [x, y, z, w] = self.0;
        F32x4([-x, y, -z, w])
    }

    #[inline]
    fn transpose4(c: [F32x4; 4]) -> [F32x4; 4] {
        let mut r = [F32x4::default(); 4];
        for (i, col) in c.iter().enumerate() {
            for (j, row) in r.iter_mut().enumerate() {
                row.0[i] = col.0[j];
            }
        }
        r
    }
}
