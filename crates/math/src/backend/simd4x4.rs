use super::Simd4f;

/// Four column registers of a column-major 4x4 matrix.
#[derive(Debug, Copy, Clone)]
pub struct Simd4x4<B: Simd4f> {
    pub x: B,
    pub y: B,
    pub z: B,
    pub w: B,
}

impl<B: Simd4f> Simd4x4<B> {
    #[inline]
    pub fn create(x: B, y: B, z: B, w: B) -> Self {
        Simd4x4 { x, y, z, w }
    }

    #[inline]
    pub fn splat(v: f32) -> Self {
        let s = B::splat(v);
        Simd4x4::create(s, s, s, s)
    }

    #[inline]
    pub fn zero() -> Self {
        let z = B::zero();
        Simd4x4::create(z, z, z, z)
    }

    #[inline]
    pub fn identity() -> Self {
        Simd4x4::create(
            B::create(1.0, 0.0, 0.0, 0.0),
            B::create(0.0, 1.0, 0.0, 0.0),
            B::create(0.0, 0.0, 1.0, 0.0),
            B::create(0.0, 0.0, 0.0, 1.0),
        )
    }

    #[inline]
    pub fn load(m: &[f32; 16]) -> Self {
        let c: &[[f32; 4]; 4] = bytemuck::cast_ref(m);
        Simd4x4::create(B::load4(&c[0]), B::load4(&c[1]), B::load4(&c[2]), B::load4(&c[3]))
    }

    #[inline]
    pub fn store(self, m: &mut [f32; 16]) {
        let c: &mut [[f32; 4]; 4] = bytemuck::cast_mut(m);
        self.x.store4(&mut c[0]);
        self.y.store4(&mut c[1]);
        self.z.store4(&mut c[2]);
        self.w.store4(&mut c[3]);
    }

    #[inline]
    fn columns(self) -> [B; 4] {
        [self.x, self.y, self.z, self.w]
    }

    #[inline]
    fn from_array(c: [B; 4]) -> Self {
        let [x, y, z, w] = c;
        Simd4x4::create(x, y, z, w)
    }

    #[inline]
    fn map(self, f: impl Fn(B) -> B) -> Self {
        Simd4x4::create(f(self.x), f(self.y), f(self.z), f(self.w))
    }

    #[inline]
    fn zip(self, rhs: Self, f: impl Fn(B, B) -> B) -> Self {
        Simd4x4::create(f(self.x, rhs.x), f(self.y, rhs.y), f(self.z, rhs.z), f(self.w, rhs.w))
    }

    /// Sum of the four columns.
    #[inline]
    pub fn sum(self) -> B {
        self.x.add(self.y).add(self.z.add(self.w))
    }

    #[inline]
    pub fn add(self, rhs: Self) -> Self {
        self.zip(rhs, B::add)
    }

    #[inline]
    pub fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, B::sub)
    }

    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, B::mul)
    }

    #[inline]
    pub fn div(self, rhs: Self) -> Self {
        self.zip(rhs, B::div)
    }

    #[inline]
    pub fn add_scalar(self, s: B) -> Self {
        self.map(|c| c.add(s))
    }

    #[inline]
    pub fn mul_scalar(self, s: B) -> Self {
        self.map(|c| c.mul(s))
    }

    #[inline]
    pub fn matrix_vector_mul(self, v: B) -> B {
        let r = self.x.mul(v.splat_x());
        let r = self.y.madd(v.splat_y(), r);
        let r = self.z.madd(v.splat_z(), r);
        self.w.madd(v.splat_w(), r)
    }

    /// Transforms a direction: the w lane of `v` is ignored.
    #[inline]
    pub fn matrix_vector3_mul(self, v: B) -> B {
        let r = self.x.mul(v.splat_x());
        let r = self.y.madd(v.splat_y(), r);
        self.z.madd(v.splat_z(), r)
    }

    /// Transforms a point: the w lane of `v` is taken as 1.
    #[inline]
    pub fn matrix_point3_mul(self, v: B) -> B {
        let r = self.x.madd(v.splat_x(), self.w);
        let r = self.y.madd(v.splat_y(), r);
        self.z.madd(v.splat_z(), r)
    }

    #[inline]
    pub fn matrix_mul(self, rhs: Self) -> Self {
        rhs.map(|c| self.matrix_vector_mul(c))
    }

    #[inline]
    pub fn transpose(self) -> Self {
        Simd4x4::from_array(B::transpose4(self.columns()))
    }

    /// Inverse through 2x2 sub-block adjugates.
    ///
    /// Returns the inverse and the determinant splatted to every lane. A
    /// singular matrix yields non-finite lanes.
    pub fn inverse(self) -> (Self, B) {
        let [c0, c1, c2, c3] = self.columns();

        let c0_wxyz = c0.shuffle_wxyz();
        let c0_zwxy = c0.shuffle_zwxy();
        let c0_yzwx = c0.shuffle_yzwx();
        let c1_wxyz = c1.shuffle_wxyz();
        let c1_zwxy = c1.shuffle_zwxy();
        let c1_yzwx = c1.shuffle_yzwx();
        let c2_wxyz = c2.shuffle_wxyz();
        let c2_zwxy = c2.shuffle_zwxy();
        let c2_yzwx = c2.shuffle_yzwx();
        let c3_wxyz = c3.shuffle_wxyz();
        let c3_zwxy = c3.shuffle_zwxy();
        let c3_yzwx = c3.shuffle_yzwx();

        let a = c0_wxyz.mul(c1);
        let b = c0_wxyz.mul(c1_yzwx);
        let c = c0_wxyz.mul(c1_zwxy);
        let d = c2_wxyz.mul(c3);
        let e = c2_wxyz.mul(c3_yzwx);
        let f = c2_wxyz.mul(c3_zwxy);

        // Pairwise 2x2 minors of the lower and upper column pairs.
        let ar1 = f.shuffle_wxyz().sub(d.shuffle_zwxy());
        let ar2 = e.shuffle_zwxy().sub(e);
        let ar3 = f.sub(d.shuffle_wxyz());
        let br1 = c.shuffle_wxyz().sub(a.shuffle_zwxy());
        let br2 = b.shuffle_zwxy().sub(b);
        let br3 = c.sub(a.shuffle_wxyz());

        let c0_sum = c0_yzwx.madd(ar3, c0_zwxy.madd(ar2, c0_wxyz.mul(ar1)));
        let c1_sum = c1_wxyz.madd(ar1, c1_zwxy.madd(ar2, c1_yzwx.mul(ar3)));
        let c2_sum = c2_yzwx.madd(br3, c2_zwxy.madd(br2, c2_wxyz.mul(br1)));
        let c3_sum = c3_yzwx.madd(br3, c3_zwxy.madd(br2, c3_wxyz.mul(br1)));

        let d0 = c1_sum.mul(c0);
        let d1 = d0.add(d0.merge_high(d0));
        // The minor pairing above yields -det.
        let neg_det = d1.sub(d1.splat_y());
        let invdet = B::splat(1.0).div(neg_det).splat_x();

        let o0 = c1_sum.flip_sign_0101().mul(invdet);
        let o1 = c0_sum.flip_sign_1010().mul(invdet);
        let o2 = c3_sum.flip_sign_0101().mul(invdet);
        let o3 = c2_sum.flip_sign_1010().mul(invdet);

        let inv = Simd4x4::from_array(B::transpose4([o0, o1, o2, o3]));
        (inv, B::zero().sub(neg_det.splat_x()))
    }
}

impl<B: Simd4f> Default for Simd4x4<B> {
    #[inline]
    fn default() -> Self {
        Simd4x4::zero()
    }
}
