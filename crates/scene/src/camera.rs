use log::{debug, trace};
use math::{
    mat_lookat, mat_ortho2d, mat_perspective, quat_mat, Mat3, Mat4, Quat, Vec2, Vec3,
};

use core::f32::consts::PI;

/// Closest the fly camera gets to looking straight along `world_up`.
const POLE_MARGIN: f32 = 0.01;

/// Orthographic camera for a 2D scene measured in pixels, y growing downwards.
///
/// `position` is the center of the view. When both `extents` components are
/// positive the view is kept inside the `[0, extents]` rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2d {
    pub position: Vec2,
    pub viewport: Vec2,
    pub extents: Vec2,
}

impl Default for Camera2d {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            viewport: Vec2::splat(1.0),
            extents: Vec2::zero(),
        }
    }
}

impl Camera2d {
    pub fn new(viewport: Vec2, extents: Vec2) -> Camera2d {
        debug!("2d camera: viewport {viewport:.1}, extents {extents:.1}");
        Self {
            position: viewport * 0.5,
            viewport,
            extents,
        }
    }

    /// Lower corner of the visible rectangle.
    ///
    /// The upper clamp bound never drops below zero, so a world smaller than
    /// the viewport pins the origin at zero instead of a negative offset.
    pub fn origin(&self) -> Vec2 {
        let origin = self.position - self.viewport * 0.5;
        if self.extents.x() <= 0.0 || self.extents.y() <= 0.0 {
            return origin;
        }

        let limit = Vec2::max(self.extents - self.viewport, Vec2::zero());
        let clamped = Vec2::clamp(origin, Vec2::zero(), limit);
        if clamped != origin {
            trace!("2d camera origin {origin:.1} clamped to {clamped:.1}");
        }
        clamped
    }

    pub fn matrix(&self) -> Mat4 {
        let origin = self.origin();
        mat_ortho2d(0.0, self.viewport.x(), 0.0, self.viewport.y())
            * Mat4::translate(Vec3::extend(-origin, 0.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
    Forward,
    Backward,
}

/// Left-handed fly camera: `forward` is +z in view space.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,

    pub right: Vec3,
    pub forward: Vec3,
    pub up: Vec3,

    pub world_up: Vec3,

    pub near: f32,
    pub far: f32,

    pub fov: f32,
    pub aspect_ratio: f32,

    pub move_speed: f32,
    pub rotate_speed: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: Vec3,
        target: Vec3,
        world_up: Vec3,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
        move_speed: f32,
        rotate_speed: f32,
    ) -> Camera {
        let mut c = Self {
            position,
            forward: (target - position).normalize(),
            up: Vec3::zero(),
            right: Vec3::zero(),
            world_up: world_up.normalize(),
            near,
            far,
            fov,
            aspect_ratio,
            move_speed,
            rotate_speed,
        };
        c.update_up_right();
        debug!(
            "camera at {:.2} looking along {:.2}, fov {:.3}, depth [{}, {}]",
            c.position, c.forward, c.fov, c.near, c.far
        );
        c
    }

    pub fn view(&self) -> Mat4 {
        mat_lookat(self.position + self.forward, self.position, self.world_up)
    }

    pub fn projection(&self) -> Mat4 {
        mat_perspective(self.fov, self.aspect_ratio, self.near, self.far, -1.0)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Rotation taking the local x, y, z axes onto `right`, `up`, `forward`.
    pub fn orientation(&self) -> Quat {
        quat_mat(&Mat3::from_columns([self.right, self.up, self.forward]))
    }

    pub fn move_in_direction(&mut self, dir: Direction, dt: f32) {
        let delta = dt * self.move_speed;
        match dir {
            Direction::Right    => self.position += self.right    * delta,
            Direction::Left     => self.position -= self.right    * delta,
            Direction::Up       => self.position += self.world_up * delta,
            Direction::Down     => self.position -= self.world_up * delta,
            Direction::Forward  => self.position += self.forward  * delta,
            Direction::Backward => self.position -= self.forward  * delta,
        }
    }

    fn update_up_right(&mut self) {
        self.right = self.world_up.cross(self.forward).normalize();
        self.up = self.forward.cross(self.right);
    }

    /// Turns the camera by a pointer offset: x yaws towards `right`, y pitches
    /// down. Pitch stops just short of the poles.
    pub fn drag(&mut self, offset: Vec2) {
        let (theta, phi) = self.spherical(self.forward);
        let theta = f32::clamp(
            theta + offset.y() * self.rotate_speed,
            POLE_MARGIN,
            PI - POLE_MARGIN,
        );
        let phi = f32::rem_euclid(phi - offset.x() * self.rotate_speed, 2.0 * PI);

        self.forward = self.direction(theta, phi);
        self.update_up_right();
        trace!("camera drag {offset:.2}: forward {:.3}", self.forward);
    }

    // Spherical coordinates around `world_up`: theta is the polar angle from
    // it, phi the azimuth in the (x, z) plane returned here.
    fn frame(&self) -> (Vec3, Vec3) {
        let seed = if self.world_up.z().abs() < 0.9 {
            Vec3::new(0.0, 0.0, 1.0)
        } else {
            Vec3::new(1.0, 0.0, 0.0)
        };
        let x = self.world_up.cross(seed).normalize();
        let z = x.cross(self.world_up);
        (x, z)
    }

    fn spherical(&self, dir: Vec3) -> (f32, f32) {
        let (x, z) = self.frame();
        let theta = f32::clamp(dir.dot(self.world_up), -1.0, 1.0).acos();
        let phi = f32::atan2(dir.dot(z), dir.dot(x));
        (theta, phi)
    }

    fn direction(&self, theta: f32, phi: f32) -> Vec3 {
        let (x, z) = self.frame();
        let (st, ct) = theta.sin_cos();
        let (sp, cp) = phi.sin_cos();
        x * (st * cp) + z * (st * sp) + self.world_up * ct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use math::Vec4;

    fn fly() -> Camera {
        Camera::new(
            Vec3::new(0.0, 1.0, -5.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            PI / 3.0,
            16.0 / 9.0,
            0.1,
            100.0,
            2.0,
            0.005,
        )
    }

    #[test]
    fn camera2d_defaults() {
        let c = Camera2d::default();
        assert_eq!(c.viewport, Vec2::splat(1.0));
        assert_eq!(c.extents, Vec2::zero());
        assert_eq!(c.origin(), Vec2::splat(-0.5));
    }

    #[test]
    fn camera2d_maps_viewport_to_clip() {
        let c = Camera2d::new(Vec2::new(640.0, 480.0), Vec2::zero());
        let m = c.matrix();

        let lo = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(lo.xy(), Vec2::new(-1.0, -1.0), epsilon = 1e-6);
        let hi = m * Vec4::new(640.0, 480.0, 0.0, 1.0);
        assert_abs_diff_eq!(hi.xy(), Vec2::new(1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn camera2d_stays_inside_extents() {
        let mut c = Camera2d::new(Vec2::new(640.0, 480.0), Vec2::new(1000.0, 1000.0));

        c.position = Vec2::zero();
        assert_eq!(c.origin(), Vec2::zero());

        c.position = Vec2::new(990.0, 990.0);
        assert_eq!(c.origin(), Vec2::new(360.0, 520.0));

        c.position = Vec2::new(500.0, 500.0);
        assert_eq!(c.origin(), Vec2::new(180.0, 260.0));
        let center = c.matrix() * Vec4::new(500.0, 500.0, 0.0, 1.0);
        assert_abs_diff_eq!(center.xy(), Vec2::zero(), epsilon = 1e-6);

        // A world smaller than the view pins the origin at zero.
        c.extents = Vec2::new(100.0, 100.0);
        assert_eq!(c.origin(), Vec2::zero());
    }

    #[test]
    fn basis_is_left_handed() {
        let c = fly();
        assert_abs_diff_eq!(c.forward, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        assert_abs_diff_eq!(c.right, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_abs_diff_eq!(c.up, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn view_puts_target_ahead() {
        let c = fly();
        let p = c.view().transform_point(Vec3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(p, Vec3::new(0.0, 0.0, 5.0), epsilon = 1e-5);

        let near = c.view_projection() * Vec4::extend(c.position + c.forward * c.near, 1.0);
        assert_abs_diff_eq!(near.z() / near.w(), 0.0, epsilon = 1e-5);
        let far = c.view_projection() * Vec4::extend(c.position + c.forward * c.far, 1.0);
        assert_abs_diff_eq!(far.z() / far.w(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn moves_along_basis() {
        let mut c = fly();
        c.move_in_direction(Direction::Forward, 0.5);
        assert_abs_diff_eq!(c.position, Vec3::new(0.0, 1.0, -4.0), epsilon = 1e-6);
        c.move_in_direction(Direction::Right, 1.0);
        c.move_in_direction(Direction::Down, 0.25);
        assert_abs_diff_eq!(c.position, Vec3::new(2.0, 0.5, -4.0), epsilon = 1e-6);
    }

    #[test]
    fn drag_turns_and_keeps_basis_orthonormal() {
        let mut c = fly();
        c.drag(Vec2::new(40.0, 0.0));
        assert!(c.forward.x() > 0.0);
        assert_abs_diff_eq!(c.forward.y(), 0.0, epsilon = 1e-5);

        c.drag(Vec2::new(0.0, 60.0));
        assert!(c.forward.y() < 0.0);

        assert_abs_diff_eq!(c.forward.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(c.right.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(c.up.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(c.forward.dot(c.right), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(c.forward.dot(c.up), 0.0, epsilon = 1e-5);

        // Pitch saturates before the pole.
        c.drag(Vec2::new(0.0, 1.0e4));
        assert!(c.forward.dot(c.world_up) > -1.0);
        assert!(c.right.length() > 0.99);
    }

    #[test]
    fn orientation_rotates_local_axes_onto_basis() {
        let mut c = fly();
        c.drag(Vec2::new(-70.0, 25.0));
        let q = c.orientation();
        assert_abs_diff_eq!(q * Vec3::new(0.0, 0.0, 1.0), c.forward, epsilon = 1e-5);
        assert_abs_diff_eq!(q * Vec3::new(1.0, 0.0, 0.0), c.right, epsilon = 1e-5);
        assert_abs_diff_eq!(q * Vec3::new(0.0, 1.0, 0.0), c.up, epsilon = 1e-5);
    }
}
