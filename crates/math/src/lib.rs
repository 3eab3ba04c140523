pub mod backend;
pub mod batch;
pub mod error;
pub mod mat;
pub mod quat;
pub mod vec;

pub use error::MathError;
pub use mat::{
    mat_identity, mat_lookat, mat_ortho, mat_ortho2d, mat_perspective, mat_rotate, mat_rotate3,
    mat_rotate_axis, mat_rotate_pairs, mat_rotate_x, mat_rotate_x_pair, mat_rotate_y,
    mat_rotate_y_pair, mat_rotate_z, mat_rotate_z_pair, Mat2, Mat2x3, Mat2x4, Mat3, Mat3x2,
    Mat3x4, Mat4, Mat4x2, Mat4x3, Matrix,
};
pub use quat::{quat_angle_axis, quat_axis_angle, quat_euler, quat_mat, Quat};
pub use vec::{SwizzleMut, Vec1, Vec2, Vec3, Vec4, Vector};
