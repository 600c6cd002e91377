//! Model transform stack
//!
//! A single "current top" matrix composed by push operations. Draws
//! capture the top at submission time. The top resets to identity at the
//! start of each frame's draw context, so a frame never inherits the
//! previous frame's transform.

use glam::{Mat4, Vec3};

/// Guest-mutable transform state
#[derive(Debug, Clone)]
pub struct TransformStack {
    top: Mat4,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            top: Mat4::IDENTITY,
        }
    }

    /// Reset to identity (called at each frame's draw-context start)
    pub fn reset(&mut self) {
        self.top = Mat4::IDENTITY;
    }

    /// Current top of the stack
    pub fn top(&self) -> Mat4 {
        self.top
    }

    /// Reset the top to the identity matrix.
    pub fn push_identity(&mut self) {
        self.top = Mat4::IDENTITY;
    }

    /// Replace the top outright from a column-major 4x4 matrix,
    /// bypassing composition.
    pub fn transform_set(&mut self, matrix: &[f32; 16]) {
        self.top = Mat4::from_cols_array(matrix);
    }

    /// Compose a translation onto the top.
    pub fn push_translate(&mut self, x: f32, y: f32, z: f32) {
        self.top *= Mat4::from_translation(Vec3::new(x, y, z));
    }

    /// Compose an X-axis rotation (degrees) onto the top.
    pub fn push_rotate_x(&mut self, angle_deg: f32) {
        self.top *= Mat4::from_rotation_x(angle_deg.to_radians());
    }

    /// Compose a Y-axis rotation (degrees) onto the top.
    pub fn push_rotate_y(&mut self, angle_deg: f32) {
        self.top *= Mat4::from_rotation_y(angle_deg.to_radians());
    }

    /// Compose a Z-axis rotation (degrees) onto the top.
    pub fn push_rotate_z(&mut self, angle_deg: f32) {
        self.top *= Mat4::from_rotation_z(angle_deg.to_radians());
    }

    /// Compose a rotation (degrees) about an arbitrary axis.
    ///
    /// The axis is normalized first; a zero-length axis is the identity
    /// rotation, never NaN.
    pub fn push_rotate(&mut self, angle_deg: f32, axis_x: f32, axis_y: f32, axis_z: f32) {
        let axis = Vec3::new(axis_x, axis_y, axis_z).normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        self.top *= Mat4::from_axis_angle(axis, angle_deg.to_radians());
    }

    /// Compose a non-uniform scale onto the top.
    pub fn push_scale(&mut self, x: f32, y: f32, z: f32) {
        self.top *= Mat4::from_scale(Vec3::new(x, y, z));
    }

    /// Compose a uniform scale onto the top.
    pub fn push_scale_uniform(&mut self, s: f32) {
        self.top *= Mat4::from_scale(Vec3::splat(s));
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn assert_mat4_eq(a: Mat4, b: Mat4) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for i in 0..16 {
            assert!((a[i] - b[i]).abs() < 1e-5, "element {i}: {} vs {}", a[i], b[i]);
        }
    }

    #[test]
    fn operations_right_multiply() {
        let mut stack = TransformStack::new();
        stack.push_translate(1.0, 0.0, 0.0);
        stack.push_scale_uniform(2.0);
        // top = T * S: local scale applied before the translation
        let expected =
            Mat4::from_translation(Vec3::X) * Mat4::from_scale(Vec3::splat(2.0));
        assert_mat4_eq(stack.top(), expected);
    }

    #[test]
    fn push_identity_resets_composition() {
        let mut stack = TransformStack::new();
        stack.push_translate(5.0, 6.0, 7.0);
        stack.push_rotate_y(45.0);
        stack.push_identity();
        assert_mat4_eq(stack.top(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_set_bypasses_composition() {
        let mut stack = TransformStack::new();
        stack.push_translate(1.0, 2.0, 3.0);
        let replacement = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
        stack.transform_set(&replacement.to_cols_array());
        assert_mat4_eq(stack.top(), replacement);
    }

    #[test]
    fn rotation_angles_are_degrees() {
        let mut stack = TransformStack::new();
        stack.push_rotate_z(90.0);
        let rotated = stack.top() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!((rotated.y - 1.0).abs() < 1e-5);
        assert!(rotated.x.abs() < 1e-5);
    }

    #[test]
    fn arbitrary_axis_is_normalized() {
        let mut a = TransformStack::new();
        a.push_rotate(90.0, 0.0, 10.0, 0.0); // unnormalized Y axis
        let mut b = TransformStack::new();
        b.push_rotate_y(90.0);
        assert_mat4_eq(a.top(), b.top());
    }

    #[test]
    fn zero_axis_is_identity_rotation() {
        let mut stack = TransformStack::new();
        stack.push_rotate(45.0, 0.0, 0.0, 0.0);
        let top = stack.top();
        assert!(top.is_finite());
        assert_mat4_eq(top, Mat4::IDENTITY);
    }
}
