use glam::{Mat4, Quat, Vec3};
use std::cell::Cell;

#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,

    local_matrix: Cell<Mat4>,
    world_matrix: Cell<Mat4>,
    local_dirty: Cell<bool>,
    world_dirty: Cell<bool>,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_scale_rotation_translation(Vec3::ONE, Quat::IDENTITY, translation)
    }

    pub fn from_scale_rotation_translation(scale: Vec3, rotation: Quat, translation: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            local_matrix: Cell::new(Mat4::IDENTITY),
            world_matrix: Cell::new(Mat4::IDENTITY),
            local_dirty: Cell::new(true),
            world_dirty: Cell::new(true),
        }
    }

    pub fn get_local_matrix(&self) -> Mat4 {
        if self.local_dirty.get() {
            let matrix =
                Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation);

            self.local_matrix.set(matrix);
            self.local_dirty.set(false);
            self.invalidate_world();
        }

        self.local_matrix.get()
    }

    /// Cached world matrix. Only meaningful while `is_world_dirty` is false.
    pub fn get_world_matrix(&self) -> Mat4 {
        self.world_matrix.get()
    }

    pub fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.set(world_matrix);
        self.world_dirty.set(false);
    }

    pub fn invalidate_local(&self) {
        self.local_dirty.set(true);
        self.world_dirty.set(true);
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    pub fn set_transform(&mut self, translation: Vec3, rotation: Quat, scale: Vec3) {
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
        self.invalidate_local();
    }

    /// Decomposes an affine matrix. Shear is not representable and is lost.
    pub fn set_local_matrix(&mut self, matrix: Mat4) {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        self.set_transform(translation, rotation, scale);
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_matrix_tracks_setters() {
        let mut transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            transform.get_local_matrix(),
            Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
        );

        transform.set_transform(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, Vec3::splat(2.0));
        let expected = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::IDENTITY,
            Vec3::new(1.0, 2.0, 3.0),
        );
        assert_eq!(transform.get_local_matrix(), expected);
        assert!(transform.is_world_dirty());
    }

    #[test]
    fn matrix_round_trip_keeps_non_uniform_scale() {
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.7),
            Vec3::new(-4.0, 0.5, 9.0),
        );

        let mut transform = Transform::default();
        transform.set_local_matrix(matrix);

        assert!(transform.scale().abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
        assert!(transform.get_local_matrix().abs_diff_eq(matrix, 1e-5));
    }

    #[test]
    fn set_world_matrix_clears_dirty_flag() {
        let transform = Transform::default();
        assert!(transform.is_world_dirty());

        transform.set_world_matrix(Mat4::from_translation(Vec3::X));

        assert!(!transform.is_world_dirty());
        assert_eq!(transform.get_world_matrix(), Mat4::from_translation(Vec3::X));
    }
}
