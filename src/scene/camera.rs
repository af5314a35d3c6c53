use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Vertical field of view shared by every effect camera, in degrees
pub const FOV_DEGREES: f32 = 75.0;
/// Near clipping plane shared by every effect camera
pub const ZNEAR: f32 = 0.1;
/// Far clipping plane shared by every effect camera
pub const ZFAR: f32 = 1000.0;

/// Fixed perspective camera owned by a single effect instance
///
/// Unlike an interactive orbit camera there are no controls: the eye sits on
/// the +Z axis looking at the origin and only the aspect ratio ever changes,
/// driven by viewport resizes.
#[derive(Debug, Clone, Copy)]
pub struct EffectCamera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl EffectCamera {
    /// Creates a camera at the given distance along +Z looking at the origin
    pub fn new(distance: f32, aspect: f32) -> Self {
        let mut camera = Self {
            eye: Vector3::new(0.0, 0.0, distance),
            target: Vector3::zero(),
            up: Vector3::unit_y(),
            aspect,
            fovy: Rad(FOV_DEGREES.to_radians()),
            znear: ZNEAR,
            zfar: ZFAR,
            uniform: CameraUniform::default(),
        };
        camera.update_view_proj();
        camera
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    /// Recomputes the aspect ratio from new viewport pixel dimensions
    ///
    /// The division is intentionally unguarded; a zero height leaves the
    /// aspect non-finite, mirroring the host behaviour for collapsed
    /// containers.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}
