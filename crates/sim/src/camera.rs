use glam::{Mat4, Vec3};
use skirmish_common::{CameraConfig, Transform, frame_blend};

/// Smallest polar angle of the eye offset, keeping it off the pole.
const MIN_POLAR: f32 = 0.01;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Follow camera: an orbit target that tracks the vehicle and a look point
/// that trails the vehicle's heading.
///
/// Both are exponential filters; the look point uses the slower rate so quick
/// turns do not snap the view. There is no terminal state.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraConfig,
    reference_rate: f32,
    target: Vec3,
    look_at: Vec3,
    /// Eye position relative to the orbit target.
    offset: Vec3,
}

impl CameraRig {
    pub fn new(config: &CameraConfig, reference_rate: f32) -> Self {
        let mut rig = Self {
            config: config.clone(),
            reference_rate,
            target: Vec3::ZERO,
            look_at: Vec3::ZERO,
            offset: config.offset,
        };
        rig.offset = rig.constrain(config.offset);
        rig
    }

    /// Jump both filters straight to `vehicle` (scene mount).
    pub fn snap_to(&mut self, vehicle: &Transform) {
        self.target = vehicle.position;
        self.look_at = self.look_ahead_point(vehicle);
    }

    pub fn update(&mut self, vehicle: &Transform, dt: f32) {
        let target_t = frame_blend(self.config.target_blend, dt, self.reference_rate);
        self.target = self.target.lerp(vehicle.position, target_t);

        let ahead = self.look_ahead_point(vehicle);
        let look_t = frame_blend(self.config.look_blend, dt, self.reference_rate);
        self.look_at = self.look_at.lerp(ahead, look_t);
    }

    /// Point `look_ahead` units in front of the vehicle.
    pub fn look_ahead_point(&self, vehicle: &Transform) -> Vec3 {
        let forward = vehicle
            .transform_direction(Vec3::Z)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        vehicle.position + forward * self.config.look_ahead
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.offset
    }

    pub fn look_direction(&self) -> Vec3 {
        (self.look_at - self.eye())
            .try_normalize()
            .unwrap_or_else(|| -self.offset.normalize_or_zero())
    }

    /// Rotate the eye around the target: `yaw` about +Y, `pitch` toward the pole.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let radius = self.offset.length();
        let max_polar = self.config.max_polar_angle.max(MIN_POLAR);
        let polar = ((self.offset.y / radius).clamp(-1.0, 1.0).acos() - pitch)
            .clamp(MIN_POLAR, max_polar);
        let azimuth = self.offset.z.atan2(self.offset.x) - yaw;
        let orbited = Vec3::new(
            radius * polar.sin() * azimuth.cos(),
            radius * polar.cos(),
            radius * polar.sin() * azimuth.sin(),
        );
        self.offset = self.constrain(orbited);
    }

    /// Scale the eye distance by `factor` (< 1 zooms in).
    pub fn zoom(&mut self, factor: f32) {
        self.offset = self.constrain(self.offset * factor);
    }

    /// Clamp distance to the configured range and keep the eye above the ground.
    fn constrain(&self, offset: Vec3) -> Vec3 {
        let radius = offset
            .length()
            .clamp(self.config.min_distance, self.config.max_distance);
        let dir = offset.try_normalize().unwrap_or(Vec3::Y);
        let max_polar = self.config.max_polar_angle.max(MIN_POLAR);
        let polar = dir.y.clamp(-1.0, 1.0).acos().clamp(MIN_POLAR, max_polar);
        let horizontal = Vec3::new(dir.x, 0.0, dir.z)
            .try_normalize()
            .unwrap_or(Vec3::X);
        (horizontal * polar.sin() + Vec3::Y * polar.cos()) * radius
    }

    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.eye();
        Mat4::look_at_rh(eye, eye + self.look_direction(), Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.config.fov_degrees.to_radians(), aspect, NEAR, FAR)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}
