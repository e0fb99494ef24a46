//! Interactive view state and the keyboard bindings that drive it.

use sdl2::keyboard::Keycode;

/// Degrees added per arrow key press.
const ROTATION_STEP: f32 = 5.0;
/// Degrees of vertical field of view removed/added per page key press.
const ZOOM_STEP: f32 = 1.0;
/// Thickness change per press, in stroke units.
const THICKNESS_STEP: f32 = 0.01;
/// Degrees the light moves per press.
const LIGHT_STEP: f32 = 1.0;

const ZOOM_MIN: f32 = 10.0;
const ZOOM_MAX: f32 = 100.0;
const THICKNESS_MIN: f32 = 0.0;
const THICKNESS_MAX: f32 = 10.0;

/// Which normal the fragment stage shades with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    /// One normal per face; facets stay visible.
    Flat,
    /// Interpolated vertex normals.
    Smooth,
}

impl ShadingMode {
    /// Integer pushed to the shader.
    #[must_use]
    pub fn shader_value(self) -> i32 {
        match self {
            Self::Flat => 0,
            Self::Smooth => 1,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Flat => Self::Smooth,
            Self::Smooth => Self::Flat,
        }
    }
}

/// How surfaces are filled between the stylized edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    /// Bare paper; only silhouettes and creases are drawn.
    Outline,
    /// Tonal stroke textures hatch the surface by light intensity.
    Hatched,
}

impl StrokeMode {
    /// Integer pushed to the shader.
    #[must_use]
    pub fn shader_value(self) -> i32 {
        match self {
            Self::Outline => 0,
            Self::Hatched => 1,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Outline => Self::Hatched,
            Self::Hatched => Self::Outline,
        }
    }
}

/// Everything the keyboard can change between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Model rotation about the X axis, degrees.
    pub rotation_x: f32,
    /// Model rotation about the Y axis, degrees.
    pub rotation_y: f32,
    /// Vertical field of view, degrees. Smaller means closer.
    pub zoom: f32,
    pub shading: ShadingMode,
    pub stroke: StrokeMode,
    /// Silhouette stroke thickness in 0.01-NDC units.
    pub silhouette_thickness: f32,
    /// Crease stroke thickness in 0.01-NDC units.
    pub crease_thickness: f32,
    /// Light orbit angle about the Y axis, degrees in [0, 360).
    pub light_angle: f32,
    /// Draw edges of the rasterized primitives instead of fills.
    pub wireframe: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            zoom: 30.0,
            shading: ShadingMode::Flat,
            stroke: StrokeMode::Outline,
            silhouette_thickness: 2.5,
            crease_thickness: 1.0,
            light_angle: 0.0,
            wireframe: false,
        }
    }
}

impl ViewState {
    /// Apply one key press. Returns `true` when the key was bound.
    ///
    /// | Key            | Effect                                          |
    /// |----------------|-------------------------------------------------|
    /// | Left / Right   | Rotate the model about Y by 5 degrees           |
    /// | Up / Down      | Rotate the model about X by 5 degrees           |
    /// | PageUp / Down  | Zoom in / out (field of view, clamped 10..100)  |
    /// | Space          | Toggle flat / smooth shading                    |
    /// | Q / A          | Thicken / thin silhouettes (clamped 0..10)      |
    /// | W / S          | Thicken / thin creases (clamped 0..10)          |
    /// | E / R          | Orbit the light around Y, wrapping at 360       |
    /// | T              | Toggle outline / hatched surfaces               |
    /// | F              | Toggle wireframe rasterization                  |
    pub fn handle_key(&mut self, key: Keycode) -> bool {
        match key {
            Keycode::LEFT => self.rotation_y -= ROTATION_STEP,
            Keycode::RIGHT => self.rotation_y += ROTATION_STEP,
            Keycode::UP => self.rotation_x -= ROTATION_STEP,
            Keycode::DOWN => self.rotation_x += ROTATION_STEP,
            Keycode::PAGEUP => self.zoom = (self.zoom - ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX),
            Keycode::PAGEDOWN => self.zoom = (self.zoom + ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX),
            Keycode::SPACE => self.shading = self.shading.toggled(),
            Keycode::Q => self.silhouette_thickness = thicker(self.silhouette_thickness),
            Keycode::A => self.silhouette_thickness = thinner(self.silhouette_thickness),
            Keycode::W => self.crease_thickness = thicker(self.crease_thickness),
            Keycode::S => self.crease_thickness = thinner(self.crease_thickness),
            Keycode::E => self.light_angle = wrap_degrees(self.light_angle + LIGHT_STEP),
            Keycode::R => self.light_angle = wrap_degrees(self.light_angle - LIGHT_STEP),
            Keycode::T => self.stroke = self.stroke.toggled(),
            Keycode::F => self.wireframe = !self.wireframe,
            _ => return false,
        }
        true
    }
}

fn thicker(thickness: f32) -> f32 {
    (thickness + THICKNESS_STEP).clamp(THICKNESS_MIN, THICKNESS_MAX)
}

fn thinner(thickness: f32) -> f32 {
    (thickness - THICKNESS_STEP).clamp(THICKNESS_MIN, THICKNESS_MAX)
}

fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_startup_view() {
        let state = ViewState::default();
        assert_eq!(state.zoom, 30.0);
        assert_eq!(state.shading, ShadingMode::Flat);
        assert_eq!(state.stroke, StrokeMode::Outline);
        assert_eq!(state.silhouette_thickness, 2.5);
        assert_eq!(state.crease_thickness, 1.0);
        assert_eq!(state.light_angle, 0.0);
        assert!(!state.wireframe);
    }

    #[test]
    fn arrows_step_rotation_by_five_degrees() {
        let mut state = ViewState::default();
        assert!(state.handle_key(Keycode::RIGHT));
        assert!(state.handle_key(Keycode::RIGHT));
        assert!(state.handle_key(Keycode::UP));
        assert_eq!(state.rotation_y, 10.0);
        assert_eq!(state.rotation_x, -5.0);
    }

    #[test]
    fn zoom_clamps_at_both_ends() {
        let mut state = ViewState::default();
        for _ in 0..500 {
            state.handle_key(Keycode::PAGEUP);
        }
        assert_eq!(state.zoom, 10.0);
        for _ in 0..500 {
            state.handle_key(Keycode::PAGEDOWN);
        }
        assert_eq!(state.zoom, 100.0);
    }

    #[test]
    fn thickness_clamps_at_both_ends() {
        let mut state = ViewState::default();
        for _ in 0..2000 {
            state.handle_key(Keycode::Q);
        }
        assert_eq!(state.silhouette_thickness, 10.0);
        for _ in 0..2000 {
            state.handle_key(Keycode::A);
        }
        assert_eq!(state.silhouette_thickness, 0.0);

        for _ in 0..2000 {
            state.handle_key(Keycode::S);
        }
        assert_eq!(state.crease_thickness, 0.0);
        state.handle_key(Keycode::W);
        assert!((state.crease_thickness - 0.01).abs() < 1e-6);
    }

    #[test]
    fn light_angle_wraps_in_both_directions() {
        let mut state = ViewState::default();
        state.handle_key(Keycode::R);
        assert_eq!(state.light_angle, 359.0);
        state.handle_key(Keycode::E);
        assert_eq!(state.light_angle, 0.0);

        state.light_angle = 359.5;
        state.handle_key(Keycode::E);
        assert!((state.light_angle - 0.5).abs() < 1e-6);
        assert!(state.light_angle >= 0.0 && state.light_angle < 360.0);
    }

    #[test]
    fn toggles_alternate() {
        let mut state = ViewState::default();
        state.handle_key(Keycode::SPACE);
        assert_eq!(state.shading, ShadingMode::Smooth);
        state.handle_key(Keycode::SPACE);
        assert_eq!(state.shading, ShadingMode::Flat);

        state.handle_key(Keycode::T);
        assert_eq!(state.stroke, StrokeMode::Hatched);
        state.handle_key(Keycode::T);
        assert_eq!(state.stroke, StrokeMode::Outline);

        state.handle_key(Keycode::F);
        assert!(state.wireframe);
        state.handle_key(Keycode::F);
        assert!(!state.wireframe);
    }

    #[test]
    fn unbound_keys_report_false_and_change_nothing() {
        let mut state = ViewState::default();
        let before = state.clone();
        assert!(!state.handle_key(Keycode::Z));
        assert_eq!(state, before);
    }

    #[test]
    fn shader_values_are_stable() {
        assert_eq!(ShadingMode::Flat.shader_value(), 0);
        assert_eq!(ShadingMode::Smooth.shader_value(), 1);
        assert_eq!(StrokeMode::Outline.shader_value(), 0);
        assert_eq!(StrokeMode::Hatched.shader_value(), 1);
    }
}
