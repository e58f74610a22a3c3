//! Scene rendering seam: the post-processing chain owns the targets and
//! pass order, the caller owns what gets drawn into the scene target.

use std::time::Instant;

/// Camera matrices handed to the scene renderer each frame.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub view: glam::Mat4,
    pub projection: glam::Mat4,
}

impl Camera {
    pub fn view_projection(&self) -> glam::Mat4 {
        self.projection * self.view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            view: glam::Mat4::IDENTITY,
            projection: glam::Mat4::IDENTITY,
        }
    }
}

/// Frame timing passed to the scene renderer for animation.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    /// Seconds since the renderer was created.
    pub time: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Monotonic frame counter.
    pub frame: u64,
}

/// Tracks wall-clock time across frames and produces a [`FrameClock`]
/// per update.
pub struct FrameTimer {
    start: Instant,
    last: Instant,
    frame: u64,
}

impl FrameTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame: 0,
        }
    }

    pub fn tick(&mut self) -> FrameClock {
        let now = Instant::now();
        let clock = FrameClock {
            time: now.duration_since(self.start).as_secs_f32(),
            delta: now.duration_since(self.last).as_secs_f32(),
            frame: self.frame,
        };
        self.last = now;
        self.frame += 1;
        clock
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws the 3D scene into the provided color and depth attachments.
///
/// Implementations begin their own render pass (and clear if desired);
/// the attachments are full-resolution HDR and recreated on resize, so
/// no view may be cached across calls.
pub trait SceneRenderer {
    fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        color: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        camera: &Camera,
        clock: &FrameClock,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_timer_counts_frames_monotonically() {
        let mut timer = FrameTimer::new();
        let a = timer.tick();
        let b = timer.tick();
        assert_eq!(a.frame, 0);
        assert_eq!(b.frame, 1);
        assert!(b.time >= a.time);
        assert!(a.delta >= 0.0 && b.delta >= 0.0);
    }

    #[test]
    fn camera_view_projection_composes_in_order() {
        let camera = Camera {
            view: glam::Mat4::from_translation(glam::vec3(0.0, 0.0, -5.0)),
            projection: glam::Mat4::perspective_rh(1.0, 16.0 / 9.0, 0.1, 100.0),
        };
        let vp = camera.view_projection();
        let origin = vp * glam::vec4(0.0, 0.0, 0.0, 1.0);
        // A point at the world origin sits 5 units down the view axis.
        assert!((origin.w - 5.0).abs() < 1e-5);
    }
}
