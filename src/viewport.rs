use gl::types::GLsizei;

/// Visible drawing rectangle inside the window, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    /// Fixed 16:9 letterbox: full window width, height derived from it,
    /// offset upwards by half the derived height. Rounding is add-0.5 then
    /// truncate, so a 100 pixel wide window gets a 56 pixel high viewport.
    pub fn letterbox(width: u32) -> Self {
        let width = width as i32;
        let height = ((9 * width) as f64 / 16.0 + 0.5) as i32;
        Self {
            x: 0,
            y: height / 2,
            width,
            height,
        }
    }

    pub fn apply(&self) {
        unsafe {
            gl::Viewport(
                self.x,
                self.y,
                self.width as GLsizei,
                self.height as GLsizei,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letterbox_640() {
        let vp = Viewport::letterbox(640);
        assert_eq!(vp, Viewport { x: 0, y: 180, width: 640, height: 360 });
    }

    #[test]
    fn letterbox_1920() {
        let vp = Viewport::letterbox(1920);
        assert_eq!(vp.height, 1080);
        assert_eq!(vp.y, 540);
    }

    #[test]
    fn letterbox_100_truncates_after_rounding_bias() {
        // 9 * 100 / 16.0 = 56.25; +0.5 = 56.75; truncation gives 56.
        let vp = Viewport::letterbox(100);
        assert_eq!(vp.height, 56);
        assert_eq!(vp.y, 28);
    }

    #[test]
    fn letterbox_keeps_full_width_and_zero_x() {
        for width in [1, 320, 641, 2560] {
            let vp = Viewport::letterbox(width);
            assert_eq!(vp.width, width as i32);
            assert_eq!(vp.x, 0);
        }
    }
}
