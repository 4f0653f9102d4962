use std::time::Instant;

use gl::types::{GLfloat, GLint};

use crate::error::InitError;
use crate::gl_utils::{ShaderProgram, VertexArray, VertexAttribute, VertexBuffer};
use crate::scenes::SceneRenderer;

#[rustfmt::skip]
pub(crate) const VERTEX_DATA: [GLfloat; 12] = [
     0.0,  0.5,   0.0, 1.0,
     0.5, -0.366, 0.0, 1.0,
    -0.5, -0.366, 0.0, 1.0,
];

// The orbit and the color fade share the same 5 second period: one full
// revolution of radius 0.5 per cycle, white fading to green alongside it.
pub(crate) const VERTEX_SHADER_SRC: &str = r#"#version 330

layout(location = 0) in vec4 position;

uniform float time;

void main()
{
    float rate = 3.14159 * 2.0 / 5.0;
    vec4 offset = vec4(cos(time * rate) * 0.5, sin(time * rate) * 0.5, 0.0, 0.0);
    gl_Position = position + offset;
}
"#;

pub(crate) const FRAGMENT_SHADER_SRC: &str = r#"#version 330

uniform float time;

out vec4 output_color;

const vec4 first_color = vec4(1.0, 1.0, 1.0, 1.0);
const vec4 second_color = vec4(0.0, 1.0, 0.0, 1.0);

void main()
{
    float phase = mod(time, 5.0) / 5.0;
    output_color = mix(first_color, second_color, phase);
}
"#;

/// A triangle orbiting the origin while cross-fading white to green, both
/// driven by a single elapsed-time uniform.
pub struct OrbitTriangle {
    render_context: Option<RenderContext>,
}

struct RenderContext {
    program: ShaderProgram,
    _vao: VertexArray,
    vbo: VertexBuffer,
    time_location: GLint,
    started: Instant,
}

impl OrbitTriangle {
    pub fn new() -> Self {
        Self {
            render_context: None,
        }
    }
}

impl Default for OrbitTriangle {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer for OrbitTriangle {
    fn init_render(&mut self) -> Result<(), InitError> {
        let vao = VertexArray::new();
        vao.bind();

        let mut vbo = VertexBuffer::new(&VERTEX_DATA);
        vbo.add_vertex_attribute(VertexAttribute {
            index: 0,
            size: 4,
            stride: 0,
            offset: 0,
        });

        let program = ShaderProgram::new(VERTEX_SHADER_SRC, FRAGMENT_SHADER_SRC)?;
        let time_location = program.uniform_location("time");

        self.render_context = Some(RenderContext {
            program,
            _vao: vao,
            vbo,
            time_location,
            started: Instant::now(),
        });
        Ok(())
    }

    fn render(&mut self, _width: u32, _height: u32) {
        let ctx = self.render_context.as_ref().unwrap();
        let elapsed = ctx.started.elapsed().as_secs_f32();

        ctx.program.use_program();
        ctx.program.set_uniform_1f(ctx.time_location, elapsed);
        ctx.vbo.bind();
        ctx.vbo.enable_vertex_attributes();

        unsafe {
            gl::DrawArrays(gl::TRIANGLES, 0, 3);
        }

        ctx.vbo.disable_vertex_attributes();
        ctx.vbo.unbind();
        ctx.program.unbind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: f32 = 5.0;
    const RADIUS: f32 = 0.5;

    // Mirror of the vertex shader's offset law.
    fn orbit_offset(t: f32) -> (f32, f32) {
        let rate = 3.14159 * 2.0 / PERIOD;
        ((t * rate).cos() * RADIUS, (t * rate).sin() * RADIUS)
    }

    // Mirror of the fragment shader's blend factor.
    fn color_phase(t: f32) -> f32 {
        (t % PERIOD) / PERIOD
    }

    #[test]
    fn orbit_starts_at_half_right() {
        let (x, y) = orbit_offset(0.0);
        assert_eq!(x, 0.5);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn color_is_pure_white_at_start_and_midway_at_half_period() {
        assert_eq!(color_phase(0.0), 0.0);
        assert_eq!(color_phase(2.5), 0.5);
    }

    #[test]
    fn orbit_and_fade_wrap_after_one_period() {
        let (x0, y0) = orbit_offset(0.0);
        let (x5, y5) = orbit_offset(PERIOD);
        assert!((x5 - x0).abs() < 1e-4);
        assert!((y5 - y0).abs() < 1e-4);
        assert!(color_phase(PERIOD) < 1e-6);
    }

    #[test]
    fn shader_sources_encode_the_shared_period() {
        assert!(VERTEX_SHADER_SRC.contains("3.14159 * 2.0 / 5.0"));
        assert!(VERTEX_SHADER_SRC.contains("uniform float time"));
        assert!(FRAGMENT_SHADER_SRC.contains("mod(time, 5.0) / 5.0"));
        assert!(FRAGMENT_SHADER_SRC.contains("mix(first_color, second_color, phase)"));
    }
}
