use gl::types::GLfloat;

use crate::error::InitError;
use crate::gl_utils::{ShaderProgram, VertexArray, VertexAttribute, VertexBuffer};
use crate::scenes::SceneRenderer;

#[rustfmt::skip]
pub(crate) const VERTEX_DATA: [GLfloat; 12] = [
     0.0,  0.5, 0.0, 1.0,
     0.5, -0.5, 0.0, 1.0,
    -0.5, -0.5, 0.0, 1.0,
];

pub(crate) const VERTEX_SHADER_SRC: &str = r#"#version 330

layout(location = 0) in vec4 position;

void main()
{
    gl_Position = position;
}
"#;

pub(crate) const FRAGMENT_SHADER_SRC: &str = r#"#version 330

out vec4 output_color;

void main()
{
    output_color = vec4(0.78, 0.132, 0.132, 1.0);
}
"#;

/// A single solid-color triangle over a white background.
pub struct StaticTriangle {
    render_context: Option<RenderContext>,
}

struct RenderContext {
    program: ShaderProgram,
    _vao: VertexArray,
    vbo: VertexBuffer,
}

impl StaticTriangle {
    pub fn new() -> Self {
        Self {
            render_context: None,
        }
    }
}

impl Default for StaticTriangle {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer for StaticTriangle {
    fn clear_color(&self) -> (f32, f32, f32, f32) {
        (1.0, 1.0, 1.0, 0.0)
    }

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

        self.render_context = Some(RenderContext {
            program,
            _vao: vao,
            vbo,
        });
        Ok(())
    }

    fn render(&mut self, _width: u32, _height: u32) {
        let ctx = self.render_context.as_ref().unwrap();

        ctx.program.use_program();
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

    #[test]
    fn vertex_data_is_three_vec4_positions() {
        assert_eq!(VERTEX_DATA.len(), 12);
        // Every position is a homogeneous point.
        for vertex in VERTEX_DATA.chunks(4) {
            assert_eq!(vertex[3], 1.0);
        }
    }

    #[test]
    fn shaders_declare_the_expected_interface() {
        assert!(VERTEX_SHADER_SRC.contains("#version 330"));
        assert!(VERTEX_SHADER_SRC.contains("layout(location = 0) in vec4 position"));
        assert!(FRAGMENT_SHADER_SRC.contains("output_color"));
    }
}
