use gl::types::GLfloat;

use crate::error::InitError;
use crate::gl_utils::{ShaderProgram, VertexArray, VertexAttribute, VertexBuffer};
use crate::scenes::SceneRenderer;

// Three vec4 positions followed by three vec4 colors in the same buffer;
// the color attribute reads at the byte offset right after the positions.
#[rustfmt::skip]
pub(crate) const VERTEX_DATA: [GLfloat; 24] = [
     0.0,  0.5,   0.0, 1.0,
     0.5, -0.366, 0.0, 1.0,
    -0.5, -0.366, 0.0, 1.0,
     1.0,  0.0,   0.0, 1.0,
     0.0,  1.0,   0.0, 1.0,
     0.0,  0.0,   1.0, 1.0,
];

pub(crate) const COLOR_ATTRIBUTE_OFFSET: usize = 12 * size_of::<GLfloat>();

pub(crate) const VERTEX_SHADER_SRC: &str = r#"#version 330

layout(location = 0) in vec4 position;
layout(location = 1) in vec4 color;

smooth out vec4 frag_color;

void main()
{
    gl_Position = position;
    frag_color = color;
}
"#;

pub(crate) const FRAGMENT_SHADER_SRC: &str = r#"#version 330

smooth in vec4 frag_color;

out vec4 output_color;

void main()
{
    output_color = frag_color;
}
"#;

/// A triangle with red, green and blue vertices interpolated across the face.
pub struct ColoredTriangle {
    render_context: Option<RenderContext>,
}

struct RenderContext {
    program: ShaderProgram,
    _vao: VertexArray,
    vbo: VertexBuffer,
}

impl ColoredTriangle {
    pub fn new() -> Self {
        Self {
            render_context: None,
        }
    }
}

impl Default for ColoredTriangle {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer for ColoredTriangle {
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
        vbo.add_vertex_attribute(VertexAttribute {
            index: 1,
            size: 4,
            stride: 0,
            offset: COLOR_ATTRIBUTE_OFFSET,
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
    fn color_data_starts_at_byte_offset_48() {
        assert_eq!(COLOR_ATTRIBUTE_OFFSET, 48);
    }

    #[test]
    fn color_attribute_reads_the_stored_color_vectors() {
        // Reading three vec4s starting at the color offset must yield the
        // red, green and blue vertex colors, independent of the position
        // attribute's own offset 0.
        let colors = &VERTEX_DATA[COLOR_ATTRIBUTE_OFFSET / size_of::<GLfloat>()..];
        assert_eq!(colors, [
            1.0, 0.0, 0.0, 1.0,
            0.0, 1.0, 0.0, 1.0,
            0.0, 0.0, 1.0, 1.0,
        ]);
    }

    #[test]
    fn buffer_holds_positions_then_colors() {
        assert_eq!(VERTEX_DATA.len(), 24);
        let positions = &VERTEX_DATA[..COLOR_ATTRIBUTE_OFFSET / size_of::<GLfloat>()];
        assert_eq!(positions[0..2], [0.0, 0.5]);
        assert_eq!(positions[4..6], [0.5, -0.366]);
        assert_eq!(positions[8..10], [-0.5, -0.366]);
    }

    #[test]
    fn shaders_pass_color_through() {
        assert!(VERTEX_SHADER_SRC.contains("layout(location = 1) in vec4 color"));
        assert!(VERTEX_SHADER_SRC.contains("frag_color = color"));
        assert!(FRAGMENT_SHADER_SRC.contains("output_color = frag_color"));
    }
}
