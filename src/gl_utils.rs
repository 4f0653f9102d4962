use std::ffi::{CString, c_void};
use std::fmt;
use std::ptr;

use gl::types::{GLchar, GLenum, GLfloat, GLint, GLuint};

use crate::error::InitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    fn gl_enum(self) -> GLenum {
        match self {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderKind::Vertex => f.write_str("vertex"),
            ShaderKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Compiles one shader. A failed compile never leaks a handle: the shader
/// object is deleted and the error carries the full source plus info log.
pub fn compile_shader(kind: ShaderKind, src: &str) -> Result<GLuint, InitError> {
    unsafe {
        let shader = gl::CreateShader(kind.gl_enum());

        let c_str = CString::new(src.as_bytes()).unwrap();
        gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
        gl::CompileShader(shader);

        let mut status = gl::FALSE as GLint;
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

        if status != (gl::TRUE as GLint) {
            let log = shader_info_log(shader);
            gl::DeleteShader(shader);
            return Err(InitError::ShaderCompile {
                kind,
                source: src.to_owned(),
                log,
            });
        }
        Ok(shader)
    }
}

/// Links the compiled shaders into one program. On success every input
/// shader handle is deleted here, and nowhere else: the linked program does
/// not depend on them staying alive.
pub fn link_program(shaders: &[GLuint]) -> Result<GLuint, InitError> {
    unsafe {
        let program = gl::CreateProgram();
        for &shader in shaders {
            gl::AttachShader(program, shader);
        }
        gl::LinkProgram(program);

        let mut status = gl::FALSE as GLint;
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);

        if status != (gl::TRUE as GLint) {
            return Err(InitError::ProgramLink {
                log: program_info_log(program),
            });
        }

        for &shader in shaders {
            gl::DeleteShader(shader);
        }

        Ok(program)
    }
}

unsafe fn shader_info_log(shader: GLuint) -> String {
    unsafe {
        let mut len = 0;
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        let mut buf = vec![0u8; len.max(0) as usize];
        let mut written = 0;
        gl::GetShaderInfoLog(shader, len, &mut written, buf.as_mut_ptr() as *mut GLchar);
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

unsafe fn program_info_log(program: GLuint) -> String {
    unsafe {
        let mut len = 0;
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        let mut buf = vec![0u8; len.max(0) as usize];
        let mut written = 0;
        gl::GetProgramInfoLog(program, len, &mut written, buf.as_mut_ptr() as *mut GLchar);
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// A linked vertex + fragment program, alive for the process lifetime.
pub struct ShaderProgram {
    id: GLuint,
}

impl ShaderProgram {
    pub fn new(vertex_src: &str, fragment_src: &str) -> Result<Self, InitError> {
        let vertex_shader = compile_shader(ShaderKind::Vertex, vertex_src)?;
        let fragment_shader = compile_shader(ShaderKind::Fragment, fragment_src)?;
        let id = link_program(&[vertex_shader, fragment_shader])?;
        Ok(Self { id })
    }

    pub fn uniform_location(&self, name: &str) -> GLint {
        let c_name = CString::new(name).unwrap();
        unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) }
    }

    /// The program must be active.
    pub fn set_uniform_1f(&self, location: GLint, value: f32) {
        unsafe {
            gl::Uniform1f(location, value);
        }
    }

    pub fn use_program(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    pub fn unbind(&self) {
        unsafe {
            gl::UseProgram(0);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            tracing::debug!("Deleting shader program with id: {}", self.id);
            gl::DeleteProgram(self.id);
        }
    }
}

/// One attribute read out of a vertex buffer at a given offset/stride.
pub struct VertexAttribute {
    pub index: u32,
    pub size: i32,
    pub stride: GLint,
    pub offset: usize,
}

/// GPU buffer holding the fixed vertex data, uploaded once with
/// `GL_STATIC_DRAW` and never mutated afterwards.
pub struct VertexBuffer {
    id: GLuint,
    vertex_attributes: Vec<VertexAttribute>,
}

impl VertexBuffer {
    pub fn new(data: &[GLfloat]) -> Self {
        let mut id = 0;
        unsafe {
            gl::GenBuffers(1, &mut id);
        }
        let vbo = Self {
            id,
            vertex_attributes: Vec::new(),
        };

        vbo.bind();
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                size_of_val(data) as isize,
                data.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );
        }
        vbo.unbind();

        vbo
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.id);
        }
    }

    pub fn unbind(&self) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }
    }

    pub fn add_vertex_attribute(&mut self, attribute: VertexAttribute) {
        self.vertex_attributes.push(attribute);
    }

    /// The buffer must be bound.
    pub fn enable_vertex_attributes(&self) {
        for attr in &self.vertex_attributes {
            unsafe {
                gl::EnableVertexAttribArray(attr.index);
                gl::VertexAttribPointer(
                    attr.index,
                    attr.size,
                    gl::FLOAT,
                    gl::FALSE,
                    attr.stride,
                    attr.offset as *const c_void,
                );
            }
        }
    }

    pub fn disable_vertex_attributes(&self) {
        for attr in &self.vertex_attributes {
            unsafe {
                gl::DisableVertexAttribArray(attr.index);
            }
        }
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        unsafe {
            tracing::debug!("Deleting vertex buffer with id: {}", self.id);
            gl::DeleteBuffers(1, &self.id);
        }
    }
}

/// Core profile requires a bound VAO for any draw; one is generated at init
/// and stays bound for the process lifetime.
pub struct VertexArray {
    id: GLuint,
}

impl VertexArray {
    pub fn new() -> Self {
        let mut id = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut id);
        }
        Self { id }
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindVertexArray(self.id);
        }
    }
}

impl Default for VertexArray {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        unsafe {
            tracing::debug!("Deleting vertex array with id: {}", self.id);
            gl::DeleteVertexArrays(1, &self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_kind_maps_to_gl_enums() {
        assert_eq!(ShaderKind::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderKind::Fragment.gl_enum(), gl::FRAGMENT_SHADER);
    }

    #[test]
    fn shader_kind_display_is_lowercase() {
        assert_eq!(ShaderKind::Vertex.to_string(), "vertex");
        assert_eq!(ShaderKind::Fragment.to_string(), "fragment");
    }
}
