use std::num::NonZeroU32;
use std::rc::Rc;

use fps_counter::FPSCounter;
use gl::COLOR_BUFFER_BIT;
use khronos_egl::ATTRIB_NONE;
use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState},
    delegate_compositor, delegate_output, delegate_registry, delegate_seat, delegate_xdg_shell,
    delegate_xdg_window,
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    seat::{Capability, SeatHandler, SeatState},
    shell::{
        WaylandSurface,
        xdg::{
            XdgShell,
            window::{Window, WindowConfigure, WindowDecorations, WindowHandler},
        },
    },
};
use smithay_client_toolkit::reexports::client::globals::{GlobalList, registry_queue_init};
use smithay_client_toolkit::reexports::client::protocol::{wl_output, wl_seat, wl_surface};
use smithay_client_toolkit::reexports::client::{Connection, EventQueue, Proxy, QueueHandle};
use wayland_egl::WlEglSurface;

use crate::egl::EGLState;
use crate::error::InitError;
use crate::scenes::SceneRenderer;
use crate::viewport::Viewport;

/// Used whenever the compositor does not suggest a window size.
pub const INITIAL_WINDOW_SIZE: (u32, u32) = (640, 480);

/// Owns the Wayland connection, the EGL state and the blocking event loop.
pub struct RenderingContext {
    pub connection: Rc<Connection>,
    pub egl_state: Rc<EGLState>,
    event_queue: EventQueue<WindowState>,
    window_state: WindowState,
}

impl RenderingContext {
    /// Brings up the whole stack: Wayland connection, EGL display/context,
    /// one toplevel window, and the scene's one-time GL initialization with
    /// the context made current.
    pub fn new(title: &str, scene: Box<dyn SceneRenderer>) -> Result<Self, InitError> {
        let connection = Rc::new(
            Connection::connect_to_env()
                .map_err(|e| InitError::subsystem("wayland connection", e))?,
        );
        let egl_state = Rc::new(EGLState::new(connection.clone())?);
        let (globals, event_queue): (GlobalList, EventQueue<WindowState>) =
            registry_queue_init(&connection)
                .map_err(|e| InitError::subsystem("wayland registry", e))?;
        let queue_handle = event_queue.handle();

        let window_state = WindowState::new(
            connection.clone(),
            egl_state.clone(),
            &globals,
            queue_handle,
            title,
            scene,
        )?;

        tracing::info!("Created WL state");

        Ok(Self {
            connection,
            egl_state,
            event_queue,
            window_state,
        })
    }

    /// Blocks until the window is closed. Frame callbacks drive the
    /// rendering; the loop only dispatches events and checks the close flag
    /// once per iteration.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.event_queue.blocking_dispatch(&mut self.window_state)?;

            if self.window_state.window.exit {
                tracing::info!("Window closed, exiting");
                break;
            }
        }
        Ok(())
    }
}

pub struct WindowState {
    pub connection: Rc<Connection>,
    registry_state: RegistryState,
    output_state: OutputState,
    seat_state: SeatState,

    pub(crate) window: DemoWindow,
}

impl WindowState {
    pub fn new(
        connection: Rc<Connection>,
        egl_state: Rc<EGLState>,
        globals: &GlobalList,
        queue_handle: QueueHandle<Self>,
        title: &str,
        mut scene: Box<dyn SceneRenderer>,
    ) -> Result<Self, InitError> {
        let compositor_state = CompositorState::bind(globals, &queue_handle)
            .map_err(|e| InitError::subsystem("wl_compositor", e))?;
        let xdg_shell = XdgShell::bind(globals, &queue_handle)
            .map_err(|e| InitError::subsystem("xdg shell", e))?;

        let surface = compositor_state.create_surface(&queue_handle);
        let window = xdg_shell.create_window(surface, WindowDecorations::RequestServer, &queue_handle);
        window.set_title(title);
        window.set_app_id("triangle_demos");
        window.commit();

        // Block until the wayland server has processed the window setup.
        connection
            .roundtrip()
            .map_err(|e| InitError::subsystem("wayland roundtrip", e))?;

        let (width, height) = INITIAL_WINDOW_SIZE;
        let wl_egl_surface = WlEglSurface::new(window.wl_surface().id(), width as i32, height as i32)
            .map_err(|e| InitError::subsystem("wayland EGL surface", e))?;

        let egl_window_surface = unsafe {
            egl_state.egl.create_platform_window_surface(
                egl_state.egl_display,
                egl_state.config,
                wl_egl_surface.ptr() as khronos_egl::NativeWindowType,
                &[ATTRIB_NONE],
            )
        }
        .map_err(|e| InitError::subsystem("EGL window surface", e))?;

        // One-time GL setup for the scene: compile + link the program and
        // upload the vertex buffer, with the context current.
        egl_state.attach_context(egl_window_surface);
        let init_result = scene.init_render();
        egl_state.detach_context();
        init_result?;

        Ok(Self {
            connection,
            registry_state: RegistryState::new(globals),
            output_state: OutputState::new(globals, &queue_handle),
            seat_state: SeatState::new(globals, &queue_handle),

            window: DemoWindow {
                exit: false,
                first_configure: true,
                width,
                height,
                viewport: Viewport::letterbox(width),
                window,
                egl_state,
                wl_egl_surface,
                egl_window_surface,
                scene,
                fps_counter: FPSCounter::new(),
            },
        })
    }
}

pub struct DemoWindow {
    pub(crate) exit: bool,
    first_configure: bool,
    width: u32,
    height: u32,
    viewport: Viewport,
    pub(crate) window: Window,
    egl_state: Rc<EGLState>,
    wl_egl_surface: WlEglSurface,
    pub(crate) egl_window_surface: khronos_egl::Surface,
    scene: Box<dyn SceneRenderer>,
    fps_counter: FPSCounter,
}

impl DemoWindow {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.wl_egl_surface.resize(width as i32, height as i32, 0, 0);
        // Letterboxing follows the width alone; the surface itself takes the
        // full window size.
        self.viewport = Viewport::letterbox(width);
    }

    pub fn draw(&mut self, qh: &QueueHandle<WindowState>) {
        let width = self.width;
        let height = self.height;

        // Attach the egl context to the window surface
        self.egl_state.attach_context(self.egl_window_surface);

        // Draw to the window:
        {
            self.viewport.apply();

            let (r, g, b, a) = self.scene.clear_color();
            unsafe {
                gl::ClearColor(r, g, b, a);
                gl::Clear(COLOR_BUFFER_BIT);
            }

            self.scene.render(width, height);
        }

        // Damage the entire window and swap buffers
        self.window.wl_surface().damage_buffer(
            0,
            0,
            i32::try_from(width).unwrap(),
            i32::try_from(height).unwrap(),
        );
        self.egl_state
            .egl
            .swap_buffers(self.egl_state.egl_display, self.egl_window_surface)
            .unwrap();

        // Now that buffers are swapped we can reset the egl context
        self.egl_state.detach_context();

        // Request our next frame
        self.window
            .wl_surface()
            .frame(qh, self.window.wl_surface().clone());

        // Commit to present.
        self.window.commit();

        let fps = self.fps_counter.tick();
        tracing::debug!("{fps} FPS");
    }
}

impl Drop for DemoWindow {
    fn drop(&mut self) {
        self.egl_state
            .egl
            .destroy_surface(self.egl_state.egl_display, self.egl_window_surface)
            .expect("Couldn't destroy surface");
    }
}

impl CompositorHandler for WindowState {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_factor: i32,
    ) {
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {
    }

    fn frame(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
        if self.window.window.wl_surface() == surface {
            self.window.draw(qh);
        }
    }

    fn surface_enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }

    fn surface_leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }
}

impl OutputHandler for WindowState {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn update_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn output_destroyed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }
}

impl WindowHandler for WindowState {
    fn request_close(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _window: &Window) {
        self.window.exit = true;
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        _window: &Window,
        configure: WindowConfigure,
        _serial: u32,
    ) {
        tracing::debug!("New size : {:?}", configure.new_size);

        // Size equal to None means the compositor lets us choose.
        let width = configure
            .new_size
            .0
            .map(NonZeroU32::get)
            .unwrap_or(INITIAL_WINDOW_SIZE.0);
        let height = configure
            .new_size
            .1
            .map(NonZeroU32::get)
            .unwrap_or(INITIAL_WINDOW_SIZE.1);

        self.window.resize(width, height);

        // Initiate the first draw.
        if self.window.first_configure {
            self.window.first_configure = false;
            self.window.draw(qh);
        }
    }
}

impl SeatHandler for WindowState {
    fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    fn new_seat(&mut self, _: &Connection, _: &QueueHandle<Self>, _: wl_seat::WlSeat) {}

    fn new_capability(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _seat: wl_seat::WlSeat,
        _capability: Capability,
    ) {
    }

    fn remove_capability(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _seat: wl_seat::WlSeat,
        _capability: Capability,
    ) {
    }

    fn remove_seat(&mut self, _: &Connection, _: &QueueHandle<Self>, _: wl_seat::WlSeat) {}
}

delegate_compositor!(WindowState);
delegate_output!(WindowState);
delegate_seat!(WindowState);
delegate_xdg_shell!(WindowState);
delegate_xdg_window!(WindowState);
delegate_registry!(WindowState);

impl ProvidesRegistryState for WindowState {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }
    registry_handlers![OutputState, SeatState];
}
