use std::time::{Duration, Instant};

use winit::dpi::PhysicalSize;
use winit::event::{
    ElementState, Event, KeyboardInput, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Fullscreen, WindowBuilder};

use crate::error::EngineError;
use crate::graphics::Renderer2d;
use crate::pixels_renderer::PixelsPresenter;
use crate::surface::SurfaceSize;

/// Wheel "lines" per pixel-delta notch on touchpads.
const PIXEL_DELTA_PER_LINE: f32 = 40.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub size: (u32, u32),
    pub vsync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Escape,
    Space,
    Tab,
    Enter,
    Digit(u8),
}

/// Input gathered between two frames.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    /// Last known pointer position; `None` once the pointer left the window.
    pub mouse_pos: Option<(u32, u32)>,
    pub left_down: bool,
    pub left_pressed: bool,
    pub left_released: bool,
    /// Positive when scrolling up / away from the user.
    pub scroll_y: f32,
    pub keys: Vec<KeyPress>,
}

impl InputFrame {
    fn end_frame(&mut self) {
        self.left_pressed = false;
        self.left_released = false;
        self.scroll_y = 0.0;
        self.keys.clear();
    }
}

pub trait GameApp {
    fn resize(&mut self, _size: SurfaceSize) {}

    fn update(&mut self, input: &InputFrame, dt: Duration);

    fn draw(&mut self, renderer: &mut dyn Renderer2d);

    fn should_exit(&self) -> bool {
        false
    }

    /// Whether the OS cursor should stay visible (apps drawing their own cursor return `false`).
    fn wants_system_cursor(&self) -> bool {
        true
    }

    fn wants_fullscreen(&self) -> bool {
        false
    }
}

fn key_press(code: VirtualKeyCode) -> Option<KeyPress> {
    Some(match code {
        VirtualKeyCode::Escape => KeyPress::Escape,
        VirtualKeyCode::Space => KeyPress::Space,
        VirtualKeyCode::Tab => KeyPress::Tab,
        VirtualKeyCode::Return => KeyPress::Enter,
        VirtualKeyCode::Key1 => KeyPress::Digit(1),
        VirtualKeyCode::Key2 => KeyPress::Digit(2),
        VirtualKeyCode::Key3 => KeyPress::Digit(3),
        _ => return None,
    })
}

pub fn run_app<G: GameApp + 'static>(config: AppConfig, mut game: G) -> Result<(), EngineError> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(PhysicalSize::new(config.size.0, config.size.1))
        .build(&event_loop)?;

    let mut presenter = PixelsPresenter::new(&window, config.vsync)?;
    game.resize(presenter.size());

    let mut input = InputFrame::default();
    let mut last_frame = Instant::now();
    let mut cursor_visible = true;
    let mut fullscreen = false;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    let size = SurfaceSize::new(size.width, size.height);
                    match presenter.resize(size) {
                        Ok(()) => game.resize(presenter.size()),
                        Err(err) => log::error!("resize failed: {err}"),
                    }
                    window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.mouse_pos =
                        Some((position.x.max(0.0) as u32, position.y.max(0.0) as u32));
                }
                WindowEvent::CursorLeft { .. } => {
                    input.mouse_pos = None;
                }
                WindowEvent::MouseInput {
                    state: mouse_state,
                    button: MouseButton::Left,
                    ..
                } => match mouse_state {
                    ElementState::Pressed => {
                        input.left_down = true;
                        input.left_pressed = true;
                    }
                    ElementState::Released => {
                        input.left_down = false;
                        input.left_released = true;
                    }
                },
                WindowEvent::MouseWheel { delta, .. } => {
                    input.scroll_y += match delta {
                        MouseScrollDelta::LineDelta(_, y) => *y,
                        MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXEL_DELTA_PER_LINE,
                    };
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(code),
                            ..
                        },
                    ..
                } => {
                    if let Some(key) = key_press(*code) {
                        input.keys.push(key);
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                game.update(&input, dt);
                input.end_frame();

                {
                    let mut renderer = presenter.renderer();
                    game.draw(&mut renderer);
                }
                if let Err(err) = presenter.present() {
                    log::error!("present failed: {err}");
                    *control_flow = ControlFlow::Exit;
                }

                let want_cursor = game.wants_system_cursor();
                if want_cursor != cursor_visible {
                    window.set_cursor_visible(want_cursor);
                    cursor_visible = want_cursor;
                }
                let want_fullscreen = game.wants_fullscreen();
                if want_fullscreen != fullscreen {
                    window.set_fullscreen(want_fullscreen.then_some(Fullscreen::Borderless(None)));
                    fullscreen = want_fullscreen;
                }
                if game.should_exit() {
                    log::info!("app requested exit");
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::MainEventsCleared => {
                window.request_redraw();
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}
