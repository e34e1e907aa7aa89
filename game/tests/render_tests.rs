use std::time::Duration;

use engine::surface::{FrameBuffer, SurfaceSize};

use bastion::config::UiConfig;
use bastion::cursor::CursorKind;
use bastion::palette::PALETTES;
use bastion::sandbox::SandboxWorld;
use bastion::settings::PlayerSettings;
use bastion::skilltree::SkillTreeStore;
use bastion::{UiCommand, UiLayer};

const W: u32 = 1280;
const H: u32 = 720;

fn render(ui: &UiLayer, world: &SandboxWorld, skills: &SkillTreeStore) -> FrameBuffer {
    let mut fb = FrameBuffer::new(SurfaceSize::new(W, H));
    ui.draw(&mut fb.renderer(), &world.snapshot(), skills);
    fb
}

fn setup(settings: PlayerSettings) -> (UiLayer, SandboxWorld, SkillTreeStore) {
    let config = UiConfig::default();
    (
        UiLayer::new(&config, settings),
        SandboxWorld::new(&config, Default::default()),
        SkillTreeStore::from_defaults(),
    )
}

fn start_run(ui: &mut UiLayer, world: &SandboxWorld, skills: &mut SkillTreeStore) {
    let (x, y) = ui.main_menu().layout().play_button.center();
    assert_eq!(ui.handle_click(x, y, skills), vec![UiCommand::StartRun]);
    ui.update(None, Duration::from_millis(16), &world.snapshot(), skills);
}

#[test]
fn identical_state_renders_identical_frames() {
    let (mut a, world, skills) = setup(PlayerSettings::default());
    let (mut b, _, _) = setup(PlayerSettings::default());
    for ui in [&mut a, &mut b] {
        ui.update(Some((10, 10)), Duration::from_millis(500), &world.snapshot(), &skills);
    }
    assert_eq!(render(&a, &world, &skills).digest(), render(&b, &world, &skills).digest());
}

#[test]
fn main_menu_fills_the_frame_with_the_selected_palette() {
    let mut settings = PlayerSettings::default();
    settings.interface.style_index = 2;
    let (ui, world, skills) = setup(settings);
    let fb = render(&ui, &world, &skills);
    assert!(fb.count_color(PALETTES[2].background) > (W * H / 2) as usize);
    assert_eq!(fb.count_color(PALETTES[0].background), 0);
}

#[test]
fn pausing_dims_the_run_underneath() {
    let (mut ui, world, mut skills) = setup(PlayerSettings::default());
    start_run(&mut ui, &world, &mut skills);
    let live = render(&ui, &world, &skills);

    assert_eq!(ui.handle_escape(), vec![UiCommand::SetPaused(true)]);
    ui.update(None, Duration::from_millis(16), &world.snapshot(), &skills);
    let paused = render(&ui, &world, &skills);

    let hud_corner = (4, 4);
    assert_ne!(
        live.pixel(hud_corner.0, hud_corner.1),
        paused.pixel(hud_corner.0, hud_corner.1)
    );
    assert_ne!(live.digest(), paused.digest());
}

#[test]
fn pixel_cursor_draws_last_and_respects_the_setting() {
    let (mut ui, world, skills) = setup(PlayerSettings::default());
    ui.update(Some((6, 6)), Duration::from_millis(16), &world.snapshot(), &skills);
    assert_eq!(ui.cursor().kind(), CursorKind::Arrow);
    let fb = render(&ui, &world, &skills);
    assert_eq!(fb.pixel(6, 6), Some(ui.palette().cursor_outline));

    let mut settings = PlayerSettings::default();
    settings.interface.pixel_cursor = false;
    let (mut plain, _, _) = setup(settings);
    plain.update(Some((6, 6)), Duration::from_millis(16), &world.snapshot(), &skills);
    let fb = render(&plain, &world, &skills);
    assert_ne!(fb.pixel(6, 6), Some(plain.palette().cursor_outline));
}

#[test]
fn hovering_a_button_switches_to_the_pointer_cursor() {
    let (mut ui, world, skills) = setup(PlayerSettings::default());
    let play = ui.main_menu().layout().play_button.center();
    ui.update(Some(play), Duration::from_millis(16), &world.snapshot(), &skills);
    assert_eq!(ui.cursor().kind(), CursorKind::Pointer);
}

#[test]
fn fps_counter_only_draws_when_enabled() {
    let mut on = PlayerSettings::default();
    on.video.show_fps = true;
    let (mut with_fps, world, skills) = setup(on);
    let (mut without, _, _) = setup(PlayerSettings::default());
    for ui in [&mut with_fps, &mut without] {
        ui.update(None, Duration::from_millis(20), &world.snapshot(), &skills);
    }
    assert_eq!(with_fps.fps(), 50);

    let a = render(&with_fps, &world, &skills);
    let b = render(&without, &world, &skills);
    assert_ne!(a.digest(), b.digest());
}

#[test]
fn every_screen_renders_at_a_tiny_window_without_panicking() {
    let (mut ui, world, mut skills) = setup(PlayerSettings::default());
    ui.resize(40, 30);
    let mut fb = FrameBuffer::new(SurfaceSize::new(40, 30));
    ui.update(Some((20, 15)), Duration::from_millis(16), &world.snapshot(), &skills);
    ui.draw(&mut fb.renderer(), &world.snapshot(), &skills);

    ui.handle_click(20, 15, &mut skills);
    ui.handle_escape();
    ui.update(Some((20, 15)), Duration::from_millis(16), &world.snapshot(), &skills);
    ui.draw(&mut fb.renderer(), &world.snapshot(), &skills);
}
