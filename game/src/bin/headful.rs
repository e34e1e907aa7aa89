use std::time::Duration;

use engine::app::{AppConfig, GameApp, InputFrame, KeyPress, run_app};
use engine::graphics::Renderer2d;
use engine::surface::SurfaceSize;
use engine::ui::Rect;

use bastion::config::UiConfig;
use bastion::sandbox::SandboxWorld;
use bastion::settings::SettingsStore;
use bastion::skilltree::SkillTreeStore;
use bastion::widgets::{clip_signed, mix_color};
use bastion::{UiCommand, UiLayer};

const GRID_PX: u32 = 40;
const TOWER_PX: u32 = 24;
const PICK_RADIUS_PX: u32 = 16;

fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

#[derive(Debug, Default, Clone)]
struct HeadfulCli {
    help: bool,
    size: Option<(u32, u32)>,
}

fn print_headful_help() {
    println!(
        r#"Bastion Headful

Usage:
  headful [--size WIDTHxHEIGHT]

Flags:
  --size WxH   Initial window size (defaults to the configured screen size).
  --help, -h   Show this help.

Environment:
  BASTION_UI_CONFIG                UI config JSON.
  BASTION_SETTINGS_PATH            Player settings JSON.
  BASTION_SKILLTREE_PATH           Skill tree definition JSON.
  BASTION_SKILLTREE_PROGRESS_PATH  Skill tree progress JSON.
  BASTION_VSYNC                    Overrides the saved vsync setting.
  RUST_LOG                         Log filter, e.g. `bastion=debug`.
"#
    );
}

fn parse_size(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once(['x', 'X'])?;
    let size = (w.parse().ok()?, h.parse().ok()?);
    (size.0 > 0 && size.1 > 0).then_some(size)
}

fn parse_headful_cli() -> Result<HeadfulCli, String> {
    let mut cli = HeadfulCli::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => cli.help = true,
            "--size" => {
                let value = args.next().ok_or("--size needs a value like 1280x720")?;
                cli.size = Some(parse_size(&value).ok_or(format!("bad --size value `{value}`"))?);
            }
            other => return Err(format!("unknown argument `{other}`")),
        }
    }
    Ok(cli)
}

struct HeadfulApp {
    config: UiConfig,
    ui: UiLayer,
    world: SandboxWorld,
    skills: SkillTreeStore,
    settings_store: SettingsStore,
    size: SurfaceSize,
    exit: bool,
}

impl HeadfulApp {
    fn apply(&mut self, commands: Vec<UiCommand>) {
        for command in commands {
            log::debug!("applying {command:?}");
            match command {
                UiCommand::StartRun => self.world.restart(self.skills.run_mods()),
                UiCommand::EndRun => self.world.set_paused(true),
                UiCommand::StartWave => {
                    self.world.start_wave(self.ui.bus_mut());
                }
                UiCommand::SetSpeed(speed) => self.world.set_speed(speed),
                UiCommand::SetPaused(paused) => self.world.set_paused(paused),
                UiCommand::SelectBuild(_) | UiCommand::ClearBuild => self.world.deselect(self.ui.bus_mut()),
                UiCommand::PlaceBuild { tower, x, y } => {
                    if !self.world.build(&tower, (x, y), self.ui.bus_mut()) {
                        log::debug!("could not build {tower} at {x},{y}");
                    }
                }
                UiCommand::WorldClick { x, y } => match self.world.tower_at(x, y, PICK_RADIUS_PX) {
                    Some(index) => self.world.select(index, self.ui.bus_mut()),
                    None => self.world.deselect(self.ui.bus_mut()),
                },
                UiCommand::Upgrade(path) => {
                    self.world.upgrade(path, self.ui.bus_mut());
                }
                UiCommand::Sell => {
                    self.world.sell(self.ui.bus_mut());
                }
                UiCommand::GrantReward(amount) => self.skills.add_currency(amount),
                UiCommand::Quit => self.exit = true,
                UiCommand::SaveSettings(settings) => {
                    if let Err(err) = self.settings_store.save(&settings) {
                        log::warn!("could not save settings: {err}");
                    }
                }
            }
        }
    }

    /// Pushes settings the world acts on. Cheap to call every frame.
    fn sync_settings(&mut self) {
        self.world
            .set_auto_start(self.ui.settings().gameplay.auto_start_waves);
    }

    fn draw_field(&self, r: &mut dyn Renderer2d) {
        let palette = self.ui.palette();
        r.clear(palette.background);
        let line = mix_color(palette.background, palette.panel_alt, 0.5);
        let (w, h) = (self.size.width, self.size.height);
        for x in (0..w).step_by(GRID_PX as usize) {
            r.fill_rect(Rect::new(x, 0, 1, h), line);
        }
        for y in (self.config.hud_height..h).step_by(GRID_PX as usize) {
            r.fill_rect(Rect::new(0, y, w, 1), line);
        }

        for (id, (x, y)) in self.world.towers() {
            let color = self.config.tower(id).map(|t| t.color).unwrap_or(palette.accent);
            let half = (TOWER_PX / 2) as i32;
            if let Some(rect) = clip_signed(x as i32 - half, y as i32 - half, TOWER_PX, TOWER_PX) {
                r.fill_rect(rect, color);
                r.rect_outline(rect, palette.border);
            }
        }
    }
}

impl GameApp for HeadfulApp {
    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.ui.resize(size.width, size.height);
    }

    fn update(&mut self, input: &InputFrame, dt: Duration) {
        if let Some((x, y)) = input.mouse_pos {
            if input.left_pressed {
                self.ui.press(x, y);
            }
            if input.scroll_y != 0.0 {
                self.ui.scroll(x, y, input.scroll_y);
            }
        }

        for key in &input.keys {
            match key {
                KeyPress::Escape => {
                    let commands = self.ui.handle_escape();
                    self.apply(commands);
                }
                KeyPress::Tab => self.ui.toggle_panel(),
                _ => {}
            }
        }

        if input.left_released {
            if let Some((x, y)) = input.mouse_pos {
                let commands = self.ui.handle_click(x, y, &mut self.skills);
                self.apply(commands);
            }
        }

        self.sync_settings();
        if self.ui.screen().is_playing() {
            self.world.update(dt, self.ui.bus_mut());
        }
        let commands = self.ui.dispatch_events();
        self.apply(commands);

        self.ui
            .update(input.mouse_pos, dt, &self.world.snapshot(), &self.skills);
    }

    fn draw(&mut self, renderer: &mut dyn Renderer2d) {
        if self.ui.screen().shows_run() {
            self.draw_field(renderer);
        }
        self.ui.draw(renderer, &self.world.snapshot(), &self.skills);
    }

    fn should_exit(&self) -> bool {
        self.exit
    }

    fn wants_system_cursor(&self) -> bool {
        !self.ui.settings().interface.pixel_cursor
    }

    fn wants_fullscreen(&self) -> bool {
        self.ui.settings().video.fullscreen
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match parse_headful_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            print_headful_help();
            std::process::exit(2);
        }
    };
    if cli.help {
        print_headful_help();
        return;
    }

    let config = match UiConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::warn!("ui config unusable, using defaults: {err}");
            UiConfig::default()
        }
    };
    let settings_store = SettingsStore::from_env();
    let settings = settings_store.load();
    let skills = SkillTreeStore::load_default();
    let world = SandboxWorld::new(&config, skills.run_mods());

    let size = cli.size.unwrap_or((config.screen_width, config.screen_height));
    let vsync = env_bool("BASTION_VSYNC").unwrap_or(settings.video.vsync);
    log::info!(
        "starting bastion {}x{} (settings at {})",
        size.0,
        size.1,
        settings_store.path().display()
    );

    let app = HeadfulApp {
        ui: UiLayer::new(&config, settings),
        config,
        world,
        skills,
        settings_store,
        size: SurfaceSize::new(size.0, size.1),
        exit: false,
    };
    let app_config = AppConfig {
        title: "Bastion".to_string(),
        size,
        vsync,
    };
    if let Err(err) = run_app(app_config, app) {
        log::error!("bastion exited with error: {err}");
        std::process::exit(1);
    }
}
