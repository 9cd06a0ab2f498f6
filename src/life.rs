#![allow(clippy::type_complexity)]

use std::{path::Path, time::Duration};

use bevy::{
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    math::{vec2, vec3},
    prelude::*,
    time::common_conditions::on_timer,
    window::PrimaryWindow,
};

use crate::{
    grid::Grid,
    prelude::*,
    settings::{SessionSettings, SimParams},
    state::GameState,
};

pub struct LifePlugin;

impl Plugin for LifePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridOverlay>()
            .add_systems(OnEnter(GameState::Load), load_board)
            .add_systems(
                FixedUpdate,
                tick_board.run_if(in_state(GameState::Running)),
            )
            .add_systems(
                Update,
                (
                    (handle_keyboard, handle_mouse, sync_cell_sprites).chain(),
                    draw_grid_overlay,
                    update_title.run_if(on_timer(Duration::from_millis(250))),
                ),
            )
            .add_systems(Last, save_on_exit);
    }
}

// ——> SYSTEMS

/// spawn one sprite per tile, positioned from the grid's derived rectangles
fn load_board(
    mut commands: Commands,
    board: Res<Board>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let tile = board.tile_size() as f32;
    info!(
        "board loaded: {}x{} tiles, {} px each",
        board.width(),
        board.height(),
        board.tile_size()
    );

    for (x, y, _) in board.cells() {
        commands.spawn((
            TilePos { x, y },
            Sprite::from_color(BG_COLOR, Vec2::splat(tile)),
            Transform::from_translation(board.tile_translation(x, y)),
        ));
    }

    next_state.set(GameState::Paused);
}

/// one generation per fixed-schedule interval while running
fn tick_board(mut board: ResMut<Board>) {
    board.tick();
}

/// push grid state into the sprite colors, once per frame
fn sync_cell_sprites(board: Res<Board>, mut sprites: Query<(&TilePos, &mut Sprite)>) {
    let fade_on = board.is_fade_effect_enabled();
    let base = CELL_COLOR.to_srgba();

    for (pos, mut sprite) in sprites.iter_mut() {
        let Some(cell) = board.cell(pos.x, pos.y) else {
            continue;
        };
        sprite.color = if fade_on {
            // intensity follows the fade, exactly like the original
            // glColor3f(r * fade, g * fade, b * fade) tile pass
            Color::srgb(
                base.red * cell.fade,
                base.green * cell.fade,
                base.blue * cell.fade,
            )
        } else if cell.alive {
            CELL_COLOR
        } else {
            BG_COLOR
        };
    }
}

/// left paints, right erases, middle toggles; painting follows the pointer
/// while a button stays held
fn handle_mouse(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mut board: ResMut<Board>,
) {
    let left = buttons.pressed(MouseButton::Left);
    let right = buttons.pressed(MouseButton::Right);
    let middle = buttons.just_pressed(MouseButton::Middle);
    if !left && !right && !middle {
        return;
    }

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, cam_transform)) = camera.get_single() else {
        return;
    };
    let Ok(world) = camera.viewport_to_world_2d(cam_transform, cursor) else {
        return;
    };

    let (px, py) = board.world_to_pixel(world);
    if middle {
        board.toggle(px, py);
    } else {
        board.paint(px, py, left);
    }
}

fn handle_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    mut board: ResMut<Board>,
    mut session: ResMut<Session>,
    mut overlay: ResMut<GridOverlay>,
    mut fixed_time: ResMut<Time<Fixed>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
    }
    if keys.just_pressed(KeyCode::Space) || keys.just_pressed(KeyCode::ShiftLeft) {
        match state.get() {
            GameState::Running => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::Running),
            GameState::Load => {}
        }
    }
    if keys.just_pressed(KeyCode::KeyR) {
        board.reset();
    }
    if keys.just_pressed(KeyCode::KeyN) {
        board.randomize();
    }
    if keys.just_pressed(KeyCode::KeyW) {
        board.toggle_wrap();
    }
    if keys.just_pressed(KeyCode::KeyF) {
        board.toggle_fade_effect();
    }
    if keys.just_pressed(KeyCode::KeyG) {
        overlay.enabled = !overlay.enabled;
    }
    if keys.just_pressed(KeyCode::KeyD) {
        session.show_info = !session.show_info;
    }

    let mut delay = session.delay;
    if keys.just_pressed(KeyCode::KeyS) {
        delay = DEF_DELAY;
    }
    if keys.just_pressed(KeyCode::KeyZ) || keys.just_pressed(KeyCode::Minus) {
        delay += DELAY_STEP;
    }
    if keys.just_pressed(KeyCode::KeyX) || keys.just_pressed(KeyCode::Equal) {
        delay -= DELAY_STEP;
    }
    delay = delay.clamp(0.0, MAX_DELAY);
    if delay != session.delay {
        session.delay = delay;
        fixed_time.set_timestep(tick_timestep(delay));
    }
}

/// white tile lattice over the board, toggled with G
fn draw_grid_overlay(mut gizmos: Gizmos, board: Res<Board>, overlay: Res<GridOverlay>) {
    if !overlay.enabled {
        return;
    }

    let (w, h) = board.pixel_size();
    let half = vec2(w as f32, h as f32) * 0.5;
    let tile = board.tile_size();

    for x in 0..=board.width() {
        let wx = (x * tile) as f32 - half.x;
        gizmos.line_2d(vec2(wx, -half.y), vec2(wx, half.y), GRID_LINE_COLOR);
    }
    for y in 0..=board.height() {
        let wy = (y * tile) as f32 - half.y;
        gizmos.line_2d(vec2(-half.x, wy), vec2(half.x, wy), GRID_LINE_COLOR);
    }
}

/// fill the title bar with FPS, run/wrap status and the tick delay
fn update_title(
    diagnostics: Res<DiagnosticsStore>,
    session: Res<Session>,
    board: Res<Board>,
    state: Res<State<GameState>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.get_single_mut() else {
        return;
    };

    if !session.show_info {
        if window.title != MAIN_TITLE {
            window.title = MAIN_TITLE.to_string();
        }
        return;
    }

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);
    let title = format!(
        "{MAIN_TITLE} FPS:{fps:.1} Run:{} Wrap:{} Delay:{:.3}",
        matches!(state.get(), GameState::Running),
        board.is_wrap_enabled(),
        session.delay,
    );
    if window.title != title {
        window.title = title;
    }
}

/// at clean shutdown, persist whatever drifted from the loaded settings
fn save_on_exit(
    mut exit_events: EventReader<AppExit>,
    board: Res<Board>,
    session: Res<Session>,
    saved: Res<SavedSettings>,
) {
    if exit_events.read().next().is_none() {
        return;
    }

    let params = SimParams {
        width: board.width(),
        height: board.height(),
        tile_size: board.tile_size(),
        wrap: board.is_wrap_enabled(),
        fade_force: board.fade_force(),
    };
    if params != saved.params {
        match params.save(Path::new(PARAMS_FILE)) {
            Ok(()) => info!("saved {PARAMS_FILE}"),
            Err(err) => warn!("failed to save {PARAMS_FILE}: {err:#}"),
        }
    }

    let session_now = SessionSettings {
        vsync: session.vsync,
        delay: session.delay,
    };
    if session_now != saved.session {
        match session_now.save(Path::new(SESSION_FILE)) {
            Ok(()) => info!("saved {SESSION_FILE}"),
            Err(err) => warn!("failed to save {SESSION_FILE}: {err:#}"),
        }
    }
}

/// Fixed-schedule interval for a tick delay in seconds.
pub fn tick_timestep(delay: f64) -> Duration {
    Duration::from_secs_f64(delay.max(MIN_TIMESTEP))
}

// ——> COMPONENTS

/// Grid coordinates of a cell sprite.
#[derive(Component)]
struct TilePos {
    x: i32,
    y: i32,
}

// ——> RESOURCES

/// The Grid Engine, owned by the ECS. Every system that ticks, edits or
/// draws the field goes through this resource, so the scheduler serializes
/// all access: a tick never interleaves with an edit or a render read.
#[derive(Resource, Deref, DerefMut)]
pub struct Board(pub Grid);

impl Board {
    /// World-space position of the centre of tile `(x, y)`; the board is
    /// centred on the origin, grid y grows downwards while world y grows up.
    pub fn tile_translation(&self, x: i32, y: i32) -> Vec3 {
        let (w, h) = self.pixel_size();
        let half = vec2(w as f32, h as f32) * 0.5;
        let rect = self.rect_of(x, y);
        let half_tile = self.tile_size() as f32 * 0.5;
        vec3(
            rect.left as f32 + half_tile - half.x,
            half.y - (rect.top as f32 + half_tile),
            0.0,
        )
    }

    /// World point back into the grid's pixel space (top-left origin).
    pub fn world_to_pixel(&self, world: Vec2) -> (i32, i32) {
        let (w, h) = self.pixel_size();
        let half = vec2(w as f32, h as f32) * 0.5;
        (
            (world.x + half.x).floor() as i32,
            (half.y - world.y).floor() as i32,
        )
    }
}

/// Scheduler/driver state that lives outside the Grid Engine.
#[derive(Resource)]
pub struct Session {
    pub vsync: bool,
    /// Seconds between generations, kept in `[0, MAX_DELAY]`.
    pub delay: f64,
    pub show_info: bool,
}

/// Settings as they were on disk at startup, to skip the exit-time write
/// when nothing changed.
#[derive(Resource)]
pub struct SavedSettings {
    pub params: SimParams,
    pub session: SessionSettings,
}

#[derive(Resource)]
struct GridOverlay {
    enabled: bool,
}

impl Default for GridOverlay {
    fn default() -> Self {
        Self { enabled: true }
    }
}
