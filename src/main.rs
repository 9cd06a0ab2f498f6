use std::path::Path;

use anyhow::Result;
use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
    window::{PresentMode, WindowResolution},
};
use lifegl_bevy::{
    camera::CamPlugin,
    grid::Grid,
    life::{tick_timestep, Board, LifePlugin, SavedSettings, Session},
    prelude::*,
    settings::{SessionSettings, SimParams},
    state::GameState,
};

fn main() -> Result<()> {
    let params = SimParams::load(Path::new(PARAMS_FILE));
    let session = SessionSettings::load(Path::new(SESSION_FILE));

    let mut grid = Grid::new(params.width, params.height, params.tile_size)?;
    grid.enable_wrap(params.wrap);
    grid.set_fade_force(params.fade_force);

    let (res_x, res_y) = grid.pixel_size();
    let present_mode = if session.vsync {
        PresentMode::AutoVsync
    } else {
        PresentMode::AutoNoVsync
    };

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(ImagePlugin::default_nearest())
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: MAIN_TITLE.to_string(),
                        resizable: true,
                        focused: true,
                        present_mode,
                        mode: bevy::window::WindowMode::Windowed,
                        resolution: WindowResolution::new(res_x as f32, res_y as f32),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins((FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin::default()))
        .insert_resource(Time::<Fixed>::from_duration(tick_timestep(session.delay)))
        .insert_resource(Board(grid))
        .insert_resource(Session {
            vsync: session.vsync,
            delay: session.delay,
            show_info: true,
        })
        .insert_resource(SavedSettings { params, session })
        .init_state::<GameState>()
        .add_plugins((CamPlugin, LifePlugin))
        .run();

    Ok(())
}
