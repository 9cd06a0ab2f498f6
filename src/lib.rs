pub mod camera;
pub mod grid;
pub mod life;
pub mod settings;
pub mod state;

pub mod prelude {
    use bevy::color::Color;

    pub const MAIN_TITLE: &str = "LifeGL-rs";
    pub const PARAMS_FILE: &str = "params.txt";
    pub const SESSION_FILE: &str = "session.txt";

    // Fallbacks when no params file is found.
    pub const DEF_WIDTH: i32 = 60;
    pub const DEF_HEIGHT: i32 = 60;
    pub const DEF_TILE_SIZE: i32 = 10;
    pub const DEF_WRAP: bool = true;
    pub const DEF_FADE_FORCE: f32 = 0.1;
    pub const DEF_VSYNC: bool = false;

    /// Default seconds between generations.
    pub const DEF_DELAY: f64 = 0.03;
    pub const MAX_DELAY: f64 = 0.1;
    pub const DELAY_STEP: f64 = 1.0 / 500.0;
    /// Floor for the fixed-tick timestep; a zero delay still needs a
    /// non-zero schedule interval.
    pub const MIN_TIMESTEP: f64 = 0.001;

    pub const BG_COLOR: Color = Color::srgb(0.0, 0.0, 0.0);
    pub const CELL_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);
    pub const GRID_LINE_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);
}
