use anyhow::{ensure, Result};

/// Offsets of the 8 Moore neighbours, row by row.
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Pixel-space rectangle of a single tile, derived from its coordinates and
/// the tile size. Top-left origin, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TileRect {
    /// Strict containment: points on the rectangle edges belong to no tile,
    /// leaving a one-pixel editing gap along the lattice lines.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px > self.left && px < self.right && py > self.top && py < self.bottom
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cell {
    /// Logical on/off state, authoritative for the next generation.
    pub alive: bool,
    /// Rendering intensity in `[0, 1]`; decays while the cell stays dead.
    pub fade: f32,
    /// Scratch neighbour count, only meaningful between the two tick passes.
    live_neighbours: u8,
}

/// Three-valued read of a tile: out-of-bounds is distinct from dead so the
/// rule can treat the border of a non-wrapping grid as empty space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Alive,
    Dead,
    OutOfBounds,
}

/// The Life board: a fixed-size field of cells plus the rule configuration.
///
/// Dimensions and tile size are set at construction and never change; growing
/// or shrinking the board means building a new `Grid`. Cells live in one flat
/// buffer indexed `y + x * height`, reachable only through bounds-checked
/// accessors.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    tile_size: i32,
    wrap: bool,
    fade_effect: bool,
    fade_force: f32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: i32, height: i32, tile_size: i32) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {width}x{height}"
        );
        ensure!(tile_size > 0, "tile size must be positive, got {tile_size}");

        Ok(Self {
            width,
            height,
            tile_size,
            wrap: true,
            fade_effect: true,
            fade_force: 0.1,
            cells: vec![Cell::default(); (width * height) as usize],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Full board extent in pixels.
    pub fn pixel_size(&self) -> (i32, i32) {
        (self.width * self.tile_size, self.height * self.tile_size)
    }

    pub fn is_wrap_enabled(&self) -> bool {
        self.wrap
    }

    pub fn enable_wrap(&mut self, enable: bool) {
        self.wrap = enable;
    }

    pub fn toggle_wrap(&mut self) {
        self.wrap = !self.wrap;
    }

    pub fn is_fade_effect_enabled(&self) -> bool {
        self.fade_effect
    }

    pub fn enable_fade_effect(&mut self, enable: bool) {
        self.fade_effect = enable;
    }

    pub fn toggle_fade_effect(&mut self) {
        self.fade_effect = !self.fade_effect;
    }

    pub fn fade_force(&self) -> f32 {
        self.fade_force
    }

    pub fn set_fade_force(&mut self, fade_force: f32) {
        self.fade_force = fade_force;
    }

    fn offset(&self, x: i32, y: i32) -> usize {
        (y + x * self.height) as usize
    }

    /// Bounds-checked cell access; no wrapping.
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        (x >= 0 && x < self.width && y >= 0 && y < self.height)
            .then(|| &self.cells[self.offset(x, y)])
    }

    /// Iterates every cell with its coordinates, for the render pass.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, &Cell)> + '_ {
        let height = self.height;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i as i32 / height, i as i32 % height, cell))
    }

    /// Pixel rectangle of tile `(x, y)`.
    pub fn rect_of(&self, x: i32, y: i32) -> TileRect {
        let left = x * self.tile_size;
        let top = y * self.tile_size;
        TileRect {
            left,
            top,
            right: left + self.tile_size,
            bottom: top + self.tile_size,
        }
    }

    /// Three-valued tile read. With wrap enabled coordinates are folded onto
    /// the torus with a floor-style modulo, so `x = -1` reads column
    /// `width - 1`; with wrap disabled anything outside the board reads as
    /// `OutOfBounds`.
    pub fn state_at(&self, x: i32, y: i32) -> TileState {
        let (x, y) = if self.wrap {
            (x.rem_euclid(self.width), y.rem_euclid(self.height))
        } else if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return TileState::OutOfBounds;
        } else {
            (x, y)
        };

        if self.cells[self.offset(x, y)].alive {
            TileState::Alive
        } else {
            TileState::Dead
        }
    }

    /// Advances the board one generation.
    ///
    /// Two passes over the whole field: the first counts live neighbours of
    /// every cell against the pre-tick state, the second applies B3/S23 from
    /// the stored counts. A count of 2 is a no-write, which keeps a live cell
    /// alive and a dead cell dead. Neighbour counts must never observe a cell
    /// already updated in the same generation, hence the separation.
    pub fn tick(&mut self) {
        for x in 0..self.width {
            for y in 0..self.height {
                let mut live = 0u8;
                for (dx, dy) in NEIGHBOUR_OFFSETS {
                    if self.state_at(x + dx, y + dy) == TileState::Alive {
                        live += 1;
                    }
                }
                let offset = self.offset(x, y);
                self.cells[offset].live_neighbours = live;
            }
        }

        let fade_effect = self.fade_effect;
        let fade_force = self.fade_force;
        for cell in &mut self.cells {
            match cell.live_neighbours {
                2 => {}
                3 => {
                    cell.alive = true;
                    if fade_effect {
                        cell.fade = 1.0;
                    }
                }
                _ => {
                    cell.alive = false;
                    if fade_effect {
                        cell.fade = (cell.fade - fade_force).clamp(0.0, 1.0);
                    }
                }
            }
        }
    }

    /// Kills every cell and zeroes fades and scratch counts in place.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }

    /// Fills the board with random noise, a starting point for editing.
    pub fn randomize(&mut self) {
        for cell in &mut self.cells {
            cell.alive = fastrand::bool();
            cell.fade = if cell.alive { 1.0 } else { 0.0 };
            cell.live_neighbours = 0;
        }
    }

    /// Locates the tile strictly containing the pixel point, if any. Direct
    /// division rather than a field scan; rectangles are uniform and axis
    /// aligned, so only the containing candidate needs the strict edge test.
    pub fn cell_at(&self, px: i32, py: i32) -> Option<(i32, i32)> {
        if px <= 0 || py <= 0 {
            return None;
        }
        let (x, y) = (px / self.tile_size, py / self.tile_size);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.rect_of(x, y).contains(px, py).then_some((x, y))
    }

    /// Sets the tile under the pixel point to `alive`, with fade snapped to
    /// 1 for a live paint and 0 for an erase. Points that hit no tile are
    /// ignored; this is called for every pointer-move while a button is held.
    pub fn paint(&mut self, px: i32, py: i32, alive: bool) {
        if let Some((x, y)) = self.cell_at(px, py) {
            let offset = self.offset(x, y);
            let cell = &mut self.cells[offset];
            cell.alive = alive;
            cell.fade = if alive { 1.0 } else { 0.0 };
        }
    }

    /// Flips the tile under the pixel point, single-click editing mode.
    pub fn toggle(&mut self, px: i32, py: i32) {
        if let Some((x, y)) = self.cell_at(px, py) {
            let offset = self.offset(x, y);
            let cell = &mut self.cells[offset];
            cell.alive = !cell.alive;
            cell.fade = if cell.alive { 1.0 } else { 0.0 };
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn set_alive(grid: &mut Grid, x: i32, y: i32) {
        let t = grid.tile_size();
        grid.paint(x * t + t / 2, y * t + t / 2, true);
    }

    fn alive(grid: &Grid, x: i32, y: i32) -> bool {
        grid.state_at(x, y) == TileState::Alive
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(Grid::new(0, 10, 10).is_err());
        assert!(Grid::new(10, -1, 10).is_err());
        assert!(Grid::new(10, 10, 0).is_err());
        assert!(Grid::new(1, 1, 1).is_ok());
    }

    #[test]
    fn wrap_reads_match_torus() {
        let mut grid = Grid::new(10, 4, 10).unwrap();
        set_alive(&mut grid, 9, 0);

        assert_eq!(TileState::Alive, grid.state_at(9, 0));
        assert_eq!(grid.state_at(9, 0), grid.state_at(-1, 0));
        assert_eq!(TileState::Alive, grid.state_at(19, 0));
        assert_eq!(TileState::Dead, grid.state_at(0, -1));

        grid.enable_wrap(false);
        assert_eq!(TileState::OutOfBounds, grid.state_at(-1, 0));
        assert_eq!(TileState::OutOfBounds, grid.state_at(10, 0));
        assert_eq!(TileState::OutOfBounds, grid.state_at(0, 4));
        assert_eq!(TileState::Alive, grid.state_at(9, 0));
    }

    #[test]
    fn out_of_bounds_never_counts_as_a_neighbour() {
        // A fully live 3x3 board: with wrap every cell sees 8 neighbours and
        // dies, without wrap the corners see only 3 and survive.
        let mut full = Grid::new(3, 3, 10).unwrap();
        for x in 0..3 {
            for y in 0..3 {
                set_alive(&mut full, x, y);
            }
        }

        let mut wrapped = full.clone();
        wrapped.tick();
        assert!((0..3).all(|x| (0..3).all(|y| !alive(&wrapped, x, y))));

        let mut clamped = full;
        clamped.enable_wrap(false);
        clamped.tick();
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert!(alive(&clamped, x, y), "corner ({x},{y}) should survive");
        }
        assert!(!alive(&clamped, 1, 1));
        assert!(!alive(&clamped, 1, 0));
    }

    #[test]
    fn birth_survival_and_death() {
        // An L-triomino completes into the 2x2 block (birth at exactly 3),
        // which is a still life (every live cell keeps 3 neighbours).
        let mut grid = Grid::new(6, 6, 10).unwrap();
        set_alive(&mut grid, 2, 2);
        set_alive(&mut grid, 3, 2);
        set_alive(&mut grid, 2, 3);

        grid.tick();
        let block = [(2, 2), (3, 2), (2, 3), (3, 3)];
        for (x, y) in block {
            assert!(alive(&grid, x, y));
        }

        for _ in 0..5 {
            grid.tick();
            for (x, y) in block {
                assert!(alive(&grid, x, y));
            }
            assert_eq!(4, grid.cells().filter(|(_, _, c)| c.alive).count());
        }
    }

    #[test]
    fn underpopulation_and_two_neighbour_no_write() {
        // A lone pair: each live cell has 1 neighbour and dies; the dead
        // cells diagonal to both have exactly 2 and must stay dead.
        let mut grid = Grid::new(6, 6, 10).unwrap();
        set_alive(&mut grid, 2, 2);
        set_alive(&mut grid, 3, 2);

        assert_eq!(TileState::Dead, grid.state_at(2, 3));
        grid.tick();
        assert_eq!(0, grid.cells().filter(|(_, _, c)| c.alive).count());
    }

    #[test]
    fn overpopulation_kills() {
        // Centre of a plus sign has 4 live neighbours.
        let mut grid = Grid::new(7, 7, 10).unwrap();
        for (x, y) in [(3, 3), (2, 3), (4, 3), (3, 2), (3, 4)] {
            set_alive(&mut grid, x, y);
        }
        grid.tick();
        assert!(!alive(&grid, 3, 3));
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let mut grid = Grid::new(5, 5, 10).unwrap();
        set_alive(&mut grid, 1, 2);
        set_alive(&mut grid, 2, 2);
        set_alive(&mut grid, 3, 2);

        for _ in 0..3 {
            grid.tick();
            for (x, y) in [(2, 1), (2, 2), (2, 3)] {
                assert!(alive(&grid, x, y));
            }
            assert!(!alive(&grid, 1, 2) && !alive(&grid, 3, 2));

            grid.tick();
            for (x, y) in [(1, 2), (2, 2), (3, 2)] {
                assert!(alive(&grid, x, y));
            }
            assert!(!alive(&grid, 2, 1) && !alive(&grid, 2, 3));
        }
    }

    #[test]
    fn fade_decays_monotonically_to_zero() {
        let mut grid = Grid::new(5, 5, 10).unwrap();
        grid.set_fade_force(0.25);
        set_alive(&mut grid, 2, 2);
        assert_eq!(1.0, grid.cell(2, 2).unwrap().fade);

        // The lone cell dies on the first tick and stays dead; the fade
        // steps down by the fade force and bottoms out at exactly zero
        // after ceil(1 / 0.25) generations.
        let mut prev = 1.0f32;
        for expected in [0.75, 0.5, 0.25, 0.0, 0.0] {
            grid.tick();
            let fade = grid.cell(2, 2).unwrap().fade;
            assert_eq!(expected, fade);
            assert!(fade <= prev && fade >= 0.0);
            prev = fade;
        }
    }

    #[test]
    fn fade_untouched_when_effect_disabled() {
        let mut grid = Grid::new(5, 5, 10).unwrap();
        grid.enable_fade_effect(false);
        set_alive(&mut grid, 2, 2);
        grid.tick();
        assert!(!alive(&grid, 2, 2));
        // Paint snapped the fade to 1 and the tick must leave it alone.
        assert_eq!(1.0, grid.cell(2, 2).unwrap().fade);
    }

    #[test]
    fn hit_test_honours_tile_edges() {
        let grid = Grid::new(60, 60, 10).unwrap();
        assert_eq!(Some((0, 0)), grid.cell_at(5, 5));
        assert_eq!(Some((59, 59)), grid.cell_at(595, 595));
        // Lattice lines and the outer border belong to no tile.
        assert_eq!(None, grid.cell_at(10, 5));
        assert_eq!(None, grid.cell_at(5, 20));
        assert_eq!(None, grid.cell_at(0, 0));
        assert_eq!(None, grid.cell_at(600, 600));
        assert_eq!(None, grid.cell_at(-3, 5));
    }

    #[test]
    fn paint_is_idempotent_and_misses_are_no_ops() {
        let mut grid = Grid::new(6, 6, 10).unwrap();
        grid.paint(25, 25, true);
        let once = *grid.cell(2, 2).unwrap();
        grid.paint(25, 25, true);
        assert_eq!(once, *grid.cell(2, 2).unwrap());
        assert!(once.alive);
        assert_eq!(1.0, once.fade);

        grid.paint(25, 25, false);
        let cell = grid.cell(2, 2).unwrap();
        assert!(!cell.alive);
        assert_eq!(0.0, cell.fade);

        let before = grid.clone();
        grid.paint(-50, 9000, true);
        grid.paint(60, 60, true);
        assert_eq!(before.cells, grid.cells);
    }

    #[test]
    fn toggle_flips_state_and_fade() {
        let mut grid = Grid::new(6, 6, 10).unwrap();
        grid.toggle(35, 35);
        assert!(alive(&grid, 3, 3));
        assert_eq!(1.0, grid.cell(3, 3).unwrap().fade);

        grid.toggle(35, 35);
        assert!(!alive(&grid, 3, 3));
        assert_eq!(0.0, grid.cell(3, 3).unwrap().fade);
    }

    #[test]
    fn reset_matches_a_fresh_grid() {
        let mut grid = Grid::new(8, 8, 10).unwrap();
        grid.randomize();
        grid.tick();
        grid.paint(15, 15, true);
        grid.tick();

        grid.reset();
        let fresh = Grid::new(8, 8, 10).unwrap();
        assert_eq!(fresh.cells, grid.cells);
    }

    #[test]
    fn rects_tile_the_board() {
        let grid = Grid::new(4, 3, 10).unwrap();
        assert_eq!(
            TileRect {
                left: 0,
                top: 0,
                right: 10,
                bottom: 10
            },
            grid.rect_of(0, 0)
        );
        assert_eq!(
            TileRect {
                left: 30,
                top: 20,
                right: 40,
                bottom: 30
            },
            grid.rect_of(3, 2)
        );
        assert_eq!((40, 30), grid.pixel_size());
    }
}
