use macroquad::prelude::*;
use ::rand::Rng;
use std::collections::VecDeque;

use crate::config::{self, TerrainParams};
use crate::noise_field::{NoiseField, Octaves};

/// Terrain kinds. `Water` is always a lake; `OceanWater` touches the map edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    Grass,
    Sand,
    Water,
    OceanWater,
}

impl Tile {
    pub fn is_water(self) -> bool {
        matches!(self, Tile::Water | Tile::OceanWater)
    }

    pub fn is_land(self) -> bool {
        matches!(self, Tile::Grass | Tile::Sand)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tile::Grass => "grass",
            Tile::Sand => "sand",
            Tile::Water => "water",
            Tile::OceanWater => "ocean",
        }
    }

    /// Render color for this tile.
    pub fn color(self) -> Color {
        match self {
            Tile::Grass => Color::new(0.36, 0.62, 0.27, 1.0),
            Tile::Sand => Color::new(0.87, 0.80, 0.58, 1.0),
            Tile::Water => Color::new(0.29, 0.62, 0.78, 1.0),
            Tile::OceanWater => Color::new(0.10, 0.36, 0.62, 1.0),
        }
    }
}

const NEIGHBORS_4: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Fixed-size tile grid, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    pub tiles: Vec<Tile>,
    pub width: usize,
    pub height: usize,
}

impl TileGrid {
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            tiles: vec![tile; width * height],
            width,
            height,
        }
    }

    pub fn in_bounds(&self, tx: i32, ty: i32) -> bool {
        tx >= 0 && ty >= 0 && (tx as usize) < self.width && (ty as usize) < self.height
    }

    pub fn get(&self, tx: i32, ty: i32) -> Option<Tile> {
        if self.in_bounds(tx, ty) {
            Some(self.tiles[ty as usize * self.width + tx as usize])
        } else {
            None
        }
    }

    pub fn set(&mut self, tx: usize, ty: usize, tile: Tile) {
        if tx < self.width && ty < self.height {
            self.tiles[ty * self.width + tx] = tile;
        }
    }

    /// Tile coordinates containing a pixel position.
    pub fn tile_coords(pos: Vec2) -> (i32, i32) {
        (
            (pos.x / config::TILE_SIZE).floor() as i32,
            (pos.y / config::TILE_SIZE).floor() as i32,
        )
    }

    pub fn tile_at_pixel(&self, pos: Vec2) -> Option<Tile> {
        let (tx, ty) = Self::tile_coords(pos);
        self.get(tx, ty)
    }

    pub fn tile_center(tx: i32, ty: i32) -> Vec2 {
        vec2(
            tx as f32 * config::TILE_SIZE + config::TILE_SIZE * 0.5,
            ty as f32 * config::TILE_SIZE + config::TILE_SIZE * 0.5,
        )
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * config::TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * config::TILE_SIZE
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// True if any 4-neighbor (in bounds) satisfies `pred`.
    pub fn any_neighbor(&self, tx: i32, ty: i32, pred: impl Fn(Tile) -> bool) -> bool {
        NEIGHBORS_4
            .iter()
            .filter_map(|(dx, dy)| self.get(tx + dx, ty + dy))
            .any(pred)
    }

    fn is_boundary(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }
}

/// Pixel distance from `pos` to the nearest land tile center.
/// Zero when already on land; infinite when not starting in water or nothing within the radius.
pub fn distance_to_nearest_land(grid: &TileGrid, pos: Vec2, max_radius: i32) -> f32 {
    let (sx, sy) = TileGrid::tile_coords(pos);
    match grid.get(sx, sy) {
        Some(t) if t.is_land() => return 0.0,
        Some(t) if t.is_water() => {}
        _ => return f32::INFINITY,
    }

    for r in 1..=max_radius {
        for dx in -r..=r {
            for dy in -r..=r {
                if dx.abs() != r && dy.abs() != r {
                    continue;
                }
                if let Some(tile) = grid.get(sx + dx, sy + dy) {
                    if tile.is_land() {
                        return pos.distance(TileGrid::tile_center(sx + dx, sy + dy));
                    }
                }
            }
        }
    }
    f32::INFINITY
}

/// Small decorative grass tuft.
#[derive(Clone, Copy, Debug)]
pub struct GrassPatch {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Output of a generation pass.
#[derive(Clone, Debug)]
pub struct GeneratedTerrain {
    pub grid: TileGrid,
    pub grass_patches: Vec<GrassPatch>,
    pub spawn_tile: (usize, usize),
    /// Player spawn in pixels.
    pub spawn: Vec2,
    /// True when no land existed and the center was forced to grass.
    pub forced_spawn: bool,
}

pub struct TerrainGenerator<'a> {
    pub params: &'a TerrainParams,
    pub noise: &'a NoiseField,
}

impl<'a> TerrainGenerator<'a> {
    pub fn new(params: &'a TerrainParams, noise: &'a NoiseField) -> Self {
        Self { params, noise }
    }

    pub fn generate(&self, width: usize, height: usize, rng: &mut impl Rng) -> GeneratedTerrain {
        let shaped = self.shape_island(width, height);
        let mut grid = smooth_sand_border(&shaped);
        classify_ocean(&mut grid);
        let grass_patches = scatter_grass_patches(&grid, self.params.grass_patches_per_reference, rng);
        let (spawn_tile, forced_spawn) = find_spawn_tile(&mut grid);

        let spawn = vec2(
            spawn_tile.0 as f32 * config::TILE_SIZE + config::TILE_SIZE / 4.0,
            spawn_tile.1 as f32 * config::TILE_SIZE + config::TILE_SIZE / 4.0,
        );

        log::info!(
            "terrain {}x{}: grass {}, sand {}, lakes {}, ocean {}, spawn tile {:?}",
            width,
            height,
            grid.count(Tile::Grass),
            grid.count(Tile::Sand),
            grid.count(Tile::Water),
            grid.count(Tile::OceanWater),
            spawn_tile
        );

        GeneratedTerrain {
            grid,
            grass_patches,
            spawn_tile,
            spawn,
            forced_spawn,
        }
    }

    /// Noise times radial falloff, thresholded into Grass/Sand/Water.
    pub fn shape_island(&self, width: usize, height: usize) -> TileGrid {
        let p = self.params;
        let octaves = Octaves {
            base_scale: p.base_noise_scale,
            count: p.octaves,
            persistence: p.persistence,
            lacunarity: p.lacunarity,
        };
        let center_x = width as f64 / 2.0;
        let center_y = height as f64 / 2.0;
        let max_dist = (center_x * center_x + center_y * center_y).sqrt();
        let falloff_radius = (max_dist * p.island_size_factor).max(f64::EPSILON);

        let mut grid = TileGrid::filled(width, height, Tile::Water);
        for y in 0..height {
            for x in 0..width {
                let noise = self.noise.fbm(x as f64, y as f64, &octaves);
                let dx = x as f64 - center_x;
                let dy = y as f64 - center_y;
                let dist = (dx * dx + dy * dy).sqrt();
                let normalized = (dist / falloff_radius).clamp(0.0, 1.0);
                let falloff = (1.0 - normalized).powf(p.island_falloff_power);

                let mut value = noise * falloff;
                if max_dist > 0.0 && dist / max_dist > p.rim_start {
                    value -= p.rim_penalty;
                }

                let tile = if value > p.sand_threshold {
                    Tile::Grass
                } else if value > p.water_threshold {
                    Tile::Sand
                } else {
                    Tile::Water
                };
                grid.set(x, y, tile);
            }
        }
        grid
    }
}

/// Grass bordering water in `shaped` becomes sand. Neighbors are read from the unsmoothed grid.
pub fn smooth_sand_border(shaped: &TileGrid) -> TileGrid {
    let mut out = shaped.clone();
    for y in 0..shaped.height {
        for x in 0..shaped.width {
            let (tx, ty) = (x as i32, y as i32);
            if shaped.get(tx, ty) == Some(Tile::Grass) && shaped.any_neighbor(tx, ty, Tile::is_water) {
                out.set(x, y, Tile::Sand);
            }
        }
    }
    out
}

/// Multi-source BFS from edge water; everything reached becomes ocean.
pub fn classify_ocean(grid: &mut TileGrid) {
    let mut visited = vec![false; grid.width * grid.height];
    let mut queue = VecDeque::new();

    for y in 0..grid.height {
        for x in 0..grid.width {
            let idx = y * grid.width + x;
            if grid.is_boundary(x, y) && grid.tiles[idx].is_water() {
                visited[idx] = true;
                grid.tiles[idx] = Tile::OceanWater;
                queue.push_back((x as i32, y as i32));
            }
        }
    }

    while let Some((cx, cy)) = queue.pop_front() {
        for (dx, dy) in NEIGHBORS_4 {
            let (nx, ny) = (cx + dx, cy + dy);
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let idx = ny as usize * grid.width + nx as usize;
            if !visited[idx] && grid.tiles[idx].is_water() {
                visited[idx] = true;
                grid.tiles[idx] = Tile::OceanWater;
                queue.push_back((nx, ny));
            }
        }
    }
}

/// Sample random points, keeping those on grass. Count scales with grid area.
pub fn scatter_grass_patches(grid: &TileGrid, per_reference: f32, rng: &mut impl Rng) -> Vec<GrassPatch> {
    if grid.width == 0 || grid.height == 0 {
        return Vec::new();
    }
    let samples = (per_reference * (grid.width * grid.height) as f32 / (25.0 * 28.0)) as usize;
    let base = config::TILE_SIZE / 3.0;
    let mut patches = Vec::new();

    for _ in 0..samples {
        let tx = rng.gen_range(0..grid.width);
        let ty = rng.gen_range(0..grid.height);
        if grid.get(tx as i32, ty as i32) != Some(Tile::Grass) {
            continue;
        }
        let pos = vec2(
            (tx as f32 + rng.gen::<f32>()) * config::TILE_SIZE,
            (ty as f32 + rng.gen::<f32>()) * config::TILE_SIZE,
        );
        let size = vec2(base * (0.5 + rng.gen::<f32>()), base * (0.5 + rng.gen::<f32>()));
        patches.push(GrassPatch { pos, size });
    }
    patches
}

/// Chebyshev ring search from the center for land, then a full scan, then forced grass.
/// Returns the tile and whether the fallback had to force it.
pub fn find_spawn_tile(grid: &mut TileGrid) -> ((usize, usize), bool) {
    let cx = (grid.width / 2) as i32;
    let cy = (grid.height / 2) as i32;
    let max_radius = cx.max(cy);
    let max_x = grid.width as i32 - 1;
    let max_y = grid.height as i32 - 1;

    for r in 0..max_radius {
        for dy in -r..=r {
            for dx in -r..=r {
                if r > 0 && dx.abs() < r && dy.abs() < r {
                    continue;
                }
                let tx = (cx + dx).clamp(0, max_x);
                let ty = (cy + dy).clamp(0, max_y);
                if grid.get(tx, ty).is_some_and(Tile::is_land) {
                    return ((tx as usize, ty as usize), false);
                }
            }
        }
    }

    log::warn!("no land near the center, scanning the whole map for a spawn");
    for y in 0..grid.height {
        for x in 0..grid.width {
            if grid.get(x as i32, y as i32).is_some_and(Tile::is_land) {
                return ((x, y), false);
            }
        }
    }

    log::error!("terrain has no land; forcing tile ({cx}, {cy}) to grass");
    grid.set(cx as usize, cy as usize, Tile::Grass);
    ((cx as usize, cy as usize), true)
}

/// Draw the tile grid and grass tufts.
pub fn draw_terrain(grid: &TileGrid, patches: &[GrassPatch]) {
    for y in 0..grid.height {
        for x in 0..grid.width {
            let tile = grid.tiles[y * grid.width + x];
            draw_rectangle(
                x as f32 * config::TILE_SIZE,
                y as f32 * config::TILE_SIZE,
                config::TILE_SIZE,
                config::TILE_SIZE,
                tile.color(),
            );
        }
    }
    let tuft = Color::new(0.27, 0.52, 0.20, 0.8);
    for patch in patches {
        draw_ellipse(patch.pos.x, patch.pos.y, patch.size.x * 0.5, patch.size.y * 0.5, 0.0, tuft);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generate(seed: u64) -> GeneratedTerrain {
        let params = TerrainParams::default();
        let noise = NoiseField::from_game_seed(seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        TerrainGenerator::new(&params, &noise).generate(
            config::WORLD_WIDTH_TILES,
            config::WORLD_HEIGHT_TILES,
            &mut rng,
        )
    }

    fn grid_from_rows(rows: &[&str]) -> TileGrid {
        let height = rows.len();
        let width = rows[0].len();
        let mut grid = TileGrid::filled(width, height, Tile::Water);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let tile = match ch {
                    'G' => Tile::Grass,
                    'S' => Tile::Sand,
                    'O' => Tile::OceanWater,
                    _ => Tile::Water,
                };
                grid.set(x, y, tile);
            }
        }
        grid
    }

    /// Lake tiles must have no water path to the edge.
    fn lake_reaches_boundary(grid: &TileGrid) -> bool {
        let mut visited = vec![false; grid.width * grid.height];
        let mut queue = VecDeque::new();
        for y in 0..grid.height {
            for x in 0..grid.width {
                if grid.tiles[y * grid.width + x] == Tile::Water {
                    visited[y * grid.width + x] = true;
                    queue.push_back((x as i32, y as i32));
                }
            }
        }
        while let Some((x, y)) = queue.pop_front() {
            if grid.is_boundary(x as usize, y as usize) {
                return true;
            }
            for (dx, dy) in NEIGHBORS_4 {
                let (nx, ny) = (x + dx, y + dy);
                if let Some(t) = grid.get(nx, ny) {
                    let idx = ny as usize * grid.width + nx as usize;
                    if t.is_water() && !visited[idx] {
                        visited[idx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
        false
    }

    #[test]
    fn default_island_has_land_spawn_and_ocean() {
        for seed in [1, 7, 42, 1234] {
            let terrain = generate(seed);
            let (sx, sy) = terrain.spawn_tile;
            let spawn_tile = terrain.grid.get(sx as i32, sy as i32).unwrap();
            assert!(spawn_tile.is_land(), "seed {seed}: spawn on {spawn_tile:?}");
            assert!(terrain.grid.count(Tile::OceanWater) >= 1);
            assert!(!terrain.forced_spawn);
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate(99);
        let b = generate(99);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.spawn_tile, b.spawn_tile);
        assert_eq!(a.grass_patches.len(), b.grass_patches.len());
    }

    #[test]
    fn lakes_never_connect_to_boundary() {
        for seed in 0..20 {
            let terrain = generate(seed);
            assert!(!lake_reaches_boundary(&terrain.grid), "seed {seed}");
            let g = &terrain.grid;
            for y in 0..g.height {
                for x in 0..g.width {
                    if g.is_boundary(x, y) && g.tiles[y * g.width + x].is_water() {
                        assert_eq!(g.tiles[y * g.width + x], Tile::OceanWater);
                    }
                }
            }
        }
    }

    #[test]
    fn grass_never_touches_water() {
        for seed in 0..20 {
            let g = generate(seed).grid;
            for y in 0..g.height as i32 {
                for x in 0..g.width as i32 {
                    if g.get(x, y) == Some(Tile::Grass) {
                        assert!(!g.any_neighbor(x, y, Tile::is_water), "seed {seed} at ({x},{y})");
                    }
                }
            }
        }
    }

    #[test]
    fn enclosed_water_stays_a_lake() {
        let mut grid = grid_from_rows(&[
            "WWWWWWW",
            "WGGGGGW",
            "WGGWGGW",
            "WGGGGGW",
            "WWWWWWW",
        ]);
        classify_ocean(&mut grid);
        assert_eq!(grid.get(3, 2), Some(Tile::Water));
        assert_eq!(grid.get(0, 0), Some(Tile::OceanWater));
        assert_eq!(grid.get(6, 4), Some(Tile::OceanWater));
    }

    #[test]
    fn water_channel_to_edge_becomes_ocean() {
        let mut grid = grid_from_rows(&[
            "GGGWGGG",
            "GGGWGGG",
            "GGWWWGG",
            "GGGGGGG",
        ]);
        classify_ocean(&mut grid);
        assert_eq!(grid.get(3, 2), Some(Tile::OceanWater));
        assert_eq!(grid.get(2, 2), Some(Tile::OceanWater));
        assert_eq!(grid.count(Tile::Water), 0);
    }

    #[test]
    fn sand_border_reads_unsmoothed_grid() {
        let shaped = grid_from_rows(&["GGGW", "GGGG"]);
        let smoothed = smooth_sand_border(&shaped);
        assert_eq!(smoothed.get(2, 0), Some(Tile::Sand));
        assert_eq!(smoothed.get(3, 1), Some(Tile::Sand));
        // (1,0) only touches tiles that were grass before smoothing.
        assert_eq!(smoothed.get(1, 0), Some(Tile::Grass));
    }

    #[test]
    fn all_water_map_forces_center_to_grass() {
        let mut grid = TileGrid::filled(9, 7, Tile::OceanWater);
        let (tile, forced) = find_spawn_tile(&mut grid);
        assert!(forced);
        assert_eq!(tile, (4, 3));
        assert_eq!(grid.get(4, 3), Some(Tile::Grass));
    }

    #[test]
    fn spawn_search_falls_back_to_full_scan() {
        let mut grid = TileGrid::filled(9, 9, Tile::OceanWater);
        grid.set(0, 8, Tile::Sand);
        let (tile, forced) = find_spawn_tile(&mut grid);
        assert!(!forced);
        assert_eq!(tile, (0, 8));
    }

    #[test]
    fn zero_island_size_gives_no_land_but_still_spawns() {
        let params = TerrainParams {
            island_size_factor: 0.0,
            ..TerrainParams::default()
        };
        let noise = NoiseField::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let terrain = TerrainGenerator::new(&params, &noise).generate(20, 12, &mut rng);
        let (sx, sy) = terrain.spawn_tile;
        assert!(terrain.grid.get(sx as i32, sy as i32).unwrap().is_land());
    }

    #[test]
    fn grass_patches_sit_on_grass() {
        let terrain = generate(5);
        assert!(!terrain.grass_patches.is_empty());
        for patch in &terrain.grass_patches {
            assert_eq!(terrain.grid.tile_at_pixel(patch.pos), Some(Tile::Grass));
        }
    }

    #[test]
    fn nearest_land_distance_cases() {
        let mut grid = TileGrid::filled(30, 30, Tile::OceanWater);
        grid.set(10, 10, Tile::Sand);

        let on_land = TileGrid::tile_center(10, 10);
        assert_eq!(distance_to_nearest_land(&grid, on_land, 20), 0.0);

        let three_away = TileGrid::tile_center(13, 10);
        let d = distance_to_nearest_land(&grid, three_away, 20);
        assert!((d - 3.0 * config::TILE_SIZE).abs() < 1e-3);

        let far = TileGrid::tile_center(29, 29);
        assert!(distance_to_nearest_land(&grid, far, 5).is_infinite());

        let outside = vec2(-50.0, -50.0);
        assert!(distance_to_nearest_land(&grid, outside, 20).is_infinite());
    }
}
