use crate::config::SimConfig;
use crate::coords::{TileCoord, TileRect};
use crate::tile::{CAVE_APPEARANCE, Layer, SOIL_BODY_APPEARANCE, SOIL_SURFACE_APPEARANCE, Tile};

/// Fixed-size grid with one independent occupancy plane per [`Layer`].
#[derive(Debug, Clone)]
pub struct TileWorld {
    width: i32,
    height: i32,
    tile_size: f64,
    layers: [Vec<Option<Tile>>; 4],
}

impl TileWorld {
    pub fn new(width: i32, height: i32, tile_size: f64) -> Self {
        let size = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width,
            height,
            tile_size,
            layers: std::array::from_fn(|_| vec![None; size]),
        }
    }

    /// Empty grid sized by `config`, then cave and soil laid below the surface.
    /// Ore is added separately by the seeder.
    pub fn with_terrain(config: &SimConfig) -> Self {
        let mut world = Self::new(config.width, config.height, config.tile_size);
        let below_surface = config.height - config.surface_row;
        if let Some(cave) = TileRect::from_origin(0, config.surface_row, config.width, below_surface) {
            world.fill(Layer::Cave, cave, CAVE_APPEARANCE);
        }
        if let Some(surface) = TileRect::from_origin(0, config.surface_row, config.width, 1) {
            world.fill_with(surface, Tile::Soil {
                appearance: SOIL_SURFACE_APPEARANCE,
                health: config.soil_health,
            });
        }
        if let Some(body) = TileRect::from_origin(0, config.surface_row + 1, config.width, below_surface - 1) {
            world.fill_with(body, Tile::Soil {
                appearance: SOIL_BODY_APPEARANCE,
                health: config.soil_health,
            });
        }
        world
    }

    pub fn width(&self) -> i32 {
        self.width
    }
    pub fn height(&self) -> i32 {
        self.height
    }
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn in_bounds(&self, c: TileCoord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    fn index(&self, c: TileCoord) -> Option<usize> {
        if !self.in_bounds(c) {
            return None;
        }
        Some((c.y * self.width + c.x) as usize)
    }

    pub fn has_tile_at(&self, layer: Layer, c: TileCoord) -> bool {
        self.get_tile(layer, c).is_some()
    }

    pub fn get_tile(&self, layer: Layer, c: TileCoord) -> Option<&Tile> {
        let i = self.index(c)?;
        self.layers[layer.index()][i].as_ref()
    }

    pub fn get_tile_mut(&mut self, layer: Layer, c: TileCoord) -> Option<&mut Tile> {
        let i = self.index(c)?;
        self.layers[layer.index()][i].as_mut()
    }

    /// Grid cell containing a continuous world position, if in bounds.
    pub fn coord_at_world(&self, world_x: f64, world_y: f64) -> Option<TileCoord> {
        let c = TileCoord::new(
            (world_x / self.tile_size).floor() as i32,
            (world_y / self.tile_size).floor() as i32,
        );
        self.in_bounds(c).then_some(c)
    }

    /// Tile under a world position. Without a layer, the topmost occupied
    /// layer wins (soil, ore, pipe, cave).
    pub fn tile_at_world_position(
        &self,
        world_x: f64,
        world_y: f64,
        layer: Option<Layer>,
    ) -> Option<(TileCoord, &Tile)> {
        let c = self.coord_at_world(world_x, world_y)?;
        match layer {
            Some(layer) => self.get_tile(layer, c).map(|t| (c, t)),
            None => Layer::ALL
                .iter()
                .rev()
                .find_map(|&l| self.get_tile(l, c))
                .map(|t| (c, t)),
        }
    }

    /// Cells overlapped by a world-space rectangle, clipped to the grid.
    pub fn coords_within_world_rect(&self, world_x: f64, world_y: f64, w: f64, h: f64) -> Vec<TileCoord> {
        if !(w > 0.0 && h > 0.0) {
            return Vec::new();
        }
        let min_x = ((world_x / self.tile_size).floor() as i32).max(0);
        let min_y = ((world_y / self.tile_size).floor() as i32).max(0);
        // Right and bottom edges are exclusive.
        let max_x = (((world_x + w) / self.tile_size).ceil() as i32 - 1).min(self.width - 1);
        let max_y = (((world_y + h) / self.tile_size).ceil() as i32 - 1).min(self.height - 1);
        if min_x > max_x || min_y > max_y {
            return Vec::new();
        }
        TileRect::new(TileCoord::new(min_x, min_y), TileCoord::new(max_x, max_y))
            .iter_tiles()
            .collect()
    }

    /// Sets the appearance at `c`. An existing tile keeps its health; an empty
    /// cell receives a fresh tile with the layer's defaults.
    pub fn place(&mut self, layer: Layer, c: TileCoord, appearance: u32) {
        if let Some(i) = self.index(c) {
            let slot = &mut self.layers[layer.index()][i];
            if let Some(tile) = slot.as_mut() {
                tile.set_appearance(appearance);
            } else {
                *slot = Some(Tile::fresh(layer, appearance));
            }
        }
    }

    /// Writes `tile` into its own layer, replacing whatever was there.
    pub fn place_tile(&mut self, c: TileCoord, tile: Tile) {
        if let Some(i) = self.index(c) {
            self.layers[tile.layer().index()][i] = Some(tile);
        }
    }

    pub fn remove(&mut self, layer: Layer, c: TileCoord) -> Option<Tile> {
        let i = self.index(c)?;
        self.layers[layer.index()][i].take()
    }

    pub fn fill(&mut self, layer: Layer, rect: TileRect, appearance: u32) {
        for c in rect.iter_tiles() {
            self.place(layer, c, appearance);
        }
    }

    fn fill_with(&mut self, rect: TileRect, tile: Tile) {
        for c in rect.iter_tiles() {
            self.place_tile(c, tile);
        }
    }

    /// Every occupied cell of a layer, row-major.
    pub fn tiles(&self, layer: Layer) -> impl Iterator<Item = (TileCoord, &Tile)> + '_ {
        let width = self.width;
        self.layers[layer.index()]
            .iter()
            .enumerate()
            .filter_map(move |(i, t)| {
                let i = i as i32;
                t.as_ref().map(|t| (TileCoord::new(i % width, i / width), t))
            })
    }

    /// World-space center of a cell.
    pub fn tile_center(&self, c: TileCoord) -> (f64, f64) {
        (
            (c.x as f64 + 0.5) * self.tile_size,
            (c.y as f64 + 0.5) * self.tile_size,
        )
    }
}
