use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::config::SimConfig;
use crate::coords::{TileCoord, TileRect};
use crate::tile::{ORE_APPEARANCE, Tile};
use crate::world::TileWorld;

/// What the seeder placed, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
	pub guaranteed: TileCoord,
	pub scattered: usize,
}

/// One-shot ore generator. Run after cave and soil exist.
pub struct OreSeeder<'a> {
	config: &'a SimConfig,
}

impl<'a> OreSeeder<'a> {
	pub fn new(config: &'a SimConfig) -> Self {
		Self { config }
	}

	pub fn seed<R: Rng + ?Sized>(&self, world: &mut TileWorld, rng: &mut R) -> SeedReport {
		let guaranteed = self.guaranteed_location(rng);
		world.place_tile(guaranteed, self.ore_tile());

		let mut scattered = 0;
		for band in self.scatter_bands(world) {
			scattered += self.scatter(world, band, rng);
		}

		log::info!(
			"Seeded ore: guaranteed at ({}, {}), {} scattered",
			guaranteed.x,
			guaranteed.y,
			scattered
		);
		SeedReport { guaranteed, scattered }
	}

	/// Coin flip between the two bands flanking the hub corridor, then a
	/// uniform column inside the chosen band.
	fn guaranteed_location<R: Rng + ?Sized>(&self, rng: &mut R) -> TileCoord {
		let (lo, hi) = if rng.gen_bool(0.5) {
			self.config.left_ore_columns()
		} else {
			self.config.right_ore_columns()
		};
		TileCoord::new(rng.gen_range(lo..=hi), self.config.ore_row)
	}

	fn scatter_bands(&self, world: &TileWorld) -> Vec<TileRect> {
		let rows = self.config.height - self.config.scatter_start_row;
		[self.config.left_ore_columns(), self.config.right_ore_columns()]
			.into_iter()
			.filter_map(|(lo, hi)| {
				let rect = TileRect::from_origin(lo, self.config.scatter_start_row, hi - lo + 1, rows)?;
				let max_y = rect.max.y.min(world.height() - 1);
				(max_y >= rect.min.y).then(|| TileRect::new(rect.min, TileCoord::new(rect.max.x, max_y)))
			})
			.collect()
	}

	/// Independent weighted draw per cell: ore against empty.
	fn scatter<R: Rng + ?Sized>(&self, world: &mut TileWorld, band: TileRect, rng: &mut R) -> usize {
		let weights = [self.config.empty_weight, self.config.ore_weight];
		let dist = match WeightedIndex::new(weights) {
			Ok(d) => d,
			Err(err) => {
				log::warn!("Skipping ore scatter: {err}");
				return 0;
			}
		};
		let mut placed = 0;
		for c in band.iter_tiles() {
			if dist.sample(rng) == 1 {
				world.place_tile(c, self.ore_tile());
				placed += 1;
			}
		}
		placed
	}

	fn ore_tile(&self) -> Tile {
		Tile::Ore {
			appearance: ORE_APPEARANCE,
			health: self.config.ore_health,
		}
	}
}
