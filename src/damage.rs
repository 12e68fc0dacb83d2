use crate::agents::{Drill, Player};
use crate::config::SimConfig;
use crate::coords::TileCoord;
use crate::tile::{Layer, SOIL_BODY_APPEARANCE};
use crate::world::TileWorld;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
	/// Health actually taken off the tile.
	pub dealt: f64,
	/// The tile hit zero and left the grid this call.
	pub removed: bool,
}

/// Time-scaled wear on soil from player and drill contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainDamageModel {
	damage_divisor: f64,
	drain_divisor: f64,
	probe: f64,
}

impl TerrainDamageModel {
	pub fn new(config: &SimConfig) -> Self {
		Self {
			damage_divisor: config.damage_divisor,
			drain_divisor: config.drill_drain_divisor,
			probe: config.contact_probe,
		}
	}

	/// Wears down the soil tile at `c` by `delta_ms / damage_divisor`, never
	/// below zero. A tile reaching zero is removed in the same call. Cells
	/// without soil are untouched.
	pub fn apply_contact_damage(&self, world: &mut TileWorld, c: TileCoord, delta_ms: f64) -> DamageOutcome {
		let Some(health) = world.get_tile_mut(Layer::Soil, c).and_then(|t| t.health_mut()) else {
			return DamageOutcome::default();
		};
		let dealt = (delta_ms.max(0.0) / self.damage_divisor).min(*health);
		*health -= dealt;
		let removed = *health <= 0.0;
		if removed {
			world.remove(Layer::Soil, c);
			log::debug!("Soil at ({}, {}) destroyed", c.x, c.y);
		}
		DamageOutcome { dealt, removed }
	}

	/// Player pushing sideways into soil scrapes the tile just past the
	/// blocked edge, level with the top of the body. Only body soil wears
	/// down; surface soil is still targeted but takes no damage.
	pub fn scrape(
		&self,
		world: &mut TileWorld,
		player: &mut Player,
		blocked_left: bool,
		blocked_right: bool,
		delta_ms: f64,
	) -> Option<DamageOutcome> {
		let body = player.body;
		let probe_x = if blocked_left {
			body.left() - self.probe
		} else if blocked_right {
			body.right() + self.probe
		} else {
			return None;
		};
		let (c, tile) = world.tile_at_world_position(probe_x, body.top() + self.probe, Some(Layer::Soil))?;
		player.target = Some(c);
		if tile.appearance() != SOIL_BODY_APPEARANCE {
			return Some(DamageOutcome::default());
		}
		let outcome = self.apply_contact_damage(world, c, delta_ms);
		if outcome.removed {
			player.target = None;
		}
		Some(outcome)
	}

	/// Grinds every soil tile in the band under the drill bit: one tile wide,
	/// half a tile deep, centered on the drill. Each point of damage costs
	/// `1 / drain_divisor` energy and grinding stops once the drill is empty.
	/// Returns the cells whose soil was destroyed.
	pub fn grind(&self, world: &mut TileWorld, drill: &mut Drill, grounded: bool, delta_ms: f64) -> Vec<TileCoord> {
		drill.targets.clear();
		if !grounded || drill.power.is_empty() {
			return Vec::new();
		}
		let tile = world.tile_size();
		let (center_x, _) = drill.body.center();
		let footprint = world.coords_within_world_rect(center_x - tile * 0.5, drill.body.bottom(), tile, tile * 0.5);

		let mut destroyed = Vec::new();
		for c in footprint {
			if !world.has_tile_at(Layer::Soil, c) {
				continue;
			}
			if drill.power.is_empty() {
				break;
			}
			drill.targets.push(c);
			let outcome = self.apply_contact_damage(world, c, delta_ms);
			drill.power.drain(outcome.dealt / self.drain_divisor);
			if outcome.removed {
				destroyed.push(c);
			}
		}
		destroyed
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::agents::{Body, EnergyPool};
	use crate::tile::Tile;

	fn model() -> TerrainDamageModel {
		TerrainDamageModel::new(&SimConfig::default())
	}

	fn soil_world() -> TileWorld {
		let mut w = TileWorld::new(8, 8, 24.0);
		for y in 4..8 {
			for x in 0..8 {
				w.place_tile(TileCoord::new(x, y), Tile::Soil { appearance: 2, health: 100.0 });
			}
		}
		w
	}

	#[test]
	fn two_half_second_contacts_destroy_a_tile() {
		let mut w = soil_world();
		let c = TileCoord::new(3, 5);
		let first = model().apply_contact_damage(&mut w, c, 500.0);
		assert_eq!(first, DamageOutcome { dealt: 50.0, removed: false });
		assert_eq!(w.get_tile(Layer::Soil, c).unwrap().health(), Some(50.0));
		let second = model().apply_contact_damage(&mut w, c, 500.0);
		assert!(second.removed);
		assert!(!w.has_tile_at(Layer::Soil, c));
	}

	#[test]
	fn overkill_is_clamped_to_remaining_health() {
		let mut w = soil_world();
		let c = TileCoord::new(0, 4);
		w.place_tile(c, Tile::Soil { appearance: 2, health: 3.0 });
		let out = model().apply_contact_damage(&mut w, c, 10_000.0);
		assert_eq!(out.dealt, 3.0);
		assert!(out.removed);
	}

	#[test]
	fn ore_and_empty_cells_are_immune() {
		let mut w = TileWorld::new(4, 4, 24.0);
		let c = TileCoord::new(1, 1);
		w.place(Layer::Ore, c, 4);
		assert_eq!(model().apply_contact_damage(&mut w, c, 5000.0), DamageOutcome::default());
		assert!(w.has_tile_at(Layer::Ore, c));
		assert_eq!(model().apply_contact_damage(&mut w, TileCoord::new(9, 9), 5000.0), DamageOutcome::default());
	}

	#[test]
	fn scrape_targets_tile_past_the_blocked_side() {
		let mut w = soil_world();
		// Body spans x 48..64, y 96..120: row 4, touching column 1 on its left.
		let mut player = Player::new(Body::new(48.0, 96.0, 16.0, 24.0), EnergyPool::new(100.0, 100.0));
		let out = model().scrape(&mut w, &mut player, true, false, 100.0).unwrap();
		assert_eq!(out.dealt, 10.0);
		assert_eq!(player.target, Some(TileCoord::new(1, 4)));

		let out = model().scrape(&mut w, &mut player, false, true, 100.0).unwrap();
		assert_eq!(out.dealt, 10.0);
		assert_eq!(player.target, Some(TileCoord::new(2, 4)));

		assert!(model().scrape(&mut w, &mut player, false, false, 100.0).is_none());
	}

	#[test]
	fn scrape_clears_target_on_removal() {
		let mut w = soil_world();
		let mut player = Player::new(Body::new(48.0, 96.0, 16.0, 24.0), EnergyPool::new(100.0, 100.0));
		let out = model().scrape(&mut w, &mut player, true, false, 1000.0).unwrap();
		assert!(out.removed);
		assert_eq!(player.target, None);
		assert!(!w.has_tile_at(Layer::Soil, TileCoord::new(1, 4)));
	}

	#[test]
	fn scrape_leaves_surface_soil_intact() {
		let mut w = soil_world();
		let c = TileCoord::new(1, 4);
		w.place_tile(c, Tile::Soil { appearance: crate::tile::SOIL_SURFACE_APPEARANCE, health: 100.0 });
		let mut player = Player::new(Body::new(48.0, 96.0, 16.0, 24.0), EnergyPool::new(100.0, 100.0));
		let out = model().scrape(&mut w, &mut player, true, false, 1000.0).unwrap();
		assert_eq!(out, DamageOutcome::default());
		assert_eq!(player.target, Some(c));
		assert_eq!(w.get_tile(Layer::Soil, c).unwrap().health(), Some(100.0));
	}

	#[test]
	fn grind_damages_band_and_drains_energy() {
		let mut w = soil_world();
		// Centered on column 3, resting on row 4.
		let mut drill = Drill::new(Body::new(72.0, 72.0, 24.0, 24.0), EnergyPool::new(100.0, 100.0));
		let destroyed = model().grind(&mut w, &mut drill, true, 160.0);
		assert!(destroyed.is_empty());
		assert_eq!(drill.targets, vec![TileCoord::new(3, 4)]);
		assert_eq!(w.get_tile(Layer::Soil, TileCoord::new(3, 4)).unwrap().health(), Some(84.0));
		assert_eq!(drill.energy(), 98.0);
	}

	#[test]
	fn grind_destroys_and_reports_cells() {
		let mut w = soil_world();
		// Off-center by half a tile: the band straddles columns 3 and 4.
		let mut drill = Drill::new(Body::new(84.0, 72.0, 24.0, 24.0), EnergyPool::new(100.0, 100.0));
		let destroyed = model().grind(&mut w, &mut drill, true, 1000.0);
		assert_eq!(destroyed, vec![TileCoord::new(3, 4), TileCoord::new(4, 4)]);
		assert_eq!(drill.energy(), 75.0);
	}

	#[test]
	fn grind_needs_ground_and_energy() {
		let mut w = soil_world();
		let mut drill = Drill::new(Body::new(72.0, 72.0, 24.0, 24.0), EnergyPool::new(100.0, 100.0));
		assert!(model().grind(&mut w, &mut drill, false, 1000.0).is_empty());
		assert!(drill.targets.is_empty());

		drill.power.energy = 0.0;
		assert!(model().grind(&mut w, &mut drill, true, 1000.0).is_empty());
		assert_eq!(w.get_tile(Layer::Soil, TileCoord::new(3, 4)).unwrap().health(), Some(100.0));
	}

	#[test]
	fn grind_energy_never_goes_negative() {
		let mut w = soil_world();
		let mut drill = Drill::new(Body::new(84.0, 72.0, 24.0, 24.0), EnergyPool::new(5.0, 100.0));
		model().grind(&mut w, &mut drill, true, 1000.0);
		assert_eq!(drill.energy(), 0.0);
		// First tile drained the pool, so the second was never touched.
		assert_eq!(w.get_tile(Layer::Soil, TileCoord::new(4, 4)).unwrap().health(), Some(100.0));
	}
}
