use serde::{Deserialize, Serialize};

pub const CAVE_APPEARANCE: u32 = 3;
pub const SOIL_SURFACE_APPEARANCE: u32 = 1;
pub const SOIL_BODY_APPEARANCE: u32 = 2;
pub const ORE_APPEARANCE: u32 = 4;

/// Health a freshly placed soil tile starts with, and the reference point
/// for the damage intensity ramp.
pub const SOIL_HEALTH: f64 = 100.0;
pub const ORE_HEALTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
	Cave,
	Pipe,
	Ore,
	Soil,
}

impl Layer {
	pub const ALL: [Layer; 4] = [Layer::Cave, Layer::Pipe, Layer::Ore, Layer::Soil];

	pub(crate) fn index(self) -> usize {
		match self {
			Layer::Cave => 0,
			Layer::Pipe => 1,
			Layer::Ore => 2,
			Layer::Soil => 3,
		}
	}
}

/// One occupied grid cell. Per-layer state is stored inline, so a pipe can
/// never carry a health value and soil can never lose one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Tile {
	Cave { appearance: u32 },
	Pipe { appearance: u32 },
	Ore { appearance: u32, health: f64 },
	Soil { appearance: u32, health: f64 },
}

impl Tile {
	/// A tile with the layer's initial properties.
	pub fn fresh(layer: Layer, appearance: u32) -> Self {
		match layer {
			Layer::Cave => Tile::Cave { appearance },
			Layer::Pipe => Tile::Pipe { appearance },
			Layer::Ore => Tile::Ore { appearance, health: ORE_HEALTH },
			Layer::Soil => Tile::Soil { appearance, health: SOIL_HEALTH },
		}
	}

	pub fn layer(&self) -> Layer {
		match self {
			Tile::Cave { .. } => Layer::Cave,
			Tile::Pipe { .. } => Layer::Pipe,
			Tile::Ore { .. } => Layer::Ore,
			Tile::Soil { .. } => Layer::Soil,
		}
	}

	pub fn appearance(&self) -> u32 {
		match *self {
			Tile::Cave { appearance }
			| Tile::Pipe { appearance }
			| Tile::Ore { appearance, .. }
			| Tile::Soil { appearance, .. } => appearance,
		}
	}

	pub fn set_appearance(&mut self, index: u32) {
		match self {
			Tile::Cave { appearance }
			| Tile::Pipe { appearance }
			| Tile::Ore { appearance, .. }
			| Tile::Soil { appearance, .. } => *appearance = index,
		}
	}

	pub fn health(&self) -> Option<f64> {
		match *self {
			Tile::Ore { health, .. } | Tile::Soil { health, .. } => Some(health),
			_ => None,
		}
	}

	pub(crate) fn health_mut(&mut self) -> Option<&mut f64> {
		match self {
			Tile::Ore { health, .. } | Tile::Soil { health, .. } => Some(health),
			_ => None,
		}
	}

	/// Only soil wears down from contact. Ore leaves the grid through mining.
	pub fn is_destructible(&self) -> bool {
		matches!(self, Tile::Soil { .. })
	}

	/// Render alpha for damaged tiles, `0.5` at no health up to `1.0` at full.
	pub fn intensity(&self) -> Option<f64> {
		self.health().map(damage_intensity)
	}
}

pub fn damage_intensity(health: f64) -> f64 {
	lerp(0.5, 1.0, health / SOIL_HEALTH)
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
	from + (to - from) * t
}
