use serde::{Deserialize, Serialize};

use crate::coords::TileCoord;

/// Axis-aligned world-space box, `y` growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Body {
	pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self { x, y, width, height }
	}

	pub fn left(&self) -> f64 {
		self.x
	}
	pub fn right(&self) -> f64 {
		self.x + self.width
	}
	pub fn top(&self) -> f64 {
		self.y
	}
	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}
	pub fn center(&self) -> (f64, f64) {
		(self.x + self.width * 0.5, self.y + self.height * 0.5)
	}
}

/// Something that can absorb processed ore as energy.
pub trait EnergySink {
	/// Adds up to `amount`, capped by the sink's headroom. Returns what was
	/// actually absorbed.
	fn add_energy(&mut self, amount: f64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyPool {
	pub energy: f64,
	pub max_energy: f64,
}

impl EnergyPool {
	pub fn new(energy: f64, max_energy: f64) -> Self {
		Self { energy: energy.min(max_energy).max(0.0), max_energy }
	}

	/// Removes up to `amount`, never going below zero. Returns what was removed.
	pub fn drain(&mut self, amount: f64) -> f64 {
		let drained = amount.max(0.0).min(self.energy);
		self.energy -= drained;
		drained
	}

	pub fn is_empty(&self) -> bool {
		self.energy <= 0.0
	}
}

impl EnergySink for EnergyPool {
	fn add_energy(&mut self, amount: f64) -> f64 {
		let filled = (self.energy + amount.max(0.0)).min(self.max_energy);
		let absorbed = (filled - self.energy).max(0.0);
		self.energy = filled.max(self.energy);
		absorbed
	}
}

/// The player's suit. Scrapes one soil tile at a time by pushing into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
	pub body: Body,
	/// Carried but never spent: hover and vertical thrust are free.
	pub power: EnergyPool,
	pub hover: bool,
	/// Soil tile currently being scraped, for highlighting.
	pub target: Option<TileCoord>,
}

impl Player {
	pub fn new(body: Body, power: EnergyPool) -> Self {
		Self { body, power, hover: false, target: None }
	}
}

impl EnergySink for Player {
	fn add_energy(&mut self, amount: f64) -> f64 {
		self.power.add_energy(amount)
	}
}

/// Autonomous drill. Grinds the band of soil beneath it while grounded and
/// powered, paying energy for every point of damage dealt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drill {
	pub body: Body,
	pub power: EnergyPool,
	/// Tiles under the bit on the last tick, for highlighting.
	pub targets: Vec<TileCoord>,
}

impl Drill {
	pub fn new(body: Body, power: EnergyPool) -> Self {
		Self { body, power, targets: Vec::new() }
	}

	pub fn energy(&self) -> f64 {
		self.power.energy
	}
}

impl EnergySink for Drill {
	fn add_energy(&mut self, amount: f64) -> f64 {
		self.power.add_energy(amount)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lander {
	pub body: Body,
	/// Set once the landing pad pipes have been laid.
	pub pad_built: bool,
}

impl Lander {
	pub fn new(body: Body) -> Self {
		Self { body, pad_built: false }
	}
}
