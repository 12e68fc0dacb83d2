use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Config parse error: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("Invalid config: {0}")]
	Invalid(String),
}

/// Tuning for one session. Every field has a default matching the reference
/// map, so a JSON document only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
	pub width: i32,
	pub height: i32,
	/// World units per tile edge.
	pub tile_size: f64,

	/// First row of soil and cave. Everything above is open sky.
	pub surface_row: i32,
	/// Row holding the guaranteed ore tile.
	pub ore_row: i32,
	/// First row of the random ore scatter.
	pub scatter_start_row: i32,
	/// Columns kept clear of ore for the lander and drill shaft.
	pub corridor_start: i32,
	pub corridor_end: i32,
	/// Column every miner pipe runs to.
	pub hub_column: i32,
	/// Row the lander pad pipes are laid on.
	pub lander_pad_row: i32,
	pub ore_weight: u32,
	pub empty_weight: u32,

	pub soil_health: f64,
	pub ore_health: f64,

	/// Milliseconds per point of tile damage.
	pub damage_divisor: f64,
	/// Damage points per point of drill energy.
	pub drill_drain_divisor: f64,
	/// Milliseconds per unit mined by one miner.
	pub mining_divisor: f64,
	/// Milliseconds per unit of raw ore processed into energy.
	pub processing_divisor: f64,
	pub miner_quantity: f64,
	pub win_threshold: f64,

	pub drill_energy: f64,
	pub drill_max_energy: f64,
	pub player_energy: f64,
	pub player_max_energy: f64,
	/// Max cursor distance from the player for construction.
	pub interaction_radius: f64,
	/// How far past the player's body edge the scrape probe reaches.
	pub contact_probe: f64,

	/// Fixed seed for reproducible maps. `None` seeds from entropy.
	pub seed: Option<u64>,
}

impl Default for SimConfig {
	fn default() -> Self {
		Self {
			width: 32,
			height: 128,
			tile_size: 24.0,
			surface_row: 28,
			ore_row: 29,
			scatter_start_row: 30,
			corridor_start: 15,
			corridor_end: 16,
			hub_column: 16,
			lander_pad_row: 27,
			ore_weight: 1,
			empty_weight: 40,
			soil_health: 100.0,
			ore_health: 1.0,
			damage_divisor: 10.0,
			drill_drain_divisor: 8.0,
			mining_divisor: 50.0,
			processing_divisor: 100.0,
			miner_quantity: 150.0,
			win_threshold: 1000.0,
			drill_energy: 100.0,
			drill_max_energy: 100.0,
			player_energy: 100.0,
			player_max_energy: 100.0,
			interaction_radius: 128.0,
			contact_probe: 6.0,
			seed: None,
		}
	}
}

impl SimConfig {
	pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
		let config: SimConfig = serde_json::from_str(s)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		let invalid = |msg: String| Err(ConfigError::Invalid(msg));

		if self.width <= 0 || self.height <= 0 {
			return invalid(format!("grid must be non-empty, got {}x{}", self.width, self.height));
		}
		if !(self.tile_size > 0.0) {
			return invalid(format!("tile_size must be positive, got {}", self.tile_size));
		}
		if self.corridor_start < 1 || self.corridor_end < self.corridor_start || self.corridor_end >= self.width - 1 {
			return invalid(format!(
				"hub corridor {}..={} must leave ore columns on both sides of a {}-wide grid",
				self.corridor_start, self.corridor_end, self.width
			));
		}
		if self.hub_column < 0 || self.hub_column >= self.width {
			return invalid(format!("hub_column {} is outside the grid", self.hub_column));
		}
		for (name, row) in [
			("surface_row", self.surface_row),
			("ore_row", self.ore_row),
			("scatter_start_row", self.scatter_start_row),
			("lander_pad_row", self.lander_pad_row),
		] {
			if row < 0 || row >= self.height {
				return invalid(format!("{name} {row} is outside the grid"));
			}
		}
		if self.ore_weight == 0 && self.empty_weight == 0 {
			return invalid("ore_weight and empty_weight cannot both be zero".to_string());
		}
		for (name, divisor) in [
			("damage_divisor", self.damage_divisor),
			("drill_drain_divisor", self.drill_drain_divisor),
			("mining_divisor", self.mining_divisor),
			("processing_divisor", self.processing_divisor),
		] {
			if !(divisor > 0.0) {
				return invalid(format!("{name} must be positive, got {divisor}"));
			}
		}
		if !(self.soil_health > 0.0) || !(self.ore_health > 0.0) {
			return invalid("tile health must be positive".to_string());
		}
		if self.drill_max_energy < 0.0 || self.drill_energy > self.drill_max_energy {
			return invalid(format!(
				"drill energy {} exceeds max {}",
				self.drill_energy, self.drill_max_energy
			));
		}
		if self.player_max_energy < 0.0 || self.player_energy > self.player_max_energy {
			return invalid(format!(
				"player energy {} exceeds max {}",
				self.player_energy, self.player_max_energy
			));
		}
		Ok(())
	}

	/// Ore columns left of the hub corridor.
	pub fn left_ore_columns(&self) -> (i32, i32) {
		(0, self.corridor_start - 1)
	}

	/// Ore columns right of the hub corridor, mirroring the left band's width.
	pub fn right_ore_columns(&self) -> (i32, i32) {
		let band = self.corridor_start;
		let start = self.corridor_end + 1;
		(start, (start + band - 1).min(self.width - 1))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		let c = SimConfig::default();
		assert!(c.validate().is_ok());
		assert_eq!(c.left_ore_columns(), (0, 14));
		assert_eq!(c.right_ore_columns(), (17, 31));
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let c = SimConfig::from_json_str(r#"{ "win_threshold": 50.0, "seed": 7 }"#).unwrap();
		assert_eq!(c.win_threshold, 50.0);
		assert_eq!(c.seed, Some(7));
		assert_eq!(c.width, 32);
		assert_eq!(c.miner_quantity, 150.0);
	}

	#[test]
	fn malformed_json_is_parse_error() {
		let err = SimConfig::from_json_str("{ width: ").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn rejects_zero_divisor() {
		let err = SimConfig::from_json_str(r#"{ "mining_divisor": 0.0 }"#).unwrap_err();
		assert!(matches!(err, ConfigError::Invalid(_)));
		assert!(err.to_string().contains("mining_divisor"));
	}

	#[test]
	fn rejects_corridor_without_ore_columns() {
		let c = SimConfig { corridor_start: 0, ..SimConfig::default() };
		assert!(c.validate().is_err());
		let c = SimConfig { width: 17, ..SimConfig::default() };
		assert!(c.validate().is_err());
	}

	#[test]
	fn right_band_clips_to_narrow_grid() {
		let c = SimConfig { width: 24, ..SimConfig::default() };
		assert!(c.validate().is_ok());
		assert_eq!(c.right_ore_columns(), (17, 23));
	}
}
