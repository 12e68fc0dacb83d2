use rand::{SeedableRng, rngs::StdRng};

use crate::agents::{Body, Drill, EnergyPool, Lander, Player};
use crate::config::{ConfigError, SimConfig};
use crate::connector::ConnectorAutoTiler;
use crate::coords::TileCoord;
use crate::damage::TerrainDamageModel;
use crate::economy::{ProcessingReport, ResourceEconomy};
use crate::path::plan_path;
use crate::seeder::{OreSeeder, SeedReport};
use crate::tile::Layer;
use crate::world::TileWorld;

/// Base appearance for pipes dug by the drill and for the lander pad.
pub const SHAFT_PIPE_APPEARANCE: u32 = 1;
/// Base appearance for pipes laid by construction.
pub const MINER_PIPE_APPEARANCE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerContact {
	pub body: Body,
	pub blocked_left: bool,
	pub blocked_right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrillContact {
	pub body: Body,
	/// Resting on something solid.
	pub grounded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
	pub world_x: f64,
	pub world_y: f64,
	pub pressed: bool,
}

/// Facts from the host for one frame. Absent contacts keep the agent where
/// it was and deal no damage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
	pub delta_ms: f64,
	pub player: Option<PlayerContact>,
	pub drill: Option<DrillContact>,
	pub lander_grounded: bool,
	pub pointer: Option<Pointer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionOutcome {
	Built { miner_id: u32, pipes_laid: usize },
	OutOfReach,
	NoOre,
	NotActivated,
	Blocked,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
	pub soil_destroyed: Vec<TileCoord>,
	pub mined: f64,
	pub processing: ProcessingReport,
	pub construction: Option<ConstructionOutcome>,
	pub won: bool,
}

/// One game session: the grid, the economy and the three agents, advanced
/// in a fixed order once per host frame.
#[derive(Debug)]
pub struct Engine {
	config: SimConfig,
	damage: TerrainDamageModel,
	pub world: TileWorld,
	pub economy: ResourceEconomy,
	pub player: Player,
	pub drill: Drill,
	pub lander: Lander,
	pub seed_report: SeedReport,
	won: bool,
}

impl Engine {
	pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		let mut rng = match config.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		Ok(Self::with_rng(config, &mut rng))
	}

	fn with_rng(config: SimConfig, rng: &mut StdRng) -> Self {
		let mut world = TileWorld::with_terrain(&config);
		let seed_report = OreSeeder::new(&config).seed(&mut world, rng);
		let tile = config.tile_size;

		// Lander and drill drop in over the hub, the player a little to the left.
		let spawn_y = 16.0 * tile;
		let hub_x = config.hub_column as f64 * tile;
		let player = Player::new(
			centered_body(8.0 * tile, spawn_y, tile * 2.0 / 3.0, tile),
			EnergyPool::new(config.player_energy, config.player_max_energy),
		);
		let drill = Drill::new(
			centered_body(hub_x, spawn_y, tile, tile),
			EnergyPool::new(config.drill_energy, config.drill_max_energy),
		);
		let lander = Lander::new(centered_body(hub_x, spawn_y, tile * 2.0, tile * 2.0));

		log::info!(
			"New session: {}x{} grid, win at {} raw ore",
			config.width,
			config.height,
			config.win_threshold
		);
		Self {
			damage: TerrainDamageModel::new(&config),
			economy: ResourceEconomy::new(&config),
			world,
			player,
			drill,
			lander,
			seed_report,
			won: false,
			config,
		}
	}

	/// Throws the whole session away and builds a new one from the same config.
	pub fn reset(&mut self) -> Result<(), ConfigError> {
		*self = Self::new(self.config.clone())?;
		Ok(())
	}

	pub fn config(&self) -> &SimConfig {
		&self.config
	}

	pub fn is_won(&self) -> bool {
		self.won
	}

	// Fixed order per frame:
	// - win check (a won session no longer changes)
	// - contact damage from player and drill
	// - miner yield
	// - ore processing into drill energy
	// - results of host movement (lander pad)
	// - construction
	pub fn tick(&mut self, input: &TickInput) -> TickReport {
		let mut report = TickReport::default();
		if self.won || self.economy.check_win() {
			self.won = true;
			report.won = true;
			return report;
		}
		let delta = input.delta_ms.max(0.0);

		self.player.target = None;
		if let Some(contact) = input.player {
			self.player.body = contact.body;
			self.damage.scrape(
				&mut self.world,
				&mut self.player,
				contact.blocked_left,
				contact.blocked_right,
				delta,
			);
		}
		if let Some(contact) = input.drill {
			self.drill.body = contact.body;
			report.soil_destroyed = self.damage.grind(&mut self.world, &mut self.drill, contact.grounded, delta);
			for &c in &report.soil_destroyed {
				ConnectorAutoTiler::insert_connector(&mut self.world, c, SHAFT_PIPE_APPEARANCE);
			}
		}

		report.mined = self.economy.advance_mining(delta);
		report.processing = self.economy.advance_processing(delta, &mut self.drill);

		if input.lander_grounded {
			self.build_lander_pad();
		}

		if let Some(pointer) = input.pointer {
			let outcome = self.try_construct(&pointer);
			if let ConstructionOutcome::Built { miner_id, pipes_laid } = outcome {
				log::info!("Miner #{miner_id} connected with {pipes_laid} pipes");
			}
			report.construction = Some(outcome);
		}

		if self.economy.check_win() {
			log::info!("Raw ore reached {:.2}: session won", self.economy.raw_ore);
			self.won = true;
		}
		report.won = self.won;
		report
	}

	fn build_lander_pad(&mut self) {
		let row = self.config.lander_pad_row;
		let left = TileCoord::new(self.config.corridor_start, row);
		if self.world.has_tile_at(Layer::Pipe, left) {
			return;
		}
		for x in self.config.corridor_start..=self.config.corridor_end {
			ConnectorAutoTiler::insert_connector(&mut self.world, TileCoord::new(x, row), SHAFT_PIPE_APPEARANCE);
		}
		self.lander.pad_built = true;
	}

	/// Turns the ore tile under the pointer into a miner piped to the hub.
	/// Declined attempts leave the session untouched.
	pub fn try_construct(&mut self, pointer: &Pointer) -> ConstructionOutcome {
		let (px, py) = self.player.body.center();
		let distance = (pointer.world_x - px).hypot(pointer.world_y - py);
		if distance > self.config.interaction_radius {
			return ConstructionOutcome::OutOfReach;
		}
		let Some((ore, _)) = self
			.world
			.tile_at_world_position(pointer.world_x, pointer.world_y, Some(Layer::Ore))
		else {
			return ConstructionOutcome::NoOre;
		};
		if !pointer.pressed {
			return ConstructionOutcome::NotActivated;
		}
		let Some(path) = plan_path(&self.world, ore, self.config.hub_column) else {
			log::debug!("No clear route from ore at ({}, {}) to the hub", ore.x, ore.y);
			return ConstructionOutcome::Blocked;
		};
		for &c in &path {
			ConnectorAutoTiler::insert_connector(&mut self.world, c, MINER_PIPE_APPEARANCE);
		}
		let miner_id = self.economy.spawn_miner(self.world.tile_center(ore));
		self.world.remove(Layer::Ore, ore);
		ConstructionOutcome::Built { miner_id, pipes_laid: path.len() }
	}
}

fn centered_body(cx: f64, cy: f64, width: f64, height: f64) -> Body {
	Body::new(cx - width * 0.5, cy - height * 0.5, width, height)
}
