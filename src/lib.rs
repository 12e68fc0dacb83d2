pub mod agents;
pub mod config;
pub mod connector;
pub mod coords;
pub mod damage;
pub mod economy;
pub mod engine;
pub mod hud;
pub mod path;
pub mod seeder;
pub mod tile;
pub mod world;

// Re-exports for convenience in tests and integration users.
pub use agents::{Body, Drill, EnergyPool, EnergySink, Lander, Player};
pub use config::{ConfigError, SimConfig};
pub use connector::{ConnectorAutoTiler, SHAPE_TABLE};
pub use coords::{TileCoord, TileRect};
pub use damage::{DamageOutcome, TerrainDamageModel};
pub use economy::{Miner, MinerStatus, ProcessingReport, ResourceEconomy};
pub use engine::{ConstructionOutcome, DrillContact, Engine, PlayerContact, Pointer, TickInput, TickReport};
pub use hud::{WIN_BANNER, format_hud, format_miner_panel};
pub use path::plan_path;
pub use seeder::{OreSeeder, SeedReport};
pub use tile::{Layer, Tile};
pub use world::TileWorld;
