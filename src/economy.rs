use serde::{Deserialize, Serialize};

use crate::agents::EnergySink;
use crate::config::SimConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinerStatus {
    Active,
    Depleted,
}

/// Extraction rig left behind where an ore tile was mined. Holds its own
/// position; the ore tile it came from no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Miner {
    pub id: u32,
    /// World-space center of the former ore tile.
    pub position: (f64, f64),
    pub quantity: f64,
}

impl Miner {
    pub fn status(&self) -> MinerStatus {
        if self.quantity > 0.0 {
            MinerStatus::Active
        } else {
            MinerStatus::Depleted
        }
    }
}

/// Result of one processing step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProcessingReport {
    /// Raw ore offered to the energy sink.
    pub offered: f64,
    /// Portion the sink accepted; the rest went back to raw stock.
    pub absorbed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEconomy {
    pub raw_ore: f64,
    pub win_threshold: f64,
    miners: Vec<Miner>,
    next_miner_id: u32,
    mining_divisor: f64,
    processing_divisor: f64,
    miner_quantity: f64,
}

impl ResourceEconomy {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            raw_ore: 0.0,
            win_threshold: config.win_threshold,
            miners: Vec::new(),
            next_miner_id: 1,
            mining_divisor: config.mining_divisor,
            processing_divisor: config.processing_divisor,
            miner_quantity: config.miner_quantity,
        }
    }

    pub fn miners(&self) -> &[Miner] {
        &self.miners
    }

    pub fn active_miners(&self) -> usize {
        self.miners.iter().filter(|m| m.status() == MinerStatus::Active).count()
    }

    /// Adds a fresh miner at a world position and returns its id.
    pub fn spawn_miner(&mut self, position: (f64, f64)) -> u32 {
        self.spawn_miner_with_quantity(position, self.miner_quantity)
    }

    pub fn spawn_miner_with_quantity(&mut self, position: (f64, f64), quantity: f64) -> u32 {
        let id = self.next_miner_id;
        self.next_miner_id += 1;
        self.miners.push(Miner {
            id,
            position,
            quantity: quantity.max(0.0),
        });
        id
    }

    /// Each active miner extracts `delta_ms / mining_divisor`, clamped to what
    /// it has left. Returns the total added to raw stock.
    pub fn advance_mining(&mut self, delta_ms: f64) -> f64 {
        let rate = delta_ms.max(0.0) / self.mining_divisor;
        let mut mined = 0.0;
        for miner in self.miners.iter_mut().filter(|m| m.status() == MinerStatus::Active) {
            let taken = rate.min(miner.quantity);
            miner.quantity -= taken;
            mined += taken;
        }
        self.raw_ore += mined;
        mined
    }

    /// Converts up to `delta_ms / processing_divisor` raw ore into energy for
    /// `sink`. Whatever the sink cannot hold stays in raw stock.
    pub fn advance_processing(&mut self, delta_ms: f64, sink: &mut dyn EnergySink) -> ProcessingReport {
        let budget = delta_ms.max(0.0) / self.processing_divisor;
        let offered = budget.min(self.raw_ore);
        self.raw_ore -= offered;
        let absorbed = sink.add_energy(offered).clamp(0.0, offered);
        self.raw_ore += offered - absorbed;
        ProcessingReport { offered, absorbed }
    }

    pub fn check_win(&self) -> bool {
        self.raw_ore >= self.win_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::EnergyPool;

    fn economy() -> ResourceEconomy {
        ResourceEconomy::new(&SimConfig::default())
    }

    #[test]
    fn mining_moves_quantity_into_stock() {
        let mut eco = economy();
        eco.spawn_miner((0.0, 0.0));
        assert_eq!(eco.advance_mining(5000.0), 100.0);
        assert_eq!(eco.miners()[0].quantity, 50.0);
        assert_eq!(eco.raw_ore, 100.0);
    }

    #[test]
    fn depleted_miners_stop_contributing() {
        let mut eco = economy();
        eco.spawn_miner_with_quantity((0.0, 0.0), 10.0);
        eco.spawn_miner((24.0, 0.0));
        assert_eq!(eco.advance_mining(1000.0), 30.0);
        assert_eq!(eco.miners()[0].status(), MinerStatus::Depleted);
        assert_eq!(eco.miners()[0].quantity, 0.0);
        assert_eq!(eco.active_miners(), 1);

        assert_eq!(eco.advance_mining(1000.0), 20.0);
        assert_eq!(eco.miners()[0].quantity, 0.0);
        assert_eq!(eco.miners().len(), 2);
    }

    #[test]
    fn miner_ids_are_unique() {
        let mut eco = economy();
        let a = eco.spawn_miner((0.0, 0.0));
        let b = eco.spawn_miner((0.0, 0.0));
        assert_ne!(a, b);
    }

    #[test]
    fn processing_feeds_sink_until_full() {
        let mut eco = economy();
        eco.raw_ore = 50.0;
        let mut pool = EnergyPool::new(95.0, 100.0);
        let report = eco.advance_processing(1000.0, &mut pool);
        assert_eq!(report.offered, 10.0);
        assert_eq!(report.absorbed, 5.0);
        assert_eq!(pool.energy, 100.0);
        assert_eq!(eco.raw_ore, 45.0);
    }

    #[test]
    fn processing_is_limited_by_stock() {
        let mut eco = economy();
        eco.raw_ore = 2.0;
        let mut pool = EnergyPool::new(0.0, 100.0);
        let report = eco.advance_processing(1000.0, &mut pool);
        assert_eq!(report.absorbed, 2.0);
        assert_eq!(eco.raw_ore, 0.0);
    }

    #[test]
    fn full_sink_leaves_stock_untouched() {
        let mut eco = economy();
        eco.raw_ore = 30.0;
        let mut pool = EnergyPool::new(100.0, 100.0);
        eco.advance_processing(1000.0, &mut pool);
        assert_eq!(eco.raw_ore, 30.0);
    }

    #[test]
    fn win_threshold_is_inclusive() {
        let mut eco = economy();
        eco.raw_ore = 999.5;
        assert!(!eco.check_win());
        eco.raw_ore = 1000.0;
        assert!(eco.check_win());
    }
}
