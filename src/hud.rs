use crate::agents::Drill;
use crate::economy::{MinerStatus, ResourceEconomy};

pub const WIN_BANNER: &str = "Ore quota reached!";

pub fn format_hud(economy: &ResourceEconomy, drill: &Drill) -> String {
	format!(
		"Drill Energy: {:.2} | Raw Ore: {:.2}",
		drill.energy().max(0.0),
		economy.raw_ore
	)
}

pub fn format_miner_panel(economy: &ResourceEconomy) -> Vec<String> {
	let mut out = Vec::new();
	out.push("[Miners]".to_string());
	for m in economy.miners() {
		let status = match m.status() {
			MinerStatus::Active => "Active",
			MinerStatus::Depleted => "Depleted",
		};
		out.push(format!("Miner #{} – {} – {:.1} left", m.id, status, m.quantity));
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::agents::{Body, EnergyPool};
	use crate::config::SimConfig;

	#[test]
	fn hud_format() {
		let mut economy = ResourceEconomy::new(&SimConfig::default());
		economy.raw_ore = 12.5;
		let drill = Drill::new(Body::default(), EnergyPool::new(87.5, 100.0));
		let s = format_hud(&economy, &drill);
		assert_eq!(s, "Drill Energy: 87.50 | Raw Ore: 12.50");
	}

	#[test]
	fn miner_panel_lists_status() {
		let mut economy = ResourceEconomy::new(&SimConfig::default());
		economy.spawn_miner((0.0, 0.0));
		economy.spawn_miner_with_quantity((0.0, 0.0), 0.0);
		let lines = format_miner_panel(&economy);
		assert_eq!(lines[0], "[Miners]");
		assert!(lines[1].contains("Miner #1") && lines[1].contains("Active"));
		assert!(lines[2].contains("Miner #2") && lines[2].contains("Depleted"));
	}
}
