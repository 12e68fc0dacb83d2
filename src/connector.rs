//! Pipe auto-tiling.
//!
//! Each pipe's appearance is a pure function of which orthogonal neighbours
//! are also pipes. Every edit re-resolves the edited cell and its four
//! neighbours, so no pipe ever shows a shape that disagrees with the network.

use crate::coords::TileCoord;
use crate::tile::Layer;
use crate::world::TileWorld;

pub const NORTH: u8 = 1;
pub const EAST: u8 = 2;
pub const SOUTH: u8 = 4;
pub const WEST: u8 = 8;

/// Neighbour bitmask to pipe appearance. Straight runs share index 1
/// (vertical) and 2 (horizontal, also used for isolated pieces).
pub const SHAPE_TABLE: [u32; 16] = [
	2,  // 0: isolated
	1,  // 1: N
	2,  // 2: E
	4,  // 3: N+E
	1,  // 4: S
	2,  // 5: N+S
	6,  // 6: E+S
	11, // 7: N+E+S
	2,  // 8: W
	5,  // 9: N+W
	2,  // 10: E+W
	10, // 11: N+E+W
	7,  // 12: S+W
	9,  // 13: N+S+W
	8,  // 14: E+S+W
	3,  // 15: cross
];

const OFFSETS: [(i32, i32, u8); 4] = [(-1, 0, WEST), (1, 0, EAST), (0, -1, NORTH), (0, 1, SOUTH)];

pub fn shape_for_mask(mask: u8) -> Option<u32> {
	SHAPE_TABLE.get(mask as usize).copied()
}

pub struct ConnectorAutoTiler;

impl ConnectorAutoTiler {
	pub fn neighbor_mask(world: &TileWorld, c: TileCoord) -> u8 {
		OFFSETS
			.iter()
			.filter(|(dx, dy, _)| world.has_tile_at(Layer::Pipe, c.offset(*dx, *dy)))
			.fold(0, |mask, (_, _, bit)| mask | bit)
	}

	/// Re-derives the appearance of the pipe at `c`. Cells without a pipe are
	/// left alone. Returns the resolved appearance.
	pub fn resolve(world: &mut TileWorld, c: TileCoord) -> Option<u32> {
		if !world.has_tile_at(Layer::Pipe, c) {
			return None;
		}
		let mask = Self::neighbor_mask(world, c);
		match shape_for_mask(mask) {
			Some(appearance) => {
				world.place(Layer::Pipe, c, appearance);
				Some(appearance)
			}
			None => {
				debug_assert!(false, "pipe neighbour mask {mask} out of range");
				log::error!("Pipe at ({}, {}) has unmapped neighbour mask {mask}", c.x, c.y);
				world.get_tile(Layer::Pipe, c).map(|t| t.appearance())
			}
		}
	}

	/// Lays a pipe and reshapes it together with its neighbours.
	pub fn insert_connector(world: &mut TileWorld, c: TileCoord, base_appearance: u32) {
		if !world.in_bounds(c) {
			return;
		}
		world.place(Layer::Pipe, c, base_appearance);
		Self::resolve_around(world, c);
	}

	pub fn remove_connector(world: &mut TileWorld, c: TileCoord) -> bool {
		let removed = world.remove(Layer::Pipe, c).is_some();
		if removed {
			Self::resolve_around(world, c);
		}
		removed
	}

	fn resolve_around(world: &mut TileWorld, c: TileCoord) {
		for n in c.neighbors() {
			Self::resolve(world, n);
		}
		Self::resolve(world, c);
	}
}
