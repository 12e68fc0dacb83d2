use crate::coords::TileCoord;
use crate::tile::Layer;
use crate::world::TileWorld;

/// Straight horizontal route from `from` to `hub_column` on the same row.
///
/// Every cell from the start up to (but excluding) the hub column must be
/// free of soil. The returned cells are in walking order and end on the hub
/// column; they are exactly where connector pipes get laid.
pub fn plan_path(world: &TileWorld, from: TileCoord, hub_column: i32) -> Option<Vec<TileCoord>> {
    if !world.in_bounds(from) {
        return None;
    }
    let direction = (hub_column - from.x).signum();
    let mut path = Vec::with_capacity((hub_column - from.x).unsigned_abs() as usize + 1);
    let mut x = from.x;
    while x != hub_column {
        let c = TileCoord::new(x, from.y);
        if world.has_tile_at(Layer::Soil, c) {
            return None;
        }
        path.push(c);
        x += direction;
    }
    path.push(TileCoord::new(hub_column, from.y));
    Some(path)
}
