use serde::{Deserialize, Serialize};

/// Grid cell address. `y` grows downward, row 0 is the top of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four orthogonal neighbours in west, east, north, south order.
    pub fn neighbors(self) -> [TileCoord; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub min: TileCoord, // inclusive
    pub max: TileCoord, // inclusive
}

impl TileRect {
    pub fn new(min: TileCoord, max: TileCoord) -> Self {
        assert!(min.x <= max.x && min.y <= max.y, "Invalid TileRect bounds");
        Self { min, max }
    }

    /// Rectangle anchored at `(x, y)` spanning `width` x `height` cells.
    /// Returns `None` for an empty span.
    pub fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Self::new(
            TileCoord::new(x, y),
            TileCoord::new(x + width - 1, y + height - 1),
        ))
    }

    /// Row-major iteration, top row first.
    pub fn iter_tiles(&self) -> impl Iterator<Item = TileCoord> {
        let min = self.min;
        let max = self.max;
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| TileCoord { x, y }))
    }
}
