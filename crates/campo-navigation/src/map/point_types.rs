/// Represents a point in grid coordinates (cell indices).
///
/// Indices are signed: cell indexing performs no bounds checking, so points
/// outside the grid produce negative or oversized indices that callers clip
/// afterwards.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    /// The x-coordinate (column index) in the grid.
    pub x: i32,
    /// The y-coordinate (row index) in the grid.
    pub y: i32,
}

impl GridPoint {
    /// Creates a new `GridPoint`.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Represents a point in world coordinates (meters).
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    /// The x-coordinate in meters.
    pub x: f64,
    /// The y-coordinate in meters.
    pub y: f64,
}

impl WorldPoint {
    /// Creates a new `WorldPoint`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
