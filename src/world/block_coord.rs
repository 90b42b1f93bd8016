use glam::IVec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Position of a single block in world space, one unit per block.
///
/// Any `i32` triple is valid, negative values included. Offsets that would
/// leave the `i32` range have no neighbor and are reported as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockCoord(pub IVec3);

/// The six face-adjacent directions.
pub const FACE_OFFSETS: [IVec3; 6] = [
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
];

/// Horizontal directions in the order water visits them: +x, -x, +z, -z.
pub const HORIZONTAL_OFFSETS: [IVec3; 4] = [
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
];

impl Serialize for BlockCoord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.0.x, self.0.y, self.0.z).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BlockCoord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (x, y, z) = <(i32, i32, i32)>::deserialize(deserializer)?;
        Ok(BlockCoord::new(x, y, z))
    }
}

impl PartialOrd for BlockCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BlockCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.0.x.cmp(&other.0.x) {
            Ordering::Equal => match self.0.y.cmp(&other.0.y) {
                Ordering::Equal => self.0.z.cmp(&other.0.z),
                ord => ord,
            },
            ord => ord,
        }
    }
}

impl fmt::Display for BlockCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

impl BlockCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(IVec3::new(x, y, z))
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn y(&self) -> i32 {
        self.0.y
    }

    pub fn z(&self) -> i32 {
        self.0.z
    }

    pub fn offset(&self, delta: IVec3) -> Option<Self> {
        Some(Self::new(
            self.0.x.checked_add(delta.x)?,
            self.0.y.checked_add(delta.y)?,
            self.0.z.checked_add(delta.z)?,
        ))
    }

    pub fn below(&self) -> Option<Self> {
        self.offset(IVec3::NEG_Y)
    }

    pub fn above(&self) -> Option<Self> {
        self.offset(IVec3::Y)
    }

    /// Face-adjacent neighbors; fewer than six only at the edge of the `i32` range.
    pub fn face_neighbors(&self) -> impl Iterator<Item = Self> + '_ {
        FACE_OFFSETS.iter().filter_map(move |delta| self.offset(*delta))
    }

    pub fn horizontal_neighbors(&self) -> impl Iterator<Item = Self> + '_ {
        HORIZONTAL_OFFSETS
            .iter()
            .filter_map(move |delta| self.offset(*delta))
    }
}

impl From<IVec3> for BlockCoord {
    fn from(vec: IVec3) -> Self {
        Self(vec)
    }
}

impl From<BlockCoord> for IVec3 {
    fn from(coord: BlockCoord) -> Self {
        coord.0
    }
}

impl From<[i32; 3]> for BlockCoord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(i32, i32, i32)> for BlockCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_neighbors() {
        let coord = BlockCoord::new(-3, 0, 7);
        let neighbors: Vec<_> = coord.face_neighbors().collect();
        assert_eq!(neighbors.len(), 6);
        assert!(neighbors.contains(&BlockCoord::new(-4, 0, 7)));
        assert!(neighbors.contains(&BlockCoord::new(-3, -1, 7)));
        for neighbor in neighbors {
            let delta = (neighbor.0 - coord.0).abs();
            assert_eq!(delta.x + delta.y + delta.z, 1);
        }
    }

    #[test]
    fn test_horizontal_order() {
        let coord = BlockCoord::new(0, 5, 0);
        let neighbors: Vec<_> = coord.horizontal_neighbors().collect();
        assert_eq!(
            neighbors,
            vec![
                BlockCoord::new(1, 5, 0),
                BlockCoord::new(-1, 5, 0),
                BlockCoord::new(0, 5, 1),
                BlockCoord::new(0, 5, -1),
            ]
        );
    }

    #[test]
    fn test_range_edge_has_no_neighbor() {
        let coord = BlockCoord::new(i32::MAX, i32::MIN, 0);
        assert!(coord.offset(IVec3::X).is_none());
        assert!(coord.below().is_none());
        assert_eq!(coord.face_neighbors().count(), 4);
    }

    #[test]
    fn test_ordering() {
        let mut coords = vec![
            BlockCoord::new(1, 0, 0),
            BlockCoord::new(0, 2, 0),
            BlockCoord::new(0, 1, 5),
            BlockCoord::new(0, 1, -5),
        ];
        coords.sort();
        assert_eq!(coords[0], BlockCoord::new(0, 1, -5));
        assert_eq!(coords[3], BlockCoord::new(1, 0, 0));
    }
}
