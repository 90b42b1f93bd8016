use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Physical properties the water tick and the grid queries read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BlockFlags: u8 {
        /// Occupies its cell completely.
        const SOLID = 1 << 0;
        /// Carries a volume and takes part in the water tick.
        const LIQUID = 1 << 1;
    }
}

impl BlockFlags {
    pub fn is_solid(self) -> bool {
        self.contains(Self::SOLID)
    }

    pub fn is_liquid(self) -> bool {
        self.contains(Self::LIQUID)
    }

    /// Water can rest on top of this block.
    pub fn supports_water(self) -> bool {
        self.is_solid() && !self.is_liquid()
    }
}

impl Default for BlockFlags {
    fn default() -> Self {
        Self::SOLID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support() {
        assert!(BlockFlags::SOLID.supports_water());
        assert!(!BlockFlags::LIQUID.supports_water());
        assert!(!(BlockFlags::SOLID | BlockFlags::LIQUID).supports_water());
        assert!(!BlockFlags::empty().supports_water());
    }
}
