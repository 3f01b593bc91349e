//! Prediction mode enumerations shared by the reconstruction kernels.

/// Luma prediction mode for a whole 16x16 macroblock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LumaMode {
    /// Average of the row above and the column to the left.
    #[default]
    DC,
    /// Replicate the row above.
    V,
    /// Replicate the column to the left.
    H,
    /// TrueMotion gradient predictor.
    TM,
    /// Each 4x4 sub-block carries its own [`IntraMode`].
    B,
}

impl LumaMode {
    /// Maps the bitstream index (DC, V, H, TM, B) to a mode.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => Self::DC,
            1 => Self::V,
            2 => Self::H,
            3 => Self::TM,
            4 => Self::B,
            _ => return None,
        })
    }
}

/// Chroma prediction mode for both 8x8 chroma blocks of a macroblock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChromaMode {
    /// Average of the row above and the column to the left.
    #[default]
    DC,
    /// Replicate the row above.
    V,
    /// Replicate the column to the left.
    H,
    /// TrueMotion gradient predictor.
    TM,
}

impl ChromaMode {
    /// Maps the bitstream index (DC, V, H, TM) to a mode.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => Self::DC,
            1 => Self::V,
            2 => Self::H,
            3 => Self::TM,
            _ => return None,
        })
    }
}

/// 4x4 sub-block prediction mode, in bitstream order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntraMode {
    /// Average of the four samples above and four to the left.
    #[default]
    DC,
    /// TrueMotion.
    TM,
    /// Vertical, smoothed with a 3-tap filter.
    VE,
    /// Horizontal, smoothed with a 3-tap filter.
    HE,
    /// Diagonal down-left.
    LD,
    /// Diagonal down-right.
    RD,
    /// Vertical-right.
    VR,
    /// Vertical-left.
    VL,
    /// Horizontal-down.
    HD,
    /// Horizontal-up.
    HU,
}

impl IntraMode {
    /// All modes in bitstream order.
    pub const ALL: [IntraMode; 10] = [
        Self::DC,
        Self::TM,
        Self::VE,
        Self::HE,
        Self::LD,
        Self::RD,
        Self::VR,
        Self::VL,
        Self::HD,
        Self::HU,
    ];

    /// Maps the bitstream index to a mode.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_index_round_trips_every_mode() {
        for (i, mode) in IntraMode::ALL.iter().enumerate() {
            assert_eq!(IntraMode::from_index(i as u8), Some(*mode));
        }
        assert_eq!(IntraMode::from_index(10), None);
        assert_eq!(LumaMode::from_index(4), Some(LumaMode::B));
        assert_eq!(LumaMode::from_index(5), None);
        assert_eq!(ChromaMode::from_index(3), Some(ChromaMode::TM));
        assert_eq!(ChromaMode::from_index(4), None);
    }
}
