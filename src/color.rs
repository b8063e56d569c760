//! Colour assignment for selected clusters.

use crate::types::Rgba;

/// Picks the colour of the cluster at position `ordinal` in the selection.
pub trait ColorSelector {
    /// Colour for the `ordinal`-th selected cluster.
    fn color(&self, ordinal: usize) -> Rgba;
}

/// Cyclic colour palettes for clusters.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ClusterPalette {
    /// Ten-colour categorical palette.
    #[default]
    Categorical,
    /// User-supplied colours, cycled. An empty list falls back to white.
    Custom(Vec<Rgba>),
}

const CATEGORICAL: [Rgba; 10] = [
    Rgba::from_rgb8(0x1f, 0x77, 0xb4), // blue
    Rgba::from_rgb8(0xff, 0x7f, 0x0e), // orange
    Rgba::from_rgb8(0x2c, 0xa0, 0x2c), // green
    Rgba::from_rgb8(0xd6, 0x27, 0x28), // red
    Rgba::from_rgb8(0x94, 0x67, 0xbd), // purple
    Rgba::from_rgb8(0x8c, 0x56, 0x4b), // brown
    Rgba::from_rgb8(0xe3, 0x77, 0xc2), // pink
    Rgba::from_rgb8(0x7f, 0x7f, 0x7f), // gray
    Rgba::from_rgb8(0xbc, 0xbd, 0x22), // olive
    Rgba::from_rgb8(0x17, 0xbe, 0xcf), // cyan
];

impl ColorSelector for ClusterPalette {
    fn color(&self, ordinal: usize) -> Rgba {
        match self {
            ClusterPalette::Categorical => CATEGORICAL[ordinal % CATEGORICAL.len()],
            ClusterPalette::Custom(colors) if colors.is_empty() => Rgba::WHITE,
            ClusterPalette::Custom(colors) => colors[ordinal % colors.len()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        let palette = ClusterPalette::Categorical;
        assert_eq!(palette.color(0), palette.color(10));
        assert_ne!(palette.color(0), palette.color(1));
    }

    #[test]
    fn test_custom_palette() {
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        let blue = Rgba::new(0.0, 0.0, 1.0, 1.0);
        let palette = ClusterPalette::Custom(vec![red, blue]);
        assert_eq!(palette.color(0), red);
        assert_eq!(palette.color(3), blue);
        assert_eq!(ClusterPalette::Custom(Vec::new()).color(4), Rgba::WHITE);
    }
}
