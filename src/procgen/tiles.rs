//! Tile alphabet and adjacency constraints for street map generation.

use std::collections::{HashMap, HashSet};

/// Terrain category a grid cell can resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Open ground with no road.
    Blank,
    /// Four-way road crossing.
    Cross,
    /// Road running north-south.
    RoadNS,
    /// Road running east-west.
    RoadEW,
    /// Building footprint that blocks movement.
    Block,
    /// Goal cell the player has to reach.
    Endpoint,
    /// Contradiction wildcard; swept to `Cross` before a map is returned.
    Anomaly,
}

impl TileKind {
    /// The candidate set every cell starts from. Endpoints are only ever
    /// seeded and anomalies only ever forced, so neither appears here.
    pub const BASE: [TileKind; 5] = [
        TileKind::Blank,
        TileKind::Cross,
        TileKind::RoadNS,
        TileKind::RoadEW,
        TileKind::Block,
    ];

    /// True when entities may stand on the tile.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            TileKind::Blank | TileKind::Cross | TileKind::RoadNS | TileKind::RoadEW
        )
    }

    /// One-character form used in map dumps.
    pub fn glyph(self) -> char {
        match self {
            TileKind::Blank => ' ',
            TileKind::Cross => '+',
            TileKind::RoadNS => '|',
            TileKind::RoadEW => '-',
            TileKind::Block => '#',
            TileKind::Endpoint => 'C',
            TileKind::Anomaly => '!',
        }
    }
}

/// Cardinal direction in grid space; north is the previous row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// Which tiles may sit next to which, per direction.
///
/// Immutable once built. The solver only reads it, so alternate tile sets
/// can be exercised in isolation by handing the generator a custom table.
#[derive(Clone, Debug)]
pub struct AdjacencyRules {
    allowed: HashMap<(TileKind, Direction), HashSet<TileKind>>,
}

impl Default for AdjacencyRules {
    fn default() -> Self {
        use Direction::*;
        use TileKind::*;

        let mut allowed: HashMap<(TileKind, Direction), HashSet<TileKind>> = HashMap::new();
        let mut rule = |tile: TileKind,
                        north: &[TileKind],
                        east: &[TileKind],
                        south: &[TileKind],
                        west: &[TileKind]| {
            allowed.insert((tile, North), north.iter().copied().collect());
            allowed.insert((tile, East), east.iter().copied().collect());
            allowed.insert((tile, South), south.iter().copied().collect());
            allowed.insert((tile, West), west.iter().copied().collect());
        };

        rule(
            Blank,
            &[Blank, RoadEW, Block],
            &[Blank, RoadNS, Block],
            &[Blank, RoadEW, Block],
            &[Blank, RoadNS, Block],
        );
        rule(Cross, &[RoadNS], &[RoadEW], &[RoadNS], &[RoadEW]);
        rule(
            RoadNS,
            &[RoadNS, Cross],
            &[Blank, Block],
            &[RoadNS, Cross],
            &[Blank, Block],
        );
        rule(
            RoadEW,
            &[Blank, Block],
            &[RoadEW, Cross],
            &[Blank, Block],
            &[RoadEW, Cross],
        );
        rule(
            Block,
            &[Blank, Block, RoadEW],
            &[Blank, Block, RoadNS],
            &[Blank, Block, RoadEW],
            &[Blank, Block, RoadNS],
        );
        // endpoints demand road access on every open side
        rule(Endpoint, &[RoadNS], &[RoadEW], &[RoadNS], &[RoadEW]);
        // the contradiction wildcard constrains nothing
        rule(
            Anomaly,
            &TileKind::BASE,
            &TileKind::BASE,
            &TileKind::BASE,
            &TileKind::BASE,
        );

        Self { allowed }
    }
}

impl AdjacencyRules {
    pub fn is_allowed(&self, source: TileKind, dir: Direction, neighbor: TileKind) -> bool {
        self.allowed
            .get(&(source, dir))
            .is_some_and(|set| set.contains(&neighbor))
    }
}
