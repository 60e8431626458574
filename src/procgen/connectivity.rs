//! Road-network connectivity over a resolved tile grid.
//!
//! Used to sanity-check generated maps (a goal nobody can walk to makes
//! an unwinnable level) and by spawn placement tests.

use petgraph::algo::has_path_connecting;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

use super::tiles::TileKind;

/// Undirected graph of traversable cells; grid-adjacent traversable
/// cells share an edge.
pub struct RoadNetwork {
    graph: UnGraph<usize, ()>,
    nodes: HashMap<usize, NodeIndex>,
}

impl RoadNetwork {
    /// Cells enter the graph when entities can stand on them; goal cells
    /// count so reachability queries can target them.
    fn is_traversable(kind: TileKind) -> bool {
        kind.is_walkable() || kind == TileKind::Endpoint
    }

    pub fn from_tiles(tiles: &[TileKind], size: usize) -> Self {
        let mut graph = UnGraph::default();
        let mut nodes = HashMap::new();

        for (idx, kind) in tiles.iter().enumerate() {
            if Self::is_traversable(*kind) {
                nodes.insert(idx, graph.add_node(idx));
            }
        }
        // east and south edges only, so no pair is added twice
        for (&idx, &node) in &nodes {
            if (idx % size) + 1 < size {
                if let Some(&east) = nodes.get(&(idx + 1)) {
                    graph.add_edge(node, east, ());
                }
            }
            if idx + size < tiles.len() {
                if let Some(&south) = nodes.get(&(idx + size)) {
                    graph.add_edge(node, south, ());
                }
            }
        }

        Self { graph, nodes }
    }

    /// Whether a path of traversable cells joins the two cell indices.
    pub fn is_connected(&self, from: usize, to: usize) -> bool {
        match (self.nodes.get(&from), self.nodes.get(&to)) {
            (Some(&a), Some(&b)) => has_path_connecting(&self.graph, a, b, None),
            _ => false,
        }
    }

    /// Endpoint cells reachable from `from`.
    pub fn reachable_endpoints(&self, from: usize, tiles: &[TileKind]) -> Vec<usize> {
        tiles
            .iter()
            .enumerate()
            .filter(|(idx, kind)| **kind == TileKind::Endpoint && self.is_connected(from, *idx))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::TileKind::*;

    #[test]
    fn straight_road_is_connected() {
        // one east-west road across the middle row
        let tiles = vec![
            Block, Block, Block, //
            RoadEW, RoadEW, RoadEW, //
            Block, Block, Block,
        ];
        let network = RoadNetwork::from_tiles(&tiles, 3);
        assert_eq!(network.node_count(), 3);
        assert!(network.is_connected(3, 5));
        assert!(!network.is_connected(3, 0));
    }

    #[test]
    fn blocks_split_the_network() {
        let tiles = vec![
            RoadEW, Block, RoadEW, //
            Block, Block, Block, //
            Blank, Blank, Blank,
        ];
        let network = RoadNetwork::from_tiles(&tiles, 3);
        assert!(!network.is_connected(0, 2));
        assert!(network.is_connected(6, 8));
    }

    #[test]
    fn endpoints_are_reachable_targets() {
        let tiles = vec![
            Blank, RoadNS, Blank, //
            Blank, Endpoint, Blank, //
            Blank, RoadNS, Blank,
        ];
        let network = RoadNetwork::from_tiles(&tiles, 3);
        assert_eq!(network.reachable_endpoints(1, &tiles), vec![4]);
        assert_eq!(network.reachable_endpoints(4, &tiles), vec![4]);
    }
}
