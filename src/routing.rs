use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{Distance, Road, RoadGraph, Town};

/// Single-source shortest distances computed by one Dijkstra run.
///
/// Every query builds its own state, nothing is cached on the graph, so
/// concurrent read-only queries on the same graph stay isolated. Towns that
/// cannot be reached from the origin are absent from the result.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    origin: Town,
    distances: FxHashMap<Town, Distance>,
    predecessors: FxHashMap<Town, Town>,
}

impl ShortestPaths {
    pub fn origin(&self) -> &Town {
        &self.origin
    }

    /// Shortest known distance from the origin, None when unreachable.
    pub fn distance(&self, town: &Town) -> Option<Distance> {
        self.distances.get(town).copied()
    }

    /// Previous town on the best path from the origin.
    /// None for the origin itself and for unreachable towns.
    pub fn predecessor(&self, town: &Town) -> Option<&Town> {
        self.predecessors.get(town)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapElement<'a> {
    /// Current shortest distance from the origin to this town.
    distance: Distance,
    town: &'a Town,
}

// The priority queue depends on the implementation of the Ord trait.
// By default std::BinaryHeap is a max heap.
// Explicitly implement the trait so the queue becomes a min heap.
impl Ord for HeapElement<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .cmp(&self.distance)
            // breaking ties in a deterministic way, by town name
            .then_with(|| other.town.cmp(self.town))
    }
}

impl PartialOrd for HeapElement<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Computes the shortest distance from the origin to every reachable town
/// of the graph using Dijkstra's algorithm.
///
/// Returns an empty result if the origin is not part of the graph.
pub fn shortest_paths(graph: &RoadGraph, origin: &Town) -> ShortestPaths {
    debug!("Computing shortest paths from {origin}");

    // (current) shortest distance from the origin to this town
    let mut distances = FxHashMap::default();

    // previous town (value) on the current best known path from the origin
    // to this town (key)
    let mut predecessors: FxHashMap<Town, Town> = FxHashMap::default();

    if !graph.contains_vertex(origin) {
        return ShortestPaths {
            origin: origin.clone(),
            distances,
            predecessors,
        };
    }

    distances.insert(origin.clone(), Distance::ZERO);

    // priority queue of discovered towns that may need to be visited
    let mut frontier = BinaryHeap::from([HeapElement {
        town: origin,
        distance: Distance::ZERO,
    }]);

    while let Some(element) = frontier.pop() {
        // check if we already know a cheaper way to get to this town
        let shortest = distances.get(element.town).copied();
        if shortest.is_some_and(|distance| element.distance > distance) {
            continue;
        }

        for (road, neighbor) in graph.adjacent_roads(element.town) {
            let distance = element.distance + road.distance();

            let known = distances.get(neighbor).copied();
            // check if the current road reaches the neighbor in a cheaper way
            if known.is_none_or(|shortest| distance < shortest) {
                // Relax: we have now found a better way that we are going to explore
                distances.insert(neighbor.clone(), distance);
                predecessors.insert(neighbor.clone(), element.town.clone());
                frontier.push(HeapElement {
                    town: neighbor,
                    distance,
                });
            }
        }
    }

    ShortestPaths {
        origin: origin.clone(),
        distances,
        predecessors,
    }
}

/// One hop of a route, following a road from one town to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    pub from: Town,
    pub road: Road,
    pub to: Town,
}

impl fmt::Display for RouteSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via {} to {} {}",
            self.from,
            self.road,
            self.to,
            self.road.distance()
        )
    }
}

/// A route between two towns, one segment per road, ordered from the origin
/// to the destination. A route from a town to itself has no segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route {
    pub segments: Vec<RouteSegment>,
}

impl Route {
    /// Total distance covered by the route.
    pub fn total_distance(&self) -> Distance {
        self.segments.iter().map(|segment| segment.road.distance()).sum()
    }

    /// Renders the route as one directive string per segment, e.g.
    /// `"Arlington via River Rd to Bethesda 9 mi"`.
    pub fn directives(&self) -> Vec<String> {
        self.segments.iter().map(ToString::to_string).collect()
    }
}

/// Computes the shortest route between two towns by walking the Dijkstra
/// predecessor chain back from the destination.
///
/// Returns None when the destination cannot be reached from the origin.
pub fn shortest_route(graph: &RoadGraph, origin: &Town, destination: &Town) -> Option<Route> {
    let paths = shortest_paths(graph, origin);
    paths.distance(destination)?;

    let mut segments = vec![];
    let mut current = destination;

    while current != origin {
        let previous = paths.predecessor(current)?;
        let road = graph.get_edge(current, previous)?;

        segments.push(RouteSegment {
            from: previous.clone(),
            road: road.clone(),
            to: current.clone(),
        });

        current = previous;
    }

    segments.reverse();
    Some(Route { segments })
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    /// Line graph A - B - C with one more expensive shortcut A - C.
    fn line_graph() -> (RoadGraph, [Town; 3]) {
        let towns = ["A", "B", "C"].map(Town::new);
        let mut graph = RoadGraph::new();

        for town in &towns {
            graph.add_vertex(town.clone());
        }

        let [a, b, c] = &towns;
        graph.add_edge(a, b, Distance::from_miles(2), "Main St").unwrap();
        graph.add_edge(b, c, Distance::from_miles(3), "High St").unwrap();
        graph.add_edge(a, c, Distance::from_miles(9), "Ring Rd").unwrap();

        (graph, towns)
    }

    #[test]
    fn routing_shortest_paths_001() {
        let (graph, [a, b, c]) = line_graph();

        let paths = shortest_paths(&graph, &a);

        assert_eq!(paths.origin(), &a);
        assert_eq!(paths.distance(&a), Some(Distance::ZERO));
        assert_eq!(paths.distance(&b), Some(Distance::from_miles(2)));
        assert_eq!(paths.distance(&c), Some(Distance::from_miles(5)));
        assert_eq!(paths.predecessor(&a), None);
        assert_eq!(paths.predecessor(&b), Some(&a));
        assert_eq!(paths.predecessor(&c), Some(&b), "cheaper than the direct road");
    }

    #[test]
    fn routing_shortest_paths_unreachable_001() {
        let (mut graph, [a, ..]) = line_graph();
        let island = Town::new("Island");
        graph.add_vertex(island.clone());

        let paths = shortest_paths(&graph, &a);

        assert_eq!(paths.distance(&island), None);
        assert_eq!(paths.predecessor(&island), None);
    }

    #[test]
    fn routing_shortest_paths_missing_origin_001() {
        let (graph, [a, ..]) = line_graph();

        let paths = shortest_paths(&graph, &Town::new("Nowhere"));

        assert_eq!(paths.distance(&a), None);
        assert_eq!(paths.distance(&Town::new("Nowhere")), None);
    }

    #[test]
    fn routing_shortest_route_001() {
        let (graph, [a, _, c]) = line_graph();

        let route = shortest_route(&graph, &a, &c).unwrap();

        assert_eq!(route.total_distance(), Distance::from_miles(5));
        assert_eq!(
            route.directives(),
            ["A via Main St to B 2 mi", "B via High St to C 3 mi"]
        );
    }

    #[test]
    fn routing_shortest_route_to_self_001() {
        let (graph, [a, ..]) = line_graph();

        let route = shortest_route(&graph, &a, &a).unwrap();

        assert!(route.segments.is_empty());
        assert_eq!(route.total_distance(), Distance::ZERO);
    }

    #[test]
    fn routing_shortest_route_unreachable_001() {
        let (mut graph, [a, ..]) = line_graph();
        let island = Town::new("Island");
        graph.add_vertex(island.clone());

        assert_eq!(shortest_route(&graph, &a, &island), None);
    }

    #[test]
    fn routing_tie_break_is_deterministic_001() {
        // two equal-cost paths X - A - Z and X - B - Z
        let towns = ["X", "A", "B", "Z"].map(Town::new);
        let mut graph = RoadGraph::new();
        for town in &towns {
            graph.add_vertex(town.clone());
        }
        let [x, a, b, z] = &towns;
        graph.add_edge(x, a, Distance::from_miles(1), "Road1").unwrap();
        graph.add_edge(x, b, Distance::from_miles(1), "Road2").unwrap();
        graph.add_edge(a, z, Distance::from_miles(1), "Road3").unwrap();
        graph.add_edge(b, z, Distance::from_miles(1), "Road4").unwrap();

        let first = shortest_route(&graph, x, z).unwrap();

        assert_eq!(first.total_distance(), Distance::from_miles(2));
        for _ in 0..10 {
            assert_eq!(shortest_route(&graph, x, z).unwrap(), first);
        }
    }
}
