use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Distance, GraphError, Road, Town};

/// Undirected road network.
///
/// Keeps one adjacency list per town; every road is stored in the lists of
/// both of its endpoints. Invariants: every town key has an adjacency entry
/// (possibly empty), and both endpoints of every stored road are present as
/// keys.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    adjacents: FxHashMap<Town, Vec<Road>>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a town with an empty adjacency list.
    /// Returns false without mutating the graph if the town is already present.
    pub fn add_vertex(&mut self, town: Town) -> bool {
        if self.adjacents.contains_key(&town) {
            return false;
        }

        self.adjacents.insert(town, vec![]);
        true
    }

    pub fn contains_vertex(&self, town: &Town) -> bool {
        self.adjacents.contains_key(town)
    }

    /// Finds the town with the given name.
    pub fn get_vertex(&self, name: &str) -> Option<&Town> {
        self.adjacents.get_key_value(name).map(|(town, _)| town)
    }

    /// Returns true if a road connects the two towns.
    /// Absent towns are not an error, there is simply no such road.
    pub fn contains_edge(&self, source: &Town, destination: &Town) -> bool {
        self.get_edge(source, destination).is_some()
    }

    /// Finds the road connecting the two towns by scanning the source's
    /// adjacency list for a road with the destination as an endpoint.
    pub fn get_edge(&self, source: &Town, destination: &Town) -> Option<&Road> {
        self.adjacents
            .get(source)?
            .iter()
            .find(|road| road.contains(destination))
    }

    /// Adds a road between two towns that are already part of the graph and
    /// returns it. The road is stored in the adjacency lists of both
    /// endpoints.
    ///
    /// No duplicate check is performed: adding a second road between the
    /// same pair stores two roads that compare equal, and later lookups by
    /// endpoint pair may find either of them.
    pub fn add_edge(
        &mut self,
        source: &Town,
        destination: &Town,
        distance: Distance,
        name: impl Into<String>,
    ) -> Result<Road, GraphError> {
        for endpoint in [source, destination] {
            if !self.adjacents.contains_key(endpoint) {
                return Err(GraphError::VertexNotFound(endpoint.name().to_owned()));
            }
        }

        let road = Road::new(source.clone(), destination.clone(), distance, name);

        for endpoint in [source, destination] {
            if let Some(roads) = self.adjacents.get_mut(endpoint) {
                roads.push(road.clone());
            }
        }

        Ok(road)
    }

    /// Removes the road between the two towns whose name matches exactly,
    /// from the adjacency lists of both endpoints. The distance parameter
    /// mirrors the add signature but does not participate in matching.
    ///
    /// Returns the removed road, or None when no road between the towns
    /// carries the given name.
    pub fn remove_edge(
        &mut self,
        source: &Town,
        destination: &Town,
        _distance: Distance,
        name: &str,
    ) -> Option<Road> {
        let roads = self.adjacents.get_mut(source)?;
        let index = roads
            .iter()
            .position(|road| road.contains(destination) && road.name() == name)?;
        let road = roads.remove(index);

        if let Some(reverse) = self.adjacents.get_mut(destination)
            && let Some(index) = reverse
                .iter()
                .position(|road| road.contains(source) && road.name() == name)
        {
            reverse.remove(index);
        }

        Some(road)
    }

    /// Removes a town together with every road incident to it, including
    /// the entries in the neighbors' adjacency lists.
    /// Returns false if the town was not part of the graph.
    pub fn remove_vertex(&mut self, town: &Town) -> bool {
        let Some(roads) = self.adjacents.remove(town) else {
            return false;
        };

        for road in roads {
            let neighbor = if road.source() == town {
                road.destination()
            } else {
                road.source()
            };

            if let Some(adjacent) = self.adjacents.get_mut(neighbor) {
                adjacent.retain(|road| !road.contains(town));
            }
        }

        true
    }

    /// All distinct roads of the graph. Roads compare by endpoint pair, so
    /// parallel roads between the same towns collapse into a single entry.
    pub fn edge_set(&self) -> FxHashSet<Road> {
        self.adjacents.values().flatten().cloned().collect()
    }

    /// Roads incident to the given town.
    pub fn edges_of(&self, town: &Town) -> Result<FxHashSet<Road>, GraphError> {
        self.adjacents
            .get(town)
            .map(|roads| roads.iter().cloned().collect())
            .ok_or_else(|| GraphError::VertexNotFound(town.name().to_owned()))
    }

    /// Iterates over all towns of the graph in no particular order.
    pub fn vertex_set(&self) -> impl Iterator<Item = &Town> {
        self.adjacents.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacents.is_empty()
    }

    /// Iterates over the roads incident to the given town, together with
    /// the town at the opposite end of each road.
    /// Returns an empty iterator if the town doesn't belong to the graph.
    pub fn adjacent_roads<'a>(
        &'a self,
        town: &'a Town,
    ) -> impl Iterator<Item = (&'a Road, &'a Town)> {
        self.adjacents
            .get(town)
            .into_iter()
            .flatten()
            .map(move |road| {
                let neighbor = if road.source() == town {
                    road.destination()
                } else {
                    road.source()
                };
                (road, neighbor)
            })
    }
}
