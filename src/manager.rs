use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::routing::shortest_route;
use crate::{Distance, GraphError, LoadError, Road, RoadGraph, Town};

/// String-keyed facade over a [`RoadGraph`].
///
/// Callers address towns by name; the manager converts the names into graph
/// operations and renders results back into plain strings.
#[derive(Debug, Clone, Default)]
pub struct TownGraphManager {
    graph: RoadGraph,
}

impl TownGraphManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying graph.
    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    /// Adds a town, false if it was already present.
    pub fn add_town(&mut self, name: &str) -> bool {
        self.graph.add_vertex(Town::new(name))
    }

    pub fn get_town(&self, name: &str) -> Option<&Town> {
        self.graph.get_vertex(name)
    }

    pub fn contains_town(&self, name: &str) -> bool {
        self.graph.get_vertex(name).is_some()
    }

    /// Removes a town together with all roads incident to it.
    pub fn delete_town(&mut self, name: &str) -> bool {
        self.graph.remove_vertex(&Town::new(name))
    }

    /// Adds a road between two towns that are already part of the graph.
    pub fn add_road(
        &mut self,
        town1: &str,
        town2: &str,
        distance: Distance,
        road_name: &str,
    ) -> Result<Road, GraphError> {
        self.graph
            .add_edge(&Town::new(town1), &Town::new(town2), distance, road_name)
    }

    /// Name of the road connecting the two towns, if any.
    pub fn get_road(&self, town1: &str, town2: &str) -> Option<String> {
        self.graph
            .get_edge(&Town::new(town1), &Town::new(town2))
            .map(|road| road.name().to_owned())
    }

    pub fn contains_road_connection(&self, town1: &str, town2: &str) -> bool {
        self.graph
            .contains_edge(&Town::new(town1), &Town::new(town2))
    }

    /// Deletes the road with the given name between the two towns.
    /// Returns false when no such road exists.
    pub fn delete_road_connection(&mut self, town1: &str, town2: &str, road_name: &str) -> bool {
        self.graph
            .remove_edge(
                &Town::new(town1),
                &Town::new(town2),
                Distance::ZERO,
                road_name,
            )
            .is_some()
    }

    /// All town names in ascending order, regardless of insertion order.
    pub fn all_towns(&self) -> Vec<String> {
        let mut towns: Vec<_> = self
            .graph
            .vertex_set()
            .map(|town| town.name().to_owned())
            .collect();
        towns.sort();
        towns
    }

    /// All road names in ascending order, each distinct road listed once.
    pub fn all_roads(&self) -> Vec<String> {
        let mut roads: Vec<_> = self
            .graph
            .edge_set()
            .into_iter()
            .map(|road| road.name().to_owned())
            .collect();
        roads.sort();
        roads
    }

    /// Shortest path between two towns as one directive string per road,
    /// ordered from the origin to the destination.
    /// Returns an empty list when either town is absent or no route exists.
    pub fn path(&self, town1: &str, town2: &str) -> Vec<String> {
        shortest_route(&self.graph, &Town::new(town1), &Town::new(town2))
            .map(|route| route.directives())
            .unwrap_or_default()
    }

    /// Populates the graph from a delimited text file.
    /// See [`Self::load_from_reader`] for the line format.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let file = File::open(path)?;
        self.load_from_reader(BufReader::new(file))
    }

    /// Populates the graph from lines of `name,distance,town1,town2`
    /// records, with `,` or `;` as the field separator.
    ///
    /// Towns missing from the graph are inserted before their road. Blank
    /// lines are skipped. A malformed record aborts the load; towns and
    /// roads from earlier lines stay in the graph.
    pub fn load_from_reader(&mut self, reader: impl BufRead) -> Result<(), LoadError> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let record = parse_road_record(index + 1, &line)?;
            debug!("Loading {record:?}");

            for town in [record.town1, record.town2] {
                if !self.contains_town(town) {
                    self.add_town(town);
                }
            }

            self.add_road(record.town1, record.town2, record.distance, record.name)?;
        }

        Ok(())
    }
}

/// One road description parsed from a bulk-load line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RoadRecord<'a> {
    name: &'a str,
    distance: Distance,
    town1: &'a str,
    town2: &'a str,
}

fn parse_road_record(line_number: usize, line: &str) -> Result<RoadRecord<'_>, LoadError> {
    let mut fields = line.split([',', ';']);

    let mut next_field = |field: &'static str| {
        fields.next().ok_or(LoadError::MissingField {
            line: line_number,
            field,
        })
    };

    let name = next_field("road name")?;
    let distance = next_field("distance")?;
    let town1 = next_field("first town")?;
    let town2 = next_field("second town")?;

    let distance = distance
        .parse::<u32>()
        .map(Distance::from_miles)
        .map_err(|_| {
            warn!("Aborting load, line {line_number} has invalid distance {distance:?}");
            LoadError::InvalidDistance {
                line: line_number,
                value: distance.to_owned(),
            }
        })?;

    Ok(RoadRecord {
        name,
        distance,
        town1,
        town2,
    })
}
