#![doc = include_str!("../README.md")]

mod error;
mod graph;
mod manager;
mod model;
mod routing;

pub use error::{GraphError, LoadError};
pub use graph::RoadGraph;
pub use manager::TownGraphManager;
pub use model::{Distance, Road, Town};
pub use routing::{Route, RouteSegment, ShortestPaths, shortest_paths, shortest_route};
