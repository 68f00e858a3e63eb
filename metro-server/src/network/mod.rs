//! Network construction: station registry, distance graph and line graph.
//!
//! Everything here is built once from the edge rows and then frozen into a
//! [`GraphSnapshot`], which queries borrow immutably.

mod distance;
mod lines;
mod loader;
mod record;
mod registry;
mod snapshot;

pub use distance::{DistanceGraph, Metres, km_to_metres, metres_to_km};
pub use lines::{EdgeKind, INTERCHANGE_PENALTY, LineEdge, LineExpansionGraph, LineNode, TRAVEL_COST};
pub use loader::{LoadError, load_edges, read_edges};
pub use record::{
    DataFormatError, EDGE_FIELDS, EdgeRecord, MAX_EDGE_KM, check_distance, parse_distance,
};
pub use registry::{RegistryBuilder, StationRecord, StationRegistry};
pub use snapshot::{BuildReport, GraphSnapshot, SkippedRecord, SnapshotBuilder};
