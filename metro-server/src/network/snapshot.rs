//! One-shot construction of the immutable network snapshot.
//!
//! Edge rows are validated and ingested in a single pass; the registry is
//! then frozen and both graphs are built from the accepted edges. A new
//! dataset requires a new snapshot.

use tracing::{info, warn};

use crate::domain::{CanonicalId, LineSet, ParseError, QueryError, parse_lines};
use crate::fare::{ConfigError, FareBand, FareTable};

use super::distance::{DistanceGraph, Metres, km_to_metres};
use super::lines::LineExpansionGraph;
use super::record::{DataFormatError, EdgeRecord, check_distance};
use super::registry::{RegistryBuilder, StationRegistry};

/// A rejected input row.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// 1-based position of the row in the input.
    pub row: usize,
    pub error: DataFormatError,
}

/// Outcome of ingesting the edge rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub rows: usize,
    pub accepted: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl BuildReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// An edge whose endpoints parsed successfully.
#[derive(Debug, Clone)]
struct AcceptedEdge {
    a: CanonicalId,
    b: CanonicalId,
    a_lines: LineSet,
    b_lines: LineSet,
    distance: Metres,
}

/// Immutable bundle of everything queries need.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    pub registry: StationRegistry,
    pub distance: DistanceGraph,
    pub lines: LineExpansionGraph,
    pub fares: FareTable,
    pub report: BuildReport,
}

impl GraphSnapshot {
    /// Build a snapshot from raw text rows and fare bands.
    ///
    /// Malformed rows are skipped and listed in [`GraphSnapshot::report`];
    /// malformed fare bands abort the build.
    pub fn build<I, R, S>(rows: I, bands: Vec<FareBand>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let fares = FareTable::new(bands)?;
        let mut builder = SnapshotBuilder::new();
        for row in rows {
            builder.push_row(row.as_ref());
        }
        Ok(builder.finish(fares))
    }

    /// Build a snapshot from typed edge records.
    pub fn from_records<I>(records: I, fares: FareTable) -> Self
    where
        I: IntoIterator<Item = EdgeRecord>,
    {
        let mut builder = SnapshotBuilder::new();
        for record in records {
            builder.push_record(record);
        }
        builder.finish(fares)
    }

    /// Resolve a station name or 1-based index.
    pub fn lookup(&self, query: &str) -> Result<CanonicalId, QueryError> {
        self.registry.lookup(query)
    }

    /// Fare for a trip of `distance` km.
    pub fn fare(&self, distance: f64) -> u32 {
        self.fares.calculate(distance)
    }
}

/// Incremental ingestion of edge rows, finished into a [`GraphSnapshot`].
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    registry: RegistryBuilder,
    edges: Vec<AcceptedEdge>,
    report: BuildReport,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and ingest a raw text row.
    pub fn push_row<S: AsRef<str>>(&mut self, fields: &[S]) {
        let result = EdgeRecord::from_fields(fields).and_then(|record| self.accept(record));
        self.settle(result);
    }

    /// Ingest an already-typed record.
    pub fn push_record(&mut self, record: EdgeRecord) {
        let result = check_distance(record.distance_km).and_then(|_| self.accept(record));
        self.settle(result);
    }

    fn settle(&mut self, result: Result<(), DataFormatError>) {
        self.report.rows += 1;
        match result {
            Ok(()) => self.report.accepted += 1,
            Err(error) => {
                let row = self.report.rows;
                warn!(row, error = %error, "skipping malformed edge record");
                self.report.skipped.push(SkippedRecord { row, error });
            }
        }
    }

    fn accept(&mut self, record: EdgeRecord) -> Result<(), DataFormatError> {
        let a_lines = station_lines(&record.station_a)?;
        let b_lines = station_lines(&record.station_b)?;

        let a = self.registry.register(&record.station_a, &a_lines);
        let b = self.registry.register(&record.station_b, &b_lines);

        self.edges.push(AcceptedEdge {
            a,
            b,
            a_lines,
            b_lines,
            distance: km_to_metres(record.distance_km),
        });
        Ok(())
    }

    /// Freeze the registry and build both graphs.
    pub fn finish(self, fares: FareTable) -> GraphSnapshot {
        let registry = self.registry.finish();
        let mut distance = DistanceGraph::new();
        let mut lines = LineExpansionGraph::new();

        for (_, station) in registry.iter_sorted() {
            lines.add_station(&station.id, &station.lines);
            lines.add_interchanges(&station.id, &station.lines);
        }

        for edge in &self.edges {
            distance.add_edge(&edge.a, &edge.b, edge.distance);
            lines.add_travel(&edge.a, &edge.b, &edge.a_lines.common(&edge.b_lines));
        }

        info!(
            stations = registry.len(),
            edges = distance.edge_count(),
            line_nodes = lines.node_count(),
            travel_edges = lines.travel_edge_count(),
            interchange_edges = lines.interchange_edge_count(),
            skipped = self.report.skipped_count(),
            "network snapshot built"
        );

        GraphSnapshot {
            registry,
            distance,
            lines,
            fares,
            report: self.report,
        }
    }
}

fn station_lines(name: &str) -> Result<LineSet, DataFormatError> {
    parse_lines(name).map_err(|source: ParseError| DataFormatError::StationName {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineId, canonicalize};
    use crate::network::lines::LineNode;

    fn rows(data: &[[&str; 3]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|f| f.to_string()).collect())
            .collect()
    }

    fn sample() -> GraphSnapshot {
        let data = rows(&[
            ["A_red", "B_(interchange red blue)", "3"],
            ["B_(interchange red blue)", "C_blue", "4"],
        ]);
        GraphSnapshot::build(data, FareTable::delhi_metro().bands().to_vec()).unwrap()
    }

    #[test]
    fn builds_registry_and_graphs() {
        let snapshot = sample();

        assert_eq!(snapshot.registry.len(), 3);
        assert_eq!(snapshot.distance.edge_count(), 2);
        // A@red, B@red, B@blue, C@blue
        assert_eq!(snapshot.lines.node_count(), 4);
        assert_eq!(snapshot.lines.travel_edge_count(), 2);
        assert_eq!(snapshot.lines.interchange_edge_count(), 1);
        assert_eq!(snapshot.report.accepted, 2);
        assert_eq!(snapshot.report.skipped_count(), 0);
    }

    #[test]
    fn every_station_line_has_a_node() {
        let snapshot = sample();
        for (_, station) in snapshot.registry.iter_sorted() {
            for line in station.lines.iter() {
                let node = LineNode::new(station.id.clone(), line.clone());
                assert!(snapshot.lines.contains(&node), "{node:?} missing");
            }
        }
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let data = rows(&[
            ["A_red", "B_red", "1"],
            ["A_red", "C_red", "far"],
            ["Nowhere", "B_red", "2"],
            ["B_red", "C_red", "-1"],
            ["B_red", "C_red", "2"],
        ]);
        let mut data = data;
        data.insert(1, vec!["A_red".to_string(), "B_red".to_string()]);

        let snapshot = GraphSnapshot::build(data, FareTable::delhi_metro().bands().to_vec()).unwrap();

        assert_eq!(snapshot.report.rows, 6);
        assert_eq!(snapshot.report.accepted, 2);
        let skipped: Vec<usize> = snapshot.report.skipped.iter().map(|s| s.row).collect();
        assert_eq!(skipped, vec![2, 3, 4, 5]);
        assert!(matches!(
            snapshot.report.skipped[0].error,
            DataFormatError::FieldCount { found: 2 }
        ));
        assert!(matches!(
            snapshot.report.skipped[2].error,
            DataFormatError::StationName { .. }
        ));

        // The rejected row's stations are not registered.
        assert!(snapshot.lookup("Nowhere").is_err());
        assert_eq!(snapshot.registry.len(), 3);
    }

    #[test]
    fn bad_fare_bands_abort_the_build() {
        let data = rows(&[["A_red", "B_red", "1"]]);
        let result = GraphSnapshot::build(data, vec![]);
        assert!(matches!(result, Err(ConfigError::EmptyBands)));
    }

    #[test]
    fn parallel_edges_are_retained() {
        let records = vec![
            EdgeRecord::new("A_red", "B_red", 5.0),
            EdgeRecord::new("B_red", "A_red", 2.0),
        ];
        let snapshot = GraphSnapshot::from_records(records, FareTable::delhi_metro());

        assert_eq!(snapshot.distance.edge_count(), 2);
        assert_eq!(
            snapshot
                .distance
                .edge_distance(&canonicalize("a"), &canonicalize("b")),
            Some(2000)
        );
    }

    #[test]
    fn typed_records_are_validated() {
        let records = vec![
            EdgeRecord::new("A_red", "B_red", -3.0),
            EdgeRecord::new("A_red", "B_red", f64::NAN),
            EdgeRecord::new("A_red", "B_red", 1.0),
        ];
        let snapshot = GraphSnapshot::from_records(records, FareTable::delhi_metro());
        assert_eq!(snapshot.report.accepted, 1);
        assert_eq!(snapshot.report.skipped_count(), 2);
    }

    #[test]
    fn no_common_line_means_no_travel_edge() {
        let records = vec![EdgeRecord::new("A_red", "B_blue", 1.0)];
        let snapshot = GraphSnapshot::from_records(records, FareTable::delhi_metro());

        assert_eq!(snapshot.distance.edge_count(), 1);
        assert_eq!(snapshot.lines.travel_edge_count(), 0);
        assert!(snapshot.lines.contains(&LineNode::new(canonicalize("a"), LineId::new("red"))));
    }
}
