//! Replace-by-key writes over a declared foreign-key graph.
//!
//! Each clinical table is owned per admission (`ipd_no`). Rewriting an
//! admission's rows means deleting what is there first, and the store
//! refuses to delete a parent that child rows still point at. The graph
//! below lists those edges; [`Cascade::delete`] walks it depth-first so
//! every dependent row goes before the row it depends on.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde_json::Value;

use super::SeedError;
use crate::store::{Filter, ForeignKey, Query, Row, RowStore};

/// Dependent-record edges among the per-admission clinical tables.
pub const CLINICAL_FOREIGN_KEYS: &[ForeignKey] = &[
    ForeignKey::new("dispensed_medications", "request_id", "medication_dispense_requests", "id"),
    ForeignKey::new("medication_dispense_requests", "medication_id", "internal_medications", "id"),
    ForeignKey::new(
        "medication_administration_entries",
        "chart_id",
        "medication_administration_charts",
        "id",
    ),
    ForeignKey::new(
        "dispensed_procedure_requirements",
        "request_id",
        "procedure_medicine_requirement_requests",
        "id",
    ),
    ForeignKey::new(
        "procedure_medicine_requirement_requests",
        "procedure_entry_id",
        "procedure_entries",
        "id",
    ),
    ForeignKey::new("procedure_sessions", "procedure_entry_id", "procedure_entries", "id"),
    ForeignKey::new("therapist_assignments", "procedure_entry_id", "procedure_entries", "id"),
];

/// A validated (acyclic) set of foreign-key edges.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    edges: Vec<ForeignKey>,
}

impl DependencyGraph {
    /// Build the graph, rejecting cycles.
    pub fn new(edges: impl IntoIterator<Item = ForeignKey>) -> Result<Self, SeedError> {
        let graph = Self {
            edges: edges.into_iter().collect(),
        };
        graph.topological_order()?;
        Ok(graph)
    }

    pub fn edges(&self) -> &[ForeignKey] {
        &self.edges
    }

    /// Edges whose parent is `table`.
    pub fn children_of<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ForeignKey> + 'a {
        self.edges.iter().filter(move |e| e.parent == table)
    }

    /// Tables ordered parents-first (Kahn's algorithm).
    ///
    /// Ties are broken alphabetically so the order is stable across runs.
    pub fn topological_order(&self) -> Result<Vec<&'static str>, SeedError> {
        let mut indegree: BTreeMap<&'static str, usize> = BTreeMap::new();
        for e in &self.edges {
            indegree.entry(e.parent).or_insert(0);
            *indegree.entry(e.child).or_insert(0) += 1;
        }

        let mut ready: VecDeque<&'static str> = indegree
            .iter()
            .filter(|(_, &n)| n == 0)
            .map(|(&t, _)| t)
            .collect();
        let mut order = Vec::with_capacity(indegree.len());

        while let Some(table) = ready.pop_front() {
            order.push(table);
            let children: BTreeSet<&'static str> = self
                .edges
                .iter()
                .filter(|e| e.parent == table)
                .map(|e| e.child)
                .collect();
            for child in children {
                let edges_in = self
                    .edges
                    .iter()
                    .filter(|e| e.parent == table && e.child == child)
                    .count();
                if let Some(n) = indegree.get_mut(child) {
                    *n -= edges_in;
                    if *n == 0 {
                        ready.push_back(child);
                    }
                }
            }
        }

        if order.len() < indegree.len() {
            let stuck: Vec<&str> = indegree
                .iter()
                .filter(|(t, _)| !order.contains(*t))
                .map(|(&t, _)| t)
                .collect();
            return Err(SeedError::DependencyCycle(stuck.join(", ")));
        }
        Ok(order)
    }
}

/// The graph every clinical write goes through.
pub fn clinical_graph() -> Result<DependencyGraph, SeedError> {
    DependencyGraph::new(CLINICAL_FOREIGN_KEYS.iter().cloned())
}

/// Deletes and replaces rows while honoring a [`DependencyGraph`].
pub struct Cascade<'a> {
    store: &'a dyn RowStore,
    graph: &'a DependencyGraph,
}

impl<'a> Cascade<'a> {
    pub fn new(store: &'a dyn RowStore, graph: &'a DependencyGraph) -> Self {
        Self { store, graph }
    }

    pub fn store(&self) -> &'a dyn RowStore {
        self.store
    }

    /// Delete rows of `table` matching `filters`, dependents first.
    /// Returns the number of `table` rows removed.
    pub fn delete(&self, table: &str, filters: &[Filter]) -> Result<usize, SeedError> {
        for edge in self.graph.children_of(table) {
            let mut query = Query::all().columns(edge.parent_column);
            for f in filters {
                query = query.filter(f.clone());
            }
            let keys: Vec<Value> = self
                .store
                .select(table, &query)?
                .into_iter()
                .filter_map(|mut row| row.remove(edge.parent_column))
                .filter(|v| !v.is_null())
                .collect();
            if keys.is_empty() {
                continue;
            }
            let removed = self.delete(edge.child, &[Filter::is_in(edge.column, keys)])?;
            tracing::debug!(table = edge.child, parent = table, removed, "Removed dependent rows");
        }
        Ok(self.store.delete(table, filters)?)
    }

    /// Delete every row of `table` where `key_column = key`, then insert `rows`.
    ///
    /// Idempotent per key: running it twice with equal-length inputs leaves
    /// the same number of rows. An empty `rows` only deletes.
    pub fn replace(
        &self,
        table: &str,
        key_column: &str,
        key: &str,
        rows: &[Row],
    ) -> Result<Vec<Row>, SeedError> {
        let removed = self.delete(table, &[Filter::eq(key_column, key)])?;
        let stored = self.store.insert(table, rows)?;
        tracing::debug!(table, key, removed, inserted = stored.len(), "Replaced rows");
        Ok(stored)
    }
}
