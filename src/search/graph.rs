use crate::catalogue::Catalogue;
use crate::model::{BusId, BusKind, RouteSettings, StopId};
use itertools::Itertools;

pub type EdgeId = usize;

/// Cost of boarding a bus at one stop and leaving it at another.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RideWeight {
    pub bus: BusId,
    /// Stop-to-stop hops covered without leaving the bus.
    pub span_count: usize,
    /// Wait time plus ride time, in minutes.
    pub total_time: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Edge {
    pub from: StopId,
    pub to: StopId,
    pub weight: RideWeight,
}

/// Directed graph whose vertices are stop ordinals.
#[derive(Debug, Clone)]
pub struct Graph {
    edges: Vec<Edge>,
    incidence: Vec<Vec<EdgeId>>,
}

impl Graph {
    fn new(vertex_count: usize) -> Graph {
        Graph {
            edges: Vec::new(),
            incidence: vec![Vec::new(); vertex_count],
        }
    }

    fn add_edge(&mut self, edge: Edge) -> EdgeId {
        let id = self.edges.len();
        self.incidence[edge.from.0].push(id);
        self.edges.push(edge);
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Edges leaving `vertex`, in insertion order.
    pub fn outgoing(&self, vertex: StopId) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.incidence[vertex.0]
            .iter()
            .map(move |&id| (id, &self.edges[id]))
    }
}

/// Turns a finished catalogue into a ride graph.
///
/// Every bus contributes one edge for each pair of positions `i < j` in its
/// stop sequence, so a ride of several hops on one bus costs a single wait.
/// There-and-back buses get the same treatment over the reversed sequence.
pub struct GraphBuilder<'a> {
    catalogue: &'a Catalogue,
    settings: RouteSettings,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(catalogue: &'a Catalogue, settings: RouteSettings) -> GraphBuilder<'a> {
        GraphBuilder {
            catalogue,
            settings,
        }
    }

    pub fn build(&self) -> Graph {
        let mut graph = Graph::new(self.catalogue.stop_count());
        for (id, bus) in self.catalogue.buses() {
            self.add_pass(&mut graph, id, &bus.stops);
            if bus.kind == BusKind::ThereAndBack {
                let reversed = bus.stops.iter().rev().cloned().collect::<Vec<_>>();
                self.add_pass(&mut graph, id, &reversed);
            }
        }
        info!(
            "Built graph: nodes {}, edges: {}",
            graph.vertex_count(),
            graph.edge_count()
        );
        graph
    }

    fn add_pass(&self, graph: &mut Graph, bus: BusId, stops: &[StopId]) {
        let hops = stops
            .iter()
            .tuple_windows()
            .map(|(&a, &b)| self.hop_distance(a, b))
            .collect::<Vec<_>>();

        for i in 0..stops.len() {
            let mut distance = 0u64;
            for j in i + 1..stops.len() {
                distance = distance.saturating_add(hops[j - 1]);
                graph.add_edge(Edge {
                    from: stops[i],
                    to: stops[j],
                    weight: self.weight(bus, j - i, distance),
                });
            }
        }
    }

    fn hop_distance(&self, from: StopId, to: StopId) -> u64 {
        match self.catalogue.declared_distance(from, to) {
            Some(meters) => meters,
            None => {
                trace!(
                    "No road distance between {} and {}, counting it as zero",
                    self.catalogue.stop(from).name,
                    self.catalogue.stop(to).name,
                );
                0
            }
        }
    }

    fn weight(&self, bus: BusId, span_count: usize, distance: u64) -> RideWeight {
        let ride_time = distance as f64 / self.settings.speed_meters_per_minute();
        RideWeight {
            bus,
            span_count,
            total_time: ride_time + self.settings.wait_time_minutes(),
        }
    }
}
