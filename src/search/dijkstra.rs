use super::graph::{EdgeId, Graph};
use crate::model::StopId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Edges of an optimal path, in travel order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    pub edges: Vec<EdgeId>,
    pub total_weight: f64,
}

#[derive(Debug, Copy, Clone)]
struct HeapItem {
    cost: f64,
    vertex: StopId,
}

impl Ord for HeapItem {
    fn cmp(&self, other: &HeapItem) -> Ordering {
        let order = self
            .cost
            .total_cmp(&other.cost)
            .then_with(|| self.vertex.cmp(&other.vertex));
        // we want cheapest (and then lowest vertex) items to come first, so they must be greatest
        order.reverse()
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

/// Shortest-path engine over a finished graph. The graph is never modified,
/// so any number of queries can be answered from one instance.
#[derive(Debug, Clone)]
pub struct Router {
    graph: Graph,
}

impl Router {
    pub fn new(graph: Graph) -> Router {
        Router { graph }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Runs Dijkstra from `source` over the whole graph.
    pub fn shortest_paths(&self, source: StopId) -> PathTree {
        let vertex_count = self.graph.vertex_count();
        let mut costs = vec![None; vertex_count];
        let mut parents = vec![None; vertex_count];
        let mut settled = vec![false; vertex_count];
        let mut queue = BinaryHeap::new();

        costs[source.0] = Some(0.0);
        queue.push(HeapItem {
            cost: 0.0,
            vertex: source,
        });

        while let Some(item) = queue.pop() {
            if settled[item.vertex.0] {
                continue;
            }
            settled[item.vertex.0] = true;
            trace!("Settled vertex {} at {}", item.vertex.0, item.cost);

            for (id, edge) in self.graph.outgoing(item.vertex) {
                let cost = item.cost + edge.weight.total_time;
                let improves = match costs[edge.to.0] {
                    Some(known) => cost < known,
                    None => true,
                };
                if improves {
                    costs[edge.to.0] = Some(cost);
                    parents[edge.to.0] = Some(id);
                    queue.push(HeapItem {
                        cost,
                        vertex: edge.to,
                    });
                }
            }
        }

        PathTree {
            graph: &self.graph,
            costs,
            parents,
        }
    }

    /// Fastest path from `from` to `to`, or `None` when `to` cannot be reached.
    /// A stop is reached from itself for free, with no edges.
    pub fn build_route(&self, from: StopId, to: StopId) -> Option<RouteInfo> {
        if from == to {
            return Some(RouteInfo {
                edges: Vec::new(),
                total_weight: 0.0,
            });
        }
        self.shortest_paths(from).route_to(to)
    }
}

/// Result of a single-source search: best cost and incoming edge per vertex.
#[derive(Debug, Clone)]
pub struct PathTree<'g> {
    graph: &'g Graph,
    costs: Vec<Option<f64>>,
    parents: Vec<Option<EdgeId>>,
}

impl<'g> PathTree<'g> {
    pub fn cost(&self, target: StopId) -> Option<f64> {
        self.costs[target.0]
    }

    pub fn route_to(&self, target: StopId) -> Option<RouteInfo> {
        let total_weight = self.cost(target)?;
        let mut edges = Vec::new();
        let mut vertex = target;
        while let Some(id) = self.parents[vertex.0] {
            edges.push(id);
            vertex = self.graph.edge(id).from;
        }
        edges.reverse();
        Some(RouteInfo {
            edges,
            total_weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::graph::GraphBuilder;
    use super::*;
    use crate::catalogue::Catalogue;
    use crate::model::{BusKind, Point, RouteSettings};

    fn catalogue() -> Catalogue {
        // A - B - C on bus "slow", A - C directly on bus "fast" but longer
        let mut catalogue = Catalogue::new();
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            catalogue
                .add_stop(name, Point { lat: 0.0, lng: i as f64 * 0.01 })
                .unwrap();
        }
        catalogue.set_distance("A", "B", 1000).unwrap();
        catalogue.set_distance("B", "C", 1000).unwrap();
        catalogue.set_distance("A", "C", 9000).unwrap();
        catalogue
            .add_bus("slow", &["A", "B", "C"], BusKind::Circular)
            .unwrap();
        catalogue
            .add_bus("fast", &["A", "C"], BusKind::Circular)
            .unwrap();
        catalogue
    }

    fn router(catalogue: &Catalogue) -> Router {
        let settings = RouteSettings::new(2, 60).unwrap();
        Router::new(GraphBuilder::new(catalogue, settings).build())
    }

    #[test]
    fn finds_cheapest_path() {
        let catalogue = catalogue();
        let router = router(&catalogue);
        let route = router.build_route(StopId(0), StopId(2)).unwrap();
        assert_eq!(route.edges.len(), 1);
        let edge = router.graph().edge(route.edges[0]);
        assert_eq!(catalogue.bus(edge.weight.bus).name, "slow");
        assert_eq!(edge.weight.span_count, 2);
        assert!((route.total_weight - 4.0).abs() < 1e-9);
    }

    #[test]
    fn same_stop_is_free() {
        let catalogue = catalogue();
        let route = router(&catalogue).build_route(StopId(3), StopId(3)).unwrap();
        assert!(route.edges.is_empty());
        assert_eq!(route.total_weight, 0.0);
    }

    #[test]
    fn unreachable_stop_has_no_route() {
        let catalogue = catalogue();
        let router = router(&catalogue);
        assert_eq!(router.build_route(StopId(0), StopId(3)), None);
        // circular buses never run backwards
        assert_eq!(router.build_route(StopId(2), StopId(0)), None);
    }

    #[test]
    fn path_tree_answers_every_target() {
        let catalogue = catalogue();
        let router = router(&catalogue);
        let tree = router.shortest_paths(StopId(0));
        assert_eq!(tree.cost(StopId(0)), Some(0.0));
        assert!((tree.cost(StopId(1)).unwrap() - 3.0).abs() < 1e-9);
        assert!((tree.cost(StopId(2)).unwrap() - 4.0).abs() < 1e-9);
        assert_eq!(tree.cost(StopId(3)), None);
        assert!(tree.route_to(StopId(0)).unwrap().edges.is_empty());
    }

    #[test]
    fn chained_path_is_reported_in_travel_order() {
        let mut catalogue = catalogue();
        catalogue.set_distance("C", "D", 500).unwrap();
        catalogue
            .add_bus("last", &["C", "D"], BusKind::Circular)
            .unwrap();
        let router = router(&catalogue);

        let route = router.build_route(StopId(0), StopId(3)).unwrap();
        let hops = route
            .edges
            .iter()
            .map(|&id| {
                let edge = router.graph().edge(id);
                (edge.from, edge.to)
            })
            .collect::<Vec<_>>();
        assert_eq!(hops, vec![(StopId(0), StopId(2)), (StopId(2), StopId(3))]);
        assert!((route.total_weight - 6.5).abs() < 1e-9);
    }

    #[test]
    fn equal_cost_paths_go_through_the_lower_stop() {
        // S -> L -> T and S -> R -> T cost the same, each hop on its own bus.
        // Buses go in by name, so S -> R is scanned before S -> L.
        let mut catalogue = Catalogue::new();
        for name in &["S", "L", "R", "T"] {
            catalogue.add_stop(name, Point { lat: 1.0, lng: 1.0 }).unwrap();
        }
        let hops = [("c", "S", "R"), ("d", "S", "L"), ("a", "R", "T"), ("b", "L", "T")];
        for &(bus, from, to) in &hops {
            catalogue.set_distance(from, to, 1000).unwrap();
            catalogue
                .add_bus(bus, &[from, to], BusKind::Circular)
                .unwrap();
        }

        let router = router(&catalogue);
        let route = router.build_route(StopId(0), StopId(3)).unwrap();
        let stops = route
            .edges
            .iter()
            .map(|&id| router.graph().edge(id).to)
            .collect::<Vec<_>>();
        assert_eq!(stops, vec![StopId(1), StopId(3)]);
        assert!((route.total_weight - 6.0).abs() < 1e-9);
    }
}
