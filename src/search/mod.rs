pub mod dijkstra;
pub mod graph;

use self::dijkstra::{RouteInfo, Router};
use self::graph::GraphBuilder;

use crate::catalogue::Catalogue;
use crate::model::{BusSegment, Itinerary, RouteSettings, Segment, WaitSegment};

/// Answers fastest-route queries between named stops.
///
/// The ride graph is built once from the catalogue in `new` and is only read
/// afterwards.
pub struct Searcher<'a> {
    catalogue: &'a Catalogue,
    settings: RouteSettings,
    router: Router,
}

impl<'a> Searcher<'a> {
    pub fn new(catalogue: &'a Catalogue, settings: RouteSettings) -> Searcher<'a> {
        let graph = GraphBuilder::new(catalogue, settings).build();
        Searcher {
            catalogue,
            settings,
            router: Router::new(graph),
        }
    }

    /// Fastest itinerary between two stops. `None` if either stop is unknown
    /// or `to` cannot be reached from `from`.
    pub fn find_route(&self, from: &str, to: &str) -> Option<Itinerary<'a>> {
        let from_id = self.catalogue.stop_id(from)?;
        let to_id = self.catalogue.stop_id(to)?;
        let route = self.router.build_route(from_id, to_id);
        match route {
            Some(ref route) => debug!(
                "Route {} -> {}: {} rides, {:.2} minutes",
                from,
                to,
                route.edges.len(),
                route.total_weight
            ),
            None => debug!("No route from {} to {}", from, to),
        }
        route.map(|route| self.resolve(&route))
    }

    /// Splits every ride of a path into a wait at the boarding stop and the
    /// ride itself.
    pub fn resolve(&self, route: &RouteInfo) -> Itinerary<'a> {
        let wait_time = self.settings.wait_time_minutes();
        let mut itinerary = Itinerary::empty();
        for &id in &route.edges {
            let edge = self.router.graph().edge(id);
            itinerary.segments.push(Segment::Wait(WaitSegment {
                stop: &self.catalogue.stop(edge.from).name,
                time: wait_time,
            }));
            itinerary.segments.push(Segment::Bus(BusSegment {
                bus: &self.catalogue.bus(edge.weight.bus).name,
                span_count: edge.weight.span_count,
                time: edge.weight.total_time - wait_time,
            }));
            itinerary.total_time += edge.weight.total_time;
        }
        itinerary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BusKind, Point};
    use proptest::prelude::*;

    fn point(lat: f64, lng: f64) -> Point {
        Point { lat, lng }
    }

    fn abc() -> Catalogue {
        let mut catalogue = Catalogue::new();
        catalogue.add_stop("A", point(0.0, 0.0)).unwrap();
        catalogue.add_stop("B", point(0.0, 1.0)).unwrap();
        catalogue.add_stop("C", point(0.0, 2.0)).unwrap();
        catalogue.set_distance("A", "B", 1000).unwrap();
        catalogue.set_distance("B", "C", 1000).unwrap();
        catalogue
            .add_bus("1", &["A", "B", "C"], BusKind::Circular)
            .unwrap();
        catalogue
    }

    fn settings() -> RouteSettings {
        RouteSettings::new(5, 60).unwrap()
    }

    #[test]
    fn single_ride_itinerary() {
        let catalogue = abc();
        let searcher = Searcher::new(&catalogue, settings());
        let itinerary = searcher.find_route("A", "C").unwrap();
        assert_eq!(
            itinerary.segments,
            vec![
                Segment::Wait(WaitSegment {
                    stop: "A",
                    time: 5.0
                }),
                Segment::Bus(BusSegment {
                    bus: "1",
                    span_count: 2,
                    time: 2.0
                }),
            ]
        );
        assert!((itinerary.total_time - 7.0).abs() < 1e-9);
    }

    #[test]
    fn same_stop_needs_no_itinerary() {
        let catalogue = abc();
        let searcher = Searcher::new(&catalogue, settings());
        for stop in &["A", "B", "C"] {
            assert_eq!(searcher.find_route(stop, stop), Some(Itinerary::empty()));
        }
    }

    #[test]
    fn unknown_or_unreachable_stops_have_no_route() {
        let mut catalogue = abc();
        catalogue.add_stop("island", point(3.0, 3.0)).unwrap();
        let searcher = Searcher::new(&catalogue, settings());
        assert_eq!(searcher.find_route("A", "island"), None);
        assert_eq!(searcher.find_route("C", "A"), None);
        assert_eq!(searcher.find_route("A", "Atlantis"), None);
        assert_eq!(searcher.find_route("Atlantis", "A"), None);
    }

    #[test]
    fn transfer_waits_twice() {
        let mut catalogue = abc();
        catalogue.add_stop("D", point(1.0, 2.0)).unwrap();
        catalogue.set_distance("C", "D", 3000).unwrap();
        catalogue
            .add_bus("14", &["D", "C"], BusKind::ThereAndBack)
            .unwrap();
        let searcher = Searcher::new(&catalogue, settings());

        let itinerary = searcher.find_route("B", "D").unwrap();
        let lines = itinerary
            .segments
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "Wait at B for 5 minutes",
                "Take bus 1 for 1 stops, ride time: 1.00 minutes",
                "Wait at C for 5 minutes",
                "Take bus 14 for 1 stops, ride time: 3.00 minutes",
            ]
        );
        assert!((itinerary.total_time - 14.0).abs() < 1e-9);

        // the there-and-back line runs both ways
        assert!(searcher.find_route("D", "C").is_some());
    }

    #[test]
    fn total_time_matches_router_weight() {
        let mut catalogue = abc();
        catalogue.set_distance("C", "A", 500).unwrap();
        catalogue
            .add_bus("back", &["C", "A"], BusKind::Circular)
            .unwrap();
        let searcher = Searcher::new(&catalogue, settings());

        let from = catalogue.stop_id("B").unwrap();
        let to = catalogue.stop_id("A").unwrap();
        let route = searcher.router.build_route(from, to).unwrap();
        let itinerary = searcher.resolve(&route);
        assert_eq!(itinerary.segments.len(), 2 * route.edges.len());
        assert!((itinerary.total_time - route.total_weight).abs() < 1e-9);
    }

    fn stop_name(i: usize) -> String {
        format!("S{}", i)
    }

    fn network(
        distances: &[(usize, usize, u64)],
        buses: &[(Vec<usize>, bool)],
    ) -> Catalogue {
        let mut catalogue = Catalogue::new();
        for i in 0..6 {
            catalogue
                .add_stop(&stop_name(i), point(i as f64 * 0.01, 0.0))
                .unwrap();
        }
        for &(a, b, meters) in distances {
            catalogue
                .set_distance(&stop_name(a), &stop_name(b), meters)
                .unwrap();
        }
        for (i, (stops, is_roundtrip)) in buses.iter().enumerate() {
            let stops = stops.iter().map(|&s| stop_name(s)).collect::<Vec<_>>();
            catalogue
                .add_bus(&format!("{}", i), &stops, BusKind::from_roundtrip(*is_roundtrip))
                .unwrap();
        }
        catalogue
    }

    proptest! {
        /// Going through an intermediate stop is never faster than the best route.
        #[test]
        fn routes_obey_triangle_inequality(
            distances in proptest::collection::vec((0usize..6, 0usize..6, 0u64..5_000), 0..20),
            buses in proptest::collection::vec(
                (proptest::collection::vec(0usize..6, 1..5), any::<bool>()),
                1..4,
            ),
        ) {
            let catalogue = network(&distances, &buses);
            let searcher = Searcher::new(&catalogue, RouteSettings::new(3, 40).unwrap());

            for a in 0..6 {
                for b in 0..6 {
                    for c in 0..6 {
                        let ab = searcher.find_route(&stop_name(a), &stop_name(b));
                        let bc = searcher.find_route(&stop_name(b), &stop_name(c));
                        if let (Some(ab), Some(bc)) = (ab, bc) {
                            let ac = searcher.find_route(&stop_name(a), &stop_name(c));
                            prop_assert!(ac.is_some());
                            let ac = ac.unwrap();
                            prop_assert!(ac.total_time <= ab.total_time + bc.total_time + 1e-9);
                        }
                    }
                }
            }
        }

        /// Every ride in an itinerary is preceded by exactly one wait.
        #[test]
        fn itineraries_alternate_wait_and_ride(
            distances in proptest::collection::vec((0usize..6, 0usize..6, 0u64..5_000), 0..20),
            buses in proptest::collection::vec(
                (proptest::collection::vec(0usize..6, 1..5), any::<bool>()),
                1..4,
            ),
        ) {
            let catalogue = network(&distances, &buses);
            let searcher = Searcher::new(&catalogue, RouteSettings::new(3, 40).unwrap());

            for a in 0..6 {
                for b in 0..6 {
                    if let Some(itinerary) = searcher.find_route(&stop_name(a), &stop_name(b)) {
                        prop_assert_eq!(itinerary.segments.len() % 2, 0);
                        for pair in itinerary.segments.chunks(2) {
                            let is_wait = matches!(pair[0], Segment::Wait(_));
                            let is_bus = matches!(pair[1], Segment::Bus(_));
                            prop_assert!(is_wait && is_bus);
                        }
                    }
                }
            }
        }
    }
}
