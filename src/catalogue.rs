use crate::error::CatalogueError;
use crate::model::{Bus, BusId, BusInfo, BusKind, Point, Record, Stop, StopId};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Stops, buses and road distances of a transit network.
///
/// Stops and buses live in append-only arenas and are referred to by their
/// ordinal everywhere else, so the catalogue can be flattened into a record
/// list and rebuilt with the same ordinals.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    stop_ids: HashMap<String, StopId>,
    // buses serving each stop, indexed by stop ordinal
    stop_buses: Vec<BTreeSet<BusId>>,
    buses: Vec<Bus>,
    bus_ids: BTreeMap<String, BusId>,
    distances: BTreeMap<(StopId, StopId), u64>,
}

impl Catalogue {
    pub fn new() -> Catalogue {
        Catalogue::default()
    }

    pub fn add_stop(&mut self, name: &str, loc: Point) -> Result<StopId, CatalogueError> {
        if self.stop_ids.contains_key(name) {
            return Err(CatalogueError::DuplicateStop(name.to_string()));
        }
        let id = StopId(self.stops.len());
        self.stops.push(Stop {
            name: name.to_string(),
            loc,
        });
        self.stop_ids.insert(name.to_string(), id);
        self.stop_buses.push(BTreeSet::new());
        trace!("Registered stop {} as {:?}", name, id);
        Ok(id)
    }

    pub fn add_bus<S: AsRef<str>>(
        &mut self,
        name: &str,
        stops: &[S],
        kind: BusKind,
    ) -> Result<BusId, CatalogueError> {
        if self.bus_ids.contains_key(name) {
            return Err(CatalogueError::DuplicateBus(name.to_string()));
        }
        if stops.is_empty() {
            return Err(CatalogueError::EmptyRoute(name.to_string()));
        }
        let stops = stops
            .iter()
            .map(|stop| {
                let stop = stop.as_ref();
                self.stop_id(stop)
                    .ok_or_else(|| CatalogueError::UnknownStop(stop.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let id = BusId(self.buses.len());
        for stop in &stops {
            self.stop_buses[stop.0].insert(id);
        }
        self.buses.push(Bus {
            name: name.to_string(),
            kind,
            stops,
        });
        self.bus_ids.insert(name.to_string(), id);
        trace!("Registered {} bus {} as {:?}", kind, name, id);
        Ok(id)
    }

    /// Records the road distance from one stop to another. A repeated
    /// declaration for the same ordered pair replaces the previous one.
    pub fn set_distance(&mut self, from: &str, to: &str, meters: u64) -> Result<(), CatalogueError> {
        let from = self
            .stop_id(from)
            .ok_or_else(|| CatalogueError::UnknownStop(from.to_string()))?;
        let to = self
            .stop_id(to)
            .ok_or_else(|| CatalogueError::UnknownStop(to.to_string()))?;
        self.distances.insert((from, to), meters);
        Ok(())
    }

    /// Applies records one at a time: stops first, then distances, then buses.
    /// A failing record is skipped; its error is logged and returned.
    pub fn ingest<I>(&mut self, records: I) -> Vec<CatalogueError>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut records = records.into_iter().collect::<Vec<_>>();
        records.sort_by_key(Record::phase);

        let mut errors = Vec::new();
        for record in records {
            let result = match record {
                Record::Stop { name, loc } => self.add_stop(&name, loc).map(|_| ()),
                Record::Distance { from, to, meters } => self.set_distance(&from, &to, meters),
                Record::Bus { name, stops, kind } => self.add_bus(&name, &stops, kind).map(|_| ()),
            };
            if let Err(err) = result {
                warn!("Skipping record: {}", err);
                errors.push(err);
            }
        }
        info!(
            "Ingested {} stops, {} buses, {} distances ({} records skipped)",
            self.stops.len(),
            self.buses.len(),
            self.distances.len(),
            errors.len(),
        );
        errors
    }

    pub fn stop_id(&self, name: &str) -> Option<StopId> {
        self.stop_ids.get(name).cloned()
    }

    /// Panics if `id` was not issued by this catalogue.
    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id.0]
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Stops in ordinal order.
    pub fn stops(&self) -> impl Iterator<Item = (StopId, &Stop)> {
        self.stops.iter().enumerate().map(|(i, stop)| (StopId(i), stop))
    }

    /// Panics if `id` was not issued by this catalogue.
    pub fn bus(&self, id: BusId) -> &Bus {
        &self.buses[id.0]
    }

    pub fn bus_by_name(&self, name: &str) -> Option<&Bus> {
        self.bus_ids.get(name).map(|&id| self.bus(id))
    }

    /// Buses in ascending name order.
    pub fn buses(&self) -> impl Iterator<Item = (BusId, &Bus)> {
        self.bus_ids.values().map(move |&id| (id, self.bus(id)))
    }

    /// Buses in registration order.
    pub fn buses_by_id(&self) -> impl Iterator<Item = (BusId, &Bus)> {
        self.buses.iter().enumerate().map(|(i, bus)| (BusId(i), bus))
    }

    /// Declared distances in `(from, to)` order.
    pub fn distances(&self) -> impl Iterator<Item = (StopId, StopId, u64)> + '_ {
        self.distances
            .iter()
            .map(|(&(from, to), &meters)| (from, to, meters))
    }

    /// Road distance from `from` to `to`, falling back to the reverse
    /// direction when only that one is declared.
    pub fn declared_distance(&self, from: StopId, to: StopId) -> Option<u64> {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .cloned()
    }

    /// Like `declared_distance`, but an undeclared pair counts as zero meters.
    pub fn distance(&self, from: StopId, to: StopId) -> u64 {
        self.declared_distance(from, to).unwrap_or(0)
    }

    /// Route length saturates at `u64::MAX` instead of overflowing.
    pub fn bus_info(&self, name: &str) -> Option<BusInfo> {
        let bus = self.bus_by_name(name)?;
        let traversal = bus.traversal();

        let (route_length, geo_length) = traversal.iter().tuple_windows().fold(
            (0u64, 0.0f64),
            |(road, geo), (&a, &b)| {
                (
                    road.saturating_add(self.distance(a, b)),
                    geo + self.stop(a).loc.distance(self.stop(b).loc),
                )
            },
        );
        let unique_stop_count = bus.stops.iter().collect::<HashSet<_>>().len();
        let curvature = if geo_length > 0.0 {
            Some(route_length as f64 / geo_length)
        } else {
            None
        };

        Some(BusInfo {
            stop_count: traversal.len(),
            unique_stop_count,
            route_length,
            curvature,
        })
    }

    /// Names of the buses serving a stop, in ascending order.
    pub fn stop_info(&self, name: &str) -> Option<BTreeSet<&str>> {
        let id = self.stop_id(name)?;
        let buses = self.stop_buses[id.0]
            .iter()
            .map(|&bus| self.bus(bus).name.as_str())
            .collect();
        Some(buses)
    }
}
