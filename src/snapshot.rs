use crate::catalogue::Catalogue;
use crate::error::SnapshotError;
use crate::model::{BusKind, Point, RouteSettings};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub const VERSION: u32 = 1;

/// A catalogue and its route settings as flat lists that refer to stops by
/// ordinal. Restoring replays them through the regular catalogue calls, so
/// the restored catalogue hands out the same stop ordinals as the saved one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub version: u32,
    /// In ordinal order.
    pub stops: Vec<SnapshotStop>,
    /// In `(from, to)` order.
    pub distances: Vec<SnapshotDistance>,
    /// In registration order.
    pub buses: Vec<SnapshotBus>,
    pub routing_settings: RouteSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotStop {
    pub name: String,
    pub loc: Point,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotDistance {
    pub from: usize,
    pub to: usize,
    pub meters: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotBus {
    pub name: String,
    pub stops: Vec<usize>,
    pub is_roundtrip: bool,
}

impl Snapshot {
    pub fn capture(catalogue: &Catalogue, settings: RouteSettings) -> Snapshot {
        let stops = catalogue
            .stops()
            .map(|(_, stop)| SnapshotStop {
                name: stop.name.clone(),
                loc: stop.loc,
            })
            .collect();
        let distances = catalogue
            .distances()
            .map(|(from, to, meters)| SnapshotDistance {
                from: from.0,
                to: to.0,
                meters,
            })
            .collect();
        let buses = catalogue
            .buses_by_id()
            .map(|(_, bus)| SnapshotBus {
                name: bus.name.clone(),
                stops: bus.stops.iter().map(|stop| stop.0).collect(),
                is_roundtrip: bus.kind.is_roundtrip(),
            })
            .collect();
        Snapshot {
            version: VERSION,
            stops,
            distances,
            buses,
            routing_settings: settings,
        }
    }

    pub fn restore(&self) -> Result<(Catalogue, RouteSettings), SnapshotError> {
        if self.version != VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        let settings = RouteSettings::new(
            self.routing_settings.bus_wait_time,
            self.routing_settings.bus_velocity,
        )?;

        let mut catalogue = Catalogue::new();
        for stop in &self.stops {
            catalogue
                .add_stop(&stop.name, stop.loc)
                .map_err(|err| SnapshotError::Corrupt(err.to_string()))?;
        }
        for distance in &self.distances {
            let from = self.stop_name(distance.from)?;
            let to = self.stop_name(distance.to)?;
            catalogue
                .set_distance(from, to, distance.meters)
                .map_err(|err| SnapshotError::Corrupt(err.to_string()))?;
        }
        for bus in &self.buses {
            let stops = bus
                .stops
                .iter()
                .map(|&ordinal| self.stop_name(ordinal))
                .collect::<Result<Vec<_>, _>>()?;
            catalogue
                .add_bus(&bus.name, &stops, BusKind::from_roundtrip(bus.is_roundtrip))
                .map_err(|err| SnapshotError::Corrupt(err.to_string()))?;
        }
        Ok((catalogue, settings))
    }

    fn stop_name(&self, ordinal: usize) -> Result<&str, SnapshotError> {
        self.stops
            .get(ordinal)
            .map(|stop| stop.name.as_str())
            .ok_or_else(|| SnapshotError::Corrupt(format!("stop ordinal {} out of range", ordinal)))
    }
}

pub fn write<W: Write>(snapshot: &Snapshot, writer: &mut W) -> Result<usize, SnapshotError> {
    let written = bincode::serde::encode_into_std_write(snapshot, writer, bincode::config::standard())?;
    Ok(written)
}

pub fn read<R: Read>(reader: &mut R) -> Result<Snapshot, SnapshotError> {
    let snapshot = bincode::serde::decode_from_std_read(reader, bincode::config::standard())?;
    Ok(snapshot)
}

pub fn save(catalogue: &Catalogue, settings: RouteSettings, path: &Path) -> Result<(), SnapshotError> {
    let snapshot = Snapshot::capture(catalogue, settings);
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write(&snapshot, &mut writer)?;
    writer.flush()?;
    info!(
        "Wrote snapshot to {}: {} stops, {} buses, {} bytes",
        path.display(),
        snapshot.stops.len(),
        snapshot.buses.len(),
        written
    );
    Ok(())
}

pub fn load(path: &Path) -> Result<(Catalogue, RouteSettings), SnapshotError> {
    let mut reader = BufReader::new(File::open(path)?);
    let snapshot = read(&mut reader)?;
    info!(
        "Read snapshot from {}: {} stops, {} buses",
        path.display(),
        snapshot.stops.len(),
        snapshot.buses.len()
    );
    snapshot.restore()
}
