use crate::catalogue::Catalogue;
use crate::error::CatalogueError;
use crate::model::{BusKind, Point, Record, RouteSettings};
use crate::Res;
use serde::Deserialize;
use serde_json::{self, Value};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// A request document. Every mode reads the same shape and uses only the
/// parts it needs; `render_settings` and other unknown keys are ignored.
#[derive(Deserialize, Debug, Default)]
pub struct Document {
    #[serde(default)]
    pub base_requests: Vec<Value>,
    pub routing_settings: Option<RawRouteSettings>,
    pub serialization_settings: Option<SerializationSettings>,
    #[serde(default)]
    pub stat_requests: Vec<Value>,
}

#[derive(Deserialize, Debug, Copy, Clone)]
pub struct RawRouteSettings {
    pub bus_wait_time: u32,
    pub bus_velocity: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SerializationSettings {
    pub file: PathBuf,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        road_distances: BTreeMap<String, u64>,
    },
    Bus {
        name: String,
        stops: Vec<String>,
        is_roundtrip: bool,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum StatRequest {
    Bus { id: i64, name: String },
    Stop { id: i64, name: String },
    Route { id: i64, from: String, to: String },
}

impl StatRequest {
    pub fn id(&self) -> i64 {
        match *self {
            StatRequest::Bus { id, .. }
            | StatRequest::Stop { id, .. }
            | StatRequest::Route { id, .. } => id,
        }
    }
}

pub fn document(json: &str) -> Res<Document> {
    let document = serde_json::from_str(json)?;
    Ok(document)
}

pub fn route_settings(document: &Document) -> Res<RouteSettings> {
    let raw = document
        .routing_settings
        .ok_or("request document has no routing_settings")?;
    let settings = RouteSettings::new(raw.bus_wait_time, raw.bus_velocity)?;
    Ok(settings)
}

pub fn serialization_file(document: &Document) -> Res<PathBuf> {
    let settings = document
        .serialization_settings
        .as_ref()
        .ok_or("request document has no serialization_settings")?;
    Ok(settings.file.clone())
}

/// Decodes base requests one by one. Records that fail to decode are
/// reported and left out, and so is a repeated stop together with its road
/// distances.
pub fn records(base_requests: &[Value]) -> (Vec<Record>, Vec<CatalogueError>) {
    let mut records = Vec::new();
    let mut errors = Vec::new();
    let mut stops = HashSet::new();
    for request in base_requests {
        match BaseRequest::deserialize(request) {
            Ok(BaseRequest::Stop { ref name, .. }) if !stops.insert(name.clone()) => {
                warn!("Skipping base request {}: stop is already declared", request);
                errors.push(CatalogueError::DuplicateStop(name.clone()));
            }
            Ok(BaseRequest::Stop {
                name,
                latitude,
                longitude,
                road_distances,
            }) => {
                for (to, meters) in road_distances {
                    records.push(Record::Distance {
                        from: name.clone(),
                        to,
                        meters,
                    });
                }
                records.push(Record::Stop {
                    name,
                    loc: Point {
                        lat: latitude,
                        lng: longitude,
                    },
                });
            }
            Ok(BaseRequest::Bus {
                name,
                stops,
                is_roundtrip,
            }) => records.push(Record::Bus {
                name,
                stops,
                kind: BusKind::from_roundtrip(is_roundtrip),
            }),
            Err(err) => {
                warn!("Skipping base request {}: {}", request, err);
                errors.push(CatalogueError::InvalidRecord(err.to_string()));
            }
        }
    }
    (records, errors)
}

/// Fills the catalogue from base requests, returning every skipped record.
pub fn load_base(catalogue: &mut Catalogue, base_requests: &[Value]) -> Vec<CatalogueError> {
    let (records, mut errors) = records(base_requests);
    errors.extend(catalogue.ingest(records));
    errors
}

/// Decodes stat requests, dropping the ones that are malformed or of a kind
/// this tool does not answer.
pub fn stat_requests(values: &[Value]) -> Vec<StatRequest> {
    values
        .iter()
        .filter_map(|value| match StatRequest::deserialize(value) {
            Ok(request) => Some(request),
            Err(err) => {
                warn!("Skipping stat request {}: {}", value, err);
                None
            }
        })
        .collect()
}
