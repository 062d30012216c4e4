use crate::catalogue::Catalogue;
use crate::de::StatRequest;
use crate::model::{BusInfo, Itinerary, Segment};
use crate::search::Searcher;
use serde_json::{json, Value};
use std::collections::BTreeSet;

const NOT_FOUND: &str = "not found";

/// Answers stat requests in order, one JSON object per request.
pub fn responses(requests: &[StatRequest], catalogue: &Catalogue, searcher: &Searcher) -> Value {
    let answers = requests
        .iter()
        .map(|request| {
            let mut answer = match *request {
                StatRequest::Bus { ref name, .. } => bus(catalogue.bus_info(name)),
                StatRequest::Stop { ref name, .. } => stop(catalogue.stop_info(name)),
                StatRequest::Route {
                    ref from, ref to, ..
                } => route(searcher.find_route(from, to)),
            };
            answer["request_id"] = json!(request.id());
            answer
        })
        .collect::<Vec<_>>();
    info!("Answered {} stat requests", answers.len());
    Value::Array(answers)
}

fn not_found() -> Value {
    json!({ "error_message": NOT_FOUND })
}

fn bus(info: Option<BusInfo>) -> Value {
    match info {
        Some(info) => json!({
            "curvature": info.curvature,
            "route_length": info.route_length,
            "stop_count": info.stop_count,
            "unique_stop_count": info.unique_stop_count,
        }),
        None => not_found(),
    }
}

fn stop(buses: Option<BTreeSet<&str>>) -> Value {
    match buses {
        Some(buses) => json!({ "buses": buses }),
        None => not_found(),
    }
}

fn route(itinerary: Option<Itinerary>) -> Value {
    let itinerary = match itinerary {
        Some(itinerary) => itinerary,
        None => return not_found(),
    };
    let items = itinerary
        .segments
        .iter()
        .map(|segment| match *segment {
            Segment::Wait(ref wait) => json!({
                "type": "Wait",
                "stop_name": wait.stop,
                "time": wait.time,
            }),
            Segment::Bus(ref ride) => json!({
                "type": "Bus",
                "bus": ride.bus,
                "span_count": ride.span_count,
                "time": ride.time,
            }),
        })
        .collect::<Vec<_>>();
    json!({
        "items": items,
        "total_time": itinerary.total_time,
    })
}
