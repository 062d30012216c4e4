use crate::error::SettingsError;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    /// Distance between two points in meters.
    pub fn distance(&self, other: Point) -> f64 {
        fn radians(deg: f64) -> f64 {
            deg / 180.0 * ::std::f64::consts::PI
        }

        let r = 6371e3;
        let phi1 = radians(self.lat);
        let phi2 = radians(other.lat);
        let delta_phi = radians(other.lat - self.lat);
        let delta_lambda = radians(other.lng - self.lng);
        let a = (delta_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        c * r
    }
}

/// Ordinal of a stop, assigned at registration and never reused.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Copy, Clone)]
pub struct StopId(pub usize);

/// Ordinal of a bus in registration order.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Copy, Clone)]
pub struct BusId(pub usize);

#[derive(Debug, Clone)]
pub struct Stop {
    pub name: String,
    pub loc: Point,
}

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum BusKind {
    /// Starts and ends at the same stop, never reverses.
    Circular,
    /// Runs the stop list forward, then back again.
    ThereAndBack,
}

impl BusKind {
    pub fn from_roundtrip(is_roundtrip: bool) -> BusKind {
        if is_roundtrip {
            BusKind::Circular
        } else {
            BusKind::ThereAndBack
        }
    }

    pub fn is_roundtrip(&self) -> bool {
        *self == BusKind::Circular
    }
}

impl fmt::Display for BusKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BusKind::Circular => write!(f, "circular"),
            BusKind::ThereAndBack => write!(f, "there-and-back"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bus {
    pub name: String,
    pub kind: BusKind,
    pub stops: Vec<StopId>,
}

impl Bus {
    /// Every stop the bus visits, in order, including the implicit return leg.
    pub fn traversal(&self) -> Vec<StopId> {
        let mut stops = self.stops.clone();
        if self.kind == BusKind::ThereAndBack {
            stops.extend(self.stops.iter().rev().skip(1));
        }
        stops
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BusInfo {
    pub stop_count: usize,
    pub unique_stop_count: usize,
    /// Sum of road distances along the full traversal, in meters.
    pub route_length: u64,
    /// `None` when the great-circle length of the route is zero.
    pub curvature: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct RouteSettings {
    /// Minutes spent waiting at every boarding.
    pub bus_wait_time: u32,
    /// Bus speed in km/h.
    pub bus_velocity: u32,
}

impl RouteSettings {
    pub fn new(bus_wait_time: u32, bus_velocity: u32) -> Result<RouteSettings, SettingsError> {
        if bus_velocity == 0 {
            return Err(SettingsError::ZeroVelocity);
        }
        Ok(RouteSettings {
            bus_wait_time,
            bus_velocity,
        })
    }

    pub fn speed_meters_per_minute(&self) -> f64 {
        f64::from(self.bus_velocity) * 1000.0 / 60.0
    }

    pub fn wait_time_minutes(&self) -> f64 {
        f64::from(self.bus_wait_time)
    }
}

/// A single ingestion call. Stops are referenced by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Stop {
        name: String,
        loc: Point,
    },
    Distance {
        from: String,
        to: String,
        meters: u64,
    },
    Bus {
        name: String,
        stops: Vec<String>,
        kind: BusKind,
    },
}

impl Record {
    /// Stops must be registered before distances and distances before buses.
    pub fn phase(&self) -> u8 {
        match *self {
            Record::Stop { .. } => 0,
            Record::Distance { .. } => 1,
            Record::Bus { .. } => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary<'a> {
    pub segments: Vec<Segment<'a>>,
    /// Minutes, waiting included.
    pub total_time: f64,
}

impl<'a> Itinerary<'a> {
    pub fn empty() -> Itinerary<'a> {
        Itinerary {
            segments: Vec::new(),
            total_time: 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Segment<'a> {
    Wait(WaitSegment<'a>),
    Bus(BusSegment<'a>),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WaitSegment<'a> {
    pub stop: &'a str,
    pub time: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BusSegment<'a> {
    pub bus: &'a str,
    pub span_count: usize,
    pub time: f64,
}

impl<'a> fmt::Display for Segment<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Segment::Wait(ref seg) => write!(f, "{}", seg),
            Segment::Bus(ref seg) => write!(f, "{}", seg),
        }
    }
}

impl<'a> fmt::Display for WaitSegment<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Wait at {} for {} minutes", self.stop, self.time)
    }
}

impl<'a> fmt::Display for BusSegment<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Take bus {} for {} stops, ride time: {:.2} minutes",
            self.bus, self.span_count, self.time,
        )
    }
}
