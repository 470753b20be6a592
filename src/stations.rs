//! Red Line station reference data.
//!
//! Fixed at compile time; the set of valid station identifiers never changes
//! while the process runs.

use crate::upstream::Location;

/// A transit station with the coordinates used as a walking origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    /// Provider stop identifier (e.g. `place-harsq`)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl Station {
    /// The station's position as a routing waypoint.
    pub fn location(&self) -> Location {
        Location::coordinates(self.latitude, self.longitude)
    }
}

/// Every station the service accepts.
pub const STATIONS: [Station; 13] = [
    Station {
        id: "place-knncl",
        name: "Kendall/MIT",
        latitude: 42.3624,
        longitude: -71.0852,
    },
    Station {
        id: "place-chmnl",
        name: "Charles/MGH",
        latitude: 42.3612,
        longitude: -71.0703,
    },
    Station {
        id: "place-pktrm",
        name: "Park Street",
        latitude: 42.3563,
        longitude: -71.0625,
    },
    Station {
        id: "place-dwnxg",
        name: "Downtown Crossing",
        latitude: 42.3555,
        longitude: -71.0605,
    },
    Station {
        id: "place-sstat",
        name: "South Station",
        latitude: 42.3519,
        longitude: -71.0552,
    },
    Station {
        id: "place-harsq",
        name: "Harvard",
        latitude: 42.3734,
        longitude: -71.1190,
    },
    Station {
        id: "place-portr",
        name: "Porter",
        latitude: 42.3884,
        longitude: -71.1191,
    },
    Station {
        id: "place-davis",
        name: "Davis",
        latitude: 42.3967,
        longitude: -71.1218,
    },
    Station {
        id: "place-cntsq",
        name: "Central Square",
        latitude: 42.3654,
        longitude: -71.1037,
    },
    Station {
        id: "place-asmnl",
        name: "Alewife",
        latitude: 42.3951,
        longitude: -71.1421,
    },
    Station {
        id: "place-jfk",
        name: "JFK/UMass",
        latitude: 42.3206,
        longitude: -71.0523,
    },
    Station {
        id: "place-andrw",
        name: "Andrew",
        latitude: 42.3298,
        longitude: -71.0571,
    },
    Station {
        id: "place-brdwy",
        name: "Broadway",
        latitude: 42.3426,
        longitude: -71.0569,
    },
];

/// Looks up a station by its exact identifier.
pub fn find(id: &str) -> Option<&'static Station> {
    STATIONS.iter().find(|station| station.id == id)
}
