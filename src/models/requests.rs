//! Query parameters for the HTTP API
//!
//! Every parameter is optional; absent or empty values fall back to the
//! configured defaults. A repeated parameter takes its first value.

/// Query for `GET /driving`
#[derive(Debug, Clone, Default)]
pub struct DrivingQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

/// Query for `GET /mbta`
#[derive(Debug, Clone, Default)]
pub struct MbtaQuery {
    pub station: Option<String>,
    /// Address to estimate walking time to from the station
    pub destination: Option<String>,
}

/// Query for `GET /all`; `destination` feeds both branches.
#[derive(Debug, Clone, Default)]
pub struct AllQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub station: Option<String>,
}

/// Decoded query string pairs, in request order.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// First value given for `name`, if any.
    pub fn first(&self, name: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }
}

impl From<QueryParams> for DrivingQuery {
    fn from(params: QueryParams) -> Self {
        Self {
            origin: params.first("origin"),
            destination: params.first("destination"),
        }
    }
}

impl From<QueryParams> for MbtaQuery {
    fn from(params: QueryParams) -> Self {
        Self {
            station: params.first("station"),
            destination: params.first("destination"),
        }
    }
}

impl From<QueryParams> for AllQuery {
    fn from(params: QueryParams) -> Self {
        Self {
            origin: params.first("origin"),
            destination: params.first("destination"),
            station: params.first("station"),
        }
    }
}

impl AllQuery {
    pub fn driving(&self) -> DrivingQuery {
        DrivingQuery {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
        }
    }

    pub fn mbta(&self) -> MbtaQuery {
        MbtaQuery {
            station: self.station.clone(),
            destination: self.destination.clone(),
        }
    }
}

/// Treats an empty parameter the same as a missing one.
pub fn provided(param: &Option<String>) -> Option<&str> {
    param.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provided_ignores_empty() {
        assert_eq!(provided(&None), None);
        assert_eq!(provided(&Some(String::new())), None);
        assert_eq!(provided(&Some("x".into())), Some("x"));
    }

    #[test]
    fn test_repeated_parameter_takes_first_value() {
        let params = QueryParams::new(vec![
            ("origin".into(), "1 Elm St, Boston".into()),
            ("station".into(), "place-portr".into()),
            ("origin".into(), "2 Oak St, Boston".into()),
        ]);

        let query = AllQuery::from(params);
        assert_eq!(query.origin.as_deref(), Some("1 Elm St, Boston"));
        assert_eq!(query.station.as_deref(), Some("place-portr"));
        assert_eq!(query.destination, None);
    }

    #[test]
    fn test_all_query_splits() {
        let query = AllQuery {
            origin: Some("a".into()),
            destination: Some("b".into()),
            station: Some("place-harsq".into()),
        };

        let driving = query.driving();
        assert_eq!(driving.origin.as_deref(), Some("a"));
        assert_eq!(driving.destination.as_deref(), Some("b"));

        let mbta = query.mbta();
        assert_eq!(mbta.station.as_deref(), Some("place-harsq"));
        assert_eq!(mbta.destination.as_deref(), Some("b"));
    }
}
