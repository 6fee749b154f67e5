use super::ServiceError;

/// The fields search runs over, shared by venues and artists.
#[derive(Debug)]
pub struct SearchRecord {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug)]
pub struct NameMatch {
    pub id: i64,
    pub name: String,
}

#[derive(Debug)]
pub struct LocationMatch {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug)]
pub struct MatchSet<T> {
    pub count: usize,
    pub data: Vec<T>,
}

/// Both passes are returned together, name matches first, even when one of
/// them is empty.
#[derive(Debug)]
pub struct SearchResults {
    pub name_matches: MatchSet<NameMatch>,
    pub location_matches: MatchSet<LocationMatch>,
}

/// Case-insensitive substring search, run twice over the full collection:
/// once against `name` and once against the formatted `"city, state"`.
///
/// An empty or whitespace-only term is a usage error, not an empty result.
pub fn match_records(term: &str, records: &[SearchRecord]) -> Result<SearchResults, ServiceError> {
    if term.trim().is_empty() {
        return Err(ServiceError::EmptySearchTerm);
    }
    let keyword = term.to_lowercase();

    let mut name_matches = Vec::new();
    for record in records {
        if record.name.to_lowercase().contains(&keyword) {
            name_matches.push(NameMatch {
                id: record.id,
                name: record.name.clone(),
            });
        }
    }

    let mut location_matches = Vec::new();
    for record in records {
        let location = format!("{}, {}", record.city.to_lowercase(), record.state.to_lowercase());
        if location.contains(&keyword) {
            location_matches.push(LocationMatch {
                id: record.id,
                name: record.name.clone(),
                city: record.city.clone(),
                state: record.state.clone(),
            });
        }
    }

    Ok(SearchResults {
        name_matches: MatchSet {
            count: name_matches.len(),
            data: name_matches,
        },
        location_matches: MatchSet {
            count: location_matches.len(),
            data: location_matches,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, city: &str, state: &str) -> SearchRecord {
        SearchRecord {
            id,
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
        }
    }

    fn sample() -> Vec<SearchRecord> {
        vec![
            record(1, "The Musical Hop", "San Francisco", "CA"),
            record(2, "Park Square Live Music & Coffee", "San Francisco", "CA"),
            record(3, "The Dueling Pianos Bar", "New York", "NY"),
        ]
    }

    #[test]
    fn partial_name_match_is_case_insensitive() {
        let results = match_records("Hop", &sample()).unwrap();
        assert_eq!(results.name_matches.count, 1);
        assert_eq!(results.name_matches.data[0].name, "The Musical Hop");
    }

    #[test]
    fn name_match_returns_every_hit() {
        let results = match_records("Music", &sample()).unwrap();
        let names: Vec<_> = results.name_matches.data.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["The Musical Hop", "Park Square Live Music & Coffee"]
        );
        assert_eq!(results.name_matches.count, 2);
    }

    #[test]
    fn location_match_uses_city_comma_state() {
        let results = match_records("san francisco, ca", &sample()).unwrap();
        assert_eq!(results.location_matches.count, 2);
        assert_eq!(results.location_matches.data[0].city, "San Francisco");
        assert_eq!(results.location_matches.data[0].state, "CA");
        // Name pass saw the same collection but matched nothing
        assert_eq!(results.name_matches.count, 0);
    }

    #[test]
    fn blank_term_is_a_usage_error() {
        assert!(matches!(
            match_records("", &sample()),
            Err(ServiceError::EmptySearchTerm)
        ));
        assert!(matches!(
            match_records("   ", &sample()),
            Err(ServiceError::EmptySearchTerm)
        ));
    }
}
