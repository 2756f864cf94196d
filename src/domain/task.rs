use itertools::Itertools;

/// One (city, keyword) search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub city: String,
    pub keyword: String,
}

impl Task {
    pub fn new(city: impl Into<String>, keyword: impl Into<String>) -> Self {
        Task {
            city: city.into(),
            keyword: keyword.into(),
        }
    }

    /// Every keyword for the first city, then every keyword for the next one.
    pub fn cross_product(cities: &[String], keywords: &[String]) -> Vec<Task> {
        cities
            .iter()
            .cartesian_product(keywords.iter())
            .map(|(city, keyword)| Task::new(city.as_str(), keyword.as_str()))
            .collect()
    }

    pub fn query(&self) -> String {
        build_search_query(&self.keyword, &self.city)
    }
}

pub fn build_search_query(keyword: &str, city: &str) -> String {
    format!("{} in {}", keyword, city)
}

/// Location phrase of a query: whatever follows the last `"in "`.
/// A query without it is its own area.
pub fn parse_area(query: &str) -> String {
    match query.rsplit_once("in ") {
        Some((_, area)) => area.trim().to_string(),
        None => query.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_search_query, parse_area, Task};

    #[test]
    fn parse_area_valid() {
        assert_eq!(parse_area("AI startups in bangalore"), "bangalore");
        assert_eq!(parse_area("IT services in  new delhi "), "new delhi");
    }

    #[test]
    fn parse_area_uses_last_occurrence() {
        assert_eq!(parse_area("stay in touch in pune"), "pune");
    }

    #[test]
    fn parse_area_without_marker() {
        assert_eq!(parse_area(" bakeries "), "bakeries");
    }

    #[test]
    fn build_search_query_valid() {
        let query = build_search_query("software companies", "pune");

        assert_eq!(query, "software companies in pune");
        assert_eq!(parse_area(&query), "pune");
    }

    #[test]
    fn cross_product_is_city_major() {
        let cities = vec!["pune".to_string(), "delhi".to_string()];
        let keywords = vec!["IT services".to_string(), "AI startups".to_string()];
        let tasks = Task::cross_product(&cities, &keywords);

        assert_eq!(
            tasks,
            vec![
                Task::new("pune", "IT services"),
                Task::new("pune", "AI startups"),
                Task::new("delhi", "IT services"),
                Task::new("delhi", "AI startups"),
            ]
        );
    }

    #[test]
    fn cross_product_empty() {
        let cities = vec!["pune".to_string()];

        assert!(Task::cross_product(&cities, &[]).is_empty());
        assert!(Task::cross_product(&[], &cities).is_empty());
    }
}
