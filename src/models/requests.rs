/// Query parameters of a search call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub keywords: String,
    pub location: String,
    /// Pagination offset, sent as `start`
    pub offset: u64,
}

/// Query parameters of a detail fetch
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRequest {
    /// Sent as `username`
    pub identifier: String,
}

impl SearchRequest {
    pub fn new(keywords: impl Into<String>, location: impl Into<String>, offset: u64) -> Self {
        Self {
            keywords: keywords.into(),
            location: location.into(),
            offset,
        }
    }

    /// URL-encoded query string; an empty location is left out
    pub fn query_string(&self) -> String {
        let mut query = format!(
            "keywords={}&start={}",
            urlencoding::encode(&self.keywords),
            self.offset
        );
        if !self.location.is_empty() {
            query.push_str("&location=");
            query.push_str(&urlencoding::encode(&self.location));
        }
        query
    }
}

impl DetailRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    pub fn query_string(&self) -> String {
        format!("username={}", urlencoding::encode(&self.identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_is_encoded() {
        let request = SearchRequest::new("VP of Business Development SaaS", "Porto, Portugal", 0);
        assert_eq!(
            request.query_string(),
            "keywords=VP%20of%20Business%20Development%20SaaS&start=0&location=Porto%2C%20Portugal"
        );
    }

    #[test]
    fn test_search_query_without_location() {
        let request = SearchRequest::new("COO", "", 25);
        assert_eq!(request.query_string(), "keywords=COO&start=25");
    }

    #[test]
    fn test_detail_query() {
        assert_eq!(DetailRequest::new("sample-1").query_string(), "username=sample-1");
    }
}
