use crate::models::{SearchCriteria, SearchDimension};

/// Row-major enumeration of the configured dimensions
///
/// Outer loop is titles, then industries, then locations. The iterator is
/// lazy and borrows the criteria; call [`SearchSpace::iter`] again to restart.
#[derive(Debug, Clone, Copy)]
pub struct SearchSpace<'a> {
    titles: &'a [String],
    industries: &'a [String],
    locations: &'a [String],
}

impl<'a> SearchSpace<'a> {
    pub fn new(titles: &'a [String], industries: &'a [String], locations: &'a [String]) -> Self {
        Self {
            titles,
            industries,
            locations,
        }
    }

    pub fn from_criteria(criteria: &'a SearchCriteria) -> Self {
        Self::new(&criteria.titles, &criteria.industries, &criteria.locations)
    }

    pub fn len(&self) -> usize {
        self.titles.len() * self.industries.len() * self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = SearchDimension> + 'a {
        let (titles, industries, locations) = (self.titles, self.industries, self.locations);
        titles.iter().flat_map(move |title| {
            industries.iter().flat_map(move |industry| {
                locations
                    .iter()
                    .map(move |location| SearchDimension::new(title, industry, location))
            })
        })
    }
}
