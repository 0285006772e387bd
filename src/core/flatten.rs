use crate::models::{FeedPage, NearEarthObject};

/// Flatten feed pages into one entry list
///
/// Entries keep page order, then day order within a page, then the
/// upstream list order within a day.
pub fn flatten_pages(pages: Vec<FeedPage>) -> Vec<NearEarthObject> {
    pages
        .into_iter()
        .flat_map(|page| page.near_earth_objects.into_values())
        .flatten()
        .collect()
}
