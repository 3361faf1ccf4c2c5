//! Rental pricing and the rentals/catalog join

use std::collections::HashMap;

use crate::model::{CatalogItem, DocumentId, ExpandedRental, Rental};

/// Multiplier applied to the catalog price of a rented movie
pub const RENTAL_MARKUP: f64 = 1.7;

/// Fields of an expanded rental taken from the catalog item
const CATALOG_OVERLAY: [&str; 5] = [
    "price",
    "vote_average",
    "original_title",
    "backdrop_path",
    "overview",
];

/// Price charged for renting a movie listed at `catalog_price`.
pub fn rental_price(catalog_price: f64) -> f64 {
    catalog_price * RENTAL_MARKUP
}

/// Join rentals against the catalog.
///
/// Rentals keep their order. A rental whose catalog item is missing is
/// dropped, so an empty catalog yields an empty result. When the catalog
/// lists an id twice the first entry wins.
pub fn expand_rentals(rentals: Vec<Rental>, catalog: &[CatalogItem]) -> Vec<ExpandedRental> {
    let mut by_id: HashMap<&DocumentId, &CatalogItem> = HashMap::with_capacity(catalog.len());
    for item in catalog {
        by_id.entry(&item.id).or_insert(item);
    }

    rentals
        .into_iter()
        .filter_map(|rental| {
            let Some(movie) = by_id.get(&rental.catalog_id) else {
                tracing::debug!(catalog_id = %rental.catalog_id, "rental has no catalog entry, skipping");
                return None;
            };

            let mut extra = rental.extra;
            for key in CATALOG_OVERLAY {
                extra.remove(key);
            }

            Some(ExpandedRental {
                id: rental.id,
                catalog_id: rental.catalog_id,
                price: movie.price.map(rental_price),
                vote_average: movie.vote_average,
                original_title: movie.original_title.clone(),
                backdrop_path: movie.backdrop_path.clone(),
                overview: movie.overview.clone(),
                extra,
            })
        })
        .collect()
}
