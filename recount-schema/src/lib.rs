pub mod listing;

pub use listing::{Listing, ListingData, ListingResponse, Thing, ThingData};
