//! Application services for address resolution.

mod address;

pub use address::{
    AddressInput, AddressResolutionError, AddressResolver, free_text_queries, geocode_free_text,
    structured_queries,
};
