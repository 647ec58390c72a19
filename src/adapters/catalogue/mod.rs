//! Course catalogue adapters implementing the `CourseLookup` port.

mod http;
mod in_memory;

pub use http::{HttpCourseLookup, HttpCourseLookupConfig};
pub use in_memory::{CatalogueSeedError, InMemoryCourseCatalogue};
