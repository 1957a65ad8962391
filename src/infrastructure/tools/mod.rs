pub mod trip_lookup;

pub use trip_lookup::{TripCatalog, TripLookupArgs, TripLookupTool};
