//! Fare aggregation engine.
//!
//! Prices a trip by walking its itinerary hop by hop. Two policies exist,
//! selected per deployment:
//!
//! - **Table lookup**: each hop's cost is the registered fare for that
//!   exact ordered pair; the first missing pair aborts the computation.
//! - **Distance derived**: each hop contributes the absolute difference of
//!   its stations' distance markers, and the summed distance is priced
//!   once as `ceil(km × 0.24)`.
//!
//! This is a linear walk over an explicit via list, not a route search.

mod aggregate;
mod policy;

pub use aggregate::{FareEngine, FareQuote};
pub use policy::{FARE_PER_KM, FarePolicy, UnknownPolicy, distance_fare};
