//! Navigation state for the forecast pages.
//!
//! - `controller`: anchor submission and month stepping for the temperature page
//! - `range`: start/end range queries for the weather-type page
//!
//! Both controllers hand out detached cycles so the host decides how to run
//! them; only the most recently started cycle may commit.

pub mod controller;
pub mod range;

pub use controller::{CycleOutcome, FetchCycle, NavigationController, NavigationState};
pub use range::{RangeController, RangeCycle, RangeOutcome, RangeQuery, RangeState};
