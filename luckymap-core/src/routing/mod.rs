//! Fetch route alternatives between waypoints.
//!
//! The [`RouteProvider`] trait abstracts the external routing service.
//! Callers supply a [`TravelProfile`] and an ordered list of waypoints and
//! receive every alternative the service proposes as a
//! [`CandidateRoute`](crate::CandidateRoute).
//!
//! Errors are returned when inputs are invalid or the service cannot be
//! reached; the planner absorbs them per request variant.

mod error;
mod provider;

pub use error::RoutingError;
pub use provider::{RouteProvider, TravelProfile};
