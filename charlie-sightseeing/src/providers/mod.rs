//! Implementations of [`SightseeingProvider`](crate::SightseeingProvider).

mod rapid_api;

pub use rapid_api::RapidApiTourProvider;
