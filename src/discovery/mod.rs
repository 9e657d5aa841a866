//! Location-aware discovery of jobs and profiles.
//!
//! Discovery is read-only: it loads candidates through the job and profile
//! ports and narrows them with a [`RadiusFilter`](crate::geo::domain::RadiusFilter).
//! Diarists browse pending jobs in a list view that keeps unlocated jobs;
//! maps and nearby-profile searches only show located candidates.

pub mod services;

#[cfg(test)]
mod tests;
