//! Work-item tracking for internal teams and customer companies.
//!
//! A work item belongs to a project and to one organising unit: an internal
//! team or a customer company. Callers act through an [`domain::Identity`]
//! whose role decides which items they can see and what they may change.
//! The module follows hexagonal architecture:
//!
//! - Domain types and pure rules in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
