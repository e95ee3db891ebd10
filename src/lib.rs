//! Worktrack: work-item tracking core.
//!
//! This crate creates, assigns, transfers, transitions, filters, and
//! aggregates work items ("track entries") for two populations of people:
//! internal employees organised into teams, and customer-company staff.
//! Every read and write is narrowed by a role-scoped visibility model.
//!
//! # Architecture
//!
//! Worktrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and directory lookups
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`tracking`]: Work-item lifecycle, visibility, eligibility, and aggregation

pub mod tracking;
