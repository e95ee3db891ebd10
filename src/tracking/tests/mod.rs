//! Unit tests for work-item tracking.
