//! Property aggregate
//!
//! Contains the Property entity, related types, and repository interface.

pub mod model;
pub mod repository;

pub use model::{Property, PropertyStatus, PropertyType};
pub use repository::{PropertyFilter, PropertyRepository};
