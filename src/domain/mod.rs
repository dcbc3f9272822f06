//! Domain layer - Core scan and verification logic
//!
//! This module contains the core domain entities, the port traits for the
//! camera, decoder and reputation collaborators, and pure domain services.

pub mod entities;
pub mod repositories;
pub mod services;
