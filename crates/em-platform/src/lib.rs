//! Event Management Platform
//!
//! Core platform providing:
//! - Participant and organizer accounts with JWT authentication
//! - Companies, topics and events with generated slugs
//! - Event registrations with capacity and waitlist admission
//! - Asynchronous email notifications

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod media;
pub mod notification;
pub mod repository;
pub mod seed;
pub mod service;

pub use config::PlatformConfig;
pub use domain::*;
pub use error::PlatformError;
