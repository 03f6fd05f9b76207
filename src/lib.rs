//! MasterTask - a task management client
//!
//! This library holds the client side of MasterTask: the task collection and
//! its mutation handlers, the view classifier that partitions tasks into the
//! Inbox, Today, Upcoming and All views, and the REST boundary to the task
//! service. A plain-text renderer stands in for the presentation layer.
//!
//! # Modules
//!
//! * [`app`] - Application state, actions and the refresh ticker
//! * [`backend`] - Task service interface and REST client
//! * [`store`] - Task collection and mutation handlers
//! * [`view`] - View classification and date grouping
//! * [`config`] - Application configuration management

/// Application state and action dispatch
pub mod app;

/// User-visible failure messages
pub mod alerts;

/// Credential checks and password hashing
pub mod auth;

/// Backend abstraction layer for the task service
pub mod backend;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Domain types shared across the crate
pub mod entities;

/// Logging setup
pub mod logger;

/// Notification feed
pub mod notifications;

/// Plain-text presentation
pub mod render;

/// Persisted sign-in state
pub mod session;

/// View counters and completion statistics
pub mod stats;

/// Task collection and mutation handlers
pub mod store;

/// Utility functions for date/time handling
pub mod utils;

/// View classification
pub mod view;

pub use entities::{Task, TaskId};
