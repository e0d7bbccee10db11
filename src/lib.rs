//! Booking Page Widgets
//!
//! This library provides the interactive parts of the booking page: a
//! multi-step booking form with validation and asynchronous submission, and a
//! decorative analog clock.
//!
//! # Modules
//!
//! - `controller`: BookingController and the submission lifecycle
//! - `client`: BookingEndpoint and its HTTP implementation
//! - `services`: validation rules, step machine, dropdown and clock
//! - `view`: pure rendering of state into frames, and the view traits
//! - `handlers`: form events and the driver loop
//! - `session`: PageSession, the lifetime of one page load
//!
//! # Rendering
//!
//! Widgets never paint directly. They keep an explicit state value and hand
//! frames to a `FormView` or `ClockView`, so everything can be exercised without
//! a rendering surface.

pub mod client;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod session;
pub mod view;


// Re-export the main API types for ease of use
pub use client::{BookingEndpoint, HttpBookingEndpoint};
pub use config::{BookingConfig, SubmitLabels};
pub use controller::{BookingController, PendingSubmit, SubmitOutcome, SubmitStart};
pub use error::{ConfigError, SubmissionError, ValidationError};
pub use models::lifecycle::SubmissionLifecycle;
pub use services::clock::{ClockWidget, LocalClock};
pub use session::PageSession;
