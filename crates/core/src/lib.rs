//! EdGPT Core - brand resolution and shared types.
//!
//! This crate is shared by all EdGPT platform components:
//! - `web` - The multi-tenant landing/signup/admin service
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Everything here is safe to call concurrently from any number
//! of request handlers without locking.
//!
//! # Modules
//!
//! - [`registry`] - The immutable domain registry (brand + landing template per domain)
//! - [`resolver`] - Host header to brand resolution with default fallback
//! - [`widget`] - Chat widget HTML/CSS code generation
//! - [`types`] - Newtype IDs, email, and persisted entity types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod registry;
pub mod resolver;
pub mod types;
pub mod widget;

pub use registry::{
    BrandConfig, DEFAULT_DOMAIN, DomainRegistry, DomainRoute, LandingTemplate, RegistryEntry,
    RegistryError,
};
pub use resolver::normalize_host;
pub use types::*;
pub use widget::{
    CustomizationInput, GeneratedWidget, WidgetCustomization, WidgetError, WidgetPosition,
    WidgetSize, generate,
};
