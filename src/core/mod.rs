//! Core application modules
//!
//! This module contains configuration, constants, logging, the provider
//! abstraction, and the invoker that ties them together.

pub mod config;
pub mod constants;
pub mod invoker;
pub mod logging;
pub mod provider;
pub mod providers;
