//! API data models
//!
//! This module contains data structures for the Bedrock Converse API.

pub mod bedrock;
