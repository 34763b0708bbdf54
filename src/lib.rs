//! Wayfarer - AI Travel Planning Chat Backend
//!
//! This crate implements the AI orchestration core of a travel-planning
//! assistant: agent dispatch, prompt context composition, streaming NDJSON
//! itinerary decoding, and typed generation-event delivery.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
