//! Core library modules for danfo-quote
//!
//! This module contains the internal implementation details of the
//! danfo-quote library.

pub mod batch;
pub mod cost;
pub mod distance;
pub mod error;
pub mod gazetteer;
pub mod geocode;
pub mod matcher;
