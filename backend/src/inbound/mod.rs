//! Driving adapters. HTTP is the only transport.

pub mod http;
