//! HTTP client for the hosted reward service

mod client;

pub use client::LedgerClient;
