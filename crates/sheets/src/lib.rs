//! Google Sheets persistence sink for traty. One completed expense record
//! becomes one appended row; see `SheetsClient` for the REST plumbing.

pub mod client;

pub use client::SheetsClient;
