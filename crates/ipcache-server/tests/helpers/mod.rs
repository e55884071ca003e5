//! Test helpers para ipcache-server.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod source;

pub use client::{TestClient, TestResponse, client_with_source};
pub use source::{CountingSource, Reply};
