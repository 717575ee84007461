//! Rust client for the blog proxy API.

pub mod client;

pub use client::{BlogClient, BlogUpdate, NewBlog, SdkError};
