//! Serce - a page-tree content management system
//!
//! This library provides the core functionality for the Serce CMS:
//! a hierarchical page tree with typed page records, a structured
//! stream-block body format, reusable snippets, and navigation helpers.

pub mod api;
pub mod blocks;
pub mod config;
pub mod db;
pub mod models;
pub mod registry;
pub mod render;
pub mod services;
