//! Tusla Database Library
//!
//! Repository implementations for all persisted entities. Each repository
//! wraps a `PgPool` and exposes the queries for one table.

pub mod db;

pub use db::{
    CategoryRepository, PostImageRepository, PostRepository, PostVolunteerRepository,
    UserRepository,
};
