//! A small inventory catalog service built with axum and sqlx.
//!
//! Categories and items are plain CRUD resources under `/api`, backed by
//! PostgreSQL. Each feature module under [`api`] is split into an HTTP
//! layer, a service holding the business rules, and a repository owning
//! the entity types and queries.

pub mod api;
pub mod app;
pub mod infra;
