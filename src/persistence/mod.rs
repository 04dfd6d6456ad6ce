// Copyright 2025 Cowboy AI, LLC.

//! # Persistence Layer
//!
//! Repository contracts the domain depends on, plus an in-memory
//! implementation.
//!
//! ## Components
//!
//! - **ReadRepository / Repository**: specification-driven lookups and
//!   versioned writes
//! - **InMemoryRepository**: ordered, lock-protected reference store

pub mod in_memory_repository;
pub mod repository;

pub use in_memory_repository::InMemoryRepository;
pub use repository::{ReadRepository, Repository};
