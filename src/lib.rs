//! Sitewright - AI-Driven Static Website Generator
//!
//! Turns a natural-language description into a multi-page static site
//! (HTML pages, CSS/JS scaffold, Markdown overview) by driving a chat
//! completion API through an ordered, checkpointed pipeline.
//!
//! ## Core Features
//!
//! - **Background Pipeline**: requests are acknowledged immediately and run
//!   as detached tasks; progress is persisted at every stage
//! - **Flat-file Store**: one JSON document of project records, serialized
//!   writes with atomic replace
//! - **Strict Plan Parsing**: malformed page plans fail the run instead of
//!   producing a partial site
//! - **HTTP API + CLI**: axum server for web clients, foreground generation
//!   and status from the terminal
//!
//! ## Quick Start
//!
//! ```ignore
//! use sitewright::{ConfigLoader, ProjectOrchestrator};
//!
//! let config = ConfigLoader::load(None)?;
//! let orchestrator = ProjectOrchestrator::from_config(&config).await?;
//! let ticket = orchestrator.start("A website for a small bakery", None).await?;
//! let project = ticket.wait().await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: provider abstraction, prompts, content generation
//! - [`pipeline`]: generation stages, checkpoints, orchestration
//! - [`storage`]: project store and on-disk workspace
//! - [`server`]: HTTP API
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod pipeline;
pub mod server;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{ErrorCategory, Result, SiteError};

// Domain
pub use types::{FileKind, FileRecord, Page, Project, ProjectStatus};

// Storage
pub use storage::{ProjectStore, SharedStore, SiteWorkspace};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{CheckpointManager, PipelineStage, ProjectOrchestrator, RunTicket, SitePipeline};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{ContentGenerator, LlmProvider, LlmResponse, SharedProvider, with_timeout};

// =============================================================================
// Server Re-exports
// =============================================================================

pub use server::{AppState, build_router};
