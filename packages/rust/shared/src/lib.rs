//! Shared types, error model, and configuration for vetdischarge.
//!
//! This crate is the foundation depended on by all other vetdischarge crates.
//! It provides:
//! - [`DischargeError`]: the unified error type
//! - Domain types ([`ConsultationRecord`], [`Patient`], [`Consultation`], [`DischargeNote`])
//! - Configuration ([`AppConfig`], [`Credential`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, Credential, DefaultsConfig, OpenAiConfig, config_dir, config_file_path,
    load_config, load_config_from, resolve_credential,
};
pub use error::{DischargeError, Result};
pub use types::{
    ClinicalNote, Consultation, ConsultationRecord, DischargeNote, Patient, Procedure,
    TreatmentItems,
};
