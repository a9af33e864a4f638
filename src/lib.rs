//! # Experts15 Admin Client
//!
//! Client-side library and CLI for the Experts15 test-preparation platform:
//! drives the test creation & publishing workflow against the REST API.
//!
//! ## Architecture
//!
//! Four layers, thin at the bottom:
//!
//! ### ① Transport (clients)
//! - `clients/api_client` - REST contract, bearer injection, uniform 401
//!   handling via the injected [`Session`]
//! - [`AdminApi`] - the workflow-facing trait; the real client and test
//!   fakes both implement it
//!
//! ### ② Capabilities (services)
//! - `services/upload` - PDF upload adapter with pre-flight checks
//! - `services/notification` - validated test announcements
//! - `services/payment` - checkout order/verify pair
//! - `services/auth` - OTP-based password reset
//!
//! ### ③ Flow (workflow, editor, otp)
//! - `workflow/publish_flow` - the four-stage publish state machine
//! - `editor/` - single-question form and bulk list editing
//! - `otp` - six-cell OTP entry with resend cooldown
//!
//! ### ④ Orchestration (app)
//! - `app` - drafts folder in, published tests out, batch statistics

pub mod app;
pub mod clients;
pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod otp;
pub mod services;
pub mod session;
pub mod utils;
pub mod workflow;

pub use app::App;
pub use clients::{AdminApi, ApiClient, UploadPurpose};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Question, Subject, TestDraft};
pub use session::Session;
pub use workflow::{PublishFlow, Stage};
