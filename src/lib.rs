//! Iris - scene descriptions for blind and low-vision users
//!
//! This crate takes a captured camera frame, shrinks and re-encodes it, asks a
//! hosted vision model (Gemma 3 via Cloudflare Workers AI or OpenRouter) for a
//! short navigation-oriented description in the user's language, and reports
//! the result through an observable pipeline state.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Language table, payloads, prompts, provider envelopes, pipeline session
//! - **Application**: Description service, pipeline controller and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (JPEG codec, reqwest transport, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and interrupt handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
