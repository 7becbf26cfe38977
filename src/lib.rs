//! poet writes Homebrew resource stanzas for installed Python packages.
//!
//! The pipeline is: look up installed metadata ([`metadata`]), resolve the
//! dependency closure with remote fallback ([`resolve`]), download and hash
//! each artifact ([`hasher`]), then template the result ([`render`]).

pub mod commands;
pub mod download;
pub mod error;
pub mod hasher;
pub mod http;
pub mod index;
pub mod metadata;
pub mod name;
pub mod render;
pub mod resolve;
pub mod runtime;
