//! Rust client for DataBreakers, a recommendation data platform.
//!
//! # Overview
//!
//! The crate revolves around a [`Client`] created from a [`ClientConfig`]. The client groups API
//! operations into sections: [`Client::users`], [`Client::items`], [`Client::interactions`],
//! [`Client::recommendations`] and so on. Every call is an HTTP request with a JSON body whose
//! path is expanded from a template, prefixed with the API version, and signed with the
//! account's secret key.
//!
//! Records sent in bulk are accumulated in batches ([`EntitiesBatch`], [`InteractionsBatch`],
//! [`RecommendationsBatch`], ...). Each batch validates a record when it is added, so invalid
//! input is reported before anything is sent.
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum. [`Error::InvalidArgument`] is returned before
//! any network call when a caller-supplied value is not acceptable. [`Error::RequestFailed`]
//! carries the server's message and HTTP status when the call itself failed.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate with the `databreakers`
//! target. Consider integrating a `log`-compatible logger implementation for better visibility
//! into the requests being made.
//!
//! # Examples
//!
//! A runnable example lives in the `demos/simple` directory of the crate repository.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod api;
mod batch;
mod client;
mod config;
mod error;
pub mod hmac_signature;
pub mod path_builder;
mod recommendation;
mod restriction;
pub mod sections;
mod template_configuration;
mod transport;
mod types;

pub use api::Api;
pub use batch::{
    EntitiesBatch, EntityRecord, InteractionDetail, InteractionRecord, InteractionTypeOptions,
    InteractionTypeRecord, InteractionTypesBatch, InteractionsBatch, RecommendationEntitiesBatch,
    RecommendationEntity, RecommendationRequestRecord, RecommendationsBatch,
};
pub use client::Client;
pub use config::{ClientConfig, Configuration};
pub use error::{Error, Result};
pub use recommendation::{RecommendationContentBuilder, RecommendationOptions, RecommendationTarget};
pub use restriction::Restriction;
pub use sections::ListOptions;
pub use template_configuration::{
    AttributeLimit, RecommendationTemplateConfiguration, TemplateConfiguration,
};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError};
pub use types::{AttributeValue, Attributes, DataType, InteractionMetaType, MetaType, Order};
