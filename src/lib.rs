/// Account record and balance arithmetic.
pub mod account;

/// Operation handlers. Every balance read or mutation is an [`event::Event`]
/// applied through the account service.
pub mod event;

/// Account ownership service, the only dependency of the handlers.
pub mod service;

/// Storage interfaces for accounts and transaction records, plus "in memory"
/// implementations.
pub mod store;

/// Submitted transactions and their persisted record.
pub mod transaction;

/// Selects the operation for a submitted transaction, runs it and records it.
pub mod dispatcher;

/// Runtime settings read from the environment.
pub mod config;

/// CSV front-end for the binary. Lives here so the integration test can use it.
pub mod bin_utils;
