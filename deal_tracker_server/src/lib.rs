//! # Deal tracker server
//! This module hosts the HTTP front end of the deal tracker. It is responsible for:
//! Receiving deals from the upstream settlement system and handing them to the deal reconciler.
//! Serving the list of stored deals, and the waiting / in processing views of them, to the consuming application.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/dealtracker/getAll`: Every stored deal.
//! * `/dealtracker/get/{deal_reference}`: A single deal, or `null`.
//! * `/dealtracker/getDealsWaiting`: Deals that have arrived but have not been sent, in chain order.
//! * `/dealtracker/getDealsInProcessing`: Deals that have been sent but are not app complete, in chain order.
//! * `/dealtracker/process`: Submit a deal for reconciliation.
//! * `/dealtracker/delete/{deal_reference}`: Remove a deal by its reference.

pub mod cli;
pub mod config;
pub mod errors;

pub mod routes;
pub mod server;
