//! Request tracing middleware and metrics exposition.

mod metrics;
mod request;
mod settings;

pub(crate) use metrics::metrics_handler;
pub(crate) use request::request_logging;
pub(crate) use settings::apply_runtime_config;
