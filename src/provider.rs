//! Provider-facing descriptors and the registry that holds them.
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the HTTPS-only
//! authorization endpoint, the provider-issued client id, requested scopes, and extra
//! authorization hints. `registry` owns the immutable table flows resolve provider keys
//! against.

pub mod descriptor;
pub mod registry;

pub use descriptor::*;
pub use registry::*;
