//! Declarative RabbitMQ resource types
//!
//! Resource types for a RabbitMQ broker, built on the [`reconcile`]
//! convergence core: declare desired state, let a provider report and
//! mutate the live broker, and get change reports back.
//!
//! ```ignore
//! use rabbitmq_resources::{user_schema, UserResource};
//! use reconcile::sync;
//!
//! let schema = user_schema()?;
//! let dan = UserResource::new("dan")
//!     .admin(true)
//!     .password("bar")
//!     .tags(["monitoring", "tag1"])
//!     .instance(&schema)?;
//!
//! let reports = sync(&dan, &provider)?;
//! ```
//!
//! The provider side (talking to rabbitmqctl or the management API) is
//! supplied by the caller as a [`reconcile::Provider`] implementation.

pub mod user;

pub use user::{user_schema, UserResource, BROKER_SERVICE, RESERVED_ADMIN_TAG};
