//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     group prefixes + template
//!     → path.rs (clean: collapse slashes, resolve . and ..)
//!     → pattern.rs (compile to anchored regex with named groups)
//!     → router.rs (merge into existing route or append)
//!
//! Incoming Request (method, cleaned path)
//!     → router.rs (scan routes in registration order)
//!     → route.rs (path matches AND method bound?)
//!     → Return: matched Route + path params, or no match
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable while serving
//! - First match wins (registration order, not specificity)
//! - A route whose path matches but lacks the method is skipped silently
//! - Deterministic: same template always compiles to the same regex text

pub mod method;
pub mod path;
pub mod pattern;
pub mod route;
pub mod router;

pub use method::{Method, MethodAllowList};
pub use path::{clean_path, decode_path};
pub use pattern::{PathParams, Pattern, PatternError};
pub use route::{Route, RouteMatch};
pub use router::Router;
