//! Satur Client - the browser-side runtime, modeled headlessly.
//!
//! Server-rendered pages carry the props of every component instance they
//! rendered. The client rebuilds those instances, runs their setup against
//! live hooks, and from then on re-renders an instance whenever its state
//! changes, patching the mounted markup in place.
//!
//! # Architecture
//!
//! - `dom`: an arena [`Document`] parsed with html5gum, with the live form
//!   values and boolean properties a browser keeps beside the markup
//! - `reconcile`: the positional diff that patches a live subtree
//! - `registry`: instance identity by component name and position
//! - `runtime`: [`Runtime`], hydration, frame-batched updates, lifecycle
//!   hooks and event dispatch

mod dom;
mod error;
mod reconcile;
mod registry;
mod runtime;

pub use dom::{Document, ElementData, Mutation, NodeId, NodeKind, ROOT_TAG};
pub use error::ClientError;
pub use reconcile::{reconcile, sync_boolean_properties, BOOLEAN_ATTRIBUTES};
pub use registry::{ContextRegistry, Resolution};
pub use runtime::Runtime;

pub use satur_reactive::{EventPayload, ManualFrames};
