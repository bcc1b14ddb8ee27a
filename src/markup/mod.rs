//! Child markup model for the select control
//!
//! - [`node`]: element/text tree the host provides
//! - [`children`]: observed child list with batched mutation records
//! - [`option_store`]: option snapshot derived from the children

pub mod children;
pub mod node;
pub mod option_store;

pub use children::{ChildList, ChildObserver, MutationError, MutationKind, MutationRecord};
pub use node::{Element, Node, OPTION_TAG};
pub use option_store::{scan, OptionStore, SelectOption};
