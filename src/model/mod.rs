//! Read-only API surfaces compared by the rule engine.
//!
//! A host (or the snapshot loader in [`crate::pipeline`]) builds one
//! [`ApiSurface`] per side. Rules never mutate these structures; they only
//! query them, which keeps a pass safe to fan out across threads.
//!
//! ```ignore
//! let contract = ApiSurface::new("Contract").with_type(
//!     TypeSurface::class("Ns.Widget").with_member(MemberSurface::constructor()),
//! );
//! let index = SurfaceIndex::build(&contract);
//! ```

mod comparer;
mod members;
mod surface;
mod types;
mod virtuality;
mod visibility;

pub use comparer::*;
pub use members::*;
pub use surface::*;
pub use types::*;
pub use virtuality::*;
pub use visibility::*;
