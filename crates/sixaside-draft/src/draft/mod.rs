// Snake draft core: order, sequencing, pick commit, lifecycle, projection.

pub mod error;
pub mod order;
pub mod pick;
pub mod sequencer;
pub mod session;
pub mod state;

pub use error::DraftError;
