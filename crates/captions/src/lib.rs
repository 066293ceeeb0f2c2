pub mod error;
pub mod frame;
pub mod preview;
pub mod session;
pub mod store;
pub mod style;
pub mod types;
pub mod window;

pub use error::Error;
pub use frame::{escape_markup, render, stroke_shadows};
pub use preview::{LoadOutcome, Preview};
pub use session::{ClipKey, Session};
pub use store::WordStore;
pub use style::CaptionStyle;
pub use types::{CaptionFrame, CaptionSpan, Word};
pub use window::{Window, select};
