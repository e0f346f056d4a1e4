/*!
 * Streams Module
 * Standard input, output, and error-output endpoints
 */

mod input;
mod output;
pub mod types;

pub use input::InputStream;
pub use output::OutputStream;
pub use types::{InputFraming, PumpOutcome, StreamError, StreamResult, WriteMode};
