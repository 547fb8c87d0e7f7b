//! Turning a `WeatherDocument` into things people read.
//!
//! Submodules:
//! - `prompt` builds the per-region text handed to the summarizer.
//! - `html` renders the daily briefing page around the region summaries.
//!
//! Both consume the document as a plain value and do no I/O.

pub mod html;
pub mod prompt;

pub use html::{fallback_summary, render_report};
pub use prompt::{build_prompt, build_prompts};
