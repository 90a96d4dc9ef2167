mod provider;
mod wire;

pub use provider::VolcengineProvider;
pub use wire::{build_content, build_prompt, ContentPart, ImageUrl};
