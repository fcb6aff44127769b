//! Wardrobe AI Common Library
//!
//! CLIと永続化層・AIクライアントで共有される型と純粋ロジック

pub mod catalog;
pub mod error;
pub mod ingest;
pub mod media;
pub mod outfit;
pub mod parser;
pub mod prompts;
pub mod selection;
pub mod types;

#[cfg(test)]
mod test_support;

pub use catalog::{Category, Season, Style, FITS};
pub use error::{Error, Result};
pub use ingest::{CommitCandidate, IngestBatch, IngestEntry, IngestStatus, MAX_BATCH};
pub use media::InlineImage;
pub use outfit::{assemble_outfit, Outfit};
pub use parser::{extract_json, parse_analysis_response, parse_look_response, LookSelection};
pub use prompts::{
    build_analysis_prompt, build_look_prompt, build_try_on_prompt, BACKGROUND_REMOVAL_PROMPT,
};
pub use selection::{combination_key, validate_selection, SelectionOutcome};
pub use types::{ClothingItem, ItemDetails, SavedLook, StylistRequest};
