//! Wardrobe AI
//!
//! 衣類写真の登録・ワードローブ管理・AIスタイリストによるルック提案

pub mod ai;
pub mod cli;
pub mod closet;
pub mod config;
pub mod error;
pub mod gemini;
pub mod imaging;
pub mod ingest;
pub mod scanner;
pub mod store;
pub mod stylist;

pub use ai::{LookRequest, StylistAi};
pub use closet::{Closet, LookDraft, PersistOutcome, WardrobeFilter, MIN_WARDROBE_FOR_STYLIST};
pub use error::{Result, WardrobeError};
