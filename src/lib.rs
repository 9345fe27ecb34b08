// src/lib.rs

//! Job board crawler library
//!
//! Paginates city job boards, follows every job link and extracts the perks
//! and tools listed on each posting.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
