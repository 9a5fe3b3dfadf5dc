//! Core library: profile query building, retrieval, LLM extraction and recommendation.

pub mod ask;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod query;
pub mod recommend;
pub mod vectorstore;
