// Skill matching engine: tokenizer → relevance scorer → cluster recommender
// → ranking pipeline. Everything below `handlers` is synchronous and pure.

pub mod handlers;
pub mod pipeline;
pub mod recommender;
pub mod relevance;
pub mod taxonomy;
pub mod tokenizer;
