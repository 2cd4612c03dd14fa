/// Content-based recommendation: TF-IDF over synopses, cosine similarity, top-N ranking
pub mod engine;
pub mod similarity;
pub mod stop_words;
pub mod vectorizer;

pub use engine::RecommendationEngine;
