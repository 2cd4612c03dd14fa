use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieRecord, MovieSummary, Recommendation},
    services::{catalog::MovieCatalog, corpus},
};

use super::{similarity::SimilarityMatrix, vectorizer::TfidfVectorizer};

/// Content-based movie recommender
///
/// Built once from a corpus and immutable afterwards; share it behind an `Arc` and
/// rank from any number of tasks without locking.
#[derive(Debug)]
pub struct RecommendationEngine {
    corpus: Vec<MovieRecord>,
    similarity: SimilarityMatrix,
    /// Title → first corpus position carrying it
    title_index: HashMap<String, usize>,
    /// Movie id → every corpus position carrying it
    id_index: HashMap<MovieId, Vec<usize>>,
}

impl RecommendationEngine {
    /// Vectorizes the synopses and precomputes the similarity index
    pub fn build(corpus: Vec<MovieRecord>) -> Self {
        let synopses: Vec<&str> = corpus.iter().map(|m| m.synopsis.as_str()).collect();
        let features = TfidfVectorizer::new().fit_transform(&synopses);
        let similarity = SimilarityMatrix::from_features(&features);

        let mut title_index = HashMap::new();
        let mut id_index: HashMap<MovieId, Vec<usize>> = HashMap::new();
        for (position, movie) in corpus.iter().enumerate() {
            title_index.entry(movie.title.clone()).or_insert(position);
            id_index.entry(movie.id).or_default().push(position);
        }

        tracing::info!(
            movies = corpus.len(),
            vocabulary = features.n_terms(),
            "Recommendation engine built"
        );

        Self {
            corpus,
            similarity,
            title_index,
            id_index,
        }
    }

    /// Fetches the corpus from `catalog` and builds the engine from it
    pub async fn from_catalog(
        catalog: &dyn MovieCatalog,
        max_pages: u32,
        page_delay: Duration,
    ) -> Self {
        let corpus = corpus::fetch_corpus(catalog, max_pages, page_delay).await;
        Self::build(corpus)
    }

    pub fn corpus_size(&self) -> usize {
        self.corpus.len()
    }

    pub fn movies(&self) -> Vec<MovieSummary> {
        self.corpus.iter().map(MovieSummary::from).collect()
    }

    /// Movies most similar to the one titled `title`
    ///
    /// An unknown title yields an empty list.
    pub fn recommend(&self, title: &str, top_n: usize) -> AppResult<Vec<Recommendation>> {
        let Some(&position) = self.title_index.get(title) else {
            tracing::debug!(title = %title, "Title not in corpus");
            return Ok(Vec::new());
        };

        let scores = self.similarity_row(position)?.to_vec();
        let excluded: HashSet<MovieId> = HashSet::from([self.corpus[position].id]);

        self.rank(scores, &excluded, top_n)
    }

    /// Movies most similar to the liked set, scored by mean similarity
    ///
    /// Ids missing from the corpus are ignored; if none resolve the result is empty.
    /// Liked movies never appear in the output.
    pub fn recommend_for_ids(
        &self,
        liked_ids: &[MovieId],
        top_n: usize,
    ) -> AppResult<Vec<Recommendation>> {
        let liked: HashSet<MovieId> = liked_ids.iter().copied().collect();
        let mut liked_rows: Vec<usize> = liked
            .iter()
            .filter_map(|id| self.id_index.get(id))
            .flatten()
            .copied()
            .collect();
        // Fixed summation order keeps scores bit-identical across calls
        liked_rows.sort_unstable();

        if liked_rows.is_empty() {
            tracing::debug!(liked = liked.len(), "No liked ids resolved to corpus rows");
            return Ok(Vec::new());
        }

        let mut scores = vec![0.0; self.corpus.len()];
        for &row in &liked_rows {
            for (total, value) in scores.iter_mut().zip(self.similarity_row(row)?) {
                *total += value;
            }
        }
        let resolved = liked_rows.len() as f64;
        for total in scores.iter_mut() {
            *total /= resolved;
        }

        tracing::debug!(
            liked = liked.len(),
            resolved_rows = liked_rows.len(),
            "Ranking against liked set"
        );

        self.rank(scores, &liked, top_n)
    }

    fn similarity_row(&self, position: usize) -> AppResult<&[f64]> {
        if self.similarity.size() != self.corpus.len() {
            return Err(AppError::Ranking(format!(
                "similarity matrix has {} rows, corpus has {}",
                self.similarity.size(),
                self.corpus.len()
            )));
        }

        self.similarity.row(position).ok_or_else(|| {
            AppError::Ranking(format!("no similarity row at position {}", position))
        })
    }

    /// Orders candidates by descending score, ties by corpus position, skipping
    /// excluded ids and repeated ids
    fn rank(
        &self,
        scores: Vec<f64>,
        excluded: &HashSet<MovieId>,
        top_n: usize,
    ) -> AppResult<Vec<Recommendation>> {
        if let Some(position) = scores.iter().position(|s| !s.is_finite()) {
            return Err(AppError::Ranking(format!(
                "non-finite score at corpus position {}",
                position
            )));
        }

        let mut candidates: Vec<(usize, f64)> = scores
            .into_iter()
            .enumerate()
            .filter(|(position, _)| !excluded.contains(&self.corpus[*position].id))
            .collect();
        // Stable sort keeps ascending position among equal scores
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut seen = HashSet::new();
        let recommendations = candidates
            .into_iter()
            .filter(|(position, _)| seen.insert(self.corpus[*position].id))
            .take(top_n)
            .map(|(position, score)| {
                let movie = &self.corpus[position];
                Recommendation {
                    id: movie.id,
                    title: movie.title.clone(),
                    score,
                }
            })
            .collect();

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_engine() -> RecommendationEngine {
        RecommendationEngine::build(vec![
            MovieRecord::new(1, "A", "space adventure robots"),
            MovieRecord::new(2, "B", "space adventure robots"),
            MovieRecord::new(3, "C", "romantic comedy wedding"),
        ])
    }

    fn larger_engine() -> RecommendationEngine {
        RecommendationEngine::build(vec![
            MovieRecord::new(10, "Star Voyage", "astronauts explore a distant galaxy aboard a starship"),
            MovieRecord::new(11, "Robot Dawn", "robots rebel against humanity on a distant planet"),
            MovieRecord::new(12, "Galaxy Quest Home", "a starship crew returns home from a distant galaxy"),
            MovieRecord::new(13, "Love Actually Maybe", "a wedding planner falls in love"),
            MovieRecord::new(14, "Second Chances", "divorced couple rekindles love at a wedding"),
            MovieRecord::new(15, "Quiet Pond", ""),
            MovieRecord::new(16, "Heist Night", "a crew plans a daring casino heist"),
        ])
    }

    #[test]
    fn test_identical_synopsis_ranks_first() {
        let engine = scenario_engine();
        let result = engine.recommend_for_ids(&[1], 2).unwrap();

        let ids: Vec<MovieId> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!((result[0].score - 1.0).abs() < 1e-9);
        assert!(result[1].score < 0.01);
    }

    #[test]
    fn test_empty_liked_set_returns_empty() {
        let engine = scenario_engine();
        assert!(engine.recommend_for_ids(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_ids_return_empty() {
        let engine = larger_engine();
        assert!(engine.recommend_for_ids(&[999, 1000], 5).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_ids_are_ignored_among_known() {
        let engine = larger_engine();
        let with_unknown = engine.recommend_for_ids(&[10, 999], 3).unwrap();
        let without = engine.recommend_for_ids(&[10], 3).unwrap();
        assert_eq!(with_unknown, without);
    }

    #[test]
    fn test_liked_rows_are_excluded() {
        let engine = larger_engine();
        let liked = [10, 13, 16];
        let result = engine.recommend_for_ids(&liked, 10).unwrap();

        assert!(result.iter().all(|r| !liked.contains(&r.id)));
        assert_eq!(result.len(), engine.corpus_size() - liked.len());
    }

    #[test]
    fn test_output_length_bounds() {
        let engine = larger_engine();
        assert_eq!(engine.recommend_for_ids(&[10], 2).unwrap().len(), 2);
        assert_eq!(engine.recommend_for_ids(&[10], 0).unwrap().len(), 0);
        assert_eq!(engine.recommend_for_ids(&[10], 100).unwrap().len(), 6);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let engine = larger_engine();
        let first = engine.recommend_for_ids(&[11, 14], 5).unwrap();
        let second = engine.recommend_for_ids(&[14, 11], 5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_aggregates_across_liked_movies() {
        let engine = larger_engine();
        let result = engine.recommend_for_ids(&[10, 11], 2).unwrap();

        // Galaxy Quest Home shares "starship", "galaxy" and "distant" with the liked pair
        assert_eq!(result[0].id, 12);
        assert!(result[0].score > result[1].score);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let engine = RecommendationEngine::build(vec![
            MovieRecord::new(1, "Liked", "pirates treasure"),
            MovieRecord::new(5, "Unrelated One", "cooking competition"),
            MovieRecord::new(3, "Unrelated Two", "chess tournament"),
            MovieRecord::new(4, "Empty", ""),
        ]);

        let ids: Vec<MovieId> = engine
            .recommend_for_ids(&[1], 5)
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![5, 3, 4]);
    }

    #[test]
    fn test_duplicate_corpus_entries_are_excluded_and_deduplicated() {
        let engine = RecommendationEngine::build(vec![
            MovieRecord::new(1, "A", "space robots"),
            MovieRecord::new(2, "B", "space robots war"),
            MovieRecord::new(1, "A", "space robots"),
            MovieRecord::new(2, "B", "space robots war"),
            MovieRecord::new(3, "C", "garden party"),
        ]);

        let ids: Vec<MovieId> = engine
            .recommend_for_ids(&[1], 5)
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_recommend_by_title() {
        let engine = larger_engine();
        let result = engine.recommend("Love Actually Maybe", 1).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Second Chances");
    }

    #[test]
    fn test_recommend_unknown_title_is_empty() {
        let engine = larger_engine();
        assert!(engine.recommend("Not A Movie", 5).unwrap().is_empty());
    }

    #[test]
    fn test_recommend_by_title_excludes_itself() {
        let engine = scenario_engine();
        let titles: Vec<String> = engine
            .recommend("A", 5)
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["B", "C"]);
    }

    #[test]
    fn test_all_empty_synopses_score_zero() {
        let engine = RecommendationEngine::build(vec![
            MovieRecord::new(1, "A", ""),
            MovieRecord::new(2, "B", ""),
            MovieRecord::new(3, "C", ""),
        ]);

        let result = engine.recommend_for_ids(&[1], 5).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_empty_corpus() {
        let engine = RecommendationEngine::build(Vec::new());
        assert_eq!(engine.corpus_size(), 0);
        assert!(engine.recommend_for_ids(&[1, 2, 3], 5).unwrap().is_empty());
        assert!(engine.recommend("A", 5).unwrap().is_empty());
    }

    #[test]
    fn test_inconsistent_index_is_reported() {
        let mut engine = scenario_engine();
        engine.similarity = SimilarityMatrix::default();

        let result = engine.recommend_for_ids(&[1], 5);
        assert!(matches!(result, Err(AppError::Ranking(_))));
    }
}
