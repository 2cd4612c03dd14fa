use std::time::Duration;

use crate::{
    models::{MovieId, MovieRecord},
    services::catalog::MovieCatalog,
};

/// Fetches the details of one movie, absorbing any failure
///
/// Non-success statuses, malformed payloads, and transport errors all yield `None`;
/// the caller simply leaves that movie out of the corpus.
pub async fn fetch_detail(catalog: &dyn MovieCatalog, id: MovieId) -> Option<MovieRecord> {
    match catalog.movie_details(id).await {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(
                movie_id = id,
                error = %e,
                catalog = catalog.name(),
                "Movie detail fetch failed, skipping"
            );
            None
        }
    }
}

/// Builds the recommendation corpus from the popular-movies listing
///
/// Walks pages `1..=max_pages`, stopping at the first page that fails. Every id on
/// a page is resolved through [`fetch_detail`]; records keep discovery order and
/// duplicate ids across pages are kept as-is. `page_delay` is slept between
/// successful pages to stay under the catalog's rate limit.
pub async fn fetch_corpus(
    catalog: &dyn MovieCatalog,
    max_pages: u32,
    page_delay: Duration,
) -> Vec<MovieRecord> {
    let mut corpus = Vec::new();
    let mut pages_fetched = 0;

    for page in 1..=max_pages {
        let ids = match catalog.popular_page(page).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(
                    page,
                    error = %e,
                    catalog = catalog.name(),
                    "Listing page failed, keeping partial corpus"
                );
                break;
            }
        };
        pages_fetched += 1;

        tracing::debug!(page, ids = ids.len(), "Listing page fetched");

        for id in ids {
            if let Some(record) = fetch_detail(catalog, id).await {
                corpus.push(record);
            }
        }

        if page < max_pages && !page_delay.is_zero() {
            tokio::time::sleep(page_delay).await;
        }
    }

    tracing::info!(
        pages = pages_fetched,
        movies = corpus.len(),
        catalog = catalog.name(),
        "Corpus fetched"
    );

    corpus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::catalog::MockMovieCatalog;

    fn record(id: MovieId) -> MovieRecord {
        MovieRecord::new(id, format!("Movie {}", id), format!("synopsis {}", id))
    }

    fn mock_catalog() -> MockMovieCatalog {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_name().return_const("mock");
        catalog
    }

    #[tokio::test]
    async fn test_fetch_corpus_stops_on_failed_page() {
        let mut catalog = mock_catalog();
        catalog.expect_popular_page().returning(|page| match page {
            1 => Ok(vec![1, 2]),
            _ => Err(AppError::ExternalApi("status 500".to_string())),
        });
        catalog
            .expect_movie_details()
            .returning(|id| Ok(record(id)));

        let corpus = fetch_corpus(&catalog, 5, Duration::ZERO).await;

        let ids: Vec<MovieId> = corpus.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_corpus_does_not_request_past_failure() {
        let mut catalog = mock_catalog();
        catalog
            .expect_popular_page()
            .withf(|page| *page <= 2)
            .times(2)
            .returning(|page| match page {
                1 => Ok(vec![10]),
                _ => Err(AppError::ExternalApi("status 503".to_string())),
            });
        catalog
            .expect_movie_details()
            .times(1)
            .returning(|id| Ok(record(id)));

        let corpus = fetch_corpus(&catalog, 30, Duration::ZERO).await;
        assert_eq!(corpus.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_corpus_omits_failed_details() {
        let mut catalog = mock_catalog();
        catalog
            .expect_popular_page()
            .returning(|_| Ok(vec![1, 2, 3]));
        catalog.expect_movie_details().returning(|id| {
            if id == 2 {
                Err(AppError::ExternalApi(
                    "Failed to parse TMDB response".to_string(),
                ))
            } else {
                Ok(record(id))
            }
        });

        let corpus = fetch_corpus(&catalog, 1, Duration::ZERO).await;

        let ids: Vec<MovieId> = corpus.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_fetch_corpus_keeps_duplicates_in_discovery_order() {
        let mut catalog = mock_catalog();
        catalog.expect_popular_page().returning(|page| match page {
            1 => Ok(vec![3, 1]),
            _ => Ok(vec![1, 4]),
        });
        catalog
            .expect_movie_details()
            .returning(|id| Ok(record(id)));

        let corpus = fetch_corpus(&catalog, 2, Duration::ZERO).await;

        let ids: Vec<MovieId> = corpus.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 1, 4]);
    }

    #[tokio::test]
    async fn test_fetch_corpus_first_page_failure_is_empty() {
        let mut catalog = mock_catalog();
        catalog
            .expect_popular_page()
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("status 401".to_string())));
        catalog.expect_movie_details().never();

        let corpus = fetch_corpus(&catalog, 5, Duration::ZERO).await;
        assert!(corpus.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_only_between_pages() {
        let mut catalog = mock_catalog();
        catalog
            .expect_popular_page()
            .times(3)
            .returning(|page| Ok(vec![page as MovieId]));
        catalog
            .expect_movie_details()
            .returning(|id| Ok(record(id)));

        let delay = Duration::from_millis(300);
        let start = tokio::time::Instant::now();
        let corpus = fetch_corpus(&catalog, 3, delay).await;

        assert_eq!(corpus.len(), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= delay * 2 && elapsed < delay * 3, "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_failed_page() {
        let mut catalog = mock_catalog();
        catalog
            .expect_popular_page()
            .times(2)
            .returning(|page| match page {
                1 => Ok(vec![1]),
                _ => Err(AppError::ExternalApi("status 500".to_string())),
            });
        catalog
            .expect_movie_details()
            .returning(|id| Ok(record(id)));

        let delay = Duration::from_millis(300);
        let start = tokio::time::Instant::now();
        let corpus = fetch_corpus(&catalog, 5, delay).await;

        assert_eq!(corpus.len(), 1);
        let elapsed = start.elapsed();
        assert!(elapsed >= delay && elapsed < delay * 2, "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_page_has_no_delay() {
        let mut catalog = mock_catalog();
        catalog.expect_popular_page().returning(|_| Ok(vec![1]));
        catalog
            .expect_movie_details()
            .returning(|id| Ok(record(id)));

        let start = tokio::time::Instant::now();
        fetch_corpus(&catalog, 1, Duration::from_secs(5)).await;

        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_fetch_detail_absent_on_failure() {
        let mut catalog = mock_catalog();
        catalog
            .expect_movie_details()
            .returning(|_| Err(AppError::NotFound("movie".to_string())));

        assert_eq!(fetch_detail(&catalog, 42).await, None);
    }

    #[test]
    fn test_fetch_detail_returns_record() {
        let mut catalog = mock_catalog();
        catalog
            .expect_movie_details()
            .returning(|id| Ok(record(id)));

        let fetched = tokio_test::block_on(fetch_detail(&catalog, 42));
        assert_eq!(fetched, Some(record(42)));
    }
}
