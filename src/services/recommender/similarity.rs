use super::vectorizer::FeatureMatrix;

/// Dense pairwise cosine similarity between corpus rows
///
/// Rows of the feature matrix are unit length (or all-zero), so the linear kernel
/// is the cosine similarity. Only the upper triangle is computed and then mirrored.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn from_features(features: &FeatureMatrix) -> Self {
        let size = features.n_rows();
        let mut values = vec![0.0; size * size];

        for i in 0..size {
            for j in i..size {
                let score = features.rows[i].dot(&features.rows[j]).clamp(0.0, 1.0);
                values[i * size + j] = score;
                values[j * size + i] = score;
            }
        }

        tracing::debug!(
            rows = size,
            terms = features.n_terms(),
            "Similarity matrix built"
        );

        Self { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.size && j < self.size {
            Some(self.values[i * self.size + j])
        } else {
            None
        }
    }

    /// Similarity of row `i` against every row
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.size {
            Some(&self.values[i * self.size..(i + 1) * self.size])
        } else {
            None
        }
    }
}
