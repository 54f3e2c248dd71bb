//! 語彙特徴空間（TF-IDF）
//!
//! 品目テキストとベンダーテキストを同じ語彙空間でベクトル化する。
//! - トークン: 英数字2文字以上（小文字化）
//! - 英語ストップワードを除外してからユニグラム＋バイグラムを生成
//! - idf = ln((1 + n) / (1 + df)) + 1（平滑化）
//! - 各ベクトルはL2正規化

use crate::stopwords::is_stop_word;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::collections::HashMap;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// 疎ベクトル（語彙インデックス昇順）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_map(map: BTreeMap<usize, f64>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, w)| *w == 0.0)
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            if a_idx == b_idx {
                sum += a_w * b_w;
                i += 1;
                j += 1;
            } else if a_idx < b_idx {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }
}

/// コサイン類似度（どちらかがゼロベクトルなら0）
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// 文書をユニグラム＋バイグラムの語に分解
pub fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .collect();

    let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

/// 学習済みTF-IDF空間
#[derive(Debug, Clone, Default)]
pub struct TfidfSpace {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfSpace {
    /// 全文書で語彙とidfを学習し、各文書のベクトルを返す
    pub fn fit_transform(documents: &[String]) -> (Self, Vec<SparseVector>) {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| analyze(d)).collect();

        // 語彙はソート順でインデックスを振る（実行ごとに同じ座標になる）
        let mut terms: Vec<&str> = analyzed
            .iter()
            .flat_map(|doc| doc.iter().map(|t| t.as_str()))
            .collect();
        terms.sort_unstable();
        terms.dedup();

        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();

        let mut df = vec![0usize; vocabulary.len()];
        for doc in &analyzed {
            let mut seen: Vec<usize> = doc.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            seen.sort_unstable();
            seen.dedup();
            for idx in seen {
                df[idx] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let space = Self { vocabulary, idf };
        let vectors = analyzed.iter().map(|doc| space.vectorize(doc)).collect();
        (space, vectors)
    }

    /// 学習済み語彙でテキストをベクトル化（未知語は無視）
    pub fn transform(&self, text: &str) -> SparseVector {
        self.vectorize(&analyze(text))
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn vectorize(&self, terms: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms {
            if let Some(&idx) = self.vocabulary.get(term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        for (idx, weight) in counts.iter_mut() {
            *weight *= self.idf[*idx];
        }

        let norm = counts.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in counts.values_mut() {
                *weight /= norm;
            }
        }

        SparseVector::from_map(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_unigrams_and_bigrams() {
        let terms = analyze("Steel Pipe ASTM A106");
        assert_eq!(
            terms,
            vec!["steel", "pipe", "astm", "a106", "steel pipe", "pipe astm", "astm a106"]
        );
    }

    #[test]
    fn test_analyze_drops_stop_words_and_short_tokens() {
        let terms = analyze("the pipe of a valve");
        assert_eq!(terms, vec!["pipe", "valve", "pipe valve"]);
    }

    #[test]
    fn test_fit_transform_normalized() {
        let docs = vec!["steel pipe".to_string(), "copper wire".to_string()];
        let (space, vectors) = TfidfSpace::fit_transform(&docs);
        assert_eq!(space.vocabulary_len(), 6);
        for v in &vectors {
            assert!((v.norm() - 1.0).abs() < 1e-9);
        }
        assert_eq!(cosine_similarity(&vectors[0], &vectors[1]), 0.0);
    }

    #[test]
    fn test_cosine_identical_documents() {
        let docs = vec!["steel pipe".to_string(), "steel pipe".to_string()];
        let (_, vectors) = TfidfSpace::fit_transform(&docs);
        assert!((cosine_similarity(&vectors[0], &vectors[1]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_stop_word_only_document_is_zero() {
        let docs = vec!["the and of".to_string(), "steel".to_string()];
        let (_, vectors) = TfidfSpace::fit_transform(&docs);
        assert!(vectors[0].is_zero());
        assert_eq!(cosine_similarity(&vectors[0], &vectors[1]), 0.0);
    }

    #[test]
    fn test_transform_ignores_unknown_terms() {
        let docs = vec!["steel pipe".to_string()];
        let (space, _) = TfidfSpace::fit_transform(&docs);
        assert!(space.transform("copper wire").is_zero());
        assert!(!space.transform("steel wire").is_zero());
    }
}
