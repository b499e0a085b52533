use std::collections::BTreeMap;

/// Contiguous runs of `n` tokens. `n` below 2 is treated as 2.
pub fn ngrams(tokens: &[String], n: usize) -> Vec<Vec<String>> {
    let n = n.max(2);
    tokens.windows(n).map(<[String]>::to_vec).collect()
}

/// Tuples of `n` tokens that start at each token and skip at most `k`
/// tokens in between, ordered by start position and then by the positions
/// picked. `n` below 2 is treated as 2.
pub fn skipgrams(tokens: &[String], n: usize, k: usize) -> Vec<Vec<String>> {
    let n = n.max(2);
    let mut grams = Vec::new();
    for start in 0..tokens.len() {
        let tail: Vec<usize> = (start + 1..start + n + k).collect();
        for picked in combinations(&tail, n - 1) {
            if picked.last().is_some_and(|&last| last >= tokens.len()) {
                continue;
            }
            let mut gram = Vec::with_capacity(n);
            gram.push(tokens[start].clone());
            gram.extend(picked.iter().map(|&index| tokens[index].clone()));
            grams.push(gram);
        }
    }
    grams
}

/// All `size`-element subsequences of `items` in lexicographic order.
fn combinations(items: &[usize], size: usize) -> Vec<Vec<usize>> {
    if size == 0 {
        return vec![Vec::new()];
    }
    let mut result = Vec::new();
    for (offset, &first) in items.iter().enumerate() {
        for mut rest in combinations(&items[offset + 1..], size - 1) {
            rest.insert(0, first);
            result.push(rest);
        }
    }
    result
}

/// Occurrences of every token containing a letter or digit.
pub fn word_count(tokens: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokens.iter().filter(|token| token.chars().any(char::is_alphanumeric)) {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn joined(grams: &[Vec<String>]) -> Vec<String> {
        grams.iter().map(|gram| gram.join(" ")).collect()
    }

    #[test]
    fn test_trigrams() {
        let grams = ngrams(&tokens("They hated to think of sample sentences ."), 3);
        assert_eq!(grams.len(), 6);
        assert_eq!(joined(&grams)[0], "They hated to");
        assert_eq!(joined(&grams)[5], "sample sentences .");
    }

    #[test]
    fn test_ngram_size_floor() {
        let grams = ngrams(&tokens("a b c"), 0);
        assert_eq!(joined(&grams), vec!["a b", "b c"]);
        assert!(ngrams(&tokens("a"), 2).is_empty());
    }

    #[test]
    fn test_skipgrams_order() {
        let grams = skipgrams(&tokens("They hated to think of sample sentences ."), 3, 1);
        assert_eq!(
            joined(&grams),
            vec![
                "They hated to",
                "They hated think",
                "They to think",
                "hated to think",
                "hated to of",
                "hated think of",
                "to think of",
                "to think sample",
                "to of sample",
                "think of sample",
                "think of sentences",
                "think sample sentences",
                "of sample sentences",
                "of sample .",
                "of sentences .",
                "sample sentences .",
            ]
        );
    }

    #[test]
    fn test_skipgrams_without_skips_are_ngrams() {
        let words = tokens("a b c d");
        assert_eq!(skipgrams(&words, 2, 0), ngrams(&words, 2));
    }

    #[test]
    fn test_word_count_skips_punctuation() {
        let counts = word_count(&tokens("tres tres , tres in ."));
        assert_eq!(counts.get("tres"), Some(&3));
        assert_eq!(counts.get("in"), Some(&1));
        assert_eq!(counts.get(","), None);
    }
}
