//! Two-row dynamic-programming Levenshtein distance and near-match lookup
//! (`spec.md` §4.9, §8 property 9).

/// Case-insensitive edit distance between `a` and `b`. Uses two rolling
/// rows instead of a full matrix since only the previous row is ever read.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Near matches for `target` among `candidates`: exact (case-insensitive)
/// matches excluded, filtered to `max_distance`, sorted ascending by
/// distance, truncated to `max_suggestions`.
pub fn find_similar(target: &str, candidates: &[String], max_distance: usize, max_suggestions: usize) -> Vec<String> {
    let target_lower = target.to_lowercase();
    let mut scored: Vec<(usize, &String)> = candidates
        .iter()
        .filter(|c| c.to_lowercase() != target_lower)
        .map(|c| (levenshtein_distance(target, c), c))
        .filter(|(dist, _)| *dist <= max_distance)
        .collect();
    scored.sort_by_key(|(dist, _)| *dist);
    scored.into_iter().take(max_suggestions).map(|(_, c)| c.clone()).collect()
}

/// `find_similar` with the spec's default thresholds (`maxDistance=2`,
/// `maxSuggestions=3`).
pub fn find_similar_default(target: &str, candidates: &[String]) -> Vec<String> {
    find_similar(target, candidates, 2, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_case_insensitive() {
        assert_eq!(levenshtein_distance("Customer", "customer"), 0);
    }

    #[test]
    fn distance_counts_single_edits() {
        assert_eq!(levenshtein_distance("customer", "custmer"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn excludes_exact_matches_and_sorts_ascending() {
        let candidates = vec!["customer".to_string(), "custmer".to_string(), "cust".to_string()];
        let result = find_similar_default("custmer", &candidates);
        assert!(!result.contains(&"custmer".to_string()));
        assert_eq!(result[0], "customer");
    }

    #[test]
    fn respects_max_distance_and_max_suggestions() {
        let candidates = vec!["aaaa".to_string(), "aaab".to_string(), "zzzz".to_string()];
        let result = find_similar("aaaa", &candidates, 1, 3);
        assert_eq!(result, vec!["aaab".to_string()]);
    }
}
