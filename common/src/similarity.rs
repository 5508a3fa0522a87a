//! 文字列類似度
//!
//! LCS（最長共通部分列）による編集比率と、語順を無視する token sort 比率。

/// 2文字列のLCS長（文字単位）
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// 編集比率 (0.0-1.0)
///
/// `2 * LCS / (len(a) + len(b))`。挿入・削除のみの編集距離を正規化した値と等しい。
/// 両方空なら 1.0。
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(&a, &b)) as f64 / total as f64
}

/// 空白区切りトークンを並べ替えて連結
fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// 語順を無視した類似度 (0-100)
///
/// どちらかが空なら 0。
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let a = sorted_tokens(a);
    let b = sorted_tokens(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    (ratio(&a, &b) * 100.0).round_ties_even() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical_and_disjoint() {
        assert_eq!(ratio("mango", "mango"), 1.0);
        assert_eq!(ratio("abc", "xyz"), 0.0);
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn test_ratio_partial() {
        // LCS("naranja", "mango") = "an"
        let r = ratio("naranja", "mango");
        assert!((r - 4.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_token_sort_ignores_order() {
        assert_eq!(token_sort_ratio("jugo naranja 1l", "naranja 1l jugo"), 100);
    }

    #[test]
    fn test_token_sort_symmetric() {
        let pairs = [
            ("aceite oliva 1l", "aceite oliva 1 litro"),
            ("galletas chocolate 200g", "galleta choco 200 g"),
            ("arroz blanco", "arroz integral 1kg"),
        ];
        for (a, b) in pairs {
            assert_eq!(token_sort_ratio(a, b), token_sort_ratio(b, a));
        }
    }

    #[test]
    fn test_token_sort_known_scores() {
        assert_eq!(token_sort_ratio("aceite oliva 1l", "aceite oliva 1 litro"), 80);
        assert_eq!(token_sort_ratio("aceite oliva 1l", "aceite oliva 1 l"), 90);
        assert_eq!(token_sort_ratio("aceite oliva 500ml", "aceite oliva 1l"), 85);
    }

    #[test]
    fn test_token_sort_empty() {
        assert_eq!(token_sort_ratio("", "jugo"), 0);
        assert_eq!(token_sort_ratio("", ""), 0);
    }
}
