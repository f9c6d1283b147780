// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-based interest tag extraction.

use rand::Rng;

/// Keyword to canonical tag table (contains match on lower-cased content).
///
/// Order matters: tags with equal match counts are emitted in the order
/// their first keyword appears in this table.
const TAG_KEYWORDS: &[(&str, &str)] = &[
    ("摄影", "摄影"),
    ("拍照", "摄影"),
    ("photo", "摄影"),
    ("旅行", "旅行"),
    ("旅游", "旅行"),
    ("travel", "旅行"),
    ("电影", "影视"),
    ("看电影", "影视"),
    ("movie", "影视"),
    ("film", "影视"),
    ("运动", "运动健身"),
    ("健身", "运动健身"),
    ("fitness", "运动健身"),
    ("gym", "运动健身"),
    ("音乐", "音乐"),
    ("唱歌", "音乐"),
    ("music", "音乐"),
    ("读书", "阅读"),
    ("阅读", "阅读"),
    ("reading", "阅读"),
    ("美食", "美食"),
    ("吃", "美食"),
    ("food", "美食"),
    ("游戏", "游戏"),
    ("gaming", "游戏"),
    ("艺术", "艺术"),
    ("绘画", "艺术"),
    ("咖啡", "咖啡"),
    ("coffee", "咖啡"),
    ("宠物", "宠物"),
    ("狗", "宠物"),
    ("猫", "宠物"),
    ("瑜伽", "瑜伽"),
    ("yoga", "瑜伽"),
    ("舞蹈", "舞蹈"),
    ("跳舞", "舞蹈"),
    ("书法", "书法"),
];

/// Returned when no keyword matches.
pub const GENERIC_TAGS: [&str; 3] = ["生活", "社交", "娱乐"];

/// Extracts canonical interest tags from free text, most-matched first.
///
/// Never returns an empty list: content with no recognizable keyword
/// yields [`GENERIC_TAGS`].
pub fn extract_tags(content: &str) -> Vec<String> {
    let lower = content.to_lowercase();

    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for &(keyword, tag) in TAG_KEYWORDS {
        if !lower.contains(keyword) {
            continue;
        }
        match counts.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, count)) => *count += 1,
            None => counts.push((tag, 1)),
        }
    }

    if counts.is_empty() {
        return GENERIC_TAGS.iter().map(|t| t.to_string()).collect();
    }

    // Stable: equal counts keep table order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(tag, _)| tag.to_string()).collect()
}

/// Confidence for heuristically extracted tags.
///
/// Short content (under 10 characters) scores 0.6, an empty tag list 0.3,
/// and anything else a uniform draw from `[0.85, 0.95)`.
pub fn tag_confidence<R: Rng + ?Sized>(content: &str, tags: &[String], rng: &mut R) -> f64 {
    if content.chars().count() < 10 {
        return 0.6;
    }
    if tags.is_empty() {
        return 0.3;
    }
    rng.gen_range(0.85..0.95)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn synonyms_collapse_to_one_tag() {
        let tags = extract_tags("我喜欢摄影，周末经常出去拍照");
        assert_eq!(tags, vec!["摄影"]);
    }

    #[test]
    fn multiple_interests_keep_table_order() {
        let tags = extract_tags("喜欢音乐和旅行，偶尔健身");
        assert_eq!(tags, vec!["旅行", "运动健身", "音乐"]);
    }

    #[test]
    fn most_matched_tag_comes_first() {
        let tags = extract_tags("拍照也行，但最爱电影，movie 和 film 都看");
        assert_eq!(tags, vec!["影视", "摄影"]);
    }

    #[test]
    fn english_keywords_match_case_insensitively() {
        let tags = extract_tags("Weekend COFFEE and a good Movie");
        assert_eq!(tags, vec!["影视", "咖啡"]);
    }

    #[test]
    fn no_match_returns_generic_triple() {
        assert_eq!(extract_tags("abc"), vec!["生活", "社交", "娱乐"]);
        assert_eq!(extract_tags(""), vec!["生活", "社交", "娱乐"]);
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "猫 狗 宠物 咖啡 瑜伽 舞蹈 书法 绘画";
        assert_eq!(extract_tags(text), extract_tags(text));
    }

    #[test]
    fn short_content_has_fixed_confidence() {
        let mut rng = StdRng::seed_from_u64(7);
        let tags = vec!["摄影".to_string()];
        assert_eq!(tag_confidence("拍照", &tags, &mut rng), 0.6);
    }

    #[test]
    fn empty_tags_have_low_confidence() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(tag_confidence("这是一段足够长的个人介绍文字", &[], &mut rng), 0.3);
    }

    #[test]
    fn normal_confidence_is_in_jitter_band() {
        let mut rng = StdRng::seed_from_u64(7);
        let tags = vec!["旅行".to_string()];
        for _ in 0..100 {
            let c = tag_confidence("我最喜欢的事情就是旅行和看海", &tags, &mut rng);
            assert!((0.85..0.95).contains(&c), "out of band: {c}");
        }
    }
}
