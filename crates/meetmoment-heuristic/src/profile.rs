// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-based profile scoring.
//!
//! Every function here is deterministic: identical profiles always produce
//! identical scores and advice.

use meetmoment_core::{ProfileFields, ProfileScore};

/// Attractiveness is capped below 100 so no profile reads as perfect.
const ATTRACTIVENESS_CAP: f64 = 95.0;
const ATTRACTIVENESS_BASE: f64 = 50.0;
const MAX_KEYWORDS: usize = 8;

/// Bio keywords that earn a descriptive profile keyword.
const BIO_KEYWORDS: &[(&[&str], &str)] = &[
    (&["旅行", "旅游"], "旅行达人"),
    (&["音乐", "唱歌"], "音乐爱好者"),
    (&["运动", "健身"], "运动健将"),
];

fn bio_len(fields: &ProfileFields) -> usize {
    fields.bio.chars().count()
}

/// Share of the five basic fields that are filled in, as a percentage.
///
/// Each present field adds the same weight, so filling a missing field can
/// never lower the score.
pub fn profile_completeness(fields: &ProfileFields) -> f64 {
    let present = [
        fields.age > 0,
        !fields.occupation.trim().is_empty(),
        !fields.bio.trim().is_empty(),
        !fields.interests.is_empty(),
        !fields.photos.is_empty(),
    ];
    let filled = present.iter().filter(|p| **p).count() as f64;
    filled / present.len() as f64 * 100.0
}

/// Base score plus bonuses for bio length, interests, and photos, capped at 95.
pub fn profile_attractiveness(fields: &ProfileFields) -> f64 {
    let mut score = ATTRACTIVENESS_BASE;

    let bio = bio_len(fields);
    if bio > 20 {
        score += 10.0;
    }
    if bio > 50 {
        score += 5.0;
    }

    score += fields.interests.len() as f64 * 3.0;
    score += fields.photos.len() as f64 * 5.0;

    score.min(ATTRACTIVENESS_CAP)
}

/// Improvement advice for the weak parts of a profile.
pub fn profile_suggestions(fields: &ProfileFields) -> Vec<String> {
    let mut suggestions = Vec::new();

    if bio_len(fields) < 20 {
        suggestions.push("完善个人简介，展示你的个性和魅力".to_string());
    }
    if fields.interests.len() < 3 {
        suggestions.push("添加更多兴趣爱好，让别人更了解你".to_string());
    }
    if fields.photos.len() < 3 {
        suggestions.push("上传更多生活照片，展示不同面的自己".to_string());
    }
    if fields.occupation.trim().is_empty() {
        suggestions.push("填写职业信息，增加资料可信度".to_string());
    }
    suggestions.push("定期更新动态，保持活跃度".to_string());

    suggestions
}

/// Strong points of a profile; always at least one entry.
pub fn profile_strengths(fields: &ProfileFields) -> Vec<String> {
    let mut strengths = Vec::new();

    if bio_len(fields) > 50 {
        strengths.push("个人简介详细有趣".to_string());
    }
    if fields.interests.len() >= 5 {
        strengths.push("兴趣爱好广泛".to_string());
    }
    if fields.photos.len() >= 5 {
        strengths.push("照片丰富多样".to_string());
    }

    if strengths.is_empty() {
        strengths.push("真诚自然".to_string());
        strengths.push("有发展潜力".to_string());
    }
    strengths
}

/// Interests, occupation, and bio-derived labels, de-duplicated, at most 8.
pub fn profile_keywords(fields: &ProfileFields) -> Vec<String> {
    let bio = fields.bio.to_lowercase();

    let candidates = fields
        .interests
        .iter()
        .map(|i| i.trim())
        .chain(std::iter::once(fields.occupation.trim()))
        .chain(
            BIO_KEYWORDS
                .iter()
                .filter(|(needles, _)| needles.iter().any(|n| bio.contains(n)))
                .map(|(_, label)| *label),
        )
        .filter(|k| !k.is_empty());

    let mut keywords: Vec<String> = Vec::new();
    for keyword in candidates {
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
        if !keywords.iter().any(|k| k == keyword) {
            keywords.push(keyword.to_string());
        }
    }
    keywords
}

/// Full local analysis: overall is the truncated mean of completeness and
/// attractiveness.
pub fn analyze_profile(fields: &ProfileFields) -> ProfileScore {
    let completeness = profile_completeness(fields);
    let attractiveness = profile_attractiveness(fields);
    let overall = ((completeness + attractiveness) / 2.0).clamp(0.0, 100.0) as u8;

    ProfileScore {
        overall,
        completeness,
        attractiveness,
        suggestions: profile_suggestions(fields),
        strengths: profile_strengths(fields),
        keywords: profile_keywords(fields),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_profile() -> ProfileFields {
        ProfileFields {
            age: 27,
            occupation: "设计师".into(),
            bio: "热爱生活的设计师，喜欢旅行和音乐，周末会去健身房运动，也喜欢在咖啡馆里安静地读一本书，期待认识有趣的你，一起去看看世界。".into(),
            interests: vec![
                "旅行".into(),
                "音乐".into(),
                "健身".into(),
                "阅读".into(),
                "咖啡".into(),
            ],
            photos: (0..5).map(|i| format!("photo-{i}.jpg")).collect(),
        }
    }

    #[test]
    fn empty_profile_scores() {
        let empty = ProfileFields::default();
        assert_eq!(profile_completeness(&empty), 0.0);
        assert_eq!(profile_attractiveness(&empty), 50.0);
        let score = analyze_profile(&empty);
        assert_eq!(score.overall, 25);
        assert_eq!(score.strengths, vec!["真诚自然", "有发展潜力"]);
        assert!(score.keywords.is_empty());
    }

    #[test]
    fn full_profile_is_complete() {
        let fields = full_profile();
        assert_eq!(profile_completeness(&fields), 100.0);
        assert_eq!(profile_attractiveness(&fields), 95.0);
        let score = analyze_profile(&fields);
        assert_eq!(score.overall, 97);
        assert_eq!(score.suggestions, vec!["定期更新动态，保持活跃度"]);
        assert_eq!(
            score.strengths,
            vec!["个人简介详细有趣", "兴趣爱好广泛", "照片丰富多样"]
        );
    }

    #[test]
    fn attractiveness_bonuses_accumulate() {
        let fields = ProfileFields {
            bio: "一二三四五六七八九十一二三四五六七八九十一".into(),
            interests: vec!["a".into(), "b".into()],
            photos: vec!["p".into()],
            ..Default::default()
        };
        // 50 + 10 (bio > 20) + 6 (two interests) + 5 (one photo)
        assert_eq!(profile_attractiveness(&fields), 71.0);
    }

    #[test]
    fn keywords_are_deduplicated_and_capped() {
        let fields = ProfileFields {
            occupation: "旅行".into(),
            bio: "喜欢旅游和唱歌".into(),
            interests: (0..10).map(|i| format!("兴趣{}", i % 9)).collect(),
            ..Default::default()
        };
        let keywords = profile_keywords(&fields);
        assert_eq!(keywords.len(), 8);
        assert_eq!(keywords[0], "兴趣0");
        assert_eq!(keywords[7], "兴趣7");
    }

    #[test]
    fn keywords_include_bio_labels() {
        let fields = ProfileFields {
            occupation: "工程师".into(),
            bio: "平时喜欢健身，也爱旅行".into(),
            interests: vec!["摄影".into()],
            ..Default::default()
        };
        assert_eq!(
            profile_keywords(&fields),
            vec!["摄影", "工程师", "旅行达人", "运动健将"]
        );
    }

    #[test]
    fn analysis_is_deterministic() {
        let fields = full_profile();
        assert_eq!(analyze_profile(&fields), analyze_profile(&fields));
    }
}
