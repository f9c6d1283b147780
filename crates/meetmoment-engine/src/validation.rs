// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checks applied to remote replies before they are trusted.

use meetmoment_core::GenerationError;
use meetmoment_core::types::ProfileScore;
use serde::Deserialize;

/// Confidence assigned to a validated remote tag list.
pub const REMOTE_TAG_CONFIDENCE: f64 = 0.9;

/// Longest accepted tag, in characters.
pub const MAX_TAG_CHARS: usize = 10;

/// Fewest valid tags for a remote reply to be accepted.
pub const MIN_VALID_TAGS: usize = 2;

const TAG_SEPARATORS: [char; 3] = [',', '，', '、'];

const CJK_PUNCTUATION: &[char] = &[
    '。', '！', '？', '；', '：', '“', '”', '‘', '’', '《', '》', '（', '）', '【', '】', '·', '…',
];

fn is_tag_noise(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation() || CJK_PUNCTUATION.contains(&c)
}

/// Splits a tag reply into trimmed, deduplicated entries of at most
/// [`MAX_TAG_CHARS`] characters, keeping reply order.
pub fn split_tag_reply(reply: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for raw in reply.split(TAG_SEPARATORS) {
        let tag = raw.trim_matches(is_tag_noise);
        if tag.is_empty() || tag.chars().count() > MAX_TAG_CHARS {
            continue;
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Validates a tag reply, capping the result at `max_tags`.
pub fn parse_tag_reply(reply: &str, max_tags: usize) -> Result<Vec<String>, GenerationError> {
    let mut tags = split_tag_reply(reply);
    if tags.len() < MIN_VALID_TAGS {
        return Err(GenerationError::validation(format!(
            "expected at least {MIN_VALID_TAGS} valid tags, found {}",
            tags.len()
        )));
    }
    tags.truncate(max_tags);
    Ok(tags)
}

/// The JSON report requested by the profile-analysis prompt.
#[derive(Debug, Deserialize)]
struct ProfileReport {
    score: i64,
    completeness: f64,
    attractiveness: f64,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Removes a surrounding Markdown code fence, if any.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn check_percentage(name: &str, value: f64) -> Result<(), GenerationError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(GenerationError::validation(format!(
            "{name} {value} is outside [0, 100]"
        )))
    }
}

/// Parses and range-checks a profile report.
pub fn parse_profile_reply(reply: &str) -> Result<ProfileScore, GenerationError> {
    let report: ProfileReport = serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| GenerationError::malformed(format!("profile report is not valid JSON: {e}")))?;

    let overall = u8::try_from(report.score)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or_else(|| {
            GenerationError::validation(format!("score {} is outside [0, 100]", report.score))
        })?;
    check_percentage("completeness", report.completeness)?;
    check_percentage("attractiveness", report.attractiveness)?;

    Ok(ProfileScore {
        overall,
        completeness: report.completeness,
        attractiveness: report.attractiveness,
        suggestions: report.suggestions,
        strengths: report.strengths,
        keywords: report.keywords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetmoment_core::FailureKind;

    #[test]
    fn splits_on_ascii_and_fullwidth_separators() {
        let tags = split_tag_reply("摄影，旅行, 美食、音乐");
        assert_eq!(tags, vec!["摄影", "旅行", "美食", "音乐"]);
    }

    #[test]
    fn trims_punctuation_and_drops_long_entries() {
        let tags = split_tag_reply("“摄影”, 旅行。, 这是一个远远超过十个字符的标签内容, 摄影");
        assert_eq!(tags, vec!["摄影", "旅行"]);
    }

    #[test]
    fn single_token_reply_fails_validation() {
        let err = parse_tag_reply("abc", 8).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Validation);
    }

    #[test]
    fn valid_reply_is_capped() {
        let reply = "a,b,c,d,e,f,g,h,i,j";
        assert_eq!(parse_tag_reply(reply, 8).unwrap().len(), 8);
        assert_eq!(parse_tag_reply(reply, 3).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn profile_report_parses_plain_json() {
        let reply = r#"{"score": 82, "completeness": 80.0, "attractiveness": 84.5,
            "suggestions": ["多上传照片"], "strengths": ["简介真诚"], "keywords": ["阅读"]}"#;
        let score = parse_profile_reply(reply).unwrap();
        assert_eq!(score.overall, 82);
        assert_eq!(score.attractiveness, 84.5);
        assert_eq!(score.suggestions, vec!["多上传照片"]);
    }

    #[test]
    fn profile_report_parses_fenced_json() {
        let reply = "```json\n{\"score\": 60, \"completeness\": 60, \"attractiveness\": 60}\n```";
        let score = parse_profile_reply(reply).unwrap();
        assert_eq!(score.overall, 60);
        assert!(score.keywords.is_empty());
    }

    #[test]
    fn out_of_range_score_fails_validation() {
        for score in ["101", "-1"] {
            let reply = format!(r#"{{"score": {score}, "completeness": 50, "attractiveness": 50}}"#);
            let err = parse_profile_reply(&reply).unwrap_err();
            assert_eq!(err.kind(), FailureKind::Validation, "score {score}");
        }
    }

    #[test]
    fn out_of_range_subscore_fails_validation() {
        let reply = r#"{"score": 50, "completeness": 150, "attractiveness": 50}"#;
        assert_eq!(
            parse_profile_reply(reply).unwrap_err().kind(),
            FailureKind::Validation
        );
    }

    #[test]
    fn prose_reply_is_malformed() {
        let err = parse_profile_reply("您的资料整体不错，建议多上传照片。").unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedReply);
    }
}
