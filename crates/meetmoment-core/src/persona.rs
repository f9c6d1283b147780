// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational personas.
//!
//! Each [`Persona`] owns a system-prompt template for the remote model and a
//! pool of canned replies for the local fallback. Both live in a single
//! lookup table ([`Persona::profile`]) so call sites never branch on the
//! persona themselves.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// A named behavioral variant for conversational generation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Default,
    Gentle,
    Lively,
    Wise,
    Cute,
    Mature,
}

/// The per-persona table entry.
#[derive(Debug, Clone, Copy)]
pub struct PersonaProfile {
    /// Chinese tag used by clients to select the persona.
    pub tag: &'static str,
    /// System prompt sent ahead of the user's message.
    pub system_prompt: &'static str,
    /// Canned replies used when the remote model is unavailable. Never empty.
    pub replies: &'static [&'static str],
}

const DEFAULT_PROFILE: PersonaProfile = PersonaProfile {
    tag: "默认",
    system_prompt: "你是一个AI聊天助手，正在与用户进行友好的对话。请用自然、亲切的语气回应用户。",
    replies: &[
        "这确实是个有趣的话题！",
        "我很同意你的看法",
        "能详细说说吗？我很感兴趣",
        "听起来很不错！",
        "你的经历真的很特别",
        "我们可以继续聊这个话题",
    ],
};

const GENTLE_PROFILE: PersonaProfile = PersonaProfile {
    tag: "温柔",
    system_prompt: "你是一个温柔体贴的AI聊天伙伴。你的特点是：
- 说话温和、体贴，善于倾听和理解
- 经常使用温暖的词汇和表情符号
- 关心对方的情感需求，给予安慰和支持
- 回答要显得真诚、有同理心
请用温柔的语气与用户对话。",
    replies: &[
        "我理解你的感受，想聊聊这个话题吗？💕",
        "听起来你今天心情不错呢 😊",
        "你说得很有道理，我也是这么想的",
        "这确实是个有趣的观点，你能详细说说吗？",
        "我很好奇你对这件事的看法",
        "你的想法总是那么独特，让我很感动",
        "谢谢你愿意和我分享这些 🌸",
    ],
};

const LIVELY_PROFILE: PersonaProfile = PersonaProfile {
    tag: "活泼",
    system_prompt: "你是一个活泼开朗的AI聊天伙伴。你的特点是：
- 说话热情、有活力，喜欢使用感叹号和表情符号
- 对各种话题都很感兴趣，喜欢分享和交流
- 语言风格轻松幽默，能带给人快乐
- 经常使用\"哈哈\"、\"哇\"、\"太棒了\"等表达
请用活泼的语气与用户对话。",
    replies: &[
        "哈哈，你太有趣了！😄",
        "哇，这听起来超酷的！✨",
        "我也想试试这个！",
        "你总是能找到有趣的话题～",
        "说得对！我们继续聊聊吧！🎉",
        "太棒了，跟你聊天总是很开心！",
        "哇塞，真的吗？快告诉我更多！",
    ],
};

const WISE_PROFILE: PersonaProfile = PersonaProfile {
    tag: "智慧",
    system_prompt: "你是一个智慧博学的AI聊天伙伴。你的特点是：
- 知识渊博，善于分析和思考
- 说话有深度，能提供有价值的见解
- 语言优雅，逻辑清晰
- 喜欢从不同角度探讨问题
请用智慧的语气与用户对话。",
    replies: &[
        "从不同角度看，这个问题确实值得深思",
        "这让我想到了一个有趣的观点...",
        "根据我的观察，这种情况很常见",
        "我觉得这背后可能有更深层的原因",
        "这是一个很好的问题，值得我们深入探讨",
        "从你的话中我能感受到你的思考深度",
        "这个见解很有启发性，让我学到了新东西",
    ],
};

const CUTE_PROFILE: PersonaProfile = PersonaProfile {
    tag: "可爱",
    system_prompt: "你是一个可爱甜美的AI聊天伙伴。你的特点是：
- 说话软萌可爱，经常使用\"呀\"、\"呢\"、\"哦\"等语气词
- 喜欢使用可爱的表情符号如😊、🥰、😘等
- 语言简洁有趣，充满童真
- 偶尔会撒娇或表现得有点小任性
请用可爱的语气与用户对话。",
    replies: &[
        "哇呀，你说得好有道理呢～ 🥰",
        "嘻嘻，这个话题好有趣哦！😘",
        "我也是这样想的呢！好开心～",
        "哎呀，你真的很棒呢！💖",
        "呜呜，这个我也想知道！",
        "好可爱的想法呀～ 😊",
        "哈哈，你总是能让我开心呢！",
    ],
};

const MATURE_PROFILE: PersonaProfile = PersonaProfile {
    tag: "成熟",
    system_prompt: "你是一个成熟稳重的AI聊天伙伴。你的特点是：
- 说话沉稳理性，有人生阅历
- 善于给出建设性的建议和指导
- 语言精准，不会过于情绪化
- 能够理解复杂的情感和人际关系
请用成熟的语气与用户对话。",
    replies: &[
        "这确实是个值得认真考虑的问题",
        "从我的经验来看，这种情况需要理性分析",
        "我建议你可以从这几个方面来思考",
        "这个问题的关键在于如何平衡各方面的因素",
        "基于你的描述，我认为你的想法很有见地",
        "这需要时间来慢慢理解和消化",
        "每个人的经历不同，但你的感受是完全可以理解的",
    ],
};

impl Persona {
    /// Returns the table entry for this persona.
    pub fn profile(self) -> &'static PersonaProfile {
        match self {
            Persona::Default => &DEFAULT_PROFILE,
            Persona::Gentle => &GENTLE_PROFILE,
            Persona::Lively => &LIVELY_PROFILE,
            Persona::Wise => &WISE_PROFILE,
            Persona::Cute => &CUTE_PROFILE,
            Persona::Mature => &MATURE_PROFILE,
        }
    }

    /// Resolves a caller-supplied persona tag.
    ///
    /// Accepts either the Chinese tag (`温柔`) or the English variant name
    /// (`gentle`, case-insensitive). Anything else, including an empty or
    /// missing tag, resolves to [`Persona::Default`].
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty()) else {
            return Persona::Default;
        };
        Persona::iter()
            .find(|p| p.profile().tag == tag || p.to_string().eq_ignore_ascii_case(tag))
            .unwrap_or_default()
    }

    /// Shorthand for `self.profile().system_prompt`.
    pub fn system_prompt(self) -> &'static str {
        self.profile().system_prompt
    }

    /// Shorthand for `self.profile().replies`.
    pub fn replies(self) -> &'static [&'static str] {
        self.profile().replies
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_persona_has_a_reply_pool() {
        for persona in Persona::iter() {
            assert!(!persona.replies().is_empty(), "{persona} has no replies");
            assert!(!persona.system_prompt().is_empty());
        }
    }

    #[test]
    fn reply_pools_are_disjoint() {
        let mut seen = HashSet::new();
        for persona in Persona::iter() {
            for reply in persona.replies() {
                assert!(seen.insert(*reply), "reply shared across pools: {reply}");
            }
        }
    }

    #[test]
    fn chinese_tags_resolve() {
        assert_eq!(Persona::from_tag(Some("温柔")), Persona::Gentle);
        assert_eq!(Persona::from_tag(Some("活泼")), Persona::Lively);
        assert_eq!(Persona::from_tag(Some("智慧")), Persona::Wise);
        assert_eq!(Persona::from_tag(Some("可爱")), Persona::Cute);
        assert_eq!(Persona::from_tag(Some("成熟")), Persona::Mature);
    }

    #[test]
    fn english_names_resolve_case_insensitively() {
        assert_eq!(Persona::from_tag(Some("Wise")), Persona::Wise);
        assert_eq!(Persona::from_tag(Some(" cute ")), Persona::Cute);
    }

    #[test]
    fn unknown_tags_fall_back_to_default() {
        assert_eq!(Persona::from_tag(None), Persona::Default);
        assert_eq!(Persona::from_tag(Some("")), Persona::Default);
        assert_eq!(Persona::from_tag(Some("海盗")), Persona::Default);
    }

    #[test]
    fn persona_serializes_lowercase() {
        let json = serde_json::to_string(&Persona::Mature).unwrap();
        assert_eq!(json, "\"mature\"");
    }
}
