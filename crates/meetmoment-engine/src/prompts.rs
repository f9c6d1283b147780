// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt construction for each generation operation.

use std::collections::BTreeMap;
use std::fmt::Write;

use meetmoment_core::persona::Persona;
use meetmoment_core::types::ProfileFields;

/// System prompt for profile analysis.
pub const PROFILE_ANALYST_PROMPT: &str =
    "你是一个专业的用户资料分析师，请客观分析用户资料并给出建设性建议。";

/// Guardrail sent with every image task.
pub const NEGATIVE_PROMPT: &str = "low quality, blurry, distorted, deformed, ugly, bad anatomy, \
     extra limbs, missing limbs, mutation, watermark, text, signature";

const CONTEXT_HEADER: &str = "\n\n当前对话上下文：";
const CONVERSATION_FOOTER: &str = "\n\n请保持角色一致性，用中文回答，回答长度控制在100字以内。";

/// User payload asking the model for a comma-separated tag list.
pub fn tag_prompt(content: &str) -> String {
    format!(
        "请分析以下文本内容，提取出相关的兴趣标签，每个标签用中文表示，最多返回8个标签。\n\
         文本内容：{content}\n\n\
         请只返回标签列表，用逗号分隔，不要其他解释。"
    )
}

/// Persona template, optional context block (sorted by key), then the
/// consistency and length instruction.
pub fn conversation_system_prompt(persona: Persona, context: &BTreeMap<String, String>) -> String {
    let mut prompt = persona.system_prompt().to_string();
    if !context.is_empty() {
        prompt.push_str(CONTEXT_HEADER);
        for (key, value) in context {
            let _ = write!(prompt, "\n- {key}: {value}");
        }
    }
    prompt.push_str(CONVERSATION_FOOTER);
    prompt
}

/// User payload asking for a JSON profile report.
pub fn profile_prompt(fields: &ProfileFields) -> String {
    format!(
        "请分析以下用户资料的完整度和吸引力，给出评分和建议：\n\n\
         年龄：{age}\n\
         职业：{occupation}\n\
         个人简介：{bio}\n\
         兴趣爱好：{interests}\n\
         照片数量：{photos}\n\n\
         请从以下方面进行分析：\n\
         1. 资料完整度评分（0-100分）\n\
         2. 个人魅力评分（0-100分）\n\
         3. 改进建议（3-5条）\n\
         4. 优势特点（2-3条）\n\
         5. 关键词标签（5-8个）\n\n\
         请用JSON格式返回结果，字段为 score、completeness、attractiveness、suggestions、strengths、keywords。",
        age = fields.age,
        occupation = fields.occupation,
        bio = fields.bio,
        interests = fields.interests.join("、"),
        photos = fields.photos.len(),
    )
}

/// Wraps a free-form description in the photographic portrait template.
pub fn portrait_prompt(description: &str) -> String {
    format!(
        "高清写实人像头像摄影，{description}，专业摄影，柔和自然光线，清晰五官，温和表情，现代时尚，高质量，8K分辨率"
    )
}
