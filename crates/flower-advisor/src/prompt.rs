//! Prompt text and response schema sent to the generative backend.

use serde_json::{json, Value};

use crate::query::month_label;

/// MIME type requested from the backend.
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Low temperature keeps repeated answers for the same query consistent.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Fields every recommendation object must carry.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "rank",
    "name",
    "englishName",
    "plantingPeriod",
    "bloomingPeriod",
    "characteristics",
    "caution",
    "relatedFlowers",
];

/// Build the instruction text for a resolved context.
pub fn build_prompt(context: &str, month: u32) -> String {
    let month = month_label(month);
    format!(
        "사용자 입력: \"{context}\"\n\n\
         당신은 한국의 가드닝 전문가 AI입니다.\n\
         사용자의 입력에 맞춰 다음 규칙에 따라 꽃 추천 리스트를 JSON으로 작성하세요.\n\n\
         1. 대상 시기: 현재 시점({month}) 또는 사용자가 지정한 시기.\n\
         2. 추천 기준: 씨앗 파종보다는 초보자가 접근하기 쉬운 '묘종(모종)' 식재를 우선으로 합니다.\n\
         3. 정렬: 한국 내 유통량과 인기가 가장 높은 순서대로 1위부터 10위까지 rank 오름차순으로 정렬하세요.\n\
         4. 내용: 한국 기후에 적합한 정보를 제공하며, 설명은 친절한 한국어로 작성하세요.\n\n\
         응답은 반드시 지정된 JSON 스키마 형식을 따라야 합니다."
    )
}

/// Response schema in the backend's OpenAPI subset.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "rank": { "type": "INTEGER" },
                "name": { "type": "STRING" },
                "englishName": {
                    "type": "STRING",
                    "description": "Scientific or common English name of the flower for image generation"
                },
                "plantingPeriod": {
                    "type": "STRING",
                    "description": "When to sow seeds or plant seedlings"
                },
                "bloomingPeriod": { "type": "STRING", "description": "When the flower blooms" },
                "characteristics": { "type": "STRING", "description": "Key features of the flower" },
                "caution": { "type": "STRING", "description": "Care instructions or warnings" },
                "relatedFlowers": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "5 specific varieties of this flower ranked by popularity"
                }
            },
            "required": REQUIRED_FIELDS,
            "propertyOrdering": REQUIRED_FIELDS
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_context_and_month() {
        let prompt = build_prompt("수국", 6);
        assert!(prompt.contains("\"수국\""));
        assert!(prompt.contains("6월"));
        assert!(prompt.contains("묘종"));
        assert!(prompt.contains("1위부터 10위까지"));
        assert!(prompt.contains("한국어"));
    }

    #[test]
    fn test_schema_requires_every_field() {
        let schema = response_schema();
        assert_eq!(schema["type"], "ARRAY");
        let items = &schema["items"];
        let required: Vec<&str> = items["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required, REQUIRED_FIELDS);
        for field in REQUIRED_FIELDS {
            assert!(items["properties"].get(field).is_some(), "missing {field}");
        }
        assert_eq!(items["properties"]["rank"]["type"], "INTEGER");
        assert_eq!(items["properties"]["relatedFlowers"]["items"]["type"], "STRING");
    }
}
