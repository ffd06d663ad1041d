use serde_json::Value;

use crate::models::DiagnosticLabel;
use crate::pipeline::classifier::ClassifierResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryContent {
    pub details: String,
    pub recommendations: Vec<String>,
}

/// Explanation and next steps for a result.
///
/// Server content is used when it is usable, first at the top level and
/// then under `advice`; otherwise the static table for the label applies.
pub fn resolve_advice(label: DiagnosticLabel, response: &ClassifierResponse) -> AdvisoryContent {
    let details = usable_details(response.get("details"))
        .or_else(|| usable_details(response.advice("details")))
        .unwrap_or_else(|| fallback_details(label).to_string());

    let recommendations = usable_recommendations(response.get("recommendations"))
        .or_else(|| usable_recommendations(response.advice("recommendations")))
        .unwrap_or_else(|| {
            fallback_recommendations(label)
                .iter()
                .map(|item| item.to_string())
                .collect()
        });

    AdvisoryContent {
        details,
        recommendations,
    }
}

fn usable_details(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// String entries that are non-empty after trimming; `None` when none remain.
fn usable_recommendations(value: Option<&Value>) -> Option<Vec<String>> {
    let items: Vec<String> = value?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

pub fn fallback_details(label: DiagnosticLabel) -> &'static str {
    match label {
        DiagnosticLabel::Normal => "Mô hình không thấy dấu hiệu viêm phổi rõ rệt trên ảnh.",
        DiagnosticLabel::Bacterial => {
            "Gợi ý viêm phổi do vi khuẩn: tổn thương có thể khu trú/đông đặc rõ, biên sắc nét hơn."
        }
        DiagnosticLabel::Virus => {
            "Gợi ý viêm phổi do virus: pattern mờ lan tỏa/kính mờ, có thể hai bên; tổn thương thường không khu trú."
        }
    }
}

pub fn fallback_recommendations(label: DiagnosticLabel) -> &'static [&'static str] {
    match label {
        DiagnosticLabel::Normal => &[
            "Tiếp tục theo dõi triệu chứng (ho, sốt, khó thở).",
            "Khám sức khỏe định kỳ theo khuyến cáo.",
        ],
        DiagnosticLabel::Bacterial => &[
            "Khám bác sĩ sớm để đánh giá và cân nhắc kháng sinh.",
            "Có thể làm công thức máu/CRP theo chỉ định.",
            "Uống đủ nước; theo dõi sốt và hô hấp.",
        ],
        DiagnosticLabel::Virus => &[
            "Tham vấn bác sĩ; thường ưu tiên điều trị triệu chứng và theo dõi.",
            "Cân nhắc test virus hô hấp (Influenza/RSV/SARS-CoV-2) theo chỉ định.",
            "Nghỉ ngơi, bù nước; theo dõi SpO₂ và dấu hiệu nặng.",
        ],
    }
}
