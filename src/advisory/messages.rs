use super::rules::{classify_question, Topic};
use crate::models::AnalysisResult;

pub const PNEUMONIA_ANSWER: &str = "Viêm phổi là một bệnh nhiễm trùng gây viêm trong các túi khí của một hoặc cả hai phổi. Các triệu chứng thường gặp bao gồm ho có đờm, sốt, ớn lạnh và khó thở. Điều quan trọng là phải được chẩn đoán và điều trị sớm bởi bác sĩ.";

pub const SYMPTOMS_ANSWER: &str = "Các triệu chứng chính của viêm phổi bao gồm:\n• Ho có đờm (có thể có máu)\n• Sốt, ớn lạnh\n• Khó thở hoặc thở nhanh\n• Đau ngực khi thở sâu hoặc ho\n• Mệt mỏi\n• Buồn nôn, nôn mửa hoặc tiêu chảy\n\nNếu có các triệu chứng này, hãy đến gặp bác sĩ ngay.";

pub const TREATMENT_ANSWER: &str = "Điều trị viêm phổi phụ thuộc vào nguyên nhân:\n• Viêm phổi do vi khuẩn: Kháng sinh\n• Viêm phổi do virus: Thuốc kháng virus\n• Nghỉ ngơi, uống nhiều nước\n• Thuốc giảm đau, hạ sốt\n\nLưu ý: Chỉ dùng thuốc theo chỉ định của bác sĩ. Không tự ý dùng kháng sinh.";

pub const PREVENTION_ANSWER: &str = "Cách phòng ngừa viêm phổi:\n• Tiêm vắc-xin phòng ngừa (phế cầu khuẩn, cúm)\n• Rửa tay thường xuyên\n• Tránh hút thuốc\n• Tăng cường sức khỏe bằng ăn uống đủ chất, tập thể dục\n• Tránh tiếp xúc với người bệnh\n• Đeo khẩu trang khi cần thiết";

pub const SEE_DOCTOR_ANSWER: &str = "Tôi khuyên bạn nên đến gặp bác sĩ chuyên khoa Hô hấp hoặc Nội khoa để được khám và tư vấn chính xác. AI chỉ có thể hỗ trợ tham khảo, không thể thay thế chẩn đoán y khoa chuyên nghiệp.";

pub const RESULT_NORMAL_ANSWER: &str = "Kết quả phân tích cho thấy phổi có vẻ bình thường. Tuy nhiên, đây chỉ là phân tích của AI. Nếu bạn có triệu chứng lo ngại, vẫn nên tham khảo ý kiến bác sĩ.";

pub const RESULT_MISSING_ANSWER: &str = "Bạn chưa upload ảnh X-quang nào để phân tích. Hãy upload ảnh trước để tôi có thể tư vấn về kết quả cụ thể.";

pub const DEFAULT_ANSWER: &str = "Cảm ơn câu hỏi của bạn. Tôi có thể giúp bạn tìm hiểu về viêm phổi, triệu chứng, điều trị và phòng ngừa. Bạn có thể hỏi tôi về những chủ đề này. Tuy nhiên, để có chẩn đoán chính xác, bạn vẫn nên tham khảo ý kiến bác sĩ.";

pub const WELCOME_WITHOUT_RESULT: &str = "Xin chào! Tôi là trợ lý AI chuyên về viêm phổi. Tôi có thể giúp bạn hiểu thêm về bệnh viêm phổi, triệu chứng, và cách phòng ngừa. Bạn có câu hỏi gì không?";

/// Answer a user question, optionally in the context of the current result.
pub fn respond(question: &str, current: Option<&AnalysisResult>) -> String {
    match classify_question(question) {
        Some(topic) => answer_for(topic, current),
        None => DEFAULT_ANSWER.to_string(),
    }
}

pub fn answer_for(topic: Topic, current: Option<&AnalysisResult>) -> String {
    match topic {
        Topic::Pneumonia => PNEUMONIA_ANSWER.to_string(),
        Topic::Symptoms => SYMPTOMS_ANSWER.to_string(),
        Topic::Treatment => TREATMENT_ANSWER.to_string(),
        Topic::Prevention => PREVENTION_ANSWER.to_string(),
        Topic::ResultInquiry => result_answer(current),
        Topic::SeeDoctor => SEE_DOCTOR_ANSWER.to_string(),
    }
}

fn result_answer(current: Option<&AnalysisResult>) -> String {
    match current {
        Some(result) if result.label.is_pneumonia() => format!(
            "Kết quả phân tích cho thấy nghi ngờ viêm phổi với độ tin cậy {}%. Đây chỉ là kết quả tham khảo từ AI. Tôi khuyên bạn nên đến gặp bác sĩ để được khám và chẩn đoán chính xác.",
            result.top_confidence_percent()
        ),
        Some(_) => RESULT_NORMAL_ANSWER.to_string(),
        None => RESULT_MISSING_ANSWER.to_string(),
    }
}

/// First assistant message of a conversation.
pub fn welcome_message(current: Option<&AnalysisResult>) -> String {
    let Some(result) = current else {
        return WELCOME_WITHOUT_RESULT.to_string();
    };

    let finding = if result.label.is_pneumonia() {
        format!(
            "Kết quả cho thấy nghi ngờ viêm phổi với độ tin cậy {}%. ",
            result.top_confidence_percent()
        )
    } else {
        "Kết quả cho thấy phổi bình thường. ".to_string()
    };

    format!(
        "Xin chào! Tôi đã nhận được kết quả phân tích ảnh X-quang của bạn. {finding}Bạn có muốn hỏi gì về kết quả này không?"
    )
}
