use serde::Serialize;

/// Question topics the assistant has a prepared answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Pneumonia,
    Symptoms,
    Treatment,
    Prevention,
    ResultInquiry,
    SeeDoctor,
}

pub struct TopicRule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
}

/// Evaluated top to bottom; the first rule with a matching keyword wins.
/// A question mentioning both "viêm phổi" and "triệu chứng" is therefore a
/// pneumonia question, so the order must not change.
pub const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        topic: Topic::Pneumonia,
        keywords: &["viêm phổi", "pneumonia"],
    },
    TopicRule {
        topic: Topic::Symptoms,
        keywords: &["triệu chứng", "dấu hiệu"],
    },
    TopicRule {
        topic: Topic::Treatment,
        keywords: &["điều trị", "chữa"],
    },
    TopicRule {
        topic: Topic::Prevention,
        keywords: &["phòng ngừa", "tránh"],
    },
    TopicRule {
        topic: Topic::ResultInquiry,
        keywords: &["kết quả", "phân tích"],
    },
    TopicRule {
        topic: Topic::SeeDoctor,
        keywords: &["bác sĩ", "khám"],
    },
];

/// Classify a free-text question by substring containment on its lowercase
/// form. `None` means no rule matched.
pub fn classify_question(text: &str) -> Option<Topic> {
    let lower = text.to_lowercase();
    let topic = TOPIC_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.topic);
    tracing::debug!(?topic, "Classified chat question");
    topic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_each_topic() {
        assert_eq!(classify_question("Viêm phổi là gì?"), Some(Topic::Pneumonia));
        assert_eq!(classify_question("What is PNEUMONIA?"), Some(Topic::Pneumonia));
        assert_eq!(classify_question("triệu chứng là gì"), Some(Topic::Symptoms));
        assert_eq!(classify_question("Dấu hiệu nặng?"), Some(Topic::Symptoms));
        assert_eq!(classify_question("điều trị thế nào"), Some(Topic::Treatment));
        assert_eq!(classify_question("có chữa được không"), Some(Topic::Treatment));
        assert_eq!(classify_question("làm sao phòng ngừa"), Some(Topic::Prevention));
        assert_eq!(classify_question("nên tránh gì"), Some(Topic::Prevention));
        assert_eq!(classify_question("kết quả của tôi thế nào"), Some(Topic::ResultInquiry));
        assert_eq!(classify_question("giải thích phân tích"), Some(Topic::ResultInquiry));
        assert_eq!(classify_question("tôi có nên gặp bác sĩ"), Some(Topic::SeeDoctor));
        assert_eq!(classify_question("đi khám ở đâu"), Some(Topic::SeeDoctor));
    }

    #[test]
    fn unmatched_question_has_no_topic() {
        assert_eq!(classify_question("xin chào"), None);
        assert_eq!(classify_question(""), None);
    }

    #[test]
    fn earlier_rule_wins_when_several_match() {
        // pneumonia-general precedes symptoms
        assert_eq!(
            classify_question("triệu chứng của viêm phổi"),
            Some(Topic::Pneumonia)
        );
        // treatment precedes see-a-doctor
        assert_eq!(
            classify_question("bác sĩ điều trị thế nào"),
            Some(Topic::Treatment)
        );
        // result-inquiry precedes see-a-doctor
        assert_eq!(
            classify_question("kết quả này có cần đi khám không"),
            Some(Topic::ResultInquiry)
        );
    }

    #[test]
    fn rule_order_is_fixed() {
        let order: Vec<Topic> = TOPIC_RULES.iter().map(|r| r.topic).collect();
        assert_eq!(
            order,
            vec![
                Topic::Pneumonia,
                Topic::Symptoms,
                Topic::Treatment,
                Topic::Prevention,
                Topic::ResultInquiry,
                Topic::SeeDoctor,
            ]
        );
    }
}
