use serde::{Deserialize, Serialize};

/// A string did not match any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} value: '{value}'")]
pub struct InvalidEnum {
    pub field: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    /// Closed classification outcome of a chest X-ray.
    DiagnosticLabel {
        Normal => "NORMAL",
        Bacterial => "BACTERIAL",
        Virus => "VIRUS",
    }
);

impl DiagnosticLabel {
    /// Canonical order. Also the tie-break order when inferring a label.
    pub const ALL: [DiagnosticLabel; 3] = [Self::Normal, Self::Bacterial, Self::Virus];

    /// Both non-normal classes are reported to the user as suspected pneumonia.
    pub fn is_pneumonia(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Caption shown next to a result in the history list.
    pub fn caption(&self) -> &'static str {
        match self {
            Self::Normal => "Bình thường",
            Self::Bacterial => "Nghi ngờ viêm phổi (vi khuẩn)",
            Self::Virus => "Nghi ngờ viêm phổi (virus)",
        }
    }
}

str_enum!(
    /// Whether the label came from the classifier or had to be inferred
    /// from the probabilities because the classifier's token was unknown.
    LabelSource {
        Reported => "reported",
        Inferred => "inferred",
    }
);

str_enum!(MessageSender {
    User => "user",
    Assistant => "assistant",
});

str_enum!(ChatState {
    Idle => "idle",
    AwaitingResponse => "awaiting_response",
});

str_enum!(
    /// What the chat does with a submission that arrives while a reply is pending.
    BusyPolicy {
        Reject => "reject",
        CancelPrevious => "cancel_previous",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn label_round_trips_through_as_str() {
        for label in DiagnosticLabel::ALL {
            assert_eq!(DiagnosticLabel::from_str(label.as_str()).unwrap(), label);
        }
    }

    #[test]
    fn label_from_str_is_exact() {
        assert!(DiagnosticLabel::from_str("normal").is_err());
        assert!(DiagnosticLabel::from_str("VIRAL").is_err());
        let err = DiagnosticLabel::from_str("FUNGAL").unwrap_err();
        assert_eq!(err.field, "DiagnosticLabel");
        assert_eq!(err.value, "FUNGAL");
    }

    #[test]
    fn label_serializes_as_uppercase_token() {
        let json = serde_json::to_string(&DiagnosticLabel::Bacterial).unwrap();
        assert_eq!(json, "\"BACTERIAL\"");
        let back: DiagnosticLabel = serde_json::from_str("\"VIRUS\"").unwrap();
        assert_eq!(back, DiagnosticLabel::Virus);
    }

    #[test]
    fn only_normal_is_not_pneumonia() {
        assert!(!DiagnosticLabel::Normal.is_pneumonia());
        assert!(DiagnosticLabel::Bacterial.is_pneumonia());
        assert!(DiagnosticLabel::Virus.is_pneumonia());
    }

    #[test]
    fn busy_policy_parses_config_tokens() {
        assert_eq!(BusyPolicy::from_str("reject").unwrap(), BusyPolicy::Reject);
        assert_eq!(
            BusyPolicy::from_str("cancel_previous").unwrap(),
            BusyPolicy::CancelPrevious
        );
        assert!(BusyPolicy::from_str("queue").is_err());
    }

    #[test]
    fn chat_state_serializes_snake_case() {
        let json = serde_json::to_string(&ChatState::AwaitingResponse).unwrap();
        assert_eq!(json, "\"awaiting_response\"");
    }
}
