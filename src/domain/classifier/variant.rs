//! Served model identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Closed set of model variants the service can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// Fully fine-tuned BERT weights
    #[default]
    Bert,
    /// BERT base weights with a LoRA adapter merged in
    #[serde(alias = "bert-lora")]
    BertLora,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 2] = [Self::Bert, Self::BertLora];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bert => "bert",
            Self::BertLora => "bert_lora",
        }
    }
}

impl FromStr for ModelVariant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "bert" => Ok(Self::Bert),
            "bert_lora" => Ok(Self::BertLora),
            _ => Err(DomainError::validation(format!("Unknown model '{}'", s))),
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!("bert".parse::<ModelVariant>().unwrap(), ModelVariant::Bert);
        assert_eq!("bert_lora".parse::<ModelVariant>().unwrap(), ModelVariant::BertLora);
        assert_eq!("BERT-LoRA".parse::<ModelVariant>().unwrap(), ModelVariant::BertLora);
    }

    #[test]
    fn test_parse_unknown_variant() {
        let err = "roberta".parse::<ModelVariant>().unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("'roberta'"));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ModelVariant::BertLora).unwrap(), "\"bert_lora\"");
        let parsed: ModelVariant = serde_json::from_str("\"bert-lora\"").unwrap();
        assert_eq!(parsed, ModelVariant::BertLora);
    }
}
