//! Raw (serializable) document form.
//!
//! Shape follows the common raw block layout used by block editors:
//! `{"blocks": [{"key": "..", "type": "..", "text": "..", "data": {..}}]}`.
//! `type` and `data` are optional on input.

use crate::{Block, BlockData, BlockKey, BlockType, Document, ModelError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub key: BlockKey,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub data: BlockData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawDocument {
    pub blocks: Vec<RawBlock>,
}

impl From<&Document> for RawDocument {
    fn from(document: &Document) -> Self {
        RawDocument {
            blocks: document
                .iter()
                .map(|b| RawBlock {
                    key: b.key().clone(),
                    block_type: b.block_type().clone(),
                    text: b.text().to_string(),
                    data: b.data().clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<RawDocument> for Document {
    type Error = ModelError;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        Document::from_blocks(
            raw.blocks
                .into_iter()
                .map(|b| Block::new(b.key, b.block_type, b.text).with_data(b.data)),
        )
    }
}

impl Document {
    /// Parse a document from its raw JSON form.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let raw: RawDocument = serde_json::from_str(json)?;
        Document::try_from(raw)
    }

    /// Serialize to the raw JSON form.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(&RawDocument::from(self))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_with_defaults() {
        let doc = Document::from_json(
            r#"{"blocks":[
                {"key":"a","text":"hello"},
                {"key":"b","type":"header-two","text":"T","data":{"textAlign":"center"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.first().block_type(), &BlockType::Unstyled);
        let b = doc.block(&"b".into()).unwrap();
        assert_eq!(b.block_type(), &BlockType::Heading(2));
        assert_eq!(b.data().get_str("textAlign"), Some("center"));
    }

    #[test]
    fn json_round_trip_preserves_document() {
        let doc = Document::from_blocks([
            Block::new("x", BlockType::Other("x-note".into()), "\tnote"),
            Block::unstyled("y", "plain").with_data(BlockData::new().with("depth", 2)),
        ])
        .unwrap();
        let back = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn malformed_and_duplicate_inputs_error() {
        assert!(matches!(
            Document::from_json("{"),
            Err(ModelError::Raw(_))
        ));
        assert!(matches!(
            Document::from_json(r#"{"blocks":[{"key":"a"},{"key":"a"}]}"#),
            Err(ModelError::DuplicateKey(_))
        ));
        assert!(matches!(
            Document::from_json(r#"{"blocks":[]}"#),
            Err(ModelError::Empty)
        ));
    }
}
