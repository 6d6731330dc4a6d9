use crate::{ChannelMessage, InvalidStroke};

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("malformed JSON message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed binary message: {0}")]
    Binary(#[from] bincode::error::DecodeError),
    #[error("trailing bytes after binary message ({0} unread)")]
    TrailingBytes(usize),
    #[error("invalid message: {0}")]
    Invalid(#[from] InvalidStroke),
}

#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("failed to encode JSON message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode binary message: {0}")]
    Binary(#[from] bincode::error::EncodeError),
}

pub fn encode_text(message: &ChannelMessage) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(message)?)
}

pub fn encode_binary(message: &ChannelMessage) -> Result<Vec<u8>, EncodeError> {
    Ok(bincode::encode_to_vec(message, bincode::config::standard())?)
}

/// Parses a text frame. Missing fields and invalid geometry are both errors.
pub fn decode_text(text: &str) -> Result<ChannelMessage, DecodeError> {
    let message = serde_json::from_str::<ChannelMessage>(text)?;
    message.validate()?;
    Ok(message)
}

pub fn decode_binary(payload: &[u8]) -> Result<ChannelMessage, DecodeError> {
    let (message, read) = bincode::decode_from_slice::<ChannelMessage, _>(
        payload,
        bincode::config::standard(),
    )?;
    if read != payload.len() {
        return Err(DecodeError::TrailingBytes(payload.len() - read));
    }
    message.validate()?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Stroke;

    fn sample() -> ChannelMessage {
        ChannelMessage::Draw(Stroke {
            points: vec![10.0, 10.0, 10.0, 20.0],
            color: "#112233".to_string(),
            width: 4.0,
            erasing: false,
        })
    }

    #[test]
    fn text_frame_uses_draw_tag_and_flat_fields() {
        let text = encode_text(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "draw");
        assert_eq!(value["points"], serde_json::json!([10.0, 10.0, 10.0, 20.0]));
        assert_eq!(value["color"], "#112233");
        assert_eq!(value["width"], 4.0);
        assert_eq!(value["erasing"], false);
    }

    #[test]
    fn decode_text_accepts_integer_coordinates() {
        let text = r##"{"type":"draw","points":[1,2,3,4],"color":"#000","width":2,"erasing":true}"##;
        let ChannelMessage::Draw(stroke) = decode_text(text).unwrap();
        assert_eq!(stroke.points, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(stroke.erasing);
    }

    #[test]
    fn decode_text_rejects_action_tagged_payload() {
        let text = r##"{"action":"draw","points":[5,5],"brushColor":"#abc","brushSize":7,"eraserMode":false}"##;
        assert!(matches!(decode_text(text), Err(DecodeError::Json(_))));

        let renamed = r##"{"type":"draw","points":[5,5],"brushColor":"#abc","brushSize":7,"eraserMode":false}"##;
        assert!(matches!(decode_text(renamed), Err(DecodeError::Json(_))));
    }

    #[test]
    fn decode_text_rejects_missing_field() {
        let text = r##"{"type":"draw","points":[5,5],"color":"#abc","erasing":false}"##;
        assert!(matches!(decode_text(text), Err(DecodeError::Json(_))));
    }

    #[test]
    fn decode_text_rejects_unknown_event() {
        let text = r#"{"type":"clear"}"#;
        assert!(matches!(decode_text(text), Err(DecodeError::Json(_))));
    }

    #[test]
    fn decode_text_rejects_invalid_geometry() {
        let text = r##"{"type":"draw","points":[5],"color":"#abc","width":1,"erasing":false}"##;
        assert!(matches!(
            decode_text(text),
            Err(DecodeError::Invalid(InvalidStroke::OddCoordinates(1)))
        ));
    }

    #[test]
    fn binary_frame_decodes_to_same_message() {
        let payload = encode_binary(&sample()).unwrap();
        assert_eq!(decode_binary(&payload).unwrap(), sample());
    }

    #[test]
    fn binary_frame_rejects_truncation_and_trailing_bytes() {
        let payload = encode_binary(&sample()).unwrap();
        assert!(matches!(
            decode_binary(&payload[..payload.len() - 1]),
            Err(DecodeError::Binary(_))
        ));

        let mut padded = payload.clone();
        padded.push(0);
        assert!(matches!(
            decode_binary(&padded),
            Err(DecodeError::TrailingBytes(1))
        ));
    }
}
