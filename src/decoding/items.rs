//! Item and chest page encoding
//!
//! Items are stored as base64 (standard alphabet) of their JSON form. A chest
//! page is a JSON array with `null` for empty slots.

use super::DecodeError;
use crate::island_cache::{ChestPage, ItemStack};
use base64::{engine::general_purpose::STANDARD, Engine};

fn decode_json(raw: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(STANDARD.decode(raw.trim())?)
}

pub fn decode_item(raw: &str) -> Result<ItemStack, DecodeError> {
    let bytes = decode_json(raw)?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn decode_chest_contents(raw: &str) -> Result<ChestPage, DecodeError> {
    let bytes = decode_json(raw)?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn encode_item(item: &ItemStack) -> Result<String, DecodeError> {
    Ok(STANDARD.encode(serde_json::to_vec(item)?))
}

pub fn encode_chest_contents(page: &[Option<ItemStack>]) -> Result<String, DecodeError> {
    Ok(STANDARD.encode(serde_json::to_vec(page)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_chest_with_empty_slots() {
        let raw = STANDARD.encode(r#"[null,{"type":"DIAMOND","amount":4},null]"#);
        let page = decode_chest_contents(&raw).unwrap();

        assert_eq!(page.len(), 3);
        assert!(page[0].is_none());
        assert_eq!(page[1].as_ref().unwrap().material, "DIAMOND");
        assert_eq!(page[1].as_ref().unwrap().amount, 4);
    }

    #[test]
    fn test_item_amount_defaults_to_one() {
        let raw = STANDARD.encode(r#"{"type":"OAK_SIGN","display_name":"Spawn"}"#);
        let item = decode_item(&raw).unwrap();
        assert_eq!(item.amount, 1);
        assert_eq!(item.display_name.as_deref(), Some("Spawn"));
    }

    #[test]
    fn test_invalid_payloads() {
        assert!(matches!(
            decode_item("%%%not-base64"),
            Err(DecodeError::InvalidEncoding(_))
        ));
        let not_json = STANDARD.encode("hello");
        assert!(matches!(
            decode_chest_contents(&not_json),
            Err(DecodeError::InvalidJson(_))
        ));
    }
}
