//! Displayable preview of the compressed output.

use base64::{engine::general_purpose::STANDARD, Engine};

/// A `data:` URL the browser can put straight into an `<img src>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    data_url: String,
}

impl Preview {
    /// Build a preview for encoded bytes of the given media type.
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        Self {
            data_url: format!("data:{};base64,{}", media_type, STANDARD.encode(bytes)),
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_format() {
        let preview = Preview::from_bytes("image/jpeg", &[0xFF, 0xD8, 0xFF]);
        assert_eq!(preview.data_url(), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_data_url_decodes_back() {
        let bytes: Vec<u8> = (0..=255).collect();
        let preview = Preview::from_bytes("image/jpeg", &bytes);

        let payload = preview
            .data_url()
            .strip_prefix("data:image/jpeg;base64,")
            .unwrap();
        assert_eq!(STANDARD.decode(payload).unwrap(), bytes);
    }
}
