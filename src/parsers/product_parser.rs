use crate::answers::SF45_PRODUCT_NAME_LEN;
use log::trace;

/// Decodes the product name field.
///
/// Returns `None` unless `data` is exactly the 16-byte name field. Invalid
/// UTF-8 is replaced rather than rejected and NUL padding is trimmed.
pub fn parse_product_name(data: &[u8]) -> Option<String> {
    if data.len() != SF45_PRODUCT_NAME_LEN {
        trace!("Product name answer with {} bytes ignored", data.len());
        return None;
    }
    let name = String::from_utf8_lossy(data);
    Some(name.trim_end_matches('\0').to_owned())
}

#[cfg(test)]
mod tests {
    use super::parse_product_name;

    #[test]
    fn full_width_name() {
        assert_eq!(
            parse_product_name(b"SF45/B-50m rev.2").as_deref(),
            Some("SF45/B-50m rev.2")
        );
    }

    #[test]
    fn nul_padding_trimmed() {
        assert_eq!(
            parse_product_name(b"SF45\0\0\0\0\0\0\0\0\0\0\0\0").as_deref(),
            Some("SF45")
        );
    }

    #[test]
    fn wrong_length_ignored() {
        assert_eq!(parse_product_name(b"SF45"), None);
    }
}
