//! Anonymized class labels
//!
//! The demo deliberately never surfaces dataset class names, so the UI does
//! not imply a known taxonomy. Every class is shown as `Category NNN`.

/// Fixed prefix of every displayed label
pub const LABEL_PREFIX: &str = "Category ";

/// Format a class id as `Category NNN`, zero-padded to at least three digits.
pub fn format_label(class_id: u32) -> String {
    format!("{LABEL_PREFIX}{class_id:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_to_three_digits() {
        assert_eq!(format_label(0), "Category 000");
        assert_eq!(format_label(7), "Category 007");
        assert_eq!(format_label(42), "Category 042");
        assert_eq!(format_label(199), "Category 199");
    }

    #[test]
    fn test_no_truncation_above_999() {
        assert_eq!(format_label(1523), "Category 1523");
        assert_eq!(format_label(u32::MAX), format!("Category {}", u32::MAX));
    }
}
