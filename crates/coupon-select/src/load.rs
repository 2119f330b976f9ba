//! Loading the classified coupon collection.

use coupon_select_widgets::coupon::{ClassifiedCoupon, Coupon, CouponCollection};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid coupon file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON collection of the form
/// `{"applicable": [...], "disabled": [...]}`.
pub fn load_coupons(path: &Path) -> Result<CouponCollection, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: CouponCollection =
        serde_json::from_str(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(
        path = %path.display(),
        applicable = parsed.applicable.len(),
        disabled = parsed.disabled.len(),
        "coupons loaded"
    );
    // Re-run the overlap check done by the constructor.
    Ok(CouponCollection::new(parsed.applicable, parsed.disabled))
}

/// The collection shown when no file is given.
pub fn sample_coupons() -> CouponCollection {
    CouponCollection::new(
        vec![
            ClassifiedCoupon::applicable(Coupon::new("SAVE10", "Electronics", 10.0, "save10")),
            ClassifiedCoupon::applicable(Coupon::new("WELCOME5", "New customers", 5.0, "welcome5")),
            ClassifiedCoupon::applicable(Coupon::new("FREESHIP", "Shipping", 4.99, "freeship")),
            ClassifiedCoupon::applicable(Coupon::new("BOOKS15", "Books", 15.0, "books15")),
        ],
        vec![
            ClassifiedCoupon::disabled(
                Coupon::new("SAVE20", "Food", 20.0, "save20"),
                Some("Minimum order not met".into()),
            ),
            ClassifiedCoupon::disabled(
                Coupon::new("TECH50", "Electronics", 50.0, "tech50"),
                Some("Requires a cart total above 500".into()),
            ),
            ClassifiedCoupon::disabled(Coupon::new("SPRING", "Seasonal", 7.5, "spring"), None),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_partition_in_order() {
        let file = write(
            r#"{
                "applicable": [
                    {"coupon": {"code": "SAVE10", "category": {"name": "Electronics"},
                                "discount_amount": 10, "value": "A"},
                     "isApplicable": true, "value": "A"}
                ],
                "disabled": [
                    {"coupon": {"code": "SAVE20", "category": {"name": "Food"},
                                "discount_amount": 20, "value": "B"},
                     "isApplicable": false, "reason": "Minimum order not met"}
                ]
            }"#,
        );
        let coupons = load_coupons(file.path()).unwrap();
        let expected = CouponCollection::new(
            vec![ClassifiedCoupon::applicable(Coupon::new("SAVE10", "Electronics", 10.0, "A"))],
            vec![ClassifiedCoupon::disabled(
                Coupon::new("SAVE20", "Food", 20.0, "B"),
                Some("Minimum order not met".into()),
            )],
        );
        assert_eq!(coupons, expected);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_coupons(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write(r#"{"applicable": [{"coupon": 3}]"#);
        let err = load_coupons(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn sample_is_disjoint_and_ordered() {
        let sample = sample_coupons();
        assert_eq!(sample.overlap(), None);
        assert!(sample.applicable.iter().all(|c| c.is_applicable));
        assert!(sample.disabled.iter().all(|c| !c.is_applicable));
    }
}
