use sqlx::SqliteConnection;

use crate::error::AppError;

/// Prefix carried by every verification ID.
pub const PREFIX: &str = "GES";

/// Format a counter value as a verification ID. Values are zero-padded to
/// three digits (`GES101`) and grow naturally past `GES999`.
pub fn format_id(n: i64) -> String {
    format!("{PREFIX}{n:03}")
}

/// Parse a candidate verification ID back to its counter value.
/// Matching is case-insensitive; anything that is not `GES` followed by
/// digits is rejected.
pub fn parse(id: &str) -> Option<i64> {
    let id = id.trim();
    if id.len() <= PREFIX.len() || !id[..PREFIX.len()].eq_ignore_ascii_case(PREFIX) {
        return None;
    }
    id[PREFIX.len()..].parse().ok()
}

/// Allocate the next verification ID from the store-side counter.
///
/// Must run on the same transaction as the member insert so that a failed
/// promotion never burns visible state and two concurrent approvals can
/// never observe the same counter value. The `members` primary key remains
/// the final arbiter regardless.
pub async fn allocate(conn: &mut SqliteConnection) -> Result<String, AppError> {
    let n: i64 =
        sqlx::query_scalar("UPDATE member_id_counter SET next = next + 1 WHERE id = 1 RETURNING next - 1")
            .fetch_one(conn)
            .await?;
    Ok(format_id(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_three_digits() {
        assert_eq!(format_id(101), "GES101");
        assert_eq!(format_id(5), "GES005");
    }

    #[test]
    fn test_format_grows_past_three_digits() {
        assert_eq!(format_id(1234), "GES1234");
    }

    #[test]
    fn test_parse_roundtrip() {
        assert_eq!(parse(&format_id(101)), Some(101));
        assert_eq!(parse(&format_id(7)), Some(7));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(parse("ges101"), Some(101));
        assert_eq!(parse("Ges042"), Some(42));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("GES"), None);
        assert_eq!(parse("GESabc"), None);
        assert_eq!(parse("ABC101"), None);
        assert_eq!(parse("101"), None);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse("  GES101  "), Some(101));
    }
}
