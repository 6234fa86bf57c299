//! Mapping between archive file names and backup dates.

use crate::bucket::{self, format_date};
use crate::error::RetentionError;
use crate::prune::BackupRecord;
use chrono::NaiveDate;

pub const ARCHIVE_EXTENSION: &str = "tar.bzip2";

/// `<prefix><YYYY-MM-DD>.tar.bzip2`
pub fn archive_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}{}.{ARCHIVE_EXTENSION}", format_date(date))
}

/// Extract the date from `<prefix><YYYY-MM-DD>[.anything]`.
///
/// Returns `None` when `name` does not carry the prefix at all.
pub fn parse_backup_file_name(
    prefix: &str,
    name: &str,
) -> Option<Result<NaiveDate, RetentionError>> {
    let rest = name.strip_prefix(prefix)?;
    let stem = rest.split_once('.').map_or(rest, |(stem, _)| stem);
    Some(bucket::parse_date(stem))
}

/// Turn remote `ls` output into backup records, in listing order.
pub fn backup_records(prefix: &str, listing: &str) -> Vec<BackupRecord> {
    let mut records = Vec::new();
    for name in listing.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match parse_backup_file_name(prefix, name) {
            Some(Ok(date)) => records.push(BackupRecord::new(name, date)),
            Some(Err(err)) => {
                tracing::warn!(file = name, error = %err, "skipping file with unparsable date");
            }
            None => {}
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_with_and_without_extension() {
        let expected = NaiveDate::from_ymd_opt(2012, 2, 1).unwrap();
        let prefix = "automated-backup-";
        assert_eq!(
            parse_backup_file_name(prefix, "automated-backup-2012-02-01.tar.bzip2"),
            Some(Ok(expected))
        );
        assert_eq!(
            parse_backup_file_name(prefix, "automated-backup-2012-02-01"),
            Some(Ok(expected))
        );
        assert_eq!(parse_backup_file_name(prefix, "latest"), None);
    }

    #[test]
    fn prefix_may_contain_dots() {
        let expected = NaiveDate::from_ymd_opt(2004, 2, 21).unwrap();
        assert_eq!(
            parse_backup_file_name("host.example.", "host.example.2004-02-21.tar"),
            Some(Ok(expected))
        );
    }

    #[test]
    fn archive_name_round_trips() {
        let date = NaiveDate::from_ymd_opt(2004, 2, 21).unwrap();
        let name = archive_file_name("rrbackup", date);
        assert_eq!(name, "rrbackup2004-02-21.tar.bzip2");
        assert_eq!(parse_backup_file_name("rrbackup", &name), Some(Ok(date)));
    }

    #[test]
    fn listing_skips_foreign_and_malformed_names() {
        let listing = "latest\nautomated-backup-2004-02-21.tar.bzip2\n\nautomated-backup-notes.txt\nautomated-backup-2004-02-30\n";
        let records = backup_records("automated-backup-", listing);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "automated-backup-2004-02-21.tar.bzip2");
    }
}
