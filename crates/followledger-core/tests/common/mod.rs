use followledger_core::extract::MembershipSets;
use followledger_core::timepoint::TimePointInput;
use std::path::{Path, PathBuf};

/// Build the membership sets of one time point
#[allow(dead_code)]
pub fn sets(followed: &[&str], not_following_back: &[&str]) -> MembershipSets {
    MembershipSets::from_raw(followed.iter(), not_following_back.iter())
}

/// Build one raw time point keyed by its header
#[allow(dead_code)]
pub fn time_point(header: &str, followed: &[&str], not_following_back: &[&str]) -> TimePointInput {
    TimePointInput {
        header: header.to_string(),
        sets: sets(followed, not_following_back),
    }
}

/// Deterministic ids that are easy to read in assertions
#[allow(dead_code)]
pub fn fixed_ids(username: &str) -> String {
    format!("id:{}", username)
}

/// Write the two-date export used across file-level tests
///
/// 6/1/2025: follows a, b, c; b does not follow back.
/// 6/30/2025: follows a, c; nobody missing.
#[allow(dead_code)]
pub fn write_worked_example_csv(dir: &Path) -> PathBuf {
    let path = dir.join("export.csv");
    std::fs::write(
        &path,
        "6/1/2025,6/1/2025.1,6/30/2025,6/30/2025.1\n\
         a,b,a,\n\
         b,,c,\n\
         c,,,\n",
    )
    .unwrap();
    path
}
