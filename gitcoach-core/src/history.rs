use crate::{
    constants::HISTORY_SCAN_DEPTH,
    git::CommandSpec,
};
use regex::Regex;
use std::{path::Path, sync::LazyLock};

// Lexical markers for commits that usually want squashing before review.
static NOISY_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfix(e[sd])?\b|\btypo\b|\bdebug\b|\boops\b").expect("static pattern"));

/// The `git log` invocation whose output feeds [`find_noisy_commits`].
pub fn history_scan_spec(dir: &Path) -> CommandSpec {
    CommandSpec::new(
        dir,
        &["log", "--oneline", "-n", &HISTORY_SCAN_DEPTH.to_string()],
    )
}

/// Returns the `--oneline` history lines whose commit message matches one of
/// the noisy markers, preserving log order. Only the message after the first
/// space is matched, so a hash that happens to contain "deb" never counts;
/// lines without a message are skipped.
pub fn find_noisy_commits(oneline_log: &str) -> Vec<String> {
    oneline_log
        .lines()
        .filter_map(|line| {
            let (_, message) = line.split_once(' ')?;
            NOISY_MARKERS
                .is_match(&message.to_lowercase())
                .then(|| line.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_each_marker() {
        let log = "\
aaa1111 fix the build
bbb2222 Fixes flaky test
ccc3333 fixed lints
ddd4444 typo in docs
eee5555 remove debug print
fff6666 oops
abc7777 add payment flow";
        let noisy = find_noisy_commits(log);
        assert_eq!(noisy.len(), 6);
        assert!(!noisy.iter().any(|l| l.contains("payment")));
    }

    #[test]
    fn test_match_is_case_insensitive_and_word_bounded() {
        let log = "aaa1111 FIX login\nbbb2222 prefix handling\nccc3333 debugger support";
        let noisy = find_noisy_commits(log);
        assert_eq!(noisy, vec!["aaa1111 FIX login".to_string()]);
    }

    #[test]
    fn test_hash_prefix_is_never_matched() {
        // "deb" lives in the hash, the message itself is clean
        let log = "debf00d add feature gate";
        assert!(find_noisy_commits(log).is_empty());
    }

    #[test]
    fn test_lines_without_message_are_skipped() {
        assert!(find_noisy_commits("aaa1111").is_empty());
        assert!(find_noisy_commits("").is_empty());
    }

    #[test]
    fn test_order_follows_the_log() {
        let log = "aaa fix one\nbbb clean\nccc typo two";
        let noisy = find_noisy_commits(log);
        assert_eq!(noisy, vec!["aaa fix one".to_string(), "ccc typo two".to_string()]);
    }

    #[test]
    fn test_scan_spec_window() {
        let spec = history_scan_spec(Path::new("/tmp/repo"));
        assert_eq!(spec.args, vec!["log", "--oneline", "-n", "20"]);
    }
}
