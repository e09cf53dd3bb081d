use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swallow::{
    candidate_at, Alphabet, Coordinator, CrackConfig, CrackReport, Digester, HashAlgorithm,
    Outcome, ProgressObserver, ProgressReport, SearchSpec, TargetDigest,
};

/// MD5 digester that records how many candidates it saw and the longest one.
#[derive(Default)]
struct Recording {
    calls: AtomicU64,
    longest: AtomicUsize,
}

impl Digester for Recording {
    fn output_len(&self) -> usize {
        16
    }

    fn matches(&self, candidate: &[u8], target: &[u8]) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.longest.fetch_max(candidate.len(), Ordering::SeqCst);
        HashAlgorithm::Md5.matches(candidate, target)
    }
}

#[derive(Clone, Default)]
struct Snapshots(Arc<Mutex<Vec<u64>>>);

impl ProgressObserver for Snapshots {
    fn on_progress(&self, report: &ProgressReport) {
        self.0.lock().unwrap().push(report.completed);
    }

    fn on_finish(&self, report: &CrackReport) {
        self.0.lock().unwrap().push(report.completed);
    }
}

fn md5_of(s: &str) -> String {
    HashAlgorithm::Md5.hex_digest(s.as_bytes())
}

fn spec(alphabet: &str, min: usize, max: usize, target_hex: &str) -> SearchSpec {
    let target = TargetDigest::parse(target_hex, 16).unwrap();
    SearchSpec::new(target, Alphabet::new(alphabet).unwrap(), min, max).unwrap()
}

fn config(workers: usize, batch: usize) -> CrackConfig {
    CrackConfig::for_workers(workers)
        .with_batch_size(batch)
        .with_update_threshold(batch as u64)
        .with_poll_interval(Duration::from_millis(5))
}

#[test]
fn finds_ba_without_going_longer() {
    let digester = Arc::new(Recording::default());
    let report = Coordinator::new(spec("ab", 1, 3, &md5_of("ba")), config(1, 2))
        .with_digester(digester.clone())
        .crack()
        .unwrap();

    assert_eq!(report.found(), Some("ba"));
    // a single worker walks lengths in order and stops at the match
    assert_eq!(digester.longest.load(Ordering::SeqCst), 2);
    assert_eq!(report.completed, digester.calls.load(Ordering::SeqCst));
}

#[test]
fn finds_ba_with_several_workers() {
    for workers in 1..=4 {
        let report = Coordinator::new(spec("ab", 1, 3, &md5_of("ba")), config(workers, 1))
            .crack()
            .unwrap();
        assert_eq!(report.outcome, Outcome::Found("ba".into()), "workers={workers}");
        assert!(report.completed <= report.total);
    }
}

#[test]
fn xyz_exhausts_all_nine() {
    let digester = Arc::new(Recording::default());
    let snapshots = Snapshots::default();
    let report = Coordinator::new(spec("xyz", 2, 2, &md5_of("xyzzy")), config(2, 2))
        .with_digester(digester.clone())
        .with_observer(snapshots.clone())
        .crack()
        .unwrap();

    assert_eq!(report.outcome, Outcome::NotFound);
    assert_eq!(report.completed, 9);
    assert_eq!(report.total, 9);
    assert_eq!(digester.calls.load(Ordering::SeqCst), 9);

    let seen = snapshots.0.lock().unwrap();
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "progress went backwards: {seen:?}");
    assert_eq!(seen.last(), Some(&9));
}

#[test]
fn oversized_batch_still_exhausts_small_space() {
    let config = CrackConfig::for_workers(1).with_batch_size(usize::MAX / 8);
    let report = Coordinator::new(spec("xyz", 2, 2, &md5_of("xyzzy")), config)
        .crack()
        .unwrap();
    assert_eq!(report.outcome, Outcome::NotFound);
    assert_eq!(report.completed, 9);
}

#[test]
fn upper_and_lower_case_targets_agree() {
    let lower = md5_of("cab");
    let upper = lower.to_uppercase();
    for target in [lower, upper] {
        let report = Coordinator::new(spec("abc", 1, 3, &target), config(3, 5))
            .crack()
            .unwrap();
        assert_eq!(report.found(), Some("cab"));
    }
}

#[test]
fn progress_matches_candidates_tested() {
    let digester = Arc::new(Recording::default());
    let report = Coordinator::new(spec("abcd", 1, 5, &md5_of("dcba")), config(3, 7))
        .with_digester(digester.clone())
        .crack()
        .unwrap();

    assert_eq!(report.found(), Some("dcba"));
    assert_eq!(report.completed, digester.calls.load(Ordering::SeqCst));
}

#[test]
fn surplus_workers_are_not_started() {
    let report = Coordinator::new(spec("ab", 2, 4, &md5_of("none")), config(5, 3))
        .crack()
        .unwrap();
    assert_eq!(report.workers_started, 3);
    assert_eq!(report.outcome, Outcome::NotFound);
    assert_eq!(report.completed, 4 + 8 + 16);
}

#[test]
fn random_targets_are_found() {
    let mut rng = StdRng::seed_from_u64(42);
    let symbols: Vec<char> = "0123456789".chars().collect();
    for _ in 0..5 {
        let length = rng.gen_range(1..=4);
        let index = rng.gen_range(0..10u64.pow(length as u32));
        let secret = candidate_at(&symbols, length, index).unwrap();

        let report = Coordinator::new(spec("0123456789", 1, 4, &md5_of(&secret)), config(4, 97))
            .crack()
            .unwrap();
        assert_eq!(report.found(), Some(secret.as_str()));
    }
}

/// Accepts any candidate from a fixed set, to model two preimages.
struct AnyOf(HashSet<&'static str>);

impl Digester for AnyOf {
    fn output_len(&self) -> usize {
        16
    }

    fn matches(&self, candidate: &[u8], _target: &[u8]) -> bool {
        std::str::from_utf8(candidate).is_ok_and(|c| self.0.contains(c))
    }
}

#[test]
fn one_of_several_preimages_wins() {
    let preimages: HashSet<&'static str> = ["ba", "abab"].into_iter().collect();
    let report = Coordinator::new(spec("ab", 1, 4, &md5_of("x")), config(4, 1))
        .with_digester(Arc::new(AnyOf(preimages.clone())))
        .crack()
        .unwrap();

    let found = report.found().unwrap();
    assert!(preimages.contains(found), "unexpected result {found}");
}

#[test]
fn sha256_targets_are_supported() {
    let target = HashAlgorithm::Sha256.hex_digest(b"zz");
    let spec = SearchSpec::new(
        TargetDigest::parse(&target, 32).unwrap(),
        Alphabet::new("xyz").unwrap(),
        1,
        2,
    )
    .unwrap();
    let report = Coordinator::new(spec, config(2, 2))
        .with_algorithm(HashAlgorithm::Sha256)
        .crack()
        .unwrap();
    assert_eq!(report.found(), Some("zz"));
}
