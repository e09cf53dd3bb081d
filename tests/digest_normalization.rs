use quickcheck::quickcheck;
use swallow::{Digester, HashAlgorithm, TargetDigest};

quickcheck! {
    fn case_does_not_change_target(input: Vec<u8>) -> bool {
        let lower = HashAlgorithm::Md5.hex_digest(&input);
        let upper = lower.to_uppercase();
        let a = TargetDigest::parse(&lower, 16).unwrap();
        let b = TargetDigest::parse(&upper, 16).unwrap();
        a == b && a.to_hex() == lower
    }
}

quickcheck! {
    fn digest_matches_its_own_target(input: String) -> bool {
        [HashAlgorithm::Md5, HashAlgorithm::Sha256].into_iter().all(|algo| {
            let hex = algo.hex_digest(input.as_bytes()).to_uppercase();
            let target = TargetDigest::parse(&hex, algo.output_len()).unwrap();
            algo.matches(input.as_bytes(), target.as_bytes())
        })
    }
}

quickcheck! {
    fn wrong_length_is_rejected(input: String) -> bool {
        let hex = HashAlgorithm::Md5.hex_digest(input.as_bytes());
        TargetDigest::parse(&hex[1..], 16).is_err()
            && TargetDigest::parse(&hex, HashAlgorithm::Sha256.output_len()).is_err()
    }
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let target = TargetDigest::parse("  07159C47EE1B19AE4FB9C40D480856C4\n", 16).unwrap();
    assert_eq!(target.to_hex(), "07159c47ee1b19ae4fb9c40d480856c4");
    assert!(HashAlgorithm::Md5.matches(b"ba", target.as_bytes()));
}
