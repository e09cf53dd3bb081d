use honggfuzz::fuzz;
use swallow::{Alphabet, HashAlgorithm, TargetDigest};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok(text) = std::str::from_utf8(data) else {
                return;
            };
            for algo in [HashAlgorithm::Md5, HashAlgorithm::Sha256] {
                if let Ok(target) = TargetDigest::parse(text, algo.output_len()) {
                    assert_eq!(target.as_bytes().len(), algo.output_len());
                    assert_eq!(target.to_hex(), text.trim().to_ascii_lowercase());
                }
            }
            if let Ok(alphabet) = Alphabet::sorted(text) {
                let symbols = alphabet.symbols();
                assert!(symbols.windows(2).all(|w| w[0] < w[1]));
            }
        });
    }
}
